//! Cards for formatted sensor readings.

use leptos::prelude::*;

use minermon_app::pages::MetricView;

/// One reading: label, value colored by its threshold bucket, unit.
#[component]
pub fn MetricCard(metric: MetricView) -> impl IntoView {
    view! {
        <div class="metric">
            <span class="metric-label">{metric.label}</span>
            <span class=format!("metric-value text-{}", metric.color.class())>
                {metric.value}
                <small class="metric-unit">{metric.unit}</small>
            </span>
        </div>
    }
}

/// A titled group of [`MetricCard`]s. `metrics` is re-read on every change.
#[component]
pub fn MetricGroup(
    #[prop(into)] title: String,
    metrics: Signal<Vec<MetricView>>,
) -> impl IntoView {
    view! {
        <div class="card metric-group">
            <h3>{title}</h3>
            <div class="metric-list">
                {move || {
                    metrics
                        .get()
                        .into_iter()
                        .map(|metric| view! { <MetricCard metric=metric/> })
                        .collect_view()
                }}
            </div>
        </div>
    }
}
