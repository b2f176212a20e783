use leptos::prelude::*;

use minermon_app::pages::SensorsPage;
use minermon_app::pages::sensors::SensorsView;
use minermon_domain::sensor::SensorKind;

use crate::components::MetricGroup;
use crate::{Api, Controller, watch};

#[component]
pub fn Sensors(controller: Controller<SensorsPage<Api>>) -> impl IntoView {
    let model = watch(&controller.page().view);
    let group = move |kind: SensorKind| Signal::derive(move || model.with(|v| v.metrics(kind)));

    view! {
        <section class="page page-sensors">
            <h2>"Sensors"</h2>
            <p class="sampled-at">
                "Last reading: " {move || model.with(SensorsView::sampled_at)}
            </p>
            <div class="grid">
                <MetricGroup title="Temperature" metrics=group(SensorKind::Temperature)/>
                <MetricGroup title="Humidity" metrics=group(SensorKind::Humidity)/>
            </div>
            <MetricGroup title="Current" metrics=group(SensorKind::Current)/>
        </section>
    }
}
