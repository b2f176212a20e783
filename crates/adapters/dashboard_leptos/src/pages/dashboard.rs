use leptos::prelude::*;

use minermon_app::pages::DashboardPage;
use minermon_app::pages::dashboard::DashboardView;
use minermon_domain::format::PLACEHOLDER;
use minermon_domain::relay::RelayId;
use minermon_domain::sensor::SensorKind;

use super::{Stored, spawn_action};
use crate::components::{MetricGroup, ToastNotifier};
use crate::{Api, Controller, watch};

type Page = DashboardPage<Api, ToastNotifier>;

/// Overview: latest readings, relay quick toggles, device health.
#[component]
pub fn Dashboard(controller: Controller<Page>) -> impl IntoView {
    let model = watch(&controller.page().view);
    let pending = watch(&controller.page().pending);
    let controller: Stored<Page> = StoredValue::new_local(controller);

    let toggle = move |id: RelayId| {
        spawn_action(controller, move |c| async move { c.page().toggle(id).await });
    };
    let group = move |kind: SensorKind| Signal::derive(move || model.with(|v| v.metrics(kind)));

    view! {
        <section class="page page-dashboard">
            <h2>"Dashboard"</h2>
            <div class="grid">
                <MetricGroup title="Temperature" metrics=group(SensorKind::Temperature)/>
                <MetricGroup title="Humidity" metrics=group(SensorKind::Humidity)/>
                <MetricGroup title="Current" metrics=group(SensorKind::Current)/>
            </div>
            <div class="grid">
                <div class="card">
                    <h3>"Relays"</h3>
                    <div class="relay-toggles">
                        {RelayId::all()
                            .map(|id| {
                                let state = move || model.with(|v| v.relay(id));
                                let busy = move || pending.with(|p| p.contains(&id));
                                view! {
                                    <div class="relay-toggle">
                                        <span>{id.to_string()}</span>
                                        <button
                                            class=move || match state() {
                                                Some(true) => "btn btn-success",
                                                Some(false) => "btn btn-secondary",
                                                None => "btn btn-muted",
                                            }
                                            disabled=move || busy() || state().is_none()
                                            on:click=move |_| toggle(id)
                                        >
                                            {move || match state() {
                                                Some(true) => "ON",
                                                Some(false) => "OFF",
                                                None => PLACEHOLDER,
                                            }}
                                        </button>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
                <div class="card">
                    <h3>"System"</h3>
                    <dl class="info-list">
                        <dt>"Uptime"</dt>
                        <dd>{move || model.with(DashboardView::uptime)}</dd>
                        <dt>"Free memory"</dt>
                        <dd>{move || model.with(DashboardView::free_memory)}</dd>
                        <dt>"WiFi"</dt>
                        <dd>{move || model.with(DashboardView::wifi)}</dd>
                    </dl>
                </div>
            </div>
        </section>
    }
}
