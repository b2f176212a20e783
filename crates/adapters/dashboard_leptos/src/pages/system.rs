use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

use minermon_app::pages::SystemPage;
use minermon_app::pages::system::{InfoRow, SystemView};
use minermon_domain::format::PLACEHOLDER;

use super::{Stored, spawn_action};
use crate::components::ToastNotifier;
use crate::{Api, Controller, watch};

type Page = SystemPage<Api, ToastNotifier>;

/// Device telemetry, recent logs, connection test and restart.
///
/// After an accepted restart the whole app reloads once `reload_delay` has
/// passed, giving the device time to come back.
#[component]
pub fn System(controller: Controller<Page>, reload_delay: Duration) -> impl IntoView {
    let model = watch(&controller.page().view);
    let controller: Stored<Page> = StoredValue::new_local(controller);

    let refresh = move |_| {
        spawn_action(controller, |c| async move { c.page().refresh_data().await });
    };
    let test = move |_| {
        spawn_action(controller, |c| async move { c.page().test_connection().await });
    };
    let restart = move |_| {
        let confirmed = window()
            .confirm_with_message("Restart the device?")
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_action(controller, move |c| async move {
            if c.page().restart().await {
                let millis = u32::try_from(reload_delay.as_millis()).unwrap_or(u32::MAX);
                TimeoutFuture::new(millis).await;
                if let Err(err) = window().location().reload() {
                    tracing::error!(error = ?err, "failed to reload after restart");
                }
            }
        });
    };

    let connection = move || model.with(|v| v.connection_label().0);
    let connection_class =
        move || format!("text-{}", model.with(|v| v.connection_label().1.class()));

    view! {
        <section class="page page-system">
            <h2>"System"</h2>
            <div class="grid">
                <div class="card">
                    <h3>"Device"</h3>
                    {move || info_list(model.with(SystemView::info))}
                </div>
                <div class="card">
                    <h3>"Resources"</h3>
                    {move || info_list(model.with(SystemView::usage))}
                </div>
            </div>

            <div class="card">
                <h3>"Actions"</h3>
                <div class="row">
                    <button class="btn btn-secondary" on:click=refresh>
                        "Refresh"
                    </button>
                    <button
                        class="btn btn-secondary"
                        disabled=move || model.with(|v| v.testing)
                        on:click=test
                    >
                        {move || {
                            if model.with(|v| v.testing) { "Testing\u{2026}" } else { "Test connection" }
                        }}
                    </button>
                    <span class=connection_class>{connection}</span>
                    <button
                        class="btn btn-danger"
                        disabled=move || model.with(|v| v.restarting)
                        on:click=restart
                    >
                        {move || {
                            if model.with(|v| v.restarting) { "Restarting\u{2026}" } else { "Restart device" }
                        }}
                    </button>
                </div>
            </div>

            <div class="card">
                <h3>"Logs"</h3>
                <ul class="log-list">
                    {move || match model.with(SystemView::log_lines) {
                        None => view! { <li class="muted">{PLACEHOLDER}</li> }.into_any(),
                        Some(lines) if lines.is_empty() => {
                            view! { <li class="muted">"No log entries"</li> }.into_any()
                        }
                        Some(lines) => {
                            lines
                                .into_iter()
                                .map(|line| {
                                    view! {
                                        <li class=format!("log-line {}", line.class)>
                                            <span class="log-time">{line.time}</span>
                                            <span class="log-level">{line.level}</span>
                                            <span class="log-message">{line.message}</span>
                                        </li>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </ul>
            </div>
        </section>
    }
}

fn info_list(rows: Vec<InfoRow>) -> impl IntoView {
    view! {
        <dl class="info-list">
            {rows
                .into_iter()
                .map(|row| view! { <dt>{row.label}</dt><dd>{row.value}</dd> })
                .collect_view()}
        </dl>
    }
}
