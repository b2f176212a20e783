use leptos::prelude::*;

use minermon_app::pages::RelaysPage;
use minermon_app::pages::relays::RelayCardView;
use minermon_domain::relay::{RelayAction, RelayId};

use super::{Stored, spawn_action};
use crate::components::ToastNotifier;
use crate::{Api, Controller, watch};

type Page = RelaysPage<Api, ToastNotifier>;

/// One card per relay with explicit on/off and toggle controls.
#[component]
pub fn Relays(controller: Controller<Page>) -> impl IntoView {
    let model = watch(&controller.page().view);
    let pending = watch(&controller.page().pending);
    let controller: Stored<Page> = StoredValue::new_local(controller);

    let cards = move || {
        model.track();
        pending.track();
        controller.with_value(|c| c.page().cards())
    };
    let control = move |id: RelayId, action: RelayAction| {
        spawn_action(controller, move |c| async move {
            c.page().control(id, action).await;
        });
    };
    let refresh = move |id: RelayId| {
        spawn_action(controller, move |c| async move {
            c.page().refresh_relay(id).await;
        });
    };

    view! {
        <section class="page page-relays">
            <h2>"Relays"</h2>
            <div class="grid relay-grid">
                {move || {
                    cards()
                        .into_iter()
                        .map(|card| relay_card(card, control, refresh))
                        .collect_view()
                }}
            </div>
        </section>
    }
}

fn relay_card(
    card: RelayCardView,
    control: impl Fn(RelayId, RelayAction) + Copy + Send + Sync + 'static,
    refresh: impl Fn(RelayId) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let id = card.id;
    let enabled = card.controls_enabled();
    let state_class = match card.state {
        Some(true) => "relay-state on",
        Some(false) => "relay-state off",
        None => "relay-state unknown",
    };
    let next = card.next_action;

    view! {
        <div class="card relay-card" class:pending=card.pending>
            <h3>{card.title.clone()}</h3>
            <span class=state_class>{card.state_label()}</span>
            <div class="relay-actions">
                <button
                    class="btn btn-primary"
                    disabled=!enabled
                    on:click=move |_| {
                        if let Some(action) = next {
                            control(id, action);
                        }
                    }
                >
                    {card.action_label()}
                </button>
                <button
                    class="btn btn-secondary"
                    disabled=!enabled
                    on:click=move |_| control(id, RelayAction::Toggle)
                >
                    "Toggle"
                </button>
                <button class="btn btn-link" title="Re-read state" on:click=move |_| refresh(id)>
                    "\u{21BB}"
                </button>
            </div>
        </div>
    }
}
