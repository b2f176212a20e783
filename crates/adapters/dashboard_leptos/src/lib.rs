//! Leptos front end for the minermon dashboard.
//!
//! Page logic lives in `minermon-app`. This crate supplies the browser side
//! of its ports (a `fetch` transport, `setInterval` polling, toasts), drives
//! the [`Navigator`] from the URL hash, and renders each page's view model.

use std::time::Duration;

use futures_util::FutureExt;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

use minermon_app::client::HttpDeviceApi;
use minermon_app::connection::{ConnectionStatus, probe};
use minermon_app::context::AppContext;
use minermon_app::lifecycle::PageController;
use minermon_app::navigator::{Navigator, PageName};
use minermon_app::pages::{Screen, ScreenFactory};
use minermon_app::ports::{Scheduler, TaskHandle};
use minermon_app::view::ViewCell;

mod components;
mod config;
mod pages;
pub mod scheduler;
pub mod transport;

use components::{Nav, ToastContainer, ToastNotifier};
use pages::{Dashboard, NotFound, Relays, Sensors, Settings, System};
use scheduler::BrowserScheduler;
use transport::GlooTransport;

/// Device API as wired in the browser.
pub type Api = HttpDeviceApi<GlooTransport>;
/// A page with its controller, as built by the navigator.
pub type AppScreen = Screen<Api, BrowserScheduler, ToastNotifier>;
type Controller<P> = PageController<P, BrowserScheduler>;

/// How often the header re-checks the device.
const CONNECTION_CHECK: Duration = Duration::from_secs(30);

/// Mirror a [`ViewCell`] into a signal so the view re-renders on change.
///
/// Writes after the owning component is gone are dropped.
fn watch<T: Clone + 'static>(cell: &ViewCell<T>) -> RwSignal<T, LocalStorage> {
    let signal = RwSignal::new_local(cell.get());
    cell.subscribe(move |value| {
        let _ = signal.try_set(value.clone());
    });
    signal
}

fn current_hash() -> String {
    window().location().hash().unwrap_or_default()
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    let config = config::from_document();
    let reload_delay = config.restart_reload_delay();
    let notifier = ToastNotifier::new();
    let api = HttpDeviceApi::new(GlooTransport, config.api_base.clone())
        .with_timeout(config.request_timeout());
    let ctx = AppContext::new(api.clone(), BrowserScheduler, notifier, config);

    let navigator = StoredValue::new_local(Navigator::new(ScreenFactory::new(ctx)));
    let screen = RwSignal::new_local(None::<AppScreen>);
    let (current, set_current) = signal(None::<PageName>);

    let show = move |hash: &str| match PageName::from_hash(hash) {
        Ok(name) => {
            if let Some(loading) = navigator.with_value(|nav| nav.navigate(name)) {
                screen.set(navigator.with_value(Navigator::current));
                set_current.set(Some(name));
                spawn_local(loading);
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "unknown route");
            navigator.with_value(Navigator::clear);
            screen.set(None);
            set_current.set(None);
        }
    };
    show(&current_hash());
    let hash_listener = window_event_listener(ev::hashchange, move |_| show(&current_hash()));

    let refresh = Callback::new(move |()| {
        if let Some(loading) = navigator.with_value(Navigator::reload) {
            screen.set(navigator.with_value(Navigator::current));
            spawn_local(loading);
        }
    });

    let (connection, set_connection) = signal(None::<ConnectionStatus>);
    let check = move |api: Api| async move {
        set_connection.set(Some(probe(&api).await));
    };
    spawn_local(check(api.clone()));
    let connection_task = StoredValue::new_local(Some(
        BrowserScheduler.every(CONNECTION_CHECK, Box::new(move || check(api.clone()).boxed_local())),
    ));

    on_cleanup(move || {
        hash_listener.remove();
        if let Some(task) = connection_task.try_update_value(Option::take).flatten() {
            task.cancel();
        }
        navigator.with_value(Navigator::clear);
    });

    view! {
        <Nav current=current connection=connection on_refresh=refresh/>
        <main>
            {move || match screen.get() {
                Some(AppScreen::Dashboard(controller)) => {
                    view! { <Dashboard controller=controller/> }.into_any()
                }
                Some(AppScreen::Sensors(controller)) => {
                    view! { <Sensors controller=controller/> }.into_any()
                }
                Some(AppScreen::Relays(controller)) => {
                    view! { <Relays controller=controller/> }.into_any()
                }
                Some(AppScreen::Settings(controller)) => {
                    view! { <Settings controller=controller/> }.into_any()
                }
                Some(AppScreen::System(controller)) => {
                    view! { <System controller=controller reload_delay=reload_delay/> }.into_any()
                }
                None => view! { <NotFound requested=current_hash()/> }.into_any(),
            }}
        </main>
        <ToastContainer notifier=notifier/>
    }
}
