mod dashboard;
mod not_found;
mod relays;
mod sensors;
mod settings;
mod system;

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::Controller;

pub use dashboard::Dashboard;
pub use not_found::NotFound;
pub use relays::Relays;
pub use sensors::Sensors;
pub use settings::Settings;
pub use system::System;

/// A controller kept in the reactive arena so event handlers can reach it.
type Stored<P> = StoredValue<Controller<P>, LocalStorage>;

/// Run a user action against the page behind `controller`.
fn spawn_action<P, F, Fut>(controller: Stored<P>, action: F)
where
    P: 'static,
    F: FnOnce(Controller<P>) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    spawn_local(action(controller.get_value()));
}
