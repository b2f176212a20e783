//! Application context shared by every page.

use std::rc::Rc;

use crate::config::DashboardConfig;
use crate::ports::{DeviceApi, Notifier, Scheduler};

/// The device API, scheduler, notifier and configuration, bundled.
///
/// Cloning is cheap: every part is a handle.
pub struct AppContext<A, S, N> {
    pub api: A,
    pub scheduler: S,
    pub notifier: N,
    pub config: Rc<DashboardConfig>,
}

impl<A: Clone, S: Clone, N: Clone> Clone for AppContext<A, S, N> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            scheduler: self.scheduler.clone(),
            notifier: self.notifier.clone(),
            config: Rc::clone(&self.config),
        }
    }
}

impl<A: DeviceApi, S: Scheduler, N: Notifier> AppContext<A, S, N> {
    pub fn new(api: A, scheduler: S, notifier: N, config: DashboardConfig) -> Self {
        Self {
            api,
            scheduler,
            notifier,
            config: Rc::new(config),
        }
    }
}
