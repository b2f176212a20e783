//! Polling timers backed by `setInterval` (gloo-timers).

use std::time::Duration;

use gloo_timers::callback::Interval;
use leptos::task::spawn_local;

use minermon_app::ports::{Scheduler, TaskHandle, Tick};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

/// Owns the interval; dropping it clears the timer.
pub struct IntervalHandle(Interval);

impl TaskHandle for IntervalHandle {
    fn cancel(self) {
        drop(self.0);
    }
}

impl Scheduler for BrowserScheduler {
    type Handle = IntervalHandle;

    fn every(&self, period: Duration, mut tick: Tick) -> Self::Handle {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        IntervalHandle(Interval::new(millis, move || spawn_local(tick())))
    }
}
