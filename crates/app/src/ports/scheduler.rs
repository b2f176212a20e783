//! Scheduler port: repeating tasks with explicit cancellation.

use std::time::Duration;

use futures_util::future::LocalBoxFuture;

/// Work run on every tick. Each call returns the future to drive for that tick.
pub type Tick = Box<dyn FnMut() -> LocalBoxFuture<'static, ()>>;

/// Handle to a running repeating task.
pub trait TaskHandle: 'static {
    /// Stop the task. No tick starts after this returns.
    fn cancel(self);
}

/// Runs [`Tick`]s at a fixed period.
pub trait Scheduler: Clone + 'static {
    type Handle: TaskHandle;

    /// Run `tick` every `period`, first after one full period.
    fn every(&self, period: Duration, tick: Tick) -> Self::Handle;
}
