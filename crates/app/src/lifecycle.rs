//! Page lifecycle: render, load, periodic update, destroy.
//!
//! A [`PageController`] owns at most one repeating task for its page. It moves
//! between two states:
//!
//! - **Idle**: nothing scheduled. The initial state, and the state after
//!   [`destroy`](PageController::destroy).
//! - **Active**: the page was rendered and is loading or polling.
//!
//! The repeating task is armed only after the first `load()` finished *and*
//! the controller is still in the same activation, so a page destroyed while
//! loading never starts polling. A tick that fires while the previous
//! `update()` is still running is skipped.
//!
//! Every page also carries a [`Liveness`] flag that the controller clears on
//! destroy. User actions check it before each request so nothing reaches the
//! device once the page is gone.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures_util::future::LocalBoxFuture;

use crate::navigator::PageName;
use crate::ports::{Scheduler, TaskHandle, Tick};

/// Whether the page is still mounted.
///
/// Starts live. [`PageController::destroy`] clears it and
/// [`PageController::mount`] sets it again.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl Liveness {
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.0.get()
    }

    fn set(&self, live: bool) {
        self.0.set(live);
    }
}

/// A dashboard page.
///
/// `render` resets the view to placeholders, `load` fetches initial data and
/// `update` refreshes it. Implementations catch their own errors: a failed
/// fetch leaves the affected fields as they were.
pub trait Page: 'static {
    fn name(&self) -> PageName;

    /// Flag cleared when the page is destroyed.
    fn liveness(&self) -> &Liveness;

    /// Polling period, `None` for pages that do not poll.
    fn refresh_interval(&self) -> Option<Duration>;

    /// Put the view in its initial state.
    fn render(&self);

    /// Initial data fetch. Defaults to one [`update`](Self::update).
    fn load(&self) -> impl Future<Output = ()> {
        self.update()
    }

    /// Refresh the view from the device.
    fn update(&self) -> impl Future<Output = ()>;
}

enum Phase<H> {
    Idle,
    Active { activation: u64, task: Option<H> },
}

struct ControllerState<H> {
    phase: Phase<H>,
    activations: u64,
}

/// Drives one [`Page`] through its lifecycle.
pub struct PageController<P, S: Scheduler> {
    page: Rc<P>,
    scheduler: S,
    state: Rc<RefCell<ControllerState<S::Handle>>>,
}

impl<P, S: Scheduler> Clone for PageController<P, S> {
    fn clone(&self) -> Self {
        Self {
            page: Rc::clone(&self.page),
            scheduler: self.scheduler.clone(),
            state: Rc::clone(&self.state),
        }
    }
}

impl<P: Page, S: Scheduler> PageController<P, S> {
    pub fn new(page: P, scheduler: S) -> Self {
        Self {
            page: Rc::new(page),
            scheduler,
            state: Rc::new(RefCell::new(ControllerState {
                phase: Phase::Idle,
                activations: 0,
            })),
        }
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state.borrow().phase, Phase::Active { .. })
    }

    /// Whether a repeating task is currently armed.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        matches!(
            self.state.borrow().phase,
            Phase::Active { task: Some(_), .. }
        )
    }

    /// Render the page synchronously and return the future that loads it
    /// and arms polling.
    ///
    /// Mounting an already active controller restarts it.
    pub fn mount(&self) -> LocalBoxFuture<'static, ()> {
        self.destroy();
        self.page.liveness().set(true);
        self.page.render();

        let activation = {
            let mut state = self.state.borrow_mut();
            state.activations += 1;
            state.phase = Phase::Active {
                activation: state.activations,
                task: None,
            };
            state.activations
        };
        tracing::debug!(page = %self.page.name(), activation, "page mounted");

        let page = Rc::clone(&self.page);
        let state = Rc::clone(&self.state);
        let scheduler = self.scheduler.clone();
        Box::pin(async move {
            page.load().await;

            let Some(period) = page.refresh_interval() else {
                return;
            };
            let mut state = state.borrow_mut();
            match &mut state.phase {
                Phase::Active {
                    activation: current,
                    task,
                } if *current == activation => {
                    *task = Some(scheduler.every(period, polling_tick(page)));
                }
                _ => {
                    tracing::debug!(activation, "page left before load finished, not polling");
                }
            }
        })
    }

    /// Cancel polling and return to Idle. A no-op when already Idle.
    pub fn destroy(&self) {
        self.page.liveness().set(false);
        let previous = std::mem::replace(&mut self.state.borrow_mut().phase, Phase::Idle);
        if let Phase::Active { task, .. } = previous {
            if let Some(task) = task {
                task.cancel();
            }
            tracing::debug!(page = %self.page.name(), "page destroyed");
        }
    }
}

struct InFlight(Rc<Cell<bool>>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn polling_tick<P: Page>(page: Rc<P>) -> Tick {
    let busy = Rc::new(Cell::new(false));
    Box::new(move || -> LocalBoxFuture<'static, ()> {
        if busy.replace(true) {
            tracing::trace!(page = %page.name(), "previous update still running, skipping tick");
            return Box::pin(async {});
        }
        let guard = InFlight(Rc::clone(&busy));
        let page = Rc::clone(&page);
        Box::pin(async move {
            let _guard = guard;
            page.update().await;
        })
    })
}
