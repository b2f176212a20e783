//! In-memory fakes for the ports, shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::LocalBoxFuture;
use tokio::sync::Notify;

use crate::client::HttpDeviceApi;
use crate::config::DashboardConfig;
use crate::context::AppContext;
use crate::ports::{
    HttpRequest, HttpResponse, NoticeLevel, Notifier, Scheduler, TaskHandle, Tick, Transport,
    TransportError,
};

type Reply = Result<HttpResponse, TransportError>;

/// Answers requests from a table keyed by `"METHOD /path?query"`.
///
/// Unscripted requests get a 404. Every request is recorded.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<HashMap<String, Reply>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
    gates: Rc<RefCell<HashMap<String, Arc<Notify>>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, key: &str, response: HttpResponse) {
        self.replies
            .borrow_mut()
            .insert(key.to_string(), Ok(response));
    }

    /// Successful envelope around `data` (raw JSON).
    pub fn ok(&self, key: &str, data: &str) {
        self.respond(
            key,
            HttpResponse {
                status: 200,
                body: format!(r#"{{"success":true,"data":{data}}}"#),
            },
        );
    }

    /// Successful envelope without payload.
    pub fn ack(&self, key: &str) {
        self.respond(
            key,
            HttpResponse {
                status: 200,
                body: r#"{"success":true}"#.to_string(),
            },
        );
    }

    pub fn fail(&self, key: &str, err: TransportError) {
        self.replies.borrow_mut().insert(key.to_string(), Err(err));
    }

    /// Keep replies to `key` waiting until the returned gate is notified.
    pub fn hold(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .borrow_mut()
            .insert(key.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Keys of the recorded requests, in order.
    pub fn sent(&self) -> Vec<String> {
        self.requests.borrow().iter().map(key_of).collect()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }
}

fn key_of(request: &HttpRequest) -> String {
    let path = request
        .url
        .split_once("://")
        .map_or(request.url.as_str(), |(_, rest)| {
            rest.find('/').map_or("/", |i| &rest[i..])
        });
    format!("{} {path}", request.method)
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = key_of(&request);
        self.requests.borrow_mut().push(request);
        let gate = self.gates.borrow().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.replies
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 404,
                    body: r#"{"success":false,"error":"not scripted"}"#.to_string(),
                })
            })
    }
}

struct ScheduledTask {
    period: Duration,
    tick: Tick,
    cancelled: Rc<Cell<bool>>,
}

/// Scheduler whose ticks only run when the test fires them.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Rc<RefCell<Vec<ScheduledTask>>>,
}

pub struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle for ManualHandle {
    fn cancel(self) {
        self.cancelled.set(true);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn every(&self, period: Duration, tick: Tick) -> Self::Handle {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(ScheduledTask {
            period,
            tick,
            cancelled: Rc::clone(&cancelled),
        });
        ManualHandle { cancelled }
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that were never cancelled.
    pub fn active(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    /// Periods of the live tasks.
    pub fn periods(&self) -> Vec<Duration> {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .map(|t| t.period)
            .collect()
    }

    /// Start one tick of every live task without driving it.
    pub fn start_ticks(&self) -> Vec<LocalBoxFuture<'static, ()>> {
        self.tasks
            .borrow_mut()
            .iter_mut()
            .filter(|t| !t.cancelled.get())
            .map(|t| (t.tick)())
            .collect()
    }

    /// Fire every live task once and drive the ticks to completion.
    pub async fn fire(&self) {
        for tick in self.start_ticks() {
            tick.await;
        }
    }
}

/// Notifier that keeps every notice.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Rc<RefCell<Vec<(NoticeLevel, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.borrow().clone()
    }

    pub fn last(&self) -> Option<(NoticeLevel, String)> {
        self.notices.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: String) {
        self.notices.borrow_mut().push((level, message));
    }
}

pub type TestContext = AppContext<HttpDeviceApi<ScriptedTransport>, ManualScheduler, RecordingNotifier>;

/// Fakes wired into an [`AppContext`], with handles kept for assertions.
pub struct Harness {
    pub transport: ScriptedTransport,
    pub scheduler: ManualScheduler,
    pub notifier: RecordingNotifier,
    pub ctx: TestContext,
}

impl Harness {
    pub fn new() -> Self {
        let transport = ScriptedTransport::new();
        let scheduler = ManualScheduler::new();
        let notifier = RecordingNotifier::new();
        let ctx = AppContext::new(
            HttpDeviceApi::new(transport.clone(), ""),
            scheduler.clone(),
            notifier.clone(),
            DashboardConfig::default(),
        );
        Self {
            transport,
            scheduler,
            notifier,
            ctx,
        }
    }
}
