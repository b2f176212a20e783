//! System page: telemetry, logs, connection test and restart.

use std::rc::Rc;
use std::time::Duration;

use futures_util::future::join;

use minermon_domain::color::{ColorBucket, log_level_class};
use minermon_domain::format::{
    PLACEHOLDER, format_latency, format_optional_bytes, format_optional_uptime, format_percent,
    format_rssi, format_timestamp,
};
use minermon_domain::log::LogEntry;
use minermon_domain::system::{CombinedStatus, SystemStatus};

use crate::config::DashboardConfig;
use crate::connection::{ConnectionStatus, probe};
use crate::context::AppContext;
use crate::lifecycle::{Liveness, Page};
use crate::navigator::PageName;
use crate::ports::{DeviceApi, Notifier};
use crate::view::ViewCell;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemView {
    pub status: Option<SystemStatus>,
    pub combined: Option<CombinedStatus>,
    pub logs: Option<Vec<LogEntry>>,
    pub connection: Option<ConnectionStatus>,
    pub testing: bool,
    pub restarting: bool,
}

/// One labelled value of the information table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub label: &'static str,
    pub value: String,
}

/// A formatted log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub time: String,
    pub level: &'static str,
    pub class: &'static str,
    pub message: String,
}

impl SystemView {
    /// Device information, placeholders for anything not yet known.
    #[must_use]
    pub fn info(&self) -> Vec<InfoRow> {
        let status = self.status.as_ref();
        let combined = self.combined.as_ref();
        let wifi = status.map(|s| &s.wifi);
        let version = status
            .and_then(|s| s.version.clone())
            .or_else(|| combined.and_then(|c| c.version.clone()));
        let ip = wifi
            .and_then(|w| w.ip.clone())
            .or_else(|| combined.and_then(|c| c.ip.clone()));

        vec![
            InfoRow {
                label: "Version",
                value: version.unwrap_or_else(|| PLACEHOLDER.to_string()),
            },
            InfoRow {
                label: "Uptime",
                value: format_optional_uptime(
                    status
                        .and_then(|s| s.uptime)
                        .or_else(|| combined.and_then(|c| c.uptime)),
                ),
            },
            InfoRow {
                label: "Free memory",
                value: format_optional_bytes(status.and_then(|s| s.free_memory)),
            },
            InfoRow {
                label: "WiFi",
                value: match wifi {
                    Some(w) if w.connected => "Connected".to_string(),
                    Some(_) => "Disconnected".to_string(),
                    None => PLACEHOLDER.to_string(),
                },
            },
            InfoRow {
                label: "IP address",
                value: ip.unwrap_or_else(|| PLACEHOLDER.to_string()),
            },
            InfoRow {
                label: "Signal",
                value: format_rssi(wifi.and_then(|w| w.rssi)),
            },
        ]
    }

    /// CPU, memory and flash usage.
    #[must_use]
    pub fn usage(&self) -> Vec<InfoRow> {
        let combined = self.combined.as_ref();
        let kib = |v: Option<u64>| format_optional_bytes(v.map(|k| k.saturating_mul(1024)));
        vec![
            InfoRow {
                label: "CPU",
                value: format_percent(combined.and_then(|c| c.cpu_percent)),
            },
            InfoRow {
                label: "Memory used",
                value: format_percent(combined.and_then(CombinedStatus::memory_used_percent)),
            },
            InfoRow {
                label: "Memory total",
                value: kib(combined.and_then(|c| c.memory_total)),
            },
            InfoRow {
                label: "Flash used",
                value: format_percent(combined.and_then(CombinedStatus::flash_used_percent)),
            },
            InfoRow {
                label: "Flash total",
                value: kib(combined.and_then(|c| c.flash_total)),
            },
        ]
    }

    /// Log lines, oldest first. `None` until the first fetch.
    #[must_use]
    pub fn log_lines(&self) -> Option<Vec<LogLine>> {
        self.logs.as_ref().map(|logs| {
            logs.iter()
                .map(|entry| LogLine {
                    time: format_timestamp(Some(entry.timestamp)),
                    level: entry.level.as_str(),
                    class: log_level_class(entry.level),
                    message: entry.message.clone(),
                })
                .collect()
        })
    }

    /// Result of the last connection test.
    #[must_use]
    pub fn connection_label(&self) -> (String, ColorBucket) {
        match &self.connection {
            Some(status @ ConnectionStatus::Connected { latency_ms }) => {
                (format_latency(Some(*latency_ms)), status.color())
            }
            Some(ConnectionStatus::Disconnected { .. }) => {
                ("Failed".to_string(), ColorBucket::Danger)
            }
            None => (PLACEHOLDER.to_string(), ColorBucket::Muted),
        }
    }
}

pub struct SystemPage<A, N> {
    api: A,
    notifier: N,
    config: Rc<DashboardConfig>,
    live: Liveness,
    pub view: ViewCell<SystemView>,
}

impl<A: DeviceApi, N: Notifier> SystemPage<A, N> {
    pub fn new<S>(ctx: &AppContext<A, S, N>) -> Self {
        Self {
            api: ctx.api.clone(),
            notifier: ctx.notifier.clone(),
            config: Rc::clone(&ctx.config),
            live: Liveness::default(),
            view: ViewCell::default(),
        }
    }

    /// Fetch the most recent log lines.
    pub async fn load_logs(&self) {
        match self.api.logs(self.config.log_limit).await {
            Ok(logs) => self.view.update(|v| v.logs = Some(logs)),
            Err(err) => tracing::warn!(error = %err, "failed to load logs"),
        }
    }

    /// Manual refresh: status and logs.
    pub async fn refresh_data(&self) {
        if !self.live.is_live() {
            return;
        }
        join(self.update(), self.load_logs()).await;
    }

    /// Ping the device and show the latency.
    pub async fn test_connection(&self) {
        if !self.live.is_live() {
            return;
        }
        self.view.update(|v| v.testing = true);
        let status = probe(&self.api).await;
        match &status {
            ConnectionStatus::Connected { latency_ms } => self.notifier.success(format!(
                "Connection OK ({})",
                format_latency(Some(*latency_ms))
            )),
            ConnectionStatus::Disconnected { reason } => self
                .notifier
                .danger(format!("Connection failed: {reason}")),
        }
        self.view.update(|v| {
            v.testing = false;
            v.connection = Some(status);
        });
    }

    /// Ask the device to reboot.
    ///
    /// Returns `true` when the device accepted, after which the front end
    /// should reload itself once [`DashboardConfig::restart_reload_delay`]
    /// has passed.
    pub async fn restart(&self) -> bool {
        if !self.live.is_live() {
            return false;
        }
        self.view.update(|v| v.restarting = true);
        match self.api.restart().await {
            Ok(()) => {
                self.notifier
                    .warning("Device is restarting. The page will reload shortly.");
                true
            }
            Err(err) => {
                self.view.update(|v| v.restarting = false);
                self.notifier.danger(format!("Restart failed: {err}"));
                false
            }
        }
    }
}

impl<A: DeviceApi, N: Notifier> Page for SystemPage<A, N> {
    fn name(&self) -> PageName {
        PageName::System
    }

    fn liveness(&self) -> &Liveness {
        &self.live
    }

    fn refresh_interval(&self) -> Option<Duration> {
        Some(self.config.refresh.system())
    }

    fn render(&self) {
        self.view.set(SystemView::default());
    }

    async fn load(&self) {
        self.refresh_data().await;
    }

    async fn update(&self) {
        let (status, combined) = join(self.api.system_status(), self.api.status()).await;
        self.view.update(|v| {
            match status {
                Ok(status) => v.status = Some(status),
                Err(err) => tracing::warn!(error = %err, "failed to refresh system status"),
            }
            match combined {
                Ok(combined) => v.combined = Some(combined),
                Err(err) => tracing::warn!(error = %err, "failed to refresh combined status"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::PageController;
    use crate::ports::{NoticeLevel, TransportError};
    use crate::testing::Harness;

    fn script(h: &Harness) {
        h.transport.ok(
            "GET /api/system/status",
            r#"{"uptime":90061,"free_memory":51200,"version":"2.0.0","wifi":{"connected":true,"ip":"192.168.1.50","rssi":-48}}"#,
        );
        h.transport.ok(
            "GET /api/status",
            r#"{"cpu_percent":12.5,"memory_free":150,"memory_total":200,"flash_free":1024,"flash_total":4096}"#,
        );
        h.transport.ok(
            "GET /api/system/logs?limit=20",
            r#"[{"level":"ERROR","timestamp":1640995200,"message":"sensor timeout"}]"#,
        );
    }

    fn value(rows: &[InfoRow], label: &str) -> String {
        rows.iter()
            .find(|r| r.label == label)
            .map(|r| r.value.clone())
            .unwrap()
    }

    #[tokio::test]
    async fn should_load_status_and_logs_on_mount() {
        let h = Harness::new();
        script(&h);
        let controller = PageController::new(SystemPage::new(&h.ctx), h.scheduler.clone());

        controller.mount().await;

        let view = controller.page().view.get();
        let info = view.info();
        assert_eq!(value(&info, "Version"), "2.0.0");
        assert_eq!(value(&info, "Uptime"), "1d 1h 1m 1s");
        assert_eq!(value(&info, "Free memory"), "50.00 KB");
        assert_eq!(value(&info, "IP address"), "192.168.1.50");
        let usage = view.usage();
        assert_eq!(value(&usage, "CPU"), "12.5%");
        assert_eq!(value(&usage, "Memory used"), "25.0%");
        assert_eq!(value(&usage, "Flash total"), "4.00 MB");
        let logs = view.log_lines().unwrap();
        assert_eq!(logs[0].class, "log-error");
        assert_eq!(logs[0].time, "2022-01-01 00:00:00");
        assert_eq!(h.scheduler.periods(), vec![Duration::from_secs(10)]);
    }

    #[tokio::test]
    async fn should_not_refetch_logs_on_poll() {
        let h = Harness::new();
        script(&h);
        let controller = PageController::new(SystemPage::new(&h.ctx), h.scheduler.clone());
        controller.mount().await;
        h.transport.clear_requests();

        h.scheduler.fire().await;

        assert_eq!(
            h.transport.sent(),
            vec!["GET /api/system/status", "GET /api/status"]
        );
    }

    #[test]
    fn should_show_placeholders_before_load() {
        let view = SystemView::default();
        assert!(view.info().iter().all(|r| r.value == PLACEHOLDER));
        assert!(view.usage().iter().all(|r| r.value == PLACEHOLDER));
        assert!(view.log_lines().is_none());
        assert_eq!(view.connection_label().1, ColorBucket::Muted);
    }

    #[tokio::test]
    async fn should_record_latency_on_connection_test() {
        let h = Harness::new();
        h.transport.ack("GET /api/system/ping");
        let page = SystemPage::new(&h.ctx);

        page.test_connection().await;

        let view = page.view.get();
        assert!(!view.testing);
        assert!(matches!(
            view.connection,
            Some(ConnectionStatus::Connected { .. })
        ));
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Success));
    }

    #[tokio::test]
    async fn should_report_failed_connection_test() {
        let h = Harness::new();
        h.transport.fail(
            "GET /api/system/ping",
            TransportError::Network("unreachable".to_string()),
        );
        let page = SystemPage::new(&h.ctx);

        page.test_connection().await;

        assert_eq!(
            page.view.get().connection_label(),
            ("Failed".to_string(), ColorBucket::Danger)
        );
    }

    #[tokio::test]
    async fn should_report_restart_outcome() {
        let h = Harness::new();
        let page = SystemPage::new(&h.ctx);

        assert!(!page.restart().await);
        assert!(!page.view.get().restarting);

        h.transport.ack("POST /api/system/restart");
        assert!(page.restart().await);
        assert!(page.view.get().restarting);
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Warning));
    }

    #[tokio::test]
    async fn should_not_contact_device_once_destroyed() {
        let h = Harness::new();
        h.transport.ack("POST /api/system/restart");
        let controller = PageController::new(SystemPage::new(&h.ctx), h.scheduler.clone());
        controller.mount().await;
        controller.destroy();
        h.transport.clear_requests();

        assert!(!controller.page().restart().await);
        controller.page().test_connection().await;
        controller.page().refresh_data().await;

        assert!(h.transport.sent().is_empty());
        assert!(!controller.page().view.get().restarting);
    }
}
