//! Dashboard: sensors, relays and system summary on one page.

use std::rc::Rc;
use std::time::Duration;

use futures_util::future::join3;

use minermon_domain::format::{
    PLACEHOLDER, format_optional_bytes, format_optional_uptime, format_rssi,
};
use minermon_domain::relay::{RelayAction, RelayId, RelayStates};
use minermon_domain::sensor::{SensorKind, SensorReadings};
use minermon_domain::system::SystemStatus;

use super::relay_control::{self, PendingRelays};
use super::{MetricView, metrics};
use crate::config::DashboardConfig;
use crate::context::AppContext;
use crate::lifecycle::{Liveness, Page};
use crate::navigator::PageName;
use crate::ports::{DeviceApi, Notifier};
use crate::view::ViewCell;

/// What the dashboard shows. `None` means "never fetched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub sensors: Option<SensorReadings>,
    pub relays: Option<RelayStates>,
    pub system: Option<SystemStatus>,
}

impl DashboardView {
    #[must_use]
    pub fn metrics(&self, kind: SensorKind) -> Vec<MetricView> {
        metrics(self.sensors.as_ref(), kind)
    }

    /// Relay state for the quick toggles, `None` while unknown.
    #[must_use]
    pub fn relay(&self, id: RelayId) -> Option<bool> {
        self.relays.as_ref().and_then(|r| r.get(id))
    }

    #[must_use]
    pub fn uptime(&self) -> String {
        format_optional_uptime(self.system.as_ref().and_then(|s| s.uptime))
    }

    #[must_use]
    pub fn free_memory(&self) -> String {
        format_optional_bytes(self.system.as_ref().and_then(|s| s.free_memory))
    }

    #[must_use]
    pub fn wifi(&self) -> String {
        match &self.system {
            Some(s) if s.wifi.connected => format!("Connected ({})", format_rssi(s.wifi.rssi)),
            Some(_) => "Disconnected".to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }
}

/// Polls sensors, relays and system status together.
pub struct DashboardPage<A, N> {
    api: A,
    notifier: N,
    config: Rc<DashboardConfig>,
    live: Liveness,
    pub view: ViewCell<DashboardView>,
    pub pending: PendingRelays,
}

impl<A: DeviceApi, N: Notifier> DashboardPage<A, N> {
    pub fn new<S>(ctx: &AppContext<A, S, N>) -> Self {
        Self {
            api: ctx.api.clone(),
            notifier: ctx.notifier.clone(),
            config: Rc::clone(&ctx.config),
            live: Liveness::default(),
            view: ViewCell::default(),
            pending: PendingRelays::default(),
        }
    }

    /// Toggle a relay, then refresh everything while the page is still shown.
    pub async fn toggle(&self, id: RelayId) {
        if !self.live.is_live() {
            return;
        }
        if relay_control::apply(&self.api, &self.notifier, &self.pending, id, RelayAction::Toggle)
            .await
            && self.live.is_live()
        {
            self.update().await;
        }
    }
}

impl<A: DeviceApi, N: Notifier> Page for DashboardPage<A, N> {
    fn name(&self) -> PageName {
        PageName::Dashboard
    }

    fn liveness(&self) -> &Liveness {
        &self.live
    }

    fn refresh_interval(&self) -> Option<Duration> {
        Some(self.config.refresh.dashboard())
    }

    fn render(&self) {
        self.view.set(DashboardView::default());
    }

    async fn update(&self) {
        let (sensors, relays, system) = join3(
            self.api.get_sensors(),
            self.api.get_relays(),
            self.api.system_status(),
        )
        .await;

        self.view.update(|view| {
            match sensors {
                Ok(sensors) => view.sensors = Some(sensors),
                Err(err) => tracing::warn!(error = %err, "failed to refresh sensors"),
            }
            match relays {
                Ok(relays) => view.relays = Some(relays),
                Err(err) => tracing::warn!(error = %err, "failed to refresh relays"),
            }
            match system {
                Ok(system) => view.system = Some(system),
                Err(err) => tracing::warn!(error = %err, "failed to refresh system status"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{NoticeLevel, TransportError};
    use crate::testing::Harness;
    use crate::lifecycle::PageController;
    use futures_util::FutureExt;

    fn relay(i: u8) -> RelayId {
        RelayId::try_from(i).unwrap()
    }

    fn script_all(h: &Harness) {
        h.transport.ok(
            "GET /api/sensors",
            r#"{"temperature":{"sensor1":22.0},"humidity":{"sensor1":50.0},"current":{"channel1":1.5}}"#,
        );
        h.transport.ok("GET /api/relays", r#"{"relay1":true,"relay2":false}"#);
        h.transport.ok(
            "GET /api/system/status",
            r#"{"uptime":3725,"free_memory":2048,"wifi":{"connected":true,"rssi":-55}}"#,
        );
    }

    #[test]
    fn should_show_placeholders_after_render() {
        let h = Harness::new();
        let page = DashboardPage::new(&h.ctx);

        page.render();

        let view = page.view.get();
        assert_eq!(view.uptime(), "--");
        assert_eq!(view.wifi(), "--");
        assert_eq!(view.relay(relay(0)), None);
    }

    #[tokio::test]
    async fn should_fill_every_section_on_update() {
        let h = Harness::new();
        script_all(&h);
        let page = DashboardPage::new(&h.ctx);

        page.update().await;

        let view = page.view.get();
        assert_eq!(view.metrics(SensorKind::Temperature)[0].value, "22.0");
        assert_eq!(view.relay(relay(0)), Some(true));
        assert_eq!(view.uptime(), "1h 2m 5s");
        assert_eq!(view.free_memory(), "2.00 KB");
        assert_eq!(view.wifi(), "Connected (-55 dBm)");
    }

    #[tokio::test]
    async fn should_keep_previous_values_when_one_fetch_fails() {
        let h = Harness::new();
        script_all(&h);
        let page = DashboardPage::new(&h.ctx);
        page.update().await;

        h.transport.fail(
            "GET /api/sensors",
            TransportError::Timeout(Duration::from_secs(10)),
        );
        h.transport.ok("GET /api/relays", r#"{"relay1":false}"#);
        page.update().await;

        let view = page.view.get();
        assert_eq!(view.metrics(SensorKind::Current)[0].value, "1.50");
        assert_eq!(view.relay(relay(0)), Some(false));
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn should_refresh_after_successful_toggle() {
        let h = Harness::new();
        script_all(&h);
        h.transport.ok("POST /api/relays/1", r#"{"relay2":true}"#);
        let page = DashboardPage::new(&h.ctx);

        page.toggle(relay(1)).await;

        assert_eq!(
            h.transport.sent()[0..2],
            ["POST /api/relays/1", "GET /api/sensors"]
        );
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Success));
        assert!(page.pending.with(std::collections::BTreeSet::is_empty));
    }

    #[tokio::test]
    async fn should_not_refresh_after_failed_toggle() {
        let h = Harness::new();
        let page = DashboardPage::new(&h.ctx);

        page.toggle(relay(1)).await;

        assert_eq!(h.transport.sent(), vec!["POST /api/relays/1"]);
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Danger));
    }

    #[tokio::test]
    async fn should_skip_refresh_when_destroyed_during_toggle() {
        let h = Harness::new();
        script_all(&h);
        h.transport.ok("POST /api/relays/1", r#"{"relay2":true}"#);
        let release = h.transport.hold("POST /api/relays/1");
        let controller = PageController::new(DashboardPage::new(&h.ctx), h.scheduler.clone());
        controller.mount().await;
        h.transport.clear_requests();

        let mut toggle = Box::pin(controller.page().toggle(relay(1)));
        assert!((&mut toggle).now_or_never().is_none());
        controller.destroy();
        release.notify_one();
        toggle.await;

        assert_eq!(h.transport.sent(), vec!["POST /api/relays/1"]);
        assert_eq!(h.scheduler.active(), 0);
    }
}
