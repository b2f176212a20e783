//! Settings page: WiFi configuration, network scan and virtual sensors.
//!
//! Nothing here polls. The form is loaded once per visit and submitted
//! wholesale; edits stay local until saved.

use std::time::Duration;

use futures_util::future::join;

use minermon_domain::error::ValidationError;
use minermon_domain::sensor::{NewSensor, SensorsConfig};
use minermon_domain::wifi::{
    Addressing, ConnectRequest, DEFAULT_SUBNET_MASK, WifiConfig, WifiNetwork, sort_by_signal,
};

use crate::context::AppContext;
use crate::lifecycle::{Liveness, Page};
use crate::navigator::PageName;
use crate::ports::{DeviceApi, Notifier};
use crate::view::ViewCell;

/// Editable WiFi form fields, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiForm {
    pub ssid: String,
    /// Left empty to keep the current password.
    pub password: String,
    pub use_dhcp: bool,
    pub static_ip: String,
    pub subnet_mask: String,
    pub gateway: String,
}

impl Default for WifiForm {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            use_dhcp: true,
            static_ip: String::new(),
            subnet_mask: DEFAULT_SUBNET_MASK.to_string(),
            gateway: String::new(),
        }
    }
}

impl WifiForm {
    /// Fill the form from the device's settings. The password is never shown.
    #[must_use]
    pub fn from_config(config: &WifiConfig) -> Self {
        let mut form = Self {
            ssid: config.ssid.clone(),
            ..Self::default()
        };
        match &config.addressing {
            Addressing::Dhcp => form.use_dhcp = true,
            Addressing::Static {
                ip,
                subnet_mask,
                gateway,
            } => {
                form.use_dhcp = false;
                form.static_ip.clone_from(ip);
                form.subnet_mask.clone_from(subnet_mask);
                form.gateway.clone_from(gateway);
            }
        }
        form
    }

    /// Build the settings to submit. Static fields are only checked (and
    /// only sent) when DHCP is off.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn to_config(&self) -> Result<WifiConfig, ValidationError> {
        let addressing = if self.use_dhcp {
            Addressing::Dhcp
        } else {
            Addressing::Static {
                ip: self.static_ip.trim().to_string(),
                subnet_mask: self.subnet_mask.trim().to_string(),
                gateway: self.gateway.trim().to_string(),
            }
        };
        let config = WifiConfig {
            ssid: self.ssid.trim().to_string(),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            addressing,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsView {
    pub form: WifiForm,
    pub loaded: bool,
    pub saving: bool,
    pub scanning: bool,
    pub connecting: bool,
    pub networks: Vec<WifiNetwork>,
    pub sensors: Option<SensorsConfig>,
}

pub struct SettingsPage<A, N> {
    api: A,
    notifier: N,
    live: Liveness,
    pub view: ViewCell<SettingsView>,
}

impl<A: DeviceApi, N: Notifier> SettingsPage<A, N> {
    pub fn new<S>(ctx: &AppContext<A, S, N>) -> Self {
        Self {
            api: ctx.api.clone(),
            notifier: ctx.notifier.clone(),
            live: Liveness::default(),
            view: ViewCell::default(),
        }
    }

    /// Apply a local edit to the form.
    pub fn edit(&self, f: impl FnOnce(&mut WifiForm)) {
        self.view.update(|v| f(&mut v.form));
    }

    /// Validate and submit the WiFi form.
    pub async fn save_wifi(&self) {
        if !self.live.is_live() {
            return;
        }
        let config = match self.view.with(|v| v.form.to_config()) {
            Ok(config) => config,
            Err(err) => {
                self.notifier.danger(err.to_string());
                return;
            }
        };

        self.view.update(|v| v.saving = true);
        let result = self.api.update_wifi_config(&config).await;
        self.view.update(|v| v.saving = false);

        match result {
            Ok(()) => self
                .notifier
                .success("WiFi settings saved. Restart the device to apply them."),
            Err(err) => self
                .notifier
                .danger(format!("Failed to save WiFi settings: {err}")),
        }
    }

    /// Scan for networks, strongest first.
    pub async fn scan(&self) {
        if !self.live.is_live() {
            return;
        }
        self.view.update(|v| v.scanning = true);
        let result = self.api.scan_networks().await;
        self.view.update(|v| {
            v.scanning = false;
            if let Ok(networks) = &result {
                v.networks.clone_from(networks);
                sort_by_signal(&mut v.networks);
            }
        });
        if let Err(err) = result {
            self.notifier.danger(format!("WiFi scan failed: {err}"));
        }
    }

    /// Join `ssid` and copy it into the form.
    pub async fn connect(&self, ssid: &str, password: &str) {
        if !self.live.is_live() {
            return;
        }
        let request = ConnectRequest {
            ssid: ssid.to_string(),
            password: password.to_string(),
        };
        if let Err(err) = request.validate() {
            self.notifier.danger(err.to_string());
            return;
        }

        self.view.update(|v| v.connecting = true);
        let result = self.api.connect(&request).await;
        self.view.update(|v| {
            v.connecting = false;
            if result.is_ok() {
                v.form.ssid.clone_from(&request.ssid);
            }
        });

        match result {
            Ok(()) => self
                .notifier
                .success(format!("Connecting to {}...", request.ssid)),
            Err(err) => self
                .notifier
                .danger(format!("Failed to connect to {}: {err}", request.ssid)),
        }
    }

    /// Validate and register a sensor, then reload the list.
    pub async fn add_sensor(&self, sensor: NewSensor) {
        if !self.live.is_live() {
            return;
        }
        if let Err(err) = sensor.validate() {
            self.notifier.danger(err.to_string());
            return;
        }
        match self.api.add_sensor(&sensor).await {
            Ok(added) => {
                self.notifier
                    .success(format!("Sensor {} added", added.sensor.name));
                self.load_sensors().await;
            }
            Err(err) => self.notifier.danger(format!("Failed to add sensor: {err}")),
        }
    }

    pub async fn remove_sensor(&self, id: &str) {
        if !self.live.is_live() {
            return;
        }
        match self.api.remove_sensor(id).await {
            Ok(()) => {
                self.notifier.success("Sensor removed");
                self.load_sensors().await;
            }
            Err(err) => self
                .notifier
                .danger(format!("Failed to remove sensor: {err}")),
        }
    }

    /// Reload the registry, unless the page left while the change was sent.
    async fn load_sensors(&self) {
        if !self.live.is_live() {
            return;
        }
        match self.api.sensors_config().await {
            Ok(sensors) => self.view.update(|v| v.sensors = Some(sensors)),
            Err(err) => tracing::warn!(error = %err, "failed to load sensor configuration"),
        }
    }
}

impl<A: DeviceApi, N: Notifier> Page for SettingsPage<A, N> {
    fn name(&self) -> PageName {
        PageName::Settings
    }

    fn liveness(&self) -> &Liveness {
        &self.live
    }

    fn refresh_interval(&self) -> Option<Duration> {
        None
    }

    fn render(&self) {
        self.view.set(SettingsView::default());
    }

    async fn update(&self) {
        let (config, sensors) = join(self.api.get_config(), self.api.sensors_config()).await;

        match config {
            Ok(config) => {
                let form = config
                    .wifi
                    .as_ref()
                    .map(WifiForm::from_config)
                    .unwrap_or_default();
                self.view.update(|v| {
                    v.form = form;
                    v.loaded = true;
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load configuration");
                self.notifier
                    .danger(format!("Failed to load settings: {err}"));
            }
        }
        match sensors {
            Ok(sensors) => self.view.update(|v| v.sensors = Some(sensors)),
            Err(err) => tracing::warn!(error = %err, "failed to load sensor configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoticeLevel;
    use crate::testing::Harness;
    use crate::lifecycle::PageController;
    use futures_util::FutureExt;
    use minermon_domain::sensor::SensorModel;
    use serde_json::Value;

    #[tokio::test]
    async fn should_fill_form_from_device_config() {
        let h = Harness::new();
        h.transport.ok(
            "GET /api/config",
            r#"{"wifi":{"ssid":"farm","use_dhcp":false,"static_ip":"192.168.1.50","gateway":"192.168.1.1"},"mqtt":{}}"#,
        );
        h.transport.ok("GET /api/sensors/config", r#"{"sensors":[]}"#);
        let page = SettingsPage::new(&h.ctx);

        page.load().await;

        let view = page.view.get();
        assert!(view.loaded);
        assert_eq!(view.form.ssid, "farm");
        assert!(!view.form.use_dhcp);
        assert_eq!(view.form.subnet_mask, "255.255.255.0");
        assert_eq!(view.form.password, "");
        assert_eq!(view.sensors.unwrap().settings.max_sensors, 10);
    }

    #[tokio::test]
    async fn should_notify_when_config_cannot_be_loaded() {
        let h = Harness::new();
        let page = SettingsPage::new(&h.ctx);

        page.load().await;

        assert!(!page.view.get().loaded);
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Danger));
    }

    #[tokio::test]
    async fn should_reject_invalid_static_ip_without_request() {
        let h = Harness::new();
        let page = SettingsPage::new(&h.ctx);
        page.edit(|f| {
            f.ssid = "farm".to_string();
            f.use_dhcp = false;
            f.static_ip = "192.168.1.256".to_string();
            f.gateway = "192.168.1.1".to_string();
        });

        page.save_wifi().await;

        assert!(h.transport.requests().is_empty());
        let (level, message) = h.notifier.last().unwrap();
        assert_eq!(level, NoticeLevel::Danger);
        assert!(message.contains("static_ip"));
    }

    #[tokio::test]
    async fn should_submit_dhcp_form_without_static_fields() {
        let h = Harness::new();
        h.transport.ack("POST /api/config/wifi");
        let page = SettingsPage::new(&h.ctx);
        page.edit(|f| {
            f.ssid = "farm".to_string();
            f.static_ip = "not-an-ip".to_string();
        });

        page.save_wifi().await;

        let body: Value =
            serde_json::from_str(h.transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["ssid"], "farm");
        assert_eq!(body["use_dhcp"], true);
        assert!(body.get("static_ip").is_none());
        assert!(body.get("password").is_none());
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Success));
        assert!(!page.view.get().saving);
    }

    #[tokio::test]
    async fn should_sort_scan_results_by_signal() {
        let h = Harness::new();
        h.transport.ok(
            "GET /api/scan",
            r#"[{"ssid":"weak","rssi":-82,"security":"WPA2"},{"ssid":"strong","rssi":-41,"security":"WPA2"}]"#,
        );
        let page = SettingsPage::new(&h.ctx);

        page.scan().await;

        let view = page.view.get();
        assert!(!view.scanning);
        assert_eq!(view.networks[0].ssid, "strong");
    }

    #[tokio::test]
    async fn should_copy_ssid_into_form_after_connect() {
        let h = Harness::new();
        h.transport.ack("POST /api/connect");
        let page = SettingsPage::new(&h.ctx);

        page.connect("barn", "secret").await;

        assert_eq!(page.view.get().form.ssid, "barn");
        assert_eq!(
            h.notifier.last(),
            Some((NoticeLevel::Success, "Connecting to barn...".to_string()))
        );
    }

    #[tokio::test]
    async fn should_reject_sensor_on_wrong_pin() {
        let h = Harness::new();
        let page = SettingsPage::new(&h.ctx);

        page.add_sensor(NewSensor {
            model: SensorModel::Current,
            name: "Miner 1".to_string(),
            environment: None,
            gpio: 4,
            calibration: None,
            relay: None,
            current: None,
        })
        .await;

        assert!(h.transport.requests().is_empty());
        assert_eq!(
            h.notifier.last().map(|n| n.1),
            Some("GPIO 4 is not available for Current".to_string())
        );
    }

    #[tokio::test]
    async fn should_reload_sensor_list_after_removal() {
        let h = Harness::new();
        h.transport.ack("POST /api/sensors/remove");
        h.transport.ok("GET /api/sensors/config", r#"{"sensors":[]}"#);
        let page = SettingsPage::new(&h.ctx);

        page.remove_sensor("abc").await;

        assert_eq!(
            h.transport.sent(),
            vec!["POST /api/sensors/remove", "GET /api/sensors/config"]
        );
        assert!(page.view.get().sensors.is_some());
    }

    #[tokio::test]
    async fn should_not_reload_sensors_when_destroyed_during_removal() {
        let h = Harness::new();
        h.transport.ack("POST /api/sensors/remove");
        h.transport.ok("GET /api/sensors/config", r#"{"sensors":[]}"#);
        let release = h.transport.hold("POST /api/sensors/remove");
        let controller = PageController::new(SettingsPage::new(&h.ctx), h.scheduler.clone());
        controller.mount().await;
        h.transport.clear_requests();

        let mut removal = Box::pin(controller.page().remove_sensor("abc"));
        assert!((&mut removal).now_or_never().is_none());
        controller.destroy();
        release.notify_one();
        removal.await;

        assert_eq!(h.transport.sent(), vec!["POST /api/sensors/remove"]);
    }

    #[tokio::test]
    async fn should_ignore_form_actions_once_destroyed() {
        let h = Harness::new();
        let controller = PageController::new(SettingsPage::new(&h.ctx), h.scheduler.clone());
        controller.mount().await;
        controller.destroy();
        h.transport.clear_requests();
        let page = controller.page();
        page.edit(|f| f.ssid = "farm".to_string());

        page.save_wifi().await;
        page.scan().await;
        page.connect("barn", "secret").await;

        assert!(h.transport.sent().is_empty());
    }
}
