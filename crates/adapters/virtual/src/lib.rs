//! # minermon-adapter-virtual
//!
//! In-memory stand-in for the monitor firmware, used by the development
//! server and end-to-end tests.
//!
//! ## Simulated hardware
//!
//! | Part | Behaviour |
//! |------|-----------|
//! | 2 DHT sensors | Slow temperature and humidity waves; the second one drops out periodically |
//! | 4 relays | Start off; respond to `on` / `off` / `toggle` |
//! | 4 current clamps | Follow the relay with the same number |
//! | WiFi | A fixed scan list; `connect` and config updates rewrite the stored settings |
//! | Sensor registry | Up to `max_sensors` entries, ids are random UUIDs |
//!
//! ## Dependency rule
//!
//! Depends on `minermon-app` (port traits) and `minermon-domain` only.

mod simulation;

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use minermon_app::error::DeviceError;
use minermon_app::ports::DeviceBackend;
use minermon_domain::log::{LogEntry, LogLevel};
use minermon_domain::relay::{RelayAction, RelayId, RelayStates};
use minermon_domain::sensor::{
    NewSensor, SensorConfig, SensorReadings, SensorSettings, SensorsConfig,
};
use minermon_domain::system::{CombinedStatus, DeviceConfig, SystemStatus, WifiStatus};
use minermon_domain::time::{self, Timestamp};
use minermon_domain::wifi::{Addressing, ConnectRequest, WifiConfig, WifiNetwork, sort_by_signal};

pub use simulation::{CURRENT_CHANNELS, DHT_SENSORS};

const FIRMWARE_VERSION: &str = "2.1.0-virtual";
const DEFAULT_SSID: &str = "MonitorMiner";
const DHCP_ADDRESS: &str = "192.168.4.1";
const SIGNAL_RSSI: i32 = -58;
const LOG_CAPACITY: usize = 100;

/// Heap, in bytes. Free memory shrinks a little with every sensor.
const HEAP_TOTAL: u64 = 320 * 1024;
const HEAP_USED_BASE: u64 = 180 * 1024;
const HEAP_PER_SENSOR: u64 = 2 * 1024;
/// Flash, in KiB.
const FLASH_TOTAL_KIB: u64 = 4096;
const FLASH_USED_KIB: u64 = 1536;

struct DeviceState {
    booted_at: Timestamp,
    samples: u64,
    relays: RelayStates,
    config: DeviceConfig,
    logs: VecDeque<LogEntry>,
    sensors: Vec<SensorConfig>,
    settings: SensorSettings,
}

impl DeviceState {
    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            level,
            timestamp: unix_seconds(time::now()),
            message: message.into(),
        });
    }

    fn wifi(&self) -> Option<&WifiConfig> {
        self.config.wifi.as_ref()
    }

    fn ip(&self) -> Option<String> {
        self.wifi().map(|wifi| match &wifi.addressing {
            Addressing::Dhcp => DHCP_ADDRESS.to_string(),
            Addressing::Static { ip, .. } => ip.clone(),
        })
    }

    fn uptime(&self) -> u64 {
        time::elapsed_millis(self.booted_at, time::now()) / 1000
    }

    fn free_memory(&self) -> u64 {
        let used = HEAP_USED_BASE + HEAP_PER_SENSOR * self.sensors.len() as u64;
        HEAP_TOTAL.saturating_sub(used)
    }
}

#[allow(clippy::cast_precision_loss)]
fn unix_seconds(at: Timestamp) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

/// A simulated monitor board.
pub struct VirtualDevice {
    state: Mutex<DeviceState>,
}

impl Default for VirtualDevice {
    fn default() -> Self {
        let mut state = DeviceState {
            booted_at: time::now(),
            samples: 0,
            relays: RelayId::all().map(|id| (id, false)).collect(),
            config: DeviceConfig {
                wifi: Some(WifiConfig {
                    ssid: DEFAULT_SSID.to_string(),
                    password: Some("minermon".to_string()),
                    addressing: Addressing::Dhcp,
                }),
                extra: serde_json::Map::from_iter([(
                    "device_name".to_string(),
                    serde_json::Value::String("Monitor Miner".to_string()),
                )]),
            },
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            sensors: Vec::new(),
            settings: SensorSettings::default(),
        };
        state.log(LogLevel::Info, "System started");
        Self {
            state: Mutex::new(state),
        }
    }
}

impl VirtualDevice {
    /// A device that accepts at most `max_sensors` registered sensors.
    #[must_use]
    pub fn with_max_sensors(max_sensors: usize) -> Self {
        let device = Self::default();
        device.lock_state().settings.max_sensors = max_sensors;
        device
    }

    fn lock_state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceBackend for VirtualDevice {
    async fn sensors(&self) -> Result<SensorReadings, DeviceError> {
        let mut state = self.lock_state();
        state.samples += 1;
        Ok(simulation::readings(
            state.samples,
            &state.relays,
            unix_seconds(time::now()),
        ))
    }

    async fn relays(&self) -> Result<RelayStates, DeviceError> {
        Ok(self.lock_state().relays.clone())
    }

    async fn control_relay(
        &self,
        id: RelayId,
        action: RelayAction,
    ) -> Result<RelayStates, DeviceError> {
        let mut state = self.lock_state();
        let next = action.apply(state.relays.get(id).unwrap_or(false));
        state.relays.set(id, next);
        let label = if next { "ON" } else { "OFF" };
        state.log(LogLevel::Info, format!("{id} set {label}"));
        tracing::debug!(relay = id.index(), state = next, "relay switched");

        let mut single = RelayStates::new();
        single.set(id, next);
        Ok(single)
    }

    async fn config(&self) -> Result<DeviceConfig, DeviceError> {
        let mut config = self.lock_state().config.clone();
        if let Some(wifi) = config.wifi.as_mut() {
            wifi.password = None;
        }
        Ok(config)
    }

    async fn update_config(&self, mut config: DeviceConfig) -> Result<(), DeviceError> {
        if let Some(wifi) = config.wifi.as_ref() {
            wifi.validate()?;
        }
        let mut state = self.lock_state();
        if let (Some(next), Some(current)) = (config.wifi.as_mut(), state.wifi())
            && next.password.is_none()
        {
            next.password.clone_from(&current.password);
        }
        state.config = config;
        state.log(LogLevel::Info, "Configuration updated");
        Ok(())
    }

    async fn update_wifi_config(&self, mut config: WifiConfig) -> Result<(), DeviceError> {
        config.validate()?;
        let mut state = self.lock_state();
        if config.password.is_none() {
            config.password = state.wifi().and_then(|w| w.password.clone());
        }
        let message = format!("WiFi settings updated for {}", config.ssid);
        state.config.wifi = Some(config);
        state.log(LogLevel::Info, message);
        Ok(())
    }

    async fn system_status(&self) -> Result<SystemStatus, DeviceError> {
        let state = self.lock_state();
        Ok(SystemStatus {
            uptime: Some(state.uptime()),
            free_memory: Some(state.free_memory()),
            version: Some(FIRMWARE_VERSION.to_string()),
            wifi: WifiStatus {
                connected: state.wifi().is_some(),
                ip: state.ip(),
                rssi: state.wifi().map(|_| SIGNAL_RSSI),
            },
        })
    }

    async fn logs(&self, limit: usize) -> Result<Vec<LogEntry>, DeviceError> {
        let state = self.lock_state();
        let skip = state.logs.len().saturating_sub(limit);
        Ok(state.logs.iter().skip(skip).cloned().collect())
    }

    async fn restart(&self) -> Result<(), DeviceError> {
        let mut state = self.lock_state();
        state.log(LogLevel::Warning, "Restart requested");
        state.booted_at = time::now();
        state.samples = 0;
        for id in RelayId::all() {
            state.relays.set(id, false);
        }
        state.log(LogLevel::Info, "System started");
        tracing::info!("virtual device restarted");
        Ok(())
    }

    async fn status(&self) -> Result<CombinedStatus, DeviceError> {
        let mut state = self.lock_state();
        state.samples += 1;
        Ok(CombinedStatus {
            version: Some(FIRMWARE_VERSION.to_string()),
            ip: state.ip(),
            uptime: Some(state.uptime()),
            cpu_percent: Some(simulation::cpu_percent(state.samples)),
            memory_free: Some(state.free_memory() / 1024),
            memory_total: Some(HEAP_TOTAL / 1024),
            flash_free: Some(FLASH_TOTAL_KIB - FLASH_USED_KIB),
            flash_total: Some(FLASH_TOTAL_KIB),
        })
    }

    async fn scan(&self) -> Result<Vec<WifiNetwork>, DeviceError> {
        let mut networks = vec![
            network("Farm-Office", -71, "WPA2"),
            network(DEFAULT_SSID, SIGNAL_RSSI, "WPA2"),
            network("Guest", -84, "Open"),
            network("Barn-AP", -49, "WPA2"),
        ];
        sort_by_signal(&mut networks);
        Ok(networks)
    }

    async fn connect(&self, request: ConnectRequest) -> Result<(), DeviceError> {
        request.validate()?;
        let mut state = self.lock_state();
        let addressing = state
            .wifi()
            .map_or(Addressing::Dhcp, |w| w.addressing.clone());
        let password = (!request.password.is_empty()).then_some(request.password);
        let message = format!("Connecting to {}", request.ssid);
        state.config.wifi = Some(WifiConfig {
            ssid: request.ssid,
            password,
            addressing,
        });
        state.log(LogLevel::Info, message);
        Ok(())
    }

    async fn sensors_config(&self) -> Result<SensorsConfig, DeviceError> {
        let state = self.lock_state();
        Ok(SensorsConfig {
            sensors: state.sensors.clone(),
            settings: state.settings.clone(),
        })
    }

    async fn add_sensor(&self, sensor: NewSensor) -> Result<SensorConfig, DeviceError> {
        sensor.validate()?;
        let mut state = self.lock_state();
        if state.sensors.len() >= state.settings.max_sensors {
            return Err(DeviceError::LimitReached(format!(
                "at most {} sensors can be configured",
                state.settings.max_sensors
            )));
        }
        let config = SensorConfig {
            id: uuid::Uuid::new_v4().simple().to_string(),
            sensor,
            enabled: true,
        };
        state.log(LogLevel::Info, format!("Sensor added: {}", config.sensor.name));
        state.sensors.push(config.clone());
        Ok(config)
    }

    async fn remove_sensor(&self, id: String) -> Result<(), DeviceError> {
        let mut state = self.lock_state();
        let Some(position) = state.sensors.iter().position(|s| s.id == id) else {
            return Err(DeviceError::NotFound {
                entity: "Sensor",
                id,
            });
        };
        let removed = state.sensors.remove(position);
        state.log(LogLevel::Info, format!("Sensor removed: {}", removed.sensor.name));
        Ok(())
    }
}

fn network(ssid: &str, rssi: i32, security: &str) -> WifiNetwork {
    WifiNetwork {
        ssid: ssid.to_string(),
        rssi,
        security: security.to_string(),
    }
}
