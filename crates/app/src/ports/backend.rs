//! Device backend port: the device side of the REST contract.
//!
//! The HTTP adapter serves any implementation under `/api`; the virtual
//! adapter provides an in-memory one for development and end-to-end tests.

use std::future::Future;

use minermon_domain::log::LogEntry;
use minermon_domain::relay::{RelayAction, RelayId, RelayStates};
use minermon_domain::sensor::{NewSensor, SensorConfig, SensorReadings, SensorsConfig};
use minermon_domain::system::{CombinedStatus, DeviceConfig, SystemStatus};
use minermon_domain::wifi::{ConnectRequest, WifiConfig, WifiNetwork};

use crate::error::DeviceError;

/// A device that answers dashboard requests.
pub trait DeviceBackend: Send + Sync + 'static {
    /// Current readings of every sensor.
    fn sensors(&self) -> impl Future<Output = Result<SensorReadings, DeviceError>> + Send;

    /// State of every relay.
    fn relays(&self) -> impl Future<Output = Result<RelayStates, DeviceError>> + Send;

    /// Apply `action` to one relay and return its new state.
    fn control_relay(
        &self,
        id: RelayId,
        action: RelayAction,
    ) -> impl Future<Output = Result<RelayStates, DeviceError>> + Send;

    /// Full configuration, with the WiFi password stripped.
    fn config(&self) -> impl Future<Output = Result<DeviceConfig, DeviceError>> + Send;

    /// Replace the full configuration.
    fn update_config(
        &self,
        config: DeviceConfig,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Replace the WiFi settings.
    fn update_wifi_config(
        &self,
        config: WifiConfig,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Uptime, memory and link telemetry.
    fn system_status(&self) -> impl Future<Output = Result<SystemStatus, DeviceError>> + Send;

    /// Most recent log lines, oldest first, at most `limit`.
    fn logs(&self, limit: usize) -> impl Future<Output = Result<Vec<LogEntry>, DeviceError>> + Send;

    /// Schedule a reboot.
    fn restart(&self) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Combined CPU, memory and flash usage.
    fn status(&self) -> impl Future<Output = Result<CombinedStatus, DeviceError>> + Send;

    /// Visible WiFi networks.
    fn scan(&self) -> impl Future<Output = Result<Vec<WifiNetwork>, DeviceError>> + Send;

    /// Join a WiFi network.
    fn connect(
        &self,
        request: ConnectRequest,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Configured virtual sensors and global sensor settings.
    fn sensors_config(&self) -> impl Future<Output = Result<SensorsConfig, DeviceError>> + Send;

    /// Register a new sensor.
    fn add_sensor(
        &self,
        sensor: NewSensor,
    ) -> impl Future<Output = Result<SensorConfig, DeviceError>> + Send;

    /// Remove a sensor by id.
    fn remove_sensor(&self, id: String) -> impl Future<Output = Result<(), DeviceError>> + Send;
}
