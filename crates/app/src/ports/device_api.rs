//! Device API port: every REST operation the dashboard performs.

use std::future::Future;

use minermon_domain::log::LogEntry;
use minermon_domain::relay::{RelayAction, RelayId, RelayStates};
use minermon_domain::sensor::{
    NewSensor, ReadingGroup, SensorConfig, SensorKind, SensorReadings, SensorsConfig,
};
use minermon_domain::system::{CombinedStatus, DeviceConfig, Pong, SystemStatus};
use minermon_domain::wifi::{ConnectRequest, WifiConfig, WifiNetwork};

use crate::error::ApiError;

/// Typed access to the device.
///
/// Implemented by [`HttpDeviceApi`](crate::client::HttpDeviceApi). No call
/// is retried; the caller decides what a failure means for the view.
pub trait DeviceApi: Clone + 'static {
    /// `GET /api/sensors`
    fn get_sensors(&self) -> impl Future<Output = Result<SensorReadings, ApiError>>;

    /// `GET /api/sensors/{kind}`
    fn get_sensor_kind(
        &self,
        kind: SensorKind,
    ) -> impl Future<Output = Result<ReadingGroup, ApiError>>;

    /// `GET /api/relays`
    fn get_relays(&self) -> impl Future<Output = Result<RelayStates, ApiError>>;

    /// `GET /api/relays/{id}`, answered with a single-key state map.
    fn get_relay(&self, id: RelayId) -> impl Future<Output = Result<RelayStates, ApiError>>;

    /// `POST /api/relays/{id}` with `{action}`; answers the relay's new state.
    fn control_relay(
        &self,
        id: RelayId,
        action: RelayAction,
    ) -> impl Future<Output = Result<RelayStates, ApiError>>;

    /// `GET /api/config`
    fn get_config(&self) -> impl Future<Output = Result<DeviceConfig, ApiError>>;

    /// `POST /api/config`
    fn update_config(&self, config: &DeviceConfig)
    -> impl Future<Output = Result<(), ApiError>>;

    /// `GET /api/config/wifi`
    fn get_wifi_config(&self) -> impl Future<Output = Result<WifiConfig, ApiError>>;

    /// `POST /api/config/wifi`
    fn update_wifi_config(
        &self,
        config: &WifiConfig,
    ) -> impl Future<Output = Result<(), ApiError>>;

    /// `GET /api/system/status`
    fn system_status(&self) -> impl Future<Output = Result<SystemStatus, ApiError>>;

    /// `GET /api/system/logs?limit=N`
    fn logs(&self, limit: usize) -> impl Future<Output = Result<Vec<LogEntry>, ApiError>>;

    /// `GET /api/system/ping`
    fn ping(&self) -> impl Future<Output = Result<Pong, ApiError>>;

    /// `POST /api/system/restart`
    fn restart(&self) -> impl Future<Output = Result<(), ApiError>>;

    /// `GET /api/status`
    fn status(&self) -> impl Future<Output = Result<CombinedStatus, ApiError>>;

    /// `GET /api/scan`
    fn scan_networks(&self) -> impl Future<Output = Result<Vec<WifiNetwork>, ApiError>>;

    /// `POST /api/connect`
    fn connect(&self, request: &ConnectRequest) -> impl Future<Output = Result<(), ApiError>>;

    /// `GET /api/sensors/config`
    fn sensors_config(&self) -> impl Future<Output = Result<SensorsConfig, ApiError>>;

    /// `POST /api/sensors/add`
    fn add_sensor(
        &self,
        sensor: &NewSensor,
    ) -> impl Future<Output = Result<SensorConfig, ApiError>>;

    /// `POST /api/sensors/remove` with `{id}`
    fn remove_sensor(&self, id: &str) -> impl Future<Output = Result<(), ApiError>>;
}
