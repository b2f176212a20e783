//! Device and WiFi configuration.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use minermon_app::error::DeviceError;
use minermon_app::ports::DeviceBackend;
use minermon_domain::system::DeviceConfig;
use minermon_domain::wifi::WifiConfig;

use super::Reply;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/config`
pub async fn get<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<DeviceConfig>, ApiError> {
    Ok(Reply::Data(state.device.config().await?))
}

/// `POST /api/config`
pub async fn update<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    payload: Result<Json<DeviceConfig>, JsonRejection>,
) -> Result<Reply<()>, ApiError> {
    let Json(config) = payload?;
    state.device.update_config(config).await?;
    Ok(Reply::Ack)
}

/// `GET /api/config/wifi`
pub async fn get_wifi<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<WifiConfig>, ApiError> {
    let wifi = state
        .device
        .config()
        .await?
        .wifi
        .ok_or_else(|| DeviceError::NotFound {
            entity: "WiFi configuration",
            id: "wifi".to_string(),
        })?;
    Ok(Reply::Data(wifi))
}

/// `POST /api/config/wifi`
pub async fn update_wifi<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    payload: Result<Json<WifiConfig>, JsonRejection>,
) -> Result<Reply<()>, ApiError> {
    let Json(config) = payload?;
    tracing::info!(ssid = %config.ssid, dhcp = config.uses_dhcp(), "updating wifi settings");
    state.device.update_wifi_config(config).await?;
    Ok(Reply::Ack)
}
