//! WiFi discovery and join.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use minermon_app::ports::DeviceBackend;
use minermon_domain::wifi::{ConnectRequest, WifiNetwork};

use super::Reply;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/scan`
pub async fn scan<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<Vec<WifiNetwork>>, ApiError> {
    let networks = state.device.scan().await?;
    tracing::debug!(count = networks.len(), "wifi scan finished");
    Ok(Reply::Data(networks))
}

/// `POST /api/connect`
pub async fn connect<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> Result<Reply<()>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(ssid = %request.ssid, "joining wifi network");
    state.device.connect(request).await?;
    Ok(Reply::Ack)
}
