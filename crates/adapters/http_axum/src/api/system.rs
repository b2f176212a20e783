//! Telemetry, logs, liveness and reboot.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use minermon_app::ports::DeviceBackend;
use minermon_domain::log::LogEntry;
use minermon_domain::system::{CombinedStatus, Pong, SystemStatus};
use minermon_domain::time;

use super::Reply;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LOG_LIMIT: usize = 20;

/// Query parameters of the logs endpoint.
#[derive(Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// `GET /api/system/status`
pub async fn status<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<SystemStatus>, ApiError> {
    Ok(Reply::Data(state.device.system_status().await?))
}

/// `GET /api/system/logs?limit=N`
pub async fn logs<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Reply<Vec<LogEntry>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    Ok(Reply::Data(state.device.logs(limit).await?))
}

/// `GET /api/system/ping`
#[allow(clippy::unused_async, clippy::cast_precision_loss)]
pub async fn ping() -> Reply<Pong> {
    let millis = time::now().timestamp_millis();
    Reply::Data(Pong {
        timestamp: Some(millis as f64 / 1000.0),
    })
}

/// `POST /api/system/restart`
pub async fn restart<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<()>, ApiError> {
    tracing::warn!("device restart requested");
    state.device.restart().await?;
    Ok(Reply::Ack)
}

/// `GET /api/status`
pub async fn combined<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<CombinedStatus>, ApiError> {
    Ok(Reply::Data(state.device.status().await?))
}
