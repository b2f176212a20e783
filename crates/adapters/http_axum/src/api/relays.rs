//! Relay states and control.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use minermon_app::ports::DeviceBackend;
use minermon_domain::relay::{RelayControlRequest, RelayId, RelayStates};

use super::Reply;
use crate::error::ApiError;
use crate::state::AppState;

fn parse_id(raw: &str) -> Result<RelayId, ApiError> {
    raw.parse::<u8>()
        .ok()
        .and_then(|index| RelayId::try_from(index).ok())
        .ok_or_else(|| ApiError::bad_request("Invalid relay ID"))
}

/// `GET /api/relays`
pub async fn list<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<RelayStates>, ApiError> {
    Ok(Reply::Data(state.device.relays().await?))
}

/// `GET /api/relays/{id}`
///
/// Answers with a single-key map, e.g. `{"relay3": true}`.
pub async fn get<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<Reply<RelayStates>, ApiError> {
    let id = parse_id(&id)?;
    let all = state.device.relays().await?;
    let single = all.iter().filter(|(relay, _)| *relay == id).collect();
    Ok(Reply::Data(single))
}

/// `POST /api/relays/{id}`
pub async fn control<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    payload: Result<Json<RelayControlRequest>, JsonRejection>,
) -> Result<Reply<RelayStates>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let states = state.device.control_relay(id, request.action).await?;
    tracing::info!(relay = id.index(), action = %request.action, "relay controlled");
    Ok(Reply::Data(states))
}
