//! Sensor readings and the sensor registry.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use minermon_app::ports::DeviceBackend;
use minermon_domain::sensor::{
    NewSensor, ReadingGroup, RemoveSensorRequest, SensorConfig, SensorKind, SensorReadings,
    SensorsConfig,
};

use super::Reply;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/sensors`
pub async fn readings<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<SensorReadings>, ApiError> {
    Ok(Reply::Data(state.device.sensors().await?))
}

/// `GET /api/sensors/{kind}`
pub async fn readings_of_kind<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    Path(kind): Path<String>,
) -> Result<Reply<ReadingGroup>, ApiError> {
    let kind = SensorKind::from_str(&kind)
        .map_err(|_| ApiError::bad_request(format!("Invalid sensor type: {kind}")))?;
    let readings = state.device.sensors().await?;
    Ok(Reply::Data(readings.group(kind).clone()))
}

/// `GET /api/sensors/config`
pub async fn config<B: DeviceBackend>(
    State(state): State<AppState<B>>,
) -> Result<Reply<SensorsConfig>, ApiError> {
    Ok(Reply::Data(state.device.sensors_config().await?))
}

/// `POST /api/sensors/add`
pub async fn add<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    payload: Result<Json<NewSensor>, JsonRejection>,
) -> Result<Reply<SensorConfig>, ApiError> {
    let Json(sensor) = payload?;
    let added = state.device.add_sensor(sensor).await?;
    tracing::info!(id = %added.id, model = %added.sensor.model, "sensor added");
    Ok(Reply::Data(added))
}

/// `POST /api/sensors/remove`
pub async fn remove<B: DeviceBackend>(
    State(state): State<AppState<B>>,
    payload: Result<Json<RemoveSensorRequest>, JsonRejection>,
) -> Result<Reply<()>, ApiError> {
    let Json(request) = payload?;
    state.device.remove_sensor(request.id).await?;
    Ok(Reply::Ack)
}
