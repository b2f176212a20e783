//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod config;
#[allow(clippy::missing_errors_doc)]
pub mod relays;
#[allow(clippy::missing_errors_doc)]
pub mod sensors;
#[allow(clippy::missing_errors_doc)]
pub mod system;
#[allow(clippy::missing_errors_doc)]
pub mod wifi;

use axum::Json;
use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Serialize;

use minermon_app::ports::DeviceBackend;
use minermon_domain::envelope::Envelope;

use crate::state::AppState;

/// A successful answer: a payload or a bare acknowledgement.
pub enum Reply<T> {
    Data(T),
    Ack,
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Data(data) => Json(Envelope::ok(data)).into_response(),
            Self::Ack => Json(Envelope::<()>::ack()).into_response(),
        }
    }
}

/// Build the `/api` sub-router.
pub fn routes<B: DeviceBackend>() -> Router<AppState<B>> {
    Router::new()
        // Sensors
        .route("/sensors", get(sensors::readings::<B>))
        .route("/sensors/config", get(sensors::config::<B>))
        .route("/sensors/add", post(sensors::add::<B>))
        .route("/sensors/remove", post(sensors::remove::<B>))
        .route("/sensors/{kind}", get(sensors::readings_of_kind::<B>))
        // Relays
        .route("/relays", get(relays::list::<B>))
        .route(
            "/relays/{id}",
            get(relays::get::<B>).post(relays::control::<B>),
        )
        // Configuration
        .route(
            "/config",
            get(config::get::<B>).post(config::update::<B>),
        )
        .route(
            "/config/wifi",
            get(config::get_wifi::<B>).post(config::update_wifi::<B>),
        )
        // System
        .route("/system/status", get(system::status::<B>))
        .route("/system/logs", get(system::logs::<B>))
        .route("/system/ping", get(system::ping))
        .route("/system/restart", post(system::restart::<B>))
        .route("/status", get(system::combined::<B>))
        // WiFi
        .route("/scan", get(wifi::scan::<B>))
        .route("/connect", post(wifi::connect::<B>))
}
