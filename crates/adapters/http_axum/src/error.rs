//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use minermon_app::error::DeviceError;
use minermon_domain::envelope::Envelope;

/// Maps backend failures and malformed requests to enveloped HTTP errors.
#[derive(Debug)]
pub enum ApiError {
    Device(DeviceError),
    /// The request itself could not be understood.
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl From<DeviceError> for ApiError {
    fn from(err: DeviceError) -> Self {
        Self::Device(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Device(err @ DeviceError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Device(err @ DeviceError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            Self::Device(err @ DeviceError::LimitReached(_)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            Self::Device(DeviceError::Hardware(err)) => {
                tracing::error!(error = %err, "device failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal device error".to_string(),
                )
            }
        };

        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}
