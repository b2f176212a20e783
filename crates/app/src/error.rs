//! Application-level errors.

use minermon_domain::error::ValidationError;

use crate::ports::TransportError;

/// Failure of a device API call, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The device did not answer before the request deadline.
    #[error("request timed out: device did not respond")]
    Timeout,

    /// The device answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never reached the device.
    #[error("network error: {0}")]
    Network(String),

    /// The device answered `success: false`.
    #[error("{0}")]
    Application(String),

    /// The request body could not be encoded.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(_) => Self::Timeout,
            TransportError::Network(message) => Self::Network(message),
        }
    }
}

/// Failure reported by a [`DeviceBackend`](crate::ports::DeviceBackend).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Rejected input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced item does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A capacity limit was reached.
    #[error("limit reached: {0}")]
    LimitReached(String),

    /// The hardware (or its simulation) failed.
    #[error("device failure: {0}")]
    Hardware(String),
}
