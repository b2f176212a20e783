//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! The domain only knows about invariant violations.

/// A domain invariant was violated by user or device supplied data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Relay index outside of the board's relay range.
    #[error("relay id {0} is out of range (expected 0-3)")]
    InvalidRelayId(u8),

    /// A dotted-quad field did not hold a valid IPv4 address.
    #[error("invalid IP address for {field}: {value:?}")]
    InvalidIpAddress { field: &'static str, value: String },

    /// The WiFi SSID was empty.
    #[error("SSID must not be empty")]
    EmptySsid,

    /// A sensor was submitted without a name.
    #[error("sensor name must not be empty")]
    EmptySensorName,

    /// The chosen GPIO cannot be used for the given sensor model.
    #[error("GPIO {gpio} is not available for {model}")]
    PinNotAllowed { model: &'static str, gpio: u8 },

    /// A required part of a multi-pin sensor was missing.
    #[error("{model} requires a {part} GPIO")]
    MissingPin {
        model: &'static str,
        part: &'static str,
    },
}
