//! Canonical response envelope.
//!
//! Every device endpoint answers with `{"success": bool, "data": …, "error": …}`.
//! Successful acknowledgements without a payload omit `data`.

use serde::{Deserialize, Serialize};

/// JSON envelope wrapping every device response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the device carried out the request.
    pub success: bool,
    /// Payload on success (absent for plain acknowledgements).
    ///
    /// Not `#[serde(default)]`, which would bound `T: Default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human readable failure reason when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed envelope carrying an error message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Split the envelope into the payload or the device-reported error.
    ///
    /// # Errors
    ///
    /// Returns the `error` message (or a generic one) when `success` is false.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "device reported a failure".to_string()))
        }
    }
}

impl Envelope<()> {
    /// A successful acknowledgement without payload.
    #[must_use]
    pub fn ack() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_omit_data_and_error_for_plain_ack() {
        let json = serde_json::to_string(&Envelope::ack()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn should_yield_payload_when_successful() {
        let envelope: Envelope<u32> = serde_json::from_str(r#"{"success":true,"data":7}"#).unwrap();
        assert_eq!(envelope.into_result(), Ok(Some(7)));
    }

    #[test]
    fn should_decode_payload_without_default_impl() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Reading {
            channel: u8,
        }

        fn decode<T: serde::de::DeserializeOwned>(json: &str) -> Envelope<T> {
            serde_json::from_str(json).unwrap()
        }

        let full: Envelope<Reading> = decode(r#"{"success":true,"data":{"channel":3}}"#);
        assert_eq!(full.into_result(), Ok(Some(Reading { channel: 3 })));

        let bare: Envelope<Reading> = decode(r#"{"success":true}"#);
        assert_eq!(bare.into_result(), Ok(None));
    }

    #[test]
    fn should_yield_device_error_when_not_successful() {
        let envelope: Envelope<u32> =
            serde_json::from_str(r#"{"success":false,"error":"Invalid relay ID"}"#).unwrap();
        assert_eq!(envelope.into_result(), Err("Invalid relay ID".to_string()));
    }

    #[test]
    fn should_fall_back_to_generic_error_when_message_missing() {
        let envelope: Envelope<u32> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(envelope.into_result().is_err());
    }
}
