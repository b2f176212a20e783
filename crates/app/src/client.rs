//! HTTP implementation of the [`DeviceApi`] port.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

use minermon_domain::envelope::Envelope;
use minermon_domain::log::LogEntry;
use minermon_domain::relay::{RelayAction, RelayControlRequest, RelayId, RelayStates};
use minermon_domain::sensor::{
    NewSensor, ReadingGroup, RemoveSensorRequest, SensorConfig, SensorKind, SensorReadings,
    SensorsConfig,
};
use minermon_domain::system::{CombinedStatus, DeviceConfig, Pong, SystemStatus};
use minermon_domain::wifi::{ConnectRequest, WifiConfig, WifiNetwork};

use crate::error::ApiError;
use crate::ports::{DeviceApi, HttpRequest, Method, Transport};

/// Deadline applied to every request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the device REST API through a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpDeviceApi<T> {
    transport: T,
    base_url: String,
    timeout: Duration,
}

impl<T: Transport> HttpDeviceApi<T> {
    /// Create a client for the device at `base_url` (empty for same origin).
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one request and unwrap the response envelope.
    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Option<R>, ApiError> {
        let request = HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            body,
            timeout: self.timeout,
        };

        let response = self.transport.send(request).await.map_err(|err| {
            tracing::warn!(%method, path, error = %err, "device request failed");
            ApiError::from(err)
        })?;

        if !response.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "request failed".to_string());
            tracing::warn!(%method, path, status = response.status, %message, "device returned an error status");
            return Err(ApiError::Http {
                status: response.status,
                message,
            });
        }

        let envelope: Envelope<R> = serde_json::from_str(&response.body).map_err(|err| {
            tracing::warn!(%method, path, error = %err, "undecodable device response");
            ApiError::Decode(err.to_string())
        })?;

        envelope.into_result().map_err(|message| {
            tracing::warn!(%method, path, %message, "device reported a failure");
            ApiError::Application(message)
        })
    }

    async fn fetch<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(Method::Get, path, None)
            .await?
            .ok_or_else(|| ApiError::Decode("response carries no data".to_string()))
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let body = encode(body)?;
        self.call(Method::Post, path, Some(body))
            .await?
            .ok_or_else(|| ApiError::Decode("response carries no data".to_string()))
    }

    async fn post_ack<B: Serialize>(&self, path: &str, body: Option<&B>) -> Result<(), ApiError> {
        let body = body.map(encode).transpose()?;
        self.call::<Value>(Method::Post, path, body).await?;
        Ok(())
    }
}

/// Error bodies may or may not be full envelopes; only `error` matters.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|err| ApiError::Encode(err.to_string()))
}

impl<T: Transport> DeviceApi for HttpDeviceApi<T> {
    #[tracing::instrument(skip(self))]
    async fn get_sensors(&self) -> Result<SensorReadings, ApiError> {
        self.fetch("/api/sensors").await
    }

    #[tracing::instrument(skip(self))]
    async fn get_sensor_kind(&self, kind: SensorKind) -> Result<ReadingGroup, ApiError> {
        self.fetch(&format!("/api/sensors/{kind}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_relays(&self) -> Result<RelayStates, ApiError> {
        self.fetch("/api/relays").await
    }

    #[tracing::instrument(skip(self), fields(relay = id.index()))]
    async fn get_relay(&self, id: RelayId) -> Result<RelayStates, ApiError> {
        self.fetch(&format!("/api/relays/{}", id.index())).await
    }

    #[tracing::instrument(skip(self), fields(relay = id.index()))]
    async fn control_relay(&self, id: RelayId, action: RelayAction) -> Result<RelayStates, ApiError> {
        self.post(
            &format!("/api/relays/{}", id.index()),
            &RelayControlRequest { action },
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_config(&self) -> Result<DeviceConfig, ApiError> {
        self.fetch("/api/config").await
    }

    #[tracing::instrument(skip(self, config))]
    async fn update_config(&self, config: &DeviceConfig) -> Result<(), ApiError> {
        self.post_ack("/api/config", Some(config)).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_wifi_config(&self) -> Result<WifiConfig, ApiError> {
        self.fetch("/api/config/wifi").await
    }

    #[tracing::instrument(skip(self, config), fields(ssid = %config.ssid))]
    async fn update_wifi_config(&self, config: &WifiConfig) -> Result<(), ApiError> {
        self.post_ack("/api/config/wifi", Some(config)).await
    }

    #[tracing::instrument(skip(self))]
    async fn system_status(&self) -> Result<SystemStatus, ApiError> {
        self.fetch("/api/system/status").await
    }

    #[tracing::instrument(skip(self))]
    async fn logs(&self, limit: usize) -> Result<Vec<LogEntry>, ApiError> {
        self.fetch(&format!("/api/system/logs?limit={limit}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn ping(&self) -> Result<Pong, ApiError> {
        Ok(self
            .call(Method::Get, "/api/system/ping", None)
            .await?
            .unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn restart(&self) -> Result<(), ApiError> {
        self.post_ack::<Value>("/api/system/restart", None).await
    }

    #[tracing::instrument(skip(self))]
    async fn status(&self) -> Result<CombinedStatus, ApiError> {
        self.fetch("/api/status").await
    }

    #[tracing::instrument(skip(self))]
    async fn scan_networks(&self) -> Result<Vec<WifiNetwork>, ApiError> {
        self.fetch("/api/scan").await
    }

    #[tracing::instrument(skip(self, request), fields(ssid = %request.ssid))]
    async fn connect(&self, request: &ConnectRequest) -> Result<(), ApiError> {
        self.post_ack("/api/connect", Some(request)).await
    }

    #[tracing::instrument(skip(self))]
    async fn sensors_config(&self) -> Result<SensorsConfig, ApiError> {
        self.fetch("/api/sensors/config").await
    }

    #[tracing::instrument(skip(self, sensor), fields(name = %sensor.name))]
    async fn add_sensor(&self, sensor: &NewSensor) -> Result<SensorConfig, ApiError> {
        self.post("/api/sensors/add", sensor).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_sensor(&self, id: &str) -> Result<(), ApiError> {
        let body = RemoveSensorRequest { id: id.to_string() };
        self.post_ack("/api/sensors/remove", Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{HttpResponse, TransportError};
    use crate::testing::ScriptedTransport;
    use minermon_domain::wifi::Addressing;

    fn api(transport: &ScriptedTransport) -> HttpDeviceApi<ScriptedTransport> {
        HttpDeviceApi::new(transport.clone(), "http://192.168.4.1/")
    }

    #[tokio::test]
    async fn should_prefix_base_url_and_apply_default_timeout() {
        let transport = ScriptedTransport::new();
        transport.ok("GET /api/relays", r#"{"relay1":true}"#);

        let states = api(&transport).get_relays().await.unwrap();

        assert_eq!(states.get(RelayId::try_from(0).unwrap()), Some(true));
        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://192.168.4.1/api/relays");
        assert_eq!(sent[0].timeout, Duration::from_secs(10));
        assert!(sent[0].body.is_none());
    }

    #[tokio::test]
    async fn should_map_timeout_to_user_visible_error() {
        let transport = ScriptedTransport::new();
        transport.fail(
            "GET /api/sensors",
            TransportError::Timeout(Duration::from_secs(10)),
        );

        let err = api(&transport).get_sensors().await.unwrap_err();

        assert_eq!(err, ApiError::Timeout);
        assert_eq!(err.to_string(), "request timed out: device did not respond");
    }

    #[tokio::test]
    async fn should_surface_error_body_on_http_failure() {
        let transport = ScriptedTransport::new();
        transport.respond(
            "POST /api/relays/3",
            HttpResponse {
                status: 400,
                body: r#"{"success":false,"error":"Invalid action"}"#.to_string(),
            },
        );

        let err = api(&transport)
            .control_relay(RelayId::try_from(3).unwrap(), RelayAction::Toggle)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                message: "Invalid action".to_string()
            }
        );
    }

    #[tokio::test]
    async fn should_fall_back_to_generic_message_for_opaque_http_failure() {
        let transport = ScriptedTransport::new();
        transport.respond(
            "GET /api/status",
            HttpResponse {
                status: 502,
                body: "<html>bad gateway</html>".to_string(),
            },
        );

        let err = api(&transport).status().await.unwrap_err();

        assert!(matches!(err, ApiError::Http { status: 502, .. }));
    }

    #[tokio::test]
    async fn should_map_unsuccessful_envelope_to_application_error() {
        let transport = ScriptedTransport::new();
        transport.respond(
            "GET /api/scan",
            HttpResponse {
                status: 200,
                body: r#"{"success":false,"error":"scan busy"}"#.to_string(),
            },
        );

        let err = api(&transport).scan_networks().await.unwrap_err();

        assert_eq!(err, ApiError::Application("scan busy".to_string()));
    }

    #[tokio::test]
    async fn should_report_decode_error_for_wrong_shape() {
        let transport = ScriptedTransport::new();
        transport.ok("GET /api/system/logs?limit=20", r#"{"not":"a list"}"#);

        let err = api(&transport).logs(20).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn should_send_action_body_for_relay_control() {
        let transport = ScriptedTransport::new();
        transport.ok("POST /api/relays/1", r#"{"relay2":false}"#);

        api(&transport)
            .control_relay(RelayId::try_from(1).unwrap(), RelayAction::Off)
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"action":"off"}"#));
    }

    #[tokio::test]
    async fn should_omit_static_fields_when_posting_dhcp_wifi() {
        let transport = ScriptedTransport::new();
        transport.ack("POST /api/config/wifi");

        let config = WifiConfig {
            ssid: "farm".to_string(),
            password: Some("hunter22".to_string()),
            addressing: Addressing::Dhcp,
        };
        api(&transport).update_wifi_config(&config).await.unwrap();

        let body: Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["use_dhcp"], true);
        assert!(body.get("static_ip").is_none());
        assert!(body.get("gateway").is_none());
    }

    #[tokio::test]
    async fn should_accept_ping_without_payload() {
        let transport = ScriptedTransport::new();
        transport.ack("GET /api/system/ping");

        assert!(api(&transport).ping().await.is_ok());
    }

    #[tokio::test]
    async fn should_post_remove_request_with_id() {
        let transport = ScriptedTransport::new();
        transport.ack("POST /api/sensors/remove");

        api(&transport).remove_sensor("a1b2").await.unwrap();

        assert_eq!(
            transport.requests()[0].body.as_deref(),
            Some(r#"{"id":"a1b2"}"#)
        );
    }

    #[tokio::test]
    async fn should_honour_custom_timeout() {
        let transport = ScriptedTransport::new();
        transport.ack("POST /api/system/restart");

        api(&transport)
            .with_timeout(Duration::from_secs(3))
            .restart()
            .await
            .unwrap();

        assert_eq!(transport.requests()[0].timeout, Duration::from_secs(3));
    }
}
