//! System telemetry and the full device configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wifi::WifiConfig;

/// WiFi link state reported with the system status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
}

/// Payload of `GET /api/system/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Seconds since boot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Free heap, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_memory: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub wifi: WifiStatus,
}

/// Payload of `GET /api/status`. Memory and flash sizes are in KiB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedStatus {
    pub version: Option<String>,
    pub ip: Option<String>,
    pub uptime: Option<u64>,
    pub cpu_percent: Option<f64>,
    pub memory_free: Option<u64>,
    pub memory_total: Option<u64>,
    pub flash_free: Option<u64>,
    pub flash_total: Option<u64>,
}

impl CombinedStatus {
    /// Used memory as a percentage of the total.
    #[must_use]
    pub fn memory_used_percent(&self) -> Option<f64> {
        used_percent(self.memory_free?, self.memory_total?)
    }

    /// Used flash as a percentage of the total.
    #[must_use]
    pub fn flash_used_percent(&self) -> Option<f64> {
        used_percent(self.flash_free?, self.flash_total?)
    }
}

#[allow(clippy::cast_precision_loss)]
fn used_percent(free: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(total.saturating_sub(free) as f64 / total as f64 * 100.0)
}

/// Answer of `GET /api/system/ping`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pong {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Full device configuration (`GET /api/config`).
///
/// Only `wifi` is interpreted; every other section round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi: Option<WifiConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_partial_system_status() {
        let status: SystemStatus =
            serde_json::from_str(r#"{"uptime": 3600, "wifi": {"connected": true, "rssi": -61}}"#)
                .unwrap();
        assert_eq!(status.uptime, Some(3600));
        assert!(status.free_memory.is_none());
        assert!(status.wifi.connected);
        assert_eq!(status.wifi.rssi, Some(-61));
        assert!(status.wifi.ip.is_none());
    }

    #[test]
    fn should_default_wifi_to_disconnected() {
        let status: SystemStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.wifi.connected);
    }

    #[test]
    fn should_compute_usage_percentages() {
        let status = CombinedStatus {
            memory_free: Some(75),
            memory_total: Some(100),
            flash_total: Some(0),
            flash_free: Some(0),
            ..CombinedStatus::default()
        };
        assert_eq!(status.memory_used_percent(), Some(25.0));
        assert_eq!(status.flash_used_percent(), None);
    }

    #[test]
    fn should_preserve_unknown_config_sections() {
        let json = r#"{"wifi":{"ssid":"farm","use_dhcp":true},"mqtt":{"broker":"10.0.0.2"}}"#;
        let config: DeviceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.wifi.as_ref().map(|w| w.ssid.as_str()), Some("farm"));
        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["mqtt"]["broker"], "10.0.0.2");
    }
}
