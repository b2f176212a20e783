//! WiFi settings, scan results and join requests.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::net::is_valid_ip;

/// Subnet mask proposed when the device has none configured.
pub const DEFAULT_SUBNET_MASK: &str = "255.255.255.0";

/// How the device obtains its IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    Dhcp,
    Static {
        ip: String,
        subnet_mask: String,
        gateway: String,
    },
}

/// WiFi station settings, submitted wholesale.
///
/// On the wire the addressing is flattened into `use_dhcp` plus the three
/// static fields, which are omitted entirely when DHCP is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WifiConfigWire", into = "WifiConfigWire")]
pub struct WifiConfig {
    pub ssid: String,
    /// Write-only: the device never returns it.
    pub password: Option<String>,
    pub addressing: Addressing,
}

impl WifiConfig {
    #[must_use]
    pub fn uses_dhcp(&self) -> bool {
        matches!(self.addressing, Addressing::Dhcp)
    }

    /// Check the SSID and, for static addressing, each address field.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ssid.trim().is_empty() {
            return Err(ValidationError::EmptySsid);
        }
        if let Addressing::Static {
            ip,
            subnet_mask,
            gateway,
        } = &self.addressing
        {
            for (field, value) in [
                ("static_ip", ip),
                ("subnet_mask", subnet_mask),
                ("gateway", gateway),
            ] {
                if !is_valid_ip(value) {
                    return Err(ValidationError::InvalidIpAddress {
                        field,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WifiConfigWire {
    #[serde(default)]
    ssid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(default = "dhcp_default")]
    use_dhcp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    static_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subnet_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gateway: Option<String>,
}

fn dhcp_default() -> bool {
    true
}

impl From<WifiConfigWire> for WifiConfig {
    fn from(wire: WifiConfigWire) -> Self {
        let addressing = if wire.use_dhcp {
            Addressing::Dhcp
        } else {
            Addressing::Static {
                ip: wire.static_ip.unwrap_or_default(),
                subnet_mask: wire
                    .subnet_mask
                    .unwrap_or_else(|| DEFAULT_SUBNET_MASK.to_string()),
                gateway: wire.gateway.unwrap_or_default(),
            }
        };
        Self {
            ssid: wire.ssid,
            password: wire.password,
            addressing,
        }
    }
}

impl From<WifiConfig> for WifiConfigWire {
    fn from(config: WifiConfig) -> Self {
        let (use_dhcp, static_ip, subnet_mask, gateway) = match config.addressing {
            Addressing::Dhcp => (true, None, None, None),
            Addressing::Static {
                ip,
                subnet_mask,
                gateway,
            } => (false, Some(ip), Some(subnet_mask), Some(gateway)),
        };
        Self {
            ssid: config.ssid,
            password: config.password,
            use_dhcp,
            static_ip,
            subnet_mask,
            gateway,
        }
    }
}

/// Coarse signal strength bucket of a scanned network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignalQuality {
    Weak,
    Fair,
    Good,
    Excellent,
}

impl SignalQuality {
    #[must_use]
    pub fn from_rssi(rssi: i32) -> Self {
        if rssi > -50 {
            Self::Excellent
        } else if rssi > -60 {
            Self::Good
        } else if rssi > -70 {
            Self::Fair
        } else {
            Self::Weak
        }
    }

    /// Number of lit bars out of four.
    #[must_use]
    pub fn bars(self) -> u8 {
        match self {
            Self::Weak => 1,
            Self::Fair => 2,
            Self::Good => 3,
            Self::Excellent => 4,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

/// One network from `GET /api/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    pub ssid: String,
    pub rssi: i32,
    /// Security mode label (`"WPA2"`, `"Open"`, …).
    #[serde(default)]
    pub security: String,
}

impl WifiNetwork {
    #[must_use]
    pub fn quality(&self) -> SignalQuality {
        SignalQuality::from_rssi(self.rssi)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.security.is_empty() || self.security.eq_ignore_ascii_case("open")
    }
}

/// Sort scan results strongest first.
pub fn sort_by_signal(networks: &mut [WifiNetwork]) {
    networks.sort_by(|a, b| b.rssi.cmp(&a.rssi));
}

/// Body of `POST /api/connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectRequest {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

impl ConnectRequest {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySsid`] for a blank SSID.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ssid.trim().is_empty() {
            Err(ValidationError::EmptySsid)
        } else {
            Ok(())
        }
    }
}
