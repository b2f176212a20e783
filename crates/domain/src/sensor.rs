//! Sensor readings and the virtual sensor configuration.
//!
//! Readings are grouped by [`SensorKind`]; each group maps a sensor or channel
//! name (`sensor1`, `channel3`, …) to a nullable value. A `null` reading means
//! the device could not sample that input and is displayed as a placeholder.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The measured quantity of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temperature,
    Humidity,
    Current,
}

impl SensorKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Temperature, Self::Humidity, Self::Current];

    /// Path segment used by `/api/sensors/{kind}`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Current => "current",
        }
    }

    /// Display unit.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "\u{b0}C",
            Self::Humidity => "%",
            Self::Current => "A",
        }
    }

    /// Number of decimals shown for this kind.
    #[must_use]
    pub fn decimals(self) -> usize {
        match self {
            Self::Temperature | Self::Humidity => 1,
            Self::Current => 2,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(Self::Temperature),
            "humidity" => Ok(Self::Humidity),
            "current" => Ok(Self::Current),
            other => Err(format!("unknown sensor kind: {other}")),
        }
    }
}

/// Named readings of a single [`SensorKind`].
pub type ReadingGroup = BTreeMap<String, Option<f64>>;

/// Snapshot of every sensor on the device (`GET /api/sensors`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    #[serde(default)]
    pub temperature: ReadingGroup,
    #[serde(default)]
    pub humidity: ReadingGroup,
    #[serde(default)]
    pub current: ReadingGroup,
    /// Unix seconds at which the device sampled the values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl SensorReadings {
    /// Readings of one kind.
    #[must_use]
    pub fn group(&self, kind: SensorKind) -> &ReadingGroup {
        match kind {
            SensorKind::Temperature => &self.temperature,
            SensorKind::Humidity => &self.humidity,
            SensorKind::Current => &self.current,
        }
    }

    /// A single reading; `None` when the key is missing or the value is null.
    #[must_use]
    pub fn value(&self, kind: SensorKind, key: &str) -> Option<f64> {
        self.group(kind).get(key).copied().flatten()
    }
}

/// Name of the `n`-th (1-based) DHT sensor key.
#[must_use]
pub fn sensor_key(n: usize) -> String {
    format!("sensor{n}")
}

/// Name of the `n`-th (1-based) current channel key.
#[must_use]
pub fn channel_key(n: usize) -> String {
    format!("channel{n}")
}

/// Hardware model of a configurable sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorModel {
    #[serde(rename = "DHT22")]
    Dht22,
    #[serde(rename = "DHT11")]
    Dht11,
    Relay,
    Current,
    Exaustor,
}

const DHT_PINS: &[u8] = &[4, 0, 2, 15, 22, 21];
const RELAY_PINS: &[u8] = &[4, 0, 2, 15, 22, 21, 25, 26, 27, 32, 33];
const CURRENT_PINS: &[u8] = &[36, 39, 34, 35, 32, 33];
const EXHAUST_PINS: &[u8] = &[25, 26, 27, 32, 33];

impl SensorModel {
    /// All models offered in the "add sensor" form.
    pub const ALL: [Self; 5] = [
        Self::Dht22,
        Self::Dht11,
        Self::Relay,
        Self::Current,
        Self::Exaustor,
    ];

    /// Wire name of the model.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dht22 => "DHT22",
            Self::Dht11 => "DHT11",
            Self::Relay => "Relay",
            Self::Current => "Current",
            Self::Exaustor => "Exaustor",
        }
    }

    /// GPIO pins the model may be wired to on an ESP32.
    #[must_use]
    pub fn allowed_pins(self) -> &'static [u8] {
        match self {
            Self::Dht22 | Self::Dht11 => DHT_PINS,
            Self::Relay => RELAY_PINS,
            Self::Current => CURRENT_PINS,
            Self::Exaustor => EXHAUST_PINS,
        }
    }

    fn check_pin(self, gpio: u8) -> Result<(), ValidationError> {
        if self.allowed_pins().contains(&gpio) {
            Ok(())
        } else {
            Err(ValidationError::PinNotAllowed {
                model: self.as_str(),
                gpio,
            })
        }
    }
}

impl fmt::Display for SensorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SensorModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown sensor model: {s}"))
    }
}

/// Room a sensor is installed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    SalaQuente,
    SalaFria,
}

impl Environment {
    /// Human readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SalaQuente => "Hot room",
            Self::SalaFria => "Cold room",
        }
    }
}

/// A secondary pin attached to an exhaust fan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedPin {
    pub gpio: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

/// Body of `POST /api/sensors/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSensor {
    #[serde(rename = "type")]
    pub model: SensorModel,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    pub gpio: u8,
    /// Calibration curve for current sensors, `x1,y1;x2,y2;…`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<AttachedPin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<AttachedPin>,
}

impl NewSensor {
    /// Check the name and every pin against the model's allowed GPIOs.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptySensorName);
        }
        self.model.check_pin(self.gpio)?;
        if self.model == SensorModel::Exaustor {
            let relay = self.relay.as_ref().ok_or(ValidationError::MissingPin {
                model: self.model.as_str(),
                part: "relay",
            })?;
            self.model.check_pin(relay.gpio)?;
            let current = self.current.as_ref().ok_or(ValidationError::MissingPin {
                model: self.model.as_str(),
                part: "current",
            })?;
            SensorModel::Current.check_pin(current.gpio)?;
        }
        Ok(())
    }
}

/// A configured sensor as stored by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub id: String,
    #[serde(flatten)]
    pub sensor: NewSensor,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

impl SensorConfig {
    /// One-line summary: model, pins, environment.
    #[must_use]
    pub fn details(&self) -> String {
        let mut details = format!("Type: {} | GPIO: {}", self.sensor.model, self.sensor.gpio);
        if let Some(env) = self.sensor.environment {
            details.push_str(" | ");
            details.push_str(env.label());
        }
        if let Some(relay) = &self.sensor.relay {
            details.push_str(&format!(" | Relay: GPIO {}", relay.gpio));
        }
        if let Some(current) = &self.sensor.current {
            details.push_str(&format!(" | Current: GPIO {}", current.gpio));
        }
        details
    }
}

/// Global sensor polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Device-side sampling interval, in seconds.
    pub update_interval: u32,
    pub max_sensors: usize,
    pub auto_discovery: bool,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            update_interval: 10,
            max_sensors: 10,
            auto_discovery: true,
        }
    }
}

/// Payload of `GET /api/sensors/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorsConfig {
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
    #[serde(default)]
    pub settings: SensorSettings,
}

/// Body of `POST /api/sensors/remove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSensorRequest {
    pub id: String,
}
