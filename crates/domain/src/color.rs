//! Threshold-based color buckets.
//!
//! Buckets are pure functions of the current value. There is no hysteresis:
//! a reading oscillating around a threshold flips color on every update.

use crate::log::LogLevel;
use crate::sensor::SensorKind;

/// Semantic color of a displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBucket {
    Info,
    Success,
    Warning,
    Danger,
    /// No reading available.
    Muted,
}

impl ColorBucket {
    /// Short class suffix (`text-success`, `badge-danger`, …).
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Muted => "muted",
        }
    }
}

/// Color bucket for a sensor reading.
#[must_use]
pub fn value_color(value: Option<f64>, kind: SensorKind) -> ColorBucket {
    let Some(v) = value else {
        return ColorBucket::Muted;
    };
    match kind {
        SensorKind::Temperature => {
            if v < 20.0 {
                ColorBucket::Info
            } else if v < 30.0 {
                ColorBucket::Success
            } else if v < 35.0 {
                ColorBucket::Warning
            } else {
                ColorBucket::Danger
            }
        }
        SensorKind::Humidity => {
            if v < 40.0 {
                ColorBucket::Warning
            } else if v < 70.0 {
                ColorBucket::Success
            } else {
                ColorBucket::Danger
            }
        }
        SensorKind::Current => {
            if v < 5.0 {
                ColorBucket::Success
            } else if v < 10.0 {
                ColorBucket::Warning
            } else {
                ColorBucket::Danger
            }
        }
    }
}

/// Color bucket for a measured ping latency.
#[must_use]
pub fn latency_color(latency_ms: u64) -> ColorBucket {
    if latency_ms < 100 {
        ColorBucket::Success
    } else {
        ColorBucket::Warning
    }
}

/// CSS class of a log line.
#[must_use]
pub fn log_level_class(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "log-debug",
        LogLevel::Info => "log-info",
        LogLevel::Warning => "log-warning",
        LogLevel::Error => "log-error",
        LogLevel::Critical => "log-critical",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_bucket_temperature_at_thresholds() {
        let t = SensorKind::Temperature;
        assert_eq!(value_color(Some(19.9), t), ColorBucket::Info);
        assert_eq!(value_color(Some(20.0), t), ColorBucket::Success);
        assert_eq!(value_color(Some(29.9), t), ColorBucket::Success);
        assert_eq!(value_color(Some(30.0), t), ColorBucket::Warning);
        assert_eq!(value_color(Some(35.0), t), ColorBucket::Danger);
    }

    #[test]
    fn should_bucket_humidity_at_thresholds() {
        let h = SensorKind::Humidity;
        assert_eq!(value_color(Some(39.0), h), ColorBucket::Warning);
        assert_eq!(value_color(Some(40.0), h), ColorBucket::Success);
        assert_eq!(value_color(Some(70.0), h), ColorBucket::Danger);
    }

    #[test]
    fn should_bucket_current_at_thresholds() {
        let c = SensorKind::Current;
        assert_eq!(value_color(Some(4.99), c), ColorBucket::Success);
        assert_eq!(value_color(Some(5.0), c), ColorBucket::Warning);
        assert_eq!(value_color(Some(10.0), c), ColorBucket::Danger);
    }

    #[test]
    fn should_mute_missing_reading() {
        for kind in SensorKind::ALL {
            assert_eq!(value_color(None, kind), ColorBucket::Muted);
        }
    }

    #[test]
    fn should_flag_slow_ping_as_warning() {
        assert_eq!(latency_color(99), ColorBucket::Success);
        assert_eq!(latency_color(100), ColorBucket::Warning);
    }

    #[test]
    fn should_map_log_level_to_class() {
        assert_eq!(log_level_class(LogLevel::Critical), "log-critical");
        assert_eq!(ColorBucket::Danger.class(), "danger");
    }
}
