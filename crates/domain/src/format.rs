//! Display formatting.
//!
//! Every helper that accepts an optional value renders [`PLACEHOLDER`] when
//! the value is absent.

use crate::time;

/// Rendered in place of a missing value.
pub const PLACEHOLDER: &str = "--";

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Binary-unit size with two decimals (`1536` → `"1.50 KB"`).
///
/// The numeric part stays below 1024 for every unit except GB.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // 1023.999 KB would print as "1024.00 KB"
    if (value * 100.0).round() / 100.0 >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Uptime as `"1d 2h 3m 4s"`, listing only non-zero units.
///
/// Seconds are shown whenever no larger unit is, so `0` renders `"0s"`.
#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}

/// Optional uptime, [`PLACEHOLDER`] when absent.
#[must_use]
pub fn format_optional_uptime(seconds: Option<u64>) -> String {
    seconds.map_or_else(|| PLACEHOLDER.to_string(), format_uptime)
}

/// Optional size, [`PLACEHOLDER`] when absent.
#[must_use]
pub fn format_optional_bytes(bytes: Option<u64>) -> String {
    bytes.map_or_else(|| PLACEHOLDER.to_string(), format_bytes)
}

/// Fixed-decimals number, [`PLACEHOLDER`] when absent or not finite.
#[must_use]
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Signal strength in dBm.
#[must_use]
pub fn format_rssi(rssi: Option<i32>) -> String {
    rssi.map_or_else(|| PLACEHOLDER.to_string(), |r| format!("{r} dBm"))
}

/// Round-trip latency in milliseconds.
#[must_use]
pub fn format_latency(latency_ms: Option<u64>) -> String {
    latency_ms.map_or_else(|| PLACEHOLDER.to_string(), |ms| format!("{ms}ms"))
}

/// Unix seconds as `YYYY-MM-DD HH:MM:SS` (UTC).
#[must_use]
pub fn format_timestamp(seconds: Option<f64>) -> String {
    seconds
        .and_then(time::from_unix_seconds)
        .map_or_else(
            || PLACEHOLDER.to_string(),
            |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}

/// Percentage with one decimal.
#[must_use]
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => PLACEHOLDER.to_string(),
    }
}
