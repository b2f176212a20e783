//! Time and timestamp helpers.
//!
//! The device reports times as fractional unix seconds; the dashboard measures
//! request latency with the wall clock (the browser has no monotonic clock
//! reachable from `std`).

use chrono::{DateTime, Utc};

/// UTC timestamp used for reading times, ping round-trips, log display.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Convert fractional unix seconds (as sent by the device) to a timestamp.
///
/// Returns `None` for values that are negative, not finite, or out of range.
#[must_use]
pub fn from_unix_seconds(seconds: f64) -> Option<Timestamp> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}

/// Whole milliseconds elapsed between two instants, clamped at zero.
#[must_use]
pub fn elapsed_millis(start: Timestamp, end: Timestamp) -> u64 {
    u64::try_from((end - start).num_milliseconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_convert_fractional_unix_seconds() {
        let ts = from_unix_seconds(1_640_995_200.5).unwrap();
        assert_eq!(ts.timestamp(), 1_640_995_200);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn should_reject_negative_or_nan_seconds() {
        assert!(from_unix_seconds(-1.0).is_none());
        assert!(from_unix_seconds(f64::NAN).is_none());
    }

    #[test]
    fn should_clamp_elapsed_to_zero_when_clock_goes_backwards() {
        let later = now();
        let earlier = later - chrono::Duration::milliseconds(40);
        assert_eq!(elapsed_millis(earlier, later), 40);
        assert_eq!(elapsed_millis(later, earlier), 0);
    }
}
