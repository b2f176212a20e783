//! Deterministic sensor waveforms.
//!
//! Readings are a function of the sample counter so tests can predict them.
//! Each current channel follows the relay with the same number: a switched-on
//! load draws a few amperes, an idle one only leakage.

use std::f64::consts::TAU;

use minermon_domain::relay::{RelayId, RelayStates};
use minermon_domain::sensor::{SensorReadings, channel_key, sensor_key};

/// DHT sensors wired to the board.
pub const DHT_SENSORS: usize = 2;

/// Current clamps, one per relay.
pub const CURRENT_CHANNELS: usize = 4;

/// The second DHT sensor misses one sample out of this many.
const DROPOUT_EVERY: u64 = 12;

const IDLE_CURRENT: f64 = 0.05;

#[allow(clippy::cast_precision_loss)]
fn wave(sample: u64, period: u64, amplitude: f64) -> f64 {
    amplitude * (TAU * (sample % period) as f64 / period as f64).sin()
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Readings for the `sample`-th request.
pub fn readings(sample: u64, relays: &RelayStates, timestamp: f64) -> SensorReadings {
    let mut readings = SensorReadings {
        timestamp: Some(timestamp),
        ..SensorReadings::default()
    };

    for n in 1..=DHT_SENSORS {
        let offline = n == DHT_SENSORS && sample % DROPOUT_EVERY == DROPOUT_EVERY - 1;
        let (temperature, humidity) = if offline {
            (None, None)
        } else {
            #[allow(clippy::cast_precision_loss)]
            let offset = (n - 1) as f64;
            (
                Some(round(24.0 + 3.0 * offset + wave(sample, 60, 4.0), 1)),
                Some(round(55.0 - 5.0 * offset + wave(sample + 15, 90, 12.0), 1)),
            )
        };
        readings.temperature.insert(sensor_key(n), temperature);
        readings.humidity.insert(sensor_key(n), humidity);
    }

    for (n, id) in (1..=CURRENT_CHANNELS).zip(RelayId::all()) {
        let amps = if relays.get(id).unwrap_or(false) {
            #[allow(clippy::cast_precision_loss)]
            let base = 2.0 + n as f64;
            round(base + wave(sample + n as u64, 20, 0.5), 2)
        } else {
            IDLE_CURRENT
        };
        readings.current.insert(channel_key(n), Some(amps));
    }

    readings
}

/// Simulated CPU load for the `sample`-th status request, in percent.
pub fn cpu_percent(sample: u64) -> f64 {
    round(35.0 + wave(sample, 30, 20.0), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minermon_domain::sensor::SensorKind;

    fn relays(on: &[u8]) -> RelayStates {
        RelayId::all()
            .map(|id| (id, on.contains(&id.index())))
            .collect()
    }

    #[test]
    fn should_report_every_sensor_and_channel() {
        let readings = readings(0, &relays(&[]), 1_640_995_200.0);

        assert_eq!(readings.temperature.len(), DHT_SENSORS);
        assert_eq!(readings.humidity.len(), DHT_SENSORS);
        assert_eq!(readings.current.len(), CURRENT_CHANNELS);
        assert_eq!(readings.value(SensorKind::Temperature, "sensor1"), Some(24.0));
        assert_eq!(readings.timestamp, Some(1_640_995_200.0));
    }

    #[test]
    fn should_draw_current_only_on_active_relays() {
        let readings = readings(3, &relays(&[1]), 0.0);

        assert_eq!(readings.value(SensorKind::Current, "channel1"), Some(IDLE_CURRENT));
        let active = readings.value(SensorKind::Current, "channel2").unwrap();
        assert!((3.5..=4.5).contains(&active));
    }

    #[test]
    fn should_drop_second_sensor_periodically() {
        let readings = readings(DROPOUT_EVERY - 1, &relays(&[]), 0.0);

        assert!(readings.value(SensorKind::Temperature, "sensor1").is_some());
        assert_eq!(readings.temperature.get("sensor2"), Some(&None));
        assert_eq!(readings.humidity.get("sensor2"), Some(&None));
    }

    #[test]
    fn should_keep_cpu_load_within_bounds() {
        assert!((0..30).map(cpu_percent).all(|cpu| (15.0..=55.0).contains(&cpu)));
    }
}
