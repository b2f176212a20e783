//! Device reachability probe.

use minermon_domain::color::{ColorBucket, latency_color};
use minermon_domain::format::format_latency;
use minermon_domain::time;

use crate::ports::DeviceApi;

/// Outcome of a ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected { latency_ms: u64 },
    Disconnected { reason: String },
}

impl ConnectionStatus {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Short status line for the header.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Connected { latency_ms } => {
                format!("Connected ({})", format_latency(Some(*latency_ms)))
            }
            Self::Disconnected { .. } => "Disconnected".to_string(),
        }
    }

    #[must_use]
    pub fn color(&self) -> ColorBucket {
        match self {
            Self::Connected { latency_ms } => latency_color(*latency_ms),
            Self::Disconnected { .. } => ColorBucket::Danger,
        }
    }
}

/// Ping the device and measure the round trip.
#[tracing::instrument(skip(api))]
pub async fn probe<A: DeviceApi>(api: &A) -> ConnectionStatus {
    let start = time::now();
    match api.ping().await {
        Ok(_) => {
            let latency_ms = time::elapsed_millis(start, time::now());
            tracing::debug!(latency_ms, "device reachable");
            ConnectionStatus::Connected { latency_ms }
        }
        Err(err) => {
            tracing::warn!(error = %err, "device unreachable");
            ConnectionStatus::Disconnected {
                reason: err.to_string(),
            }
        }
    }
}
