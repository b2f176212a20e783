//! Sensors page: every reading with its threshold color.

use std::rc::Rc;
use std::time::Duration;

use minermon_domain::format::format_timestamp;
use minermon_domain::sensor::{SensorKind, SensorReadings};

use super::{MetricView, metrics};
use crate::config::DashboardConfig;
use crate::context::AppContext;
use crate::lifecycle::{Liveness, Page};
use crate::navigator::PageName;
use crate::ports::DeviceApi;
use crate::view::ViewCell;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorsView {
    pub readings: Option<SensorReadings>,
}

impl SensorsView {
    #[must_use]
    pub fn metrics(&self, kind: SensorKind) -> Vec<MetricView> {
        metrics(self.readings.as_ref(), kind)
    }

    /// When the device sampled the readings.
    #[must_use]
    pub fn sampled_at(&self) -> String {
        format_timestamp(self.readings.as_ref().and_then(|r| r.timestamp))
    }
}

pub struct SensorsPage<A> {
    api: A,
    config: Rc<DashboardConfig>,
    live: Liveness,
    pub view: ViewCell<SensorsView>,
}

impl<A: DeviceApi> SensorsPage<A> {
    pub fn new<S, N>(ctx: &AppContext<A, S, N>) -> Self {
        Self {
            api: ctx.api.clone(),
            config: Rc::clone(&ctx.config),
            live: Liveness::default(),
            view: ViewCell::default(),
        }
    }
}

impl<A: DeviceApi> Page for SensorsPage<A> {
    fn name(&self) -> PageName {
        PageName::Sensors
    }

    fn liveness(&self) -> &Liveness {
        &self.live
    }

    fn refresh_interval(&self) -> Option<Duration> {
        Some(self.config.refresh.sensors())
    }

    fn render(&self) {
        self.view.set(SensorsView::default());
    }

    async fn update(&self) {
        match self.api.get_sensors().await {
            Ok(readings) => self.view.update(|v| v.readings = Some(readings)),
            Err(err) => tracing::warn!(error = %err, "failed to refresh sensors"),
        }
    }
}
