//! Page logic: what each page fetches, how often, and what it displays.
//!
//! Pages write display-ready state into [`ViewCell`]s; the front end only
//! renders it.

pub mod dashboard;
pub mod relay_control;
pub mod relays;
pub mod sensors;
pub mod settings;
pub mod system;

use futures_util::future::LocalBoxFuture;

use minermon_domain::color::{ColorBucket, value_color};
use minermon_domain::format::format_number;
use minermon_domain::sensor::{SensorKind, SensorReadings, channel_key, sensor_key};

use crate::context::AppContext;
use crate::lifecycle::PageController;
use crate::navigator::{Lifecycle, PageFactory, PageName};
use crate::ports::{DeviceApi, Notifier, Scheduler};

pub use dashboard::DashboardPage;
pub use relays::RelaysPage;
pub use sensors::SensorsPage;
pub use settings::SettingsPage;
pub use system::SystemPage;

/// DHT sensors shown even before the device reports them.
pub const DHT_SENSORS: usize = 2;
/// Current channels shown even before the device reports them.
pub const CURRENT_CHANNELS: usize = 4;

/// One formatted reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricView {
    pub key: String,
    pub label: String,
    pub value: String,
    pub unit: &'static str,
    pub color: ColorBucket,
}

/// Formatted readings of one kind, placeholders included.
///
/// The expected sensors (two DHT sensors, four current channels) are always
/// listed; extra keys reported by the device are appended.
#[must_use]
pub fn metrics(readings: Option<&SensorReadings>, kind: SensorKind) -> Vec<MetricView> {
    let (count, key_of, label_prefix): (usize, fn(usize) -> String, &str) = match kind {
        SensorKind::Temperature | SensorKind::Humidity => (DHT_SENSORS, sensor_key, "Sensor"),
        SensorKind::Current => (CURRENT_CHANNELS, channel_key, "Channel"),
    };

    let mut keys: Vec<String> = (1..=count).map(key_of).collect();
    if let Some(readings) = readings {
        for key in readings.group(kind).keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }

    keys.into_iter()
        .map(|key| {
            let value = readings.and_then(|r| r.value(kind, &key));
            let label = key
                .trim_start_matches(|c: char| c.is_ascii_alphabetic())
                .parse::<usize>()
                .map_or_else(|_| key.clone(), |n| format!("{label_prefix} {n}"));
            MetricView {
                label,
                value: format_number(value, kind.decimals()),
                unit: kind.unit(),
                color: value_color(value, kind),
                key,
            }
        })
        .collect()
}

/// One page, behind its lifecycle controller.
pub enum Screen<A, S: Scheduler, N> {
    Dashboard(PageController<DashboardPage<A, N>, S>),
    Sensors(PageController<SensorsPage<A>, S>),
    Relays(PageController<RelaysPage<A, N>, S>),
    Settings(PageController<SettingsPage<A, N>, S>),
    System(PageController<SystemPage<A, N>, S>),
}

impl<A, S: Scheduler, N> Clone for Screen<A, S, N> {
    fn clone(&self) -> Self {
        match self {
            Self::Dashboard(c) => Self::Dashboard(c.clone()),
            Self::Sensors(c) => Self::Sensors(c.clone()),
            Self::Relays(c) => Self::Relays(c.clone()),
            Self::Settings(c) => Self::Settings(c.clone()),
            Self::System(c) => Self::System(c.clone()),
        }
    }
}

impl<A: DeviceApi, S: Scheduler, N: Notifier> Lifecycle for Screen<A, S, N> {
    fn name(&self) -> PageName {
        match self {
            Self::Dashboard(_) => PageName::Dashboard,
            Self::Sensors(_) => PageName::Sensors,
            Self::Relays(_) => PageName::Relays,
            Self::Settings(_) => PageName::Settings,
            Self::System(_) => PageName::System,
        }
    }

    fn mount(&self) -> LocalBoxFuture<'static, ()> {
        match self {
            Self::Dashboard(c) => c.mount(),
            Self::Sensors(c) => c.mount(),
            Self::Relays(c) => c.mount(),
            Self::Settings(c) => c.mount(),
            Self::System(c) => c.mount(),
        }
    }

    fn destroy(&self) {
        match self {
            Self::Dashboard(c) => c.destroy(),
            Self::Sensors(c) => c.destroy(),
            Self::Relays(c) => c.destroy(),
            Self::Settings(c) => c.destroy(),
            Self::System(c) => c.destroy(),
        }
    }
}

/// Builds a fresh [`Screen`] from the shared context on every navigation.
pub struct ScreenFactory<A, S, N> {
    ctx: AppContext<A, S, N>,
}

impl<A, S, N> ScreenFactory<A, S, N> {
    pub fn new(ctx: AppContext<A, S, N>) -> Self {
        Self { ctx }
    }
}

impl<A: DeviceApi, S: Scheduler, N: Notifier> PageFactory for ScreenFactory<A, S, N> {
    type Screen = Screen<A, S, N>;

    fn build(&self, name: PageName) -> Self::Screen {
        let scheduler = self.ctx.scheduler.clone();
        match name {
            PageName::Dashboard => {
                Screen::Dashboard(PageController::new(DashboardPage::new(&self.ctx), scheduler))
            }
            PageName::Sensors => {
                Screen::Sensors(PageController::new(SensorsPage::new(&self.ctx), scheduler))
            }
            PageName::Relays => {
                Screen::Relays(PageController::new(RelaysPage::new(&self.ctx), scheduler))
            }
            PageName::Settings => {
                Screen::Settings(PageController::new(SettingsPage::new(&self.ctx), scheduler))
            }
            PageName::System => {
                Screen::System(PageController::new(SystemPage::new(&self.ctx), scheduler))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::navigator::Navigator;
    use crate::testing::Harness;

    #[test]
    fn should_list_placeholders_before_first_reading() {
        let rows = metrics(None, SensorKind::Current);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|m| m.value == "--"));
        assert!(rows.iter().all(|m| m.color == ColorBucket::Muted));
        assert_eq!(rows[2].label, "Channel 3");
    }

    #[test]
    fn should_format_and_color_reported_values() {
        let readings: SensorReadings = serde_json::from_str(
            r#"{"temperature":{"sensor1":31.26,"sensor3":18.0},"humidity":{},"current":{}}"#,
        )
        .unwrap();

        let rows = metrics(Some(&readings), SensorKind::Temperature);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].value, "31.3");
        assert_eq!(rows[0].color, ColorBucket::Warning);
        assert_eq!(rows[1].value, "--");
        assert_eq!(rows[2].label, "Sensor 3");
        assert_eq!(rows[2].color, ColorBucket::Info);
        assert_eq!(rows[2].unit, "\u{b0}C");
    }

    #[tokio::test]
    async fn should_stop_dashboard_polling_when_navigating_to_relays() {
        let harness = Harness::new();
        let nav = Navigator::new(ScreenFactory::new(harness.ctx.clone()));

        nav.navigate(PageName::Dashboard).unwrap().await;
        assert_eq!(harness.scheduler.periods(), vec![Duration::from_secs(5)]);

        nav.navigate(PageName::Relays).unwrap().await;
        assert_eq!(harness.scheduler.active(), 1);

        harness.transport.clear_requests();
        harness.scheduler.fire().await;
        assert_eq!(harness.transport.sent(), vec!["GET /api/relays"]);
    }

    #[tokio::test]
    async fn should_not_poll_settings_page() {
        let harness = Harness::new();
        let nav = Navigator::new(ScreenFactory::new(harness.ctx.clone()));

        nav.navigate(PageName::System).unwrap().await;
        assert_eq!(harness.scheduler.periods(), vec![Duration::from_secs(10)]);

        nav.navigate(PageName::Settings).unwrap().await;
        assert_eq!(harness.scheduler.active(), 0);
    }
}
