//! Relays page: one card per relay with on/off and toggle controls.

use std::rc::Rc;
use std::time::Duration;

use minermon_domain::format::PLACEHOLDER;
use minermon_domain::relay::{RelayAction, RelayId, RelayStates};

use super::relay_control::{self, PendingRelays};
use crate::config::DashboardConfig;
use crate::context::AppContext;
use crate::lifecycle::{Liveness, Page};
use crate::navigator::PageName;
use crate::ports::{DeviceApi, Notifier};
use crate::view::ViewCell;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelaysView {
    pub states: Option<RelayStates>,
}

/// Display state of one relay card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayCardView {
    pub id: RelayId,
    pub title: String,
    pub state: Option<bool>,
    /// Action offered by the state button, `None` while the state is unknown.
    pub next_action: Option<RelayAction>,
    pub pending: bool,
}

impl RelayCardView {
    #[must_use]
    pub fn state_label(&self) -> &'static str {
        match self.state {
            Some(true) => "ON",
            Some(false) => "OFF",
            None => PLACEHOLDER,
        }
    }

    /// Label of the state button.
    #[must_use]
    pub fn action_label(&self) -> &'static str {
        match self.next_action {
            Some(RelayAction::On) => "Turn on",
            Some(RelayAction::Off) => "Turn off",
            Some(RelayAction::Toggle) => "Toggle",
            None => PLACEHOLDER,
        }
    }

    /// Controls are disabled while a request is in flight or the state is unknown.
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        !self.pending && self.state.is_some()
    }
}

pub struct RelaysPage<A, N> {
    api: A,
    notifier: N,
    config: Rc<DashboardConfig>,
    live: Liveness,
    pub view: ViewCell<RelaysView>,
    pub pending: PendingRelays,
}

impl<A: DeviceApi, N: Notifier> RelaysPage<A, N> {
    pub fn new<S>(ctx: &AppContext<A, S, N>) -> Self {
        Self {
            api: ctx.api.clone(),
            notifier: ctx.notifier.clone(),
            config: Rc::clone(&ctx.config),
            live: Liveness::default(),
            view: ViewCell::default(),
            pending: PendingRelays::default(),
        }
    }

    /// Cards for every relay on the board.
    #[must_use]
    pub fn cards(&self) -> Vec<RelayCardView> {
        let pending = self.pending.get();
        self.view.with(|view| {
            RelayId::all()
                .map(|id| {
                    let state = view.states.as_ref().and_then(|s| s.get(id));
                    RelayCardView {
                        id,
                        title: id.to_string(),
                        state,
                        next_action: state.map(RelayAction::next_for),
                        pending: pending.contains(&id),
                    }
                })
                .collect()
        })
    }

    /// Send `action` to a relay, then refresh all states. Skipped entirely
    /// once the page is destroyed, and the refresh is dropped when that
    /// happens while the command is in flight.
    pub async fn control(&self, id: RelayId, action: RelayAction) {
        if !self.live.is_live() {
            return;
        }
        if relay_control::apply(&self.api, &self.notifier, &self.pending, id, action).await
            && self.live.is_live()
        {
            self.update().await;
        }
    }

    /// Re-read a single relay and merge it into the known states.
    pub async fn refresh_relay(&self, id: RelayId) {
        if !self.live.is_live() {
            return;
        }
        match self.api.get_relay(id).await {
            Ok(single) => self.view.update(|view| {
                let states = view.states.get_or_insert_with(RelayStates::new);
                for (id, state) in single.iter() {
                    states.set(id, state);
                }
            }),
            Err(err) => tracing::warn!(relay = id.index(), error = %err, "failed to refresh relay"),
        }
    }
}

impl<A: DeviceApi, N: Notifier> Page for RelaysPage<A, N> {
    fn name(&self) -> PageName {
        PageName::Relays
    }

    fn liveness(&self) -> &Liveness {
        &self.live
    }

    fn refresh_interval(&self) -> Option<Duration> {
        Some(self.config.refresh.relays())
    }

    fn render(&self) {
        self.view.set(RelaysView::default());
    }

    async fn update(&self) {
        match self.api.get_relays().await {
            Ok(states) => self.view.update(|v| v.states = Some(states)),
            Err(err) => tracing::warn!(error = %err, "failed to refresh relays"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoticeLevel;
    use crate::testing::Harness;
    use crate::lifecycle::PageController;
    use futures_util::FutureExt;

    fn relay(i: u8) -> RelayId {
        RelayId::try_from(i).unwrap()
    }

    #[test]
    fn should_disable_controls_before_first_fetch() {
        let h = Harness::new();
        let page = RelaysPage::new(&h.ctx);

        let cards = page.cards();

        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|c| !c.controls_enabled()));
        assert_eq!(cards[0].state_label(), "--");
        assert_eq!(cards[3].title, "Relay 4");
    }

    #[tokio::test]
    async fn should_offer_off_for_relay_reported_on() {
        let h = Harness::new();
        h.transport.ok("GET /api/relays/2", r#"{"relay3":true}"#);
        let page = RelaysPage::new(&h.ctx);

        page.refresh_relay(relay(2)).await;

        let card = &page.cards()[2];
        assert_eq!(card.state, Some(true));
        assert_eq!(card.state_label(), "ON");
        assert_eq!(card.next_action, Some(RelayAction::Off));
        assert_eq!(card.action_label(), "Turn off");
        assert_eq!(page.cards()[0].state, None);
    }

    #[tokio::test]
    async fn should_offer_on_for_relay_reported_off() {
        let h = Harness::new();
        h.transport.ok("GET /api/relays", r#"{"relay1":false,"relay2":true}"#);
        let page = RelaysPage::new(&h.ctx);

        page.update().await;

        let cards = page.cards();
        assert_eq!(cards[0].next_action, Some(RelayAction::On));
        assert_eq!(cards[1].next_action, Some(RelayAction::Off));
        assert!(cards[0].controls_enabled());
    }

    #[tokio::test]
    async fn should_refresh_states_after_control() {
        let h = Harness::new();
        h.transport.ok("POST /api/relays/0", r#"{"relay1":true}"#);
        h.transport.ok("GET /api/relays", r#"{"relay1":true}"#);
        let page = RelaysPage::new(&h.ctx);

        page.control(relay(0), RelayAction::On).await;

        assert_eq!(
            h.transport.sent(),
            vec!["POST /api/relays/0", "GET /api/relays"]
        );
        assert_eq!(page.cards()[0].state, Some(true));
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Success));
    }

    #[tokio::test]
    async fn should_leave_state_untouched_when_control_fails() {
        let h = Harness::new();
        h.transport.ok("GET /api/relays", r#"{"relay1":false}"#);
        let page = RelaysPage::new(&h.ctx);
        page.update().await;
        h.transport.clear_requests();

        page.control(relay(0), RelayAction::On).await;

        assert_eq!(h.transport.sent(), vec!["POST /api/relays/0"]);
        assert_eq!(page.cards()[0].state, Some(false));
        assert!(!page.cards()[0].pending);
        assert_eq!(h.notifier.last().map(|n| n.0), Some(NoticeLevel::Danger));
    }

    #[tokio::test]
    async fn should_not_send_commands_once_destroyed() {
        let h = Harness::new();
        h.transport.ok("GET /api/relays", r#"{"relay1":false}"#);
        let controller = PageController::new(RelaysPage::new(&h.ctx), h.scheduler.clone());
        controller.mount().await;
        controller.destroy();
        h.transport.clear_requests();

        controller.page().control(relay(0), RelayAction::On).await;
        controller.page().refresh_relay(relay(0)).await;

        assert!(h.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn should_skip_refresh_when_destroyed_during_command() {
        let h = Harness::new();
        h.transport.ok("GET /api/relays", r#"{"relay1":false}"#);
        h.transport.ok("POST /api/relays/0", r#"{"relay1":true}"#);
        let release = h.transport.hold("POST /api/relays/0");
        let controller = PageController::new(RelaysPage::new(&h.ctx), h.scheduler.clone());
        controller.mount().await;
        h.transport.clear_requests();

        let mut control = Box::pin(controller.page().control(relay(0), RelayAction::On));
        assert!((&mut control).now_or_never().is_none());
        controller.destroy();
        release.notify_one();
        control.await;

        assert_eq!(h.transport.sent(), vec!["POST /api/relays/0"]);
        assert!(!controller.page().cards()[0].pending);
    }
}
