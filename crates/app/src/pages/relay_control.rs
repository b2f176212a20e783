//! Relay actions shared by the dashboard quick toggles and the relays page.

use std::collections::BTreeSet;

use minermon_domain::relay::{RelayAction, RelayId};

use crate::ports::{DeviceApi, Notifier};
use crate::view::ViewCell;

/// Relays with a control request in flight. Their buttons are disabled.
pub type PendingRelays = ViewCell<BTreeSet<RelayId>>;

/// Send `action` to relay `id` and report the outcome.
///
/// The relay is marked pending for the duration of the request and
/// unmarked on both outcomes. Returns `true` on success so the caller can
/// refresh its view; the local state is never changed optimistically.
/// A relay that is already pending is left alone.
pub async fn apply<A: DeviceApi, N: Notifier>(
    api: &A,
    notifier: &N,
    pending: &PendingRelays,
    id: RelayId,
    action: RelayAction,
) -> bool {
    if pending.with(|p| p.contains(&id)) {
        tracing::debug!(relay = id.index(), "control already in flight");
        return false;
    }
    pending.update(|p| {
        p.insert(id);
    });

    let result = api.control_relay(id, action).await;

    pending.update(|p| {
        p.remove(&id);
    });
    match result {
        Ok(_) => {
            notifier.success(format!("{id}: {action} command sent"));
            true
        }
        Err(err) => {
            notifier.danger(format!("Failed to control {id}: {err}"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoticeLevel;
    use crate::testing::Harness;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn relay(i: u8) -> RelayId {
        RelayId::try_from(i).unwrap()
    }

    #[tokio::test]
    async fn should_notify_success_and_clear_pending() {
        let h = Harness::new();
        h.transport.ok("POST /api/relays/0", r#"{"relay1":true}"#);
        let pending = PendingRelays::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        pending.subscribe(move |p| sink.borrow_mut().push(p.len()));

        let ok = apply(&h.ctx.api, &h.ctx.notifier, &pending, relay(0), RelayAction::On).await;

        assert!(ok);
        assert_eq!(*seen.borrow(), vec![0, 1, 0]);
        assert_eq!(
            h.notifier.last(),
            Some((NoticeLevel::Success, "Relay 1: on command sent".to_string()))
        );
    }

    #[tokio::test]
    async fn should_notify_failure_and_clear_pending() {
        let h = Harness::new();
        let pending = PendingRelays::default();

        let ok = apply(
            &h.ctx.api,
            &h.ctx.notifier,
            &pending,
            relay(2),
            RelayAction::Toggle,
        )
        .await;

        assert!(!ok);
        assert!(pending.with(BTreeSet::is_empty));
        let (level, message) = h.notifier.last().unwrap();
        assert_eq!(level, NoticeLevel::Danger);
        assert!(message.starts_with("Failed to control Relay 3"));
    }

    #[tokio::test]
    async fn should_ignore_relay_already_pending() {
        let h = Harness::new();
        let pending = PendingRelays::default();
        pending.update(|p| {
            p.insert(relay(1));
        });

        let ok = apply(&h.ctx.api, &h.ctx.notifier, &pending, relay(1), RelayAction::Off).await;

        assert!(!ok);
        assert!(h.transport.requests().is_empty());
        assert!(h.notifier.notices().is_empty());
    }
}
