//! Relay identifiers, states and control actions.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Number of relays on the board.
pub const RELAY_COUNT: u8 = 4;

/// Zero-based relay index, guaranteed to be in `0..RELAY_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayId(u8);

impl RelayId {
    /// Every relay, in board order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..RELAY_COUNT).map(Self)
    }

    /// Zero-based index used in `/api/relays/{id}`.
    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }

    /// One-based number shown to the user.
    #[must_use]
    pub fn number(self) -> u8 {
        self.0 + 1
    }

    /// Key used in state maps (`relay1`..`relay4`).
    #[must_use]
    pub fn wire_key(self) -> String {
        format!("relay{}", self.number())
    }

    /// Parse a `relayN` key back into an id.
    #[must_use]
    pub fn from_wire_key(key: &str) -> Option<Self> {
        let n: u8 = key.strip_prefix("relay")?.parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::try_from(i).ok())
    }
}

impl TryFrom<u8> for RelayId {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < RELAY_COUNT {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidRelayId(value))
        }
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relay {}", self.number())
    }
}

/// Command sent to a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayAction {
    On,
    Off,
    Toggle,
}

impl RelayAction {
    /// The action a state button offers for the current state.
    #[must_use]
    pub fn next_for(state: bool) -> Self {
        if state { Self::Off } else { Self::On }
    }

    /// Resulting state when applied to `current`.
    #[must_use]
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Toggle => "toggle",
        }
    }
}

impl fmt::Display for RelayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/relays/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayControlRequest {
    pub action: RelayAction,
}

/// Relay states keyed by id, on the wire `{"relay1": true, …}`.
///
/// Also used for single-relay answers, which carry one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStates(BTreeMap<RelayId, bool>);

impl RelayStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a relay, `None` when the device did not report it.
    #[must_use]
    pub fn get(&self, id: RelayId) -> Option<bool> {
        self.0.get(&id).copied()
    }

    pub fn set(&mut self, id: RelayId, state: bool) {
        self.0.insert(id, state);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelayId, bool)> + '_ {
        self.0.iter().map(|(id, state)| (*id, *state))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(RelayId, bool)> for RelayStates {
    fn from_iter<I: IntoIterator<Item = (RelayId, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for RelayStates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, state) in &self.0 {
            map.serialize_entry(&id.wire_key(), state)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RelayStates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatesVisitor;

        impl<'de> Visitor<'de> for StatesVisitor {
            type Value = RelayStates;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of relayN keys to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut states = RelayStates::new();
                while let Some(key) = access.next_key::<String>()? {
                    match RelayId::from_wire_key(&key) {
                        Some(id) => states.set(id, access.next_value()?),
                        None => {
                            access.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(states)
            }
        }

        deserializer.deserialize_map(StatesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(i: u8) -> RelayId {
        RelayId::try_from(i).unwrap()
    }

    #[test]
    fn should_reject_out_of_range_relay_id() {
        assert_eq!(
            RelayId::try_from(4),
            Err(ValidationError::InvalidRelayId(4))
        );
        assert!(RelayId::try_from(3).is_ok());
    }

    #[test]
    fn should_use_one_based_wire_key() {
        assert_eq!(relay(0).wire_key(), "relay1");
        assert_eq!(relay(3).wire_key(), "relay4");
        assert_eq!(RelayId::from_wire_key("relay3"), Some(relay(2)));
        assert_eq!(RelayId::from_wire_key("relay0"), None);
        assert_eq!(RelayId::from_wire_key("relay5"), None);
    }

    #[test]
    fn should_offer_opposite_action_for_state() {
        assert_eq!(RelayAction::next_for(true), RelayAction::Off);
        assert_eq!(RelayAction::next_for(false), RelayAction::On);
    }

    #[test]
    fn should_apply_actions() {
        assert!(RelayAction::Toggle.apply(false));
        assert!(!RelayAction::Toggle.apply(true));
        assert!(RelayAction::On.apply(true));
        assert!(!RelayAction::Off.apply(true));
    }

    #[test]
    fn should_parse_single_relay_answer() {
        let states: RelayStates = serde_json::from_str(r#"{"relay3": true}"#).unwrap();
        assert_eq!(states.get(relay(2)), Some(true));
        assert_eq!(states.get(relay(0)), None);
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn should_ignore_unknown_keys() {
        let states: RelayStates =
            serde_json::from_str(r#"{"relay1": false, "relay9": true, "fan": {"x": 1}}"#).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states.get(relay(0)), Some(false));
    }

    #[test]
    fn should_serialize_relay_keys_in_order() {
        let states: RelayStates = [(relay(1), true), (relay(0), false)].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&states).unwrap(),
            r#"{"relay1":false,"relay2":true}"#
        );
    }

    #[test]
    fn should_serialize_control_request_in_lowercase() {
        let body = RelayControlRequest {
            action: RelayAction::Toggle,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"action":"toggle"}"#
        );
    }
}
