//! Actions: the only way to request a state transition
//!
//! Inside the crate actions are the typed [`Action`] enum. Hosts that speak
//! in `{name, payload}` messages go through [`ActionMessage`], which is
//! decoded at the boundary.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A request to transition game state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Point the barrel at a world-space position
    Aim { x: f64, y: f64 },
    /// Launch a ball from the muzzle
    Shoot,
    /// Lock or unlock the barrel
    ToggleAim,
    /// Advance the simulation by `delta` seconds
    Tick { delta: f64 },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Aim { .. } => "AIM",
            Action::Shoot => "SHOOT",
            Action::ToggleAim => "TOGGLE_AIM",
            Action::Tick { .. } => "TICK",
        }
    }
}

/// Untyped action as sent by a host: a name plus a JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMessage {
    pub name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ActionMessage {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Why an [`ActionMessage`] could not be turned into an [`Action`]
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unknown action {0:?}")]
    Unknown(String),
    #[error("invalid payload for {name}: {source}")]
    InvalidPayload {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct AimPayload {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct TickPayload {
    delta: f64,
}

fn payload<T: DeserializeOwned>(
    name: &'static str,
    value: &serde_json::Value,
) -> Result<T, ActionError> {
    T::deserialize(value).map_err(|source| ActionError::InvalidPayload { name, source })
}

impl TryFrom<&ActionMessage> for Action {
    type Error = ActionError;

    fn try_from(msg: &ActionMessage) -> Result<Self, Self::Error> {
        match msg.name.as_str() {
            "AIM" => {
                let AimPayload { x, y } = payload("AIM", &msg.payload)?;
                Ok(Action::Aim { x, y })
            }
            "SHOOT" => Ok(Action::Shoot),
            "TOGGLE_AIM" => Ok(Action::ToggleAim),
            "TICK" => {
                let TickPayload { delta } = payload("TICK", &msg.payload)?;
                Ok(Action::Tick { delta })
            }
            other => Err(ActionError::Unknown(other.to_string())),
        }
    }
}

/// Default input a host should map to a player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMapping {
    MouseMove,
    #[serde(rename = "MOUSE_LCLICK")]
    MouseLeftClick,
    #[serde(rename = "MOUSE_RCLICK")]
    MouseRightClick,
    /// The "a" key
    KeyA,
}

/// A player-facing action and how a host should bind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionBinding {
    pub action: &'static str,
    pub description: &'static str,
    pub default_mapping: InputMapping,
    /// Secondary input bound to the same action, if any
    pub alternate_mapping: Option<InputMapping>,
}

/// Actions a player can issue. TICK is reserved for the scheduler.
pub const PLAYER_ACTIONS: [ActionBinding; 3] = [
    ActionBinding {
        action: "AIM",
        description: "Adjust the direction the ball is launched",
        default_mapping: InputMapping::MouseMove,
        alternate_mapping: None,
    },
    ActionBinding {
        action: "SHOOT",
        description: "Launch the ball from the cannon",
        default_mapping: InputMapping::MouseLeftClick,
        alternate_mapping: None,
    },
    ActionBinding {
        action: "TOGGLE_AIM",
        description: "Toggle aiming movement",
        default_mapping: InputMapping::MouseRightClick,
        alternate_mapping: Some(InputMapping::KeyA),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_decoding() {
        let aim = ActionMessage::new("AIM", json!({ "x": 12.5, "y": -3.0 }));
        assert_eq!(
            Action::try_from(&aim).unwrap(),
            Action::Aim { x: 12.5, y: -3.0 }
        );

        let shoot = ActionMessage::new("SHOOT", serde_json::Value::Null);
        assert_eq!(Action::try_from(&shoot).unwrap(), Action::Shoot);

        let tick = ActionMessage::new("TICK", json!({ "delta": 0.016 }));
        assert_eq!(
            Action::try_from(&tick).unwrap(),
            Action::Tick { delta: 0.016 }
        );
    }

    #[test]
    fn test_unknown_and_malformed_messages() {
        let unknown = ActionMessage::new("JUMP", serde_json::Value::Null);
        assert!(matches!(
            Action::try_from(&unknown),
            Err(ActionError::Unknown(name)) if name == "JUMP"
        ));

        let bad = ActionMessage::new("AIM", json!({ "x": 1.0 }));
        assert!(matches!(
            Action::try_from(&bad),
            Err(ActionError::InvalidPayload { name: "AIM", .. })
        ));
    }

    #[test]
    fn test_action_wire_format() {
        let json = serde_json::to_value(Action::Aim { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(json, json!({ "name": "AIM", "payload": { "x": 1.0, "y": 2.0 } }));

        let toggle: Action = serde_json::from_value(json!({ "name": "TOGGLE_AIM" })).unwrap();
        assert_eq!(toggle, Action::ToggleAim);
        assert_eq!(toggle.name(), "TOGGLE_AIM");
    }

    #[test]
    fn test_player_action_bindings() {
        let names: Vec<_> = PLAYER_ACTIONS.iter().map(|b| b.action).collect();
        assert_eq!(names, ["AIM", "SHOOT", "TOGGLE_AIM"]);
        let mapping = serde_json::to_string(&PLAYER_ACTIONS[1].default_mapping).unwrap();
        assert_eq!(mapping, "\"MOUSE_LCLICK\"");

        let toggle = &PLAYER_ACTIONS[2];
        assert_eq!(toggle.alternate_mapping, Some(InputMapping::KeyA));
        let key = serde_json::to_string(&toggle.alternate_mapping).unwrap();
        assert_eq!(key, "\"KEY_A\"");
        assert!(PLAYER_ACTIONS[..2].iter().all(|b| b.alternate_mapping.is_none()));
    }
}
