//! Logical input actions and their key bindings
//!
//! The shell translates raw key presses into `Action`s through `KeyBindings`;
//! nothing below the session ever sees a physical key. Keys are identified by
//! lowercase names ("up", "enter", "esc", "space", or a single character).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::Facing;

/// Something the player can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Pause,
    Confirm,
    ToggleGod,
    GrantLife,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Pause,
        Action::Confirm,
        Action::ToggleGod,
        Action::GrantLife,
    ];

    /// Hop direction for movement actions
    pub fn facing(self) -> Option<Facing> {
        match self {
            Action::Up => Some(Facing::Up),
            Action::Down => Some(Facing::Down),
            Action::Left => Some(Facing::Left),
            Action::Right => Some(Facing::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
            Action::Pause => "PAUSE",
            Action::Confirm => "CONFIRM",
            Action::ToggleGod => "GOD MODE",
            Action::GrantLife => "EXTRA LIFE",
        }
    }
}

/// Action to key-name map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<Action, String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = [
            (Action::Up, "up"),
            (Action::Down, "down"),
            (Action::Left, "left"),
            (Action::Right, "right"),
            (Action::Pause, "esc"),
            (Action::Confirm, "enter"),
            (Action::ToggleGod, "g"),
            (Action::GrantLife, "l"),
        ]
        .into_iter()
        .map(|(a, k)| (a, k.to_string()))
        .collect();
        Self { keys }
    }
}

impl KeyBindings {
    /// Key bound to an action, falling back to the default binding
    pub fn key_for(&self, action: Action) -> String {
        match self.keys.get(&action) {
            Some(key) => key.clone(),
            None => Self::default()
                .keys
                .get(&action)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Action bound to a key, if any
    pub fn action_for(&self, key: &str) -> Option<Action> {
        let key = key.to_lowercase();
        Action::ALL
            .into_iter()
            .find(|&action| self.key_for(action) == key)
    }

    /// Bind `key` to `action`. An action already using that key takes over
    /// the old key of `action`, so no key ever maps to two actions.
    pub fn rebind(&mut self, action: Action, key: &str) {
        let key = key.to_lowercase();
        let old = self.key_for(action);
        if let Some(other) = self.action_for(&key).filter(|&a| a != action) {
            log::debug!("Key {:?} moved from {:?} to {:?}", key, other, action);
            self.keys.insert(other, old);
        }
        log::info!("Bound {:?} to {:?}", action, key);
        self.keys.insert(action, key);
    }
}
