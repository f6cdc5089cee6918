//! Joystick-style manual input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Middle,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Pressed,
    Held,
    Released,
}

impl Action {
    /// Only presses and auto-repeat holds change engine state.
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Pressed | Self::Held)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoystickEvent {
    pub direction: Direction,
    pub action: Action,
}

impl JoystickEvent {
    pub const fn new(direction: Direction, action: Action) -> Self {
        Self { direction, action }
    }

    pub const fn pressed(direction: Direction) -> Self {
        Self::new(direction, Action::Pressed)
    }

    pub const fn held(direction: Direction) -> Self {
        Self::new(direction, Action::Held)
    }

    pub const fn released(direction: Direction) -> Self {
        Self::new(direction, Action::Released)
    }
}
