//! Input state tracking
//!
//! The host translates raw key events into [`Action`]s between frames and
//! feeds them here; the simulation reads held state during `update`.

use serde::{Deserialize, Serialize};

/// Logical game actions. Key bindings live in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Forward,
    Back,
    Raise,
    Lower,
    /// Tear down the session and build a fresh one
    Restart,
}

/// Per-button state: press edges since the last frame, plus held state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Key-down transitions since the last per-frame reset. Movement only
    /// reads `held`; this counter is kept for discrete actions.
    pub edge_count: u32,
    pub held: bool,
}

impl Button {
    fn press(&mut self) {
        self.edge_count += 1;
        self.held = true;
    }

    fn release(&mut self) {
        self.held = false;
    }
}

/// Held/edge state for the six movement buttons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub turn_left: Button,
    pub turn_right: Button,
    pub forward: Button,
    pub back: Button,
    pub raise: Button,
    pub lower: Button,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one key transition. Returns whether the action was consumed;
    /// [`Action::Restart`] is a session-level command and is not tracked
    /// here.
    pub fn on_key(&mut self, action: Action, is_down: bool) -> bool {
        let button = match action {
            Action::TurnLeft => &mut self.turn_left,
            Action::TurnRight => &mut self.turn_right,
            Action::Forward => &mut self.forward,
            Action::Back => &mut self.back,
            Action::Raise => &mut self.raise,
            Action::Lower => &mut self.lower,
            Action::Restart => return false,
        };
        if is_down {
            button.press();
        } else {
            button.release();
        }
        true
    }

    /// Net turn: +1 left, -1 right, 0 when both or neither are held
    pub fn turn_amount(&self) -> f32 {
        let mut amt = 0.0;
        if self.turn_left.held && !self.turn_right.held {
            amt += 1.0;
        }
        if !self.turn_left.held && self.turn_right.held {
            amt -= 1.0;
        }
        amt
    }

    /// Net forward/back: +1 forward, -1 back, 0 when both or neither
    pub fn move_amount(&self) -> f32 {
        if self.forward.held && !self.back.held {
            1.0
        } else if !self.forward.held && self.back.held {
            -1.0
        } else {
            0.0
        }
    }

    /// Net raise/lower: +1 up, -1 down, 0 when both or neither
    pub fn lift_amount(&self) -> f32 {
        if self.raise.held && !self.lower.held {
            1.0
        } else if !self.raise.held && self.lower.held {
            -1.0
        } else {
            0.0
        }
    }

    /// Clear edge counters. Called once per frame, after the transform
    /// composer has consumed input.
    pub fn reset_edges(&mut self) {
        for button in [
            &mut self.turn_left,
            &mut self.turn_right,
            &mut self.forward,
            &mut self.back,
            &mut self.raise,
            &mut self.lower,
        ] {
            button.edge_count = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_count_downs_only() {
        let mut input = InputState::new();
        assert!(input.on_key(Action::Forward, true));
        assert!(input.on_key(Action::Forward, false));
        assert!(input.on_key(Action::Forward, true));
        assert_eq!(input.forward.edge_count, 2);
        assert!(input.forward.held);

        assert!(input.on_key(Action::Forward, false));
        // Release never bumps the counter
        assert_eq!(input.forward.edge_count, 2);
        assert!(!input.forward.held);
    }

    #[test]
    fn test_reset_edges_keeps_held() {
        let mut input = InputState::new();
        input.on_key(Action::Raise, true);
        input.reset_edges();
        assert_eq!(input.raise.edge_count, 0);
        assert!(input.raise.held);
    }

    #[test]
    fn test_simultaneous_presses_cancel() {
        let mut input = InputState::new();
        input.on_key(Action::TurnLeft, true);
        assert_eq!(input.turn_amount(), 1.0);
        input.on_key(Action::TurnRight, true);
        assert_eq!(input.turn_amount(), 0.0);

        input.on_key(Action::Raise, true);
        input.on_key(Action::Lower, true);
        assert_eq!(input.lift_amount(), 0.0);

        input.on_key(Action::Back, true);
        assert_eq!(input.move_amount(), -1.0);
    }

    #[test]
    fn test_restart_is_not_button_state() {
        let mut input = InputState::new();
        assert!(!input.on_key(Action::Restart, true));
        assert_eq!(input, InputState::new());
    }
}
