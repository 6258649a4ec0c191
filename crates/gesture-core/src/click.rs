//! Click, double-click, and hold/drag detection for the pointer hand.
//!
//! Clicks fire on rising edges only: a pose held across frames fires once.
//! Hold/drag presses the button when the pose appears and releases it when
//! the pose ends or the controlling hand disappears.

use handpilot_common::clock::{elapsed_ns, secs_to_ns};
use handpilot_hand_model::{ActionKind, TimestampNs};

use crate::classifier::GestureToken;

/// Observable phase of the click state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickPhase {
    Idle,
    /// A click edge fired this frame.
    Armed,
    /// The primary button is held down.
    Holding,
}

/// Persistent click state, checkpointed between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickState {
    pub prev_primary: bool,
    pub prev_secondary: bool,
    pub holding: bool,
    pub last_click_ns: Option<TimestampNs>,
}

/// Edge-detecting click state machine.
#[derive(Debug, Clone)]
pub struct ClickStateMachine {
    state: ClickState,
    double_click_ns: u64,
    phase: ClickPhase,
}

impl ClickStateMachine {
    pub fn new(double_click_threshold_secs: f64) -> Self {
        Self {
            state: ClickState::default(),
            double_click_ns: secs_to_ns(double_click_threshold_secs),
            phase: ClickPhase::Idle,
        }
    }

    /// Advance one frame. `token` is `None` when no pointer hand was seen.
    ///
    /// Returns the fired actions in order. A release always precedes a
    /// click fired in the same frame.
    pub fn update(&mut self, token: Option<GestureToken>, now: TimestampNs) -> Vec<ActionKind> {
        let mut fired = Vec::new();
        let mut clicked = false;

        let Some(token) = token else {
            // No controlling hand: never leave the button down.
            if self.state.holding {
                tracing::debug!("pointer hand lost while holding, releasing");
                self.state.holding = false;
                fired.push(ActionKind::MouseUp);
            }
            self.phase = self.resting_phase();
            return fired;
        };

        let primary = token == GestureToken::PrimaryClick;
        let secondary = token == GestureToken::SecondaryClick;
        let hold = token == GestureToken::HoldDrag;

        if !hold && self.state.holding {
            self.state.holding = false;
            fired.push(ActionKind::MouseUp);
        }

        if primary && !self.state.prev_primary {
            let is_double = self
                .state
                .last_click_ns
                .is_some_and(|last| elapsed_ns(last, now) < self.double_click_ns);
            fired.push(if is_double {
                ActionKind::DoubleClick
            } else {
                ActionKind::Click
            });
            self.state.last_click_ns = Some(now);
            clicked = true;
        } else if secondary && !self.state.prev_secondary {
            fired.push(ActionKind::RightClick);
            clicked = true;
        }

        if hold && !self.state.holding {
            self.state.holding = true;
            fired.push(ActionKind::MouseDown);
        }

        self.state.prev_primary = primary;
        self.state.prev_secondary = secondary;
        self.phase = if clicked {
            ClickPhase::Armed
        } else {
            self.resting_phase()
        };

        if !fired.is_empty() {
            tracing::debug!(?token, ?fired, "click transition");
        }
        fired
    }

    /// Release a held button, if any. Used on shutdown.
    pub fn force_release(&mut self) -> Option<ActionKind> {
        if self.state.holding {
            self.state.holding = false;
            self.phase = ClickPhase::Idle;
            Some(ActionKind::MouseUp)
        } else {
            None
        }
    }

    pub fn phase(&self) -> ClickPhase {
        self.phase
    }

    pub fn state(&self) -> &ClickState {
        &self.state
    }

    pub fn is_holding(&self) -> bool {
        self.state.holding
    }

    fn resting_phase(&self) -> ClickPhase {
        if self.state.holding {
            ClickPhase::Holding
        } else {
            ClickPhase::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    fn machine() -> ClickStateMachine {
        ClickStateMachine::new(0.3)
    }

    #[test]
    fn test_held_click_fires_once() {
        let mut m = machine();
        let mut all = Vec::new();
        for i in 0..10 {
            all.extend(m.update(Some(GestureToken::PrimaryClick), i * 33 * MS));
        }
        assert_eq!(all, vec![ActionKind::Click]);
    }

    #[test]
    fn test_quick_second_click_is_double() {
        let mut m = machine();
        assert_eq!(m.update(Some(GestureToken::PrimaryClick), 0), vec![ActionKind::Click]);
        assert_eq!(m.phase(), ClickPhase::Armed);
        assert!(m.update(Some(GestureToken::Move), 100 * MS).is_empty());
        assert_eq!(m.phase(), ClickPhase::Idle);
        assert_eq!(
            m.update(Some(GestureToken::PrimaryClick), 200 * MS),
            vec![ActionKind::DoubleClick]
        );
    }

    #[test]
    fn test_slow_second_click_is_single() {
        let mut m = machine();
        m.update(Some(GestureToken::PrimaryClick), 0);
        m.update(Some(GestureToken::Move), 100 * MS);
        assert_eq!(
            m.update(Some(GestureToken::PrimaryClick), 300 * MS),
            vec![ActionKind::Click]
        );
    }

    #[test]
    fn test_right_click_edge() {
        let mut m = machine();
        assert_eq!(
            m.update(Some(GestureToken::SecondaryClick), 0),
            vec![ActionKind::RightClick]
        );
        assert!(m.update(Some(GestureToken::SecondaryClick), 33 * MS).is_empty());
        m.update(Some(GestureToken::Move), 66 * MS);
        assert_eq!(
            m.update(Some(GestureToken::SecondaryClick), 99 * MS),
            vec![ActionKind::RightClick]
        );
    }

    #[test]
    fn test_hold_press_and_release_once() {
        let mut m = machine();
        let mut all = Vec::new();
        for i in 0..5 {
            all.extend(m.update(Some(GestureToken::HoldDrag), i * MS));
            assert!(m.is_holding());
            assert_eq!(m.phase(), ClickPhase::Holding);
        }
        for i in 5..8 {
            all.extend(m.update(Some(GestureToken::Move), i * MS));
        }
        assert_eq!(all, vec![ActionKind::MouseDown, ActionKind::MouseUp]);
    }

    #[test]
    fn test_lost_hand_releases_before_next_press() {
        let mut m = machine();
        m.update(Some(GestureToken::HoldDrag), 0);
        assert_eq!(m.update(None, MS), vec![ActionKind::MouseUp]);
        assert!(m.update(None, 2 * MS).is_empty());
        assert_eq!(
            m.update(Some(GestureToken::HoldDrag), 3 * MS),
            vec![ActionKind::MouseDown]
        );
    }

    #[test]
    fn test_release_precedes_click_in_same_frame() {
        let mut m = machine();
        m.update(Some(GestureToken::HoldDrag), 0);
        assert_eq!(
            m.update(Some(GestureToken::PrimaryClick), MS),
            vec![ActionKind::MouseUp, ActionKind::Click]
        );
    }

    #[test]
    fn test_force_release() {
        let mut m = machine();
        assert_eq!(m.force_release(), None);
        m.update(Some(GestureToken::HoldDrag), 0);
        assert_eq!(m.force_release(), Some(ActionKind::MouseUp));
        assert!(!m.is_holding());
    }

    #[test]
    fn test_missing_hand_keeps_edge_memory() {
        let mut m = machine();
        m.update(Some(GestureToken::PrimaryClick), 0);
        m.update(None, 33 * MS);
        // The pose never released, so reappearing does not click again.
        assert!(m.update(Some(GestureToken::PrimaryClick), 66 * MS).is_empty());
    }
}
