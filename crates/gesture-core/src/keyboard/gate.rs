//! Key-hand pinch gate.
//!
//! A pinch is processed only when it is a fresh rising edge and the
//! cooldown since the last hit key has elapsed. Rejected pinches are
//! dropped without a trace.

use handpilot_common::clock::{elapsed_ns, secs_to_ns};
use handpilot_common::config::AppConfig;
use handpilot_common::error::HandpilotResult;
use handpilot_hand_model::landmarks::INDEX_FINGER_TIP;
use handpilot_hand_model::{ActionKind, Hand, Point2D, Resolution, TimestampNs};

use super::layout::KeyboardLayoutModel;
use super::modifier::{resolve_key, KeyOutput, ModifierState};
use crate::classifier::{classify_key_hand, GestureToken};

/// Persistent gate state, checkpointed between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPressState {
    pub prev_pinch: bool,
    pub last_key_ns: Option<TimestampNs>,
}

/// Result of feeding one frame's key hand through the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPress {
    pub token: GestureToken,
    /// Index fingertip on the keyboard surface, if the hand was seen.
    pub cursor: Option<Point2D>,
    /// Label of the key hit this frame.
    pub hit: Option<String>,
    pub action: Option<ActionKind>,
}

impl KeyPress {
    fn idle(token: GestureToken, cursor: Option<Point2D>) -> Self {
        Self {
            token,
            cursor,
            hit: None,
            action: None,
        }
    }
}

/// Edge- and cooldown-gated key press detection for the key hand.
#[derive(Debug, Clone)]
pub struct KeyPressGate {
    layout: KeyboardLayoutModel,
    pinch_threshold: f64,
    cooldown_ns: u64,
    surface: Resolution,
    state: KeyPressState,
}

impl KeyPressGate {
    pub fn new(
        layout: KeyboardLayoutModel,
        pinch_threshold: f64,
        cooldown_secs: f64,
        surface: Resolution,
    ) -> Self {
        Self {
            layout,
            pinch_threshold,
            cooldown_ns: secs_to_ns(cooldown_secs),
            surface,
            state: KeyPressState::default(),
        }
    }

    /// Build from configuration, loading `keyboard.layout_file` when set.
    pub fn from_config(config: &AppConfig) -> HandpilotResult<Self> {
        let keyboard = &config.keyboard;
        let layout = match &keyboard.layout_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading keyboard layout");
                KeyboardLayoutModel::from_json_file(path)?
            }
            None => KeyboardLayoutModel::standard(),
        };
        Ok(Self::new(
            layout,
            keyboard.pinch_threshold,
            keyboard.cooldown_secs,
            keyboard.surface,
        ))
    }

    /// Index fingertip mapped onto the keyboard surface, clamped inside it.
    pub fn cursor(&self, hand: &Hand) -> Point2D {
        let tip = hand
            .landmark(INDEX_FINGER_TIP)
            .to_pixels(self.surface.width_f64(), self.surface.height_f64());
        let max_x = (self.surface.width_f64() - 1.0).max(0.0);
        let max_y = (self.surface.height_f64() - 1.0).max(0.0);
        Point2D::new(tip.x.clamp(0.0, max_x), tip.y.clamp(0.0, max_y))
    }

    /// Advance one frame. `hand` is `None` when no key hand was seen.
    ///
    /// `modifiers` is updated in place when a hit key toggles one.
    pub fn process(
        &mut self,
        hand: Option<&Hand>,
        now: TimestampNs,
        modifiers: &mut ModifierState,
    ) -> KeyPress {
        let Some(hand) = hand else {
            return KeyPress::idle(GestureToken::Idle, None);
        };

        let cursor = self.cursor(hand);
        let token = classify_key_hand(hand.pinch_distance(), self.pinch_threshold);
        let pinched = token == GestureToken::KeyPinch;
        let rising = pinched && !self.state.prev_pinch;
        self.state.prev_pinch = pinched;

        if !rising || !self.cooled_down(now) {
            return KeyPress::idle(token, Some(cursor));
        }

        let Some(key) = self.layout.hit_test(modifiers.layout_mode(), cursor) else {
            tracing::trace!(x = cursor.x, y = cursor.y, "pinch outside keys");
            return KeyPress::idle(token, Some(cursor));
        };
        // Keys without a meaning are rejected when the layout is built.
        let Some(kind) = key.kind() else {
            return KeyPress::idle(token, Some(cursor));
        };

        let resolution = resolve_key(*modifiers, kind);
        *modifiers = resolution.state;
        self.state.last_key_ns = Some(now);

        let action = resolution.output.map(|output| match output {
            KeyOutput::Tap(key) => ActionKind::Key { key },
            KeyOutput::Combo(combo) => ActionKind::Combo { combo },
        });
        tracing::debug!(label = %key.label, ?action, ?modifiers, "key pressed");

        KeyPress {
            token,
            cursor: Some(cursor),
            hit: Some(key.label.clone()),
            action,
        }
    }

    pub fn layout(&self) -> &KeyboardLayoutModel {
        &self.layout
    }

    pub fn state(&self) -> &KeyPressState {
        &self.state
    }

    fn cooled_down(&self, now: TimestampNs) -> bool {
        self.state
            .last_key_ns
            .map_or(true, |last| elapsed_ns(last, now) > self.cooldown_ns)
    }
}
