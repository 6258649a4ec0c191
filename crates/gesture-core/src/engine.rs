//! Frame-synchronous gesture engine.
//!
//! Owns every state machine and processes one [`Frame`] at a time: the
//! pointer hand drives motion and clicks, then the key hand drives the
//! virtual keyboard. Actions come back in emission order.

use handpilot_common::config::AppConfig;
use handpilot_common::error::HandpilotResult;
use handpilot_hand_model::{Action, ActionKind, Frame, Point2D, TimestampNs};

use crate::classifier::{create_classifier, GestureClassifier, GestureToken};
use crate::click::{ClickPhase, ClickStateMachine};
use crate::finger_state::FingerState;
use crate::keyboard::{KeyPressGate, KeyboardLayoutModel, LayoutMode, ModifierState};
use crate::pointer_motion::PointerMotionFilter;

/// Actions and status produced by one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub actions: Vec<Action>,
    pub pointer_token: GestureToken,
    pub key_token: GestureToken,
    pub click_phase: ClickPhase,
    pub layout_mode: LayoutMode,
    pub modifiers: ModifierState,
    /// Key-hand fingertip on the keyboard surface.
    pub key_cursor: Option<Point2D>,
    /// Label of the key hit this frame.
    pub key_hit: Option<String>,
}

/// Gesture-to-input translation engine.
pub struct GestureEngine {
    config: AppConfig,
    classifier: Box<dyn GestureClassifier>,
    motion: PointerMotionFilter,
    clicks: ClickStateMachine,
    gate: KeyPressGate,
    modifiers: ModifierState,
    frames: u64,
    shut_down: bool,
}

impl GestureEngine {
    /// Validate the configuration and build every component.
    pub fn new(config: &AppConfig) -> HandpilotResult<Self> {
        config.validate()?;
        let classifier = create_classifier(config);
        let gate = KeyPressGate::from_config(config)?;

        tracing::info!(
            classifier = classifier.name(),
            capture = %config.capture,
            surface = %config.surface,
            pointer_hand = %config.roles.pointer,
            keyboard_hand = %config.roles.keyboard,
            "gesture engine ready"
        );

        Ok(Self {
            config: config.clone(),
            classifier,
            motion: PointerMotionFilter::from_config(config),
            clicks: ClickStateMachine::new(config.clicks.double_click_threshold_secs),
            gate,
            modifiers: ModifierState::default(),
            frames: 0,
            shut_down: false,
        })
    }

    /// Process one frame.
    ///
    /// A pointer hand yields a move every frame followed by any click
    /// actions. A missing pointer hand releases a held button. The key
    /// hand is processed last. After [`shutdown`](Self::shutdown) this
    /// returns an empty output.
    pub fn process_frame(&mut self, frame: &Frame) -> FrameOutput {
        let now = frame.timestamp_ns;
        if self.shut_down {
            return self.status(Vec::new(), GestureToken::Idle, GestureToken::Idle, None, None);
        }
        self.frames += 1;

        let mut actions = Vec::new();

        let pointer_token = match frame.hand(self.config.roles.pointer) {
            Some(hand) => {
                let fingers = FingerState::extract(hand, self.config.capture);
                let token = self.classifier.classify(&fingers);
                let position = self.motion.apply(fingers.index.tip);
                actions.push(Action::pointer_move(now, position.x, position.y));
                actions.extend(
                    self.clicks
                        .update(Some(token), now)
                        .into_iter()
                        .map(|kind| Action::new(now, kind)),
                );
                token
            }
            None => {
                actions.extend(
                    self.clicks
                        .update(None, now)
                        .into_iter()
                        .map(|kind| Action::new(now, kind)),
                );
                GestureToken::Idle
            }
        };

        let key_hand = frame.hand(self.config.roles.keyboard);
        let press = self.gate.process(key_hand, now, &mut self.modifiers);
        if let Some(kind) = press.action {
            actions.push(Action::new(now, kind));
        }

        if !actions.is_empty() {
            tracing::trace!(t = now, count = actions.len(), "frame actions");
        }
        self.status(actions, pointer_token, press.token, press.cursor, press.hit)
    }

    /// Stop the engine, releasing a held button. Later frames emit nothing.
    pub fn shutdown(&mut self, now: TimestampNs) -> Vec<Action> {
        if self.shut_down {
            return Vec::new();
        }
        self.shut_down = true;
        let released: Vec<Action> = self
            .clicks
            .force_release()
            .into_iter()
            .map(|kind| Action::new(now, kind))
            .collect();
        tracing::info!(
            frames = self.frames,
            released = !released.is_empty(),
            "gesture engine shut down"
        );
        released
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn layout(&self) -> &KeyboardLayoutModel {
        self.gate.layout()
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    pub fn click_phase(&self) -> ClickPhase {
        self.clicks.phase()
    }

    pub fn is_holding(&self) -> bool {
        self.clicks.is_holding()
    }

    pub fn pointer_position(&self) -> Point2D {
        self.motion.previous()
    }

    /// Frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    fn status(
        &self,
        actions: Vec<Action>,
        pointer_token: GestureToken,
        key_token: GestureToken,
        key_cursor: Option<Point2D>,
        key_hit: Option<String>,
    ) -> FrameOutput {
        FrameOutput {
            actions,
            pointer_token,
            key_token,
            click_phase: self.clicks.phase(),
            layout_mode: self.modifiers.layout_mode(),
            modifiers: self.modifiers,
            key_cursor,
            key_hit,
        }
    }
}

impl FrameOutput {
    /// Actions other than pointer moves.
    pub fn events(&self) -> impl Iterator<Item = &ActionKind> {
        self.actions
            .iter()
            .map(|a| &a.kind)
            .filter(|k| !matches!(k, ActionKind::Move { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finger_state::test_hands::posed_hand;
    use handpilot_common::config::ClassifierKind;
    use handpilot_common::error::HandpilotError;
    use handpilot_hand_model::{Handedness, Resolution};

    const MS: u64 = 1_000_000;

    fn engine() -> GestureEngine {
        GestureEngine::new(&AppConfig::default()).unwrap()
    }

    fn pointer_frame(t: u64, flags: [bool; 4]) -> Frame {
        Frame::new(t, vec![posed_hand(Handedness::Right, flags, 0.5, 0.5)])
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.surface = Resolution::new(0, 0);
        assert!(GestureEngine::new(&config).is_err());
    }

    #[test]
    fn test_move_every_frame_then_click() {
        let mut e = engine();
        let out = e.process_frame(&pointer_frame(0, [true, true, false, false]));
        assert_eq!(out.pointer_token, GestureToken::PrimaryClick);
        assert!(matches!(out.actions[0].kind, ActionKind::Move { .. }));
        assert_eq!(out.events().collect::<Vec<_>>(), vec![&ActionKind::Click]);
        assert_eq!(out.click_phase, ClickPhase::Armed);

        let out = e.process_frame(&pointer_frame(33 * MS, [true, true, false, false]));
        assert_eq!(out.actions.len(), 1);
        assert!(out.actions[0].is_pointer());
    }

    #[test]
    fn test_missing_pointer_hand_releases_hold() {
        let mut e = engine();
        e.process_frame(&pointer_frame(0, [false, true, true, true]));
        assert!(e.is_holding());

        let out = e.process_frame(&Frame::empty(33 * MS));
        assert_eq!(out.pointer_token, GestureToken::Idle);
        assert_eq!(out.actions.len(), 1);
        assert_eq!(out.actions[0].kind, ActionKind::MouseUp);
        assert!(!e.is_holding());
    }

    #[test]
    fn test_key_hand_does_not_drive_pointer() {
        let mut e = engine();
        let frame = Frame::new(0, vec![posed_hand(Handedness::Left, [true, true, false, false], 0.5, 0.5)]);
        let out = e.process_frame(&frame);
        assert_eq!(out.pointer_token, GestureToken::Idle);
        assert!(out.actions.is_empty());
        assert!(out.key_cursor.is_some());
    }

    #[test]
    fn test_shutdown_releases_and_silences() {
        let mut e = engine();
        e.process_frame(&pointer_frame(0, [false, true, true, true]));
        let released = e.shutdown(10 * MS);
        assert_eq!(released, vec![Action::new(10 * MS, ActionKind::MouseUp)]);
        assert!(e.shutdown(20 * MS).is_empty());
        assert!(e.is_shut_down());

        let out = e.process_frame(&pointer_frame(30 * MS, [true, true, false, false]));
        assert!(out.actions.is_empty());
        assert_eq!(e.frame_count(), 1);
    }

    #[test]
    fn test_classifier_selection() {
        let mut config = AppConfig::default();
        config.clicks.classifier = ClassifierKind::Distance;
        let e = GestureEngine::new(&config).unwrap();
        assert_eq!(e.classifier_name(), "distance");
    }

    #[test]
    fn test_missing_layout_file_is_an_error() {
        let mut config = AppConfig::default();
        config.keyboard.layout_file = Some("/nonexistent/handpilot/layout.json".into());
        assert!(matches!(
            GestureEngine::new(&config),
            Err(HandpilotError::FileNotFound { .. })
        ));
    }
}
