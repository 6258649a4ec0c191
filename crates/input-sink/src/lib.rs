//! Handpilot Input Sink
//!
//! Delivers engine actions to the operating system through pluggable
//! sinks:
//!
//! - **Pointer sink:** absolute moves, clicks, and button press/release
//! - **Keyboard sink:** key taps and modifier shortcuts
//!
//! Actions reach the sinks through a single-producer queue so injection
//! never blocks frame processing. Each action is attempted once; sink
//! failures are logged and not retried. Every dispatched action can also
//! be appended to a JSONL action log.

pub mod queue;
pub mod sinks;
pub mod writer;

use handpilot_common::error::HandpilotResult;
use handpilot_hand_model::{Action, ActionKind, KeyCode, Modifier};

/// Receives pointer actions. Coordinates are target-surface pixels.
pub trait PointerSink: Send {
    fn move_to(&mut self, x: f64, y: f64) -> HandpilotResult<()>;

    fn click(&mut self) -> HandpilotResult<()>;

    fn double_click(&mut self) -> HandpilotResult<()>;

    fn right_click(&mut self) -> HandpilotResult<()>;

    /// Press and hold the primary button.
    fn mouse_down(&mut self) -> HandpilotResult<()>;

    /// Release the primary button.
    fn mouse_up(&mut self) -> HandpilotResult<()>;

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Receives keyboard actions.
pub trait KeyboardSink: Send {
    /// Press and release a single key.
    fn tap(&mut self, key: KeyCode) -> HandpilotResult<()>;

    /// Press `key` while `modifier` is held.
    fn hotkey(&mut self, modifier: Modifier, key: char) -> HandpilotResult<()>;

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Route one action to the sink that handles it.
pub fn dispatch(
    action: &Action,
    pointer: &mut dyn PointerSink,
    keyboard: &mut dyn KeyboardSink,
) -> HandpilotResult<()> {
    match &action.kind {
        ActionKind::Move { x, y } => pointer.move_to(*x, *y),
        ActionKind::Click => pointer.click(),
        ActionKind::DoubleClick => pointer.double_click(),
        ActionKind::RightClick => pointer.right_click(),
        ActionKind::MouseDown => pointer.mouse_down(),
        ActionKind::MouseUp => pointer.mouse_up(),
        ActionKind::Key { key } => keyboard.tap(*key),
        ActionKind::Combo { combo } => keyboard.hotkey(combo.modifier(), combo.key()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{MemorySink, SinkCall};
    use handpilot_hand_model::{HostCombo, NamedKey};

    #[test]
    fn test_dispatch_routes_by_kind() {
        let sink = MemorySink::new();
        let mut pointer = sink.clone();
        let mut keyboard = sink.clone();

        let actions = [
            Action::pointer_move(0, 10.0, 20.0),
            Action::new(1, ActionKind::DoubleClick),
            Action::new(2, ActionKind::MouseDown),
            Action::new(3, ActionKind::MouseUp),
            Action::key(4, KeyCode::Named(NamedKey::Tab)),
            Action::combo(5, HostCombo::Undo),
        ];
        for action in &actions {
            dispatch(action, &mut pointer, &mut keyboard).unwrap();
        }

        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::MoveTo { x: 10.0, y: 20.0 },
                SinkCall::DoubleClick,
                SinkCall::MouseDown,
                SinkCall::MouseUp,
                SinkCall::Tap(KeyCode::Named(NamedKey::Tab)),
                SinkCall::Hotkey(Modifier::Ctrl, 'z'),
            ]
        );
    }
}
