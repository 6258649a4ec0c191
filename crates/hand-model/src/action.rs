//! Actions emitted by the gesture engine for the input sinks.
//!
//! Actions can be logged as JSONL. Pointer coordinates are in target
//! surface pixels.

use serde::{Deserialize, Serialize};

use crate::hand::TimestampNs;

/// A single emitted action, stamped with the frame that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Discriminated union of emitted actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Absolute pointer move on the target surface.
    Move { x: f64, y: f64 },
    Click,
    DoubleClick,
    RightClick,
    /// Primary button pressed and held.
    MouseDown,
    /// Primary button released.
    MouseUp,
    /// Press and release of one key.
    Key { key: KeyCode },
    /// Modifier + key host shortcut.
    Combo { combo: HostCombo },
}

/// A key the keyboard sink can tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Char(char),
    Named(NamedKey),
}

/// Non-printable keys reachable from a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedKey {
    Enter,
    Tab,
    Backspace,
    Escape,
    Space,
    Super,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl NamedKey {
    /// Map a layout label (`"Esc"`, `"Win"`, `"F5"`, ...) to a named key.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = match label {
            "Enter" => NamedKey::Enter,
            "Tab" => NamedKey::Tab,
            "Backspace" => NamedKey::Backspace,
            "Esc" => NamedKey::Escape,
            "Space" => NamedKey::Space,
            "Win" => NamedKey::Super,
            "F1" => NamedKey::F1,
            "F2" => NamedKey::F2,
            "F3" => NamedKey::F3,
            "F4" => NamedKey::F4,
            "F5" => NamedKey::F5,
            "F6" => NamedKey::F6,
            "F7" => NamedKey::F7,
            "F8" => NamedKey::F8,
            "F9" => NamedKey::F9,
            "F10" => NamedKey::F10,
            "F11" => NamedKey::F11,
            "F12" => NamedKey::F12,
            _ => return None,
        };
        Some(key)
    }
}

/// Toggle modifiers on the virtual keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Shift,
    Caps,
    Ctrl,
    Alt,
}

impl Modifier {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Shift" => Some(Modifier::Shift),
            "Caps" => Some(Modifier::Caps),
            "Ctrl" => Some(Modifier::Ctrl),
            "Alt" => Some(Modifier::Alt),
            _ => None,
        }
    }
}

/// Fixed Ctrl shortcuts emitted instead of a literal letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostCombo {
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
}

impl HostCombo {
    /// Combo bound to a letter, case-insensitive.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'c' => Some(HostCombo::Copy),
            'v' => Some(HostCombo::Paste),
            'x' => Some(HostCombo::Cut),
            'z' => Some(HostCombo::Undo),
            'y' => Some(HostCombo::Redo),
            _ => None,
        }
    }

    pub fn modifier(&self) -> Modifier {
        Modifier::Ctrl
    }

    /// Lowercase letter sent with the modifier.
    pub fn key(&self) -> char {
        match self {
            HostCombo::Copy => 'c',
            HostCombo::Paste => 'v',
            HostCombo::Cut => 'x',
            HostCombo::Undo => 'z',
            HostCombo::Redo => 'y',
        }
    }
}

impl Action {
    pub fn new(timestamp_ns: TimestampNs, kind: ActionKind) -> Self {
        Self { timestamp_ns, kind }
    }

    pub fn pointer_move(timestamp_ns: TimestampNs, x: f64, y: f64) -> Self {
        Self::new(timestamp_ns, ActionKind::Move { x, y })
    }

    pub fn key(timestamp_ns: TimestampNs, key: KeyCode) -> Self {
        Self::new(timestamp_ns, ActionKind::Key { key })
    }

    pub fn combo(timestamp_ns: TimestampNs, combo: HostCombo) -> Self {
        Self::new(timestamp_ns, ActionKind::Combo { combo })
    }

    /// Whether this action targets the pointer sink.
    pub fn is_pointer(&self) -> bool {
        !matches!(self.kind, ActionKind::Key { .. } | ActionKind::Combo { .. })
    }
}
