//! Modifier toggles and key resolution.
//!
//! The modifier state is a plain value: [`resolve_key`] takes the current
//! state and a hit key and returns the next state with the action to emit.
//! Modifiers toggle on each press rather than acting while held.

use serde::{Deserialize, Serialize};

use handpilot_hand_model::{HostCombo, KeyCode, Modifier};

use super::layout::{KeyKind, LayoutMode};

/// Shift, Caps Lock, Ctrl, and Alt toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ModifierState {
    pub shift: bool,
    pub caps: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ModifierState {
    /// Table to hit-test against. Shift takes precedence over Ctrl.
    pub fn layout_mode(&self) -> LayoutMode {
        if self.shift {
            LayoutMode::Shift
        } else if self.ctrl {
            LayoutMode::Ctrl
        } else {
            LayoutMode::Normal
        }
    }

    pub fn is_active(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Caps => self.caps,
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
        }
    }

    pub fn toggled(mut self, modifier: Modifier) -> Self {
        let flag = match modifier {
            Modifier::Shift => &mut self.shift,
            Modifier::Caps => &mut self.caps,
            Modifier::Ctrl => &mut self.ctrl,
            Modifier::Alt => &mut self.alt,
        };
        *flag = !*flag;
        self
    }

    /// Whether letters come out uppercase.
    pub fn uppercase(&self) -> bool {
        self.caps ^ self.shift
    }
}

/// What a key press produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutput {
    Tap(KeyCode),
    Combo(HostCombo),
}

/// Next modifier state and the output, if any, for one hit key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyResolution {
    pub state: ModifierState,
    pub output: Option<KeyOutput>,
}

/// Resolve a hit key against the modifier state.
///
/// Shift is one-shot for characters: typing one clears it, after which
/// Caps alone decides letter case. Named keys and combos leave it set.
/// Modifier keys emit nothing.
pub fn resolve_key(state: ModifierState, key: KeyKind) -> KeyResolution {
    match key {
        KeyKind::Modifier(modifier) => KeyResolution {
            state: state.toggled(modifier),
            output: None,
        },
        // Only a typed character consumes Shift; named keys and combos keep it.
        KeyKind::Named(named) => KeyResolution {
            state,
            output: Some(KeyOutput::Tap(KeyCode::Named(named))),
        },
        KeyKind::Char(c) => match HostCombo::from_letter(c).filter(|_| state.ctrl) {
            Some(combo) => KeyResolution {
                state,
                output: Some(KeyOutput::Combo(combo)),
            },
            None => KeyResolution {
                state: ModifierState {
                    shift: false,
                    ..state
                },
                output: Some(KeyOutput::Tap(KeyCode::Char(apply_case(
                    c,
                    state.uppercase(),
                )))),
            },
        },
    }
}

fn apply_case(c: char, uppercase: bool) -> char {
    if uppercase {
        c.to_ascii_uppercase()
    } else {
        c.to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handpilot_hand_model::NamedKey;
    use proptest::prelude::*;

    fn state(shift: bool, caps: bool) -> ModifierState {
        ModifierState {
            shift,
            caps,
            ..Default::default()
        }
    }

    fn tapped(resolution: KeyResolution) -> Option<char> {
        match resolution.output {
            Some(KeyOutput::Tap(KeyCode::Char(c))) => Some(c),
            _ => None,
        }
    }

    #[test]
    fn test_case_is_caps_xor_shift() {
        let key = KeyKind::Char('q');
        assert_eq!(tapped(resolve_key(state(false, false), key)), Some('q'));
        assert_eq!(tapped(resolve_key(state(false, true), key)), Some('Q'));
        assert_eq!(tapped(resolve_key(state(true, false), key)), Some('Q'));
        assert_eq!(tapped(resolve_key(state(true, true), key)), Some('q'));
    }

    #[test]
    fn test_shift_is_one_shot() {
        let after = resolve_key(state(true, false), KeyKind::Char('a')).state;
        assert!(!after.shift);
        assert_eq!(tapped(resolve_key(after, KeyKind::Char('a'))), Some('a'));

        let after = resolve_key(state(true, true), KeyKind::Char('a')).state;
        assert!(!after.shift && after.caps);
        assert_eq!(tapped(resolve_key(after, KeyKind::Char('a'))), Some('A'));
    }

    #[test]
    fn test_modifiers_toggle_without_output() {
        let on = resolve_key(ModifierState::default(), KeyKind::Modifier(Modifier::Shift));
        assert!(on.state.shift);
        assert_eq!(on.output, None);

        let off = resolve_key(on.state, KeyKind::Modifier(Modifier::Shift));
        assert!(!off.state.shift);

        let alt = resolve_key(ModifierState::default(), KeyKind::Modifier(Modifier::Alt));
        assert!(alt.state.alt);
        assert!(alt.state.is_active(Modifier::Alt));
    }

    #[test]
    fn test_ctrl_combos_replace_letters() {
        let ctrl = ModifierState {
            ctrl: true,
            ..Default::default()
        };
        for (letter, combo) in [
            ('C', HostCombo::Copy),
            ('V', HostCombo::Paste),
            ('X', HostCombo::Cut),
            ('Z', HostCombo::Undo),
            ('Y', HostCombo::Redo),
        ] {
            let res = resolve_key(ctrl, KeyKind::Char(letter));
            assert_eq!(res.output, Some(KeyOutput::Combo(combo)));
            assert!(res.state.ctrl);
        }
        // Other letters stay literal while Ctrl is on.
        assert_eq!(tapped(resolve_key(ctrl, KeyKind::Char('A'))), Some('a'));
        // Without Ctrl, combo letters are plain letters.
        assert_eq!(tapped(resolve_key(ModifierState::default(), KeyKind::Char('C'))), Some('c'));
    }

    #[test]
    fn test_named_keys_keep_shift() {
        let res = resolve_key(state(true, false), KeyKind::Named(NamedKey::Enter));
        assert_eq!(res.output, Some(KeyOutput::Tap(KeyCode::Named(NamedKey::Enter))));
        assert!(res.state.shift);
        // Shift then survives until a character is typed.
        assert_eq!(tapped(resolve_key(res.state, KeyKind::Char('k'))), Some('K'));
    }

    #[test]
    fn test_layout_mode_precedence() {
        assert_eq!(ModifierState::default().layout_mode(), LayoutMode::Normal);
        let both = ModifierState {
            shift: true,
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(both.layout_mode(), LayoutMode::Shift);
        assert_eq!(
            ModifierState {
                ctrl: true,
                ..Default::default()
            }
            .layout_mode(),
            LayoutMode::Ctrl
        );
        // Caps alone keeps the normal table.
        assert_eq!(state(false, true).layout_mode(), LayoutMode::Normal);
    }

    #[test]
    fn test_symbols_are_unaffected_by_case() {
        assert_eq!(tapped(resolve_key(state(true, false), KeyKind::Char('!'))), Some('!'));
    }

    proptest! {
        #[test]
        fn resolution_is_deterministic(
            shift: bool, caps: bool, ctrl: bool, alt: bool,
            c in proptest::char::range('!', '~'),
        ) {
            let s = ModifierState { shift, caps, ctrl, alt };
            let res = resolve_key(s, KeyKind::Char(c));
            prop_assert_eq!(res, resolve_key(s, KeyKind::Char(c)));
            if let Some(KeyOutput::Tap(_)) = res.output {
                prop_assert!(!res.state.shift);
            }
            prop_assert_eq!(res.state.caps, caps);
            prop_assert_eq!(res.state.ctrl, ctrl);
        }
    }
}
