//! Virtual keyboard: layout tables, modifier toggles, and the pinch gate.

pub mod gate;
pub mod layout;
pub mod modifier;

pub use gate::{KeyPress, KeyPressGate, KeyPressState};
pub use layout::{
    KeyBox, KeyDef, KeyGeometry, KeyKind, KeyTable, KeyboardLayoutModel, LayoutMode, LayoutSpec,
};
pub use modifier::{resolve_key, KeyOutput, KeyResolution, ModifierState};
