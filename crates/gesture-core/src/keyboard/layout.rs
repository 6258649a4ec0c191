//! Virtual keyboard layout tables and hit-testing.
//!
//! A layout holds one table per [`LayoutMode`]. Each table is rows of keys
//! laid out left to right from a fixed origin, with a margin between keys
//! and between rows. Hit-testing is a linear scan; layouts are a handful
//! of rows of at most a dozen or so keys.

use std::path::Path;

use serde::{Deserialize, Serialize};

use handpilot_common::error::{HandpilotError, HandpilotResult};
use handpilot_hand_model::{Modifier, NamedKey, Point2D, Rect};

/// Which table of the layout is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    Normal,
    Shift,
    Ctrl,
}

impl LayoutMode {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutMode::Normal => "normal",
            LayoutMode::Shift => "shift",
            LayoutMode::Ctrl => "ctrl",
        }
    }
}

/// One key of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDef {
    pub label: String,
    /// Width override; the geometry's default width otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl KeyDef {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            width: None,
        }
    }

    pub fn wide(label: impl Into<String>, width: f64) -> Self {
        Self {
            label: label.into(),
            width: Some(width),
        }
    }

    /// What pressing this key means.
    pub fn kind(&self) -> Option<KeyKind> {
        KeyKind::from_label(&self.label)
    }
}

/// Resolved meaning of a key label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Modifier(Modifier),
    Named(NamedKey),
    Char(char),
}

impl KeyKind {
    /// Modifier names first, then named keys, then single characters.
    pub fn from_label(label: &str) -> Option<Self> {
        if let Some(modifier) = Modifier::from_label(label) {
            return Some(KeyKind::Modifier(modifier));
        }
        if let Some(named) = NamedKey::from_label(label) {
            return Some(KeyKind::Named(named));
        }
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeyKind::Char(c)),
            _ => None,
        }
    }
}

/// Placement parameters shared by every table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    pub key_width: f64,
    pub key_height: f64,
    pub margin: f64,
}

impl Default for KeyGeometry {
    fn default() -> Self {
        Self {
            origin_x: 20.0,
            origin_y: 20.0,
            key_width: 40.0,
            key_height: 40.0,
            margin: 5.0,
        }
    }
}

pub type KeyTable = Vec<Vec<KeyDef>>;

/// Serialized form of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    #[serde(default)]
    pub geometry: KeyGeometry,
    pub normal: KeyTable,
    pub shift: KeyTable,
    pub ctrl: KeyTable,
}

/// A key's label and on-surface rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBox<'a> {
    pub key: &'a KeyDef,
    pub rect: Rect,
}

/// Validated, immutable keyboard layout.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardLayoutModel {
    spec: LayoutSpec,
}

impl KeyboardLayoutModel {
    /// Validate and wrap a layout.
    pub fn new(spec: LayoutSpec) -> HandpilotResult<Self> {
        let g = &spec.geometry;
        if !(is_positive(g.key_width) && is_positive(g.key_height)) {
            return Err(HandpilotError::layout(format!(
                "key size must be positive, got {}x{}",
                g.key_width, g.key_height
            )));
        }
        if !is_positive(g.margin) {
            return Err(HandpilotError::layout(format!(
                "key margin must be positive, got {}",
                g.margin
            )));
        }

        for (mode, table) in [
            (LayoutMode::Normal, &spec.normal),
            (LayoutMode::Shift, &spec.shift),
            (LayoutMode::Ctrl, &spec.ctrl),
        ] {
            if table.is_empty() {
                return Err(HandpilotError::layout(format!(
                    "{} table has no rows",
                    mode.name()
                )));
            }
            for key in table.iter().flatten() {
                if key.kind().is_none() {
                    return Err(HandpilotError::layout(format!(
                        "{} table: unknown key label {:?}",
                        mode.name(),
                        key.label
                    )));
                }
                if let Some(width) = key.width {
                    if !is_positive(width) {
                        return Err(HandpilotError::layout(format!(
                            "{} table: key {:?} has width {width}",
                            mode.name(),
                            key.label
                        )));
                    }
                }
            }
        }

        Ok(Self { spec })
    }

    /// Load a layout from a JSON file holding a [`LayoutSpec`].
    pub fn from_json_file(path: impl AsRef<Path>) -> HandpilotResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HandpilotError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::new(serde_json::from_str(&content)?)
    }

    /// The six-row desktop layout.
    pub fn standard() -> Self {
        Self {
            spec: standard_spec(),
        }
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    pub fn geometry(&self) -> &KeyGeometry {
        &self.spec.geometry
    }

    pub fn table(&self, mode: LayoutMode) -> &KeyTable {
        match mode {
            LayoutMode::Normal => &self.spec.normal,
            LayoutMode::Shift => &self.spec.shift,
            LayoutMode::Ctrl => &self.spec.ctrl,
        }
    }

    pub fn key_width(&self, key: &KeyDef) -> f64 {
        key.width.unwrap_or(self.spec.geometry.key_width)
    }

    /// Every key of a table with its rectangle, rows top to bottom.
    pub fn key_boxes(&self, mode: LayoutMode) -> Vec<KeyBox<'_>> {
        let g = &self.spec.geometry;
        let mut boxes = Vec::new();
        let mut y = g.origin_y;
        for row in self.table(mode) {
            let mut x = g.origin_x;
            for key in row {
                let width = self.key_width(key);
                boxes.push(KeyBox {
                    key,
                    rect: Rect::new(x, y, width, g.key_height),
                });
                x += width + g.margin;
            }
            y += g.key_height + g.margin;
        }
        boxes
    }

    /// First key whose box strictly contains `point`.
    pub fn hit_test(&self, mode: LayoutMode, point: Point2D) -> Option<&KeyDef> {
        let g = &self.spec.geometry;
        let mut y = g.origin_y;
        for row in self.table(mode) {
            if point.y > y && point.y < y + g.key_height {
                let mut x = g.origin_x;
                for key in row {
                    let width = self.key_width(key);
                    if point.x > x && point.x < x + width {
                        return Some(key);
                    }
                    x += width + g.margin;
                }
            }
            y += g.key_height + g.margin;
        }
        None
    }
}

impl Default for KeyboardLayoutModel {
    fn default() -> Self {
        Self::standard()
    }
}

const NORMAL_ROWS: [&[&str]; 6] = [
    &["Esc", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12"],
    &["`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "Backspace"],
    &["Tab", "q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "[", "]", "\\"],
    &["Caps", "a", "s", "d", "f", "g", "h", "j", "k", "l", ";", "'", "Enter"],
    &["Shift", "z", "x", "c", "v", "b", "n", "m", ",", ".", "/", "Shift"],
    &["Ctrl", "Win", "Alt", "Space", "Alt", "Ctrl"],
];

const SHIFT_ROWS: [&[&str]; 6] = [
    &["Esc", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12"],
    &["~", "!", "@", "#", "$", "%", "^", "&", "*", "(", ")", "_", "+", "Backspace"],
    &["Tab", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "{", "}", "|"],
    &["Caps", "A", "S", "D", "F", "G", "H", "J", "K", "L", ":", "\"", "Enter"],
    &["Shift", "Z", "X", "C", "V", "B", "N", "M", "<", ">", "?", "Shift"],
    &["Ctrl", "Win", "Alt", "Space", "Alt", "Ctrl"],
];

const CTRL_ROWS: [&[&str]; 6] = [
    &["Esc", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12"],
    &["`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "Backspace"],
    &["Tab", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "[", "]", "\\"],
    &["Caps", "A", "S", "D", "F", "G", "H", "J", "K", "L", ";", "'", "Enter"],
    &["Shift", "Z", "X", "C", "V", "B", "N", "M", ",", ".", "/", "Shift"],
    &["Ctrl", "Win", "Alt", "Space", "Alt", "Ctrl"],
];

fn is_positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

fn standard_width(label: &str) -> Option<f64> {
    match label {
        "Backspace" | "Caps" | "Enter" => Some(80.0),
        "Tab" | "Ctrl" | "Alt" | "Win" => Some(60.0),
        "Shift" => Some(100.0),
        "Space" => Some(240.0),
        _ => None,
    }
}

fn build_table(rows: &[&[&str]]) -> KeyTable {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|&label| KeyDef {
                    label: label.to_string(),
                    width: standard_width(label),
                })
                .collect()
        })
        .collect()
}

fn standard_spec() -> LayoutSpec {
    LayoutSpec {
        geometry: KeyGeometry::default(),
        normal: build_table(&NORMAL_ROWS),
        shift: build_table(&SHIFT_ROWS),
        ctrl: build_table(&CTRL_ROWS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MODES: [LayoutMode; 3] = [LayoutMode::Normal, LayoutMode::Shift, LayoutMode::Ctrl];

    #[test]
    fn test_standard_layout_validates() {
        let model = KeyboardLayoutModel::new(standard_spec()).unwrap();
        assert_eq!(model, KeyboardLayoutModel::standard());
        for mode in MODES {
            assert_eq!(model.table(mode).len(), 6);
        }
    }

    #[test]
    fn test_hit_test_first_keys() {
        let model = KeyboardLayoutModel::standard();
        // Esc occupies (20..60, 20..60).
        let esc = model.hit_test(LayoutMode::Normal, Point2D::new(40.0, 40.0));
        assert_eq!(esc.map(|k| k.label.as_str()), Some("Esc"));

        // Second row starts at y = 65; "`" then "1" at x = 65.
        let one = model.hit_test(LayoutMode::Normal, Point2D::new(80.0, 80.0));
        assert_eq!(one.map(|k| k.label.as_str()), Some("1"));

        let shifted = model.hit_test(LayoutMode::Shift, Point2D::new(80.0, 80.0));
        assert_eq!(shifted.map(|k| k.label.as_str()), Some("!"));
    }

    #[test]
    fn test_hit_test_respects_wide_keys() {
        let model = KeyboardLayoutModel::standard();
        // Tab on row three spans x 20..80.
        let tab = model.hit_test(LayoutMode::Normal, Point2D::new(75.0, 130.0));
        assert_eq!(tab.map(|k| k.label.as_str()), Some("Tab"));
        let q = model.hit_test(LayoutMode::Normal, Point2D::new(95.0, 130.0));
        assert_eq!(q.map(|k| k.label.as_str()), Some("q"));
    }

    #[test]
    fn test_margins_and_outside_miss() {
        let model = KeyboardLayoutModel::standard();
        // Gap between Esc and F1 (x 60..65).
        assert!(model.hit_test(LayoutMode::Normal, Point2D::new(62.0, 40.0)).is_none());
        // Exactly on an edge.
        assert!(model.hit_test(LayoutMode::Normal, Point2D::new(20.0, 40.0)).is_none());
        assert!(model.hit_test(LayoutMode::Normal, Point2D::new(5.0, 5.0)).is_none());
        assert!(model.hit_test(LayoutMode::Normal, Point2D::new(990.0, 390.0)).is_none());
    }

    #[test]
    fn test_boxes_never_overlap() {
        let model = KeyboardLayoutModel::standard();
        for mode in MODES {
            let boxes = model.key_boxes(mode);
            for (i, a) in boxes.iter().enumerate() {
                for b in &boxes[i + 1..] {
                    assert!(!a.rect.overlaps(&b.rect), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_rejects_bad_layouts() {
        let mut spec = standard_spec();
        spec.geometry.margin = 0.0;
        assert!(KeyboardLayoutModel::new(spec).is_err());

        let mut spec = standard_spec();
        spec.normal[0].push(KeyDef::new("Hyper"));
        assert!(KeyboardLayoutModel::new(spec).is_err());

        let mut spec = standard_spec();
        spec.ctrl.clear();
        assert!(KeyboardLayoutModel::new(spec).is_err());
    }

    #[test]
    fn test_spec_json_roundtrip_through_file() {
        let dir = std::env::temp_dir().join("handpilot_test_layout");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("layout.json");

        let spec = LayoutSpec {
            geometry: KeyGeometry::default(),
            normal: vec![vec![KeyDef::new("a"), KeyDef::wide("Space", 120.0)]],
            shift: vec![vec![KeyDef::new("A"), KeyDef::wide("Space", 120.0)]],
            ctrl: vec![vec![KeyDef::new("A"), KeyDef::wide("Space", 120.0)]],
        };
        std::fs::write(&path, serde_json::to_string(&spec).unwrap()).unwrap();

        let model = KeyboardLayoutModel::from_json_file(&path).unwrap();
        assert_eq!(model.spec(), &spec);
        let space = model.hit_test(LayoutMode::Normal, Point2D::new(100.0, 30.0));
        assert_eq!(space.map(|k| k.label.as_str()), Some("Space"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_key_kind_resolution() {
        assert_eq!(KeyKind::from_label("Shift"), Some(KeyKind::Modifier(Modifier::Shift)));
        assert_eq!(KeyKind::from_label("Space"), Some(KeyKind::Named(NamedKey::Space)));
        assert_eq!(KeyKind::from_label("\\"), Some(KeyKind::Char('\\')));
        assert_eq!(KeyKind::from_label("ab"), None);
        assert_eq!(KeyKind::from_label(""), None);
    }

    proptest! {
        #[test]
        fn hit_test_agrees_with_boxes(x in 0.0f64..1000.0, y in 0.0f64..400.0) {
            let model = KeyboardLayoutModel::standard();
            let point = Point2D::new(x, y);
            let containing: Vec<_> = model
                .key_boxes(LayoutMode::Normal)
                .into_iter()
                .filter(|b| b.rect.contains(point))
                .collect();
            prop_assert!(containing.len() <= 1);
            let hit = model.hit_test(LayoutMode::Normal, point);
            prop_assert_eq!(hit, containing.first().map(|b| b.key));
        }
    }
}
