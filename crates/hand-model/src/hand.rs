//! Hand landmark types produced by the acquisition collaborator.
//!
//! A [`Frame`] is consumed once and discarded. Recorded frame streams use
//! JSONL (one frame per line, `#` lines are comments) so they can be
//! replayed through the engine.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::ModelError;

/// Monotonic timestamp in nanoseconds.
pub type TimestampNs = u64;

/// Number of landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand model convention).
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single tracked point, normalized to the detector's input frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X [0.0, 1.0].
    pub x: f64,
    /// Normalized Y [0.0, 1.0], growing downward.
    pub y: f64,
    /// Relative depth, unused by the engine.
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean distance in normalized units (x/y only).
    pub fn distance(&self, other: &Landmark) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Scale into a pixel space of the given dimensions.
    pub fn to_pixels(&self, width: f64, height: f64) -> Point2D {
        Point2D::new(self.x * width, self.y * height)
    }
}

/// Which hand the detector believes it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handedness::Left => f.write_str("Left"),
            Handedness::Right => f.write_str("Right"),
        }
    }
}

/// One detected hand: 21 landmarks and a handedness label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub handedness: Handedness,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(handedness: Handedness, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }

    /// Build a hand from a landmark list of unknown length.
    pub fn from_slice(handedness: Handedness, points: &[Landmark]) -> Result<Self, ModelError> {
        let landmarks: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| ModelError::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            })?;
        Ok(Self::new(handedness, landmarks))
    }

    pub fn landmark(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }

    /// Thumb-tip to index-tip distance in normalized units.
    pub fn pinch_distance(&self) -> f64 {
        self.landmarks[landmarks::THUMB_TIP].distance(&self.landmarks[landmarks::INDEX_FINGER_TIP])
    }
}

/// The hands detected in one camera sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Monotonic capture timestamp.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl Frame {
    pub fn new(timestamp_ns: TimestampNs, hands: Vec<Hand>) -> Self {
        Self {
            timestamp_ns,
            hands,
        }
    }

    /// A frame in which no hand was detected.
    pub fn empty(timestamp_ns: TimestampNs) -> Self {
        Self::new(timestamp_ns, Vec::new())
    }

    /// First hand carrying the given handedness label.
    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        self.hands.iter().find(|h| h.handedness == handedness)
    }
}

/// Parse frames from JSONL content.
pub fn parse_frames(jsonl: &str) -> Result<Vec<Frame>, ModelError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| ModelError::Parse { line, source })
        })
        .collect()
}

/// Serialize frames to JSONL.
pub fn serialize_frames(frames: &[Frame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
