//! Handpilot Hand Model
//!
//! Defines the data contracts shared by every Handpilot crate:
//! - **Hands:** 21 normalized landmarks plus a handedness label
//! - **Frames:** the hands detected in one camera sample, with a timestamp
//! - **Geometry:** resolutions, points, and axis-aligned rectangles
//! - **Actions:** pointer and keyboard actions emitted by the engine
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! hand detector's input frame, with y growing downward.

pub mod action;
pub mod geometry;
pub mod hand;

pub use action::*;
pub use geometry::*;
pub use hand::*;

/// Errors raised while building or parsing model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("hand must have {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
