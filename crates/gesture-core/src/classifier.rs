//! Gesture classification strategies.
//!
//! Two interchangeable strategies exist because they feel very different
//! in use:
//!
//! - [`JointClassifier`] reads which fingers are extended.
//! - [`DistanceClassifier`] reads how close fingertips are to each other.
//!
//! Both return exactly one [`GestureToken`] per hand per frame. Rules are
//! evaluated in order and the first match wins; anything unmatched is
//! [`GestureToken::Move`].

use handpilot_common::config::{AppConfig, ClassifierKind};
use handpilot_hand_model::Resolution;

use crate::finger_state::{Finger, FingerState};

/// Capture resolution the distance threshold is specified against.
pub const REFERENCE_CAPTURE: Resolution = Resolution::new(640, 480);

/// Classification result for one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureToken {
    /// No controlling hand this frame.
    Idle,
    /// Hand present, pointer follows it, no button gesture.
    Move,
    PrimaryClick,
    SecondaryClick,
    HoldDrag,
    /// Key hand thumb and index pinched together.
    KeyPinch,
}

/// Strategy mapping pointer-hand finger states to a gesture.
pub trait GestureClassifier: Send {
    fn classify(&self, fingers: &FingerState) -> GestureToken;

    /// Strategy name for logging.
    fn name(&self) -> &str;
}

/// Classifies by extended-finger combinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct JointClassifier;

impl GestureClassifier for JointClassifier {
    fn classify(&self, fingers: &FingerState) -> GestureToken {
        match fingers.extended() {
            // thumb, index, middle, ring
            [true, true, false, false] => GestureToken::PrimaryClick,
            [false, true, true, false] => GestureToken::SecondaryClick,
            [false, true, true, true] => GestureToken::HoldDrag,
            _ => GestureToken::Move,
        }
    }

    fn name(&self) -> &str {
        "joint"
    }
}

/// Classifies by fingertip proximity.
///
/// Index touching middle is a primary click; thumb touching index is a
/// secondary click. This strategy has no hold gesture.
#[derive(Debug, Clone, Copy)]
pub struct DistanceClassifier {
    threshold_px: f64,
}

impl DistanceClassifier {
    pub fn new(threshold_px: f64) -> Self {
        Self { threshold_px }
    }

    /// Scale a threshold given at [`REFERENCE_CAPTURE`] to `capture`.
    pub fn for_capture(reference_threshold_px: f64, capture: Resolution) -> Self {
        let scale = capture.diagonal() / REFERENCE_CAPTURE.diagonal();
        Self::new(reference_threshold_px * scale)
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }
}

impl GestureClassifier for DistanceClassifier {
    fn classify(&self, fingers: &FingerState) -> GestureToken {
        if fingers.tip_distance(Finger::Index, Finger::Middle) < self.threshold_px {
            GestureToken::PrimaryClick
        } else if fingers.tip_distance(Finger::Thumb, Finger::Index) < self.threshold_px {
            GestureToken::SecondaryClick
        } else {
            GestureToken::Move
        }
    }

    fn name(&self) -> &str {
        "distance"
    }
}

/// Build the classifier selected by the configuration.
pub fn create_classifier(config: &AppConfig) -> Box<dyn GestureClassifier> {
    match config.clicks.classifier {
        ClassifierKind::Joint => Box::new(JointClassifier),
        ClassifierKind::Distance => Box::new(DistanceClassifier::for_capture(
            config.clicks.click_distance_px,
            config.capture,
        )),
    }
}

/// Key-hand token from its thumb-to-index pinch distance.
pub fn classify_key_hand(pinch_distance: f64, pinch_threshold: f64) -> GestureToken {
    if pinch_distance < pinch_threshold {
        GestureToken::KeyPinch
    } else {
        GestureToken::Idle
    }
}
