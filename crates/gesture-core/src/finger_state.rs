//! Per-finger extension flags derived from one hand's landmarks.

use handpilot_hand_model::landmarks::*;
use handpilot_hand_model::{Hand, Point2D, Resolution};

/// The fingers the classifiers look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
}

/// Extension flag and fingertip position of a single finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerReading {
    pub extended: bool,
    /// Tip in capture pixels.
    pub tip: Point2D,
}

/// Finger readings for one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerState {
    pub thumb: FingerReading,
    pub index: FingerReading,
    pub middle: FingerReading,
    pub ring: FingerReading,
}

impl FingerState {
    /// Derive finger readings from a hand, scaling tips into `capture`.
    ///
    /// A finger is extended when its tip lies above its PIP joint (smaller
    /// y). The thumb flexes sideways, so it is extended when its tip lies
    /// right of its IP joint.
    pub fn extract(hand: &Hand, capture: Resolution) -> Self {
        let (w, h) = (capture.width_f64(), capture.height_f64());
        let lm = |i: usize| hand.landmark(i);

        let vertical = |tip: usize, joint: usize| FingerReading {
            extended: lm(tip).y < lm(joint).y,
            tip: lm(tip).to_pixels(w, h),
        };

        Self {
            thumb: FingerReading {
                extended: lm(THUMB_TIP).x > lm(THUMB_IP).x,
                tip: lm(THUMB_TIP).to_pixels(w, h),
            },
            index: vertical(INDEX_FINGER_TIP, INDEX_FINGER_PIP),
            middle: vertical(MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP),
            ring: vertical(RING_FINGER_TIP, RING_FINGER_PIP),
        }
    }

    pub fn finger(&self, finger: Finger) -> &FingerReading {
        match finger {
            Finger::Thumb => &self.thumb,
            Finger::Index => &self.index,
            Finger::Middle => &self.middle,
            Finger::Ring => &self.ring,
        }
    }

    /// Extension flags in thumb, index, middle, ring order.
    pub fn extended(&self) -> [bool; 4] {
        [
            self.thumb.extended,
            self.index.extended,
            self.middle.extended,
            self.ring.extended,
        ]
    }

    /// Pixel distance between two fingertips.
    pub fn tip_distance(&self, a: Finger, b: Finger) -> f64 {
        self.finger(a).tip.distance(&self.finger(b).tip)
    }
}


#[cfg(test)]
mod tests {
    use super::test_hands::posed_hand;
    use super::*;
    use handpilot_hand_model::Handedness;

    #[test]
    fn test_extension_flags_follow_pose() {
        for flags in [
            [true, true, false, false],
            [false, true, true, false],
            [false, true, true, true],
            [false, false, false, false],
        ] {
            let hand = posed_hand(Handedness::Right, flags, 0.5, 0.3);
            let state = FingerState::extract(&hand, Resolution::new(640, 480));
            assert_eq!(state.extended(), flags);
        }
    }

    #[test]
    fn test_thumb_uses_horizontal_axis() {
        let mut hand = posed_hand(Handedness::Right, [false; 4], 0.5, 0.3);
        // Tip far above the joint but to its left: still folded.
        hand.landmarks[THUMB_TIP].y = 0.1;
        let state = FingerState::extract(&hand, Resolution::new(640, 480));
        assert!(!state.thumb.extended);
    }

    #[test]
    fn test_tips_scale_to_capture_pixels() {
        let hand = posed_hand(Handedness::Right, [true, true, false, false], 0.25, 0.5);
        let state = FingerState::extract(&hand, Resolution::new(640, 480));
        assert!((state.index.tip.x - 160.0).abs() < 1e-9);
        assert!((state.index.tip.y - 240.0).abs() < 1e-9);
        assert!((state.tip_distance(Finger::Index, Finger::Index)).abs() < 1e-12);
    }
}
