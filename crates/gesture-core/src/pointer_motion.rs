//! Pointer motion: capture-space fingertip to smoothed surface position.
//!
//! The capture frame is trimmed by `frame_reduction` on every side and the
//! remaining band is stretched over the whole surface, so the hand can
//! reach the surface edges without leaving the camera's view. Positions
//! outside the band saturate at the surface edges.

use handpilot_common::config::AppConfig;
use handpilot_hand_model::{Point2D, Resolution};

/// Stateful pointer filter. Holds the previous output between frames.
#[derive(Debug, Clone)]
pub struct PointerMotionFilter {
    capture: Resolution,
    surface: Resolution,
    frame_reduction: f64,
    smoothening: f64,
    previous: Point2D,
}

impl PointerMotionFilter {
    /// Create a filter. The first output is smoothed from the surface origin.
    pub fn new(
        capture: Resolution,
        surface: Resolution,
        frame_reduction: f64,
        smoothening: f64,
    ) -> Self {
        Self {
            capture,
            surface,
            frame_reduction,
            smoothening,
            previous: Point2D::ORIGIN,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.capture,
            config.surface,
            config.pointer.frame_reduction,
            config.pointer.smoothening,
        )
    }

    /// Map a capture-space position onto the surface, without smoothing.
    pub fn remap(&self, tip: Point2D) -> Point2D {
        let m = self.frame_reduction;
        Point2D::new(
            interp(tip.x, m, self.capture.width_f64() - m, self.surface.width_f64()),
            interp(tip.y, m, self.capture.height_f64() - m, self.surface.height_f64()),
        )
    }

    /// Remap and smooth one fingertip sample; the result becomes the new
    /// previous position.
    pub fn apply(&mut self, tip: Point2D) -> Point2D {
        let target = self.remap(tip);
        let current = Point2D::new(
            self.previous.x + (target.x - self.previous.x) / self.smoothening,
            self.previous.y + (target.y - self.previous.y) / self.smoothening,
        );
        self.previous = current;
        current
    }

    /// Last smoothed output.
    pub fn previous(&self) -> Point2D {
        self.previous
    }
}

/// Linear map of `[lo, hi]` onto `[0, out_max]`, clamped at both ends.
fn interp(value: f64, lo: f64, hi: f64, out_max: f64) -> f64 {
    if value <= lo {
        return 0.0;
    }
    if value >= hi {
        return out_max;
    }
    (value - lo) / (hi - lo) * out_max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> PointerMotionFilter {
        PointerMotionFilter::new(
            Resolution::new(640, 480),
            Resolution::new(1920, 1080),
            50.0,
            2.0,
        )
    }

    #[test]
    fn test_left_clamp_scenario() {
        let mut f = filter();
        let remapped = f.remap(Point2D::new(50.0, 240.0));
        assert_eq!(remapped.x, 0.0);
        assert!((remapped.y - 540.0).abs() < 1e-9);

        f.previous = Point2D::new(960.0, 540.0);
        let out = f.apply(Point2D::new(50.0, 240.0));
        assert!((out.x - 480.0).abs() < 1e-9);
        assert!((out.y - 540.0).abs() < 1e-9);
        assert_eq!(f.previous(), out);
    }

    #[test]
    fn test_outside_margin_saturates() {
        let f = filter();
        assert_eq!(f.remap(Point2D::new(-20.0, 10.0)), Point2D::new(0.0, 0.0));
        assert_eq!(
            f.remap(Point2D::new(639.0, 470.0)),
            Point2D::new(1920.0, 1080.0)
        );
    }

    #[test]
    fn test_smoothing_converges_on_held_target() {
        let mut f = filter();
        let tip = Point2D::new(320.0, 240.0);
        let target = f.remap(tip);
        let mut last_gap = f64::MAX;
        for _ in 0..20 {
            let out = f.apply(tip);
            let gap = out.distance(&target);
            assert!(gap < last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 0.01);
    }

    #[test]
    fn test_unit_smoothening_tracks_exactly() {
        let mut f = PointerMotionFilter::new(
            Resolution::new(640, 480),
            Resolution::new(1920, 1080),
            50.0,
            1.0,
        );
        let tip = Point2D::new(200.0, 100.0);
        assert_eq!(f.apply(tip), f.remap(tip));
    }
}
