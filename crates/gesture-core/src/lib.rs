//! Handpilot Gesture Core
//!
//! Turns per-frame hand landmarks into pointer and keyboard actions:
//! - **Finger states:** up/down flags and fingertip positions per hand
//! - **Classification:** pluggable strategies mapping finger states to gestures
//! - **Pointer motion:** margin remapping plus exponential smoothing
//! - **Clicks:** edge detection, double-click timing, and hold/drag
//! - **Keyboard:** layouts, hit-testing, modifiers, and the pinch gate
//!
//! This crate is pure computation. Frames go in, actions come out; the
//! sinks that inject them into the OS live elsewhere.

pub mod classifier;
pub mod click;
pub mod engine;
pub mod finger_state;
pub mod keyboard;
pub mod pointer_motion;

pub use classifier::{create_classifier, GestureClassifier, GestureToken};
pub use click::{ClickPhase, ClickStateMachine};
pub use engine::{FrameOutput, GestureEngine};
pub use finger_state::FingerState;
pub use keyboard::{KeyPressGate, KeyboardLayoutModel, LayoutMode, ModifierState};
pub use pointer_motion::PointerMotionFilter;
