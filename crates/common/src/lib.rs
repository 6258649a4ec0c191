//! Handpilot Common Utilities
//!
//! Shared infrastructure for all Handpilot crates:
//! - Error types and result aliases
//! - Frame clock and duration conversions
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
