//! Error types shared across Handpilot crates.

use std::path::PathBuf;

use handpilot_hand_model::ModelError;

/// Top-level error type for Handpilot operations.
#[derive(Debug, thiserror::Error)]
pub enum HandpilotError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Layout error: {message}")]
    Layout { message: String },

    #[error("Landmark data error: {0}")]
    Landmarks(#[from] ModelError),

    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HandpilotError.
pub type HandpilotResult<T> = Result<T, HandpilotError>;

impl HandpilotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout {
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }
}
