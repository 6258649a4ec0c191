pub mod config;
pub mod layout;
pub mod replay;
pub mod validate;

use std::path::Path;

use anyhow::Context;

use handpilot_hand_model::{parse_frames, Frame};

/// Read and parse a frames JSONL file.
pub fn load_frames(path: &Path) -> anyhow::Result<Vec<Frame>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read frames from {}", path.display()))?;
    parse_frames(&content).with_context(|| format!("Invalid frames file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_load_sample_session() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fixtures")
            .join("sample-session")
            .join("frames.jsonl");
        let frames = load_frames(&path).unwrap();
        assert_eq!(frames.len(), 47);
        assert!(frames.windows(2).all(|w| w[0].timestamp_ns < w[1].timestamp_ns));
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = load_frames(Path::new("/nonexistent/frames.jsonl")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/frames.jsonl"));
    }
}
