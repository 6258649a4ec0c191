//! Append-only action log in JSONL format.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use handpilot_common::error::{HandpilotError, HandpilotResult};
use handpilot_hand_model::{Action, Resolution};

/// Metadata written as the first line of an action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogHeader {
    pub schema_version: String,
    /// Wall-clock time at the frame clock's epoch (ISO 8601).
    pub epoch_wall: String,
    pub surface: Resolution,
    pub keyboard_surface: Resolution,
    pub classifier: String,
}

impl ActionLogHeader {
    pub fn new(
        epoch_wall: impl Into<String>,
        surface: Resolution,
        keyboard_surface: Resolution,
        classifier: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: "1.0".to_string(),
            epoch_wall: epoch_wall.into(),
            surface,
            keyboard_surface,
            classifier: classifier.into(),
        }
    }
}

/// Writes actions to a JSONL file, header first as a `#` comment line.
pub struct ActionLog {
    writer: BufWriter<File>,
    path: PathBuf,
    actions_written: u64,
}

impl ActionLog {
    /// Create the log, truncating any existing file.
    pub fn new(path: PathBuf, header: &ActionLogHeader) -> HandpilotResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);
        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| HandpilotError::sink(format!("Failed to write log header: {e}")))?;

        Ok(Self {
            writer,
            path,
            actions_written: 0,
        })
    }

    pub fn write_action(&mut self, action: &Action) -> HandpilotResult<()> {
        let json = serde_json::to_string(action)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| HandpilotError::sink(format!("Failed to write action: {e}")))?;
        self.actions_written += 1;

        if self.actions_written % 1000 == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> HandpilotResult<()> {
        self.writer
            .flush()
            .map_err(|e| HandpilotError::sink(format!("Failed to flush action log: {e}")))
    }

    pub fn actions_written(&self) -> u64 {
        self.actions_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ActionLog {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Read an action log back, returning its header and actions.
pub fn read_action_log(
    path: impl AsRef<Path>,
) -> HandpilotResult<(Option<ActionLogHeader>, Vec<Action>)> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HandpilotError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;

    let mut header = None;
    let mut actions = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.strip_prefix('#') {
            Some(comment) if header.is_none() => {
                header = serde_json::from_str(comment.trim()).ok();
            }
            Some(_) => {}
            None => actions.push(serde_json::from_str(line)?),
        }
    }
    Ok((header, actions))
}
