//! Application configuration.
//!
//! Every tunable of the gesture engine lives here. Values are plain data;
//! [`AppConfig::validate`] rejects combinations the engine cannot run with.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use handpilot_hand_model::{Handedness, Resolution};

use crate::error::{HandpilotError, HandpilotResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Resolution of the frames the hand detector ran on.
    pub capture: Resolution,

    /// Resolution of the surface the pointer moves over.
    pub surface: Resolution,

    /// Pointer motion settings.
    pub pointer: PointerSettings,

    /// Click gesture settings.
    pub clicks: ClickSettings,

    /// Virtual keyboard settings.
    pub keyboard: KeyboardSettings,

    /// Which hand drives which engine.
    pub roles: RoleMapping,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Pointer motion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerSettings {
    /// Margin (capture pixels) trimmed from each edge of the capture frame
    /// before it is stretched onto the surface.
    pub frame_reduction: f64,

    /// Smoothing divisor. 1 disables smoothing; larger values lag more.
    pub smoothening: f64,
}

/// How pointer-hand finger states become click gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Compare fingertips against their joints.
    #[default]
    Joint,
    /// Compare fingertip-to-fingertip pixel distances.
    Distance,
}

/// Click gesture parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickSettings {
    pub classifier: ClassifierKind,

    /// Two primary clicks closer than this become a double click.
    pub double_click_threshold_secs: f64,

    /// Fingertip distance for the distance classifier, in pixels at the
    /// 640x480 reference resolution. Scaled with the capture diagonal.
    pub click_distance_px: f64,
}

/// Virtual keyboard parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardSettings {
    /// Minimum interval between two accepted key pinches.
    pub cooldown_secs: f64,

    /// Thumb-to-index distance (normalized) below which the hand pinches.
    pub pinch_threshold: f64,

    /// Pixel surface the keyboard layout is laid out on.
    pub surface: Resolution,

    /// Optional JSON layout replacing the standard one.
    pub layout_file: Option<PathBuf>,
}

/// Handedness-to-role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleMapping {
    pub pointer: Handedness,
    pub keyboard: Handedness,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "handpilot_gesture_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture: Resolution::new(640, 480),
            surface: Resolution::new(1920, 1080),
            pointer: PointerSettings::default(),
            clicks: ClickSettings::default(),
            keyboard: KeyboardSettings::default(),
            roles: RoleMapping::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PointerSettings {
    fn default() -> Self {
        Self {
            frame_reduction: 50.0,
            smoothening: 2.0,
        }
    }
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::Joint,
            double_click_threshold_secs: 0.3,
            click_distance_px: 40.0,
        }
    }
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            cooldown_secs: 0.2,
            pinch_threshold: 0.05,
            surface: Resolution::new(1000, 400),
            layout_file: None,
        }
    }
}

impl Default for RoleMapping {
    fn default() -> Self {
        Self {
            pointer: Handedness::Right,
            keyboard: Handedness::Left,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Missing fields take defaults.
    pub fn load_from(path: impl AsRef<Path>) -> HandpilotResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HandpilotError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> HandpilotResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> HandpilotResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> HandpilotResult<()> {
        for (name, res) in [
            ("capture", self.capture),
            ("surface", self.surface),
            ("keyboard.surface", self.keyboard.surface),
        ] {
            if res.is_empty() {
                return Err(HandpilotError::config(format!(
                    "{name} resolution must be non-zero, got {res}"
                )));
            }
        }

        let margin = self.pointer.frame_reduction;
        if margin.is_nan() || margin < 0.0 {
            return Err(HandpilotError::config(format!(
                "pointer.frame_reduction must be >= 0, got {margin}"
            )));
        }
        let shortest = self.capture.width.min(self.capture.height) as f64;
        if 2.0 * margin >= shortest {
            return Err(HandpilotError::config(format!(
                "pointer.frame_reduction {margin} leaves no usable area in a {} capture",
                self.capture
            )));
        }
        if self.pointer.smoothening.is_nan() || self.pointer.smoothening < 1.0 {
            return Err(HandpilotError::config(format!(
                "pointer.smoothening must be >= 1, got {}",
                self.pointer.smoothening
            )));
        }

        positive("clicks.double_click_threshold_secs", self.clicks.double_click_threshold_secs)?;
        positive("clicks.click_distance_px", self.clicks.click_distance_px)?;
        positive("keyboard.cooldown_secs", self.keyboard.cooldown_secs)?;
        positive("keyboard.pinch_threshold", self.keyboard.pinch_threshold)?;

        if self.roles.pointer == self.roles.keyboard {
            return Err(HandpilotError::config(format!(
                "pointer and keyboard roles both assigned to the {} hand",
                self.roles.pointer
            )));
        }

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> HandpilotResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(HandpilotError::config(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("handpilot").join("config.json")
}
