//! Runner settings
//!
//! Read once at startup from a JSON file. Every field is optional; a missing
//! or malformed file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::DEFAULT_SAVE_PATH;
use crate::tuning::Tuning;

/// Default settings file, used when no path is given on the command line
pub const DEFAULT_SETTINGS_PATH: &str = "voice-runner.json";

/// Runner settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where calibration and high score are kept
    pub save_path: PathBuf,
    /// Input device name (system default if unset)
    pub input_device: Option<String>,
    /// Fixed RNG seed for reproducible obstacle layouts
    pub seed: Option<u64>,
    /// Start with the autonomous controller flying
    pub autopilot: bool,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            input_device: None,
            seed: None,
            autopilot: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from a file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
