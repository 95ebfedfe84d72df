//! Calibration and high score persistence
//!
//! Features:
//! - Small JSON record: thresholds + high score
//! - Atomic replace (write tmp, rename over the save)
//! - Missing or corrupt files fall back to defaults; they never stop the game
//! - Writes are best-effort: failures are logged and the session carries on

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{CalibrationThresholds, GameState};

/// Default save file name
pub const DEFAULT_SAVE_PATH: &str = "vr_config.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("save file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("saved thresholds are degenerate (silence={silence}, shout={shout})")]
    InvalidThresholds { silence: f32, shout: f32 },
}

impl PersistError {
    /// True when there simply is no save file yet
    pub fn is_missing(&self) -> bool {
        matches!(self, PersistError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Persisted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub silence: f32,
    pub shout: f32,
    #[serde(default)]
    pub high_score: u32,
    /// Thresholds were measured, not defaults. Older files only existed after a calibration.
    #[serde(default = "default_calibrated")]
    pub calibrated: bool,
}

fn default_calibrated() -> bool {
    true
}

impl SaveData {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            silence: state.thresholds.silence(),
            shout: state.thresholds.shout(),
            high_score: state.high_score,
            calibrated: state.calibrated,
        }
    }

    /// Validated thresholds
    pub fn thresholds(&self) -> Result<CalibrationThresholds, PersistError> {
        CalibrationThresholds::new(self.silence, self.shout).ok_or(PersistError::InvalidThresholds {
            silence: self.silence,
            shout: self.shout,
        })
    }

    /// Install the saved thresholds, high score and calibration status
    pub fn apply(&self, state: &mut GameState) -> Result<(), PersistError> {
        state.thresholds = self.thresholds()?;
        state.high_score = self.high_score;
        state.calibrated = self.calibrated;
        Ok(())
    }
}

/// Read and parse a save file
pub fn load(path: &Path) -> Result<SaveData, PersistError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a save file into the state. Returns true if it was applied; any
/// problem leaves the state on its defaults.
pub fn load_into(path: &Path, state: &mut GameState) -> bool {
    match load(path).and_then(|data| data.apply(state)) {
        Ok(()) if !state.calibrated => {
            log::info!(
                "High score {} loaded from {}, calibration needed",
                state.high_score,
                path.display()
            );
            true
        }
        Ok(()) => {
            log::info!(
                "Calibration loaded from {} (silence={:.4} shout={:.4} high score {})",
                path.display(),
                state.thresholds.silence(),
                state.thresholds.shout(),
                state.high_score
            );
            true
        }
        Err(e) if e.is_missing() => {
            log::info!("No save file at {}, calibration needed", path.display());
            false
        }
        Err(e) => {
            log::warn!("Ignoring save file {}: {e}", path.display());
            false
        }
    }
}

/// Write the save file, replacing the old one atomically
pub fn save(data: &SaveData, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(data)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Save the state's record, logging instead of failing
pub fn save_state(state: &GameState, path: &Path) {
    match save(&SaveData::from_state(state), path) {
        Ok(()) => log::debug!("Saved {}", path.display()),
        Err(e) => log::warn!("Failed to save {}: {e}", path.display()),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
