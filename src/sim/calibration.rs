//! Microphone calibration
//!
//! Two fixed-length phases: first the player stays quiet so the noise floor
//! can be measured, then shouts so the top of their range can be measured.
//! The two thresholds normalize the raw amplitude into a control level.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Amplitude thresholds used to normalize the control signal.
/// Always satisfies `0 <= silence < shout`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationThresholds {
    silence: f32,
    shout: f32,
}

impl Default for CalibrationThresholds {
    fn default() -> Self {
        Self {
            silence: 0.05,
            shout: 0.15,
        }
    }
}

impl CalibrationThresholds {
    /// Returns `None` for degenerate pairs (non-finite, negative, or shout <= silence)
    pub fn new(silence: f32, shout: f32) -> Option<Self> {
        let valid = silence.is_finite() && shout.is_finite() && silence >= 0.0 && shout > silence;
        valid.then_some(Self { silence, shout })
    }

    #[inline]
    pub fn silence(&self) -> f32 {
        self.silence
    }

    #[inline]
    pub fn shout(&self) -> f32 {
        self.shout
    }

    /// Width of the usable amplitude range (always positive)
    #[inline]
    pub fn range(&self) -> f32 {
        self.shout - self.silence
    }
}

/// Which calibration phase is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationPhase {
    Silence,
    Shout,
}

/// Result of feeding one tick into a calibration session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStep {
    /// Current phase still running
    Continue,
    /// Silence phase finished, shout phase begins
    ShoutBegins,
    /// Both phases finished
    Finished,
}

/// Outcome of a finished calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    Accepted(CalibrationThresholds),
    /// The measured pair was degenerate; previous thresholds stay in force
    Rejected { silence: f32, shout: f32 },
}

/// Noise floor from quiet samples, with a safety margin
pub fn silence_threshold(samples: &[f32], margin: f32) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }
    let mean = samples.iter().sum::<f32>() / samples.len() as f32;
    Some(mean * margin)
}

/// Shout level from loud samples, scaled down so weaker shouts still register
pub fn shout_threshold(samples: &[f32], margin: f32) -> Option<f32> {
    samples.iter().copied().reduce(f32::max).map(|max| max * margin)
}

/// In-progress calibration data. Dropped on back-navigation.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationSession {
    pub phase: CalibrationPhase,
    /// Ticks elapsed in the current phase
    pub ticks: u32,
    #[serde(skip)]
    silence_samples: Vec<f32>,
    #[serde(skip)]
    shout_samples: Vec<f32>,
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self {
            phase: CalibrationPhase::Silence,
            ticks: 0,
            silence_samples: Vec::new(),
            shout_samples: Vec::new(),
        }
    }

    /// Record one tick worth of amplitude. Only positive readings count;
    /// a dead stream contributes nothing.
    pub fn sample(&mut self, amplitude: f32, duration_ticks: u32) -> CalibrationStep {
        self.ticks += 1;
        if amplitude > 0.0 {
            match self.phase {
                CalibrationPhase::Silence => self.silence_samples.push(amplitude),
                CalibrationPhase::Shout => self.shout_samples.push(amplitude),
            }
        }

        if self.ticks < duration_ticks {
            return CalibrationStep::Continue;
        }

        match self.phase {
            CalibrationPhase::Silence => {
                self.phase = CalibrationPhase::Shout;
                self.ticks = 0;
                CalibrationStep::ShoutBegins
            }
            CalibrationPhase::Shout => CalibrationStep::Finished,
        }
    }

    /// Derive thresholds from the collected samples. An empty phase keeps
    /// the previous value for its threshold.
    pub fn finish(&self, previous: CalibrationThresholds, tuning: &Tuning) -> CalibrationOutcome {
        let silence = silence_threshold(&self.silence_samples, tuning.silence_margin)
            .unwrap_or(previous.silence());
        let shout = shout_threshold(&self.shout_samples, tuning.shout_margin)
            .unwrap_or(previous.shout());

        match CalibrationThresholds::new(silence, shout) {
            Some(thresholds) => CalibrationOutcome::Accepted(thresholds),
            None => CalibrationOutcome::Rejected { silence, shout },
        }
    }
}
