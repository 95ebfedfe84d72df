//! Control signal: turns microphone amplitude into flaps
//!
//! The amplitude is normalized against the calibration thresholds into a
//! control level in [0, 1]. Above the activation threshold the level sets
//! the flap strength through a soft response curve.

use serde::{Deserialize, Serialize};

use super::autopilot;
use super::calibration::CalibrationThresholds;
use super::state::{Obstacle, PlayerBody};
use crate::tuning::Tuning;

/// Normalized control level in [0, 1]
pub fn control_level(amplitude: f32, thresholds: &CalibrationThresholds) -> f32 {
    if amplitude <= thresholds.silence() {
        return 0.0;
    }
    ((amplitude - thresholds.silence()) / thresholds.range()).clamp(0.0, 1.0)
}

/// Upward speed for a control level, or `None` if the level is too low to flap
pub fn voice_impulse(level: f32, jump_power: f32, tuning: &Tuning) -> Option<f32> {
    (level > tuning.activation_threshold)
        .then(|| jump_power * level.powf(tuning.response_exponent))
}

/// Who decides when to flap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Microphone amplitude drives the flap
    Voice,
    /// Autonomous controller flies through the gaps
    Autopilot,
}

impl ControlMode {
    pub fn from_flag(autopilot: bool) -> Self {
        if autopilot {
            ControlMode::Autopilot
        } else {
            ControlMode::Voice
        }
    }
}

/// Everything a controller may look at when deciding this tick's flap
#[derive(Debug, Clone, Copy)]
pub struct ControlContext<'a> {
    pub amplitude: f32,
    pub thresholds: &'a CalibrationThresholds,
    pub jump_power: f32,
    pub player: &'a PlayerBody,
    pub obstacles: &'a [Obstacle],
    pub tuning: &'a Tuning,
}

impl ControlMode {
    /// Upward speed to set this tick, if any
    pub fn impulse(self, ctx: &ControlContext<'_>) -> Option<f32> {
        match self {
            ControlMode::Voice => {
                let level = control_level(ctx.amplitude, ctx.thresholds);
                voice_impulse(level, ctx.jump_power, ctx.tuning)
            }
            ControlMode::Autopilot => autopilot::decide(ctx.player, ctx.obstacles, ctx.tuning),
        }
    }
}

/// Sustained-sound start trigger used on the menu and game over screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VoiceTrigger {
    /// Charge meter in [0, 1]
    pub progress: f32,
}

impl VoiceTrigger {
    /// Feed one tick of amplitude. Returns true when the meter fills.
    pub fn update(&mut self, amplitude: f32, tuning: &Tuning) -> bool {
        if amplitude > tuning.voice_start_threshold {
            let step = 1.0 / tuning.voice_start_ticks.max(1) as f32;
            self.progress = (self.progress + step).min(1.0);
            // Integer tick counts can land a hair under 1.0 through rounding
            if self.progress >= 1.0 - 1e-4 {
                self.progress = 0.0;
                return true;
            }
        } else {
            self.progress = (self.progress - tuning.voice_start_decay).max(0.0);
        }
        false
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> CalibrationThresholds {
        CalibrationThresholds::new(0.05, 0.15).unwrap()
    }

    #[test]
    fn test_control_level_mapping() {
        let t = thresholds();
        assert_eq!(control_level(0.05, &t), 0.0);
        assert_eq!(control_level(0.0, &t), 0.0);
        assert!((control_level(0.10, &t) - 0.5).abs() < 1e-5);
        assert_eq!(control_level(0.5, &t), 1.0);
    }

    #[test]
    fn test_voice_impulse() {
        let tuning = Tuning::default();
        let jump_power = 9.5;

        assert_eq!(voice_impulse(0.0, jump_power, &tuning), None);
        assert_eq!(voice_impulse(0.1, jump_power, &tuning), None);

        let level = control_level(0.10, &thresholds());
        let impulse = voice_impulse(level, jump_power, &tuning).unwrap();
        assert!((impulse - jump_power * 0.5f32.powf(0.75)).abs() < 1e-4);

        let full = voice_impulse(1.0, jump_power, &tuning).unwrap();
        assert!((full - jump_power).abs() < 1e-6);
    }

    #[test]
    fn test_voice_mode_uses_amplitude() {
        let tuning = Tuning::default();
        let t = thresholds();
        let player = PlayerBody::new(360.0, 22.0);
        let ctx = ControlContext {
            amplitude: 0.15,
            thresholds: &t,
            jump_power: 9.5,
            player: &player,
            obstacles: &[],
            tuning: &tuning,
        };
        assert_eq!(ControlMode::Voice.impulse(&ctx), Some(9.5));

        let quiet = ControlContext { amplitude: 0.01, ..ctx };
        assert_eq!(ControlMode::Voice.impulse(&quiet), None);
        assert_eq!(ControlMode::from_flag(true), ControlMode::Autopilot);
    }

    #[test]
    fn test_voice_trigger_needs_sustained_sound() {
        let tuning = Tuning::default();
        let mut trigger = VoiceTrigger::default();

        for _ in 0..tuning.voice_start_ticks - 1 {
            assert!(!trigger.update(0.01, &tuning));
        }
        assert!(trigger.update(0.01, &tuning));
        assert_eq!(trigger.progress, 0.0);

        // A short burst followed by silence never fires
        for _ in 0..5 {
            assert!(!trigger.update(0.01, &tuning));
        }
        for _ in 0..20 {
            assert!(!trigger.update(0.0, &tuning));
        }
        assert_eq!(trigger.progress, 0.0);
    }
}
