//! Game balance constants
//!
//! Every knob the simulation reads lives here so a settings file can override
//! any subset of them. Defaults reproduce the classic feel of the game.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Autonomous controller constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotTuning {
    /// An obstacle stays the target until its right edge is this far behind the lane
    pub lane_margin: f32,
    /// Aim point inside the gap, as a fraction of gap height from the top
    pub gap_bias: f32,
    /// Jump regardless of vertical velocity when this close to the gap bottom
    pub emergency_margin: f32,
    /// Safety projection horizon (ticks)
    pub lookahead_ticks: u32,
    /// Upward speed assumed by the safety projection
    pub projected_jump_speed: f32,
    /// Extra room required between the projected position and the gap top
    pub clearance: f32,
    /// Upward speed set when the autopilot jumps
    pub jump_speed: f32,
    /// Upward speed set when hovering with no obstacle ahead
    pub hover_speed: f32,
}

impl Default for AutopilotTuning {
    fn default() -> Self {
        Self {
            lane_margin: 20.0,
            gap_bias: 0.70,
            emergency_margin: 30.0,
            lookahead_ticks: 3,
            projected_jump_speed: 9.5,
            clearance: 10.0,
            jump_speed: 9.0,
            hover_speed: 7.0,
        }
    }
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub player_x: f32,
    pub player_radius: f32,

    // === Physics (pixels per tick) ===
    pub gravity_base: f32,
    pub gravity_step: f32,
    pub jump_power_base: f32,
    pub jump_power_step: f32,
    pub max_up_base: f32,
    pub max_up_step: f32,
    pub max_down_base: f32,
    pub max_down_step: f32,

    // === Voice control ===
    /// Control level must exceed this to flap
    pub activation_threshold: f32,
    /// Exponent applied to the control level (< 1 gives a softer ramp)
    pub response_exponent: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub gap_height_base: f32,
    pub gap_height_step: f32,
    pub gap_height_min: f32,
    /// Gap top is kept at least this far from the screen top
    pub gap_margin_top: f32,
    /// Gap top is kept at least this far from the screen bottom
    pub gap_margin_bottom: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub speed_adjust: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub initial_spawn_interval: u32,
    pub spawn_min_base: u32,
    pub spawn_max_base: u32,
    pub spawn_level_reduction: u32,
    pub spawn_min_floor: u32,
    pub spawn_max_floor: u32,

    // === Progression ===
    pub points_per_level: u32,
    pub combo_cap: u32,
    pub combo_window_ticks: u32,

    // === Calibration ===
    pub calibration_ticks: u32,
    pub silence_margin: f32,
    pub shout_margin: f32,
    pub default_silence: f32,
    pub default_shout: f32,

    // === Session ===
    pub explosion_ticks: u32,
    pub voice_start_threshold: f32,
    pub voice_start_ticks: u32,
    pub voice_start_decay: f32,

    pub autopilot: AutopilotTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            player_x: PLAYER_X,
            player_radius: PLAYER_RADIUS,

            gravity_base: 0.45,
            gravity_step: 0.04,
            jump_power_base: 9.5,
            jump_power_step: 0.95,
            max_up_base: 11.0,
            max_up_step: 0.5,
            max_down_base: 15.0,
            max_down_step: 0.3,

            activation_threshold: 0.1,
            response_exponent: 0.75,

            obstacle_width: OBSTACLE_WIDTH,
            gap_height_base: 235.0,
            gap_height_step: 4.0,
            gap_height_min: 150.0,
            gap_margin_top: 160.0,
            gap_margin_bottom: 260.0,
            base_speed: 5.5,
            speed_step: 0.06,
            speed_adjust: 0.5,
            speed_min: 2.0,
            speed_max: 120.0,
            initial_spawn_interval: 115,
            spawn_min_base: 80,
            spawn_max_base: 160,
            spawn_level_reduction: 8,
            spawn_min_floor: 35,
            spawn_max_floor: 50,

            points_per_level: 20,
            combo_cap: 5,
            combo_window_ticks: 57,

            calibration_ticks: 90,
            silence_margin: 1.3,
            shout_margin: 0.75,
            default_silence: 0.05,
            default_shout: 0.15,

            explosion_ticks: 60,
            voice_start_threshold: 0.0035,
            voice_start_ticks: 12,
            voice_start_decay: 0.05,

            autopilot: AutopilotTuning::default(),
        }
    }
}
