//! Voice Runner - a microphone-controlled arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, session state)
//! - `audio`: Microphone capture and amplitude sensing
//! - `persistence`: Calibration and high score save file
//! - `platform`: Control request source
//! - `settings`: Runner settings file
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep. Physics units are per tick, not per second.
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Player lane (fixed horizontal position) and body radius
    pub const PLAYER_X: f32 = 150.0;
    pub const PLAYER_RADIUS: f32 = 22.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 70.0;

    /// Microphone capture: preferred rate, frames per RMS block
    pub const SAMPLE_RATE: u32 = 44_100;
    pub const BLOCK_SIZE: usize = 2048;
}
