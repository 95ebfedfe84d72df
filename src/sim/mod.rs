//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No I/O, rendering or platform dependencies; side effects leave as `GameEvent`s

pub mod autopilot;
pub mod calibration;
pub mod collision;
pub mod control;
pub mod physics;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;

pub use calibration::{CalibrationPhase, CalibrationSession, CalibrationThresholds};
pub use collision::{Aabb, first_collision, hits_obstacle};
pub use control::{ControlMode, VoiceTrigger, control_level};
pub use physics::LevelPhysics;
pub use progression::{Progression, level_for_score};
pub use state::{Edge, GameEvent, GamePhase, GameState, Obstacle, PlayerBody};
pub use tick::{TickInput, tick};
