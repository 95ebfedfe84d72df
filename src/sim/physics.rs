//! Vertical motion of the player
//!
//! Fixed timestep, units are pixels per tick. Gravity, flap strength and
//! both terminal velocities grow with the level.

use super::state::{Edge, PlayerBody};
use crate::tuning::Tuning;

/// Physics parameters for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPhysics {
    pub gravity: f32,
    pub jump_power: f32,
    /// Maximum upward speed (positive number)
    pub max_up: f32,
    /// Maximum downward speed
    pub max_down: f32,
}

impl LevelPhysics {
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        let steps = level.saturating_sub(1) as f32;
        Self {
            gravity: tuning.gravity_base + steps * tuning.gravity_step,
            jump_power: tuning.jump_power_base + steps * tuning.jump_power_step,
            max_up: tuning.max_up_base + steps * tuning.max_up_step,
            max_down: tuning.max_down_base + steps * tuning.max_down_step,
        }
    }
}

/// What happened to the body during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Velocity set by a flap this tick
    pub jump: Option<f32>,
    /// Edge the body was clamped against
    pub bounce: Option<Edge>,
}

/// Advance the body by one tick.
///
/// `impulse` is an upward speed; a flap replaces the current velocity rather
/// than adding to it, so a flap always beats an ongoing fall.
pub fn step(
    body: &mut PlayerBody,
    params: &LevelPhysics,
    impulse: Option<f32>,
    screen_height: f32,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    body.velocity += params.gravity;

    if let Some(speed) = impulse {
        body.velocity = -speed;
        outcome.jump = Some(body.velocity);
    }

    body.velocity = body.velocity.clamp(-params.max_up, params.max_down);
    body.y += body.velocity;

    let (min_y, max_y) = body.y_bounds(screen_height);
    if body.y < min_y {
        body.y = min_y;
        body.velocity = 0.0;
        outcome.bounce = Some(Edge::Top);
    } else if body.y > max_y {
        body.y = max_y;
        body.velocity = 0.0;
        outcome.bounce = Some(Edge::Bottom);
    }

    outcome
}
