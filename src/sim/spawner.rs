//! Obstacle lifecycle: spawn, scroll, pass, despawn
//!
//! Obstacles enter at the right edge, scroll left at the current speed,
//! are marked passed once when their center crosses the player lane, and
//! are dropped as soon as they are fully off the left edge.

use rand::Rng;
use serde::Serialize;

use super::progression::{gap_height_for_level, spawn_interval_range};
use super::state::Obstacle;
use crate::tuning::Tuning;

/// Tick counter that releases one obstacle per interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnTimer {
    pub counter: u32,
    /// Ticks to wait before the next spawn
    pub interval: u32,
}

impl SpawnTimer {
    pub fn new(interval: u32) -> Self {
        Self {
            counter: 0,
            interval: interval.max(1),
        }
    }

    /// Count one tick. Returns true when an obstacle is due; the counter restarts.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter > self.interval {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

/// Draw the wait before the next spawn for a level
pub fn next_interval<R: Rng>(rng: &mut R, level: u32, tuning: &Tuning) -> u32 {
    let (min, max) = spawn_interval_range(level, tuning);
    rng.random_range(min..=max)
}

/// New obstacle at the right edge with a random gap kept away from the screen edges
pub fn spawn_obstacle<R: Rng>(rng: &mut R, level: u32, tuning: &Tuning) -> Obstacle {
    let lo = tuning.gap_margin_top;
    let hi = tuning.screen_height - tuning.gap_margin_bottom;
    let gap_top = if hi > lo { rng.random_range(lo..=hi) } else { lo };
    Obstacle::new(
        tuning.screen_width,
        gap_top,
        gap_height_for_level(level, tuning),
        tuning.obstacle_width,
    )
}

/// Move every obstacle left by `speed`
pub fn scroll(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.x -= speed;
    }
}

/// Mark an obstacle passed if its center is behind the lane.
/// Returns true only on the tick it flips; already-passed obstacles never score again.
pub fn try_pass(obstacle: &mut Obstacle, player_x: f32) -> bool {
    if obstacle.passed || obstacle.center_x() >= player_x {
        return false;
    }
    obstacle.passed = true;
    true
}

/// Drop obstacles that are fully off the left edge. Returns how many were removed.
pub fn despawn_offscreen(obstacles: &mut Vec<Obstacle>) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| !o.is_offscreen());
    before - obstacles.len()
}
