//! Autonomous controller (demo / accessibility mode)
//!
//! Aims for the lower part of the next gap: flapping is instantaneous while
//! falling is slow, so staying low is the safe side. A short forward
//! projection vetoes flaps that would carry the player into the upper pipe.

use super::state::{Obstacle, PlayerBody};
use crate::tuning::Tuning;

/// First obstacle whose right edge is still ahead of the player lane
pub fn target_obstacle<'a>(obstacles: &'a [Obstacle], tuning: &Tuning) -> Option<&'a Obstacle> {
    let lane = tuning.player_x - tuning.autopilot.lane_margin;
    obstacles.iter().find(|o| o.right() > lane)
}

/// Upward speed to set this tick, if the autopilot wants to flap
pub fn decide(player: &PlayerBody, obstacles: &[Obstacle], tuning: &Tuning) -> Option<f32> {
    let ap = &tuning.autopilot;
    let falling = player.velocity > 0.0;

    let Some(obs) = target_obstacle(obstacles, tuning) else {
        // Nothing ahead: hold around the middle of the screen
        let below_center = player.y > tuning.screen_height / 2.0;
        return (below_center && falling).then_some(ap.hover_speed);
    };

    let target_y = obs.gap_top + obs.gap_height * ap.gap_bias;
    if player.y <= target_y {
        return None;
    }

    let emergency = player.y > obs.gap_bottom() - ap.emergency_margin;
    if !(emergency || falling) {
        return None;
    }

    let projected_y = player.y - ap.projected_jump_speed * ap.lookahead_ticks as f32;
    let ceiling = obs.gap_top + player.radius + ap.clearance;
    (projected_y > ceiling).then_some(ap.jump_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle_at(x: f32, gap_top: f32) -> Obstacle {
        Obstacle::new(x, gap_top, 230.0, 70.0)
    }

    fn body(y: f32, velocity: f32) -> PlayerBody {
        PlayerBody {
            y,
            velocity,
            radius: 22.0,
        }
    }

    #[test]
    fn test_targets_first_obstacle_ahead() {
        let tuning = Tuning::default();
        // Right edge 120 is behind the 130 lane, skip it
        let obstacles = vec![obstacle_at(50.0, 100.0), obstacle_at(400.0, 300.0)];
        let target = target_obstacle(&obstacles, &tuning).unwrap();
        assert_eq!(target.x, 400.0);
    }

    #[test]
    fn test_flaps_when_low_and_falling() {
        let tuning = Tuning::default();
        let obstacles = vec![obstacle_at(400.0, 200.0)];
        // Target y = 200 + 0.7 * 230 = 361
        assert_eq!(decide(&body(380.0, 2.0), &obstacles, &tuning), Some(9.0));
        // Rising and not in danger: wait
        assert_eq!(decide(&body(380.0, -3.0), &obstacles, &tuning), None);
        // Above the target: wait
        assert_eq!(decide(&body(300.0, 2.0), &obstacles, &tuning), None);
    }

    #[test]
    fn test_emergency_flap_while_rising() {
        let tuning = Tuning::default();
        let obstacles = vec![obstacle_at(400.0, 200.0)];
        // Gap bottom 430, emergency below 400
        assert_eq!(decide(&body(410.0, -1.0), &obstacles, &tuning), Some(9.0));
    }

    #[test]
    fn test_safety_projection_vetoes_flap() {
        let mut tuning = Tuning::default();
        // Thin gap: target and ceiling are close together
        tuning.autopilot.gap_bias = 0.1;
        let obstacles = vec![Obstacle::new(400.0, 200.0, 100.0, 70.0)];
        // Projected y = 250 - 28.5 = 221.5, ceiling = 200 + 22 + 10 = 232
        assert_eq!(decide(&body(250.0, 2.0), &obstacles, &tuning), None);
        // Lower down the projection clears
        assert_eq!(decide(&body(270.0, 2.0), &obstacles, &tuning), Some(9.0));
    }

    #[test]
    fn test_hover_without_obstacles() {
        let tuning = Tuning::default();
        assert_eq!(decide(&body(400.0, 1.0), &[], &tuning), Some(7.0));
        assert_eq!(decide(&body(400.0, -1.0), &[], &tuning), None);
        assert_eq!(decide(&body(300.0, 1.0), &[], &tuning), None);
    }
}
