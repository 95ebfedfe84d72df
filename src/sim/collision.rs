//! Collision detection between the player and pipes
//!
//! Everything is an axis-aligned box: the player is approximated by the box
//! around its circle, and each obstacle is two pipes, one hanging from the
//! top of the screen down to the gap and one standing from the gap bottom to
//! the floor.

use glam::Vec2;

use super::state::{Obstacle, PlayerBody};

/// Axis-aligned box (screen coordinates, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Overlap with positive area. Boxes that only share an edge do not intersect,
    /// and a degenerate (zero-height) pipe never hits anything.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Box around the player's circle at the lane position
pub fn player_box(player: &PlayerBody, lane_x: f32) -> Aabb {
    Aabb::from_center(Vec2::new(lane_x, player.y), Vec2::splat(player.radius))
}

/// Upper and lower pipe of an obstacle
pub fn obstacle_boxes(obstacle: &Obstacle, screen_height: f32) -> [Aabb; 2] {
    let top = Aabb::new(
        Vec2::new(obstacle.x, 0.0),
        Vec2::new(obstacle.right(), obstacle.gap_top),
    );
    let bottom = Aabb::new(
        Vec2::new(obstacle.x, obstacle.gap_bottom()),
        Vec2::new(obstacle.right(), screen_height),
    );
    [top, bottom]
}

/// Does the player touch either pipe of this obstacle?
pub fn hits_obstacle(player: &PlayerBody, lane_x: f32, obstacle: &Obstacle, screen_height: f32) -> bool {
    let body = player_box(player, lane_x);
    obstacle_boxes(obstacle, screen_height)
        .iter()
        .any(|pipe| body.intersects(pipe))
}

/// Index of the first obstacle the player hits, if any
pub fn first_collision(
    player: &PlayerBody,
    lane_x: f32,
    obstacles: &[Obstacle],
    screen_height: f32,
) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| hits_obstacle(player, lane_x, o, screen_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANE: f32 = 150.0;
    const HEIGHT: f32 = 720.0;

    fn player_at(y: f32) -> PlayerBody {
        PlayerBody::new(y, 22.0)
    }

    fn pipe_over_lane() -> Obstacle {
        // Spans x 120..190, gap 200..430
        Obstacle::new(120.0, 200.0, 230.0, 70.0)
    }

    #[test]
    fn test_inside_gap_is_safe() {
        assert!(!hits_obstacle(&player_at(315.0), LANE, &pipe_over_lane(), HEIGHT));
        // Touching the gap edges exactly is not a hit
        assert!(!hits_obstacle(&player_at(222.0), LANE, &pipe_over_lane(), HEIGHT));
        assert!(!hits_obstacle(&player_at(408.0), LANE, &pipe_over_lane(), HEIGHT));
    }

    #[test]
    fn test_top_and_bottom_pipe_hits() {
        assert!(hits_obstacle(&player_at(215.0), LANE, &pipe_over_lane(), HEIGHT));
        assert!(hits_obstacle(&player_at(420.0), LANE, &pipe_over_lane(), HEIGHT));
        assert!(hits_obstacle(&player_at(22.0), LANE, &pipe_over_lane(), HEIGHT));
        assert!(hits_obstacle(&player_at(698.0), LANE, &pipe_over_lane(), HEIGHT));
    }

    #[test]
    fn test_horizontal_separation() {
        // Pipe entirely to the right of the player box (player spans 128..172)
        let ahead = Obstacle::new(172.0, 200.0, 230.0, 70.0);
        assert!(!hits_obstacle(&player_at(50.0), LANE, &ahead, HEIGHT));
        // Pipe entirely behind
        let behind = Obstacle::new(58.0, 200.0, 230.0, 70.0);
        assert!(!hits_obstacle(&player_at(50.0), LANE, &behind, HEIGHT));
        // One pixel of overlap
        let grazing = Obstacle::new(171.0, 200.0, 230.0, 70.0);
        assert!(hits_obstacle(&player_at(50.0), LANE, &grazing, HEIGHT));
    }

    #[test]
    fn test_first_collision_index() {
        let obstacles = vec![
            Obstacle::new(-50.0, 0.0, 700.0, 70.0),
            Obstacle::new(600.0, 0.0, 100.0, 70.0),
            pipe_over_lane(),
        ];
        assert_eq!(first_collision(&player_at(100.0), LANE, &obstacles, HEIGHT), Some(2));
        assert_eq!(first_collision(&player_at(300.0), LANE, &obstacles, HEIGHT), None);
    }

    #[test]
    fn test_aabb_edge_contact() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let c = Aabb::new(Vec2::splat(5.0), Vec2::splat(15.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }
}
