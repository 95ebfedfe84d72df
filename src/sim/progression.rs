//! Score, combo and level progression
//!
//! The level is a pure function of the score, and every difficulty knob is a
//! pure function of the level, so progression never depends on history.

use serde::Serialize;

use crate::tuning::Tuning;

/// Level reached with a given score (1-based)
#[inline]
pub fn level_for_score(score: u32, points_per_level: u32) -> u32 {
    score / points_per_level.max(1) + 1
}

/// Obstacle scroll speed for a level
pub fn obstacle_speed_for_level(level: u32, tuning: &Tuning) -> f32 {
    tuning.base_speed * (1.0 + level.saturating_sub(1) as f32 * tuning.speed_step)
}

/// Inclusive range the next spawn interval is drawn from. Both bounds are at
/// least one tick and `min <= max` at every level.
pub fn spawn_interval_range(level: u32, tuning: &Tuning) -> (u32, u32) {
    let reduction = level.saturating_sub(1).saturating_mul(tuning.spawn_level_reduction);
    let min = tuning
        .spawn_min_base
        .saturating_sub(reduction)
        .max(tuning.spawn_min_floor)
        .max(1);
    let max = tuning
        .spawn_max_base
        .saturating_sub(reduction)
        .max(tuning.spawn_max_floor)
        .max(min);
    (min, max)
}

/// Height of newly spawned gaps for a level
pub fn gap_height_for_level(level: u32, tuning: &Tuning) -> f32 {
    (tuning.gap_height_base - level as f32 * tuning.gap_height_step).max(tuning.gap_height_min)
}

/// Result of scoring a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOutcome {
    pub points: u32,
    /// New level, if this pass crossed a level boundary
    pub level_up: Option<u32>,
}

/// Score state for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progression {
    pub score: u32,
    /// Consecutive passes, capped
    pub combo: u32,
    /// Ticks left before the combo lapses
    pub combo_timer: u32,
    pub level: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            score: 0,
            combo: 0,
            combo_timer: 0,
            level: 1,
        }
    }

    /// Score one obstacle pass
    pub fn record_pass(&mut self, tuning: &Tuning) -> PassOutcome {
        self.combo = (self.combo + 1).min(tuning.combo_cap);
        self.combo_timer = tuning.combo_window_ticks;
        let points = self.combo.max(1);
        self.score += points;

        let level = level_for_score(self.score, tuning.points_per_level);
        let level_up = (level > self.level).then_some(level);
        self.level = level;

        PassOutcome { points, level_up }
    }

    /// Count down the combo window; the combo lapses when it runs out
    pub fn tick_combo(&mut self) {
        if self.combo_timer > 0 {
            self.combo_timer -= 1;
            if self.combo_timer == 0 {
                self.combo = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_pass() {
        let tuning = Tuning::default();
        let mut p = Progression::new();
        let outcome = p.record_pass(&tuning);
        assert_eq!(outcome, PassOutcome { points: 1, level_up: None });
        assert_eq!((p.score, p.combo, p.level), (1, 1, 1));
        assert_eq!(p.combo_timer, 57);
    }

    #[test]
    fn test_combo_ramp_and_cap() {
        let tuning = Tuning::default();
        let mut p = Progression::new();
        let points: Vec<u32> = (0..20).map(|_| p.record_pass(&tuning).points).collect();
        assert_eq!(&points[..6], &[1, 2, 3, 4, 5, 5]);
        assert_eq!(p.combo, 5);
        // 1+2+3+4 then sixteen passes at 5
        assert_eq!(p.score, 10 + 16 * 5);
        assert_eq!(p.level, level_for_score(p.score, 20));
        assert_eq!(p.level, 5);
    }

    #[test]
    fn test_level_up_reported_once() {
        let tuning = Tuning::default();
        let mut p = Progression::new();
        let ups: Vec<u32> = (0..12).filter_map(|_| p.record_pass(&tuning).level_up).collect();
        // Scores: 1,3,6,10,15,20,25,30,35,40,45,50
        assert_eq!(ups, vec![2, 3]);
    }

    #[test]
    fn test_combo_lapses() {
        let tuning = Tuning::default();
        let mut p = Progression::new();
        p.record_pass(&tuning);
        p.record_pass(&tuning);
        for _ in 0..56 {
            p.tick_combo();
        }
        assert_eq!(p.combo, 2);
        p.tick_combo();
        assert_eq!(p.combo, 0);
        assert_eq!(p.record_pass(&tuning).points, 1);
    }

    #[test]
    fn test_difficulty_curves() {
        let tuning = Tuning::default();
        assert_eq!(obstacle_speed_for_level(1, &tuning), 5.5);
        assert!((obstacle_speed_for_level(6, &tuning) - 5.5 * 1.3).abs() < 1e-5);
        assert_eq!(spawn_interval_range(1, &tuning), (80, 160));
        assert_eq!(spawn_interval_range(3, &tuning), (64, 144));
        assert_eq!(spawn_interval_range(1000, &tuning), (35, 50));
        assert_eq!(gap_height_for_level(1, &tuning), 231.0);
        assert_eq!(gap_height_for_level(500, &tuning), 150.0);
    }

    #[test]
    fn test_spawn_range_positive_with_zero_floors() {
        let mut tuning = Tuning::default();
        tuning.spawn_min_floor = 0;
        tuning.spawn_max_floor = 0;
        let (min, max) = spawn_interval_range(u32::MAX, &tuning);
        assert!(min >= 1);
        assert!(max >= min);
    }

    proptest! {
        #[test]
        fn prop_level_tracks_score(passes in 0usize..400, idle in prop::collection::vec(0u32..80, 0..400)) {
            let tuning = Tuning::default();
            let mut p = Progression::new();
            for i in 0..passes {
                for _ in 0..idle.get(i).copied().unwrap_or(0) {
                    p.tick_combo();
                }
                let before = p.level;
                p.record_pass(&tuning);
                prop_assert_eq!(p.level, p.score / 20 + 1);
                prop_assert!(p.level >= before);
                prop_assert!(p.combo <= 5);
            }
        }
    }
}
