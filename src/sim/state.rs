//! Game state and core simulation types
//!
//! Everything the runner draws or persists is reachable from `GameState`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::calibration::{CalibrationPhase, CalibrationSession, CalibrationThresholds};
use super::control::VoiceTrigger;
use super::progression::Progression;
use super::spawner::SpawnTimer;
use crate::tuning::Tuning;

/// Top-level session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start or calibrate
    Menu,
    /// Measuring ambient noise
    CalibratingSilence,
    /// Measuring a loud shout
    CalibratingShout,
    /// Active gameplay
    Playing,
    /// Death animation running
    Exploding,
    /// Run ended
    GameOver,
}

/// Playfield edge the player was clamped against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
}

/// The player's body. Horizontal position is fixed at the lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Vertical center (screen coordinates, y grows downward)
    pub y: f32,
    /// Vertical velocity in pixels per tick (negative = up)
    pub velocity: f32,
    pub radius: f32,
}

impl PlayerBody {
    pub fn new(y: f32, radius: f32) -> Self {
        Self {
            y,
            velocity: 0.0,
            radius,
        }
    }

    /// Lowest and highest legal values of `y`
    pub fn y_bounds(&self, screen_height: f32) -> (f32, f32) {
        (self.radius, (screen_height - self.radius).max(self.radius))
    }
}

/// A pipe pair with a passable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    pub gap_top: f32,
    pub gap_height: f32,
    pub width: f32,
    /// Set once when the obstacle center crosses the player lane
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, gap_height: f32, width: f32) -> Self {
        Self {
            x,
            gap_top,
            gap_height,
            width,
            passed: false,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    /// Fully past the left edge of the screen
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Discrete things that happened during a tick, for sound/visual collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// A fresh run began
    SessionStarted,
    /// A flap was applied (velocity is the new, negative, vertical speed)
    Jump { velocity: f32 },
    /// Player was clamped against a screen edge
    Bounce { edge: Edge },
    ObstacleSpawned { gap_top: f32, gap_height: f32 },
    Pass { points: u32, combo: u32 },
    LevelUp { level: u32, obstacle_speed: f32 },
    Collision { score: u32 },
    NewHighScore { score: u32 },
    GameOver { score: u32, high_score: u32 },
    /// A calibration phase started
    CalibrationPhase(CalibrationPhase),
    CalibrationAccepted(CalibrationThresholds),
    /// Measured thresholds were degenerate and discarded
    CalibrationRejected { silence: f32, shout: f32 },
    AutopilotToggled(bool),
    SpeedChanged(f32),
    ReturnedToMenu,
    /// Thresholds or high score changed and should be written out
    SaveRequested,
}

/// Complete game state, owned by the main loop
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: PlayerBody,
    /// Live obstacles in spawn order (oldest, leftmost first)
    pub obstacles: Vec<Obstacle>,
    pub spawn_timer: SpawnTimer,
    /// Current scroll speed (pixels per tick)
    pub obstacle_speed: f32,
    pub progression: Progression,
    pub high_score: u32,
    /// This run has already beaten the stored high score
    pub new_record: bool,
    pub thresholds: CalibrationThresholds,
    /// Thresholds came from a finished calibration or a valid save file
    pub calibrated: bool,
    /// In-progress calibration (only in the calibrating phases)
    pub calibration: Option<CalibrationSession>,
    /// Autonomous controller replaces voice control
    pub autopilot: bool,
    pub voice_trigger: VoiceTrigger,
    /// Ticks left in the death animation
    pub explode_ticks: u32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed. Starts at the menu.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let thresholds = CalibrationThresholds::new(tuning.default_silence, tuning.default_shout)
            .unwrap_or_default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Menu,
            player: PlayerBody::new(tuning.screen_height / 2.0, tuning.player_radius),
            obstacles: Vec::new(),
            spawn_timer: SpawnTimer::new(tuning.initial_spawn_interval),
            obstacle_speed: tuning.base_speed,
            progression: Progression::new(),
            high_score: 0,
            new_record: false,
            thresholds,
            calibrated: false,
            calibration: None,
            autopilot: false,
            voice_trigger: VoiceTrigger::default(),
            explode_ticks: 0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Clear the playfield and enter `Playing` with a fresh run
    pub fn reset_session(&mut self) {
        self.player = PlayerBody::new(self.tuning.screen_height / 2.0, self.tuning.player_radius);
        self.obstacles.clear();
        self.spawn_timer = SpawnTimer::new(self.tuning.initial_spawn_interval);
        self.obstacle_speed = self.tuning.base_speed;
        self.progression = Progression::new();
        self.new_record = false;
        self.calibration = None;
        self.voice_trigger.reset();
        self.explode_ticks = 0;
        self.phase = GamePhase::Playing;
        self.emit(GameEvent::SessionStarted);
        log::info!("Session started (autopilot {})", if self.autopilot { "on" } else { "off" });
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
