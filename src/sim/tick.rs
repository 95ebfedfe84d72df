//! Fixed timestep simulation tick
//!
//! Session state machine:
//!
//! ```text
//! Menu --start (calibrated)--> Playing
//! Menu --start / calibrate--> CalibratingSilence --> CalibratingShout --> Playing
//! Playing --collision--> Exploding --timer--> GameOver --start--> Playing
//! any non-Menu state --back--> Menu
//! ```
//!
//! Requests that make no sense in the current state are ignored.

use super::calibration::{CalibrationOutcome, CalibrationPhase, CalibrationSession, CalibrationStep};
use super::collision::first_collision;
use super::control::{ControlContext, ControlMode};
use super::physics::{self, LevelPhysics};
use super::progression::obstacle_speed_for_level;
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest microphone RMS
    pub amplitude: f32,
    /// Start / confirm / restart
    pub start: bool,
    /// Back to the menu
    pub back: bool,
    /// Run calibration (menu only)
    pub calibrate: bool,
    /// Toggle the autonomous controller (playing only)
    pub toggle_autopilot: bool,
    /// Manual obstacle speed adjustment (playing only)
    pub speed_up: bool,
    pub speed_down: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if input.back && state.phase != GamePhase::Menu {
        return_to_menu(state);
        return;
    }

    // The start meter only charges on screens that listen for it
    if !matches!(state.phase, GamePhase::Menu | GamePhase::GameOver) {
        state.voice_trigger.reset();
    }

    match state.phase {
        GamePhase::Menu => tick_menu(state, input),
        GamePhase::CalibratingSilence | GamePhase::CalibratingShout => {
            tick_calibration(state, input.amplitude)
        }
        GamePhase::Playing => tick_playing(state, input),
        GamePhase::Exploding => tick_exploding(state),
        GamePhase::GameOver => {
            let voice_start = state.voice_trigger.update(input.amplitude, &state.tuning);
            if input.start || voice_start {
                state.reset_session();
            }
        }
    }
}

fn tick_menu(state: &mut GameState, input: &TickInput) {
    let voice_start = state.voice_trigger.update(input.amplitude, &state.tuning);

    if input.calibrate {
        begin_calibration(state);
    } else if input.start || voice_start {
        if state.calibrated {
            state.reset_session();
        } else {
            begin_calibration(state);
        }
    }
}

fn begin_calibration(state: &mut GameState) {
    state.calibration = Some(CalibrationSession::new());
    state.phase = GamePhase::CalibratingSilence;
    state.voice_trigger.reset();
    state.emit(GameEvent::CalibrationPhase(CalibrationPhase::Silence));
    log::info!("Calibration: stay quiet");
}

fn tick_calibration(state: &mut GameState, amplitude: f32) {
    if state.calibration.is_none() {
        log::warn!("Calibration phase without a session, restarting calibration");
        begin_calibration(state);
        return;
    }
    let duration = state.tuning.calibration_ticks;
    let Some(session) = state.calibration.as_mut() else {
        return;
    };

    match session.sample(amplitude, duration) {
        CalibrationStep::Continue => {}
        CalibrationStep::ShoutBegins => {
            state.phase = GamePhase::CalibratingShout;
            state.emit(GameEvent::CalibrationPhase(CalibrationPhase::Shout));
            log::info!("Calibration: shout!");
        }
        CalibrationStep::Finished => {
            let outcome = session.finish(state.thresholds, &state.tuning);
            state.calibration = None;
            match outcome {
                CalibrationOutcome::Accepted(thresholds) => {
                    log::info!(
                        "Calibration accepted: silence={:.4} shout={:.4}",
                        thresholds.silence(),
                        thresholds.shout()
                    );
                    state.thresholds = thresholds;
                    state.calibrated = true;
                    state.emit(GameEvent::CalibrationAccepted(thresholds));
                    state.emit(GameEvent::SaveRequested);
                }
                CalibrationOutcome::Rejected { silence, shout } => {
                    log::warn!(
                        "Calibration rejected (silence={silence:.4} >= shout={shout:.4}), keeping previous thresholds"
                    );
                    state.emit(GameEvent::CalibrationRejected { silence, shout });
                }
            }
            state.reset_session();
        }
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput) {
    if input.toggle_autopilot {
        state.autopilot = !state.autopilot;
        state.emit(GameEvent::AutopilotToggled(state.autopilot));
        log::info!("Autopilot {}", if state.autopilot { "ON" } else { "OFF" });
    }
    if input.speed_up || input.speed_down {
        adjust_speed(state, input.speed_up);
    }

    let tuning = &state.tuning;
    let level = state.progression.level;
    let params = LevelPhysics::for_level(level, tuning);

    // --- PLAYER ---
    let ctx = ControlContext {
        amplitude: input.amplitude,
        thresholds: &state.thresholds,
        jump_power: params.jump_power,
        player: &state.player,
        obstacles: &state.obstacles,
        tuning,
    };
    let impulse = ControlMode::from_flag(state.autopilot).impulse(&ctx);
    let outcome = physics::step(&mut state.player, &params, impulse, tuning.screen_height);

    if let Some(velocity) = outcome.jump {
        state.events.push(GameEvent::Jump { velocity });
    }
    if let Some(edge) = outcome.bounce {
        state.events.push(GameEvent::Bounce { edge });
    }

    // --- SPAWN ---
    if state.spawn_timer.tick() {
        let obstacle = spawner::spawn_obstacle(&mut state.rng, level, tuning);
        log::debug!("Spawned obstacle gap_top={:.0} gap_height={:.0}", obstacle.gap_top, obstacle.gap_height);
        state.events.push(GameEvent::ObstacleSpawned {
            gap_top: obstacle.gap_top,
            gap_height: obstacle.gap_height,
        });
        state.obstacles.push(obstacle);
        state.spawn_timer.interval = spawner::next_interval(&mut state.rng, level, tuning);
    }

    // --- SCROLL & SCORE ---
    spawner::scroll(&mut state.obstacles, state.obstacle_speed);

    let player_x = state.tuning.player_x;
    let mut passes = 0;
    for obstacle in &mut state.obstacles {
        if spawner::try_pass(obstacle, player_x) {
            passes += 1;
        }
    }
    for _ in 0..passes {
        score_pass(state);
    }

    spawner::despawn_offscreen(&mut state.obstacles);
    state.progression.tick_combo();

    // --- COLLISION ---
    if first_collision(
        &state.player,
        state.tuning.player_x,
        &state.obstacles,
        state.tuning.screen_height,
    )
    .is_some()
    {
        begin_explosion(state);
    }
}

fn adjust_speed(state: &mut GameState, faster: bool) {
    let tuning = &state.tuning;
    let delta = if faster { tuning.speed_adjust } else { -tuning.speed_adjust };
    state.obstacle_speed = (state.obstacle_speed + delta).clamp(tuning.speed_min, tuning.speed_max);
    state.emit(GameEvent::SpeedChanged(state.obstacle_speed));
    log::debug!("Obstacle speed: {:.1}", state.obstacle_speed);
}

fn score_pass(state: &mut GameState) {
    let outcome = state.progression.record_pass(&state.tuning);
    state.emit(GameEvent::Pass {
        points: outcome.points,
        combo: state.progression.combo,
    });
    log::debug!("Pass +{} (score {})", outcome.points, state.progression.score);

    if let Some(level) = outcome.level_up {
        state.obstacle_speed = obstacle_speed_for_level(level, &state.tuning);
        state.emit(GameEvent::LevelUp {
            level,
            obstacle_speed: state.obstacle_speed,
        });
        log::info!("Level {level} (speed {:.2})", state.obstacle_speed);
    }

    update_high_score(state);
}

/// Keep the high score in step with the run. The first time a run beats it,
/// announce it and write it out straight away.
fn update_high_score(state: &mut GameState) {
    let score = state.progression.score;
    if score <= state.high_score {
        return;
    }
    state.high_score = score;
    if !state.new_record {
        state.new_record = true;
        state.emit(GameEvent::NewHighScore { score });
        state.emit(GameEvent::SaveRequested);
        log::info!("New high score: {score}");
    }
}

fn begin_explosion(state: &mut GameState) {
    let score = state.progression.score;
    state.phase = GamePhase::Exploding;
    state.explode_ticks = state.tuning.explosion_ticks;
    state.emit(GameEvent::Collision { score });
    log::info!("Crashed with score {score}");

    let record_run = state.new_record;
    update_high_score(state);
    if record_run {
        // Final value of a record run
        state.emit(GameEvent::SaveRequested);
    }
}

fn tick_exploding(state: &mut GameState) {
    state.explode_ticks = state.explode_ticks.saturating_sub(1);
    if state.explode_ticks == 0 {
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver {
            score: state.progression.score,
            high_score: state.high_score,
        });
    }
}

fn return_to_menu(state: &mut GameState) {
    if state.calibration.take().is_some() {
        log::info!("Calibration abandoned");
    }
    if state.phase == GamePhase::Playing {
        update_high_score(state);
    }
    state.phase = GamePhase::Menu;
    state.explode_ticks = 0;
    state.voice_trigger.reset();
    state.emit(GameEvent::ReturnedToMenu);
    state.emit(GameEvent::SaveRequested);
}
