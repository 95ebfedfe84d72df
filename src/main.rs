//! Voice Runner entry point
//!
//! Opens the microphone, then runs the fixed-rate simulation loop. Drawing
//! and sound effects are left to collaborators that consume the state
//! snapshot and the event stream; this runner logs them.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossbeam_channel::{Receiver, TryRecvError};

use voice_runner::audio::{AmplitudeHandle, AmplitudeSampler};
use voice_runner::consts::*;
use voice_runner::persistence;
use voice_runner::platform::{self, Command};
use voice_runner::settings::{DEFAULT_SETTINGS_PATH, Settings};
use voice_runner::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Game instance holding all state
struct Game {
    state: GameState,
    amplitude: AmplitudeHandle,
    commands: Option<Receiver<Command>>,
    save_path: PathBuf,
    accumulator: f32,
    input: TickInput,
    last_phase: GamePhase,
    running: bool,
}

impl Game {
    fn new(state: GameState, amplitude: AmplitudeHandle, save_path: PathBuf) -> Self {
        let last_phase = state.phase;
        Self {
            state,
            amplitude,
            commands: None,
            save_path,
            accumulator: 0.0,
            input: TickInput::default(),
            last_phase,
            running: true,
        }
    }

    /// Fold pending control requests into the next tick's input
    fn poll_commands(&mut self) {
        let Some(commands) = &self.commands else { return };
        loop {
            match commands.try_recv() {
                Ok(Command::Quit) => self.running = false,
                Ok(cmd) => cmd.apply(&mut self.input),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // stdin closed, voice control keeps working
                    self.commands = None;
                    break;
                }
            }
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        self.accumulator += dt.min(0.25);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input.amplitude = self.amplitude.load();
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = TickInput::default();
            self.handle_events();
            self.snapshot();
        }
        if substeps == MAX_SUBSTEPS {
            // Too far behind: drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }

        let current_phase = self.state.phase;
        if current_phase != self.last_phase {
            log::info!("{:?} -> {:?}", self.last_phase, current_phase);
            self.last_phase = current_phase;
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match &event {
                GameEvent::SaveRequested => persistence::save_state(&self.state, &self.save_path),
                GameEvent::Jump { .. } | GameEvent::Bounce { .. } => log::trace!("{event:?}"),
                GameEvent::GameOver { score, high_score } => {
                    log::info!("Game over: score {score}, best {high_score}")
                }
                _ => log::debug!("{event:?}"),
            }
        }
    }

    /// Once a second, dump the full state for whoever is watching at trace level
    fn snapshot(&self) {
        if self.state.time_ticks % TICK_RATE as u64 != 0 || !log::log_enabled!(log::Level::Trace) {
            return;
        }
        match serde_json::to_string(&self.state) {
            Ok(json) => log::trace!("{json}"),
            Err(e) => log::warn!("Snapshot failed: {e}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice Runner starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings = Settings::load(&settings_path);

    // No microphone, no game
    let sampler = AmplitudeSampler::start(settings.input_device.as_deref())
        .inspect_err(|e| log::error!("Microphone unavailable: {e}"))
        .context("a microphone is required to play")?;
    log::info!("Listening on '{}' at {} Hz", sampler.device_name(), sampler.sample_rate());

    let seed = settings.seed.unwrap_or_else(rand::random);
    let mut state = GameState::new(seed, settings.tuning.clone());
    state.autopilot = settings.autopilot;
    persistence::load_into(&settings.save_path, &mut state);
    log::info!("Seed {seed}");

    let mut game = Game::new(state, sampler.handle(), settings.save_path.clone());
    match platform::spawn_console_input() {
        Ok(rx) => game.commands = Some(rx),
        Err(e) => log::warn!("Console input unavailable: {e}"),
    }
    log::info!("Commands: [enter]/s start, c calibrate, b back, i autopilot, +/- speed, q quit");
    log::info!("Or make a sustained sound to start");

    let frame = Duration::from_secs_f32(SIM_DT);
    let mut last_time = Instant::now();
    while game.running {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_time).as_secs_f32();
        last_time = frame_start;

        game.poll_commands();
        game.update(dt);

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }

    persistence::save_state(&game.state, &game.save_path);
    log::info!("Goodbye (high score {})", game.state.high_score);
    Ok(())
}
