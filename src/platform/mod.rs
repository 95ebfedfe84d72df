//! Platform abstraction layer
//!
//! Maps whatever input device is available onto abstract control requests.
//! The native build reads single-letter commands from stdin on a helper
//! thread; the game loop drains them without blocking.

use std::io::{self, BufRead};
use std::thread;

use crossbeam_channel::{Receiver, unbounded};

use crate::sim::TickInput;

/// Abstract control request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Back,
    Calibrate,
    ToggleAutopilot,
    SpeedUp,
    SpeedDown,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "s" | "start" => Some(Command::Start),
            "b" | "back" | "esc" => Some(Command::Back),
            "c" | "calibrate" => Some(Command::Calibrate),
            "i" | "ai" | "autopilot" => Some(Command::ToggleAutopilot),
            "+" | "=" | "faster" => Some(Command::SpeedUp),
            "-" | "slower" => Some(Command::SpeedDown),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }

    /// Fold the request into the next tick's input. `Quit` is handled by the runner.
    pub fn apply(self, input: &mut TickInput) {
        match self {
            Command::Start => input.start = true,
            Command::Back => input.back = true,
            Command::Calibrate => input.calibrate = true,
            Command::ToggleAutopilot => input.toggle_autopilot = true,
            Command::SpeedUp => input.speed_up = true,
            Command::SpeedDown => input.speed_down = true,
            Command::Quit => {}
        }
    }
}

/// Spawn the stdin reader. The channel disconnects when stdin closes.
pub fn spawn_console_input() -> io::Result<Receiver<Command>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("console-input".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match Command::parse(&line) {
                    Some(cmd) => {
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    None => log::warn!("Unknown command '{}' (s/b/c/i/+/-/q)", line.trim()),
                }
            }
            log::debug!("Console input closed");
        })?;
    Ok(rx)
}
