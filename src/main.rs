//! Mighty Action headless driver
//!
//! Runs a session without a window: a scripted autopilot runs right and
//! jumps on a fixed cadence until the run ends. Useful for checking a seed
//! or a tuning file.
//!
//! Usage: `mighty-action [SEED] [TUNING_JSON]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mighty_action::consts::TICKS_PER_SECOND;
use mighty_action::sim::{GameEvent, TickInput};
use mighty_action::{Session, Tuning};

/// Give up after ten minutes of game time
const MAX_TICKS: u64 = 10 * 60 * TICKS_PER_SECOND as u64;

/// Press jump for this many ticks out of every cycle
const JUMP_CYCLE: u64 = 45;
const JUMP_HOLD: u64 = 8;

#[derive(Parser)]
#[command(name = "mighty-action")]
#[command(about = "Run a Mighty Action level headless with a scripted autopilot")]
struct Cli {
    /// Level seed
    seed: Option<u64>,
    /// Tuning JSON; missing fields keep their defaults
    tuning: Option<PathBuf>,
}

fn autopilot(tick: u64) -> TickInput {
    let phase = tick % JUMP_CYCLE;
    TickInput {
        left: false,
        right: true,
        // Two presses per cycle: the jump and the air jump
        jump: phase < JUMP_HOLD || (phase >= 2 * JUMP_HOLD && phase < 3 * JUMP_HOLD),
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tuning file {}", path.display()))?;
    Ok(Tuning::load_or_default(&json))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Mighty Action (headless) starting...");

    let seed = cli.seed.unwrap_or(0x5EED);
    let tuning = load_tuning(cli.tuning.as_ref())?;

    let mut session = Session::new(seed, tuning).context("Invalid tuning")?;
    let mut ticks = 0u64;

    while !session.is_terminal() && ticks < MAX_TICKS {
        let events = session.tick(&autopilot(ticks));
        for event in &events {
            match event {
                GameEvent::Jumped => log::trace!("tick {}: {:?}", ticks, event),
                _ => log::info!("tick {}: {:?}", ticks, event),
            }
        }
        ticks += 1;
    }

    if let Some(hold) = session.phase().end_sequence_ticks() {
        log::info!("{:?}; presentation would hold the banner for {} ticks", session.phase(), hold);
    } else {
        log::info!("Stopped after {} ticks without finishing", ticks);
    }

    let json = serde_json::to_string_pretty(&session.renderable_state())
        .context("Failed to serialize final state")?;
    println!("{json}");
    Ok(())
}
