use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event;
use snake_engine::config::EngineConfig;
use snake_engine::engine::{Collaborators, Engine};
use snake_engine::input::{self, GameInput};
use snake_engine::renderer;
use snake_engine::terminal_runtime::TerminalSession;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Redraw cadence; simulation speed is set by the engine's tick interval.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about = "Retro Snake in the terminal")]
struct Cli {
    /// JSON config file (defaults to <config dir>/snake/config.json when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board side length in cells.
    #[arg(long)]
    size: Option<u16>,

    /// Milliseconds between snake moves.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Chance in [0, 1] that new food is a bonus.
    #[arg(long = "bonus-chance")]
    bonus_chance: Option<f64>,

    /// Speed up as the score rises.
    #[arg(long = "speed-up")]
    speed_up: bool,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (level from RUST_LOG, default info).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = resolve_config(&cli)?;
    let collaborators = Collaborators::system();
    let mut engine = match cli.seed {
        Some(seed) => Engine::with_seed(config, collaborators, seed)?,
        None => Engine::new(config, collaborators)?,
    };

    let mut session = TerminalSession::enter()?;
    let result = run(&mut session, &mut engine);
    engine.stop();
    drop(session);

    info!("exiting");
    Ok(result?)
}

fn run(session: &mut TerminalSession, engine: &mut Engine) -> io::Result<()> {
    loop {
        let snapshot = engine.snapshot();
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &snapshot))?;

        if event::poll(FRAME_INTERVAL)? {
            if let Some(game_input) = input::map_event(&event::read()?) {
                if game_input == GameInput::Quit {
                    return Ok(());
                }
                engine.apply_input(game_input);
            }
        }

        engine.pump();
    }
}

/// Merges the config file with command-line overrides and validates the result.
fn resolve_config(cli: &Cli) -> Result<EngineConfig, Box<dyn Error>> {
    let mut config = EngineConfig::load(cli.config.as_deref())?;

    if let Some(size) = cli.size {
        config.grid_size = size;
        config.initial_length = config.initial_length.min(config.max_initial_length());
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(chance) = cli.bonus_chance {
        config.bonus_probability = chance;
    }
    if cli.speed_up {
        config.speed_up = true;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
