//! wrapsnake - Snake on a wrap-around terminal grid
//!
//! Arrow keys steer, Ctrl+C quits. Leaving one edge of the screen re-enters
//! from the opposite one; the only way to die is to run into yourself.

mod config;
mod error;
mod food;
mod game;
mod grid;
mod input;
mod snake;
mod term;

use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::game::{Exit, Game};
use crate::input::{InputHandler, Steering};
use crate::term::{Surface, TermManager};

pub type TermInt = u16;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line options
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    tick_ms: Option<u64>,
    seed: Option<u64>,
}

fn print_help() {
    eprintln!("wrapsnake {} - Snake on a wrap-around terminal grid", VERSION);
    eprintln!();
    eprintln!("Usage: wrapsnake [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --tick <MS>       Delay between frames (default 40)");
    eprintln!("  -c, --config <PATH>   Config file (default ~/.wrapsnake/config.toml)");
    eprintln!("      --seed <N>        Seed for food placement");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Arrow keys            Steer");
    eprintln!("  y / n                 Answer the play-again prompt");
    eprintln!("  Ctrl+C                Quit");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                eprintln!("wrapsnake {}", VERSION);
                std::process::exit(0);
            }
            "-t" | "--tick" => {
                let value = iter.next().ok_or("Missing tick argument")?;
                let ms = value.parse().map_err(|_| format!("Invalid tick: {}", value))?;
                parsed.tick_ms = Some(ms);
            }
            "-c" | "--config" => {
                let value = iter.next().ok_or("Missing config path")?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--seed" => {
                let value = iter.next().ok_or("Missing seed argument")?;
                let seed = value.parse().map_err(|_| format!("Invalid seed: {}", value))?;
                parsed.seed = Some(seed);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    Ok(parsed)
}

/// Log to a file; stdout belongs to the game screen.
fn init_logging() {
    let Some(dir) = Config::get_config_dir() else {
        return;
    };
    let _ = std::fs::create_dir_all(&dir);

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("wrapsnake.log"));

    if let Ok(file) = log_file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("wrapsnake {} starting", VERSION);

    let mut config = Config::load(args.config.as_deref());
    if let Some(ms) = args.tick_ms {
        config.tick_ms = ms;
    }

    if let Err(e) = run(&config, args.seed) {
        error!("fatal: {:#}", e);
        return Err(e);
    }

    info!("wrapsnake exiting");
    Ok(())
}

fn run(config: &Config, seed: Option<u64>) -> anyhow::Result<()> {
    let theme = config.theme().context("Invalid color scheme")?;
    let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut term = TermManager::new().context("Couldn't create screen")?;
    term.setup().context("Couldn't init screen")?;

    let steering = Steering::new();
    let (tx, rx) = mpsc::channel();
    InputHandler::new(steering.clone(), tx)
        .spawn()
        .context("Couldn't start input handler")?;

    let mut game = Game::new(term, rng, steering, theme, config.tick())?;
    let exit = game.run(&rx);
    game.surface_mut().fini().context("Couldn't restore terminal")?;

    match exit? {
        Exit::Interrupted => info!("interrupted"),
        Exit::Declined { score } => info!(score, "player declined another round"),
    }
    Ok(())
}
