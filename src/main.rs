//! tankgrid CLI - play the game in the terminal or run it headless.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// tankgrid - a real-time grid tank battle for the terminal
#[derive(Parser, Debug)]
#[command(name = "tankgrid")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Write logs to this file (filtered by RUST_LOG, default: info)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON config file (default: built-in settings)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Frames per second, overriding the config
        #[arg(long)]
        fps: Option<u32>,
    },

    /// Run one level without input and report how it ended
    Simulate {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON config file (default: built-in settings)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum ticks (default: 10000)
        #[arg(short, long, default_value = "10000")]
        ticks: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Check a JSON config file
    Validate {
        /// Config file to validate
        #[arg(required = true)]
        config: PathBuf,
    },
}

fn init_logging(path: &Path) -> Result<(), cli::CliError> {
    let file = File::create(path)
        .map_err(|e| cli::CliError::new(format!("Failed to create {}: {e}", path.display())))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| cli::CliError::new(e.to_string()))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = args.log_file.as_deref().map_or(Ok(()), init_logging).and_then(|()| match args.command {
        Commands::Play { seed, config, fps } => cli::play::execute(seed, config, fps),

        Commands::Simulate {
            seed,
            config,
            ticks,
            format,
        } => cli::simulate::execute(seed, config, ticks, format),

        Commands::Validate { config } => cli::validate::execute(config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
