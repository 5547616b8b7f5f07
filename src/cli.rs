//! CLI command implementations for tankgrid.

pub(crate) mod menu;
pub(crate) mod play;
pub(crate) mod simulate;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;

use tankgrid::{Config, ConfigError, GameError, SpawnError};

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SpawnError> for CliError {
    fn from(e: SpawnError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load a config file, or the defaults when no path is given, and apply the
/// command-line fps override.
pub(crate) fn load_config(path: Option<&Path>, fps: Option<u32>) -> Result<Config, CliError> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(fps) = fps {
        config.fps = fps;
        config.validate()?;
    }
    Ok(config)
}

/// The given seed, or one derived from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(42)
    })
}
