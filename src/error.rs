//! Error types for configuration, level setup, and the terminal front end.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON for a [`Config`](crate::config::Config).
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// A field holds a value the game cannot run with.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Offending field, dotted for nested values.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// No empty spot could be found for a new unit or obstacle cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Every sampled position was occupied.
    #[error("no empty 3x3 area found after {attempts} attempts; the map is too crowded")]
    Exhausted {
        /// Number of positions sampled.
        attempts: u32,
    },
}

/// Any failure that ends a game session.
#[derive(Debug, Error)]
pub enum GameError {
    /// Terminal or file I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A level could not be laid out.
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_display() {
        let err = SpawnError::Exhausted { attempts: 12 };
        assert!(err.to_string().contains("12 attempts"));
    }

    #[test]
    fn test_game_error_is_transparent() {
        let err = GameError::from(ConfigError::Invalid {
            field: "fps",
            reason: "must be positive".to_string(),
        });
        assert_eq!(err.to_string(), "invalid `fps`: must be positive");
    }
}
