//! Simulate command implementation - one level with no player input.

use super::output::{SimulationReport, format_text};
use super::{CliError, OutputFormat, load_config, resolve_seed};
use std::path::PathBuf;
use tankgrid::game::{Game, Tick};

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the config is rejected or the level cannot be laid
/// out.
pub(crate) fn execute(
    seed: Option<u64>,
    config: Option<PathBuf>,
    ticks: u64,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref(), None)?;
    let seed = resolve_seed(seed);
    let mut game = Game::seeded(config, seed)?;

    run(&mut game, ticks)?;
    let report = SimulationReport::from_game(seed, &game);

    match format {
        OutputFormat::Text => print!("{}", format_text(&report)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::new(format!("Failed to serialize: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Resume, then tick with no keys until the level resolves or `limit` ticks
/// have run.
pub(super) fn run(game: &mut Game, limit: u64) -> Result<(), CliError> {
    let mut key = Some('c');
    for _ in 0..limit {
        if let Tick::Resolved(_) = game.update(key.take())? {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tankgrid::{Config, Mode};

    #[test]
    fn test_run_respects_tick_limit() {
        let mut game = Game::seeded(Config::default(), 1).unwrap();
        run(&mut game, 3).unwrap();
        assert_eq!(game.ticks(), 3);
        assert_eq!(game.mode(), Mode::Running);
    }

    #[test]
    fn test_run_stops_at_resolution() {
        let mut game = Game::seeded(Config::default(), 2).unwrap();
        game.world_mut().tanks.clear();
        run(&mut game, 100).unwrap();
        assert!(matches!(game.mode(), Mode::Resolved(_)));
        assert_eq!(game.ticks(), 1);
    }
}
