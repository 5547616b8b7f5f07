//! Play command implementation - the interactive game.

use super::menu::{self, Choice};
use super::{CliError, load_config, resolve_seed};
use std::io::stdout;
use std::path::PathBuf;
use tankgrid::game::{Game, Outcome, Tick};
use tankgrid::term::{CrosstermKeys, FramePacer, TerminalSession, drive};
use tracing::info;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is rejected, the terminal fails, or a
/// level cannot be laid out.
pub(crate) fn execute(seed: Option<u64>, config: Option<PathBuf>, fps: Option<u32>) -> Result<(), CliError> {
    let config = load_config(config.as_deref(), fps)?;
    let seed = resolve_seed(seed);
    info!(seed, "starting game");

    let mut game = Game::seeded(config, seed)?;
    let mut pacer = FramePacer::new(game.config().fps);
    let mut keys = CrosstermKeys;

    let _session = TerminalSession::enter()?;
    let mut out = stdout();

    loop {
        match drive(&mut game, &mut keys, &mut out, &mut pacer)? {
            Tick::Resolved(Outcome::Lost) => match menu::result_screen(Outcome::Lost, game.level())? {
                Choice::Pick(()) => game.reset()?,
                Choice::Quit => break,
            },
            Tick::Resolved(Outcome::Won) => {
                if menu::result_screen(Outcome::Won, game.level())? == Choice::Quit {
                    break;
                }
                let offers = game.roll_offers();
                match menu::buff_screen(&offers, game.level() + 1)? {
                    Choice::Pick(index) => game.next_level(&offers[index])?,
                    Choice::Quit => break,
                }
            }
            Tick::Quit => break,
            Tick::Continue | Tick::Restarted => {}
        }
    }

    info!(level = game.level(), ticks = game.ticks(), "game closed");
    Ok(())
}
