#![no_main]

//! Tick loop fuzzer.
//!
//! Drives arbitrary key sequences through the state machine on small maps:
//! 1. Build a level from a fuzzed seed and map size
//! 2. Feed one key (or none) per tick
//! 3. Move on to the next level or reset when a level resolves
//! 4. Check invariants after every tick
//!
//! Any panic or invariant violation is a bug.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tankgrid::config::Config;
use tankgrid::game::{ESC, Game, Outcome, Tick, check_invariants};

/// A fuzzer-generated key press.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzKey {
    None,
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
    Resume,
    Restart,
    Quit,
    Escape,
    Other(u8),
}

impl FuzzKey {
    fn to_key(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Up => Some('w'),
            Self::Down => Some('s'),
            Self::Left => Some('a'),
            Self::Right => Some('d'),
            Self::Fire => Some('j'),
            Self::Pause => Some(':'),
            Self::Resume => Some('c'),
            Self::Restart => Some('r'),
            Self::Quit => Some('q'),
            Self::Escape => Some(ESC),
            Self::Other(b) => Some(char::from(b)),
        }
    }
}

/// Structured input for tick fuzzing.
#[derive(Arbitrary, Debug)]
struct TickInput {
    /// RNG seed for the level.
    seed: u64,
    /// Extra map width above the minimum.
    width: u8,
    /// Extra map height above the minimum.
    height: u8,
    /// Which offer to take after a win.
    offer: u8,
    /// Keys, one per tick.
    keys: Vec<FuzzKey>,
}

fuzz_target!(|input: TickInput| {
    let config = Config {
        map_width: 16 + i32::from(input.width % 32),
        map_height: 10 + i32::from(input.height % 16),
        solid_clusters: 2,
        dirt_clusters: 2,
        spawn_attempts: 2_000,
        ..Config::default()
    };
    let Ok(mut game) = Game::seeded(config, input.seed) else {
        return;
    };

    for key in input.keys.into_iter().take(2_000) {
        let Ok(tick) = game.update(key.to_key()) else {
            return;
        };
        match tick {
            Tick::Quit => return,
            Tick::Resolved(Outcome::Won) => {
                let offers = game.roll_offers();
                let offer = offers[usize::from(input.offer) % offers.len()];
                if game.next_level(&offer).is_err() {
                    return;
                }
            }
            Tick::Resolved(Outcome::Lost) => {
                if game.reset().is_err() {
                    return;
                }
            }
            Tick::Continue | Tick::Restarted => {}
        }

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "Invariant violations: {violations:?}");
    }
});
