// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! tankgrid: a real-time grid tank battle for the terminal.
//!
//! Player and enemy tanks move, shoot, and destroy each other and breakable
//! terrain on a bounded map. Each tick runs a fixed sequence (cooldowns,
//! input, enemy decisions, projectiles, movement, win/lose check) and paints
//! a character frame that is flushed as a diff against the previous one.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Terminal loop (term) + CLI        │
//! ├─────────────────────────────────────┤
//! │   Game state machine + buffs        │
//! ├──────────────────┬──────────────────┤
//! │   World model    │   Render buffer  │
//! ├──────────────────┴──────────────────┤
//! │   Arena + geometry                  │
//! └─────────────────────────────────────┘
//! ```

pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod render;
pub mod term;

pub use arena::{Arena, Handle};
pub use config::Config;
pub use error::{ConfigError, GameError, SpawnError};

// Re-export key game types at crate root for convenience
pub use game::{Game, Mode, Outcome, Side, Tick, World};
pub use geometry::{Rect, Vector};
pub use render::RenderBuffer;
