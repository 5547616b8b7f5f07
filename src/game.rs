//! Game layer for tankgrid.
//!
//! Implements the battle rules on top of the arena and geometry:
//! - Units, projectiles, and obstacles with their hitboxes
//! - The world model with movement and impact resolution
//! - The enemy decision heuristic
//! - The per-tick state machine
//! - Buffs between levels

mod ai;
mod buff;
mod entity;
mod invariants;
mod random;
mod state;
mod world;

pub use ai::{decide_attack, decide_move, heading};
pub use buff::{Buff, BuffAmount, BuffKind, BuffOffer, Roster, Visibility};
pub use entity::{Archetype, Bullet, Hitbox, Side, Tank, Wall, is_collide};
pub use invariants::{InvariantViolation, check_invariants};
pub use state::{Command, ESC, Game, Mode, Outcome, Tick};
pub use world::{Impact, Terrain, World};
