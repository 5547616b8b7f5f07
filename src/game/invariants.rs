//! Game invariants - sanity checks that detect bugs.
//!
//! These should never trigger in a correctly implemented game, whatever keys
//! are pressed. Fuzzing and property tests run them after every tick.

use rand::Rng;

use crate::game::{Game, Hitbox, Mode, is_collide};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants<R: Rng>(game: &Game<R>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |message: String| violations.push(InvariantViolation { message });
    let world = game.world();
    let bounds = world.bounds();

    let tanks: Vec<_> = world.tanks.iter().collect();
    for (i, tank) in tanks.iter().enumerate() {
        if tank.hp <= 0 {
            report(format!("Tank at {:?} is alive with HP {}", tank.pos, tank.hp));
        }
        if tank.attack_countdown > tank.attack_cooldown {
            report(format!(
                "Tank at {:?} has attack countdown {} > cooldown {}",
                tank.pos, tank.attack_countdown, tank.attack_cooldown
            ));
        }
        if tank.move_countdown > tank.move_cooldown {
            report(format!(
                "Tank at {:?} has move countdown {} > cooldown {}",
                tank.pos, tank.move_countdown, tank.move_cooldown
            ));
        }
        if !tank.dir.is_cardinal() {
            report(format!("Tank at {:?} faces {:?}", tank.pos, tank.dir));
        }
        if !bounds.contains_rect(&tank.hitbox()) {
            report(format!("Tank at {:?} sticks out of the map", tank.pos));
        }
        for other in &tanks[i + 1..] {
            if is_collide(*tank, *other) {
                report(format!("Tanks at {:?} and {:?} overlap", tank.pos, other.pos));
            }
        }
        if let Some(wall) = world.walls.iter().find(|w| is_collide(*w, *tank)) {
            report(format!("Tank at {:?} overlaps a wall at {:?}", tank.pos, wall.pos));
        }
    }

    let players = tanks.iter().filter(|t| t.is_player()).count();
    if players > 1 {
        report(format!("{players} player tanks are alive"));
    }
    if game.mode() == Mode::Running && players == 0 {
        report("Running with no player tank".to_string());
    }

    for wall in &world.walls {
        if !bounds.contains(wall.pos) {
            report(format!("Wall at {:?} is outside the map", wall.pos));
        }
    }
    for bullet in &world.bullets {
        if !bounds.contains(bullet.pos) {
            report(format!("Bullet at {:?} survived outside the map", bullet.pos));
        }
    }

    violations
}
