//! Units, projectiles, obstacles, and the archetypes units are built from.

use crate::config::SideStats;
use crate::geometry::{Rect, Vector};
use crate::render::Rgb;

/// Which team an entity fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The human-controlled side.
    Player,
    /// The computer-controlled side.
    Enemy,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Anything that occupies cells on the map.
pub trait Hitbox {
    /// The cells this entity covers.
    fn hitbox(&self) -> Rect;
}

impl Hitbox for Rect {
    fn hitbox(&self) -> Rect {
        *self
    }
}

/// Whether two entities share at least one cell.
#[must_use]
pub fn is_collide(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    a.hitbox().intersects(&b.hitbox())
}

/// A mobile unit with a 3×3 footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tank {
    /// Centre cell.
    pub pos: Vector,
    /// Facing, always a cardinal step.
    pub dir: Vector,
    /// Owning side.
    pub side: Side,
    /// Ticks between two shots.
    pub attack_cooldown: u32,
    /// Ticks left until the next shot is allowed.
    pub attack_countdown: u32,
    /// Ticks between two steps.
    pub move_cooldown: u32,
    /// Ticks left until the next step is allowed.
    pub move_countdown: u32,
    /// Remaining hit points.
    pub hp: i32,
    /// Damage dealt per projectile.
    pub attack_power: i32,
}

impl Tank {
    /// A fresh unit from `archetype`, facing up with both countdowns at zero.
    #[must_use]
    pub const fn spawn(archetype: &Archetype, pos: Vector) -> Self {
        Self {
            pos,
            dir: Vector::UP,
            side: archetype.side,
            attack_cooldown: archetype.attack_cooldown,
            attack_countdown: 0,
            move_cooldown: archetype.move_cooldown,
            move_countdown: 0,
            hp: archetype.hp,
            attack_power: archetype.attack_power,
        }
    }

    /// Whether this unit belongs to the player.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.side == Side::Player
    }

    /// Count both countdowns down by one tick, stopping at zero.
    pub const fn cool_down(&mut self) {
        self.attack_countdown = self.attack_countdown.saturating_sub(1);
        self.move_countdown = self.move_countdown.saturating_sub(1);
    }

    /// Whether a step was scheduled this tick.
    #[must_use]
    pub const fn wants_to_move(&self) -> bool {
        self.move_countdown == self.move_cooldown
    }

    /// The footprint after one step in the facing direction.
    #[must_use]
    pub fn next_hitbox(&self) -> Rect {
        self.hitbox().shifted(self.dir)
    }

    /// The cell a new projectile appears in: the gun, one step ahead.
    #[must_use]
    pub fn muzzle(&self) -> Vector {
        self.pos + self.dir
    }
}

impl Hitbox for Tank {
    fn hitbox(&self) -> Rect {
        Rect::around(self.pos, 1)
    }
}

/// A projectile travelling one cell per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    /// Current cell.
    pub pos: Vector,
    /// Step applied every tick.
    pub dir: Vector,
    /// Side of the unit that fired it.
    pub side: Side,
    /// Damage dealt to an opposing unit.
    pub attack_power: i32,
}

impl Bullet {
    /// Advance one step.
    pub fn advance(&mut self) {
        self.pos += self.dir;
    }
}

impl Hitbox for Bullet {
    fn hitbox(&self) -> Rect {
        Rect::point(self.pos)
    }
}

/// One obstacle cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wall {
    /// Occupied cell.
    pub pos: Vector,
    /// Display colour.
    pub color: Rgb,
    /// Whether a projectile destroys it.
    pub breakable: bool,
}

impl Hitbox for Wall {
    fn hitbox(&self) -> Rect {
        Rect::point(self.pos)
    }
}

/// Stats for a unit that has not been placed on the map yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype {
    /// Owning side.
    pub side: Side,
    /// Ticks between two shots.
    pub attack_cooldown: u32,
    /// Ticks between two steps.
    pub move_cooldown: u32,
    /// Starting hit points.
    pub hp: i32,
    /// Damage dealt per projectile.
    pub attack_power: i32,
}

impl Archetype {
    /// An archetype with a side's configured starting stats.
    #[must_use]
    pub const fn from_stats(side: Side, stats: &SideStats) -> Self {
        Self {
            side,
            attack_cooldown: stats.attack_cooldown,
            move_cooldown: stats.move_cooldown,
            hp: stats.hp,
            attack_power: stats.attack_power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank_at(x: i32, y: i32) -> Tank {
        let archetype = Archetype {
            side: Side::Enemy,
            attack_cooldown: 5,
            move_cooldown: 3,
            hp: 2,
            attack_power: 1,
        };
        Tank::spawn(&archetype, Vector::new(x, y))
    }

    #[test]
    fn test_spawn_faces_up_ready() {
        let tank = tank_at(4, 4);
        assert_eq!(tank.dir, Vector::UP);
        assert_eq!(tank.move_countdown, 0);
        assert_eq!(tank.attack_countdown, 0);
        assert!(!tank.is_player());
    }

    #[test]
    fn test_cool_down_floors_at_zero() {
        let mut tank = tank_at(4, 4);
        tank.move_countdown = 1;
        tank.cool_down();
        tank.cool_down();
        assert_eq!(tank.move_countdown, 0);
        assert_eq!(tank.attack_countdown, 0);
    }

    #[test]
    fn test_muzzle_is_inside_own_hitbox() {
        let mut tank = tank_at(4, 4);
        tank.dir = Vector::RIGHT;
        assert_eq!(tank.muzzle(), Vector::new(5, 4));
        assert!(tank.hitbox().contains(tank.muzzle()));
    }

    #[test]
    fn test_collide_with_rect_probe() {
        let tank = tank_at(4, 4);
        let wall = Wall {
            pos: Vector::new(5, 5),
            color: Rgb::WHITE,
            breakable: true,
        };
        assert!(is_collide(&tank, &wall));
        assert!(is_collide(&wall, &tank));
        assert!(!is_collide(&tank, &Rect::point(Vector::new(6, 4))));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Player);
    }
}
