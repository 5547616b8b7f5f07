//! Glyphs for units, projectiles, and obstacles.

use crate::game::{Bullet, Hitbox, Tank, Wall};
use crate::geometry::Vector;
use crate::render::{RenderBuffer, Rgb};

/// Corners of a unit and the sides its gun does not face.
pub const TANK_EDGE: char = '@';
/// Rear of a unit, opposite its gun.
pub const TANK_REAR: char = 'X';
/// A projectile.
pub const BULLET_GLYPH: char = 'o';
/// An unbreakable obstacle cell.
pub const SOLID_GLYPH: char = '%';
/// A breakable obstacle cell.
pub const DIRT_GLYPH: char = '#';

/// Centre glyph of a unit: its HP as one base-36 digit.
#[must_use]
pub fn hp_glyph(hp: i32) -> char {
    u32::try_from(hp)
        .ok()
        .and_then(|d| char::from_digit(d, 36))
        .map_or('?', |c| c.to_ascii_uppercase())
}

const fn gun_glyph(dir: Vector) -> char {
    if dir.x == 0 { '|' } else { '-' }
}

impl RenderBuffer {
    /// Paint a unit facing its direction, overwriting its 3×3 footprint.
    pub fn draw_tank(&mut self, tank: &Tank, color: Rgb) {
        let Vector { x, y } = tank.pos;
        self.modify(y, x, hp_glyph(tank.hp), color);
        for corner in [Vector::new(-1, -1), Vector::new(1, -1), Vector::new(-1, 1), Vector::new(1, 1)] {
            self.modify(y + corner.y, x + corner.x, TANK_EDGE, color);
        }
        for side in Vector::CARDINALS {
            let glyph = if side == tank.dir {
                gun_glyph(side)
            } else if side == -tank.dir {
                TANK_REAR
            } else {
                TANK_EDGE
            };
            self.modify(y + side.y, x + side.x, glyph, color);
        }
    }

    /// Paint a projectile.
    pub fn draw_bullet(&mut self, bullet: &Bullet, color: Rgb) {
        self.modify(bullet.pos.y, bullet.pos.x, BULLET_GLYPH, color);
    }

    /// Paint an obstacle cell.
    pub fn draw_wall(&mut self, wall: &Wall) {
        let glyph = if wall.breakable { DIRT_GLYPH } else { SOLID_GLYPH };
        self.modify(wall.pos.y, wall.pos.x, glyph, wall.color);
    }

    /// Blank the footprint of any entity.
    pub fn erase(&mut self, entity: &impl Hitbox) {
        self.erase_area(entity.hitbox());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Archetype, Side};

    fn tank(dir: Vector, hp: i32) -> Tank {
        let archetype = Archetype {
            side: Side::Player,
            attack_cooldown: 1,
            move_cooldown: 1,
            hp,
            attack_power: 1,
        };
        let mut tank = Tank::spawn(&archetype, Vector::new(3, 3));
        tank.dir = dir;
        tank
    }

    fn glyph(buffer: &RenderBuffer, x: i32, y: i32) -> char {
        buffer.cell(y, x).map_or('!', |c| c.glyph)
    }

    #[test]
    fn test_hp_glyph_base36() {
        assert_eq!(hp_glyph(7), '7');
        assert_eq!(hp_glyph(10), 'A');
        assert_eq!(hp_glyph(35), 'Z');
        assert_eq!(hp_glyph(36), '?');
        assert_eq!(hp_glyph(-1), '?');
    }

    #[test]
    fn test_tank_facing_up() {
        let mut buffer = RenderBuffer::new(8, 8);
        buffer.draw_tank(&tank(Vector::UP, 2), Rgb::WHITE);
        assert_eq!(glyph(&buffer, 3, 3), '2');
        assert_eq!(glyph(&buffer, 3, 2), '|');
        assert_eq!(glyph(&buffer, 3, 4), TANK_REAR);
        assert_eq!(glyph(&buffer, 2, 3), TANK_EDGE);
        assert_eq!(glyph(&buffer, 4, 3), TANK_EDGE);
        assert_eq!(glyph(&buffer, 2, 2), TANK_EDGE);
        assert_eq!(glyph(&buffer, 4, 4), TANK_EDGE);
    }

    #[test]
    fn test_tank_facing_left() {
        let mut buffer = RenderBuffer::new(8, 8);
        buffer.draw_tank(&tank(Vector::LEFT, 12), Rgb::WHITE);
        assert_eq!(glyph(&buffer, 3, 3), 'C');
        assert_eq!(glyph(&buffer, 2, 3), '-');
        assert_eq!(glyph(&buffer, 4, 3), TANK_REAR);
        assert_eq!(glyph(&buffer, 3, 2), TANK_EDGE);
    }

    #[test]
    fn test_wall_glyphs() {
        let mut buffer = RenderBuffer::new(8, 8);
        let mut wall = Wall {
            pos: Vector::new(5, 5),
            color: Rgb::LIGHT_GRAY,
            breakable: false,
        };
        buffer.draw_wall(&wall);
        assert_eq!(glyph(&buffer, 5, 5), SOLID_GLYPH);
        wall.breakable = true;
        buffer.draw_wall(&wall);
        assert_eq!(glyph(&buffer, 5, 5), DIRT_GLYPH);
        buffer.erase(&wall);
        assert_eq!(glyph(&buffer, 5, 5), ' ');
    }
}
