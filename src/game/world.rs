//! Live entities, spatial queries, and projectile impacts.

use rand::Rng;
use tracing::warn;

use crate::arena::{Arena, Handle};
use crate::error::SpawnError;
use crate::game::random::cell_in;
use crate::game::{Archetype, Bullet, Side, Tank, Wall, is_collide};
use crate::geometry::{Rect, Vector};
use crate::render::Rgb;

/// What a projectile ran into after its step this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// Nothing; the projectile flies on.
    Miss,
    /// It left the map.
    OutOfBounds,
    /// It struck an obstacle cell, destroying it if breakable.
    Obstacle {
        /// Cell that was struck.
        at: Vector,
        /// The obstacle, if it was destroyed.
        destroyed: Option<Wall>,
    },
    /// It struck an opposing unit.
    Hit {
        /// Unit that was struck.
        target: Handle<Tank>,
        /// The unit, if the hit destroyed it.
        killed: Option<Tank>,
    },
}

impl Impact {
    /// Whether the projectile is used up.
    #[must_use]
    pub const fn consumes(&self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Obstacle cells laid out as one 3×3 cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    /// Permanent for the level.
    Solid,
    /// Destroyed by any projectile.
    Dirt,
}

impl Terrain {
    const fn wall(self, pos: Vector) -> Wall {
        match self {
            Self::Solid => Wall {
                pos,
                color: Rgb::LIGHT_GRAY,
                breakable: false,
            },
            Self::Dirt => Wall {
                pos,
                color: Rgb::DARK_GRAY,
                breakable: true,
            },
        }
    }
}

/// Every live unit, projectile, and obstacle on a bounded map.
#[derive(Debug, Clone)]
pub struct World {
    width: i32,
    height: i32,
    /// Mobile units.
    pub tanks: Arena<Tank>,
    /// Projectiles in flight.
    pub bullets: Arena<Bullet>,
    /// Obstacle cells.
    pub walls: Arena<Wall>,
}

impl World {
    /// An empty `width` × `height` map.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tanks: Arena::new(),
            bullets: Arena::new(),
            walls: Arena::new(),
        }
    }

    /// Playable columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Playable rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// The playable cells, `[1, width] × [1, height]`.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(Vector::new(1, 1), Vector::new(self.width, self.height))
    }

    /// Centres a 3×3 footprint may be spawned at without crossing the edge.
    #[must_use]
    pub const fn spawn_area(&self) -> Rect {
        Rect::new(Vector::new(2, 2), Vector::new(self.width - 1, self.height - 1))
    }

    /// Drop every entity.
    pub fn clear(&mut self) {
        self.tanks.clear();
        self.bullets.clear();
        self.walls.clear();
    }

    /// Whether no unit, projectile, or obstacle touches `area`.
    #[must_use]
    pub fn is_area_empty(&self, area: Rect) -> bool {
        !self.tanks.iter().any(|t| is_collide(t, &area))
            && !self.bullets.iter().any(|b| is_collide(b, &area))
            && !self.walls.iter().any(|w| is_collide(w, &area))
    }

    /// Whether the unit can take one step in its facing direction.
    ///
    /// The new footprint must stay on the map and must not touch any other
    /// unit, any projectile, or any obstacle. Stale handles cannot move.
    #[must_use]
    pub fn can_tank_move(&self, handle: Handle<Tank>) -> bool {
        let Some(tank) = self.tanks.get(handle) else {
            return false;
        };
        let area = tank.next_hitbox();
        if !self.bounds().contains_rect(&area) {
            return false;
        }
        !self
            .tanks
            .iter_handles()
            .any(|(other, t)| other != handle && is_collide(t, &area))
            && !self.bullets.iter().any(|b| is_collide(b, &area))
            && !self.walls.iter().any(|w| is_collide(w, &area))
    }

    /// Step the unit one cell in its facing direction.
    ///
    /// Only call after [`can_tank_move`](Self::can_tank_move) succeeded.
    pub fn move_tank(&mut self, handle: Handle<Tank>) {
        if let Some(tank) = self.tanks.get_mut(handle) {
            tank.pos += tank.dir;
        }
    }

    /// Fire a projectile from the unit's gun.
    pub fn fire(&mut self, handle: Handle<Tank>) -> Option<Handle<Bullet>> {
        let tank = self.tanks.get(handle)?;
        let bullet = Bullet {
            pos: tank.muzzle(),
            dir: tank.dir,
            side: tank.side,
            attack_power: tank.attack_power,
        };
        Some(self.bullets.add(bullet))
    }

    /// Apply what `bullet` hits at its current cell.
    ///
    /// Checked in order: leaving the map, an obstacle (destroyed if
    /// breakable), an opposing unit (damaged, removed at HP ≤ 0). Units on the
    /// projectile's own side are passed through untouched. The projectile
    /// itself is not removed here.
    pub fn resolve_impact(&mut self, bullet: &Bullet) -> Impact {
        if !self.bounds().contains(bullet.pos) {
            return Impact::OutOfBounds;
        }

        let wall_hit = self
            .walls
            .iter_handles()
            .find(|(_, w)| is_collide(*w, bullet))
            .map(|(h, w)| (h, w.breakable));
        if let Some((handle, breakable)) = wall_hit {
            let destroyed = if breakable { self.walls.remove(handle) } else { None };
            return Impact::Obstacle {
                at: bullet.pos,
                destroyed,
            };
        }

        let tank_hit = self
            .tanks
            .iter_handles()
            .find(|(_, t)| t.side != bullet.side && is_collide(*t, bullet))
            .map(|(h, _)| h);
        let Some(target) = tank_hit else {
            return Impact::Miss;
        };
        let dead = self.tanks.get_mut(target).is_some_and(|tank| {
            tank.hp -= bullet.attack_power;
            tank.hp <= 0
        });
        let killed = if dead { self.tanks.remove(target) } else { None };
        Impact::Hit { target, killed }
    }

    /// The first player unit.
    #[must_use]
    pub fn player(&self) -> Option<(Handle<Tank>, &Tank)> {
        self.tanks.iter_handles().find(|(_, t)| t.is_player())
    }

    /// Live units fighting for `side`.
    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.tanks.iter().filter(|t| t.side == side).count()
    }

    /// Sample spawn centres until the 3×3 area around one is empty.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError::Exhausted`] after `attempts` occupied samples.
    pub fn find_empty_spot<R: Rng + ?Sized>(&self, rng: &mut R, attempts: u32) -> Result<Vector, SpawnError> {
        let area = self.spawn_area();
        for _ in 0..attempts {
            let pos = cell_in(rng, area);
            if self.is_area_empty(Rect::around(pos, 1)) {
                return Ok(pos);
            }
        }
        warn!(attempts, "no empty spawn area left on the map");
        Err(SpawnError::Exhausted { attempts })
    }

    /// Place one unit per archetype, then the obstacle clusters.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError::Exhausted`] if the map fills up first.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        roster: &[Archetype],
        clusters: &[(Terrain, u32)],
        attempts: u32,
        rng: &mut R,
    ) -> Result<(), SpawnError> {
        for archetype in roster {
            let pos = self.find_empty_spot(rng, attempts)?;
            self.tanks.add(Tank::spawn(archetype, pos));
        }
        for &(terrain, count) in clusters {
            for _ in 0..count {
                let center = self.find_empty_spot(rng, attempts)?;
                for pos in Rect::around(center, 1).cells() {
                    self.walls.add(terrain.wall(pos));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Hitbox;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn archetype(side: Side, hp: i32) -> Archetype {
        Archetype {
            side,
            attack_cooldown: 5,
            move_cooldown: 5,
            hp,
            attack_power: 1,
        }
    }

    fn place(world: &mut World, side: Side, x: i32, y: i32, dir: Vector) -> Handle<Tank> {
        let mut tank = Tank::spawn(&archetype(side, 3), Vector::new(x, y));
        tank.dir = dir;
        world.tanks.add(tank)
    }

    #[test]
    fn test_area_empty_sees_every_kind() {
        let mut world = World::new(20, 20);
        let probe = Rect::around(Vector::new(10, 10), 1);
        assert!(world.is_area_empty(probe));

        world.walls.add(Terrain::Dirt.wall(Vector::new(11, 11)));
        assert!(!world.is_area_empty(probe));
        world.walls.clear();

        world.bullets.add(Bullet {
            pos: Vector::new(9, 9),
            dir: Vector::UP,
            side: Side::Enemy,
            attack_power: 1,
        });
        assert!(!world.is_area_empty(probe));
        world.bullets.clear();

        place(&mut world, Side::Enemy, 12, 10, Vector::UP);
        assert!(!world.is_area_empty(probe));
    }

    #[test]
    fn test_move_blocked_by_edge() {
        let mut world = World::new(10, 10);
        let tank = place(&mut world, Side::Player, 2, 5, Vector::LEFT);
        assert!(!world.can_tank_move(tank));
        world.tanks[tank].dir = Vector::RIGHT;
        assert!(world.can_tank_move(tank));
    }

    #[test]
    fn test_move_ignores_own_footprint() {
        let mut world = World::new(10, 10);
        let tank = place(&mut world, Side::Player, 5, 5, Vector::DOWN);
        assert!(world.can_tank_move(tank));
        world.move_tank(tank);
        assert_eq!(world.tanks[tank].pos, Vector::new(5, 6));
    }

    #[test]
    fn test_move_blocked_by_other_tank_and_wall() {
        let mut world = World::new(20, 20);
        let a = place(&mut world, Side::Player, 5, 5, Vector::RIGHT);
        let b = place(&mut world, Side::Enemy, 8, 5, Vector::UP);
        assert!(!world.can_tank_move(a));
        world.tanks.remove(b);
        assert!(world.can_tank_move(a));
        world.walls.add(Terrain::Solid.wall(Vector::new(7, 4)));
        assert!(!world.can_tank_move(a));
    }

    #[test]
    fn test_fresh_shot_blocks_forward_step() {
        let mut world = World::new(20, 20);
        let tank = place(&mut world, Side::Player, 5, 5, Vector::RIGHT);
        let shot = world.fire(tank).unwrap();
        assert_eq!(world.bullets[shot].pos, Vector::new(6, 5));
        world.bullets[shot].advance();
        assert!(!world.can_tank_move(tank));
    }

    #[test]
    fn test_impact_priority_out_of_bounds_first() {
        let mut world = World::new(10, 10);
        let bullet = Bullet {
            pos: Vector::new(0, 5),
            dir: Vector::LEFT,
            side: Side::Player,
            attack_power: 1,
        };
        world.walls.add(Terrain::Dirt.wall(Vector::new(0, 5)));
        assert_eq!(world.resolve_impact(&bullet), Impact::OutOfBounds);
        assert_eq!(world.walls.len(), 1);
    }

    #[test]
    fn test_impact_wall_before_tank() {
        let mut world = World::new(10, 10);
        let enemy = place(&mut world, Side::Enemy, 5, 5, Vector::UP);
        world.walls.add(Terrain::Solid.wall(Vector::new(5, 4)));
        let bullet = Bullet {
            pos: Vector::new(5, 4),
            dir: Vector::DOWN,
            side: Side::Player,
            attack_power: 5,
        };
        let impact = world.resolve_impact(&bullet);
        assert!(matches!(impact, Impact::Obstacle { destroyed: None, .. }));
        assert_eq!(world.tanks[enemy].hp, 3);
    }

    #[test]
    fn test_impact_damages_without_killing() {
        let mut world = World::new(10, 10);
        let enemy = place(&mut world, Side::Enemy, 5, 5, Vector::UP);
        let bullet = Bullet {
            pos: Vector::new(6, 6),
            dir: Vector::UP,
            side: Side::Player,
            attack_power: 1,
        };
        let impact = world.resolve_impact(&bullet);
        assert_eq!(impact, Impact::Hit { target: enemy, killed: None });
        assert_eq!(world.tanks[enemy].hp, 2);
        assert!(impact.consumes());
    }

    #[test]
    fn test_impact_passes_through_own_side() {
        let mut world = World::new(10, 10);
        let ally = place(&mut world, Side::Enemy, 5, 5, Vector::UP);
        let bullet = Bullet {
            pos: Vector::new(5, 6),
            dir: Vector::UP,
            side: Side::Enemy,
            attack_power: 9,
        };
        let impact = world.resolve_impact(&bullet);
        assert_eq!(impact, Impact::Miss);
        assert!(!impact.consumes());
        assert_eq!(world.tanks[ally].hp, 3);
    }

    #[test]
    fn test_populate_places_everything_apart() {
        let mut world = World::new(56, 24);
        let roster = [archetype(Side::Player, 2), archetype(Side::Enemy, 1), archetype(Side::Enemy, 1)];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        world
            .populate(&roster, &[(Terrain::Solid, 5), (Terrain::Dirt, 6)], 10_000, &mut rng)
            .unwrap();

        assert_eq!(world.tanks.len(), 3);
        assert_eq!(world.walls.len(), 11 * 9);
        assert_eq!(world.count(Side::Player), 1);
        let tanks: Vec<_> = world.tanks.iter().collect();
        for (i, a) in tanks.iter().enumerate() {
            assert!(world.bounds().contains_rect(&a.hitbox()));
            for b in &tanks[i + 1..] {
                assert!(!is_collide(*a, *b));
            }
            assert!(!world.walls.iter().any(|w| is_collide(w, *a)));
        }
    }

    #[test]
    fn test_populate_reports_exhaustion() {
        let mut world = World::new(5, 5);
        let roster = [archetype(Side::Player, 1), archetype(Side::Enemy, 1)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let err = world.populate(&roster, &[], 50, &mut rng).unwrap_err();
        assert_eq!(err, SpawnError::Exhausted { attempts: 50 });
    }
}
