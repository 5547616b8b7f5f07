//! Enemy decision heuristic.
//!
//! Both decisions are pure functions of the deciding unit, the target cell,
//! and the random source. Callers apply the result.

use rand::Rng;

use crate::game::Tank;
use crate::game::random::{chance, step_or_stay};
use crate::geometry::Vector;

/// Pick a new facing for `tank`, or `None` to stay put this time.
///
/// One time in ten the unit declines. Otherwise one time in three it picks a
/// random step (which may itself be "stay"). Otherwise it heads along the
/// dominant axis toward `target`.
pub fn decide_move<R: Rng + ?Sized>(tank: &Tank, target: Vector, rng: &mut R) -> Option<Vector> {
    if chance(rng, 1, 10) {
        return None;
    }
    if chance(rng, 1, 3) {
        let step = step_or_stay(rng);
        return (step != Vector::ZERO).then_some(step);
    }

    let mut dir = heading(tank.pos, target);
    if dir.x != 0 && dir.y != 0 {
        if chance(rng, 1, 2) {
            dir.x = 0;
        } else {
            dir.y = 0;
        }
    }
    dir.is_cardinal().then_some(dir)
}

/// Whether `tank` should fire this tick.
///
/// Always fires when already facing `target` along the dominant axis,
/// otherwise three times in ten.
pub fn decide_attack<R: Rng + ?Sized>(tank: &Tank, target: Vector, rng: &mut R) -> bool {
    heading(tank.pos, target) == tank.dir || chance(rng, 3, 10)
}

/// Sign-reduced direction from `from` toward `to`.
///
/// An axis within one cell of the target is dropped when the other axis is
/// further away, so a target that is nearly lined up yields a cardinal step.
#[must_use]
pub fn heading(from: Vector, to: Vector) -> Vector {
    let mut delta = to - from;
    let near_x = delta.x.abs() <= 1;
    let near_y = delta.y.abs() <= 1;
    if near_x && !near_y {
        delta.x = 0;
    }
    if near_y && !near_x {
        delta.y = 0;
    }
    delta.signum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Archetype, Side};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn enemy_at(x: i32, y: i32, dir: Vector) -> Tank {
        let archetype = Archetype {
            side: Side::Enemy,
            attack_cooldown: 10,
            move_cooldown: 10,
            hp: 1,
            attack_power: 1,
        };
        let mut tank = Tank::spawn(&archetype, Vector::new(x, y));
        tank.dir = dir;
        tank
    }

    #[test]
    fn test_heading_drops_near_axis() {
        assert_eq!(heading(Vector::new(10, 10), Vector::new(11, 20)), Vector::DOWN);
        assert_eq!(heading(Vector::new(10, 10), Vector::new(2, 9)), Vector::LEFT);
        assert_eq!(heading(Vector::new(10, 10), Vector::new(20, 20)), Vector::new(1, 1));
        assert_eq!(heading(Vector::new(10, 10), Vector::new(10, 10)), Vector::ZERO);
    }

    #[test]
    fn test_move_is_never_diagonal() {
        let tank = enemy_at(10, 10, Vector::UP);
        for seed in 0..500 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            if let Some(dir) = decide_move(&tank, Vector::new(30, 2), &mut rng) {
                assert!(dir.is_cardinal(), "seed {seed} gave {dir:?}");
            }
        }
    }

    #[test]
    fn test_move_mostly_heads_for_target() {
        let tank = enemy_at(10, 10, Vector::UP);
        let toward = (0..1000)
            .filter(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                decide_move(&tank, Vector::new(10, 30), &mut rng) == Some(Vector::DOWN)
            })
            .count();
        // 0.9 * (2/3 + 1/3 * 1/5) = 0.66
        assert!(toward > 550 && toward < 770, "toward={toward}");
    }

    #[test]
    fn test_move_declines_sometimes() {
        let tank = enemy_at(10, 10, Vector::UP);
        let declined = (0..1000)
            .filter(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                decide_move(&tank, Vector::new(10, 30), &mut rng).is_none()
            })
            .count();
        // 0.1 + 0.9 * 1/3 * 1/5 = 0.16
        assert!(declined > 90 && declined < 240, "declined={declined}");
    }

    #[test]
    fn test_attack_always_when_aligned() {
        let tank = enemy_at(10, 10, Vector::RIGHT);
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert!(decide_attack(&tank, Vector::new(40, 11), &mut rng));
        }
    }

    #[test]
    fn test_attack_sometimes_when_not_aligned() {
        let tank = enemy_at(10, 10, Vector::LEFT);
        let fired = (0..1000)
            .filter(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                decide_attack(&tank, Vector::new(40, 10), &mut rng)
            })
            .count();
        assert!(fired > 220 && fired < 380, "fired={fired}");
    }
}
