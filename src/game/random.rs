//! Dice helpers over an injected [`rand::Rng`].

use rand::Rng;

use crate::geometry::{Rect, Vector};

/// `true` with probability `numer / denom`.
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, numer: u32, denom: u32) -> bool {
    rng.gen_range(1..=denom) <= numer
}

/// Uniform integer in `[lo, hi]`.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    rng.gen_range(lo..=hi)
}

/// Integer in `[lo, hi]` skewed by `k` repeated draws.
///
/// Positive `k` pulls the result toward `hi`, negative `k` toward `lo`, and
/// `k == 0` is a plain uniform draw.
pub(crate) fn biased_int<R: Rng + ?Sized>(rng: &mut R, mut lo: i32, mut hi: i32, k: i32) -> i32 {
    for _ in 0..k.unsigned_abs() {
        if k > 0 {
            lo = uniform(rng, lo, hi);
        } else {
            hi = uniform(rng, lo, hi);
        }
    }
    uniform(rng, lo, hi)
}

/// A random cardinal step, or [`Vector::ZERO`] one time in five.
pub(crate) fn step_or_stay<R: Rng + ?Sized>(rng: &mut R) -> Vector {
    match rng.gen_range(0..=4) {
        1 => Vector::UP,
        2 => Vector::DOWN,
        3 => Vector::LEFT,
        4 => Vector::RIGHT,
        _ => Vector::ZERO,
    }
}

/// A uniformly random cell of `area`.
pub(crate) fn cell_in<R: Rng + ?Sized>(rng: &mut R, area: Rect) -> Vector {
    Vector::new(
        uniform(rng, area.min.x, area.max.x),
        uniform(rng, area.min.y, area.max.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_chance_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(chance(&mut rng, 10, 10));
            assert!(!chance(&mut rng, 0, 10));
        }
    }

    #[test]
    fn test_biased_int_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for k in -4..=4 {
            for _ in 0..200 {
                let v = biased_int(&mut rng, 0, 3, k);
                assert!((0..=3).contains(&v), "k={k} gave {v}");
            }
        }
    }

    #[test]
    fn test_biased_int_skews() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let high: i32 = (0..2000).map(|_| biased_int(&mut rng, 0, 3, 3)).sum();
        let low: i32 = (0..2000).map(|_| biased_int(&mut rng, 0, 3, -3)).sum();
        assert!(high > low * 2, "high={high} low={low}");
    }

    #[test]
    fn test_step_or_stay_hits_every_outcome() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let seen: std::collections::HashSet<_> = (0..500).map(|_| step_or_stay(&mut rng)).collect();
        assert_eq!(seen.len(), 5);
        assert!(seen.contains(&Vector::ZERO));
    }

    #[test]
    fn test_cell_in_area() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let area = Rect::new(Vector::new(2, 2), Vector::new(4, 7));
        for _ in 0..200 {
            assert!(area.contains(cell_in(&mut rng, area)));
        }
    }
}
