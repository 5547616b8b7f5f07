//! Integer vectors and axis-aligned rectangles.
//!
//! Grid coordinates grow right (`x`) and down (`y`), so "up" is `(0, -1)`.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// An integer position or displacement on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vector {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0, 0);
    /// One row up.
    pub const UP: Self = Self::new(0, -1);
    /// One row down.
    pub const DOWN: Self = Self::new(0, 1);
    /// One column left.
    pub const LEFT: Self = Self::new(-1, 0);
    /// One column right.
    pub const RIGHT: Self = Self::new(1, 0);
    /// `(1, 1)`, the half-extent of a 3×3 footprint.
    pub const ONE: Self = Self::new(1, 1);

    /// The four cardinal directions.
    pub const CARDINALS: [Self; 4] = [Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT];

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sign, each axis reduced to -1, 0, or 1.
    #[must_use]
    pub const fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// Whether this is exactly one of the four cardinal unit steps.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        self.x.abs() + self.y.abs() == 1
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<i32> for Vector {
    type Output = Self;

    fn mul(self, k: i32) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

impl Div<i32> for Vector {
    type Output = Self;

    fn div(self, k: i32) -> Self {
        Self::new(self.x / k, self.y / k)
    }
}

/// An inclusive axis-aligned box between two corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner (smallest `x` and `y`).
    pub min: Vector,
    /// Bottom-right corner (largest `x` and `y`), inclusive.
    pub max: Vector,
}

impl Rect {
    /// Create a rectangle from its two inclusive corners.
    #[must_use]
    pub const fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    /// A single-cell rectangle.
    #[must_use]
    pub const fn point(pos: Vector) -> Self {
        Self::new(pos, pos)
    }

    /// The square of half-size `radius` around `center`.
    #[must_use]
    pub fn around(center: Vector, radius: i32) -> Self {
        let half = Vector::new(radius, radius);
        Self::new(center - half, center + half)
    }

    /// Whether `pos` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, pos: Vector) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Whether `other` lies entirely inside the rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        self.min.x <= other.min.x
            && self.max.x >= other.max.x
            && self.min.y <= other.min.y
            && self.max.y >= other.max.y
    }

    /// Whether the two rectangles share at least one cell.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Translate the rectangle by `offset`.
    #[must_use]
    pub fn shifted(self, offset: Vector) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Iterate every cell, row by row.
    pub fn cells(self) -> impl Iterator<Item = Vector> {
        (self.min.y..=self.max.y)
            .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| Vector::new(x, y)))
    }
}
