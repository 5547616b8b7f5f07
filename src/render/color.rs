//! 24-bit colours and the per-side palette.

use rand::Rng;

use crate::game::Side;

/// Squared RGB distance under which two colours read as the same.
const SIMILARITY_THRESHOLD: i32 = 24_678;

/// A 24-bit terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure white, the colour of blank cells and the border.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Unbreakable obstacles.
    pub const LIGHT_GRAY: Self = Self::new(192, 192, 192);
    /// Mid gray.
    pub const GRAY: Self = Self::new(128, 128, 128);
    /// Breakable obstacles.
    pub const DARK_GRAY: Self = Self::new(64, 64, 64);
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Whether the two colours are too close to tell apart at a glance.
    #[must_use]
    pub fn is_similar(self, other: Self) -> bool {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        dr * dr + dg * dg + db * db < SIMILARITY_THRESHOLD
    }

    /// Whether the colour is a near-gray that would blend with the terrain.
    #[must_use]
    pub fn is_colorless(self) -> bool {
        let (r, g, b) = (i32::from(self.r), i32::from(self.g), i32::from(self.b));
        let spread = (r - g).pow(2) + (g - b).pow(2) + (b - r).pow(2);
        spread < SIMILARITY_THRESHOLD
            || [Self::WHITE, Self::LIGHT_GRAY, Self::GRAY, Self::DARK_GRAY, Self::BLACK]
                .into_iter()
                .any(|gray| self.is_similar(gray))
    }

    /// A uniformly random colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.r#gen(), rng.r#gen(), rng.r#gen())
    }

    /// A random colour that is not [colourless](Self::is_colorless).
    pub fn random_colorful<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let color = Self::random(rng);
            if !color.is_colorless() {
                return color;
            }
        }
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(c: Rgb) -> Self {
        Self::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

/// Display colours for the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Player units and their projectiles.
    pub player: Rgb,
    /// Enemy units and their projectiles.
    pub enemy: Rgb,
}

impl Palette {
    /// Two random colourful colours that are distinct from each other.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let enemy = Rgb::random_colorful(rng);
        let mut player = Rgb::random_colorful(rng);
        while player.is_similar(enemy) {
            player = Rgb::random_colorful(rng);
        }
        Self { player, enemy }
    }

    /// Colour for `side`.
    #[must_use]
    pub const fn color(self, side: Side) -> Rgb {
        match side {
            Side::Player => self.player,
            Side::Enemy => self.enemy,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            player: Rgb::new(64, 160, 255),
            enemy: Rgb::new(255, 64, 64),
        }
    }
}
