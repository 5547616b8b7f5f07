//! Character-grid rendering.
//!
//! The simulation paints into the "current" frame of a [`RenderBuffer`];
//! [`RenderBuffer::flush`] then writes only the cells that differ from the
//! last emitted frame, as crossterm cursor/colour/print commands.

mod buffer;
mod color;
mod paint;

pub use buffer::{BORDER_GLYPH, Cell, RenderBuffer};
pub use color::{Palette, Rgb};
pub use paint::{BULLET_GLYPH, DIRT_GLYPH, SOLID_GLYPH, TANK_EDGE, TANK_REAR, hp_glyph};
