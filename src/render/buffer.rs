//! Double-buffered character grid with diff flushing.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::geometry::Rect;
use crate::render::Rgb;

/// Glyph of the frame around the map.
pub const BORDER_GLYPH: char = '%';

/// One character cell of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character shown.
    pub glyph: char,
    /// Foreground colour.
    pub color: Rgb,
}

impl Cell {
    /// An empty white cell.
    pub const BLANK: Self = Self::new(' ', Rgb::WHITE);

    /// Create a cell.
    #[must_use]
    pub const fn new(glyph: char, color: Rgb) -> Self {
        Self { glyph, color }
    }
}

/// The previously emitted frame and the frame being built.
///
/// Grid row `r` is map row `r`; map column `c` lands on character column
/// `2c`, leaving the odd columns blank so cells look roughly square. Row 0,
/// row `height + 1`, column 0, and column `width + 1` hold the border.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    rows: usize,
    cols: usize,
    previous: Vec<Cell>,
    current: Vec<Cell>,
    clear_pending: bool,
}

impl RenderBuffer {
    /// A buffer for a `map_width` × `map_height` map, reset and ready to paint.
    ///
    /// A size whose rows or character columns do not fit in terminal
    /// coordinates yields an empty buffer.
    #[must_use]
    pub fn new(map_width: i32, map_height: i32) -> Self {
        let rows = map_height.checked_add(2).map_or(0, screen_extent);
        let cols = map_width
            .checked_add(1)
            .and_then(|w| w.checked_mul(2))
            .and_then(|w| w.checked_add(1))
            .map_or(0, screen_extent);
        let (rows, cols) = if rows == 0 || cols == 0 { (0, 0) } else { (rows, cols) };
        let mut buffer = Self {
            rows,
            cols,
            previous: vec![Cell::BLANK; rows * cols],
            current: vec![Cell::BLANK; rows * cols],
            clear_pending: true,
        };
        buffer.reset();
        buffer
    }

    /// Character rows, border included.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Character columns, border included.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Start over from an empty screen holding only the border.
    ///
    /// The next [`flush`](Self::flush) clears the terminal first and then
    /// emits every non-blank cell.
    pub fn reset(&mut self) {
        self.previous.fill(Cell::BLANK);
        let (rows, cols) = (self.rows, self.cols);
        for (id, cell) in self.current.iter_mut().enumerate() {
            let (r, c) = (id / cols, id % cols);
            let horizontal = (r == 0 || r + 1 == rows) && c % 2 == 0;
            let vertical = c == 0 || c + 1 == cols;
            *cell = if horizontal || vertical {
                Cell::new(BORDER_GLYPH, Rgb::WHITE)
            } else {
                Cell::BLANK
            };
        }
        self.clear_pending = true;
    }

    /// Write one map cell of the frame being built.
    ///
    /// Writes outside the grid are dropped.
    pub fn modify(&mut self, row: i32, col: i32, glyph: char, color: Rgb) {
        if let Some(id) = self.index(row, col) {
            self.current[id] = Cell::new(glyph, color);
        }
    }

    /// Blank every map cell of `area` in the frame being built.
    pub fn erase_area(&mut self, area: Rect) {
        for pos in area.cells() {
            self.modify(pos.y, pos.x, ' ', Rgb::WHITE);
        }
    }

    /// The map cell at `(row, col)` in the frame being built.
    #[must_use]
    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        self.index(row, col).map(|id| self.current[id])
    }

    /// Emit every cell that changed since the last flush and adopt the new
    /// frame as the baseline. Returns the number of cells written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        if self.clear_pending {
            queue!(out, ResetColor, Clear(ClearType::All))?;
            self.clear_pending = false;
        }

        let mut written = 0;
        for (id, (prev, cur)) in self.previous.iter_mut().zip(&self.current).enumerate() {
            if prev == cur {
                continue;
            }
            let row = u16::try_from(id / self.cols).unwrap_or(u16::MAX);
            let col = u16::try_from(id % self.cols).unwrap_or(u16::MAX);
            queue!(
                out,
                MoveTo(col, row),
                SetForegroundColor(cur.color.into()),
                Print(cur.glyph)
            )?;
            *prev = *cur;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        let r = usize::try_from(row).ok()?;
        let c = usize::try_from(col).ok()?.checked_mul(2)?;
        (r < self.rows && c < self.cols).then(|| r * self.cols + c)
    }
}

/// `extent` as a cell count if every coordinate below it fits in a `u16`.
fn screen_extent(extent: i32) -> usize {
    u16::try_from(extent).map_or(0, usize::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_double_columns() {
        let buffer = RenderBuffer::new(10, 5);
        assert_eq!(buffer.rows(), 7);
        assert_eq!(buffer.cols(), 23);
    }

    #[test]
    fn test_unaddressable_size_is_empty() {
        for (width, height) in [(i32::MAX, 24), (40_000, 5), (10, i32::MAX), (-7, 5)] {
            let mut buffer = RenderBuffer::new(width, height);
            assert_eq!((buffer.rows(), buffer.cols()), (0, 0));
            buffer.modify(1, 1, 'x', Rgb::WHITE);
            assert_eq!(buffer.cell(1, 1), None);
            let mut out = Vec::new();
            assert_eq!(buffer.flush(&mut out).unwrap(), 0);
        }
    }

    #[test]
    fn test_widest_valid_map_flushes() {
        let mut buffer = RenderBuffer::new(crate::config::MAX_MAP_EDGE, 5);
        buffer.modify(3, crate::config::MAX_MAP_EDGE, 'x', Rgb::BLACK);
        let mut out = Vec::new();
        let written = buffer.flush(&mut out).unwrap();
        assert!(written > buffer.cols());
    }

    #[test]
    fn test_border_layout() {
        let buffer = RenderBuffer::new(4, 3);
        assert_eq!(buffer.cell(0, 0).map(|c| c.glyph), Some(BORDER_GLYPH));
        assert_eq!(buffer.cell(0, 2).map(|c| c.glyph), Some(BORDER_GLYPH));
        assert_eq!(buffer.cell(2, 0).map(|c| c.glyph), Some(BORDER_GLYPH));
        assert_eq!(buffer.cell(2, 5).map(|c| c.glyph), Some(BORDER_GLYPH));
        assert_eq!(buffer.cell(2, 2), Some(Cell::BLANK));
        assert_eq!(buffer.cell(4, 3).map(|c| c.glyph), Some(BORDER_GLYPH));
    }

    #[test]
    fn test_modify_maps_to_even_column() {
        let mut buffer = RenderBuffer::new(4, 3);
        buffer.modify(1, 3, 'x', Rgb::BLACK);
        assert_eq!(buffer.current[buffer.cols + 6], Cell::new('x', Rgb::BLACK));
    }

    #[test]
    fn test_out_of_range_write_is_dropped() {
        let mut buffer = RenderBuffer::new(4, 3);
        buffer.modify(-1, 2, 'x', Rgb::BLACK);
        buffer.modify(2, 50, 'x', Rgb::BLACK);
        assert_eq!(buffer.cell(-1, 2), None);
    }

    #[test]
    fn test_first_flush_clears_then_draws_border() {
        let mut buffer = RenderBuffer::new(4, 3);
        let mut out = Vec::new();
        let written = buffer.flush(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[2J"));
        assert!(written > 0);
        assert_eq!(written, text.matches(BORDER_GLYPH).count());
    }

    #[test]
    fn test_flush_emits_only_changes() {
        let mut buffer = RenderBuffer::new(4, 3);
        buffer.flush(&mut Vec::new()).unwrap();

        buffer.modify(2, 2, 'o', Rgb::WHITE);
        let mut out = Vec::new();
        assert_eq!(buffer.flush(&mut out).unwrap(), 1);
        let text = String::from_utf8(out).unwrap();
        // Row 2, char column 4, 1-based in the escape sequence.
        assert!(text.contains("\x1b[3;5H"));
        assert!(text.ends_with('o'));
    }

    #[test]
    fn test_second_flush_is_empty() {
        let mut buffer = RenderBuffer::new(4, 3);
        buffer.modify(1, 1, '#', Rgb::DARK_GRAY);
        buffer.flush(&mut Vec::new()).unwrap();

        let mut out = Vec::new();
        assert_eq!(buffer.flush(&mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_erase_area_blanks_cells() {
        let mut buffer = RenderBuffer::new(6, 6);
        buffer.modify(3, 3, '@', Rgb::BLACK);
        buffer.modify(2, 4, '@', Rgb::BLACK);
        buffer.erase_area(Rect::around(crate::geometry::Vector::new(3, 3), 1));
        assert_eq!(buffer.cell(3, 3), Some(Cell::BLANK));
        assert_eq!(buffer.cell(2, 4), Some(Cell::BLANK));
    }
}
