//! The injected width-measurement capability.
//!
//! The layout core never computes font metrics itself: every pixel width and
//! height comes from a [`Measure`] implementation supplied by the host
//! (normally backed by the real rendering surface). [`CellMetrics`] is the
//! reference implementation for monospace surfaces, deriving glyph widths
//! from `unicode-width` cell counts.

use unicode_width::UnicodeWidthChar;

/// A rendered size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Extent {
    /// Create an extent.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if both dimensions are finite and non-negative.
    pub fn is_sane(&self) -> bool {
        self.width.is_finite() && self.width >= 0.0 && self.height.is_finite() && self.height >= 0.0
    }
}

/// Measures markup-free runs of characters.
///
/// Implementations must be stable (same input, same output) within one
/// layout pass; the wrapper's convergence search depends on it. Returning
/// non-finite or negative widths is the one fatal precondition of the core;
/// the wrapper degrades to a forced break rather than looping forever, but
/// layout results are meaningless from that point on.
pub trait Measure {
    /// Rendered size of a markup-free run of characters.
    fn extent(&self, text: &str) -> Extent;

    /// Rendered size of a single glyph.
    fn glyph(&self, ch: char) -> Extent {
        let mut buf = [0_u8; 4];
        self.extent(ch.encode_utf8(&mut buf))
    }

    /// Rendered size of the unit (blank) glyph, used to size an end-of-text
    /// caret and re-measured whenever the font changes.
    fn unit(&self) -> Extent {
        self.glyph(' ')
    }

    /// Adopt a new font. Hosts backed by a real surface re-measure here;
    /// the default implementation ignores the change.
    fn configure_font(&mut self, _family: &str, _size_px: f32) {}
}

/// Monospace cell measurer.
///
/// Narrow glyphs occupy one cell, wide glyphs (per `unicode-width`) two.
/// Good enough for terminal-style surfaces and for tests; proportional
/// hosts supply their own [`Measure`].
///
/// # Example
///
/// ```
/// use dashline::measure::{CellMetrics, Measure};
///
/// let cells = CellMetrics::new(8.0, 16.0);
/// assert_eq!(cells.extent("ab").width, 16.0);
/// assert_eq!(cells.extent("一").width, 16.0); // wide glyph, two cells
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Width of one cell in pixels.
    pub cell_width: f32,
    /// Row height in pixels.
    pub cell_height: f32,
}

impl CellMetrics {
    /// Create a measurer with explicit cell dimensions.
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Derive cell dimensions from a font size: 0.6em advance, 1.5 line
    /// height (the widget's default line-height).
    pub fn for_font_px(size_px: f32) -> Self {
        Self::new(size_px * 0.6, size_px * 1.5)
    }

    fn cells(text: &str) -> usize {
        text.chars()
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(1))
            .sum()
    }
}

impl Measure for CellMetrics {
    fn extent(&self, text: &str) -> Extent {
        Extent::new(Self::cells(text) as f32 * self.cell_width, self.cell_height)
    }

    fn configure_font(&mut self, _family: &str, size_px: f32) {
        *self = Self::for_font_px(size_px);
    }
}
