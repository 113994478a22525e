//! Caret placement and blink state.
//!
//! The caret's visual position is derived, never tracked incrementally: the
//! edit text up to the cursor is escaped, appended to the open trailing row,
//! and wrapped against the current budget. The end of that layout is where
//! the caret sits. Deriving from scratch keeps the caret correct across
//! every mutation path (typing, history loads, pastes, resizes) for free.

use std::time::{Duration, Instant};

use crate::markup::escape;
use crate::measure::Measure;
use crate::scrollback::Scrollback;
use crate::wrap::wrap;

/// How long each blink phase lasts.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Visibility toggles per restart: three full flashes, ending visible.
const BLINK_TOGGLES: u8 = 6;

/// Where the caret is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct CaretPosition {
    /// Visual row, 1-based, counting every scrollback row.
    pub row: usize,
    /// Pixel offset from the left edge.
    pub col: f32,
    /// The glyph under the caret; `None` at end of text (a blank caret).
    pub glyph: Option<char>,
}

impl Default for CaretPosition {
    fn default() -> Self {
        Self {
            row: 1,
            col: 0.0,
            glyph: None,
        }
    }
}

/// Map a cursor offset in the edit text to a visual position.
///
/// `cursor` is a character index into `raw`. The prefix up to it is escaped
/// into decorated form, concatenated with the buffer's trailing row, and
/// wrapped; the end of the final row is the caret position. If the caret
/// glyph would poke past the right edge the caret wraps to column 0 of the
/// next row - it is never drawn past the edge.
pub fn locate(
    buffer: &Scrollback,
    raw: &str,
    cursor: usize,
    max_width: f32,
    measure: &dyn Measure,
) -> CaretPosition {
    let mut probe = buffer.trailing().clone();
    let prefix: String = raw.chars().take(cursor).collect();
    probe.push_str(escape(&prefix).as_str());

    let result = wrap(&probe, max_width, measure);
    let mut row = buffer.rows() + result.rows - 1;
    let mut col = result.col_offset;

    let glyph = raw.chars().nth(cursor);
    let glyph_width = match glyph {
        Some(ch) => measure.glyph(ch).width,
        None => measure.unit().width,
    };
    if col + glyph_width >= max_width {
        row += 1;
        col = 0.0;
    }

    CaretPosition { row, col, glyph }
}

/// Host-driven caret blink state.
///
/// Cancel-and-restart: every keystroke or cursor move calls
/// [`restart`](Self::restart), which makes the caret visible and re-arms the
/// toggle sequence. The host event loop calls [`tick`](Self::tick) with the
/// current time; there is at most one armed sequence and no thread behind
/// it, so blinking can never race layout.
#[derive(Debug, Clone, Default)]
pub struct Blink {
    visible: bool,
    deadline: Option<Instant>,
    remaining: u8,
}

impl Blink {
    /// Create an idle, hidden blink state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the caret is currently drawn.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show the caret and re-arm the flash sequence from the top.
    pub fn restart(&mut self, now: Instant) {
        self.visible = true;
        self.deadline = Some(now + BLINK_PERIOD);
        self.remaining = BLINK_TOGGLES;
    }

    /// Stop blinking and hide the caret (focus lost).
    pub fn cancel(&mut self) {
        self.visible = false;
        self.deadline = None;
        self.remaining = 0;
    }

    /// Advance the sequence. Returns true if visibility changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(deadline) = self.deadline {
            if now < deadline {
                break;
            }
            self.visible = !self.visible;
            changed = true;
            self.remaining -= 1;
            self.deadline = if self.remaining == 0 {
                None
            } else {
                Some(deadline + BLINK_PERIOD)
            };
        }
        changed
    }
}
