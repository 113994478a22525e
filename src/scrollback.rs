//! Committed rows plus the one uncommitted trailing row.
//!
//! The scrollback holds every wrapped row the widget has produced so far.
//! Rows in `committed` are terminated, either by a hard `\n` or by a
//! wrap-inserted `<br>`; the trailing row is the single row still open for
//! appends. Row accounting is exact: an empty trailing row still counts as
//! one row, so `rows` never drops below 1.

use crate::markup::{ContentMap, Decorated, BREAK};
use crate::measure::Measure;
use crate::wrap::wrap;

/// Wrapped output rows with an open trailing row.
#[derive(Debug, Clone, Default)]
pub struct Scrollback {
    committed: Decorated,
    trailing: Decorated,
    rows: usize,
}

impl Scrollback {
    /// Create an empty buffer: no committed rows, one empty trailing row.
    pub fn new() -> Self {
        Self {
            committed: Decorated::new(),
            trailing: Decorated::new(),
            rows: 1,
        }
    }

    /// Terminated rows, break markers included.
    pub fn committed(&self) -> &Decorated {
        &self.committed
    }

    /// The row not yet terminated; possibly empty.
    pub fn trailing(&self) -> &Decorated {
        &self.trailing
    }

    /// Total visual rows, trailing row included. Always at least 1.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Absorb new decorated text.
    ///
    /// The existing trailing row is prepended so an in-progress row merges
    /// seamlessly with arriving output. Hard `\n` terminators always force a
    /// row break; everything between them is wrapped against the budget.
    /// All produced rows except the last are committed; the last becomes the
    /// new trailing row. Returns the measured width of that trailing row.
    ///
    /// Committing text in pieces is equivalent to committing the
    /// concatenation, given a stable measurer.
    pub fn commit(&mut self, text: &Decorated, max_width: f32, measure: &dyn Measure) -> f32 {
        if text.is_empty() {
            return self.trailing_width(measure);
        }

        let mut merged = std::mem::take(&mut self.trailing).into_string();
        merged.push_str(text.as_str());

        // The previous trailing row is being replaced, not added.
        self.rows = self.rows.saturating_sub(1);

        let lines: Vec<&str> = merged.split('\n').collect();
        let last = lines.len() - 1;
        let mut col_offset = 0.0;

        for (i, line) in lines.iter().enumerate() {
            let result = wrap(&Decorated::from(*line), max_width, measure);
            self.rows += result.rows;

            if i < last {
                self.committed.push_str(result.wrapped.as_str());
                self.committed.push('\n');
            } else {
                col_offset = result.col_offset;
                match result.wrapped.as_str().rfind(BREAK) {
                    None => self.trailing = result.wrapped,
                    Some(idx) => {
                        let cut = idx + BREAK.len();
                        self.committed.push_str(&result.wrapped.as_str()[..cut]);
                        self.trailing = Decorated::from(&result.wrapped.as_str()[cut..]);
                    }
                }
            }
        }

        tracing::trace!(rows = self.rows, "scrollback commit");
        col_offset
    }

    /// Reset to the initial empty state (one empty trailing row).
    pub fn clear(&mut self) {
        self.committed = Decorated::new();
        self.trailing = Decorated::new();
        self.rows = 1;
    }

    /// Re-wrap the entire buffer against a new budget.
    ///
    /// Strips every soft break marker, keeps hard terminators, and replays
    /// the text through [`commit`](Self::commit). This is the expensive
    /// resize path; it rebuilds row counts from scratch. Returns the new
    /// trailing row width.
    pub fn rewrap(&mut self, max_width: f32, measure: &dyn Measure) -> f32 {
        let mut all = std::mem::take(&mut self.committed).into_string();
        all.push_str(std::mem::take(&mut self.trailing).as_str());
        let plain = all.replace(BREAK, "");

        self.clear();
        let col = self.commit(&Decorated::from(plain), max_width, measure);
        tracing::debug!(rows = self.rows, max_width, "scrollback rewrapped");
        col
    }

    fn trailing_width(&self, measure: &dyn Measure) -> f32 {
        let map = ContentMap::build(self.trailing.as_str());
        measure.extent(map.text()).width
    }
}
