//! Pixel-budget line wrapping by convergence search.
//!
//! Glyph widths are non-uniform, so there is no closed-form "characters per
//! row". For each row the wrapper interpolates a first guess assuming
//! uniform width, measures it, then walks the guess one content unit at a
//! time toward the budget. The first time the walk reverses direction it
//! accepts the largest index whose measured width fits, which bounds the
//! number of probes by the interpolation error instead of the text length.
//!
//! Break positions are found in content-index space (markup skipped) and
//! spliced back into the decorated string as [`BREAK`](crate::markup::BREAK)
//! markers at the matching byte offsets.
//!
//! # Example
//!
//! ```
//! use dashline::measure::CellMetrics;
//! use dashline::wrap::wrap;
//!
//! let cells = CellMetrics::new(8.0, 16.0);
//! let result = wrap(&"0123456789ABCDE".into(), 80.0, &cells);
//! assert_eq!(result.wrapped.as_str(), "0123456789<br>ABCDE");
//! assert_eq!(result.rows, 2);
//! assert_eq!(result.col_offset, 40.0);
//! ```

use crate::markup::{ContentMap, Decorated, BREAK};
use crate::measure::Measure;
use smallvec::SmallVec;

/// Tolerance for pixel-width comparisons. The original surface reported
/// integer pixel offsets; this keeps "exactly equal" meaningful under f32.
pub const WIDTH_EPSILON: f32 = 0.01;

/// Extra probes allowed beyond one per content unit before the safety net
/// forces a break at the interpolated guess.
const PROBE_SLACK: usize = 4;

/// Result of wrapping one hard line against a pixel budget.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapResult {
    /// The input with `<br>` markers spliced in at every break.
    pub wrapped: Decorated,
    /// Visual rows produced; always break count + 1.
    pub rows: usize,
    /// Measured pixel width of the final (trailing) row.
    pub col_offset: f32,
}

/// Direction of the last probe relative to the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Initial,
    Undershot,
    Overshot,
}

/// Wrap decorated text so no row but the last measures wider than
/// `max_width`.
///
/// The final remaining segment is never forced to wrap, even when its width
/// equals the budget exactly; its width is returned as `col_offset` for
/// caret placement. A budget of zero (or anything narrower than a glyph)
/// degrades to one break per content character. The input must not contain
/// hard `\n` terminators; those are split off by the scrollback buffer
/// before wrapping.
pub fn wrap(decorated: &Decorated, max_width: f32, measure: &dyn Measure) -> WrapResult {
    let map = ContentMap::build(decorated.as_str());
    let (breaks, col_offset) = break_indices(&map, max_width, measure);

    if breaks.is_empty() {
        return WrapResult {
            wrapped: decorated.clone(),
            rows: 1,
            col_offset,
        };
    }

    let raw = decorated.as_str();
    let mut wrapped = String::with_capacity(raw.len() + BREAK.len() * breaks.len());
    let mut prev = 0;
    for &content_index in &breaks {
        let at = map.byte_after(content_index);
        wrapped.push_str(&raw[prev..at]);
        wrapped.push_str(BREAK);
        prev = at;
    }
    wrapped.push_str(&raw[prev..]);

    WrapResult {
        wrapped: Decorated::from(wrapped),
        rows: breaks.len() + 1,
        col_offset,
    }
}

/// Find the content indices at which to break, plus the trailing row width.
///
/// Indices are cumulative from the start of the content text and strictly
/// increasing, so each one is also the unit count consumed so far.
fn break_indices(
    map: &ContentMap,
    max_width: f32,
    measure: &dyn Measure,
) -> (SmallVec<[usize; 8]>, f32) {
    let mut breaks: SmallVec<[usize; 8]> = SmallVec::new();
    let mut consumed = 0;
    let total = map.content_len();

    loop {
        let remaining = map.tail(consumed);
        let remaining_units = total - consumed;
        let width = measure.extent(remaining).width;

        // The trailing segment is exempt: equal-to-budget stays unwrapped.
        if remaining_units == 0 || width <= max_width + WIDTH_EPSILON {
            return (breaks, width);
        }

        let accepted = converge(map, consumed, remaining_units, width, max_width, measure);
        consumed += accepted;
        breaks.push(consumed);
    }
}

/// Converge on the break index for the row starting at `consumed`.
///
/// Returns the number of content units the row takes, always at least 1 so
/// the outer scan makes progress even against a hostile measurer.
fn converge(
    map: &ContentMap,
    consumed: usize,
    remaining_units: usize,
    remaining_width: f32,
    max_width: f32,
    measure: &dyn Measure,
) -> usize {
    // Linear interpolation assuming uniform glyph width. Under- or
    // overshoots whenever the text mixes narrow and wide glyphs.
    let interpolated = ((remaining_units as f32) * max_width / remaining_width).floor() as usize;
    let mut guess = interpolated.clamp(1, remaining_units);
    let mut probe = Probe::Initial;

    for _ in 0..remaining_units + PROBE_SLACK {
        let line = map.slice(consumed, consumed + guess);
        let line_width = measure.extent(line).width;

        if (line_width - max_width).abs() <= WIDTH_EPSILON {
            // Exact hit on the budget.
            return guess;
        } else if line_width < max_width {
            match probe {
                // Direction flip: the previous probe was too wide, so the
                // current index is the largest that fits.
                Probe::Overshot => return guess,
                _ => {
                    if guess >= remaining_units {
                        return guess;
                    }
                    probe = Probe::Undershot;
                    guess += 1;
                }
            }
        } else {
            match probe {
                // Direction flip while growing: step back to the last index
                // that measured under the budget.
                Probe::Undershot => return guess - 1,
                _ => {
                    if guess <= 1 {
                        // A single glyph wider than the budget still takes
                        // a whole row.
                        return 1;
                    }
                    probe = Probe::Overshot;
                    guess -= 1;
                }
            }
        }
    }

    // Non-terminating measurer (non-finite or unstable widths). Force a
    // break at the interpolated guess so layout stays total.
    tracing::warn!(
        remaining_units,
        max_width,
        "width search did not converge; forcing break at interpolated guess"
    );
    interpolated.clamp(1, remaining_units)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::markup::escape;
    use crate::measure::{CellMetrics, Extent};

    const CELLS: CellMetrics = CellMetrics {
        cell_width: 8.0,
        cell_height: 16.0,
    };

    #[test]
    fn test_fit_is_identity() {
        let result = wrap(&"short".into(), 80.0, &CELLS);
        assert_eq!(result.wrapped.as_str(), "short");
        assert_eq!(result.rows, 1);
        assert_eq!(result.col_offset, 40.0);
    }

    #[test]
    fn test_exact_width_trailing_row_not_wrapped() {
        // Ten cells at 8px exactly fill an 80px budget.
        let result = wrap(&"0123456789".into(), 80.0, &CELLS);
        assert_eq!(result.rows, 1);
        assert_eq!(result.col_offset, 80.0);
    }

    #[test]
    fn test_uniform_narrow_break() {
        let result = wrap(&"0123456789ABCDE".into(), 80.0, &CELLS);
        assert_eq!(result.wrapped.as_str(), "0123456789<br>ABCDE");
        assert_eq!(result.rows, 2);
        assert_eq!(result.col_offset, 40.0);
    }

    #[test]
    fn test_narrow_then_wide_undershoot_recovers() {
        // 5 narrow + 5 wide glyphs = 15 cells; the uniform guess lands at 6
        // units and must creep upward before flipping.
        let result = wrap(&"12345一二三四五".into(), 80.0, &CELLS);
        assert_eq!(result.wrapped.as_str(), "12345一二<br>三四五");
        assert_eq!(result.rows, 2);
        // Interior row: 5 + 2*2 = 9 cells = 72px, under the 80px budget.
        assert_eq!(result.col_offset, 48.0);
    }

    #[test]
    fn test_wide_then_narrow_overshoot_recovers() {
        // 5 wide + 5 narrow = 15 cells; the uniform guess overshoots.
        let result = wrap(&"一二三四五12345".into(), 80.0, &CELLS);
        assert_eq!(result.wrapped.as_str(), "一二三四五<br>12345");
        assert_eq!(result.rows, 2);
    }

    #[test]
    fn test_multiple_breaks() {
        let result = wrap(&"0123456789012345678901234".into(), 80.0, &CELLS);
        assert_eq!(result.rows, 3);
        assert_eq!(
            result.wrapped.as_str(),
            "0123456789<br>0123456789<br>01234"
        );
        assert_eq!(result.col_offset, 40.0);
    }

    #[test]
    fn test_markup_preserved_verbatim() {
        let decorated = Decorated::from("<span style=\"color: red;\">0123456789ABCDE</span>");
        let result = wrap(&decorated, 80.0, &CELLS);
        assert_eq!(result.rows, 2);
        assert_eq!(
            result.wrapped.as_str(),
            "<span style=\"color: red;\">0123456789<br>ABCDE</span>"
        );
    }

    #[test]
    fn test_entity_counts_one_unit() {
        // "aaaaaaaaa<" escaped: the entity is unit ten of ten, so the row
        // fits exactly and nothing wraps.
        let result = wrap(&escape("aaaaaaaaa<"), 80.0, &CELLS);
        assert_eq!(result.rows, 1);
        assert_eq!(result.col_offset, 80.0);

        // One more unit pushes the entity's neighbor onto a second row.
        let result = wrap(&escape("aaaaaaaaa<b"), 80.0, &CELLS);
        assert_eq!(result.rows, 2);
        assert_eq!(result.wrapped.as_str(), "aaaaaaaaa&lt;<br>b");
    }

    #[test]
    fn test_zero_budget_breaks_every_unit() {
        let result = wrap(&"abc".into(), 0.0, &CELLS);
        assert_eq!(result.wrapped.as_str(), "a<br>b<br>c<br>");
        assert_eq!(result.rows, 4);
        assert_eq!(result.col_offset, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let result = wrap(&Decorated::new(), 80.0, &CELLS);
        assert_eq!(result.rows, 1);
        assert_eq!(result.col_offset, 0.0);
        assert!(result.wrapped.is_empty());
    }

    #[test]
    fn test_single_glyph_wider_than_budget() {
        // A wide glyph is 16px; an 8px budget still gives it a whole row.
        let result = wrap(&"一二".into(), 8.0, &CELLS);
        assert_eq!(result.wrapped.as_str(), "一<br>二");
        assert_eq!(result.rows, 2);
    }

    #[test]
    fn test_hostile_measurer_terminates() {
        struct Hostile;
        impl Measure for Hostile {
            fn extent(&self, text: &str) -> Extent {
                if text.len() > 4 {
                    Extent::new(f32::NAN, 16.0)
                } else {
                    Extent::new(text.chars().count() as f32 * 8.0, 16.0)
                }
            }
        }
        // Must not loop forever; forced breaks keep the scan advancing.
        let result = wrap(&"abcdefghij".into(), 16.0, &Hostile);
        assert!(result.rows >= 2);
    }

    #[test]
    fn test_interior_rows_within_budget() {
        let text = Decorated::from("ab一cd二ef三gh四ij五kl六");
        let result = wrap(&text, 56.0, &CELLS);
        let rows: Vec<&str> = result.wrapped.as_str().split(BREAK).collect();
        for row in &rows[..rows.len() - 1] {
            let map = ContentMap::build(row);
            assert!(CELLS.extent(map.text()).width <= 56.0 + WIDTH_EPSILON);
        }
    }
}
