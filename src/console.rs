//! The line-editor state machine.
//!
//! [`Console`] is the single-owner mutable state behind the widget: edit
//! text and cursor, submission phase, history, completion paging, scrollback
//! and caret. Every operation runs to completion synchronously inside one
//! event-handler call; the host event loop serializes keystrokes and
//! arriving command output, so no locking exists anywhere in the core.
//!
//! Instead of storing callbacks, event handlers return a [`ConsoleEvent`]
//! describing what the host must do next: forward a submitted line to its
//! command executor (and call [`Console::finish`] once it completes), or
//! supply completion candidates.
//!
//! # Example
//!
//! ```
//! use dashline::console::{Console, ConsoleEvent};
//! use dashline::events::{KeyCode, KeyEvent};
//! use dashline::measure::CellMetrics;
//!
//! let mut console = Console::new(CellMetrics::new(8.0, 16.0), 640.0);
//! for ch in "ls".chars() {
//!     console.handle_key(&KeyEvent::plain(KeyCode::Char(ch)));
//! }
//! let event = console.handle_key(&KeyEvent::plain(KeyCode::Enter));
//! assert_eq!(event, ConsoleEvent::Submitted("ls".to_string()));
//! // ... run the command, write its output, then:
//! console.finish();
//! ```

use crate::caret::{self, Blink, CaretPosition};
use crate::clipboard;
use crate::events::{KeyCode, KeyEvent};
use crate::history::History;
use crate::markup::{escape, Decorated};
use crate::measure::Measure;
use crate::scrollback::Scrollback;
use crate::style::{Color, ConsoleStyle};
use crate::wrap::{wrap, WrapResult};

/// Completion candidates shown per page.
pub const COMPLETION_PAGE: usize = 4;

/// Submission phase of the edit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing pending.
    #[default]
    Idle,
    /// The user is typing.
    Composing,
    /// A line was handed to the executor; character input is rejected until
    /// [`Console::finish`] is called.
    Submitted,
}

/// What the host must do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// Nothing observable happened.
    Ignored,
    /// Text, cursor, or layout changed; repaint.
    Edited,
    /// A non-empty trimmed line was submitted. Forward it to the command
    /// executor and call [`Console::finish`] when the command completes.
    Submitted(String),
    /// Tab was pressed with no candidate list loaded. Ask the completion
    /// collaborator for candidates for this input, then call
    /// [`Console::set_completions`].
    CompletionsRequested(String),
}

/// Errors from the configuration surface.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Viewport widths must be finite and non-negative.
    #[error("viewport width must be finite and non-negative, got {0}")]
    InvalidWidth(f32),
    /// Font sizes must be finite and positive.
    #[error("font size must be finite and positive, got {0}")]
    InvalidFontSize(f32),
    /// The measurer reported a nonsensical unit glyph.
    #[error("measurer returned a non-finite or negative unit glyph: {0}x{1}")]
    InvalidMetrics(f32, f32),
}

/// The raw text being composed and the cursor within it.
///
/// The cursor is a character index into `raw`; it is reconciled into
/// content-index space only when the text is escaped for layout.
#[derive(Debug, Clone, Default)]
pub struct EditState {
    raw: String,
    cursor: usize,
}

impl EditState {
    /// The text as typed, unescaped.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Cursor position as a character index in `[0, len]`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_len(&self) -> usize {
        self.raw.chars().count()
    }

    fn byte_at(&self, char_index: usize) -> usize {
        self.raw
            .char_indices()
            .nth(char_index)
            .map_or(self.raw.len(), |(b, _)| b)
    }

    fn insert(&mut self, ch: char) {
        let at = self.byte_at(self.cursor);
        self.raw.insert(at, ch);
        self.cursor += 1;
    }

    fn insert_str(&mut self, text: &str) {
        let at = self.byte_at(self.cursor);
        self.raw.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_at(self.cursor - 1);
        self.raw.remove(at);
        self.cursor -= 1;
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_at(self.cursor);
        self.raw.remove(at);
        true
    }

    fn load(&mut self, text: &str) {
        text.clone_into(&mut self.raw);
        self.cursor = self.char_len();
    }

    fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.raw)
    }
}

/// Tab-completion paging over a candidate list.
#[derive(Debug, Clone)]
struct CompletionPager {
    candidates: Vec<String>,
    page: usize,
}

impl CompletionPager {
    fn visible(&self) -> &[String] {
        let from = self.page * COMPLETION_PAGE;
        let to = (from + COMPLETION_PAGE).min(self.candidates.len());
        &self.candidates[from..to]
    }

    fn advance(&mut self) {
        let next = (self.page + 1) * COMPLETION_PAGE;
        self.page = if next >= self.candidates.len() {
            0
        } else {
            self.page + 1
        };
    }
}

/// Single-owner state of the terminal-style line editor.
pub struct Console<M: Measure> {
    style: ConsoleStyle,
    measure: M,
    viewport_width: f32,
    scrollback: Scrollback,
    edit: EditState,
    phase: Phase,
    history: History,
    prefix: Decorated,
    completions: Option<CompletionPager>,
    blink: Blink,
    caret: CaretPosition,
}

impl<M: Measure> Console<M> {
    /// Create a console over an injected measurer and viewport width.
    pub fn new(measure: M, viewport_width: f32) -> Self {
        Self {
            style: ConsoleStyle::default(),
            measure,
            viewport_width,
            scrollback: Scrollback::new(),
            edit: EditState::default(),
            phase: Phase::Idle,
            history: History::new(),
            prefix: Decorated::new(),
            completions: None,
            blink: Blink::new(),
            caret: CaretPosition::default(),
        }
    }

    /// Usable text width: viewport minus horizontal padding.
    pub fn max_width(&self) -> f32 {
        (self.viewport_width - self.style.padding.left - self.style.padding.right).max(0.0)
    }

    /// Current caret placement.
    pub fn caret(&self) -> &CaretPosition {
        &self.caret
    }

    /// Current submission phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The edit line state.
    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    /// The scrollback buffer.
    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// The submission history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The configuration surface.
    pub fn style(&self) -> &ConsoleStyle {
        &self.style
    }

    /// Caret blink state, driven by the host loop. Restart it after any
    /// event that moved the caret.
    pub fn blink_mut(&mut self) -> &mut Blink {
        &mut self.blink
    }

    /// Completion candidates on the current page; empty when none loaded.
    pub fn visible_completions(&self) -> &[String] {
        self.completions.as_ref().map_or(&[], CompletionPager::visible)
    }

    /// Set the prompt prefix written whenever a command finishes.
    pub fn set_prefix(&mut self, prefix: Decorated) {
        self.prefix = prefix;
    }

    /// Set text and/or background color; each applies independently.
    pub fn set_color(&mut self, text: Option<Color>, background: Option<Color>) {
        if let Some(color) = text {
            self.style.text_color = color;
        }
        if let Some(color) = background {
            self.style.background_color = color;
        }
    }

    /// Change font family and/or size.
    ///
    /// Any change re-measures the unit glyph through the measurer and
    /// triggers a full re-wrap, since every cached width is stale.
    pub fn set_font(
        &mut self,
        family: Option<&str>,
        size_px: Option<f32>,
    ) -> Result<(), ConsoleError> {
        if let Some(name) = family {
            name.clone_into(&mut self.style.font_family);
        }
        if let Some(px) = size_px {
            if !px.is_finite() || px <= 0.0 {
                return Err(ConsoleError::InvalidFontSize(px));
            }
            self.style.font_size = px;
        }
        self.measure
            .configure_font(&self.style.font_family, self.style.font_size);

        let unit = self.measure.unit();
        if !unit.is_sane() {
            return Err(ConsoleError::InvalidMetrics(unit.width, unit.height));
        }
        self.resize(self.viewport_width)
    }

    /// Update padding; unspecified sides keep their value. Horizontal
    /// changes narrow or widen the budget, so the buffer is re-wrapped.
    pub fn set_padding(
        &mut self,
        top: Option<f32>,
        right: Option<f32>,
        bottom: Option<f32>,
        left: Option<f32>,
    ) -> Result<(), ConsoleError> {
        if let Some(v) = top {
            self.style.padding.top = v;
        }
        if let Some(v) = right {
            self.style.padding.right = v;
        }
        if let Some(v) = bottom {
            self.style.padding.bottom = v;
        }
        if let Some(v) = left {
            self.style.padding.left = v;
        }
        self.resize(self.viewport_width)
    }

    /// Absorb externally arriving decorated output.
    ///
    /// Any uncommitted edit text is escaped and merged ahead of the new
    /// text, so an in-progress line joins the output stream seamlessly; the
    /// edit state is cleared. Hard `\n` terminators in `text` always force
    /// row breaks. Empty input is a no-op.
    pub fn write(&mut self, text: &Decorated) {
        if text.is_empty() {
            return;
        }
        let mut merged = Decorated::new();
        if !self.edit.raw.is_empty() {
            merged.push_str(escape(&self.edit.take()).as_str());
        }
        merged.push_str(text.as_str());

        self.scrollback
            .commit(&merged, self.max_width(), &self.measure);
        self.relayout_caret();
    }

    /// Signal from the executor that the running command completed.
    ///
    /// Leaves the `Submitted` phase and writes the prompt prefix.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
        let prefix = self.prefix.clone();
        self.write(&prefix);
    }

    /// The viewport was resized; re-wrap everything against the new width.
    ///
    /// This is the single most expensive operation: it rebuilds committed
    /// rows, the trailing row, row counts and the caret from scratch. It is
    /// expected on viewport resize, not per keystroke.
    pub fn resize(&mut self, viewport_width: f32) -> Result<(), ConsoleError> {
        if !viewport_width.is_finite() || viewport_width < 0.0 {
            return Err(ConsoleError::InvalidWidth(viewport_width));
        }
        self.viewport_width = viewport_width;
        self.scrollback.rewrap(self.max_width(), &self.measure);
        self.relayout_caret();
        tracing::debug!(
            viewport_width,
            rows = self.scrollback.rows(),
            "console resized"
        );
        Ok(())
    }

    /// Handle one key event. Returns what the host must do next.
    pub fn handle_key(&mut self, event: &KeyEvent) -> ConsoleEvent {
        match event.code {
            KeyCode::Char(ch) => self.insert_char(ch),
            KeyCode::Backspace => self.edit_with(EditState::backspace),
            KeyCode::Delete => self.edit_with(EditState::delete),
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Home => self.move_cursor_to(0),
            KeyCode::End => self.move_cursor_to(self.edit.char_len()),
            KeyCode::Up => self.navigate(History::up),
            KeyCode::Down => self.navigate(History::down),
            KeyCode::Tab => self.complete(),
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => ConsoleEvent::Ignored,
        }
    }

    /// Insert normalized external text at the cursor.
    ///
    /// Row terminators in the pasted text are collapsed to single spaces
    /// before insertion; no paste can introduce a row terminator.
    pub fn paste(&mut self, text: &str) -> ConsoleEvent {
        if self.phase == Phase::Submitted || text.is_empty() {
            return ConsoleEvent::Ignored;
        }
        let normalized = clipboard::normalize(text);
        self.completions = None;
        self.edit.insert_str(&normalized);
        self.phase = Phase::Composing;
        self.history.record_draft(&self.edit.raw);
        self.relayout_caret();
        ConsoleEvent::Edited
    }

    /// Normalize selected text for the system clipboard: row terminators
    /// become single spaces before the text leaves the widget.
    pub fn copy_selection(&self, selected: &str) -> String {
        clipboard::normalize(selected)
    }

    /// Load externally produced completion candidates, opening the pager at
    /// the first page.
    pub fn set_completions(&mut self, candidates: Vec<String>) {
        self.completions = Some(CompletionPager {
            candidates,
            page: 0,
        });
    }

    /// Layout of the trailing row plus the current edit text, for painting
    /// the in-progress row(s).
    pub fn edit_layout(&self) -> WrapResult {
        let mut probe = self.scrollback.trailing().clone();
        probe.push_str(escape(&self.edit.raw).as_str());
        wrap(&probe, self.max_width(), &self.measure)
    }

    /// Total visual rows: scrollback rows plus any extra rows the edit text
    /// wraps onto.
    pub fn total_rows(&self) -> usize {
        self.scrollback.rows() + self.edit_layout().rows - 1
    }

    fn insert_char(&mut self, ch: char) -> ConsoleEvent {
        if self.phase == Phase::Submitted {
            // Busy: the executor owns the line until finish().
            return ConsoleEvent::Ignored;
        }
        self.completions = None;
        self.edit.insert(ch);
        self.phase = Phase::Composing;
        self.history.record_draft(&self.edit.raw);
        self.relayout_caret();
        ConsoleEvent::Edited
    }

    fn edit_with(&mut self, op: fn(&mut EditState) -> bool) -> ConsoleEvent {
        if self.phase == Phase::Submitted {
            return ConsoleEvent::Ignored;
        }
        if !op(&mut self.edit) {
            return ConsoleEvent::Ignored;
        }
        self.completions = None;
        self.history.record_draft(&self.edit.raw);
        self.relayout_caret();
        ConsoleEvent::Edited
    }

    fn move_cursor(&mut self, delta: isize) -> ConsoleEvent {
        let target = self.edit.cursor as isize + delta;
        if target < 0 || target > self.edit.char_len() as isize {
            return ConsoleEvent::Ignored;
        }
        self.move_cursor_to(target as usize)
    }

    fn move_cursor_to(&mut self, cursor: usize) -> ConsoleEvent {
        if cursor == self.edit.cursor {
            return ConsoleEvent::Ignored;
        }
        self.edit.cursor = cursor;
        self.relayout_caret();
        ConsoleEvent::Edited
    }

    fn navigate(&mut self, step: for<'a> fn(&'a mut History) -> Option<&'a str>) -> ConsoleEvent {
        let Some(text) = step(&mut self.history).map(str::to_string) else {
            return ConsoleEvent::Ignored;
        };
        self.completions = None;
        self.edit.load(&text);
        self.relayout_caret();
        ConsoleEvent::Edited
    }

    fn complete(&mut self) -> ConsoleEvent {
        match &mut self.completions {
            None => ConsoleEvent::CompletionsRequested(self.edit.raw.trim().to_string()),
            Some(pager) => {
                pager.advance();
                ConsoleEvent::Edited
            }
        }
    }

    fn submit(&mut self) -> ConsoleEvent {
        self.completions = None;
        let text = self.edit.take().trim().to_string();

        if text.is_empty() {
            self.write(&Decorated::from("\n"));
            if self.phase != Phase::Submitted {
                self.history.reset_to_tail();
                self.finish();
            }
            return ConsoleEvent::Edited;
        }

        let mut echo = escape(&text);
        echo.push('\n');
        self.write(&echo);

        if self.phase == Phase::Submitted {
            // Busy: echoed into the output stream, but not executed.
            return ConsoleEvent::Edited;
        }
        self.history.submit(&text);
        self.phase = Phase::Submitted;
        tracing::debug!(chars = text.chars().count(), "line submitted");
        ConsoleEvent::Submitted(text)
    }

    fn relayout_caret(&mut self) {
        self.caret = caret::locate(
            &self.scrollback,
            &self.edit.raw,
            self.edit.cursor,
            self.max_width(),
            &self.measure,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::measure::CellMetrics;

    fn console() -> Console<CellMetrics> {
        // 80px usable: 86px viewport minus default 3px left padding and a
        // right padding of 3px set below.
        let mut console = Console::new(CellMetrics::new(8.0, 16.0), 86.0);
        console
            .set_padding(None, Some(3.0), None, None)
            .expect("padding");
        console
    }

    fn type_line(console: &mut Console<CellMetrics>, text: &str) {
        for ch in text.chars() {
            console.handle_key(&KeyEvent::plain(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_usable_width_subtracts_padding() {
        let console = console();
        assert_eq!(console.max_width(), 80.0);
    }

    #[test]
    fn test_typing_moves_caret() {
        let mut console = console();
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Char('a')));
        assert_eq!(event, ConsoleEvent::Edited);
        assert_eq!(console.phase(), Phase::Composing);
        assert_eq!(console.caret().col, 8.0);
        assert_eq!(console.caret().row, 1);
    }

    #[test]
    fn test_submit_echoes_and_reports() {
        let mut console = console();
        type_line(&mut console, "run it");
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert_eq!(event, ConsoleEvent::Submitted("run it".to_string()));
        assert_eq!(console.phase(), Phase::Submitted);
        assert_eq!(console.scrollback().committed().as_str(), "run it\n");
        assert_eq!(console.edit().raw(), "");
    }

    #[test]
    fn test_submission_trims_whitespace() {
        let mut console = console();
        type_line(&mut console, "  ls  ");
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert_eq!(event, ConsoleEvent::Submitted("ls".to_string()));
    }

    #[test]
    fn test_char_input_rejected_while_busy() {
        let mut console = console();
        type_line(&mut console, "x");
        console.handle_key(&KeyEvent::plain(KeyCode::Enter));

        let event = console.handle_key(&KeyEvent::plain(KeyCode::Char('y')));
        assert_eq!(event, ConsoleEvent::Ignored);
        assert_eq!(console.edit().raw(), "");

        console.finish();
        assert_eq!(console.phase(), Phase::Idle);
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Char('y')));
        assert_eq!(event, ConsoleEvent::Edited);
    }

    #[test]
    fn test_empty_enter_commits_bare_newline() {
        let mut console = console();
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert_eq!(event, ConsoleEvent::Edited);
        assert_eq!(console.phase(), Phase::Idle);
        assert_eq!(console.scrollback().committed().as_str(), "\n");
        assert_eq!(console.scrollback().rows(), 2);
        assert_eq!(console.history().len(), 1);
    }

    #[test]
    fn test_finish_writes_prefix() {
        let mut console = console();
        console.set_prefix(Decorated::from("$ "));
        type_line(&mut console, "go");
        console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        console.finish();
        assert_eq!(console.scrollback().trailing().as_str(), "$ ");
        assert_eq!(console.caret().col, 16.0);
    }

    #[test]
    fn test_write_absorbs_pending_edit_text() {
        let mut console = console();
        type_line(&mut console, "pend");
        console.write(&Decorated::from("out\n"));
        assert_eq!(console.edit().raw(), "");
        assert_eq!(console.scrollback().committed().as_str(), "pendout\n");
    }

    #[test]
    fn test_write_escapes_absorbed_edit_text() {
        let mut console = console();
        type_line(&mut console, "a<b");
        console.write(&Decorated::from("\n"));
        assert_eq!(console.scrollback().committed().as_str(), "a&lt;b\n");
    }

    #[test]
    fn test_history_up_recalls_then_down_returns() {
        let mut console = console();
        type_line(&mut console, "first");
        console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        console.finish();

        assert_eq!(
            console.handle_key(&KeyEvent::plain(KeyCode::Up)),
            ConsoleEvent::Edited
        );
        assert_eq!(console.edit().raw(), "first");
        assert_eq!(console.edit().cursor(), 5);

        console.handle_key(&KeyEvent::plain(KeyCode::Down));
        assert_eq!(console.edit().raw(), "");
    }

    #[test]
    fn test_history_up_at_head_is_noop() {
        let mut console = console();
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Up));
        assert_eq!(event, ConsoleEvent::Ignored);
        assert_eq!(console.edit().raw(), "");
        assert_eq!(console.caret().col, 0.0);
    }

    #[test]
    fn test_history_preserves_draft_across_navigation() {
        let mut console = console();
        type_line(&mut console, "old");
        console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        console.finish();

        console.handle_key(&KeyEvent::plain(KeyCode::Up));
        type_line(&mut console, "ish"); // draft: "oldish"
        console.handle_key(&KeyEvent::plain(KeyCode::Down));
        console.handle_key(&KeyEvent::plain(KeyCode::Up));
        assert_eq!(console.edit().raw(), "oldish");
    }

    #[test]
    fn test_cursor_movement_bounds() {
        let mut console = console();
        type_line(&mut console, "ab");
        assert_eq!(
            console.handle_key(&KeyEvent::plain(KeyCode::Right)),
            ConsoleEvent::Ignored
        );
        console.handle_key(&KeyEvent::plain(KeyCode::Left));
        console.handle_key(&KeyEvent::plain(KeyCode::Left));
        assert_eq!(console.edit().cursor(), 0);
        assert_eq!(
            console.handle_key(&KeyEvent::plain(KeyCode::Left)),
            ConsoleEvent::Ignored
        );
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut console = console();
        type_line(&mut console, "abc");
        console.handle_key(&KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(console.edit().raw(), "ab");
        console.handle_key(&KeyEvent::plain(KeyCode::Home));
        console.handle_key(&KeyEvent::plain(KeyCode::Delete));
        assert_eq!(console.edit().raw(), "b");
        assert_eq!(console.history().current().draft(), "b");
    }

    #[test]
    fn test_paste_normalizes_terminators() {
        let mut console = console();
        let event = console.paste("line1\r\nline2");
        assert_eq!(event, ConsoleEvent::Edited);
        assert_eq!(console.edit().raw(), "line1 line2");
        assert_eq!(console.edit().cursor(), 11);
    }

    #[test]
    fn test_paste_at_cursor_position() {
        let mut console = console();
        type_line(&mut console, "ad");
        console.handle_key(&KeyEvent::plain(KeyCode::Left));
        console.paste("bc");
        assert_eq!(console.edit().raw(), "abcd");
        assert_eq!(console.edit().cursor(), 3);
    }

    #[test]
    fn test_copy_selection_normalizes() {
        let console = console();
        assert_eq!(console.copy_selection("a\nb\r\nc"), "a b c");
    }

    #[test]
    fn test_tab_requests_then_pages() {
        let mut console = console();
        type_line(&mut console, "cd ");
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Tab));
        assert_eq!(
            event,
            ConsoleEvent::CompletionsRequested("cd".to_string())
        );

        let candidates: Vec<String> = (0..6).map(|i| format!("dir{}", i)).collect();
        console.set_completions(candidates);
        assert_eq!(console.visible_completions().len(), 4);
        assert_eq!(console.visible_completions()[0], "dir0");

        console.handle_key(&KeyEvent::plain(KeyCode::Tab));
        assert_eq!(console.visible_completions(), ["dir4", "dir5"]);

        // Past the end: wraps to the first page.
        console.handle_key(&KeyEvent::plain(KeyCode::Tab));
        assert_eq!(console.visible_completions()[0], "dir0");
    }

    #[test]
    fn test_typing_invalidates_completions() {
        let mut console = console();
        console.set_completions(vec!["a".to_string()]);
        console.handle_key(&KeyEvent::plain(KeyCode::Char('x')));
        assert!(console.visible_completions().is_empty());
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Tab));
        assert_eq!(event, ConsoleEvent::CompletionsRequested("x".to_string()));
    }

    #[test]
    fn test_resize_rewraps_and_replaces_caret() {
        let mut console = console();
        console.write(&Decorated::from("0123456789ABCDE"));
        assert_eq!(console.scrollback().rows(), 2);

        console.resize(486.0).expect("resize");
        assert_eq!(console.scrollback().rows(), 1);
        assert_eq!(console.caret().row, 1);
        assert_eq!(console.caret().col, 120.0);
    }

    #[test]
    fn test_resize_rejects_nonsense_width() {
        let mut console = console();
        assert!(console.resize(f32::NAN).is_err());
        assert!(console.resize(-5.0).is_err());
    }

    #[test]
    fn test_set_font_rescales_and_rewraps() {
        let mut console = console();
        console.write(&Decorated::from("0123456789ABCDE"));
        assert_eq!(console.scrollback().rows(), 2);

        // Smaller font: 5px cells, everything fits on one row.
        console.set_font(None, Some(5.0 / 0.6)).expect("font");
        assert_eq!(console.scrollback().rows(), 1);
    }

    #[test]
    fn test_set_font_rejects_nonsense_size() {
        let mut console = console();
        assert!(console.set_font(None, Some(0.0)).is_err());
        assert!(console.set_font(None, Some(f32::NAN)).is_err());
    }

    #[test]
    fn test_total_rows_includes_wrapped_edit_text() {
        let mut console = console();
        type_line(&mut console, "0123456789AB");
        assert_eq!(console.scrollback().rows(), 1);
        assert_eq!(console.total_rows(), 2);
    }

    #[test]
    fn test_wide_chars_wrap_edit_line() {
        let mut console = console();
        // Six wide glyphs = 12 cells; 10 fit per row.
        type_line(&mut console, "一二三四五六");
        assert_eq!(console.caret().row, 2);
        assert_eq!(console.caret().col, 16.0);
    }

    #[test]
    fn test_enter_while_busy_echoes_without_event() {
        let mut console = console();
        type_line(&mut console, "first");
        console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert_eq!(console.phase(), Phase::Submitted);

        // History navigation is still allowed while busy; load "first".
        console.handle_key(&KeyEvent::plain(KeyCode::Up));
        assert_eq!(console.edit().raw(), "first");
        let event = console.handle_key(&KeyEvent::plain(KeyCode::Enter));
        assert_eq!(event, ConsoleEvent::Edited);
        assert_eq!(console.phase(), Phase::Submitted);
        // Echoed but not submitted: history still has one closed slot.
        assert_eq!(console.history().len(), 2);
    }
}
