//! Submission history with per-entry draft buffers.
//!
//! The log is append-only: exactly one open, unsubmitted entry sits at the
//! tail at all times, created on construction and again after every
//! submission. Navigating away from an entry preserves any unsent edits in
//! its draft, so coming back restores what was typed rather than the
//! originally submitted value.

/// One history slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    submitted: String,
    draft: String,
}

impl Entry {
    /// The value submitted from this slot; empty for the open tail.
    pub fn submitted(&self) -> &str {
        &self.submitted
    }

    /// Unsent edits made while navigated to this slot.
    pub fn draft(&self) -> &str {
        &self.draft
    }
}

/// Append-only submission log with a navigation index.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Entry>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a log holding one open tail entry.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::default()],
            index: 0,
        }
    }

    /// Number of entries, the open tail included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the open tail entry exists from construction on.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Current navigation index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The entry currently navigated to.
    pub fn current(&self) -> &Entry {
        &self.entries[self.index]
    }

    /// Store in-progress edit text as the draft of the current entry.
    pub fn record_draft(&mut self, text: &str) {
        text.clone_into(&mut self.entries[self.index].draft);
    }

    /// Navigate one entry up (older). Returns the text to load: the draft if
    /// one exists, otherwise the submitted value. No-op at the head.
    pub fn up(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.loaded_text())
    }

    /// Navigate one entry down (newer). No-op at the tail.
    pub fn down(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.loaded_text())
    }

    /// Close the current tail with a submitted value and open a new one.
    ///
    /// The draft of the entry navigated to is cleared (its edits were just
    /// consumed by the submission) and navigation moves to the fresh tail.
    pub fn submit(&mut self, text: &str) {
        let tail = self.entries.len() - 1;
        text.clone_into(&mut self.entries[tail].submitted);
        self.entries[self.index].draft.clear();
        self.entries.push(Entry::default());
        self.index = self.entries.len() - 1;
    }

    /// Discard the tail draft and snap navigation back to the tail. Used
    /// when an empty line is entered.
    pub fn reset_to_tail(&mut self) {
        let tail = self.entries.len() - 1;
        self.entries[tail].draft.clear();
        self.index = tail;
    }

    fn loaded_text(&self) -> &str {
        let entry = &self.entries[self.index];
        if entry.draft.is_empty() {
            &entry.submitted
        } else {
            &entry.draft
        }
    }
}
