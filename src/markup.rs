//! Decorated-text scanning: tags, entities, and the content/byte coordinate map.
//!
//! Decorated text mixes content characters with inline markup: tags run from
//! `<` to the next `>`, and the entities `&lt;`, `&gt;`, `&amp;` each encode
//! one raw special character. Markup is preserved verbatim through wrapping
//! but contributes nothing to measured width; an entity contributes exactly
//! one content unit. Positions therefore live in two coordinate systems at
//! once - byte offsets into the decorated string and content indices into the
//! measured text - and [`ContentMap`] is the bridge between them.
//!
//! # Example
//!
//! ```
//! use dashline::markup::{classify, escape, SegmentKind};
//!
//! let decorated = escape("a<b");
//! assert_eq!(decorated.as_str(), "a&lt;b");
//!
//! let segments = classify("<span>hi</span>");
//! assert_eq!(segments[0].kind, SegmentKind::Markup);
//! assert_eq!(segments[1].kind, SegmentKind::Content);
//! ```

use std::fmt;
use std::ops::Range;

/// The soft break marker spliced in by the wrapper.
pub const BREAK: &str = "<br>";

/// Entity tokens and the raw character each one encodes.
const ENTITIES: [(&str, char); 3] = [("&lt;", '<'), ("&gt;", '>'), ("&amp;", '&')];

/// An immutable run of markup-decorated text.
///
/// Values are trusted to be well-formed: tags well-nested, special characters
/// entity-encoded outside tags. Use [`escape`] to lift raw user text into
/// decorated form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decorated(String);

impl Decorated {
    /// Create an empty decorated string.
    pub fn new() -> Self {
        Self(String::new())
    }

    /// View the underlying decorated text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if there is no text at all, markup included.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Append already-decorated text verbatim.
    pub fn push_str(&mut self, decorated: &str) {
        self.0.push_str(decorated);
    }

    /// Append a single raw character that needs no encoding (e.g. `\n`).
    pub fn push(&mut self, ch: char) {
        debug_assert!(!matches!(ch, '<' | '>' | '&'));
        self.0.push(ch);
    }
}

impl From<String> for Decorated {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Decorated {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Decorated {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Decorated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode `<`, `>` and `&` so raw text can join decorated output.
pub fn escape(raw: &str) -> Decorated {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
    Decorated(out)
}

/// Classification of one byte range of decorated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Plain content; every character is one content unit.
    Content,
    /// An entity token, measured as the single character it encodes.
    Entity(char),
    /// Tag markup; zero content units, zero measured width.
    Markup,
}

/// One classified byte range of a decorated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Byte range into the decorated string.
    pub range: Range<usize>,
    /// What the range is.
    pub kind: SegmentKind,
    /// Content units the range contributes.
    pub units: usize,
}

/// Walk a decorated string and classify every byte range.
///
/// A tag starts at `<` and ends at the next `>`, inclusive; an unterminated
/// tag degrades to markup running to the end of the string. Consecutive
/// plain characters coalesce into a single `Content` segment. Pure function,
/// total over its input.
pub fn classify(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut i = 0;
    let mut content_start: Option<usize> = None;

    let flush = |segments: &mut Vec<Segment>, start: &mut Option<usize>, end: usize| {
        if let Some(s) = start.take() {
            let units = text[s..end].chars().count();
            segments.push(Segment {
                range: s..end,
                kind: SegmentKind::Content,
                units,
            });
        }
    };

    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with('<') {
            flush(&mut segments, &mut content_start, i);
            let end = rest.find('>').map_or(text.len(), |p| i + p + 1);
            segments.push(Segment {
                range: i..end,
                kind: SegmentKind::Markup,
                units: 0,
            });
            i = end;
        } else if let Some(&(token, ch)) = ENTITIES.iter().find(|(t, _)| rest.starts_with(t)) {
            flush(&mut segments, &mut content_start, i);
            segments.push(Segment {
                range: i..i + token.len(),
                kind: SegmentKind::Entity(ch),
                units: 1,
            });
            i += token.len();
        } else {
            if content_start.is_none() {
                content_start = Some(i);
            }
            let ch_len = rest.chars().next().map_or(1, char::len_utf8);
            i += ch_len;
        }
    }
    flush(&mut segments, &mut content_start, text.len());

    segments
}

/// Bidirectional content-index / byte-offset translation table.
///
/// Built once per wrap call. Holds the decoded content text (entities
/// collapsed to their raw character) alongside, for each content unit, the
/// byte offset in the decorated string just past that unit - the splice
/// point for a break inserted after it.
#[derive(Debug, Clone)]
pub struct ContentMap {
    /// Decoded content text, markup stripped.
    text: String,
    /// Byte start in `text` of each content unit, plus an end sentinel.
    starts: Vec<usize>,
    /// Byte offset in the decorated string just after each content unit.
    raw_after: Vec<usize>,
}

impl ContentMap {
    /// Build the table for a decorated string.
    pub fn build(decorated: &str) -> Self {
        let segments = classify(decorated);
        let mut text = String::new();
        let mut starts = Vec::new();
        let mut raw_after = Vec::new();

        for segment in &segments {
            match segment.kind {
                SegmentKind::Content => {
                    let slice = &decorated[segment.range.clone()];
                    for (off, ch) in slice.char_indices() {
                        starts.push(text.len());
                        text.push(ch);
                        raw_after.push(segment.range.start + off + ch.len_utf8());
                    }
                }
                SegmentKind::Entity(ch) => {
                    starts.push(text.len());
                    text.push(ch);
                    raw_after.push(segment.range.end);
                }
                SegmentKind::Markup => {}
            }
        }
        starts.push(text.len());

        Self {
            text,
            starts,
            raw_after,
        }
    }

    /// Number of content units.
    pub fn content_len(&self) -> usize {
        self.raw_after.len()
    }

    /// The decoded, markup-free content text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Decoded content between two content indices.
    pub fn slice(&self, from: usize, to: usize) -> &str {
        &self.text[self.starts[from]..self.starts[to]]
    }

    /// Decoded content from a content index to the end.
    pub fn tail(&self, from: usize) -> &str {
        &self.text[self.starts[from]..]
    }

    /// Byte offset in the decorated string where a break inserted after
    /// `content_index` units lands.
    pub fn byte_after(&self, content_index: usize) -> usize {
        debug_assert!(content_index >= 1);
        self.raw_after[content_index - 1]
    }
}
