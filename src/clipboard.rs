//! Clipboard normalization and OSC 52 emission.
//!
//! Text leaving or entering the widget crosses a row-structure boundary:
//! inside, rows are an artifact of wrapping; outside, nobody wants the soft
//! breaks. Every row terminator (`\r\n`, `\r`, `\n`) in copied or pasted
//! text is therefore collapsed to a single space before it crosses.
//!
//! Copying uses the OSC 52 escape sequence, which sets the system clipboard
//! through the terminal without platform-specific libraries. The sequence is
//! written to a caller-supplied writer so the core itself stays free of
//! stdout handles.
//!
//! # Example
//!
//! ```
//! use dashline::clipboard;
//!
//! assert_eq!(clipboard::normalize("line1\r\nline2"), "line1 line2");
//!
//! let seq = clipboard::copy_sequence("Hello");
//! assert!(seq.starts_with("\x1b]52;c;"));
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::io::{self, Write};

/// Collapse every row terminator to a single space.
///
/// Applied to selections on copy and to incoming text on paste, so no row
/// terminator ever crosses the widget boundary.
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Build the OSC 52 copy sequence for (normalized) text.
pub fn copy_sequence(text: &str) -> String {
    let encoded = BASE64.encode(normalize(text));
    format!("\x1b]52;c;{}\x07", encoded)
}

/// Write the OSC 52 copy sequence for `text` to `writer`.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn copy_to<W: Write>(writer: &mut W, text: &str) -> io::Result<()> {
    writer.write_all(copy_sequence(text).as_bytes())?;
    writer.flush()
}
