//! Layout and state core for a terminal-style line editor.
//!
//! `dashline` implements the text pipeline behind an interactive console
//! widget: markup-aware pixel-width line wrapping, scrollback row
//! accounting, the edit line with submission history, and caret placement.
//! It owns no rendering surface and spawns no threads; the host supplies a
//! [`measure::Measure`] implementation for pixel widths and drives the core
//! through [`console::Console`] from its own event loop.
//!
//! # Decorated text
//!
//! Output lives in a single decorated representation ([`markup::Decorated`]):
//! inline markup tags contribute zero width, character entities count as one
//! unit, `<br>` marks a wrap-inserted soft break, and `\n` terminates a row
//! unconditionally. User input is escaped into this form before it joins the
//! output stream, so typed `<` and `&` can never be parsed as markup.
//!
//! # Wrapping
//!
//! Row breaks are found by a convergence search ([`wrap`]): an interpolated
//! first guess based on measured width, refined one content unit at a time
//! until the fit boundary is crossed. For roughly uniform glyph widths this
//! touches only a handful of candidate indices per row.
//!
//! # Example
//!
//! ```
//! use dashline::console::{Console, ConsoleEvent};
//! use dashline::events::{KeyCode, KeyEvent};
//! use dashline::markup::Decorated;
//! use dashline::measure::CellMetrics;
//!
//! let mut console = Console::new(CellMetrics::new(8.0, 16.0), 640.0);
//! console.write(&Decorated::from("ready\n"));
//!
//! for ch in "echo hi".chars() {
//!     console.handle_key(&KeyEvent::plain(KeyCode::Char(ch)));
//! }
//! match console.handle_key(&KeyEvent::plain(KeyCode::Enter)) {
//!     ConsoleEvent::Submitted(line) => assert_eq!(line, "echo hi"),
//!     other => panic!("expected submission, got {:?}", other),
//! }
//! ```

pub mod caret;
pub mod clipboard;
pub mod console;
pub mod events;
pub mod history;
pub mod markup;
pub mod measure;
pub mod scrollback;
pub mod style;
pub mod wrap;

pub use caret::{Blink, CaretPosition};
pub use console::{Console, ConsoleError, ConsoleEvent, Phase};
pub use events::{KeyCode, KeyEvent, KeyModifiers};
pub use markup::{escape, Decorated};
pub use measure::{CellMetrics, Extent, Measure};
pub use scrollback::Scrollback;
pub use style::{Color, ConsoleStyle, Padding};
pub use wrap::{wrap, WrapResult};
