//! Widget configuration: colors, font, padding.
//!
//! These options are glue the host applies to its surface; the layout core
//! only cares that font changes re-measure the unit glyph and that padding
//! narrows the usable width. Each option is applied independently.

/// A terminal-style color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// ANSI black.
    Black,
    /// ANSI red.
    Red,
    /// ANSI green.
    Green,
    /// ANSI yellow.
    Yellow,
    /// ANSI blue.
    Blue,
    /// ANSI magenta.
    Magenta,
    /// ANSI cyan.
    Cyan,
    /// ANSI white.
    White,
    /// 256-color palette index.
    Ansi256(u8),
    /// 24-bit RGB.
    Rgb(u8, u8, u8),
}

/// Pixel padding around the text panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    /// Top padding.
    pub top: f32,
    /// Right padding.
    pub right: f32,
    /// Bottom padding.
    pub bottom: f32,
    /// Left padding.
    pub left: f32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 1.0,
            right: 0.0,
            bottom: 1.0,
            left: 3.0,
        }
    }
}

/// The full configuration surface of the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleStyle {
    /// Foreground text color.
    pub text_color: Color,
    /// Background color.
    pub background_color: Color,
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Panel padding.
    pub padding: Padding,
}

impl Default for ConsoleStyle {
    fn default() -> Self {
        Self {
            text_color: Color::Rgb(0xee, 0xee, 0xee),
            background_color: Color::Rgb(0x2e, 0x34, 0x36),
            font_family: "monospace".to_string(),
            font_size: 14.0,
            padding: Padding::default(),
        }
    }
}
