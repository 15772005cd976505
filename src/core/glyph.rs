//! Terminal Glyph
//!
//! One cell of the text buffer: a raw byte plus the palette slot the
//! renderer should draw it with. Multi-byte UTF-8 characters span several
//! consecutive glyphs.

use serde::{Deserialize, Serialize};

/// Symbolic colour slot, resolved to a real colour only by the renderer.
///
/// The core only ever produces `Default` or one of the ANSI slots; the
/// remaining structural slots belong to the renderer's palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteIndex {
    #[default]
    Default,
    Keyword,
    Number,
    String,
    CharLiteral,
    Punctuation,
    Preprocessor,
    Identifier,
    KnownIdentifier,
    PreprocIdentifier,
    Comment,
    MultiLineComment,
    Background,
    Cursor,
    Selection,
    ErrorMarker,
    Breakpoint,
    LineNumber,
    CurrentLineFill,
    CurrentLineFillInactive,
    CurrentLineEdge,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl PaletteIndex {
    /// The eight normal-intensity ANSI slots in SGR order (30..=37)
    pub const ANSI: [PaletteIndex; 8] = [
        PaletteIndex::Black,
        PaletteIndex::Red,
        PaletteIndex::Green,
        PaletteIndex::Yellow,
        PaletteIndex::Blue,
        PaletteIndex::Magenta,
        PaletteIndex::Cyan,
        PaletteIndex::White,
    ];

    /// ANSI slot for colour number `n` (0 = black .. 7 = white)
    pub fn ansi(n: usize) -> Option<PaletteIndex> {
        Self::ANSI.get(n).copied()
    }
}

/// A single cell of the text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    /// Raw byte; may be one part of a multi-byte UTF-8 character
    pub character: u8,
    pub style: PaletteIndex,
    /// Reserved for the renderer's syntax colouring, never set by the core
    pub preprocessor: bool,
}

impl Default for Glyph {
    fn default() -> Self {
        Self::blank()
    }
}

impl Glyph {
    pub fn new(character: u8, style: PaletteIndex) -> Self {
        Self {
            character,
            style,
            preprocessor: false,
        }
    }

    /// A default-styled space, used for padding and erasing
    pub fn blank() -> Self {
        Self::new(b' ', PaletteIndex::Default)
    }

    pub fn is_tab(&self) -> bool {
        self.character == b'\t'
    }
}
