//! Terminal Core Module
//!
//! Platform-independent storage for the terminal. This module contains:
//! - Glyph and line representation
//! - The text buffer with tab-aware column math
//! - Line-close notification
//! - UTF-8 lead-byte handling
//! - Deterministic snapshot generation
//!
//! Nothing here knows about escape sequences; the parser and interpreter
//! drive the buffer through the operations exposed here.

mod buffer;
mod coordinates;
mod glyph;
mod line;
mod observer;
mod snapshot;
mod utf8;

pub use buffer::{TextBuffer, DEFAULT_TAB_SIZE, MAX_TAB_SIZE};
pub use coordinates::Coordinates;
pub use glyph::{Glyph, PaletteIndex};
pub use line::Line;
pub use observer::{LineCloseObserver, ObserverRegistry};
pub use snapshot::{
    CursorSnapshot, GraphicsSnapshot, LineSnapshot, Snapshot, SpanSnapshot, StyleSnapshot,
};
pub use utf8::{utf8_char_length, Utf8Accumulator, Utf8Step, MAX_UTF8_LEN};
