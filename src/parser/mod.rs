//! Terminal escape sequence parser
//!
//! A stateful tokenizer that classifies each incoming byte as literal text,
//! part of a CSI sequence, or the end of a complete command.

mod command;
mod state;

pub use command::CommandKind;
pub use state::{EscapeParser, Mode, ParseResult, SequenceError, Stage};
