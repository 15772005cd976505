//! Serial Terminal Emulation Core
//!
//! Turns the raw byte stream of a serial device into a styled, appendable
//! text buffer plus the reports the device expects back. This crate provides:
//!
//! - `core`: glyphs, lines, the text buffer and its line-close notification
//! - `parser`: byte-at-a-time CSI tokenizer
//! - `terminal`: SGR state, the command interpreter and the byte-stream driver
//! - `bell`: non-blocking audible alert
//! - `transcript`: line-by-line transcript writer
//! - `config`: TOML configuration
//!
//! ```
//! use serial_term::Terminal;
//!
//! let mut term = Terminal::new();
//! term.input(b"\x1b[31mready\x1b[0m\r\n\x1b[6n");
//! assert_eq!(term.buffer().line_text(0).as_deref(), Some("ready"));
//! assert_eq!(term.take_output().unwrap(), b"\x1b[2;1R");
//! ```

pub mod bell;
pub mod config;
pub mod core;
pub mod error;
pub mod parser;
pub mod terminal;
pub mod transcript;

pub use config::{NewLineMode, TerminalConfig};
pub use error::{Error, Result};
pub use terminal::Terminal;
