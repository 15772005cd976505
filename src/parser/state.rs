//! Parser State Machine
//!
//! A byte-at-a-time tokenizer for the CSI subset the terminal understands:
//!
//! ```text
//! ESC '[' [ '=' | '?' ] digits ( ';' digits )* letter
//! ```
//!
//! Every call returns a complete [`ParseResult`] describing what the byte
//! did. The parser keeps no borrowed state in the result, so the caller may
//! hold on to it while feeding further bytes.
//!
//! States:
//! - Inactive: scratch state is cleared, the byte is re-evaluated as GetEsc
//! - GetEsc: ESC starts a sequence, any other byte is literal text
//! - GetCsi: expects `[`
//! - GetMode: optional `=` (screen) or `?` (private) prefix
//! - GetData: numeric arguments and the final identifier letter

use super::command::CommandKind;

const ESC: u8 = 0x1B;

/// Position of the tokenizer within a sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Inactive,
    GetEsc,
    GetCsi,
    GetMode,
    GetData,
}

/// Outcome classification of one parsed byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceError {
    /// A command was completed
    #[default]
    None,
    /// Mid-sequence, more bytes needed
    NotReady,
    /// Byte outside a sequence; it is literal text
    BadEsc,
    /// ESC not followed by `[`; both bytes are dropped
    BadCsi,
    /// Unexpected byte or oversized number in the argument section
    BadData,
}

/// CSI mode prefix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    None,
    /// `=` prefix
    Screen,
    /// `?` prefix
    Private,
}

/// Result of feeding one byte to the parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Pass-through byte, set only with [`SequenceError::BadEsc`]
    pub literal: Option<u8>,
    /// Stage the parser is in after this byte
    pub stage: Stage,
    pub error: SequenceError,
    /// Final letter of a completed command
    pub identifier: Option<u8>,
    pub mode: Mode,
    pub arguments: Vec<u32>,
}

impl ParseResult {
    /// Whether this byte completed a command
    pub fn is_command(&self) -> bool {
        self.error == SequenceError::None && self.identifier.is_some()
    }

    /// Whether this byte is literal text
    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }

    /// Typed identifier of a completed command
    pub fn command(&self) -> Option<CommandKind> {
        if self.error != SequenceError::None {
            return None;
        }
        self.identifier.map(CommandKind::from_identifier)
    }
}

/// The escape sequence tokenizer
#[derive(Debug, Default)]
pub struct EscapeParser {
    stage: Stage,
    mode: Mode,
    arguments: Vec<u32>,
    /// Digits of the argument being read, `None` while the token is empty
    token: Option<u32>,
    /// An argument overflowed; the sequence is swallowed at its final byte
    overflow: bool,
}

impl EscapeParser {
    /// Create a new parser in the inactive stage
    pub fn new() -> Self {
        Self {
            stage: Stage::Inactive,
            mode: Mode::None,
            arguments: Vec::with_capacity(8),
            token: None,
            overflow: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether the parser is inside a sequence
    pub fn in_sequence(&self) -> bool {
        !matches!(self.stage, Stage::Inactive | Stage::GetEsc)
    }

    /// Abandon any partial sequence
    pub fn reset(&mut self) {
        self.stage = Stage::Inactive;
        self.clear();
    }

    fn clear(&mut self) {
        self.mode = Mode::None;
        self.arguments.clear();
        self.token = None;
        self.overflow = false;
    }

    /// Process a chunk of bytes, returning the results of bytes that
    /// produced literal text or a finished command
    pub fn parse(&mut self, data: &[u8]) -> Vec<ParseResult> {
        data.iter()
            .map(|&byte| self.advance(byte))
            .filter(|result| result.is_literal() || result.is_command())
            .collect()
    }

    /// Process a single byte
    pub fn advance(&mut self, byte: u8) -> ParseResult {
        let mut result = ParseResult::default();

        loop {
            match self.stage {
                Stage::Inactive => {
                    self.clear();
                    self.stage = Stage::GetEsc;
                }
                Stage::GetEsc => {
                    if byte == ESC {
                        self.stage = Stage::GetCsi;
                        result.error = SequenceError::NotReady;
                    } else {
                        self.stage = Stage::Inactive;
                        result.literal = Some(byte);
                        result.error = SequenceError::BadEsc;
                    }
                    break;
                }
                Stage::GetCsi => {
                    if byte == b'[' {
                        self.stage = Stage::GetMode;
                        result.error = SequenceError::NotReady;
                    } else {
                        tracing::debug!(byte, "ESC not followed by '[', sequence dropped");
                        self.stage = Stage::Inactive;
                        result.error = SequenceError::BadCsi;
                    }
                    break;
                }
                Stage::GetMode => {
                    self.stage = Stage::GetData;
                    match byte {
                        b'=' => self.mode = Mode::Screen,
                        b'?' => self.mode = Mode::Private,
                        // not a prefix, read it as data
                        _ => continue,
                    }
                    result.error = SequenceError::NotReady;
                    break;
                }
                Stage::GetData => {
                    self.process_data(byte, &mut result);
                    break;
                }
            }
        }

        result.stage = self.stage;
        result
    }

    fn process_data(&mut self, byte: u8, result: &mut ParseResult) {
        match byte {
            b'0'..=b'9' => {
                let digit = u32::from(byte - b'0');
                let value = self
                    .token
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit));
                match value {
                    Some(value) => {
                        self.token = Some(value);
                        result.error = SequenceError::NotReady;
                    }
                    None => {
                        self.overflow = true;
                        result.error = SequenceError::NotReady;
                    }
                }
            }
            b';' => {
                self.flush_token();
                result.error = SequenceError::NotReady;
            }
            b'A'..=b'Z' | b'a'..=b'z' if self.overflow => {
                tracing::debug!(byte, "CSI argument overflow, sequence dropped");
                self.stage = Stage::Inactive;
                result.error = SequenceError::BadData;
            }
            b'A'..=b'Z' | b'a'..=b'z' => {
                self.flush_token();
                self.stage = Stage::Inactive;
                result.error = SequenceError::None;
                result.identifier = Some(byte);
                result.mode = self.mode;
                result.arguments = std::mem::take(&mut self.arguments);
            }
            _ => {
                tracing::debug!(byte, "unexpected byte in CSI arguments, sequence dropped");
                self.stage = Stage::Inactive;
                result.error = SequenceError::BadData;
            }
        }
    }

    /// Move the pending token into the argument list; empty tokens add nothing
    fn flush_token(&mut self) {
        if let Some(value) = self.token.take() {
            self.arguments.push(value);
        }
    }
}
