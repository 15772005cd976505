//! UTF-8 lead-byte handling for the text buffer
//!
//! The buffer stores raw bytes, one glyph per byte, so a multi-byte
//! character occupies several consecutive glyphs. Column math walks a line
//! by lead bytes using [`utf8_char_length`].

/// Longest sequence the classic lead-byte table describes
pub const MAX_UTF8_LEN: usize = 6;

/// Length of the sequence introduced by `lead`.
///
/// Standalone bytes (< 0x80) and anything that is not a recognised lead
/// byte count as 1.
pub fn utf8_char_length(lead: u8) -> usize {
    if lead & 0xFE == 0xFC {
        6
    } else if lead & 0xFC == 0xF8 {
        5
    } else if lead & 0xF8 == 0xF0 {
        4
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xE0 == 0xC0 {
        2
    } else {
        1
    }
}

/// Holds the bytes of a multi-byte character until all of them arrived
#[derive(Debug, Clone, Default)]
pub struct Utf8Accumulator {
    buffer: [u8; MAX_UTF8_LEN],
    len: usize,
    expected: usize,
}

/// Result of feeding a byte to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Step {
    /// Byte was not part of a multi-byte character
    NotConsumed,
    /// Byte stored, more expected
    Pending,
    /// Character complete; fetch it with [`Utf8Accumulator::bytes`]
    Complete,
}

impl Utf8Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a character is partially collected
    pub fn is_pending(&self) -> bool {
        self.len > 0 && self.len < self.expected
    }

    /// Bytes collected so far
    pub fn bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn reset(&mut self) {
        self.len = 0;
        self.expected = 0;
    }

    /// Feed one byte.
    ///
    /// A lead byte with length > 1 starts a character. While pending, the
    /// following bytes are stored verbatim until the length is reached.
    /// A pending character must be checked with [`is_pending`](Self::is_pending)
    /// before feeding an unrelated byte.
    pub fn feed(&mut self, byte: u8) -> Utf8Step {
        if !self.is_pending() {
            self.reset();
            let expected = utf8_char_length(byte);
            if expected == 1 {
                return Utf8Step::NotConsumed;
            }
            self.buffer[0] = byte;
            self.len = 1;
            self.expected = expected;
            return Utf8Step::Pending;
        }

        self.buffer[self.len] = byte;
        self.len += 1;

        if self.len < self.expected {
            Utf8Step::Pending
        } else {
            Utf8Step::Complete
        }
    }

    /// Whether `byte` may continue the pending character (10xxxxxx)
    pub fn is_continuation(byte: u8) -> bool {
        byte & 0xC0 == 0x80
    }
}
