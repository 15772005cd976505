//! Deterministic snapshot generation
//!
//! Snapshots capture the buffer, cursor and graphics state in a serializable
//! format for testing and debugging. Given the same byte stream, the
//! terminal must produce identical snapshots (line timestamps are left out).

use serde::{Deserialize, Serialize};

use super::buffer::TextBuffer;
use super::coordinates::Coordinates;
use super::glyph::PaletteIndex;
use super::line::Line;

/// A complete snapshot of the terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Largest addressable position (0-based)
    pub bounds: CursorSnapshot,
    pub cursor: CursorSnapshot,
    /// Pen state at capture time
    pub graphics: GraphicsSnapshot,
    /// Lines of the buffer, oldest first
    pub lines: Vec<LineSnapshot>,
}

/// Snapshot of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub line: i32,
    pub column: i32,
}

/// Snapshot of one buffer line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub text: String,
    /// Runs of equally styled text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<SpanSnapshot>,
}

/// A run of text drawn with one palette slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSnapshot {
    pub text: String,
    pub style: PaletteIndex,
}

/// Snapshot of the graphics state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphicsSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<PaletteIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<PaletteIndex>,
    pub style: StyleSnapshot,
}

/// Snapshot of format attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub faint: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blink: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inverse: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<Coordinates> for CursorSnapshot {
    fn from(coords: Coordinates) -> Self {
        CursorSnapshot {
            line: coords.line,
            column: coords.column,
        }
    }
}

impl From<&Line> for LineSnapshot {
    fn from(line: &Line) -> Self {
        let mut spans: Vec<SpanSnapshot> = Vec::new();
        let mut run: Vec<u8> = Vec::new();
        let mut style = PaletteIndex::Default;

        for glyph in line.glyphs() {
            if glyph.style != style && !run.is_empty() {
                spans.push(SpanSnapshot {
                    text: String::from_utf8_lossy(&run).into_owned(),
                    style,
                });
                run.clear();
            }
            style = glyph.style;
            run.push(glyph.character);
        }
        if !run.is_empty() {
            spans.push(SpanSnapshot {
                text: String::from_utf8_lossy(&run).into_owned(),
                style,
            });
        }

        // an all-default line needs no span list
        if spans.iter().all(|s| s.style == PaletteIndex::Default) {
            spans.clear();
        }

        LineSnapshot {
            text: line.text(),
            spans,
        }
    }
}

impl Snapshot {
    /// Capture the buffer together with cursor, bounds and pen state
    pub fn capture(
        buffer: &TextBuffer,
        cursor: Coordinates,
        bounds: Coordinates,
        graphics: GraphicsSnapshot,
    ) -> Self {
        Snapshot {
            bounds: bounds.into(),
            cursor: cursor.into(),
            graphics,
            lines: buffer.lines().iter().map(LineSnapshot::from).collect(),
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Plain text of all lines, trailing empty lines removed
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for line in &self.lines {
            result.push_str(&line.text);
            result.push('\n');
        }
        while result.ends_with("\n\n") {
            result.pop();
        }
        result
    }

    /// Compare line content and cursor, ignoring pen state
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cursor == other.cursor && self.lines == other.lines
    }
}
