//! Terminal line representation
//!
//! A line is a growable row of glyphs plus the wall-clock time of its last
//! mutation. Every mutating method refreshes the timestamp, so callers never
//! have to remember to.

use std::ops::Range;
use std::time::SystemTime;

use super::glyph::{Glyph, PaletteIndex};

/// A single line of the text buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    glyphs: Vec<Glyph>,
    last_modified: SystemTime,
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Line {
    pub fn new() -> Self {
        Self {
            glyphs: Vec::new(),
            last_modified: SystemTime::now(),
        }
    }

    /// Create a line holding `bytes`, all with the same style
    pub fn from_bytes(bytes: &[u8], style: PaletteIndex) -> Self {
        Self {
            glyphs: bytes.iter().map(|&b| Glyph::new(b, style)).collect(),
            last_modified: SystemTime::now(),
        }
    }

    /// Number of stored glyphs (bytes, not characters)
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn get(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    fn touch(&mut self) {
        self.last_modified = SystemTime::now();
    }

    /// Write `glyph` at storage index `index` and return the next index.
    ///
    /// The line is padded with blanks up to `index` first. At the end of the
    /// line the glyph is appended, inside it the existing glyph is replaced.
    pub fn insert_glyph(&mut self, index: usize, glyph: Glyph) -> usize {
        if self.glyphs.len() < index {
            self.glyphs.resize(index, Glyph::blank());
        }
        if index == self.glyphs.len() {
            self.glyphs.push(glyph);
        } else {
            self.glyphs[index] = glyph;
        }
        self.touch();
        index + 1
    }

    /// Replace `range` with `glyphs`; the range is clamped to the line
    pub fn splice(&mut self, range: Range<usize>, glyphs: &[Glyph]) {
        let range = self.clamp(range);
        self.glyphs.splice(range, glyphs.iter().copied());
        self.touch();
    }

    /// Remove every glyph from `index` on
    pub fn truncate(&mut self, index: usize) {
        self.glyphs.truncate(index);
        self.touch();
    }

    /// Overwrite the glyphs in `range` with blanks, keeping the line length
    pub fn blank(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        for glyph in &mut self.glyphs[range] {
            *glyph = Glyph::blank();
        }
        self.touch();
    }

    /// Raw bytes of the line
    pub fn bytes(&self) -> Vec<u8> {
        self.glyphs.iter().map(|g| g.character).collect()
    }

    /// Line content decoded as UTF-8 (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let end = range.end.min(self.glyphs.len());
        range.start.min(end)..end
    }
}
