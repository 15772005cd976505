//! Text buffer
//!
//! The backing store of the terminal: an ever-growing list of styled lines,
//! index 0 being the oldest. The buffer is never empty.
//!
//! Glyphs hold raw bytes, so a character may take several storage slots.
//! Positions handed in by the interpreter are *visual* columns (tab-stop
//! aware, one column per character); [`TextBuffer::character_index`] and
//! [`TextBuffer::character_column`] translate between the two.

use std::ops::Range;
use std::rc::Rc;

use super::coordinates::Coordinates;
use super::glyph::{Glyph, PaletteIndex};
use super::line::Line;
use super::observer::{LineCloseObserver, ObserverRegistry};
use super::utf8::{utf8_char_length, Utf8Accumulator};

/// Tab width used unless configured otherwise
pub const DEFAULT_TAB_SIZE: usize = 4;
/// Largest accepted tab width
pub const MAX_TAB_SIZE: usize = 32;

/// Lines of styled glyphs with line-close notification
#[derive(Debug)]
pub struct TextBuffer {
    lines: Vec<Line>,
    tab_size: usize,
    observers: ObserverRegistry,
    /// Index of the line still open for editing
    open_line: Option<usize>,
    /// Lines dropped from the front, keeps reported line numbers monotonic
    removed_lines: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            tab_size: DEFAULT_TAB_SIZE,
            observers: ObserverRegistry::new(),
            open_line: Some(0),
            removed_lines: 0,
        }
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Set the tab width, clamped to `1..=32`
    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.tab_size = tab_size.clamp(1, MAX_TAB_SIZE);
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut Line> {
        self.lines.get_mut(index)
    }

    // ------------------------------------------------------------------
    // Line-close observers
    // ------------------------------------------------------------------

    pub fn register_observer(&mut self, observer: &Rc<dyn LineCloseObserver>) {
        self.observers.register(observer);
    }

    /// Returns whether `observer` was registered
    pub fn deregister_observer(&mut self, observer: &Rc<dyn LineCloseObserver>) -> bool {
        self.observers.deregister(observer)
    }

    /// Notify observers that the open line is complete.
    ///
    /// Does nothing when no line is open, so each line is reported at most
    /// once.
    pub fn finalize_pending_line(&mut self) {
        if let Some(index) = self.open_line.take() {
            if let Some(line) = self.lines.get(index) {
                self.observers
                    .notify(self.removed_lines + index + 1, line);
            }
        }
    }

    /// Index of the line open for editing, if any
    pub fn open_line(&self) -> Option<usize> {
        self.open_line
    }

    // ------------------------------------------------------------------
    // Line insertion and removal
    // ------------------------------------------------------------------

    /// Insert an empty line at `index` (clamped to the end).
    ///
    /// The previously open line is finalized first; the new line becomes
    /// the open one.
    pub fn insert_line(&mut self, index: usize) -> &mut Line {
        self.finalize_pending_line();
        let index = index.min(self.lines.len());
        self.lines.insert(index, Line::new());
        self.open_line = Some(index);
        &mut self.lines[index]
    }

    /// Append blank lines until `index` exists.
    ///
    /// Padding rows are not opened for editing and the open line stays
    /// open, so nothing is reported to observers.
    pub fn ensure_line(&mut self, index: usize) {
        if index >= self.lines.len() {
            self.lines.resize_with(index + 1, Line::new);
        }
    }

    /// Remove the lines in `range`. The buffer keeps at least one line.
    pub fn remove_lines(&mut self, range: Range<usize>) {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        let count = end - start;
        if count == 0 {
            return;
        }

        self.open_line = match self.open_line {
            Some(open) if open >= end => Some(open - count),
            Some(open) if open >= start => None,
            other => other,
        };
        if start == 0 {
            self.removed_lines += count;
        }

        self.lines.drain(start..end);
        if self.lines.is_empty() {
            self.lines.push(Line::new());
            self.open_line = Some(0);
        }
    }

    /// Drop every line above `first_live_line`
    pub fn erase_scrollback(&mut self, first_live_line: usize) {
        self.remove_lines(0..first_live_line);
    }

    // ------------------------------------------------------------------
    // Column math
    // ------------------------------------------------------------------

    fn next_tab_stop(&self, column: usize) -> usize {
        (column / self.tab_size) * self.tab_size + self.tab_size
    }

    /// Storage length of the character starting at `index`.
    ///
    /// A lead byte only claims the continuation bytes that actually follow
    /// it, so a truncated sequence counts as a single-byte character.
    fn char_len_at(glyphs: &[Glyph], index: usize) -> usize {
        let Some(lead) = glyphs.get(index) else {
            return 0;
        };
        let expected = utf8_char_length(lead.character);
        let mut len = 1;
        while len < expected
            && glyphs
                .get(index + len)
                .is_some_and(|g| Utf8Accumulator::is_continuation(g.character))
        {
            len += 1;
        }
        len
    }

    /// Storage index of the character at visual column `coords.column`.
    ///
    /// `None` when the line does not exist. A column past the end of the
    /// line yields the line length.
    pub fn character_index(&self, coords: Coordinates) -> Option<usize> {
        let line = self.lines.get(coords.line_index())?;
        let glyphs = line.glyphs();
        let target = coords.column_index();
        let mut column = 0;
        let mut index = 0;
        while index < glyphs.len() && column < target {
            let glyph = glyphs[index];
            column = if glyph.is_tab() {
                self.next_tab_stop(column)
            } else {
                column + 1
            };
            index += Self::char_len_at(glyphs, index);
        }
        Some(index)
    }

    /// Visual column of storage index `index` on `line`
    pub fn character_column(&self, line: usize, index: usize) -> usize {
        let Some(line) = self.lines.get(line) else {
            return 0;
        };
        let glyphs = line.glyphs();
        let mut column = 0;
        let mut i = 0;
        while i < index && i < glyphs.len() {
            let glyph = glyphs[i];
            i += Self::char_len_at(glyphs, i);
            column = if glyph.is_tab() {
                self.next_tab_stop(column)
            } else {
                column + 1
            };
        }
        column
    }

    /// Number of characters (not bytes) on `line`
    pub fn line_character_count(&self, line: usize) -> usize {
        let Some(line) = self.lines.get(line) else {
            return 0;
        };
        let glyphs = line.glyphs();
        let mut count = 0;
        let mut i = 0;
        while i < glyphs.len() {
            i += Self::char_len_at(glyphs, i);
            count += 1;
        }
        count
    }

    /// Visual width of `line`
    pub fn line_max_column(&self, line: usize) -> usize {
        match self.lines.get(line) {
            Some(l) => self.character_column(line, l.len()),
            None => 0,
        }
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Write one byte at storage `index` of `line`, see [`Line::insert_glyph`].
    ///
    /// The line is created if missing. Returns the next storage index.
    pub fn insert_glyph(&mut self, line: usize, index: usize, style: PaletteIndex, byte: u8) -> usize {
        self.ensure_line(line);
        self.lines[line].insert_glyph(index, Glyph::new(byte, style))
    }

    /// Write a whole character (1 to 6 bytes) at visual `column` of `line`.
    ///
    /// Past the end of the line the gap is padded with blanks; inside the
    /// line the character found at `column` is replaced, whatever its byte
    /// length. Returns the visual column following the character: one more
    /// than `column`, or the next tab stop for a TAB.
    pub fn put_char(&mut self, line: usize, column: usize, style: PaletteIndex, bytes: &[u8]) -> usize {
        if bytes.is_empty() {
            return column;
        }
        self.ensure_line(line);

        let max_column = self.line_max_column(line);
        if column >= max_column {
            let mut index = self.lines[line].len() + (column - max_column);
            for &byte in bytes {
                index = self.insert_glyph(line, index, style, byte);
            }
        } else {
            let index = self
                .character_index(Coordinates::new(line, column))
                .unwrap_or_default();
            let old_len = Self::char_len_at(self.lines[line].glyphs(), index);
            let target = &mut self.lines[line];
            let glyphs: Vec<Glyph> = bytes.iter().map(|&b| Glyph::new(b, style)).collect();
            target.splice(index..index + old_len, &glyphs);
        }

        if bytes == b"\t" {
            self.next_tab_stop(column)
        } else {
            column + 1
        }
    }

    // ------------------------------------------------------------------
    // Text extraction
    // ------------------------------------------------------------------

    pub fn line_text(&self, index: usize) -> Option<String> {
        self.lines.get(index).map(Line::text)
    }

    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }

    /// Whole buffer as text, lines joined with `\n`
    pub fn text(&self) -> String {
        self.text_lines().join("\n")
    }
}
