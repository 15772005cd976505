//! Terminal interpreter
//!
//! Applies completed CSI commands: cursor movement, save/restore, erase,
//! SGR and device reports. The cursor lives in viewport space, row 0 being
//! the top of the visible window; erase commands translate their region to
//! absolute buffer lines before touching the [`TextBuffer`].

use std::collections::VecDeque;

use crate::core::{Coordinates, TextBuffer};
use crate::error::{Error, Result};
use crate::parser::{CommandKind, Mode, ParseResult};

use super::graphics::GraphicsState;

/// Bounds of a 24x80 screen, used until the owner reports real ones
pub const DEFAULT_BOUNDS: Coordinates = Coordinates {
    line: 23,
    column: 79,
};

/// Wire form of the device-status "OK" report
pub const DEVICE_STATUS_OK: &[u8] = b"\x1b[0n";

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Cursor, bounds and pen state plus the outbound report queue
#[derive(Debug, Clone)]
pub struct TerminalInterpreter {
    cursor: Coordinates,
    saved_cursor: Coordinates,
    /// Largest addressable (row, column), inclusive
    bounds: Coordinates,
    graphics: GraphicsState,
    output: VecDeque<Vec<u8>>,
}

impl Default for TerminalInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalInterpreter {
    pub fn new() -> Self {
        Self::with_bounds(DEFAULT_BOUNDS)
    }

    pub fn with_bounds(bounds: Coordinates) -> Self {
        Self {
            cursor: Coordinates::default(),
            saved_cursor: Coordinates::default(),
            bounds,
            graphics: GraphicsState::new(),
            output: VecDeque::new(),
        }
    }

    pub fn cursor(&self) -> Coordinates {
        self.cursor
    }

    /// Move the cursor; the position is clamped into the bounds
    pub fn set_cursor(&mut self, cursor: Coordinates) {
        self.cursor = cursor;
        self.sanitize_cursor();
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut Coordinates {
        &mut self.cursor
    }

    pub fn saved_cursor(&self) -> Coordinates {
        self.saved_cursor
    }

    pub fn bounds(&self) -> Coordinates {
        self.bounds
    }

    /// Set the viewport extent `(rows - 1, cols - 1)` and re-clamp the cursor
    pub fn set_bounds(&mut self, bounds: Coordinates) {
        self.bounds = Coordinates {
            line: bounds.line.max(0),
            column: bounds.column.max(0),
        };
        self.sanitize_cursor();
    }

    pub fn graphics(&self) -> &GraphicsState {
        &self.graphics
    }

    fn sanitize_cursor(&mut self) {
        self.cursor.line = self.cursor.line.clamp(0, self.bounds.line);
        self.cursor.column = self.cursor.column.clamp(0, self.bounds.column);
    }

    /// Translate a viewport position to an absolute buffer position.
    ///
    /// Once the buffer holds more lines than the viewport, the last buffer
    /// line is the bottom viewport row. Before that, rows map one to one.
    pub fn to_absolute(&self, position: Coordinates, total_lines: usize) -> Coordinates {
        let last = i32::try_from(total_lines.saturating_sub(1)).unwrap_or(i32::MAX);
        if last >= self.bounds.line {
            Coordinates {
                line: last - (self.bounds.line - position.line),
                column: position.column,
            }
        } else {
            position
        }
    }

    // ------------------------------------------------------------------
    // Outbound reports
    // ------------------------------------------------------------------

    pub fn output_available(&self) -> bool {
        !self.output.is_empty()
    }

    /// Pop the oldest queued report.
    ///
    /// Calling this with nothing queued is a caller bug and returns
    /// [`Error::OutputQueueEmpty`].
    pub fn take_output(&mut self) -> Result<Vec<u8>> {
        self.output.pop_front().ok_or(Error::OutputQueueEmpty)
    }

    /// Pop every queued report, oldest first
    pub fn drain_output(&mut self) -> Vec<Vec<u8>> {
        self.output.drain(..).collect()
    }

    // ------------------------------------------------------------------
    // Command dispatch
    // ------------------------------------------------------------------

    /// Apply a parse result that completed a command.
    ///
    /// Anything else (literal text, partial or failed sequences) is ignored,
    /// as are mode-prefixed commands and commands with the wrong number of
    /// arguments.
    pub fn apply(&mut self, result: &ParseResult, buffer: &mut TextBuffer) {
        let Some(command) = result.command() else {
            return;
        };
        if result.mode != Mode::None {
            tracing::debug!(?command, mode = ?result.mode, "mode-prefixed CSI ignored");
            return;
        }
        tracing::trace!(?command, arguments = ?result.arguments, "CSI dispatch");

        let args = result.arguments.as_slice();
        match command {
            CommandKind::CursorPosition if args.is_empty() => {
                self.cursor = Coordinates::default();
            }
            CommandKind::CursorPosition | CommandKind::HorizontalVerticalPosition => {
                // column first, then row
                if let [column, row] = *args {
                    self.cursor = Coordinates {
                        line: to_i32(row).saturating_sub(1),
                        column: to_i32(column).saturating_sub(1),
                    };
                }
            }
            CommandKind::CursorUp => self.move_by(args, -1, 0, false),
            CommandKind::CursorDown => self.move_by(args, 1, 0, false),
            CommandKind::CursorForward => self.move_by(args, 0, 1, false),
            CommandKind::CursorBack => self.move_by(args, 0, -1, false),
            CommandKind::CursorNextLine => self.move_by(args, 1, 0, true),
            CommandKind::CursorPreviousLine => self.move_by(args, -1, 0, true),
            CommandKind::CursorColumn => {
                if let [column] = *args {
                    self.cursor.column = to_i32(column).saturating_sub(1);
                }
            }
            CommandKind::SaveCursor => {
                if args.is_empty() {
                    self.saved_cursor = self.cursor;
                }
            }
            CommandKind::RestoreCursor => {
                if args.is_empty() {
                    self.cursor = self.saved_cursor;
                }
            }
            CommandKind::EraseInDisplay => self.erase_in_display(args, buffer),
            CommandKind::EraseInLine => self.erase_in_line(args, buffer),
            CommandKind::SelectGraphicRendition => {
                if let Err(e) = self.graphics.update_all(args) {
                    tracing::warn!("{e}, code skipped");
                }
            }
            CommandKind::DeviceStatusReport => self.device_status_report(args),
            CommandKind::Unrecognized(identifier) => {
                tracing::debug!(identifier, "unsupported CSI command ignored");
            }
        }

        if command.moves_cursor() {
            self.sanitize_cursor();
        }
    }

    fn move_by(&mut self, args: &[u32], lines: i32, columns: i32, to_line_start: bool) {
        let [count] = *args else {
            return;
        };
        let count = to_i32(count);
        self.cursor.line = self
            .cursor
            .line
            .saturating_add(lines.saturating_mul(count));
        self.cursor.column = self
            .cursor
            .column
            .saturating_add(columns.saturating_mul(count));
        if to_line_start {
            self.cursor.column = 0;
        }
    }

    fn device_status_report(&mut self, args: &[u32]) {
        match args {
            [5] => self.output.push_back(DEVICE_STATUS_OK.to_vec()),
            [6] => {
                let report = format!(
                    "\x1b[{};{}R",
                    i64::from(self.cursor.line) + 1,
                    i64::from(self.cursor.column) + 1
                );
                self.output.push_back(report.into_bytes());
            }
            _ => tracing::debug!(?args, "unsupported device status request ignored"),
        }
    }

    // ------------------------------------------------------------------
    // Erase
    // ------------------------------------------------------------------

    fn erase_in_display(&mut self, args: &[u32], buffer: &mut TextBuffer) {
        let origin = Coordinates::default();
        match args {
            [] | [0] => self.erase(self.cursor, self.bounds, buffer),
            [1] => self.erase(origin, self.cursor, buffer),
            [2] => self.erase(origin, self.bounds, buffer),
            [3] => {
                let first_live = self.to_absolute(origin, buffer.line_count()).line;
                buffer.erase_scrollback(usize::try_from(first_live).unwrap_or(0));
            }
            _ => tracing::debug!(?args, "unsupported erase-in-display ignored"),
        }
    }

    fn erase_in_line(&mut self, args: &[u32], buffer: &mut TextBuffer) {
        let line_start = Coordinates {
            line: self.cursor.line,
            column: 0,
        };
        let line_end = Coordinates {
            line: self.cursor.line,
            column: self.bounds.column,
        };
        match args {
            [] | [0] => self.erase(self.cursor, line_end, buffer),
            [1] => self.erase(line_start, self.cursor, buffer),
            [2] => self.erase(line_start, line_end, buffer),
            _ => tracing::debug!(?args, "unsupported erase-in-line ignored"),
        }
    }

    /// Erase the viewport region `[begin, end)`.
    ///
    /// Every line before the last one is cut from the start column on.
    /// On the last line the cells up to `end` are blanked in place, unless
    /// `end` is the right edge of the viewport, in which case the tail is
    /// cut instead.
    fn erase(&self, begin: Coordinates, end: Coordinates, buffer: &mut TextBuffer) {
        let total = buffer.line_count();
        let mut begin = self.to_absolute(begin, total);
        let end = self.to_absolute(end, total);

        while begin < end {
            if !begin.is_valid() || begin.line_index() >= buffer.line_count() {
                break;
            }
            let line = begin.line_index();
            let start = buffer.character_index(begin).unwrap_or_default();

            if begin.line < end.line {
                if let Some(target) = buffer.line_mut(line) {
                    target.truncate(start);
                }
                begin.line += 1;
                begin.column = 0;
            } else {
                if end.column == self.bounds.column {
                    if let Some(target) = buffer.line_mut(line) {
                        target.truncate(start);
                    }
                } else {
                    let stop = buffer.character_index(end).unwrap_or_default();
                    if let Some(target) = buffer.line_mut(line) {
                        target.blank(start..stop);
                    }
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Glyph, PaletteIndex};
    use crate::parser::EscapeParser;

    fn run(interp: &mut TerminalInterpreter, buffer: &mut TextBuffer, data: &[u8]) {
        let mut parser = EscapeParser::new();
        for result in parser.parse(data) {
            interp.apply(&result, buffer);
        }
    }

    fn buffer_with(lines: &[&str]) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        for (i, text) in lines.iter().enumerate() {
            let mut column = 0;
            for ch in text.chars() {
                let mut bytes = [0u8; 4];
                column = buffer.put_char(
                    i,
                    column,
                    PaletteIndex::Default,
                    ch.encode_utf8(&mut bytes).as_bytes(),
                );
            }
            buffer.ensure_line(i);
        }
        buffer
    }

    #[test]
    fn test_home_and_absolute_move() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = TextBuffer::new();

        run(&mut interp, &mut buffer, b"\x1b[5;10H");
        assert_eq!(interp.cursor(), Coordinates::new(9, 4));

        run(&mut interp, &mut buffer, b"\x1b[H");
        assert_eq!(interp.cursor(), Coordinates::new(0, 0));

        run(&mut interp, &mut buffer, b"\x1b[3;2f");
        assert_eq!(interp.cursor(), Coordinates::new(1, 2));

        // wrong arity is ignored
        run(&mut interp, &mut buffer, b"\x1b[7H\x1b[f");
        assert_eq!(interp.cursor(), Coordinates::new(1, 2));
    }

    #[test]
    fn test_relative_moves_are_clamped() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = TextBuffer::new();

        run(&mut interp, &mut buffer, b"\x1b[5B\x1b[7C");
        assert_eq!(interp.cursor(), Coordinates::new(5, 7));

        run(&mut interp, &mut buffer, b"\x1b[2A\x1b[3D");
        assert_eq!(interp.cursor(), Coordinates::new(3, 4));

        run(&mut interp, &mut buffer, b"\x1b[100A\x1b[100D");
        assert_eq!(interp.cursor(), Coordinates::new(0, 0));

        run(&mut interp, &mut buffer, b"\x1b[100B\x1b[500C");
        assert_eq!(interp.cursor(), DEFAULT_BOUNDS);

        run(&mut interp, &mut buffer, b"\x1b[4294967295A");
        assert_eq!(interp.cursor(), Coordinates::new(0, 79));

        // count is mandatory
        run(&mut interp, &mut buffer, b"\x1b[B");
        assert_eq!(interp.cursor(), Coordinates::new(0, 79));
    }

    #[test]
    fn test_next_previous_line_and_column() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = TextBuffer::new();

        run(&mut interp, &mut buffer, b"\x1b[10G");
        assert_eq!(interp.cursor(), Coordinates::new(0, 9));

        run(&mut interp, &mut buffer, b"\x1b[3E");
        assert_eq!(interp.cursor(), Coordinates::new(3, 0));

        run(&mut interp, &mut buffer, b"\x1b[6G\x1b[1F");
        assert_eq!(interp.cursor(), Coordinates::new(2, 0));

        run(&mut interp, &mut buffer, b"\x1b[0G");
        assert_eq!(interp.cursor().column, 0);
    }

    #[test]
    fn test_save_restore() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = TextBuffer::new();

        run(&mut interp, &mut buffer, b"\x1b[4;6H\x1b[s\x1b[H");
        assert_eq!(interp.saved_cursor(), Coordinates::new(5, 3));
        run(&mut interp, &mut buffer, b"\x1b[u");
        assert_eq!(interp.cursor(), Coordinates::new(5, 3));

        // restore is clamped into shrunken bounds
        interp.set_bounds(Coordinates::new(2, 2));
        run(&mut interp, &mut buffer, b"\x1b[u");
        assert_eq!(interp.cursor(), Coordinates::new(2, 2));
    }

    #[test]
    fn test_set_bounds_idempotent() {
        let mut interp = TerminalInterpreter::new();
        interp.set_cursor(Coordinates::new(20, 70));
        interp.set_bounds(Coordinates::new(10, 40));
        let once = interp.cursor();
        interp.set_bounds(Coordinates::new(10, 40));
        assert_eq!(interp.cursor(), once);
        assert_eq!(once, Coordinates::new(10, 40));
    }

    #[test]
    fn test_reports() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = TextBuffer::new();
        assert!(!interp.output_available());
        assert!(matches!(interp.take_output(), Err(Error::OutputQueueEmpty)));

        run(&mut interp, &mut buffer, b"\x1b[5n\x1b[3;7H\x1b[6n");
        assert!(interp.output_available());
        assert_eq!(interp.take_output().unwrap(), b"\x1b[0n".to_vec());
        assert_eq!(interp.take_output().unwrap(), b"\x1b[7;3R".to_vec());
        assert!(!interp.output_available());

        run(&mut interp, &mut buffer, b"\x1b[7n\x1b[n");
        assert!(interp.drain_output().is_empty());
    }

    #[test]
    fn test_sgr_and_mode_prefixed_commands() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = TextBuffer::new();

        run(&mut interp, &mut buffer, b"\x1b[1;31m");
        assert!(interp.graphics().is_bold());
        assert_eq!(interp.graphics().palette_index(), PaletteIndex::Red);

        // unsupported code is skipped, the rest applies
        run(&mut interp, &mut buffer, b"\x1b[38;42m");
        assert_eq!(interp.graphics().background(), Some(PaletteIndex::Green));

        run(&mut interp, &mut buffer, b"\x1b[?5n\x1b[=2J\x1b[?1;1H");
        assert!(!interp.output_available());
        assert_eq!(interp.cursor(), Coordinates::new(0, 0));
    }

    #[test]
    fn test_to_absolute() {
        let interp = TerminalInterpreter::new();
        assert_eq!(
            interp.to_absolute(Coordinates::new(0, 0), 1000),
            Coordinates::new(976, 0)
        );
        assert_eq!(
            interp.to_absolute(Coordinates::new(23, 5), 1000),
            Coordinates::new(999, 5)
        );
        // buffer shorter than the viewport
        assert_eq!(
            interp.to_absolute(Coordinates::new(3, 1), 10),
            Coordinates::new(3, 1)
        );
        // exactly full
        assert_eq!(
            interp.to_absolute(Coordinates::new(0, 0), 24),
            Coordinates::new(0, 0)
        );
    }

    #[test]
    fn test_erase_line_to_end_truncates() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["hello world"]);
        interp.set_cursor(Coordinates::new(0, 5));
        run(&mut interp, &mut buffer, b"\x1b[K");
        assert_eq!(buffer.line_text(0).unwrap(), "hello");
    }

    #[test]
    fn test_erase_line_to_cursor_blanks() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["hello world"]);
        interp.set_cursor(Coordinates::new(0, 6));
        run(&mut interp, &mut buffer, b"\x1b[1K");
        assert_eq!(buffer.line_text(0).unwrap(), "      world");
        assert_eq!(buffer.line(0).unwrap().len(), 11);
        assert!(buffer.line(0).unwrap().glyphs()[..6]
            .iter()
            .all(|g| *g == Glyph::blank()));
    }

    #[test]
    fn test_erase_whole_line() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["one", "two", "three"]);
        interp.set_cursor(Coordinates::new(1, 2));
        run(&mut interp, &mut buffer, b"\x1b[2K");
        assert_eq!(buffer.text_lines(), vec!["one", "", "three"]);
    }

    #[test]
    fn test_erase_display_below() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["one", "two", "three"]);
        interp.set_cursor(Coordinates::new(1, 1));
        run(&mut interp, &mut buffer, b"\x1b[J");
        assert_eq!(buffer.text_lines(), vec!["one", "t", ""]);
    }

    #[test]
    fn test_erase_display_above() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["one", "two", "three"]);
        interp.set_cursor(Coordinates::new(2, 2));
        run(&mut interp, &mut buffer, b"\x1b[1J");
        assert_eq!(buffer.text_lines(), vec!["", "", "  ree"]);
    }

    #[test]
    fn test_erase_display_all_keeps_lines() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["one", "two", "three"]);
        run(&mut interp, &mut buffer, b"\x1b[2J");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.text(), "\n\n");
    }

    #[test]
    fn test_erase_translates_through_scrollback() {
        let mut interp = TerminalInterpreter::new();
        interp.set_bounds(Coordinates::new(1, 79));
        let mut buffer = buffer_with(&["old", "older", "top", "bottom"]);

        // row 0 of the two-row viewport is buffer line 2
        interp.set_cursor(Coordinates::new(0, 0));
        run(&mut interp, &mut buffer, b"\x1b[2K");
        assert_eq!(buffer.text_lines(), vec!["old", "older", "", "bottom"]);
    }

    #[test]
    fn test_erase_uses_visual_columns() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["a中bc"]);
        interp.set_cursor(Coordinates::new(0, 2));
        run(&mut interp, &mut buffer, b"\x1b[K");
        assert_eq!(buffer.line_text(0).unwrap(), "a中");

        let mut buffer = buffer_with(&["a中bc"]);
        interp.set_cursor(Coordinates::new(0, 3));
        run(&mut interp, &mut buffer, b"\x1b[1K");
        assert_eq!(buffer.line_text(0).unwrap(), "     c");
    }

    #[test]
    fn test_erase_scrollback() {
        let mut interp = TerminalInterpreter::new();
        interp.set_bounds(Coordinates::new(1, 79));
        let mut buffer = buffer_with(&["a", "b", "c", "d"]);
        run(&mut interp, &mut buffer, b"\x1b[3J");
        assert_eq!(buffer.text_lines(), vec!["c", "d"]);

        // nothing above the viewport yet
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["a", "b"]);
        run(&mut interp, &mut buffer, b"\x1b[3J");
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_erase_past_buffer_end_is_safe() {
        let mut interp = TerminalInterpreter::new();
        let mut buffer = buffer_with(&["x"]);
        interp.set_cursor(Coordinates::new(10, 10));
        run(&mut interp, &mut buffer, b"\x1b[K\x1b[1K\x1b[J\x1b[1J\x1b[9J\x1b[9K");
        assert_eq!(buffer.text(), "");
    }
}
