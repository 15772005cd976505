//! Terminal Executor
//!
//! Ties together the tokenizer, the interpreter and the text buffer, and
//! feeds the incoming byte stream through them. This is the main
//! integration point between parsing and the buffer model.
//!
//! Per byte the driver tracks the cursor row in viewport space and derives
//! the buffer line it addresses. Rows the buffer does not have yet are
//! appended on demand, so escape sequences may address any visible row.

mod graphics;
mod interpreter;

use std::rc::Rc;

pub use graphics::{GraphicsFlags, GraphicsState};
pub use interpreter::{TerminalInterpreter, DEFAULT_BOUNDS, DEVICE_STATUS_OK};

use crate::bell::Bell;
use crate::config::{NewLineMode, TerminalConfig};
use crate::core::{
    Coordinates, GraphicsSnapshot, LineCloseObserver, Snapshot, TextBuffer, Utf8Accumulator,
    Utf8Step,
};
use crate::error::Result;
use crate::parser::EscapeParser;

/// The byte-stream terminal
#[derive(Debug)]
pub struct Terminal {
    buffer: TextBuffer,
    parser: EscapeParser,
    interpreter: TerminalInterpreter,
    utf8: Utf8Accumulator,
    bell: Bell,
    newline_mode: NewLineMode,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    /// Create a terminal with default settings and a 24x80 viewport
    pub fn new() -> Self {
        Self::with_bell(Bell::default())
    }

    /// Create a terminal ringing `bell` on BEL
    pub fn with_bell(bell: Bell) -> Self {
        Self {
            buffer: TextBuffer::new(),
            parser: EscapeParser::new(),
            interpreter: TerminalInterpreter::new(),
            utf8: Utf8Accumulator::new(),
            bell,
            newline_mode: NewLineMode::Strict,
        }
    }

    pub fn from_config(config: &TerminalConfig) -> Self {
        let mut terminal = Self::with_bell(Bell::from_config(&config.bell));
        terminal.apply_config(config);
        terminal
    }

    /// Apply newline mode, tab size and (if given) bounds from `config`
    pub fn apply_config(&mut self, config: &TerminalConfig) {
        self.newline_mode = config.newline_mode;
        self.buffer.set_tab_size(config.tab_size);
        if let Some(bounds) = config.bounds {
            self.set_bounds(bounds.to_bounds());
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn interpreter(&self) -> &TerminalInterpreter {
        &self.interpreter
    }

    pub fn graphics(&self) -> &GraphicsState {
        self.interpreter.graphics()
    }

    /// Cursor in viewport space
    pub fn cursor(&self) -> Coordinates {
        self.interpreter.cursor()
    }

    pub fn bounds(&self) -> Coordinates {
        self.interpreter.bounds()
    }

    /// Set the viewport extent `(visible_rows - 1, visible_cols - 1)`.
    ///
    /// Meant to be called by the renderer whenever its geometry is known,
    /// typically once per frame.
    pub fn set_bounds(&mut self, bounds: Coordinates) {
        self.interpreter.set_bounds(bounds);
    }

    pub fn newline_mode(&self) -> NewLineMode {
        self.newline_mode
    }

    pub fn set_newline_mode(&mut self, mode: NewLineMode) {
        self.newline_mode = mode;
    }

    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.buffer.set_tab_size(tab_size);
    }

    pub fn bell(&self) -> &Bell {
        &self.bell
    }

    pub fn bell_mut(&mut self) -> &mut Bell {
        &mut self.bell
    }

    // ------------------------------------------------------------------
    // Line-close observers
    // ------------------------------------------------------------------

    pub fn register_observer(&mut self, observer: &Rc<dyn LineCloseObserver>) {
        self.buffer.register_observer(observer);
    }

    /// Returns whether `observer` was registered
    pub fn deregister_observer(&mut self, observer: &Rc<dyn LineCloseObserver>) -> bool {
        self.buffer.deregister_observer(observer)
    }

    /// Report the open line to observers, e.g. before shutting down
    pub fn finalize(&mut self) {
        self.buffer.finalize_pending_line();
    }

    // ------------------------------------------------------------------
    // Outbound reports
    // ------------------------------------------------------------------

    pub fn output_available(&self) -> bool {
        self.interpreter.output_available()
    }

    /// Pop the oldest report; see [`TerminalInterpreter::take_output`]
    pub fn take_output(&mut self) -> Result<Vec<u8>> {
        self.interpreter.take_output()
    }

    pub fn drain_output(&mut self) -> Vec<Vec<u8>> {
        self.interpreter.drain_output()
    }

    /// Capture the current state
    pub fn snapshot(&self) -> Snapshot {
        let graphics = self.interpreter.graphics();
        Snapshot::capture(
            &self.buffer,
            self.interpreter.cursor(),
            self.interpreter.bounds(),
            GraphicsSnapshot {
                foreground: graphics.foreground(),
                background: graphics.background(),
                style: graphics.style_snapshot(),
            },
        )
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Process a block of bytes from the device.
    ///
    /// Returns the number of new lines started, so the caller can e.g.
    /// scroll to the bottom.
    pub fn input(&mut self, data: &[u8]) -> usize {
        let mut newlines = 0;

        for &byte in data {
            let line = self.prepare_row();

            if self.utf8.is_pending() {
                if Utf8Accumulator::is_continuation(byte) {
                    if self.utf8.feed(byte) == Utf8Step::Complete {
                        let bytes = self.utf8.bytes().to_vec();
                        self.utf8.reset();
                        self.put_char(line, &bytes);
                    }
                    continue;
                }
                // sequence cut short, keep what arrived
                let partial = self.utf8.bytes().to_vec();
                self.utf8.reset();
                tracing::debug!(?partial, "incomplete UTF-8 sequence");
                self.put_char(line, &partial);
            }

            match byte {
                0x00 => {}
                0x07 => {
                    self.bell.ring();
                }
                b'\r' => {
                    self.interpreter.cursor_mut().column = 0;
                    if self.newline_mode == NewLineMode::AddLfToCr {
                        self.new_line(line);
                        newlines += 1;
                    }
                }
                b'\n' => {
                    if self.newline_mode == NewLineMode::AddCrToLf {
                        self.interpreter.cursor_mut().column = 0;
                    }
                    self.new_line(line);
                    newlines += 1;
                }
                _ => {
                    if !self.parser.in_sequence() && self.utf8.feed(byte) == Utf8Step::Pending {
                        continue;
                    }
                    let result = self.parser.advance(byte);
                    if let Some(literal) = result.literal {
                        self.put_char(line, &[literal]);
                    } else if result.is_command() {
                        self.interpreter.apply(&result, &mut self.buffer);
                    }
                }
            }
        }

        newlines
    }

    /// Clamp the cursor row, make sure its line exists and return the
    /// buffer line it addresses
    fn prepare_row(&mut self) -> usize {
        let max_row = self.interpreter.bounds().line;
        let cursor = self.interpreter.cursor_mut();
        cursor.line = cursor.line.clamp(0, max_row);
        let row = cursor.line_index();

        self.buffer.ensure_line(row);
        self.interpreter
            .to_absolute(self.interpreter.cursor(), self.buffer.line_count())
            .line_index()
    }

    fn new_line(&mut self, line: usize) {
        self.buffer.insert_line(line + 1);
        let max_row = self.interpreter.bounds().line;
        let cursor = self.interpreter.cursor_mut();
        cursor.line = cursor.line.saturating_add(1).min(max_row);
    }

    fn put_char(&mut self, line: usize, bytes: &[u8]) {
        let style = self.interpreter.graphics().palette_index();
        let column = self.interpreter.cursor().column_index();
        let next = self.buffer.put_char(line, column, style, bytes);
        self.interpreter.cursor_mut().column = i32::try_from(next).unwrap_or(i32::MAX);
    }
}
