//! Transcript of finished lines
//!
//! [`TranscriptWriter`] is a [`LineCloseObserver`] that writes each line the
//! buffer finalizes to any [`io::Write`], one record per line:
//!
//! ```text
//! 12 14:03:59 login: root
//! ```
//!
//! The line number and the wall-clock time of the line's last change are
//! optional. Choosing and rotating files is up to the caller.

use std::cell::{Cell, Ref, RefCell};
use std::io::{self, Write};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::{Line, LineCloseObserver};

/// What goes into each transcript record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptOptions {
    pub enabled: bool,
    pub line_numbers: bool,
    pub timestamps: bool,
}

impl Default for TranscriptOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            line_numbers: true,
            timestamps: true,
        }
    }
}

/// Writes finalized lines to `W`
#[derive(Debug)]
pub struct TranscriptWriter<W: Write> {
    output: RefCell<W>,
    options: TranscriptOptions,
    lines_written: Cell<usize>,
}

impl<W: Write> TranscriptWriter<W> {
    pub fn new(output: W, options: TranscriptOptions) -> Self {
        Self {
            output: RefCell::new(output),
            options,
            lines_written: Cell::new(0),
        }
    }

    pub fn options(&self) -> TranscriptOptions {
        self.options
    }

    /// Records written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written.get()
    }

    /// Borrow the underlying writer
    pub fn get_ref(&self) -> Ref<'_, W> {
        self.output.borrow()
    }

    pub fn into_inner(self) -> W {
        self.output.into_inner()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.output.borrow_mut().flush()
    }

    /// Format one record, without the trailing newline
    pub fn format_record(&self, line_number: usize, line: &Line) -> String {
        let mut record = String::new();
        if self.options.line_numbers {
            record.push_str(&line_number.to_string());
            record.push(' ');
        }
        if self.options.timestamps {
            let time: DateTime<Local> = line.last_modified().into();
            record.push_str(&time.format("%H:%M:%S ").to_string());
        }
        record.push_str(&line.text());
        record
    }

    fn write_record(&self, line_number: usize, line: &Line) -> io::Result<()> {
        // a writer that feeds back into the terminal must not recurse
        let Ok(mut output) = self.output.try_borrow_mut() else {
            tracing::warn!(line_number, "re-entrant transcript write skipped");
            return Ok(());
        };
        let record = self.format_record(line_number, line);
        writeln!(output, "{record}")?;
        self.lines_written.set(self.lines_written.get() + 1);
        Ok(())
    }
}

impl<W: Write> LineCloseObserver for TranscriptWriter<W> {
    fn line_closed(&self, line_number: usize, line: &Line) {
        if !self.options.enabled {
            return;
        }
        if let Err(e) = self.write_record(line_number, line) {
            tracing::warn!(line_number, "transcript write failed: {e}");
        }
    }
}
