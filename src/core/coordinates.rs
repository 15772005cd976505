//! Character coordinates
//!
//! A coordinate addresses one cell of a uniform grid as it is rendered.
//! Tabs occupy as many columns as needed to reach the next tab stop, so
//! column 5 in `"\tABC"` with a tab size of 4 is the `B`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(line, column)` pair, ordered by line then column
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coordinates {
    pub line: i32,
    pub column: i32,
}

impl Coordinates {
    /// Sentinel for "no position"
    pub const INVALID: Coordinates = Coordinates {
        line: -1,
        column: -1,
    };

    /// Create a coordinate; both components must be non-negative
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line: i32::try_from(line).unwrap_or(i32::MAX),
            column: i32::try_from(column).unwrap_or(i32::MAX),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.line >= 0 && self.column >= 0
    }

    /// Line as an index; `INVALID` maps to 0
    pub fn line_index(&self) -> usize {
        usize::try_from(self.line).unwrap_or(0)
    }

    /// Column as an index; `INVALID` maps to 0
    pub fn column_index(&self) -> usize {
        usize::try_from(self.column).unwrap_or(0)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}
