//! CSI command identifiers
//!
//! The final letter of a sequence, mapped onto the commands the interpreter
//! knows. Anything else stays [`CommandKind::Unrecognized`].

/// Command selected by a CSI final byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// CUP - `H`
    CursorPosition,
    /// HVP - `f`
    HorizontalVerticalPosition,
    /// CUU - `A`
    CursorUp,
    /// CUD - `B`
    CursorDown,
    /// CUF - `C`
    CursorForward,
    /// CUB - `D`
    CursorBack,
    /// CNL - `E`
    CursorNextLine,
    /// CPL - `F`
    CursorPreviousLine,
    /// CHA - `G`
    CursorColumn,
    /// SCOSC - `s`
    SaveCursor,
    /// SCORC - `u`
    RestoreCursor,
    /// ED - `J`
    EraseInDisplay,
    /// EL - `K`
    EraseInLine,
    /// SGR - `m`
    SelectGraphicRendition,
    /// DSR - `n`
    DeviceStatusReport,
    Unrecognized(u8),
}

impl CommandKind {
    pub fn from_identifier(identifier: u8) -> Self {
        match identifier {
            b'H' => CommandKind::CursorPosition,
            b'f' => CommandKind::HorizontalVerticalPosition,
            b'A' => CommandKind::CursorUp,
            b'B' => CommandKind::CursorDown,
            b'C' => CommandKind::CursorForward,
            b'D' => CommandKind::CursorBack,
            b'E' => CommandKind::CursorNextLine,
            b'F' => CommandKind::CursorPreviousLine,
            b'G' => CommandKind::CursorColumn,
            b's' => CommandKind::SaveCursor,
            b'u' => CommandKind::RestoreCursor,
            b'J' => CommandKind::EraseInDisplay,
            b'K' => CommandKind::EraseInLine,
            b'm' => CommandKind::SelectGraphicRendition,
            b'n' => CommandKind::DeviceStatusReport,
            other => CommandKind::Unrecognized(other),
        }
    }

    /// The final byte this command is encoded with
    pub fn identifier(self) -> u8 {
        match self {
            CommandKind::CursorPosition => b'H',
            CommandKind::HorizontalVerticalPosition => b'f',
            CommandKind::CursorUp => b'A',
            CommandKind::CursorDown => b'B',
            CommandKind::CursorForward => b'C',
            CommandKind::CursorBack => b'D',
            CommandKind::CursorNextLine => b'E',
            CommandKind::CursorPreviousLine => b'F',
            CommandKind::CursorColumn => b'G',
            CommandKind::SaveCursor => b's',
            CommandKind::RestoreCursor => b'u',
            CommandKind::EraseInDisplay => b'J',
            CommandKind::EraseInLine => b'K',
            CommandKind::SelectGraphicRendition => b'm',
            CommandKind::DeviceStatusReport => b'n',
            CommandKind::Unrecognized(byte) => byte,
        }
    }

    /// Whether the command may move the cursor
    pub fn moves_cursor(self) -> bool {
        matches!(
            self,
            CommandKind::CursorPosition
                | CommandKind::HorizontalVerticalPosition
                | CommandKind::CursorUp
                | CommandKind::CursorDown
                | CommandKind::CursorForward
                | CommandKind::CursorBack
                | CommandKind::CursorNextLine
                | CommandKind::CursorPreviousLine
                | CommandKind::CursorColumn
                | CommandKind::RestoreCursor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_mapping() {
        for byte in b'A'..=b'z' {
            assert_eq!(CommandKind::from_identifier(byte).identifier(), byte);
        }
        assert_eq!(CommandKind::from_identifier(b'J'), CommandKind::EraseInDisplay);
        assert_eq!(CommandKind::from_identifier(b'h'), CommandKind::Unrecognized(b'h'));
    }

    #[test]
    fn test_moves_cursor() {
        assert!(CommandKind::CursorUp.moves_cursor());
        assert!(CommandKind::RestoreCursor.moves_cursor());
        assert!(!CommandKind::EraseInLine.moves_cursor());
        assert!(!CommandKind::SelectGraphicRendition.moves_cursor());
    }
}
