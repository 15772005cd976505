//! Graphics state (SGR)
//!
//! The current pen: format flags plus one optional foreground and one
//! optional background colour, folded from `ESC[...m` codes. The whole state
//! fits in one 32-bit mask:
//!
//! ```text
//! bits  0..8   format flags
//! bits  8..16  unused
//! bits 16..24  foreground, one-hot over the eight ANSI colours
//! bits 24..32  background, one-hot over the eight ANSI colours
//! ```

use bitflags::bitflags;

use crate::core::{PaletteIndex, StyleSnapshot};
use crate::error::{Error, Result};

bitflags! {
    /// Raw graphics mask
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GraphicsFlags: u32 {
        const BOLD          = 0x0000_0001;
        const DIM           = 0x0000_0002;
        const ITALIC        = 0x0000_0004;
        const UNDERLINE     = 0x0000_0008;
        const BLINK         = 0x0000_0010;
        const INVERSE       = 0x0000_0020;
        const HIDDEN        = 0x0000_0040;
        const STRIKETHROUGH = 0x0000_0080;

        const BLACK_FG      = 0x0001_0000;
        const RED_FG        = 0x0002_0000;
        const GREEN_FG      = 0x0004_0000;
        const YELLOW_FG     = 0x0008_0000;
        const BLUE_FG       = 0x0010_0000;
        const MAGENTA_FG    = 0x0020_0000;
        const CYAN_FG       = 0x0040_0000;
        const WHITE_FG      = 0x0080_0000;

        const BLACK_BG      = 0x0100_0000;
        const RED_BG        = 0x0200_0000;
        const GREEN_BG      = 0x0400_0000;
        const YELLOW_BG     = 0x0800_0000;
        const BLUE_BG       = 0x1000_0000;
        const MAGENTA_BG    = 0x2000_0000;
        const CYAN_BG       = 0x4000_0000;
        const WHITE_BG      = 0x8000_0000;

        const MASK_FORMAT   = 0x0000_00FF;
        const MASK_FG       = 0x00FF_0000;
        const MASK_BG       = 0xFF00_0000;
    }
}

const FG_SHIFT: u32 = 16;
const BG_SHIFT: u32 = 24;

/// Format flag toggled by an SGR set code (1..=9)
fn format_flag(code: u32) -> Option<GraphicsFlags> {
    Some(match code {
        1 => GraphicsFlags::BOLD,
        2 => GraphicsFlags::DIM,
        3 => GraphicsFlags::ITALIC,
        4 => GraphicsFlags::UNDERLINE,
        // slow and rapid blink
        5 | 6 => GraphicsFlags::BLINK,
        7 => GraphicsFlags::INVERSE,
        8 => GraphicsFlags::HIDDEN,
        9 => GraphicsFlags::STRIKETHROUGH,
        _ => return None,
    })
}

/// Flags cleared by an SGR reset code (22..=29)
fn reset_flags(code: u32) -> Option<GraphicsFlags> {
    Some(match code {
        22 => GraphicsFlags::BOLD | GraphicsFlags::DIM,
        23 => GraphicsFlags::ITALIC,
        24 => GraphicsFlags::UNDERLINE,
        25 => GraphicsFlags::BLINK,
        // reserved, nothing to clear
        26 => GraphicsFlags::empty(),
        27 => GraphicsFlags::INVERSE,
        28 => GraphicsFlags::HIDDEN,
        29 => GraphicsFlags::STRIKETHROUGH,
        _ => return None,
    })
}

/// Index (0..8) of the single bit set in a colour byte
fn colour_slot(byte: u32) -> Option<PaletteIndex> {
    if byte == 0 {
        None
    } else {
        PaletteIndex::ansi(byte.trailing_zeros() as usize)
    }
}

/// Current SGR state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsState {
    flags: GraphicsFlags,
}

impl GraphicsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw 32-bit mask
    pub fn bits(&self) -> u32 {
        self.flags.bits()
    }

    pub fn flags(&self) -> GraphicsFlags {
        self.flags
    }

    pub fn reset(&mut self) {
        self.flags = GraphicsFlags::empty();
    }

    /// Apply one SGR code.
    ///
    /// Unknown codes leave the state untouched and return
    /// [`Error::UnsupportedGraphicsCode`].
    pub fn update(&mut self, code: u32) -> Result<()> {
        match code {
            0 => self.reset(),
            1..=9 => {
                if let Some(flag) = format_flag(code) {
                    self.flags.insert(flag);
                }
            }
            22..=29 => {
                if let Some(flags) = reset_flags(code) {
                    self.flags.remove(flags);
                }
            }
            30..=37 => {
                self.flags.remove(GraphicsFlags::MASK_FG);
                self.flags |= GraphicsFlags::from_bits_retain(1 << (FG_SHIFT + code - 30));
            }
            39 => self.flags.remove(GraphicsFlags::MASK_FG),
            40..=47 => {
                self.flags.remove(GraphicsFlags::MASK_BG);
                self.flags |= GraphicsFlags::from_bits_retain(1 << (BG_SHIFT + code - 40));
            }
            49 => self.flags.remove(GraphicsFlags::MASK_BG),
            _ => return Err(Error::UnsupportedGraphicsCode(code)),
        }
        Ok(())
    }

    /// Fold `codes` left to right.
    ///
    /// Every valid code is applied even if an earlier one failed; the first
    /// failure is returned. An empty list resets the state, like `ESC[m`.
    pub fn update_all(&mut self, codes: &[u32]) -> Result<()> {
        if codes.is_empty() {
            self.reset();
            return Ok(());
        }

        let mut first_error = None;
        for &code in codes {
            if let Err(e) = self.update(code) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Foreground colour, `None` for the default
    pub fn foreground(&self) -> Option<PaletteIndex> {
        colour_slot((self.flags & GraphicsFlags::MASK_FG).bits() >> FG_SHIFT)
    }

    /// Background colour, `None` for the default
    pub fn background(&self) -> Option<PaletteIndex> {
        colour_slot((self.flags & GraphicsFlags::MASK_BG).bits() >> BG_SHIFT)
    }

    /// Format flags only
    pub fn format(&self) -> GraphicsFlags {
        self.flags & GraphicsFlags::MASK_FORMAT
    }

    pub fn is_bold(&self) -> bool {
        self.flags.contains(GraphicsFlags::BOLD)
    }

    pub fn is_dim(&self) -> bool {
        self.flags.contains(GraphicsFlags::DIM)
    }

    pub fn is_italic(&self) -> bool {
        self.flags.contains(GraphicsFlags::ITALIC)
    }

    pub fn is_underline(&self) -> bool {
        self.flags.contains(GraphicsFlags::UNDERLINE)
    }

    pub fn is_blinking(&self) -> bool {
        self.flags.contains(GraphicsFlags::BLINK)
    }

    pub fn is_inverse(&self) -> bool {
        self.flags.contains(GraphicsFlags::INVERSE)
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(GraphicsFlags::HIDDEN)
    }

    pub fn is_strikethrough(&self) -> bool {
        self.flags.contains(GraphicsFlags::STRIKETHROUGH)
    }

    /// Palette slot glyphs are written with.
    ///
    /// Inverse video draws text in the background colour.
    pub fn palette_index(&self) -> PaletteIndex {
        let colour = if self.is_inverse() {
            self.background()
        } else {
            self.foreground()
        };
        colour.unwrap_or(PaletteIndex::Default)
    }

    pub fn style_snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            bold: self.is_bold(),
            faint: self.is_dim(),
            italic: self.is_italic(),
            underline: self.is_underline(),
            blink: self.is_blinking(),
            inverse: self.is_inverse(),
            hidden: self.is_hidden(),
            strikethrough: self.is_strikethrough(),
        }
    }
}
