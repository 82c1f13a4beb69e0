//! False-color palettes and pixel scaling

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixel code mapped to intensity zero before offset and gain (27.5 °C)
pub const BASELINE_CODE: i16 = 110;

/// Heat-map palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Palette {
    #[default]
    Red,
    Green,
    Blue,
    White,
}

impl Palette {
    /// All palettes in menu order
    pub const ALL: [Palette; 4] = [Palette::Red, Palette::Green, Palette::Blue, Palette::White];

    /// Palette from a menu value; out-of-range values fall back to white
    pub fn from_index(index: i8) -> Self {
        match index {
            0 => Palette::Red,
            1 => Palette::Green,
            2 => Palette::Blue,
            _ => Palette::White,
        }
    }

    /// Menu value of this palette
    pub fn index(self) -> i8 {
        match self {
            Palette::Red => 0,
            Palette::Green => 1,
            Palette::Blue => 2,
            Palette::White => 3,
        }
    }

    /// Single-letter label
    pub fn letter(self) -> char {
        match self {
            Palette::Red => 'R',
            Palette::Green => 'G',
            Palette::Blue => 'B',
            Palette::White => 'W',
        }
    }

    /// Map an intensity to a 24-bit 0xRRGGBB color
    pub fn rgb(self, scale: u8) -> u32 {
        let s = scale as u32;
        match self {
            Palette::Red => s << 16,
            Palette::Green => s << 8,
            Palette::Blue => s,
            Palette::White => (s << 16) | (s << 8) | s,
        }
    }
}

/// Intensity of one pixel: `((code - baseline) + offset) << gain`, clamped to a byte
pub fn pixel_scale(code: i16, offset: i8, gain: i8) -> u8 {
    let shift = gain.clamp(0, 15) as u32;
    let level = (code as i32 - BASELINE_CODE as i32 + offset as i32) << shift;
    level.clamp(0, 255) as u8
}
