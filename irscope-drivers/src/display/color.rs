//! RGB565 colors in controller byte order
//!
//! The controller takes RGB565 high byte first. Colors are stored with
//! their bytes already swapped so a little-endian dump of the value is
//! the wire order.

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};

/// A packed, byte-swapped RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color565(u16);

impl Color565 {
    pub const BLACK: Self = Self::from_rgb(0x00_00_00);
    pub const WHITE: Self = Self::from_rgb(0xFF_FF_FF);
    pub const RED: Self = Self::from_rgb(0xFF_00_00);

    /// Pack a 24-bit 0xRRGGBB color
    pub const fn from_rgb(rgb: u32) -> Self {
        let r = (rgb >> 16) & 0xF8;
        let g = (rgb >> 8) & 0xFC;
        let b = rgb & 0xF8;
        let rgb565 = ((r << 8) | (g << 3) | (b >> 3)) as u16;
        Self(rgb565.swap_bytes())
    }

    /// Pack separate 8-bit channels
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Unpack to 0xRRGGBB; the low 3/2/3 bits of each channel are zero
    pub const fn to_rgb(self) -> u32 {
        let rgb565 = self.0.swap_bytes() as u32;
        let r = (rgb565 & 0xF800) >> 8;
        let g = (rgb565 & 0x07E0) >> 3;
        let b = (rgb565 & 0x001F) << 3;
        (r << 16) | (g << 8) | b
    }

    /// Unpack to separate channels
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let rgb = self.to_rgb();
        ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Stored (byte-swapped) value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Bytes in wire order
    pub const fn bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl From<Rgb565> for Color565 {
    fn from(color: Rgb565) -> Self {
        Self(color.into_storage().swap_bytes())
    }
}

impl From<Color565> for Rgb565 {
    fn from(color: Color565) -> Self {
        let (r, g, b) = color.to_rgb888();
        Rgb565::new(r >> 3, g >> 2, b >> 3)
    }
}
