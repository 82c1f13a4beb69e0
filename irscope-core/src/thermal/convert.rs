//! Temperature decoding and unit conversion
//!
//! Everything stays in fixed point. The on-chip thermistor reports
//! sixteenths of a degree, the array elements report quarters.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fractional bits of a thermistor value (0.0625 °C/LSB)
pub const THERMISTOR_FRAC_BITS: u8 = 4;

/// Fractional bits of a pixel value (0.25 °C/LSB)
pub const PIXEL_FRAC_BITS: u8 = 2;

/// Display temperature unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    /// Unit from a menu value (0 = C, anything else = F)
    pub fn from_index(index: i8) -> Self {
        if index == 0 {
            TempUnit::Celsius
        } else {
            TempUnit::Fahrenheit
        }
    }

    /// Menu value of this unit
    pub fn index(self) -> i8 {
        match self {
            TempUnit::Celsius => 0,
            TempUnit::Fahrenheit => 1,
        }
    }

    /// Single-letter label
    pub fn letter(self) -> char {
        match self {
            TempUnit::Celsius => 'C',
            TempUnit::Fahrenheit => 'F',
        }
    }
}

/// Decode the 12-bit sign-magnitude thermistor register (TTHL/TTHH)
pub fn decode_thermistor(raw: u16) -> i16 {
    let magnitude = (raw & 0x07FF) as i16;
    if raw & 0x0800 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Decode a 12-bit two's complement pixel register pair
pub fn decode_pixel(raw: u16) -> i16 {
    // Shift the sign bit up to bit 15, then arithmetic shift back
    ((raw << 4) as i16) >> 4
}

/// Convert a Celsius fixed-point value to the requested unit
///
/// Fahrenheit uses 1843/1024 as the 9/5 factor.
pub fn convert(value: i32, frac_bits: u8, unit: TempUnit) -> i32 {
    match unit {
        TempUnit::Celsius => value,
        TempUnit::Fahrenheit => ((1843 * value) >> 10) + (32 << frac_bits),
    }
}

/// A fixed-point temperature ready for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Raw fixed-point value in the display unit
    pub value: i32,
    /// Number of fractional bits in `value`
    pub frac_bits: u8,
}

impl Reading {
    /// Thermistor reading (sixteenths) in the given unit
    pub fn thermistor(sixteenths: i16, unit: TempUnit) -> Self {
        Self {
            value: convert(sixteenths as i32, THERMISTOR_FRAC_BITS, unit),
            frac_bits: THERMISTOR_FRAC_BITS,
        }
    }

    /// Pixel reading (quarters) in the given unit
    pub fn pixel(quarters: i16, unit: TempUnit) -> Self {
        Self {
            value: convert(quarters as i32, PIXEL_FRAC_BITS, unit),
            frac_bits: PIXEL_FRAC_BITS,
        }
    }

    /// Whole degrees, truncated toward zero
    pub fn whole(&self) -> i32 {
        let magnitude = self.value.unsigned_abs() >> self.frac_bits;
        if self.value < 0 {
            -(magnitude as i32)
        } else {
            magnitude as i32
        }
    }

    /// Decimal digits of the fractional part and their count
    ///
    /// 4 fractional bits give 4 digits (x625), 2 give 2 digits (x25).
    pub fn fraction(&self) -> (u32, usize) {
        let mask = (1u32 << self.frac_bits) - 1;
        let frac = self.value.unsigned_abs() & mask;
        match self.frac_bits {
            0 => (0, 0),
            1 => (frac * 5, 1),
            2 => (frac * 25, 2),
            3 => (frac * 125, 3),
            _ => (frac * 625 >> (self.frac_bits - 4), 4),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value < 0 { "-" } else { "" };
        let whole = self.whole().unsigned_abs();
        let (frac, digits) = self.fraction();
        if digits == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            write!(f, "{}{}.{:0width$}", sign, whole, frac, width = digits)
        }
    }
}
