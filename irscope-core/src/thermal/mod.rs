//! Thermal data: frames, temperature conversion and false-color mapping

pub mod convert;
pub mod palette;

pub use convert::{decode_pixel, decode_thermistor, Reading, TempUnit};
pub use palette::{pixel_scale, Palette, BASELINE_CODE};

/// Elements per side of the sensor array
pub const GRID_SIZE: usize = 8;

/// Elements in one frame
pub const PIXEL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// One decoded frame of the 8x8 array, in quarter degrees Celsius
///
/// Index 0 is the first element the sensor reports; rows follow
/// row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermalFrame {
    codes: [i16; PIXEL_COUNT],
}

impl Default for ThermalFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalFrame {
    /// Create an all-zero frame
    pub const fn new() -> Self {
        Self {
            codes: [0; PIXEL_COUNT],
        }
    }

    /// Decode a frame from the raw 128-byte register block
    pub fn from_raw(raw: &[u8; 2 * PIXEL_COUNT]) -> Self {
        let mut frame = Self::new();
        for (code, pair) in frame.codes.iter_mut().zip(raw.chunks_exact(2)) {
            *code = decode_pixel(u16::from_le_bytes([pair[0], pair[1]]));
        }
        frame
    }

    /// Code at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> i16 {
        self.codes[y * GRID_SIZE + x]
    }

    /// The element the readout tracks (3,3)
    pub fn center(&self) -> i16 {
        self.get(3, 3)
    }

    /// All codes in row-major order
    pub fn codes(&self) -> &[i16; PIXEL_COUNT] {
        &self.codes
    }

    /// Hottest and coldest codes
    pub fn min_max(&self) -> (i16, i16) {
        self.codes
            .iter()
            .fold((i16::MAX, i16::MIN), |(lo, hi), &c| (lo.min(c), hi.max(c)))
    }
}
