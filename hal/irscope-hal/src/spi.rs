//! SPI bus abstractions
//!
//! The display link is transmit-only: MOSI and SCK, with chip select and
//! data/command handled as plain GPIO by the display driver.

/// Register-level polled SPI master peripheral
pub trait SpiRegisters {
    /// Transmit buffer empty (TXE)
    fn tx_empty(&mut self) -> bool;

    /// Transfer in progress (BSY)
    fn busy(&mut self) -> bool;

    /// Write the data register
    fn write_data(&mut self, byte: u8);
}

/// SPI bus master, transmit direction
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write data, returning once the last bit has left the shifter
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Baud rate prescaler (power of two, 2..=256)
    pub prescaler: u16,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            prescaler: 2, // fastest
            mode: Mode::Mode0,
        }
    }
}

impl SpiConfig {
    /// BR field value for the prescaler (2 -> 0, 4 -> 1, ... 256 -> 7)
    pub fn baud_rate_bits(&self) -> u8 {
        let prescaler = self.prescaler.clamp(2, 256).next_power_of_two();
        (prescaler.trailing_zeros() as u8).saturating_sub(1).min(7)
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baud_rate_bits() {
        let mut config = SpiConfig::default();
        assert_eq!(config.baud_rate_bits(), 0);

        config.prescaler = 8;
        assert_eq!(config.baud_rate_bits(), 2);

        config.prescaler = 256;
        assert_eq!(config.baud_rate_bits(), 7);

        // Non powers of two round up
        config.prescaler = 5;
        assert_eq!(config.baud_rate_bits(), 2);
    }

    #[test]
    fn test_mode_split() {
        let (polarity, phase): (Polarity, Phase) = Mode::Mode3.into();
        assert_eq!(polarity, Polarity::IdleHigh);
        assert_eq!(phase, Phase::CaptureOnSecondTransition);
    }
}
