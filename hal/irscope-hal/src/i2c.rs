//! I2C bus abstractions
//!
//! Two layers live here:
//!
//! - [`I2cRegisters`] is the register-level view of an STM32-style (v1)
//!   I2C peripheral: a combined status word, START/STOP/ACK control bits
//!   and the data register. Chip HALs implement it.
//! - [`I2cBus`] is the transaction-level view used by device drivers. The
//!   polled protocol engine in `irscope-drivers` implements it on top of
//!   any [`I2cRegisters`].

/// Status flags in the combined status word
///
/// SR1 occupies the low half and SR2 the high half, matching the layout
/// used by the vendor event constants.
pub mod status {
    /// Start bit generated (SR1)
    pub const SB: u32 = 1 << 0;
    /// Address sent / matched (SR1)
    pub const ADDR: u32 = 1 << 1;
    /// Byte transfer finished (SR1)
    pub const BTF: u32 = 1 << 2;
    /// Data register not empty, receiver (SR1)
    pub const RXNE: u32 = 1 << 6;
    /// Data register empty, transmitter (SR1)
    pub const TXE: u32 = 1 << 7;
    /// Master mode (SR2)
    pub const MSL: u32 = 1 << 16;
    /// Bus busy (SR2)
    pub const BUSY: u32 = 1 << 17;
    /// Transmitter / receiver (SR2)
    pub const TRA: u32 = 1 << 18;
}

/// Composite event masks checked to confirm a protocol phase
pub mod event {
    use super::status::*;

    /// BUSY, MSL and SB
    pub const MASTER_MODE_SELECT: u32 = BUSY | MSL | SB;
    /// BUSY, MSL, ADDR, TXE and TRA
    pub const MASTER_TRANSMITTER_MODE_SELECTED: u32 = BUSY | MSL | ADDR | TXE | TRA;
    /// BUSY, MSL and ADDR
    pub const MASTER_RECEIVER_MODE_SELECTED: u32 = BUSY | MSL | ADDR;
    /// TRA, BUSY, MSL, TXE and BTF
    pub const MASTER_BYTE_TRANSMITTED: u32 = TRA | BUSY | MSL | TXE | BTF;
    /// BUSY, MSL and RXNE
    pub const MASTER_BYTE_RECEIVED: u32 = BUSY | MSL | RXNE;

    /// Check whether every flag in `mask` is set in `status`
    #[inline]
    pub const fn reached(status: u32, mask: u32) -> bool {
        status & mask == mask
    }
}

/// Register-level polled I2C master peripheral
pub trait I2cRegisters {
    /// Read the combined status word (SR1 | SR2 << 16)
    ///
    /// Implementations must read SR1 before SR2; that read order is what
    /// clears ADDR on the hardware.
    fn status(&mut self) -> u32;

    /// Request a START (or repeated START) condition
    fn generate_start(&mut self);

    /// Request a STOP condition
    fn generate_stop(&mut self);

    /// Enable or disable acknowledge of received bytes
    fn set_ack(&mut self, enabled: bool);

    /// Write the data register
    fn write_data(&mut self, byte: u8);

    /// Read the data register
    fn read_data(&mut self) -> u8;

    /// Reset the peripheral through the clock controller and program it
    /// from scratch: logic clock, bus timing, enable and ACK mode.
    fn reinit(&mut self, config: &I2cConfig);
}

/// I2C bus master
///
/// Basic I2C transactions for communicating with peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Fast-mode SCL duty cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FastDuty {
    /// Tlow/Thigh = 2 (33% high)
    Ratio2,
    /// Tlow/Thigh = 16/9 (36% high)
    Ratio16By9,
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// SCL frequency in Hz; must be below `logic_clock`
    pub frequency: u32,
    /// Peripheral logic clock in Hz (programmed into the FREQ field)
    pub logic_clock: u32,
    /// Duty cycle used above 100 kHz
    pub duty: FastDuty,
    /// Iterations every wait phase may spin before it is declared a fault
    pub timeout_iterations: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
            logic_clock: 2_000_000,
            duty: FastDuty::Ratio2,
            timeout_iterations: 100_000,
        }
    }
}

/// Register values derived from an [`I2cConfig`] and the system clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cTiming {
    /// CR2.FREQ
    pub freq: u8,
    /// CCR.CCR
    pub ccr: u16,
    /// CCR.F/S
    pub fast_mode: bool,
    /// CCR.DUTY
    pub duty_16_9: bool,
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        logic_clock: 2_000_000,
        duty: FastDuty::Ratio2,
        timeout_iterations: 100_000,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency: 400_000,
        logic_clock: 8_000_000,
        duty: FastDuty::Ratio2,
        timeout_iterations: 100_000,
    };

    /// Compute the timing register values for a given system clock
    pub fn timing(&self, sysclk: u32) -> I2cTiming {
        let freq = ((sysclk / self.logic_clock.max(1)) & 0x3F) as u8;
        let bus = self.frequency.max(1);

        if bus <= 100_000 {
            I2cTiming {
                freq,
                ccr: ((sysclk / (2 * bus)) & 0x0FFF) as u16,
                fast_mode: false,
                duty_16_9: false,
            }
        } else {
            let (divisor, duty_16_9) = match self.duty {
                FastDuty::Ratio2 => (3, false),
                FastDuty::Ratio16By9 => (25, true),
            };
            I2cTiming {
                freq,
                ccr: ((sysclk / (divisor * bus)) & 0x0FFF) as u16,
                fast_mode: true,
                duty_16_9,
            }
        }
    }
}
