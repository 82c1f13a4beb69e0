//! AMG8833 8x8 infrared array sensor (Grid-EYE)
//!
//! # Protocol
//!
//! All registers are 8 bits wide behind a 7-bit I2C address. Writes are
//! a single `[register, value]` packet, reads are register-indexed
//! (register select, repeated START, N bytes). Multi-byte values are
//! little-endian.
//!
//! # Data
//!
//! - Thermistor (TTHL/TTHH): 12-bit sign-magnitude, 0.0625 °C/LSB
//! - Pixels (T01L..): 64 x 12-bit two's complement, 0.25 °C/LSB

use irscope_core::config::FrameRate;
use irscope_core::thermal::{decode_thermistor, ThermalFrame, PIXEL_COUNT};
use irscope_core::traits::ThermalSensor;
use irscope_hal::i2c::I2cBus;

/// Default 7-bit address (AD_SELECT high)
pub const DEFAULT_ADDRESS: u8 = 0x69;

/// AMG8833 register addresses
pub mod reg {
    /// Power control
    pub const PCTL: u8 = 0x00;
    /// Reset
    pub const RST: u8 = 0x01;
    /// Frame rate
    pub const FPSC: u8 = 0x02;
    /// Interrupt control
    pub const INTC: u8 = 0x03;
    /// Status
    pub const STAT: u8 = 0x04;
    /// Status clear
    pub const SCLR: u8 = 0x05;
    /// Moving average
    pub const AVE: u8 = 0x07;
    /// Interrupt upper level, low byte
    pub const INTHL: u8 = 0x08;
    /// Interrupt upper level, high byte
    pub const INTHH: u8 = 0x09;
    /// Interrupt lower level, low byte
    pub const INTLL: u8 = 0x0A;
    /// Interrupt lower level, high byte
    pub const INTLH: u8 = 0x0B;
    /// Interrupt hysteresis, low byte
    pub const INTSL: u8 = 0x0C;
    /// Interrupt hysteresis, high byte
    pub const INTSH: u8 = 0x0D;
    /// Thermistor, low byte
    pub const TTHL: u8 = 0x0E;
    /// Thermistor, high byte
    pub const TTHH: u8 = 0x0F;
    /// Interrupt table, pixels 1-8
    pub const INT0: u8 = 0x10;
    pub const INT1: u8 = 0x11;
    pub const INT2: u8 = 0x12;
    pub const INT3: u8 = 0x13;
    pub const INT4: u8 = 0x14;
    pub const INT5: u8 = 0x15;
    pub const INT6: u8 = 0x16;
    /// Interrupt table, pixels 57-64
    pub const INT7: u8 = 0x17;
    /// Moving average mode setting
    pub const SETAVG: u8 = 0x1F;
    /// Pixel 1, low byte (start of the 128-byte array)
    pub const T01L: u8 = 0x80;
}

/// Register values
pub mod val {
    /// PCTL: normal mode
    pub const PCTL_NORMAL: u8 = 0x00;
    /// PCTL: sleep mode
    pub const PCTL_SLEEP: u8 = 0x10;
    /// RST: flag reset (clears status and interrupt table)
    pub const RST_FLAG: u8 = 0x30;
    /// RST: initial reset (flag reset plus settings back to defaults)
    pub const RST_INIT: u8 = 0x3F;
    /// FPSC: 10 frames per second
    pub const FPSC_10HZ: u8 = 0x00;
    /// FPSC: 1 frame per second
    pub const FPSC_1HZ: u8 = 0x01;
    /// INTC: absolute value interrupt mode
    pub const INTC_ABSOLUTE: u8 = 0x02;
    /// INTC: interrupt output enabled
    pub const INTC_ENABLE: u8 = 0x01;
    /// INTC: interrupt output disabled
    pub const INTC_DISABLE: u8 = 0x00;
}

/// Sensor error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError<E> {
    /// Bus transfer failed
    Bus(E),
}

impl<E> From<E> for SensorError<E> {
    fn from(e: E) -> Self {
        SensorError::Bus(e)
    }
}

/// AMG8833 driver over any I2C bus
pub struct Amg8833<B> {
    bus: B,
    address: u8,
    frame_rate: FrameRate,
}

impl<B: I2cBus> Amg8833<B> {
    /// Create a driver at the default address, 10 frames per second
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            address: DEFAULT_ADDRESS,
            frame_rate: FrameRate::Hz10,
        }
    }

    /// Use a different 7-bit address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Frame rate programmed by [`Self::init`]
    pub fn with_frame_rate(mut self, rate: FrameRate) -> Self {
        self.frame_rate = rate;
        self
    }

    /// Borrow the bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Write one register
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError<B::Error>> {
        self.bus.write(self.address, &[register, value])?;
        Ok(())
    }

    /// Read one register
    pub fn read_register(&mut self, register: u8) -> Result<u8, SensorError<B::Error>> {
        let mut buf = [0u8; 1];
        self.read_registers(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Read consecutive registers starting at `register`
    pub fn read_registers(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), SensorError<B::Error>> {
        self.bus.write_read(self.address, &[register], buf)?;
        Ok(())
    }

    /// Bring the sensor up: normal mode, initial reset, interrupts off,
    /// frame rate. Stops at the first failure.
    pub fn init(&mut self) -> Result<(), SensorError<B::Error>> {
        self.write_register(reg::PCTL, val::PCTL_NORMAL)?;
        self.write_register(reg::RST, val::RST_INIT)?;
        self.write_register(reg::INTC, val::INTC_DISABLE)?;
        self.set_frame_rate(self.frame_rate)
    }

    /// Program the frame rate
    pub fn set_frame_rate(&mut self, rate: FrameRate) -> Result<(), SensorError<B::Error>> {
        let value = match rate {
            FrameRate::Hz10 => val::FPSC_10HZ,
            FrameRate::Hz1 => val::FPSC_1HZ,
        };
        self.write_register(reg::FPSC, value)?;
        self.frame_rate = rate;
        Ok(())
    }

    /// Enter sleep mode
    pub fn sleep(&mut self) -> Result<(), SensorError<B::Error>> {
        self.write_register(reg::PCTL, val::PCTL_SLEEP)
    }

    /// Return to normal mode
    pub fn wake(&mut self) -> Result<(), SensorError<B::Error>> {
        self.write_register(reg::PCTL, val::PCTL_NORMAL)
    }

    /// Status flags (overflow bits)
    pub fn status(&mut self) -> Result<u8, SensorError<B::Error>> {
        self.read_register(reg::STAT)
    }

    /// Clear status flags
    pub fn clear_status(&mut self, flags: u8) -> Result<(), SensorError<B::Error>> {
        self.write_register(reg::SCLR, flags)
    }

    /// Raw thermistor register pair
    pub fn read_thermistor_raw(&mut self) -> Result<u16, SensorError<B::Error>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg::TTHL, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Raw 128-byte pixel block
    pub fn read_array_raw(
        &mut self,
        raw: &mut [u8; 2 * PIXEL_COUNT],
    ) -> Result<(), SensorError<B::Error>> {
        self.read_registers(reg::T01L, raw)
    }
}

impl<B: I2cBus> ThermalSensor for Amg8833<B> {
    type Error = SensorError<B::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        Amg8833::init(self)
    }

    fn read_thermistor(&mut self) -> Result<i16, Self::Error> {
        Ok(decode_thermistor(self.read_thermistor_raw()?))
    }

    fn read_frame(&mut self, frame: &mut ThermalFrame) -> Result<(), Self::Error> {
        let mut raw = [0u8; 2 * PIXEL_COUNT];
        self.read_array_raw(&mut raw)?;
        *frame = ThermalFrame::from_raw(&raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::sim::{SimEvent, SimI2c};
    use crate::bus::{I2cError, Phase, PolledI2c};
    use irscope_hal::i2c::I2cConfig;

    fn sensor() -> Amg8833<PolledI2c<SimI2c>> {
        let config = I2cConfig {
            timeout_iterations: 1000,
            ..I2cConfig::default()
        };
        Amg8833::new(PolledI2c::new(SimI2c::new(DEFAULT_ADDRESS), config))
    }

    fn writes(sim: &SimI2c) -> heapless::Vec<u8, 64> {
        sim.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Write(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let mut sensor = sensor();
        sensor.init().unwrap();

        let sim = sensor.release().release();
        assert_eq!(
            writes(&sim).as_slice(),
            &[
                0xD2, reg::PCTL, val::PCTL_NORMAL,
                0xD2, reg::RST, val::RST_INIT,
                0xD2, reg::INTC, val::INTC_DISABLE,
                0xD2, reg::FPSC, val::FPSC_10HZ,
            ]
        );
    }

    #[test]
    fn test_init_aborts_on_first_failure() {
        let config = I2cConfig {
            timeout_iterations: 10,
            ..I2cConfig::default()
        };
        let mut sim = SimI2c::new(DEFAULT_ADDRESS);
        sim.nack = true;
        let mut sensor = Amg8833::new(PolledI2c::new(sim, config));

        let result = sensor.init();
        assert_eq!(result, Err(SensorError::Bus(I2cError::Timeout(Phase::TxMode))));

        let sim = sensor.release().release();
        // Only the first address byte went out
        assert_eq!(writes(&sim).as_slice(), &[0xD2]);
        assert_eq!(sim.reinits, 1);
    }

    #[test]
    fn test_frame_rate_and_power() {
        let mut sensor = sensor().with_frame_rate(FrameRate::Hz1);
        sensor.init().unwrap();
        assert_eq!(sensor.bus().registers().registers[reg::FPSC as usize], val::FPSC_1HZ);

        sensor.sleep().unwrap();
        assert_eq!(sensor.bus().registers().registers[reg::PCTL as usize], val::PCTL_SLEEP);
        sensor.wake().unwrap();
        assert_eq!(sensor.bus().registers().registers[reg::PCTL as usize], val::PCTL_NORMAL);
    }

    #[test]
    fn test_read_thermistor() {
        let mut sim = SimI2c::new(DEFAULT_ADDRESS);
        // 0x0199 = 25.5625 °C
        sim.registers[reg::TTHL as usize] = 0x99;
        sim.registers[reg::TTHH as usize] = 0x01;
        let mut sensor = Amg8833::new(PolledI2c::new(sim, I2cConfig::default()));

        assert_eq!(sensor.read_thermistor_raw().unwrap(), 0x0199);
        assert_eq!(ThermalSensor::read_thermistor(&mut sensor).unwrap(), 409);
    }

    #[test]
    fn test_read_negative_thermistor() {
        let mut sim = SimI2c::new(DEFAULT_ADDRESS);
        sim.registers[reg::TTHL as usize] = 0x10;
        sim.registers[reg::TTHH as usize] = 0x08;
        let mut sensor = Amg8833::new(PolledI2c::new(sim, I2cConfig::default()));
        assert_eq!(ThermalSensor::read_thermistor(&mut sensor).unwrap(), -16);
    }

    #[test]
    fn test_read_frame() {
        let mut sim = SimI2c::new(DEFAULT_ADDRESS);
        for i in 0..PIXEL_COUNT {
            let code = (100 + i) as u16;
            let [lo, hi] = code.to_le_bytes();
            sim.registers[reg::T01L as usize + 2 * i] = lo;
            sim.registers[reg::T01L as usize + 2 * i + 1] = hi;
        }
        // Element 63 negative: -0.5 °C
        sim.registers[0xFE] = 0xFE;
        sim.registers[0xFF] = 0x0F;
        let mut sensor = Amg8833::new(PolledI2c::new(sim, I2cConfig::default()));

        let mut frame = ThermalFrame::new();
        sensor.read_frame(&mut frame).unwrap();
        assert_eq!(frame.get(0, 0), 100);
        assert_eq!(frame.center(), 127);
        assert_eq!(frame.get(7, 7), -2);

        // One indexed read of 128 bytes: 128 data reads, last one NACKed
        let sim = sensor.release().release();
        let reads = sim
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Read(_)))
            .count();
        assert_eq!(reads, 128);
        let acks = sim.acks();
        assert_eq!(acks.iter().filter(|a| !**a).count(), 1);
    }

    #[test]
    fn test_status_roundtrip() {
        let mut sim = SimI2c::new(DEFAULT_ADDRESS);
        sim.registers[reg::STAT as usize] = 0x06;
        let mut sensor = Amg8833::new(PolledI2c::new(sim, I2cConfig::default()));
        assert_eq!(sensor.status().unwrap(), 0x06);
        sensor.clear_status(0x06).unwrap();
        assert_eq!(sensor.bus().registers().registers[reg::SCLR as usize], 0x06);
    }
}
