//! Polled I2C master engine
//!
//! Drives an [`I2cRegisters`] peripheral through the START, address,
//! data and STOP phases by polling its status word. Every wait point has
//! its own [`Phase`] and the same iteration budget.
//!
//! # Fault policy
//!
//! When a wait runs out of polls the engine logs the phase, resets and
//! reprograms the whole peripheral once, and returns
//! [`I2cError::Timeout`]. Nothing is retried; the caller decides.
//!
//! # Reads
//!
//! ACK is programmed once per received byte before waiting for it: on
//! for every byte but the last, off for the last. A one-byte read clears
//! ACK before its address phase instead, since the peripheral latches
//! ACK when ADDR clears. ACK is turned back on after the STOP so the next
//! transfer starts from a known state.

use irscope_hal::i2c::{event, status, I2cBus, I2cConfig, I2cRegisters};

use super::poll;

/// Wait points of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Bus idle before START
    NotBusy,
    /// START (or repeated START) taken, master mode entered
    MasterMode,
    /// Address acknowledged, transmitter mode
    TxMode,
    /// Address acknowledged, receiver mode
    RxMode,
    /// Data register free for the next byte
    TxEmpty,
    /// Last byte shifted out
    TxComplete,
    /// Received byte available
    RxFull,
}

/// I2C engine error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// A wait phase exhausted its budget; the peripheral was reinitialized
    Timeout(Phase),
}

/// Direction bit of the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Write,
    Read,
}

/// Polled I2C master over a register-level peripheral
pub struct PolledI2c<P> {
    regs: P,
    config: I2cConfig,
}

impl<P: I2cRegisters> PolledI2c<P> {
    /// Wrap a peripheral; nothing is programmed until [`Self::init`]
    pub fn new(regs: P, config: I2cConfig) -> Self {
        Self { regs, config }
    }

    /// Reset and program the peripheral
    pub fn init(&mut self) {
        self.regs.reinit(&self.config);
    }

    /// Active configuration
    pub fn config(&self) -> &I2cConfig {
        &self.config
    }

    /// Borrow the underlying peripheral
    pub fn registers(&self) -> &P {
        &self.regs
    }

    /// Release the underlying peripheral
    pub fn release(self) -> P {
        self.regs
    }

    /// Poll the status word until `ready` accepts it
    fn wait(&mut self, phase: Phase, ready: impl Fn(u32) -> bool) -> Result<(), I2cError> {
        let regs = &mut self.regs;
        match poll::bounded(self.config.timeout_iterations, || ready(regs.status())) {
            Ok(()) => Ok(()),
            Err(poll::Exhausted) => Err(self.fault(phase)),
        }
    }

    fn wait_event(&mut self, phase: Phase, mask: u32) -> Result<(), I2cError> {
        self.wait(phase, |word| event::reached(word, mask))
    }

    fn fault(&mut self, phase: Phase) -> I2cError {
        #[cfg(feature = "defmt")]
        defmt::warn!("I2C timeout waiting for {}, reinitializing", phase);

        self.regs.reinit(&self.config);
        I2cError::Timeout(phase)
    }

    /// START (or repeated START) plus address phase
    fn address(&mut self, address: u8, direction: Direction) -> Result<(), I2cError> {
        self.regs.generate_start();
        self.wait_event(Phase::MasterMode, event::MASTER_MODE_SELECT)?;

        match direction {
            Direction::Write => {
                self.regs.write_data(address << 1);
                self.wait_event(Phase::TxMode, event::MASTER_TRANSMITTER_MODE_SELECTED)
            }
            Direction::Read => {
                self.regs.write_data((address << 1) | 1);
                self.wait_event(Phase::RxMode, event::MASTER_RECEIVER_MODE_SELECTED)
            }
        }
    }

    fn wait_idle(&mut self) -> Result<(), I2cError> {
        self.wait(Phase::NotBusy, |word| word & status::BUSY == 0)
    }

    fn transmit(&mut self, data: &[u8]) -> Result<(), I2cError> {
        for &byte in data {
            self.wait(Phase::TxEmpty, |word| word & status::TXE != 0)?;
            self.regs.write_data(byte);
        }
        if !data.is_empty() {
            self.wait_event(Phase::TxComplete, event::MASTER_BYTE_TRANSMITTED)?;
        }
        Ok(())
    }

    /// Read-mode address phase followed by the data bytes
    fn receive(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cError> {
        let single = buf.len() == 1;
        if single {
            self.regs.set_ack(false);
        }
        self.address(address, Direction::Read)?;

        let last = buf.len().saturating_sub(1);
        for (i, byte) in buf.iter_mut().enumerate() {
            if !single {
                self.regs.set_ack(i != last);
            }
            self.wait_event(Phase::RxFull, event::MASTER_BYTE_RECEIVED)?;
            *byte = self.regs.read_data();
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.regs.generate_stop();
        self.regs.set_ack(true);
    }

    /// Write one register: `[register, value]` in a single packet
    pub fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), I2cError> {
        self.write(address, &[register, value])
    }

    /// Read `buf.len()` bytes starting at `register`
    pub fn read_registers(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), I2cError> {
        self.write_read(address, &[register], buf)
    }
}

impl<P: I2cRegisters> I2cBus for PolledI2c<P> {
    type Error = I2cError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.wait_idle()?;
        self.address(address, Direction::Write)?;
        self.transmit(data)?;
        self.regs.generate_stop();
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.wait_idle()?;
        self.receive(address, buf)?;
        self.finish();
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.wait_idle()?;
        self.address(address, Direction::Write)?;
        self.transmit(write_data)?;
        self.receive(address, read_buf)?;
        self.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::sim::{SimEvent, SimI2c};

    const DEV: u8 = 0x69;

    fn engine(budget: u32) -> PolledI2c<SimI2c> {
        let config = I2cConfig {
            timeout_iterations: budget,
            ..I2cConfig::default()
        };
        PolledI2c::new(SimI2c::new(DEV), config)
    }

    #[test]
    fn test_new_does_not_touch_peripheral() {
        let i2c = engine(10);
        assert_eq!(i2c.registers().reinits, 0);
        assert!(i2c.registers().events.is_empty());
    }

    #[test]
    fn test_register_write_packet() {
        let mut i2c = engine(1000);
        i2c.init();
        i2c.write_register(DEV, 0x01, 0x3F).unwrap();

        let sim = i2c.release();
        assert_eq!(sim.registers[0x01], 0x3F);
        assert_eq!(
            sim.traffic().as_slice(),
            &[
                SimEvent::Reinit,
                SimEvent::Start,
                SimEvent::Write(0xD2),
                SimEvent::Write(0x01),
                SimEvent::Write(0x3F),
                SimEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_indexed_read_traffic_and_acks() {
        let mut i2c = engine(1000);
        {
            let sim = &mut i2c.regs;
            sim.registers[0x80] = 0x11;
            sim.registers[0x81] = 0x22;
            sim.registers[0x82] = 0x33;
        }

        let mut buf = [0u8; 3];
        i2c.read_registers(DEV, 0x80, &mut buf).unwrap();
        assert_eq!(buf, [0x11, 0x22, 0x33]);

        let sim = i2c.release();
        assert_eq!(
            sim.traffic().as_slice(),
            &[
                SimEvent::Start,
                SimEvent::Write(0xD2),
                SimEvent::Write(0x80),
                SimEvent::Start,
                SimEvent::Write(0xD3),
                SimEvent::Read(0x11),
                SimEvent::Read(0x22),
                SimEvent::Read(0x33),
                SimEvent::Stop,
            ]
        );
        // ACK, ACK, NACK, then restored after STOP
        assert_eq!(sim.acks().as_slice(), &[true, true, false, true]);
    }

    #[test]
    fn test_ack_programmed_before_each_byte() {
        let mut i2c = engine(1000);
        let mut buf = [0u8; 2];
        i2c.read_registers(DEV, 0x0E, &mut buf).unwrap();

        let sim = i2c.release();
        let tail: heapless::Vec<SimEvent, 8> = sim
            .events
            .iter()
            .copied()
            .skip_while(|e| *e != SimEvent::Write(0xD3))
            .skip(1)
            .collect();
        assert_eq!(
            tail.as_slice(),
            &[
                SimEvent::Ack(true),
                SimEvent::Read(0),
                SimEvent::Ack(false),
                SimEvent::Read(0),
                SimEvent::Stop,
                SimEvent::Ack(true),
            ]
        );
    }

    #[test]
    fn test_single_byte_read_is_nacked() {
        let mut i2c = engine(1000);
        i2c.regs.registers[0x04] = 0x06;
        let mut buf = [0u8; 1];
        i2c.read_registers(DEV, 0x04, &mut buf).unwrap();
        assert_eq!(buf, [0x06]);

        let sim = i2c.release();
        assert_eq!(sim.acks().as_slice(), &[false, true]);
        // NACK is armed before the read address goes out
        let nack = sim.events.iter().position(|e| *e == SimEvent::Ack(false));
        let read_address = sim.events.iter().position(|e| *e == SimEvent::Write(0xD3));
        assert!(nack.unwrap() < read_address.unwrap());
    }

    #[test]
    fn test_stuck_busy_times_out_after_budget() {
        let mut i2c = engine(250);
        i2c.regs.stuck_busy = true;

        let result = i2c.write_register(DEV, 0x00, 0x00);
        assert_eq!(result, Err(I2cError::Timeout(Phase::NotBusy)));

        let sim = i2c.release();
        assert_eq!(sim.polls, 250);
        assert_eq!(sim.reinits, 1);
        assert!(!sim.events.contains(&SimEvent::Start));
    }

    #[test]
    fn test_stuck_busy_times_out_on_indexed_read() {
        let mut i2c = engine(300);
        i2c.regs.stuck_busy = true;

        let mut buf = [0u8; 2];
        let result = i2c.read_registers(DEV, 0x80, &mut buf);
        assert_eq!(result, Err(I2cError::Timeout(Phase::NotBusy)));

        let sim = i2c.release();
        assert_eq!(sim.polls, 300);
        assert_eq!(sim.reinits, 1);
        assert!(!sim.events.contains(&SimEvent::Start));
    }

    /// Run `transfer` against a faulty peripheral and check that exactly
    /// one phase used up the whole budget before a single reinit
    fn assert_phase_timeout(
        fault: impl FnOnce(&mut SimI2c),
        transfer: impl FnOnce(&mut PolledI2c<SimI2c>) -> Result<(), I2cError>,
        phase: Phase,
    ) {
        const BUDGET: u32 = 120;
        let mut i2c = engine(BUDGET);
        fault(&mut i2c.regs);

        assert_eq!(transfer(&mut i2c), Err(I2cError::Timeout(phase)));

        let sim = i2c.release();
        assert_eq!(sim.stalled_polls, BUDGET);
        assert_eq!(sim.reinits, 1);
        assert_eq!(sim.events.last(), Some(&SimEvent::Reinit));
    }

    fn indexed_read(i2c: &mut PolledI2c<SimI2c>) -> Result<(), I2cError> {
        let mut buf = [0u8; 2];
        i2c.read_registers(DEV, 0x80, &mut buf)
    }

    #[test]
    fn test_start_never_taken_times_out_in_master_mode() {
        assert_phase_timeout(
            |sim| sim.no_start = true,
            |i2c| i2c.write_register(DEV, 0x00, 0x00),
            Phase::MasterMode,
        );
    }

    #[test]
    fn test_nack_on_read_address_times_out_in_rx_mode() {
        assert_phase_timeout(|sim| sim.nack_read = true, indexed_read, Phase::RxMode);
    }

    #[test]
    fn test_stuck_data_register_times_out_in_tx_empty() {
        assert_phase_timeout(
            |sim| sim.stuck_txe = true,
            |i2c| i2c.write_register(DEV, 0x01, 0x3F),
            Phase::TxEmpty,
        );
    }

    #[test]
    fn test_missing_btf_times_out_in_tx_complete() {
        assert_phase_timeout(
            |sim| sim.stuck_btf = true,
            |i2c| i2c.write_register(DEV, 0x01, 0x3F),
            Phase::TxComplete,
        );
    }

    #[test]
    fn test_missing_byte_times_out_in_rx_full() {
        assert_phase_timeout(|sim| sim.no_rx = true, indexed_read, Phase::RxFull);
    }

    #[test]
    fn test_nack_on_address_times_out_in_tx_mode() {
        let mut i2c = engine(100);
        i2c.regs.nack = true;

        let result = i2c.write_register(DEV, 0x00, 0x00);
        assert_eq!(result, Err(I2cError::Timeout(Phase::TxMode)));
        assert_eq!(i2c.registers().reinits, 1);
        assert_eq!(i2c.registers().events.last(), Some(&SimEvent::Reinit));
    }

    #[test]
    fn test_wrong_address_times_out_in_tx_mode() {
        let mut i2c = engine(100);
        let result = i2c.write(0x68, &[0x00]);
        assert_eq!(result, Err(I2cError::Timeout(Phase::TxMode)));
    }

    #[test]
    fn test_engine_recovers_after_fault() {
        let mut i2c = engine(100);
        i2c.regs.nack = true;
        assert!(i2c.write_register(DEV, 0x02, 0x01).is_err());

        i2c.regs.nack = false;
        i2c.write_register(DEV, 0x02, 0x01).unwrap();
        assert_eq!(i2c.registers().registers[0x02], 0x01);
    }

    #[test]
    fn test_plain_read() {
        let mut i2c = engine(1000);
        i2c.regs.registers[0] = 0xAB;
        let mut buf = [0u8; 1];
        i2c.read(DEV, &mut buf).unwrap();
        assert_eq!(buf, [0xAB]);
    }
}
