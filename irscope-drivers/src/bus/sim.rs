//! Simulated I2C v1 peripheral with one attached register-file device
//!
//! Flags change the way the real block changes them, collapsed to
//! zero latency: a written byte is shifted out immediately, a received
//! byte is available as soon as the previous one is read.

use heapless::Vec;

use irscope_hal::i2c::{status, I2cConfig, I2cRegisters};

/// Bus activity as seen by the attached device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Start,
    Stop,
    /// Byte written to the data register (address or data)
    Write(u8),
    /// Byte returned from the data register
    Read(u8),
    /// ACK enable changed
    Ack(bool),
    Reinit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    /// START sent, address byte expected
    Address,
    Transmit,
    Receive,
}

pub struct SimI2c {
    /// 7-bit address the device answers to
    pub device: u8,
    /// Device register file
    pub registers: [u8; 256],
    pub events: Vec<SimEvent, 1024>,
    /// Status reads since creation
    pub polls: u32,
    /// Status reads since the last START, STOP, ACK change or data access
    pub stalled_polls: u32,
    pub reinits: u32,
    /// BUSY never clears
    pub stuck_busy: bool,
    /// START is never taken, SB stays clear
    pub no_start: bool,
    /// Device never acknowledges its address
    pub nack: bool,
    /// Device acknowledges writes but not its read address
    pub nack_read: bool,
    /// Data register never drains after the first data byte
    pub stuck_txe: bool,
    /// BTF never sets
    pub stuck_btf: bool,
    /// Device never returns a byte
    pub no_rx: bool,
    mode: Mode,
    pointer: u8,
    pointer_set: bool,
    addr_flag: bool,
    btf: bool,
    tx_full: bool,
}

impl SimI2c {
    pub fn new(device: u8) -> Self {
        Self {
            device,
            registers: [0; 256],
            events: Vec::new(),
            polls: 0,
            stalled_polls: 0,
            reinits: 0,
            stuck_busy: false,
            no_start: false,
            nack: false,
            nack_read: false,
            stuck_txe: false,
            stuck_btf: false,
            no_rx: false,
            mode: Mode::Idle,
            pointer: 0,
            pointer_set: false,
            addr_flag: false,
            btf: false,
            tx_full: false,
        }
    }

    fn log(&mut self, event: SimEvent) {
        if event != SimEvent::Reinit {
            self.stalled_polls = 0;
        }
        // Tests size the log; overflow only drops trailing events
        let _ = self.events.push(event);
    }

    /// Events with ACK changes filtered out
    pub fn traffic(&self) -> Vec<SimEvent, 1024> {
        self.events
            .iter()
            .copied()
            .filter(|e| !matches!(e, SimEvent::Ack(_)))
            .collect()
    }

    /// ACK settings, in order
    pub fn acks(&self) -> Vec<bool, 256> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Ack(enabled) => Some(*enabled),
                _ => None,
            })
            .collect()
    }
}

impl I2cRegisters for SimI2c {
    fn status(&mut self) -> u32 {
        self.polls += 1;
        self.stalled_polls += 1;

        let active = self.mode != Mode::Idle;
        let mut word = 0;
        if active || self.stuck_busy {
            word |= status::BUSY;
        }
        if active {
            word |= status::MSL;
        }
        match self.mode {
            Mode::Idle => {}
            Mode::Address => word |= status::SB,
            Mode::Transmit => {
                word |= status::TRA;
                if !self.tx_full {
                    word |= status::TXE;
                }
                if self.btf && !self.stuck_btf {
                    word |= status::BTF;
                }
            }
            Mode::Receive => {
                if !self.addr_flag && !self.no_rx {
                    word |= status::RXNE;
                }
            }
        }
        if self.addr_flag {
            word |= status::ADDR;
            // SR1 then SR2 read clears ADDR
            self.addr_flag = false;
        }
        word
    }

    fn generate_start(&mut self) {
        self.log(SimEvent::Start);
        if self.no_start {
            return;
        }
        self.mode = Mode::Address;
        self.addr_flag = false;
        self.btf = false;
        self.tx_full = false;
    }

    fn generate_stop(&mut self) {
        self.log(SimEvent::Stop);
        self.mode = Mode::Idle;
        self.addr_flag = false;
        self.btf = false;
        self.pointer_set = false;
    }

    fn set_ack(&mut self, enabled: bool) {
        self.log(SimEvent::Ack(enabled));
    }

    fn write_data(&mut self, byte: u8) {
        self.log(SimEvent::Write(byte));
        match self.mode {
            Mode::Address => {
                let read = byte & 1 == 1;
                if self.nack || (read && self.nack_read) || byte >> 1 != self.device {
                    // No ADDR: the engine times out waiting for it
                    return;
                }
                self.addr_flag = true;
                if !read {
                    self.mode = Mode::Transmit;
                    self.pointer_set = false;
                } else {
                    self.mode = Mode::Receive;
                }
            }
            Mode::Transmit => {
                if self.pointer_set {
                    self.registers[self.pointer as usize] = byte;
                    self.pointer = self.pointer.wrapping_add(1);
                } else {
                    self.pointer = byte;
                    self.pointer_set = true;
                }
                self.btf = !self.stuck_txe;
                self.tx_full = self.stuck_txe;
            }
            Mode::Idle | Mode::Receive => {}
        }
    }

    fn read_data(&mut self) -> u8 {
        let byte = self.registers[self.pointer as usize];
        self.pointer = self.pointer.wrapping_add(1);
        self.log(SimEvent::Read(byte));
        byte
    }

    fn reinit(&mut self, _config: &I2cConfig) {
        self.reinits += 1;
        self.log(SimEvent::Reinit);
        self.mode = Mode::Idle;
        self.addr_flag = false;
        self.btf = false;
        self.tx_full = false;
        self.pointer_set = false;
    }
}
