//! Recording doubles for the display link
//!
//! One [`Wire`] is shared through a `RefCell` by the SPI mock and the
//! control pin mocks, so the data/command line and chip select state are
//! known when bytes go out.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use irscope_hal::gpio::OutputPin;
use irscope_hal::spi::SpiBus;

use crate::display::script::cmd;

/// One command frame and its argument bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub op: u8,
    pub args: Vec<u8, 16>,
}

/// Control lines of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Cs,
    Dc,
    Rst,
    Bl,
}

#[derive(Debug, Default)]
pub struct Wire {
    /// Commands in order, with their arguments
    pub commands: Vec<Command, 128>,
    /// Bytes streamed after RAMWR
    pub pixel_bytes: usize,
    /// First bytes streamed after the latest RAMWR
    pub pixels: Vec<u8, 32>,
    /// Bytes sent with chip select released
    pub unselected_bytes: usize,
    /// Chip select low-going edges
    pub selects: u32,
    /// Reset line levels, in order
    pub reset_levels: Vec<bool, 8>,
    pub backlight: bool,
    cs_low: bool,
    dc_high: bool,
}

impl Wire {
    /// Idle wire: chip select released, command mode
    pub fn shared() -> RefCell<Self> {
        RefCell::new(Self::default())
    }

    /// Forget all traffic, keep line levels
    pub fn clear(&mut self) {
        self.commands.clear();
        self.pixel_bytes = 0;
        self.pixels.clear();
        self.unselected_bytes = 0;
        self.selects = 0;
    }

    /// Opcodes in order
    pub fn ops(&self) -> Vec<u8, 128> {
        self.commands.iter().map(|c| c.op).collect()
    }

    /// Number of frames with opcode `op`
    pub fn count(&self, op: u8) -> usize {
        self.commands.iter().filter(|c| c.op == op).count()
    }

    /// Latest frame with opcode `op`
    pub fn last(&self, op: u8) -> Option<&Command> {
        self.commands.iter().rev().find(|c| c.op == op)
    }

    fn send(&mut self, data: &[u8]) {
        if !self.cs_low {
            self.unselected_bytes += data.len();
        }
        if !self.dc_high {
            for &op in data {
                let _ = self.commands.push(Command {
                    op,
                    args: Vec::new(),
                });
                if op == cmd::RAMWR {
                    self.pixels.clear();
                }
            }
            return;
        }
        match self.commands.last_mut() {
            Some(command) if command.op == cmd::RAMWR => {
                self.pixel_bytes += data.len();
                for &b in data {
                    let _ = self.pixels.push(b);
                }
            }
            Some(command) => {
                for &b in data {
                    let _ = command.args.push(b);
                }
            }
            None => {}
        }
    }

    fn set(&mut self, line: Line, high: bool) {
        match line {
            Line::Cs => {
                if !high && !self.cs_low {
                    self.selects += 1;
                }
                self.cs_low = !high;
            }
            Line::Dc => self.dc_high = high,
            Line::Rst => {
                let _ = self.reset_levels.push(high);
            }
            Line::Bl => self.backlight = high,
        }
    }

    fn level(&self, line: Line) -> bool {
        match line {
            Line::Cs => !self.cs_low,
            Line::Dc => self.dc_high,
            Line::Rst => self.reset_levels.last().copied().unwrap_or(false),
            Line::Bl => self.backlight,
        }
    }
}

pub struct MockSpi<'a>(pub &'a RefCell<Wire>);

impl SpiBus for MockSpi<'_> {
    type Error = Infallible;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.borrow_mut().send(data);
        Ok(())
    }
}

pub struct MockPin<'a> {
    wire: &'a RefCell<Wire>,
    line: Line,
}

impl<'a> MockPin<'a> {
    pub fn new(wire: &'a RefCell<Wire>, line: Line) -> Self {
        Self { wire, line }
    }
}

impl OutputPin for MockPin<'_> {
    fn set_high(&mut self) {
        self.wire.borrow_mut().set(self.line, true);
    }

    fn set_low(&mut self) {
        self.wire.borrow_mut().set(self.line, false);
    }

    fn is_set_high(&self) -> bool {
        self.wire.borrow().level(self.line)
    }
}

/// Delay that only records requested milliseconds
#[derive(Debug, Default)]
pub struct MockDelay {
    pub waits_ms: Vec<u32, 32>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        let _ = self.waits_ms.push(ms);
    }
}
