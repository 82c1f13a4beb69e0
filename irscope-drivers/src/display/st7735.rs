//! ST7735 LCD controller over a transmit-only SPI link
//!
//! Control lines: chip select (active low), data/command (high = data),
//! reset (active low) and backlight (active high).
//!
//! Pixel writes go through an addressable window: CASET and RASET set the
//! column and row bounds (offset by the panel's start constants for the
//! current rotation), RAMWR opens display memory, and the following data
//! bytes fill the window left to right, top to bottom.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;

use irscope_hal::gpio::OutputPin;
use irscope_hal::spi::SpiBus;

use super::color::Color565;
use super::script::{cmd, madctl, InitStep, INIT_SCRIPT};

/// Panel width in its native orientation
pub const PANEL_WIDTH: u16 = 80;
/// Panel height in its native orientation
pub const PANEL_HEIGHT: u16 = 160;

/// Pixels per SPI block when streaming a solid fill
const FILL_CHUNK: usize = 32;

/// Logical geometry for one rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Rotation, 0..=3
    pub rotation: u8,
    /// Logical width
    pub width: u16,
    /// Logical height
    pub height: u16,
    /// Offset added to row addresses
    pub rowstart: u16,
    /// Offset added to column addresses
    pub colstart: u16,
    /// MADCTL value selecting this rotation
    pub madctl: u8,
}

impl Geometry {
    /// Geometry for `rotation` (taken modulo 4)
    pub const fn for_rotation(rotation: u8) -> Self {
        let rotation = rotation % 4;
        let (madctl, landscape) = match rotation {
            0 => (madctl::RGB | madctl::MX | madctl::MY, false),
            1 => (madctl::RGB | madctl::MY | madctl::MV, true),
            2 => (madctl::RGB, false),
            _ => (madctl::RGB | madctl::MX | madctl::MV, true),
        };
        if landscape {
            Self {
                rotation,
                width: PANEL_HEIGHT,
                height: PANEL_WIDTH,
                rowstart: 24,
                colstart: 0,
                madctl,
            }
        } else {
            Self {
                rotation,
                width: PANEL_WIDTH,
                height: PANEL_HEIGHT,
                rowstart: 0,
                colstart: 24,
                madctl,
            }
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::for_rotation(0)
    }
}

/// ST7735 driver
pub struct St7735<SPI, CS, DC, RST, BL> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    bl: BL,
    geometry: Geometry,
}

impl<SPI, CS, DC, RST, BL> St7735<SPI, CS, DC, RST, BL>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Take the bus and control pins; lines are parked idle with the
    /// backlight off
    pub fn new(spi: SPI, mut cs: CS, mut dc: DC, rst: RST, mut bl: BL) -> Self {
        cs.set_high();
        dc.set_low();
        bl.set_low();
        Self {
            spi,
            cs,
            dc,
            rst,
            bl,
            geometry: Geometry::default(),
        }
    }

    /// Current geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Logical width for the current rotation
    pub fn width(&self) -> u16 {
        self.geometry.width
    }

    /// Logical height for the current rotation
    pub fn height(&self) -> u16 {
        self.geometry.height
    }

    /// Pulse the reset line: low 10 ms, high 10 ms
    pub fn hard_reset(&mut self, delay: &mut impl DelayNs) {
        self.rst.set_low();
        delay.delay_ms(10);
        self.rst.set_high();
        delay.delay_ms(10);
    }

    /// Reset the controller, replay the power-up script and select
    /// rotation 0
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), SPI::Error> {
        self.hard_reset(delay);
        self.run_script(INIT_SCRIPT, delay)?;
        self.set_rotation(0)
    }

    /// Replay a command script
    pub fn run_script(
        &mut self,
        script: &[InitStep],
        delay: &mut impl DelayNs,
    ) -> Result<(), SPI::Error> {
        for step in script {
            match *step {
                InitStep::Command { op, args } => self.write_command(op, args)?,
                InitStep::Delay(ms) => delay.delay_ms(ms as u32),
            }
        }
        Ok(())
    }

    /// Send an opcode and its arguments, each in its own chip-select frame
    pub fn write_command(&mut self, op: u8, args: &[u8]) -> Result<(), SPI::Error> {
        self.dc.set_low();
        self.frame(&[op])?;
        if !args.is_empty() {
            self.write_data(args)?;
        }
        Ok(())
    }

    /// Send data bytes in one chip-select frame
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), SPI::Error> {
        self.dc.set_high();
        self.frame(data)
    }

    fn frame(&mut self, bytes: &[u8]) -> Result<(), SPI::Error> {
        self.cs.set_low();
        let result = self.spi.write(bytes);
        self.cs.set_high();
        result
    }

    /// Select one of the four orientations
    pub fn set_rotation(&mut self, rotation: u8) -> Result<(), SPI::Error> {
        self.geometry = Geometry::for_rotation(rotation);
        let value = self.geometry.madctl;
        self.write_command(cmd::MADCTL, &[value])
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) {
        self.bl.set_state(on);
    }

    /// Open the window `(x0, y0)..=(x1, y1)` for pixel data
    pub fn set_addr_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), SPI::Error> {
        let colstart = self.geometry.colstart;
        let rowstart = self.geometry.rowstart;
        let (x0, x1) = (x0.saturating_add(colstart), x1.saturating_add(colstart));
        let (y0, y1) = (y0.saturating_add(rowstart), y1.saturating_add(rowstart));
        self.write_command(cmd::CASET, &span(x0, x1))?;
        self.write_command(cmd::RASET, &span(y0, y1))?;
        self.write_command(cmd::RAMWR, &[])
    }

    /// Set one pixel; coordinates outside the screen are ignored
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color565) -> Result<(), SPI::Error> {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return Ok(());
        }
        let (x, y) = (x as u16, y as u16);
        self.set_addr_window(x, y, x, y)?;
        self.write_data(&color.bytes())
    }

    /// Fill a rectangle, clipped to the screen
    ///
    /// A rectangle with nothing on screen sends nothing at all.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color565,
    ) -> Result<(), SPI::Error> {
        let Some((x, y, w, h)) = clip(x, y, w, h, self.width(), self.height()) else {
            return Ok(());
        };

        self.set_addr_window(x, y, x + w - 1, y + h - 1)?;

        let mut chunk = [0u8; 2 * FILL_CHUNK];
        for pair in chunk.chunks_exact_mut(2) {
            pair.copy_from_slice(&color.bytes());
        }

        self.dc.set_high();
        self.cs.set_low();
        let mut remaining = w as usize * h as usize;
        let mut result = Ok(());
        while remaining > 0 && result.is_ok() {
            let n = remaining.min(FILL_CHUNK);
            result = self.spi.write(&chunk[..2 * n]);
            remaining -= n;
        }
        self.cs.set_high();
        result
    }

    /// Fill the whole screen
    pub fn fill_screen(&mut self, color: Color565) -> Result<(), SPI::Error> {
        let (w, h) = (self.width() as i32, self.height() as i32);
        self.fill_rect(0, 0, w, h, color)
    }

    /// Copy a block of wire-order pixel bytes (`2 * w * h`) into
    /// `(x, y, w, h)`; the caller clips, an empty block sends nothing
    pub fn blit(&mut self, x: u16, y: u16, w: u16, h: u16, pixels: &[u8]) -> Result<(), SPI::Error> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_addr_window(x, y, x.saturating_add(w - 1), y.saturating_add(h - 1))?;
        self.write_data(pixels)
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, CS, DC, RST, BL) {
        (self.spi, self.cs, self.dc, self.rst, self.bl)
    }
}

/// Big-endian start/end pair for CASET/RASET
fn span(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

/// Clip a rectangle to `width` x `height`; `None` if nothing remains
fn clip(x: i32, y: i32, w: i32, h: i32, width: u16, height: u16) -> Option<(u16, u16, u16, u16)> {
    let (width, height) = (width as i32, height as i32);
    let (right, bottom) = (x.saturating_add(w), y.saturating_add(h));
    if w <= 0 || h <= 0 || x >= width || y >= height || right <= 0 || bottom <= 0 {
        return None;
    }

    let (x, y) = (x.max(0), y.max(0));
    let w = right.min(width) - x;
    let h = bottom.min(height) - y;

    Some((x as u16, y as u16, w as u16, h as u16))
}

impl<SPI, CS, DC, RST, BL> OriginDimensions for St7735<SPI, CS, DC, RST, BL> {
    fn size(&self) -> Size {
        Size::new(self.geometry.width as u32, self.geometry.height as u32)
    }
}

impl<SPI, CS, DC, RST, BL> DrawTarget for St7735<SPI, CS, DC, RST, BL>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    type Color = Rgb565;
    type Error = SPI::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, color.into())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            i32::try_from(area.size.width).unwrap_or(i32::MAX),
            i32::try_from(area.size.height).unwrap_or(i32::MAX),
            color.into(),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_screen(color.into())
    }
}
