//! Heat map and temperature readouts

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment};
use heapless::String;

use irscope_core::thermal::{pixel_scale, Palette, Reading, TempUnit, ThermalFrame, GRID_SIZE};

use super::{draw_text, CELL_SIZE, ROW_PITCH, TEXT_X};
use crate::display::Color565;

/// Cell the center readout tracks
const CENTER: (i32, i32) = (3, 3);

fn cell(x: i32, y: i32) -> Rectangle {
    Rectangle::new(
        Point::new(x * CELL_SIZE, y * CELL_SIZE),
        Size::new(CELL_SIZE as u32, CELL_SIZE as u32),
    )
}

/// Color of one pixel code under the current palette, offset and gain
pub fn cell_color(code: i16, palette: Palette, offset: i8, gain: i8) -> Rgb565 {
    let scale = pixel_scale(code, offset, gain);
    Color565::from_rgb(palette.rgb(scale)).into()
}

/// Paint the 8x8 grid and outline the center cell
pub fn draw_heatmap<D>(
    target: &mut D,
    frame: &ThermalFrame,
    palette: Palette,
    offset: i8,
    gain: i8,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let color = cell_color(frame.get(x, y), palette, offset, gain);
            target.fill_solid(&cell(x as i32, y as i32), color)?;
        }
    }
    draw_center_outline(target)
}

/// One-pixel white frame on the border of the center cell
pub fn draw_center_outline<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyleBuilder::new()
        .stroke_color(Rgb565::WHITE)
        .stroke_width(1)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();
    cell(CENTER.0, CENTER.1).into_styled(style).draw(target)
}

/// Thermistor readout: `whole.ffff`, padded to clear a longer previous value
pub fn thermistor_text(sixteenths: i16, unit: TempUnit) -> String<16> {
    let mut reading: String<16> = String::new();
    let _ = write!(reading, "{}", Reading::thermistor(sixteenths, unit));
    let mut text = String::new();
    let _ = write!(text, "{:<8}", reading.as_str());
    text
}

/// Center pixel readout: `whole.ff`, right-aligned in six columns
pub fn center_text(quarters: i16, unit: TempUnit) -> String<16> {
    let mut reading: String<16> = String::new();
    let _ = write!(reading, "{}", Reading::pixel(quarters, unit));
    let mut text = String::new();
    let _ = write!(text, "{:>6}", reading.as_str());
    text
}

/// Thermistor readout on row 0
pub fn draw_thermistor<D>(
    target: &mut D,
    sixteenths: i16,
    unit: TempUnit,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let text = thermistor_text(sixteenths, unit);
    draw_text(target, &text, TEXT_X, 0, Rgb565::WHITE, false)
}

/// Center pixel readout on row 1
pub fn draw_center<D>(target: &mut D, quarters: i16, unit: TempUnit) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let text = center_text(quarters, unit);
    draw_text(target, &text, TEXT_X, ROW_PITCH, Rgb565::WHITE, false)
}
