//! Menu rendering

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment};
use heapless::String;

use irscope_core::menu::{Menu, MenuItem, Redraw};
use irscope_core::thermal::{Palette, TempUnit};

use super::{draw_text, CHAR_PITCH, ROW_PITCH, SCREEN_WIDTH, TEXT_X};

/// Text row of the first menu item
const FIRST_ROW: i32 = 2;

/// Value column, four characters right of the label
const VALUE_X: i32 = TEXT_X + 4 * CHAR_PITCH;

fn row_y(item: MenuItem) -> i32 {
    (item.index() as i32 + FIRST_ROW) * ROW_PITCH
}

/// Selector outline around an item row, one pixel outside its text
pub fn selector_rect(item: MenuItem) -> Rectangle {
    let top_left = Point::new(TEXT_X - 1, row_y(item) - 1);
    let width = (SCREEN_WIDTH - top_left.x) as u32;
    Rectangle::new(top_left, Size::new(width, ROW_PITCH as u32))
}

fn draw_selector<D>(target: &mut D, item: MenuItem, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyleBuilder::new()
        .stroke_color(color)
        .stroke_width(1)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();
    selector_rect(item).into_styled(style).draw(target)
}

fn draw_letter<D>(
    target: &mut D,
    letter: char,
    x: i32,
    y: i32,
    active: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut buf = [0u8; 4];
    draw_text(target, letter.encode_utf8(&mut buf), x, y, Rgb565::WHITE, active)
}

/// Numeric item value; the trailing space clears the sign column of a
/// shorter value
pub fn value_text(value: i8) -> String<8> {
    let mut text = String::new();
    let _ = write!(text, "{} ", value);
    text
}

fn draw_item<D>(target: &mut D, menu: &Menu, item: MenuItem) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let y = row_y(item);
    draw_text(target, item.label(), TEXT_X, y, Rgb565::WHITE, false)?;

    match item {
        MenuItem::Unit => {
            let unit = menu.unit();
            let options = [TempUnit::Celsius, TempUnit::Fahrenheit];
            for (i, option) in options.into_iter().enumerate() {
                let x = VALUE_X + 2 * CHAR_PITCH * i as i32;
                draw_letter(target, option.letter(), x, y, option == unit)?;
            }
        }
        MenuItem::Palette => {
            let palette = menu.palette();
            for (i, option) in Palette::ALL.into_iter().enumerate() {
                let x = VALUE_X + CHAR_PITCH * i as i32;
                draw_letter(target, option.letter(), x, y, option == palette)?;
            }
        }
        MenuItem::Offset | MenuItem::Gain => {
            let text = value_text(menu.value(item));
            draw_text(target, &text, VALUE_X, y, Rgb565::WHITE, false)?;
        }
    }
    Ok(())
}

/// Draw what `redraw` marks: selector move first, then item rows
pub fn draw_menu<D>(target: &mut D, menu: &Menu, redraw: &Redraw) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    if let Some(selector) = redraw.selector {
        if let Some(from) = selector.from {
            draw_selector(target, from, Rgb565::BLACK)?;
        }
        draw_selector(target, selector.to, Rgb565::WHITE)?;
    }

    for item in redraw.items() {
        draw_item(target, menu, item)?;
    }
    Ok(())
}
