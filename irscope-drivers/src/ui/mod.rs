//! Screen rendering
//!
//! Everything is drawn onto an `embedded-graphics` target in the
//! 160x80 landscape orientation:
//!
//! ```text
//!  0         80  92                 159
//!  +----------+   thermistor        row 0
//!  |  8 x 8   |   center pixel      row 1
//!  | heat map |   deg  C F          row 2
//!  |  10 px   |   clr  R G B W      row 3
//!  |  cells   |   off  -10          row 4
//!  +----------+   amp  0            row 5
//! ```
//!
//! Text uses an 8-pixel character pitch with an opaque background so a
//! redraw overwrites the previous label.

pub mod heatmap;
pub mod menu_view;

pub use heatmap::{draw_center, draw_center_outline, draw_heatmap, draw_thermistor};
pub use menu_view::draw_menu;

use embedded_graphics::mono_font::{ascii::FONT_5X8, MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

/// Screen size in landscape
pub const SCREEN_WIDTH: i32 = 160;
pub const SCREEN_HEIGHT: i32 = 80;

/// Side of one heat-map cell
pub const CELL_SIZE: i32 = 10;

/// Left edge of the text column
pub const TEXT_X: i32 = 92;

/// Vertical pitch of text rows
pub const ROW_PITCH: i32 = 10;

/// Horizontal pitch of one character
pub const CHAR_PITCH: i32 = 8;

/// 5x8 glyphs on an 8-pixel pitch
pub const FONT: MonoFont<'static> = MonoFont {
    character_spacing: (CHAR_PITCH - 5) as u32,
    ..FONT_5X8
};

/// Status message anchor: horizontally centered, top at 36
const MESSAGE_ANCHOR: Point = Point::new(SCREEN_WIDTH / 2, SCREEN_HEIGHT / 2 - 4);

/// Draw `text` with its top-left corner at `(x, y)`
///
/// `reverse` swaps foreground and background.
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
    fg: Rgb565,
    reverse: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let (fg, bg) = if reverse {
        (Rgb565::BLACK, fg)
    } else {
        (fg, Rgb565::BLACK)
    };
    let style = MonoTextStyleBuilder::new()
        .font(&FONT)
        .text_color(fg)
        .background_color(bg)
        .build();
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Centered one-line status message
pub fn show_message<D>(target: &mut D, text: &str, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let character = MonoTextStyleBuilder::new()
        .font(&FONT)
        .text_color(color)
        .background_color(Rgb565::BLACK)
        .build();
    let layout = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    Text::with_text_style(text, MESSAGE_ANCHOR, character, layout).draw(target)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::canvas::Canvas;
    use super::*;

    #[test]
    fn test_text_is_opaque() {
        let mut canvas = Canvas::filled(Rgb565::RED);
        draw_text(&mut canvas, "ab", 0, 0, Rgb565::WHITE, false).unwrap();
        // Both 5x8 glyph cells are fully painted, background included
        assert_eq!(canvas.count(0, 0, 5, 8, Rgb565::RED), 0);
        assert_eq!(canvas.count(8, 0, 5, 8, Rgb565::RED), 0);
        assert!(canvas.count(0, 0, 13, 8, Rgb565::WHITE) > 0);
        assert_eq!(canvas.at(0, 8), Rgb565::RED);
        assert_eq!(canvas.at(20, 0), Rgb565::RED);
    }

    #[test]
    fn test_reverse_text_swaps_colors() {
        let mut normal = Canvas::new();
        let mut reverse = Canvas::new();
        draw_text(&mut normal, "C", 0, 0, Rgb565::WHITE, false).unwrap();
        draw_text(&mut reverse, "C", 0, 0, Rgb565::WHITE, true).unwrap();
        let lit = normal.count(0, 0, 5, 8, Rgb565::WHITE);
        assert!(lit > 0);
        assert_eq!(reverse.count(0, 0, 5, 8, Rgb565::BLACK), lit);
        assert_eq!(reverse.count(0, 0, 5, 8, Rgb565::WHITE), 40 - lit);
    }

    #[test]
    fn test_message_is_centered() {
        let mut canvas = Canvas::new();
        show_message(&mut canvas, "Initializing Sensor", Rgb565::WHITE).unwrap();
        // 19 characters on an 8 px pitch around x = 80
        assert_eq!(canvas.count(0, 36, 4, 8, Rgb565::WHITE), 0);
        assert!(canvas.count(0, 36, 160, 8, Rgb565::WHITE) > 0);
        assert_eq!(canvas.count(0, 0, 160, 36, Rgb565::WHITE), 0);
        assert_eq!(canvas.count(0, 44, 160, 36, Rgb565::WHITE), 0);

        let left = canvas.count(0, 36, 80, 8, Rgb565::WHITE);
        let right = canvas.count(80, 36, 80, 8, Rgb565::WHITE);
        assert!(left > 0 && right > 0);
    }
}
