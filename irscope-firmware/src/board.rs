//! Blue Pill board wiring
//!
//! | Signal        | Pin  |
//! |---------------|------|
//! | Sensor SCL    | PB6  |
//! | Sensor SDA    | PB7  |
//! | LCD SCK       | PA5  |
//! | LCD MOSI      | PA7  |
//! | LCD CS        | PA4  |
//! | LCD DC        | PA3  |
//! | LCD RST       | PA2  |
//! | LCD backlight | PA1  |
//! | Joystick up   | PB12 |
//! | Joystick down | PB13 |
//! | Joystick left | PB14 |
//! | Joystick right| PB15 |
//! | Joystick push | PA8  |
//!
//! Joystick switches pull to ground; the inputs use internal pull-ups.

/// APB1 clock with embassy's default clock tree (HSI, no PLL)
pub const PCLK1_HZ: u32 = 8_000_000;
