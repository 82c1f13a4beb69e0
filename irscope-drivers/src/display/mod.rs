//! Color LCD support

pub mod color;
pub mod script;
pub mod st7735;

pub use color::Color565;
pub use script::InitStep;
pub use st7735::{Geometry, St7735};
