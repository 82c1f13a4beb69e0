//! Configuration types and parser
//!
//! The board configuration is a small TOML document embedded in the
//! firmware image and parsed at start-up with `toml_parser`, without allocating.

pub mod parse;
pub mod types;

pub use parse::{check_clocks, parse_config, ConfigError};
pub use types::*;
