//! Board-agnostic core logic for the thermal camera firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Thermal sensor trait and frame type
//! - Temperature decoding and C/F conversion in fixed point
//! - False-color palettes and pixel scaling
//! - Operator menu model (selection, clamped values, redraw mask)
//! - Application state machine
//! - Configuration types and the embedded config parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod menu;
pub mod state;
pub mod thermal;
pub mod traits;
