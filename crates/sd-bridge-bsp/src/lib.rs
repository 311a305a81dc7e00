#![no_std]
//! Board support for the SD bridge: an nRF52840 sitting on the SD card bus
//! of a printer controller.

// Modules
mod board;
mod resources;

// Flatten
pub use board::*;
pub use resources::*;
