//! Ring-size measurement engine.
//!
//! Calibrates screen pixels against a card or coin, turns slider, stepper and
//! drag input into clamped millimeter values, and matches the measurement
//! against a fixed chart of Indian ring sizes. Every operation is a pure
//! transition over an owned [`types::Session`].

pub mod chart;
pub mod config;
pub mod constants;
pub mod error;
pub mod invariants;
pub mod logic;
pub mod mbt;
pub mod simulator;
pub mod types;

pub use error::{Result, RingSizeError};
