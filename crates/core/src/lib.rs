//! Fan simulator core
//!
//! Static bitmaps, temperature gauge mapping and frame compositing for an 8x8 LED matrix
//! showing a spinning fan next to a thermometer.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::cast_precision_loss
)]

pub use smart_leds::RGB8;

pub use crate::{
    bitmap::{Bitmap, Phase, FAN_PHASE_A, FAN_PHASE_B, GAUGE_TEMPLATE, THERMOMETER_PATH},
    color::Color,
    errors::{Error, Result},
    frame::Frame,
    gauge::Gauge,
    time::{DelayUnit, Rpm},
};

pub mod bitmap;
pub mod color;
pub mod errors;
pub mod frame;
pub mod gauge;
pub mod time;

/// Number of rows in the LED matrix.
pub const ROWS: usize = 8;
/// Number of columns in the LED matrix.
pub const COLS: usize = 8;
/// Total number of pixels in the LED matrix.
pub const PIXELS: usize = ROWS * COLS;
/// The highest temperature reading the gauge can represent, one lit pixel per degree.
///
/// Callers scale their readings into `0..=MAX_TEMPERATURE`, zero means "no reading".
pub const MAX_TEMPERATURE: i32 = 15;
