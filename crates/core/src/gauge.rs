//! Temperature gauge mapping.

use smart_leds::RGB8;

use crate::{Color, THERMOMETER_PATH};

/// Number of thermometer cells sharing one color band.
const BAND_LEN: usize = 5;

/// Returns the color of the thermometer cell with the given index along the path.
///
/// The first `temperature` cells are lit, banded yellow, orange and red from the cool end
/// to the hot one. Readings are not validated: anything above the path length lights the
/// whole thermometer and anything below one leaves it dark.
#[must_use]
pub fn color_for(path_index: usize, temperature: i32) -> RGB8 {
    if temperature <= 0 {
        return Color::BLACK;
    }

    let lit = usize::try_from(temperature).unwrap_or(usize::MAX);
    if path_index + 1 > lit {
        return Color::BLACK;
    }

    match path_index / BAND_LEN {
        0 => Color::YELLOW,
        1 => Color::ORANGE,
        2 => Color::RED,
        // The path has exactly three bands.
        _ => Color::BLACK,
    }
}

/// Thermometer state for a single temperature reading.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Gauge {
    temperature: i32,
}

impl Gauge {
    #[must_use]
    pub const fn new(temperature: i32) -> Self {
        Self { temperature }
    }

    #[must_use]
    pub const fn temperature(&self) -> i32 {
        self.temperature
    }

    /// Returns the color of the matrix cell at the given position, or `None` if the cell
    /// does not belong to the thermometer path.
    #[must_use]
    pub fn color_at(&self, row: usize, col: usize) -> Option<RGB8> {
        THERMOMETER_PATH
            .iter()
            .position(|&cell| cell == (row, col))
            .map(|index| color_for(index, self.temperature))
    }

    /// Returns the colors of the whole thermometer path in lighting order.
    pub fn colors(&self) -> impl Iterator<Item = RGB8> + '_ {
        (0..THERMOMETER_PATH.len()).map(|index| color_for(index, self.temperature))
    }
}
