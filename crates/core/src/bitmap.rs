//! Static matrix patterns.
//!
//! The fan occupies the upper left 7x7 square of the matrix, the thermometer takes the
//! remaining margin: the bottom row and the right column.

use crate::{Color, COLS, PIXELS, ROWS};

const R: Color = Color::Rgb(Color::RED);
const B: Color = Color::Rgb(Color::BLACK);
const T: Color = Color::Transparent;

/// Immutable 8x8 pattern stored row by row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bitmap([Color; PIXELS]);

impl Bitmap {
    /// Creates a bitmap from the row-major list of cells.
    #[must_use]
    pub const fn new(cells: [Color; PIXELS]) -> Self {
        Self(cells)
    }

    /// Returns the cell at the given position.
    ///
    /// # Panics
    ///
    /// If the position lies outside of the matrix.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> Color {
        assert!(row < ROWS && col < COLS, "Bitmap position is out of bounds");
        self.0[row * COLS + col]
    }

    /// Returns an iterator over `(row, col, cell)` triples in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(index, cell)| (index / COLS, index % COLS, *cell))
    }

    /// Returns an iterator over the positions of the opaque cells.
    pub fn opaque_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(|(_, _, cell)| cell.is_opaque())
            .map(|(row, col, _)| (row, col))
    }
}

/// Fan blades in the "plus" position.
#[rustfmt::skip]
pub static FAN_PHASE_A: Bitmap = Bitmap::new([
    B, B, B, R, B, B, B, T,
    B, B, B, R, B, B, B, T,
    B, B, B, R, B, B, B, T,
    R, R, R, R, R, R, R, T,
    B, B, B, R, B, B, B, T,
    B, B, B, R, B, B, B, T,
    B, B, B, R, B, B, B, T,
    T, T, T, T, T, T, T, T,
]);

/// Fan blades in the "cross" position.
#[rustfmt::skip]
pub static FAN_PHASE_B: Bitmap = Bitmap::new([
    R, B, B, B, B, B, R, T,
    B, R, B, B, B, R, B, T,
    B, B, R, B, R, B, B, T,
    B, B, B, R, B, B, B, T,
    B, B, R, B, R, B, B, T,
    B, R, B, B, B, R, B, T,
    R, B, B, B, B, B, R, T,
    T, T, T, T, T, T, T, T,
]);

/// Marks the cells owned by the thermometer.
#[rustfmt::skip]
pub static GAUGE_TEMPLATE: Bitmap = Bitmap::new([
    T, T, T, T, T, T, T, B,
    T, T, T, T, T, T, T, B,
    T, T, T, T, T, T, T, B,
    T, T, T, T, T, T, T, B,
    T, T, T, T, T, T, T, B,
    T, T, T, T, T, T, T, B,
    T, T, T, T, T, T, T, B,
    B, B, B, B, B, B, B, B,
]);

/// Thermometer cells as `(row, col)` in the order they light up.
///
/// The path runs along the bottom row from left to right, then up the right column.
pub const THERMOMETER_PATH: [(usize, usize); 15] = [
    (7, 0),
    (7, 1),
    (7, 2),
    (7, 3),
    (7, 4),
    (7, 5),
    (7, 6),
    (7, 7),
    (6, 7),
    (5, 7),
    (4, 7),
    (3, 7),
    (2, 7),
    (1, 7),
    (0, 7),
];

/// One of the two alternating fan images.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Phase {
    A,
    B,
}

impl Phase {
    /// Returns the bitmap shown in this phase.
    #[must_use]
    pub fn bitmap(self) -> &'static Bitmap {
        match self {
            Self::A => &FAN_PHASE_A,
            Self::B => &FAN_PHASE_B,
        }
    }
}
