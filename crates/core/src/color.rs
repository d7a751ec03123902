//! Matrix palette.

use smart_leds::RGB8;

/// A single bitmap cell: either a concrete color or a hole in the layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Paint the cell with the given color.
    Rgb(RGB8),
    /// Do not touch the cell, the layer below shows through.
    Transparent,
}

impl Color {
    pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
    pub const YELLOW: RGB8 = RGB8 {
        r: 255,
        g: 255,
        b: 0,
    };
    pub const ORANGE: RGB8 = RGB8 {
        r: 255,
        g: 127,
        b: 0,
    };
    pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

    /// Returns the concrete color, or `None` for a transparent cell.
    #[must_use]
    pub const fn rgb(self) -> Option<RGB8> {
        match self {
            Self::Rgb(rgb) => Some(rgb),
            Self::Transparent => None,
        }
    }

    /// Returns true if this cell paints anything.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Rgb(_))
    }
}

impl From<RGB8> for Color {
    fn from(rgb: RGB8) -> Self {
        Self::Rgb(rgb)
    }
}
