//! Frame compositing.

use core::fmt;

use smart_leds::RGB8;

use crate::{Bitmap, Color, Gauge, COLS, GAUGE_TEMPLATE, ROWS};

/// Fully resolved matrix image ready to be written to the display.
///
/// Unlike [`Bitmap`] every cell holds a concrete color.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame([[RGB8; COLS]; ROWS]);

impl Frame {
    /// Returns an all black frame.
    #[must_use]
    pub fn clear() -> Self {
        Self::default()
    }

    /// Collects a frame from row-major pixels, as written to the LED matrix driver.
    ///
    /// Missing pixels stay black, extra pixels are ignored.
    pub fn from_pixels<I: IntoIterator<Item = RGB8>>(pixels: I) -> Self {
        let mut frame = Self::clear();
        for (index, pixel) in pixels.into_iter().take(ROWS * COLS).enumerate() {
            frame.0[index / COLS][index % COLS] = pixel;
        }
        frame
    }

    /// Draws the thermometer and then the given fan image on top of a cleared frame.
    ///
    /// The fan layer is painted last, so its opaque cells always win.
    #[must_use]
    pub fn compose(gauge: &Gauge, fan: Option<&Bitmap>) -> Self {
        let mut frame = Self::clear();
        frame.draw_gauge(gauge);
        if let Some(fan) = fan {
            frame.draw_bitmap(fan);
        }
        frame
    }

    /// Paints every thermometer cell with its gauge color.
    pub fn draw_gauge(&mut self, gauge: &Gauge) {
        for (row, col) in GAUGE_TEMPLATE.opaque_positions() {
            self.0[row][col] = gauge.color_at(row, col).unwrap_or(Color::BLACK);
        }
    }

    /// Copies the opaque cells of the bitmap into this frame.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap) {
        for (row, col, cell) in bitmap.cells() {
            if let Some(rgb) = cell.rgb() {
                self.0[row][col] = rgb;
            }
        }
    }

    /// Returns the color at the given position.
    ///
    /// # Panics
    ///
    /// If the position lies outside of the matrix.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> RGB8 {
        self.0[row][col]
    }

    /// Returns the frame rows from top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[[RGB8; COLS]; ROWS] {
        &self.0
    }

    /// Returns all pixels in row-major order, as expected by the LED matrix driver.
    pub fn pixels(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.0.iter().flatten().copied()
    }

    /// Returns true if every pixel is black.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.pixels().all(|pixel| pixel == Color::BLACK)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // One character per pixel keeps the frame readable in logs.
        for row in &self.0 {
            for pixel in row {
                let c = if *pixel == Color::BLACK {
                    '.'
                } else if *pixel == Color::RED {
                    'R'
                } else if *pixel == Color::ORANGE {
                    'O'
                } else if *pixel == Color::YELLOW {
                    'Y'
                } else {
                    '#'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
