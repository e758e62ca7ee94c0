//! Grid geometry: dimensions, flat-buffer layout, and cell rectangles.
//!
//! All field buffers are flat `Vec<f32>` in row-major order with the channel
//! as the fastest-varying axis: slot `(y * width + x) * channels + c`. The
//! refractive index map has one value per cell: `y * width + x`.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Smallest grid edge that still has an interior and a border ring.
pub const MIN_EDGE: usize = 3;

/// Largest grid edge; cell rectangles use `i32` coordinates.
#[allow(clippy::cast_sign_loss)]
pub const MAX_EDGE: usize = i32::MAX as usize;

/// Fixed dimensions of a field grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    channels: usize,
}

impl Grid {
    /// Create grid dimensions.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidDimensions`] when either edge is below
    /// [`MIN_EDGE`], above `i32::MAX`, or the slot count overflows `usize`.
    /// Returns [`FieldError::InvalidChannelCount`] when `channels` is zero.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, FieldError> {
        if width < MIN_EDGE || height < MIN_EDGE || width > MAX_EDGE || height > MAX_EDGE {
            return Err(FieldError::InvalidDimensions { width, height });
        }
        if channels == 0 {
            return Err(FieldError::InvalidChannelCount(channels));
        }
        let slots = width
            .checked_mul(height)
            .and_then(|cells| cells.checked_mul(channels));
        if slots.is_none() {
            return Err(FieldError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Values stored per cell.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of cells (`width * height`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of slots (`width * height * channels`).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.cell_count() * self.channels
    }

    /// Index of a cell in the per-cell (index map) layout.
    #[inline]
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Index of a slot in the per-channel layout.
    #[inline]
    #[must_use]
    pub fn slot(&self, x: usize, y: usize, channel: usize) -> usize {
        self.cell(x, y) * self.channels + channel
    }

    /// Check if a cell coordinate lies on the grid.
    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Check if a cell lies on the outer border ring.
    #[must_use]
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// The whole grid as an inclusive cell rectangle.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn rect(&self) -> CellRect {
        CellRect::new(0, self.width as i32 - 1, 0, self.height as i32 - 1)
    }

    /// Clip a rectangle to the grid. Returns `None` if nothing overlaps.
    #[must_use]
    pub fn clip(&self, rect: &CellRect) -> Option<CellRect> {
        rect.intersect(&self.rect())
    }
}

/// Inclusive axis-aligned rectangle of cells, in signed coordinates so shapes
/// may extend past the grid edges before clipping.
///
/// Corners are normalized on construction and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCellRect")]
pub struct CellRect {
    /// Left column (inclusive)
    pub x0: i32,
    /// Right column (inclusive)
    pub x1: i32,
    /// Top row (inclusive)
    pub y0: i32,
    /// Bottom row (inclusive)
    pub y1: i32,
}

#[derive(Deserialize)]
struct RawCellRect {
    x0: i32,
    x1: i32,
    y0: i32,
    y1: i32,
}

impl From<RawCellRect> for CellRect {
    fn from(raw: RawCellRect) -> Self {
        CellRect::new(raw.x0, raw.x1, raw.y0, raw.y1)
    }
}

impl CellRect {
    /// Create a rectangle from two corners in any order.
    #[must_use]
    pub fn new(x0: i32, x1: i32, y0: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            x1: x0.max(x1),
            y0: y0.min(y1),
            y1: y0.max(y1),
        }
    }

    /// Smallest rectangle covering a floating-point box.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn covering(min: glam::Vec2, max: glam::Vec2) -> Self {
        Self::new(
            min.x.floor() as i32,
            max.x.ceil() as i32,
            min.y.floor() as i32,
            max.y.ceil() as i32,
        )
    }

    /// Check if a cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Overlap of two rectangles, if any.
    #[must_use]
    pub fn intersect(&self, other: &CellRect) -> Option<CellRect> {
        let x0 = self.x0.max(other.x0);
        let x1 = self.x1.min(other.x1);
        let y0 = self.y0.max(other.y0);
        let y1 = self.y1.min(other.y1);
        (x0 <= x1 && y0 <= y1).then_some(CellRect { x0, x1, y0, y1 })
    }

    /// Iterate cells row by row.
    ///
    /// Only meaningful on a rectangle already clipped to a grid, where all
    /// coordinates are non-negative.
    #[allow(clippy::cast_sign_loss)]
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (x0, x1) = (self.x0.max(0) as usize, self.x1.max(0) as usize);
        let (y0, y1) = (self.y0.max(0) as usize, self.y1.max(0) as usize);
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }
}
