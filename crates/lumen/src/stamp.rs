//! Stamps: the mutation primitive for the refractive index map.
//!
//! A stamp describes a shape and a blend operation applied to every cell the
//! shape covers. Cells are tested at their integer coordinates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{check_index, check_length, Result};
use crate::grid::CellRect;

/// Index value written by lens stamps.
pub const LENS_INDEX: f32 = 0.5;

/// Maximum perpendicular distance (in cells) for a cell to belong to a line.
pub const LINE_HALF_WIDTH: f32 = 1.0;

/// Blend operation for applying a stamp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendOp {
    /// Replace: n = value
    #[default]
    Set,
    /// Add: n += value
    Add,
    /// Multiply: n *= value
    Multiply,
    /// Maximum: n = max(n, value)
    Max,
    /// Minimum: n = min(n, value)
    Min,
}

impl BlendOp {
    /// Apply the blend operation.
    #[must_use]
    pub fn apply(self, current: f32, value: f32) -> f32 {
        match self {
            BlendOp::Set => value,
            BlendOp::Add => current + value,
            BlendOp::Multiply => current * value,
            BlendOp::Max => current.max(value),
            BlendOp::Min => current.min(value),
        }
    }
}

/// Shape for a stamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampShape {
    /// A single cell
    Cell { x: i32, y: i32 },
    /// Inclusive axis-aligned rectangle
    Rect { rect: CellRect },
    /// Disk: squared distance to the center at most radius²
    Circle { center: Vec2, radius: f32 },
    /// Cells within one cell of the infinite line through both endpoints,
    /// restricted to the endpoints' bounding box
    Line { p0: Vec2, p1: Vec2 },
    /// Plano-convex lens: the part of a disk right of a flat edge, with the
    /// disk placed so the bulge is `thickness` cells deep
    Lens {
        flat_x: i32,
        center_y: i32,
        radius: f32,
        thickness: f32,
    },
}

impl StampShape {
    /// Create a single-cell shape.
    #[must_use]
    pub fn cell(x: i32, y: i32) -> Self {
        Self::Cell { x, y }
    }

    /// Create a rectangle from inclusive column and row ranges.
    #[must_use]
    pub fn rect(x0: i32, x1: i32, y0: i32, y1: i32) -> Self {
        Self::Rect {
            rect: CellRect::new(x0, x1, y0, y1),
        }
    }

    /// Create a disk shape.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn circle(cx: i32, cy: i32, radius: f32) -> Self {
        Self::Circle {
            center: Vec2::new(cx as f32, cy as f32),
            radius,
        }
    }

    /// Create a line shape from its endpoints.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn line(x0: i32, x1: i32, y0: i32, y1: i32) -> Self {
        Self::Line {
            p0: Vec2::new(x0 as f32, y0 as f32),
            p1: Vec2::new(x1 as f32, y1 as f32),
        }
    }

    /// Create a lens shape.
    #[must_use]
    pub fn lens(flat_x: i32, center_y: i32, radius: f32, thickness: f32) -> Self {
        Self::Lens {
            flat_x,
            center_y,
            radius,
            thickness,
        }
    }

    /// Reject shapes with unusable lengths.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidLength`](crate::FieldError::InvalidLength)
    /// for a negative or non-finite radius or thickness.
    pub fn validate(&self) -> Result<()> {
        match self {
            StampShape::Circle { radius, .. } => check_length("radius", *radius),
            StampShape::Lens {
                radius, thickness, ..
            } => {
                check_length("radius", *radius)?;
                check_length("thickness", *thickness)
            }
            StampShape::Cell { .. } | StampShape::Rect { .. } | StampShape::Line { .. } => Ok(()),
        }
    }

    /// Center of the disk a lens is cut from.
    #[allow(clippy::cast_precision_loss)]
    fn lens_center(flat_x: i32, center_y: i32, radius: f32, thickness: f32) -> Vec2 {
        Vec2::new(flat_x as f32 + thickness - radius, center_y as f32)
    }

    /// Get the cell rectangle that covers every member of this shape.
    #[must_use]
    pub fn bounds(&self) -> CellRect {
        match *self {
            StampShape::Cell { x, y } => CellRect::new(x, x, y, y),
            StampShape::Rect { rect } => rect,
            StampShape::Circle { center, radius } => {
                CellRect::covering(center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            StampShape::Line { p0, p1 } => CellRect::covering(p0.min(p1), p0.max(p1)),
            StampShape::Lens {
                flat_x,
                center_y,
                radius,
                thickness,
            } => {
                let center = Self::lens_center(flat_x, center_y, radius, thickness);
                let mut rect =
                    CellRect::covering(center - Vec2::splat(radius), center + Vec2::splat(radius));
                rect.x0 = rect.x0.max(flat_x);
                rect.x1 = rect.x1.max(rect.x0);
                rect
            }
        }
    }

    /// Check if a cell belongs to this shape.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let point = Vec2::new(x as f32, y as f32);
        match *self {
            StampShape::Cell { x: cx, y: cy } => x == cx && y == cy,
            StampShape::Rect { rect } => rect.contains(x, y),
            StampShape::Circle { center, radius } => {
                center.distance_squared(point) <= radius * radius
            }
            StampShape::Line { p0, p1 } => {
                let (min, max) = (p0.min(p1), p0.max(p1));
                if point.x < min.x || point.x > max.x || point.y < min.y || point.y > max.y {
                    return false;
                }
                let along = p1 - p0;
                if along == Vec2::ZERO {
                    return point == p0;
                }
                // Unit normal (A, B) with C chosen so the line passes through p0.
                let normal = along.perp().normalize();
                (normal.dot(point) - normal.dot(p0)).abs() <= LINE_HALF_WIDTH
            }
            StampShape::Lens {
                flat_x,
                center_y,
                radius,
                thickness,
            } => {
                let center = Self::lens_center(flat_x, center_y, radius, thickness);
                x >= flat_x && center.distance_squared(point) <= radius * radius
            }
        }
    }
}

/// A stamp: shape + blend operation + value, applied to the index map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexStamp {
    /// Cells affected
    pub shape: StampShape,
    /// How the value combines with the current index
    #[serde(default)]
    pub op: BlendOp,
    /// Operand for the blend
    pub value: f32,
}

impl IndexStamp {
    /// Create a new stamp.
    #[must_use]
    pub fn new(shape: StampShape, op: BlendOp, value: f32) -> Self {
        Self { shape, op, value }
    }

    /// Shorthand for a Set stamp.
    #[must_use]
    pub fn set(shape: StampShape, value: f32) -> Self {
        Self::new(shape, BlendOp::Set, value)
    }

    /// Create a plano-convex lens stamp at [`LENS_INDEX`].
    #[must_use]
    pub fn lens(flat_x: i32, center_y: i32, radius: f32, thickness: f32) -> Self {
        Self::set(StampShape::lens(flat_x, center_y, radius, thickness), LENS_INDEX)
    }

    /// Check the shape and value before touching any cell.
    ///
    /// Every blend of a non-negative index with a non-negative operand stays
    /// non-negative, so validating the operand keeps the map valid.
    ///
    /// # Errors
    /// Returns an error for a bad shape length or an invalid index operand.
    pub fn validate(&self) -> Result<()> {
        self.shape.validate()?;
        check_index(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_op_apply() {
        assert_eq!(BlendOp::Set.apply(5.0, 10.0), 10.0);
        assert_eq!(BlendOp::Add.apply(5.0, 10.0), 15.0);
        assert_eq!(BlendOp::Multiply.apply(5.0, 2.0), 10.0);
        assert_eq!(BlendOp::Max.apply(15.0, 10.0), 15.0);
        assert_eq!(BlendOp::Min.apply(15.0, 10.0), 10.0);
    }

    #[test]
    fn test_circle_contains_boundary() {
        let shape = StampShape::circle(10, 10, 5.0);
        assert!(shape.contains(10, 10));
        assert!(shape.contains(15, 10));
        assert!(shape.contains(13, 14));
        assert!(!shape.contains(14, 14));
        assert!(!shape.contains(16, 10));
    }

    #[test]
    fn test_line_membership() {
        // Diagonal from (0, 0) to (10, 10).
        let shape = StampShape::line(0, 10, 0, 10);
        assert!(shape.contains(5, 5));
        assert!(shape.contains(5, 6));
        assert!(!shape.contains(5, 7));
        // Outside the endpoints' bounding box even though on the line.
        assert!(!shape.contains(11, 11));
    }

    #[test]
    fn test_axis_aligned_line() {
        let shape = StampShape::line(2, 2, 0, 8);
        assert!(shape.contains(2, 4));
        // Bounding box has zero width.
        assert!(!shape.contains(3, 4));
    }

    #[test]
    fn test_degenerate_line_is_single_cell() {
        let shape = StampShape::line(4, 4, 7, 7);
        assert!(shape.contains(4, 7));
        assert!(!shape.contains(4, 8));
    }

    #[test]
    fn test_lens_cap() {
        // Disk of radius 10 centered at (3, 20): cap from x = 10 to x = 13.
        let shape = StampShape::lens(10, 20, 10.0, 3.0);
        assert!(shape.contains(10, 20));
        assert!(shape.contains(13, 20));
        assert!(!shape.contains(14, 20));
        assert!(!shape.contains(9, 20));
        assert!(shape.contains(10, 27));
        assert!(!shape.contains(12, 27));

        let bounds = shape.bounds();
        assert_eq!(bounds.x0, 10);
        assert_eq!(bounds.x1, 13);
        assert_eq!(bounds.y0, 10);
        assert_eq!(bounds.y1, 30);
    }

    #[test]
    fn test_bounds_cover_members() {
        let shapes = [
            StampShape::circle(7, 9, 4.5),
            StampShape::line(1, 12, 9, 2),
            StampShape::rect(3, 1, 4, 2),
            StampShape::lens(5, 5, 6.0, 2.0),
        ];
        for shape in shapes {
            let bounds = shape.bounds();
            for y in -5..25 {
                for x in -5..25 {
                    if shape.contains(x, y) {
                        assert!(
                            bounds.contains(x, y),
                            "{shape:?} member ({x}, {y}) outside bounds"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_validate_rejects_bad_lengths() {
        assert!(StampShape::circle(0, 0, -1.0).validate().is_err());
        assert!(StampShape::lens(0, 0, 5.0, f32::NAN).validate().is_err());
        assert!(IndexStamp::set(StampShape::cell(0, 0), -0.5).validate().is_err());
        assert!(IndexStamp::lens(0, 0, 5.0, 2.0).validate().is_ok());
    }
}
