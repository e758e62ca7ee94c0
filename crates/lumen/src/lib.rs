//! # Lumen
//!
//! Explicit finite-difference wave simulation on a 2D grid, with a per-cell
//! refractive index, boundary treatments, and forced oscillator sources.
//!
//! Lumen represents the world as flat displacement/velocity buffers with one
//! or three channels per cell. This enables:
//!
//! - **Refraction**: the index map scales local stiffness, bending wavefronts
//! - **Dispersion**: RGB fields add a per-channel stiffness offset, so colors split
//! - **Authoring by stamps**: rectangles, disks, lines and lenses edit the index map
//! - **Driven sources**: points, disks and rectangles of phased oscillators
//! - **Light accumulation**: a running sum of |u| or u² for exposure images
//!
//! ## Quick Start
//!
//! ```rust
//! use lumen::{BoundaryMode, Field};
//!
//! let mut field = Field::new(300, 300, BoundaryMode::Absorbing)?;
//!
//! // A glass disk and a plane wave entering from the left.
//! field.set_circle_index(150, 150, 100.0, 0.4)?;
//! field.add_rect_sources(45, 46, 60, 70, 5.0, 1.0, 10.0)?;
//!
//! for _ in 0..150 {
//!     field.step();
//! }
//!
//! assert_eq!(field.step_count(), 150);
//! println!("peak displacement: {}", field.stats().displacement.peak());
//! # Ok::<(), lumen::FieldError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod hash;
pub mod propagation;
pub mod snapshot;
pub mod source;
pub mod stamp;
pub mod stats;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use config::{BoundaryMode, EnergyMeasure, FieldConfig, Spectrum, DEFAULT_DISPERSION};
pub use error::{FieldError, Result};
pub use field::{Field, DEFAULT_INDEX};
pub use grid::{CellRect, Grid};
pub use hash::hash_field;
pub use snapshot::FieldSnapshot;
pub use source::{ForcedSource, SourcePattern, TEMPORAL_SCALE};
pub use stamp::{BlendOp, IndexStamp, StampShape, LENS_INDEX};
pub use stats::{FieldStats, ScalarStats};
