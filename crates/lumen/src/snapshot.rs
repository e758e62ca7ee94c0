//! Snapshots of the mutable simulation state.
//!
//! A snapshot holds everything [`Field::step`](crate::Field::step) reads or
//! writes apart from the sources: displacement, velocity, accumulated energy,
//! the index map and the step counter. Restoring a snapshot into a field with
//! the same scene and stepping on reproduces an uninterrupted run exactly.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};
use crate::grid::Grid;

/// Serializable copy of a field's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    /// Grid width
    pub width: usize,
    /// Grid height
    pub height: usize,
    /// Channels per cell
    pub channels: usize,
    /// Step counter at capture time
    pub step_count: u64,
    /// Displacement buffer
    pub displacement: Vec<f32>,
    /// Velocity buffer
    pub velocity: Vec<f32>,
    /// Accumulated energy buffer
    pub energy: Vec<f32>,
    /// Refractive index map
    pub index: Vec<f32>,
}

impl FieldSnapshot {
    /// Verify the snapshot fits a grid.
    ///
    /// # Errors
    /// Returns [`FieldError::SnapshotMismatch`] for different dimensions and
    /// [`FieldError::SnapshotCorrupt`] for a buffer of the wrong length.
    pub fn check_shape(&self, grid: &Grid) -> Result<()> {
        let found = (self.width, self.height, self.channels);
        if found != (grid.width(), grid.height(), grid.channels()) {
            return Err(FieldError::SnapshotMismatch {
                width: grid.width(),
                height: grid.height(),
                channels: grid.channels(),
                found_width: self.width,
                found_height: self.height,
                found_channels: self.channels,
            });
        }
        let buffers = [
            ("displacement", self.displacement.len(), grid.slot_count()),
            ("velocity", self.velocity.len(), grid.slot_count()),
            ("energy", self.energy.len(), grid.slot_count()),
            ("index", self.index.len(), grid.cell_count()),
        ];
        for (buffer, found, expected) in buffers {
            if found != expected {
                return Err(FieldError::SnapshotCorrupt {
                    buffer,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}
