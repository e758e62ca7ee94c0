//! The field: top-level aggregate for a wave simulation.
//!
//! A [`Field`] owns the dynamic state (displacement, velocity, accumulated
//! energy), the static refractive index map, and the list of forced sources.
//! Authoring calls mutate the static parts; [`Field::step`] advances the
//! dynamic parts by one tick.

use tracing::{debug, trace};

use crate::config::{BoundaryMode, FieldConfig, Spectrum};
use crate::error::{FieldError, Result};
use crate::grid::Grid;
use crate::propagation;
use crate::snapshot::FieldSnapshot;
use crate::source::{ForcedSource, SourcePattern};
use crate::stamp::{IndexStamp, StampShape};
use crate::stats::FieldStats;

/// Index value of every cell no stamp has touched.
pub const DEFAULT_INDEX: f32 = 1.0;

/// A 2D wave field with per-cell refractive index and forced sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    grid: Grid,
    boundary: BoundaryMode,
    spectrum: Spectrum,
    displacement: Vec<f32>,
    velocity: Vec<f32>,
    energy: Vec<f32>,
    index: Vec<f32>,
    sources: Vec<ForcedSource>,
    step_count: u64,
}

impl Field {
    /// Create a scalar (single channel) field at rest.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidDimensions`] if either edge is below 3 or
    /// the grid is too large to address.
    pub fn new(width: usize, height: usize, boundary: BoundaryMode) -> Result<Self> {
        Self::with_config(&FieldConfig::new(width, height, boundary))
    }

    /// Create an RGB field with default dispersion.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidDimensions`] if either edge is below 3 or
    /// the grid is too large to address.
    pub fn rgb(width: usize, height: usize, boundary: BoundaryMode) -> Result<Self> {
        Self::with_config(&FieldConfig::new(width, height, boundary).rgb())
    }

    /// Create a field from a configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration does not validate.
    pub fn with_config(config: &FieldConfig) -> Result<Self> {
        let grid = config.validate()?;
        debug!(
            width = grid.width(),
            height = grid.height(),
            channels = grid.channels(),
            boundary = %config.boundary,
            "created field"
        );
        Ok(Self {
            grid,
            boundary: config.boundary,
            spectrum: config.spectrum,
            displacement: vec![0.0; grid.slot_count()],
            velocity: vec![0.0; grid.slot_count()],
            energy: vec![0.0; grid.slot_count()],
            index: vec![DEFAULT_INDEX; grid.cell_count()],
            sources: Vec::new(),
            step_count: 0,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Grid dimensions.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Grid height in cells.
    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Channels per cell (1 for mono, 3 for RGB).
    #[must_use]
    pub fn channels(&self) -> usize {
        self.grid.channels()
    }

    /// Edge treatment.
    #[must_use]
    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// Channel layout.
    #[must_use]
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Steps taken since construction or the last reset.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Reconstruct the configuration this field was built from.
    #[must_use]
    pub fn config(&self) -> FieldConfig {
        FieldConfig {
            width: self.width(),
            height: self.height(),
            boundary: self.boundary,
            spectrum: self.spectrum,
        }
    }

    fn slot(&self, x: usize, y: usize, channel: usize) -> Option<usize> {
        (self.grid.contains(x, y) && channel < self.channels())
            .then(|| self.grid.slot(x, y, channel))
    }

    /// Displacement at a slot, or `None` off the grid.
    #[must_use]
    pub fn displacement_at(&self, x: usize, y: usize, channel: usize) -> Option<f32> {
        self.slot(x, y, channel).map(|s| self.displacement[s])
    }

    /// Velocity at a slot, or `None` off the grid.
    #[must_use]
    pub fn velocity_at(&self, x: usize, y: usize, channel: usize) -> Option<f32> {
        self.slot(x, y, channel).map(|s| self.velocity[s])
    }

    /// Accumulated energy at a slot, or `None` off the grid.
    #[must_use]
    pub fn energy_at(&self, x: usize, y: usize, channel: usize) -> Option<f32> {
        self.slot(x, y, channel).map(|s| self.energy[s])
    }

    /// Refractive index at a cell, or `None` off the grid.
    #[must_use]
    pub fn index_at(&self, x: usize, y: usize) -> Option<f32> {
        self.grid
            .contains(x, y)
            .then(|| self.index[self.grid.cell(x, y)])
    }

    /// Raw displacement buffer (see [`Grid::slot`] for layout).
    #[must_use]
    pub fn displacement(&self) -> &[f32] {
        &self.displacement
    }

    /// Raw velocity buffer.
    #[must_use]
    pub fn velocity(&self) -> &[f32] {
        &self.velocity
    }

    /// Raw accumulated energy buffer.
    #[must_use]
    pub fn energy(&self) -> &[f32] {
        &self.energy
    }

    /// Raw index buffer (see [`Grid::cell`] for layout).
    #[must_use]
    pub fn index(&self) -> &[f32] {
        &self.index
    }

    /// Forced sources in insertion order.
    #[must_use]
    pub fn sources(&self) -> &[ForcedSource] {
        &self.sources
    }

    /// Summary statistics of the current state.
    #[must_use]
    pub fn stats(&self) -> FieldStats {
        FieldStats::of(self)
    }

    /// Deterministic hash of the current state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        crate::hash::hash_field(self)
    }

    // ========================================================================
    // Authoring
    // ========================================================================

    /// Seed the dynamic state of one slot.
    ///
    /// # Errors
    /// Returns an error if the cell or channel is off the grid.
    #[allow(clippy::cast_possible_wrap)]
    pub fn set_cell_state(
        &mut self,
        x: usize,
        y: usize,
        channel: usize,
        displacement: f32,
        velocity: f32,
    ) -> Result<()> {
        if !self.grid.contains(x, y) {
            return Err(FieldError::CellOutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width(),
                height: self.height(),
            });
        }
        if channel >= self.channels() {
            return Err(FieldError::ChannelOutOfRange {
                channel,
                channels: self.channels(),
            });
        }
        let slot = self.grid.slot(x, y, channel);
        self.displacement[slot] = displacement;
        self.velocity[slot] = velocity;
        Ok(())
    }

    /// Apply a stamp to the index map. Returns the number of cells touched.
    ///
    /// Parts of the shape off the grid are ignored.
    ///
    /// # Errors
    /// Returns an error for a bad shape length or index value; the map is
    /// left untouched in that case.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn stamp_index(&mut self, stamp: &IndexStamp) -> Result<usize> {
        stamp.validate()?;
        let Some(region) = self.grid.clip(&stamp.shape.bounds()) else {
            return Ok(0);
        };
        let mut touched = 0;
        for (x, y) in region.cells() {
            if stamp.shape.contains(x as i32, y as i32) {
                let cell = self.grid.cell(x, y);
                self.index[cell] = stamp.op.apply(self.index[cell], stamp.value);
                touched += 1;
            }
        }
        debug!(shape = ?stamp.shape, op = ?stamp.op, value = stamp.value, touched, "stamped index");
        Ok(touched)
    }

    /// Set the index of a single cell.
    ///
    /// # Errors
    /// Returns an error if the cell is off the grid or the value is invalid.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn set_cell_index(&mut self, x: usize, y: usize, value: f32) -> Result<()> {
        if !self.grid.contains(x, y) {
            return Err(FieldError::CellOutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width(),
                height: self.height(),
            });
        }
        self.stamp_index(&IndexStamp::set(StampShape::cell(x as i32, y as i32), value))
            .map(|_| ())
    }

    /// Set the index over an inclusive rectangle.
    ///
    /// # Errors
    /// Returns an error for an invalid index value.
    pub fn set_rect_index(
        &mut self,
        x0: i32,
        x1: i32,
        y0: i32,
        y1: i32,
        value: f32,
    ) -> Result<usize> {
        self.stamp_index(&IndexStamp::set(StampShape::rect(x0, x1, y0, y1), value))
    }

    /// Set the index over a disk.
    ///
    /// # Errors
    /// Returns an error for a bad radius or index value.
    pub fn set_circle_index(&mut self, cx: i32, cy: i32, radius: f32, value: f32) -> Result<usize> {
        self.stamp_index(&IndexStamp::set(StampShape::circle(cx, cy, radius), value))
    }

    /// Set the index along a one-cell-wide line between two endpoints.
    ///
    /// # Errors
    /// Returns an error for an invalid index value.
    pub fn set_line_index(
        &mut self,
        x0: i32,
        x1: i32,
        y0: i32,
        y1: i32,
        value: f32,
    ) -> Result<usize> {
        self.stamp_index(&IndexStamp::set(StampShape::line(x0, x1, y0, y1), value))
    }

    /// Stamp a plano-convex lens at [`LENS_INDEX`](crate::stamp::LENS_INDEX).
    ///
    /// # Errors
    /// Returns an error for a bad radius or thickness.
    pub fn set_lens_index(
        &mut self,
        flat_x: i32,
        center_y: i32,
        radius: f32,
        thickness: f32,
    ) -> Result<usize> {
        self.stamp_index(&IndexStamp::lens(flat_x, center_y, radius, thickness))
    }

    /// Append a single source after validating it.
    ///
    /// # Errors
    /// Returns an error if the source lies off the grid or has a non-finite
    /// parameter.
    pub fn add_source(&mut self, source: ForcedSource) -> Result<()> {
        source.validate(&self.grid)?;
        self.sources.push(source);
        Ok(())
    }

    /// Append every source of a pattern. Returns the number added.
    ///
    /// # Errors
    /// Returns an error if the pattern does not rasterize; no sources are
    /// added in that case.
    pub fn add_pattern(&mut self, pattern: &SourcePattern) -> Result<usize> {
        let sources = pattern.rasterize(&self.grid)?;
        let added = sources.len();
        self.sources.extend(sources);
        debug!(?pattern, added, total = self.sources.len(), "added sources");
        Ok(added)
    }

    /// Append one point source.
    ///
    /// # Errors
    /// Returns an error if the cell or channel is off the grid.
    pub fn add_point_source(
        &mut self,
        x: i32,
        y: i32,
        channel: usize,
        amplitude: f32,
        frequency: f32,
        phase: f32,
    ) -> Result<()> {
        self.add_pattern(&SourcePattern::point(x, y, channel, amplitude, frequency, phase))
            .map(|_| ())
    }

    /// Fill a disk with sources on every channel, phased by `k` times the
    /// signed distance to the line through the center at `direction_deg`.
    ///
    /// # Errors
    /// Returns an error for a bad radius or non-finite parameter.
    #[allow(clippy::too_many_arguments)]
    pub fn add_circle_sources(
        &mut self,
        cx: i32,
        cy: i32,
        radius: f32,
        direction_deg: f32,
        k: f32,
        amplitude: f32,
        frequency: f32,
    ) -> Result<usize> {
        self.add_pattern(&SourcePattern::circle(
            cx,
            cy,
            radius,
            direction_deg,
            k,
            amplitude,
            frequency,
        ))
    }

    /// Fill an inclusive rectangle with sources on every channel, phase `k * x`.
    ///
    /// # Errors
    /// Returns an error for a non-finite parameter.
    #[allow(clippy::too_many_arguments)]
    pub fn add_rect_sources(
        &mut self,
        x0: i32,
        x1: i32,
        y0: i32,
        y1: i32,
        k: f32,
        amplitude: f32,
        frequency: f32,
    ) -> Result<usize> {
        self.add_pattern(&SourcePattern::rect(x0, x1, y0, y1, k, amplitude, frequency))
    }

    /// Remove every forced source.
    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Advance the field by one tick.
    pub fn step(&mut self) {
        self.step_count += 1;
        trace!(step = self.step_count, "step");

        propagation::update_interior(
            &self.grid,
            &self.spectrum,
            &self.index,
            &self.displacement,
            &mut self.velocity,
        );
        propagation::apply_boundary(
            self.boundary,
            &self.grid,
            &mut self.displacement,
            &mut self.velocity,
        );
        propagation::integrate(&mut self.displacement, &self.velocity);
        propagation::accumulate(
            &mut self.energy,
            &self.displacement,
            self.spectrum.energy_measure(),
        );
        propagation::drive_sources(
            &self.sources,
            self.step_count,
            &self.grid,
            &mut self.displacement,
            &mut self.velocity,
        );
    }

    /// Advance the field by `steps` ticks.
    pub fn step_n(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Return the dynamic state to rest and the step counter to zero.
    ///
    /// The index map and sources are kept.
    pub fn reset(&mut self) {
        self.displacement.fill(0.0);
        self.velocity.fill(0.0);
        self.energy.fill(0.0);
        self.step_count = 0;
        debug!("reset field");
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Capture the dynamic state, index map and step counter.
    #[must_use]
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            width: self.width(),
            height: self.height(),
            channels: self.channels(),
            step_count: self.step_count,
            displacement: self.displacement.clone(),
            velocity: self.velocity.clone(),
            energy: self.energy.clone(),
            index: self.index.clone(),
        }
    }

    /// Restore state captured by [`Field::snapshot`]. Sources, boundary mode
    /// and spectrum are not part of a snapshot and stay as they are.
    ///
    /// # Errors
    /// Returns an error if the snapshot's shape differs from this field's or
    /// a buffer has the wrong length; the field is untouched in that case.
    pub fn restore(&mut self, snapshot: &FieldSnapshot) -> Result<()> {
        snapshot.check_shape(&self.grid)?;
        self.displacement.clone_from(&snapshot.displacement);
        self.velocity.clone_from(&snapshot.velocity);
        self.energy.clone_from(&snapshot.energy);
        self.index.clone_from(&snapshot.index);
        self.step_count = snapshot.step_count;
        debug!(step = self.step_count, "restored snapshot");
        Ok(())
    }
}
