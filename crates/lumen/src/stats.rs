//! Statistical summaries of field buffers.
//!
//! Used by drivers to report on a run without copying whole grids.

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Statistics for a single scalar buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarStats {
    /// Arithmetic mean
    pub mean: f32,
    /// Variance (σ²)
    pub variance: f32,
    /// Minimum value
    pub min: f32,
    /// Maximum value
    pub max: f32,
    /// Number of samples contributing to these stats
    pub sample_count: u32,
}

impl ScalarStats {
    /// Create empty stats.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            mean: 0.0,
            variance: 0.0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            sample_count: 0,
        }
    }

    /// Summarize a slice in one pass (Welford).
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        let mut mean = 0.0_f64;
        let mut m2 = 0.0_f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for (i, &value) in values.iter().enumerate() {
            let x = f64::from(value);
            let delta = x - mean;
            mean += delta / (i + 1) as f64;
            m2 += delta * (x - mean);
            min = min.min(value);
            max = max.max(value);
        }
        Self {
            mean: mean as f32,
            variance: (m2 / values.len() as f64) as f32,
            min,
            max,
            sample_count: u32::try_from(values.len()).unwrap_or(u32::MAX),
        }
    }

    /// Largest absolute value seen.
    #[must_use]
    pub fn peak(&self) -> f32 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.min.abs().max(self.max.abs())
        }
    }
}

/// Snapshot statistics over a whole field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Step the stats were taken at
    pub step_count: u64,
    /// Displacement over all slots
    pub displacement: ScalarStats,
    /// Accumulated energy over all slots
    pub energy: ScalarStats,
    /// Refractive index over all cells
    pub index: ScalarStats,
    /// Number of forced sources
    pub sources: usize,
}

impl FieldStats {
    /// Collect statistics from a field.
    #[must_use]
    pub fn of(field: &Field) -> Self {
        Self {
            step_count: field.step_count(),
            displacement: ScalarStats::from_values(field.displacement()),
            energy: ScalarStats::from_values(field.energy()),
            index: ScalarStats::from_values(field.index()),
            sources: field.sources().len(),
        }
    }
}
