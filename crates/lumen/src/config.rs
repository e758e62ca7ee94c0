//! Field configuration: boundary treatment, channel spectrum, and dimensions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::grid::Grid;

/// Default per-channel stiffness offsets for RGB fields (red, green, blue).
///
/// Each offset adds to the cell's index when the velocity update is scaled.
/// Lower stiffness slows a channel, so blue lags red and bends most.
pub const DEFAULT_DISPERSION: [f32; 3] = [0.0, -0.05, -0.1];

/// Edge treatment applied after the interior update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Extrapolate displacement and mirror velocity with flipped sign
    #[default]
    Absorbing,
    /// Rigid wall: displacement and velocity pinned to zero
    Reflecting,
    /// Border cells are left as the interior update found them
    None,
}

impl BoundaryMode {
    /// Name used in scene files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BoundaryMode::Absorbing => "absorbing",
            BoundaryMode::Reflecting => "reflecting",
            BoundaryMode::None => "none",
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absorbing" => Ok(BoundaryMode::Absorbing),
            "reflecting" => Ok(BoundaryMode::Reflecting),
            "none" => Ok(BoundaryMode::None),
            _ => Err(FieldError::UnknownBoundaryMode(s.to_string())),
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How per-step displacement feeds the accumulated energy buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyMeasure {
    /// `|u|`
    Magnitude,
    /// `u²`
    Square,
}

impl EnergyMeasure {
    /// Apply the measure to a displacement value.
    #[inline]
    #[must_use]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            EnergyMeasure::Magnitude => value.abs(),
            EnergyMeasure::Square => value * value,
        }
    }
}

/// Channel layout of a field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spectrum {
    /// Single scalar channel, no dispersion
    #[default]
    Mono,
    /// Red, green, blue channels with per-channel stiffness offsets
    Rgb {
        /// Offsets added to the cell index for each channel
        dispersion: [f32; 3],
    },
}

impl Spectrum {
    /// RGB spectrum with [`DEFAULT_DISPERSION`].
    #[must_use]
    pub const fn rgb() -> Self {
        Spectrum::Rgb {
            dispersion: DEFAULT_DISPERSION,
        }
    }

    /// Number of channels stored per cell.
    #[must_use]
    pub const fn channels(&self) -> usize {
        match self {
            Spectrum::Mono => 1,
            Spectrum::Rgb { .. } => 3,
        }
    }

    /// Stiffness offset for a channel.
    #[inline]
    #[must_use]
    pub fn dispersion(&self, channel: usize) -> f32 {
        match self {
            Spectrum::Mono => 0.0,
            Spectrum::Rgb { dispersion } => dispersion[channel],
        }
    }

    /// Energy measure used when accumulating light.
    #[must_use]
    pub const fn energy_measure(&self) -> EnergyMeasure {
        match self {
            Spectrum::Mono => EnergyMeasure::Magnitude,
            Spectrum::Rgb { .. } => EnergyMeasure::Square,
        }
    }
}

/// Everything needed to construct a [`Field`](crate::Field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Edge treatment
    #[serde(default)]
    pub boundary: BoundaryMode,
    /// Channel layout
    #[serde(default)]
    pub spectrum: Spectrum,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 151,
            height: 101,
            boundary: BoundaryMode::Absorbing,
            spectrum: Spectrum::Mono,
        }
    }
}

impl FieldConfig {
    /// Create a scalar (mono) configuration.
    #[must_use]
    pub fn new(width: usize, height: usize, boundary: BoundaryMode) -> Self {
        Self {
            width,
            height,
            boundary,
            spectrum: Spectrum::Mono,
        }
    }

    /// Replace the spectrum.
    #[must_use]
    pub fn with_spectrum(mut self, spectrum: Spectrum) -> Self {
        self.spectrum = spectrum;
        self
    }

    /// Switch to an RGB spectrum with default dispersion.
    #[must_use]
    pub fn rgb(self) -> Self {
        self.with_spectrum(Spectrum::rgb())
    }

    /// Validate and derive the grid dimensions.
    ///
    /// # Errors
    /// Returns an error if the grid is smaller than 3x3 or a dispersion
    /// offset is not finite.
    pub fn validate(&self) -> Result<Grid, FieldError> {
        if let Spectrum::Rgb { dispersion } = self.spectrum {
            for value in dispersion {
                crate::error::check_finite("dispersion", value)?;
            }
        }
        Grid::new(self.width, self.height, self.spectrum.channels())
    }
}
