//! Error types for field construction and scene authoring.
//!
//! Stepping never fails: every invariant the stencil relies on is checked
//! when the field is built or when a stamp or source is applied.

use thiserror::Error;

/// Result alias for fallible field operations.
pub type Result<T> = std::result::Result<T, FieldError>;

/// Invalid parameters passed to a [`Field`](crate::Field) constructor or
/// authoring call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Grid too small to have both an interior and a border ring, or too
    /// large to address.
    #[error(
        "invalid grid dimensions {width}x{height}: edges must be at least 3 cells \
         and the buffers must fit in memory"
    )]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// Channel count of zero.
    #[error("invalid channel count {0}: must be at least 1")]
    InvalidChannelCount(usize),

    /// Boundary mode string not recognized.
    #[error("unknown boundary mode {0:?}: expected \"absorbing\", \"reflecting\" or \"none\"")]
    UnknownBoundaryMode(String),

    /// Cell coordinate outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        /// Column
        x: i64,
        /// Row
        y: i64,
        /// Grid width
        width: usize,
        /// Grid height
        height: usize,
    },

    /// Channel outside `0..channels`.
    #[error("channel {channel} is out of range for a field with {channels} channel(s)")]
    ChannelOutOfRange {
        /// Requested channel
        channel: usize,
        /// Channels in the field
        channels: usize,
    },

    /// Refractive index negative, NaN, or infinite.
    #[error("invalid refractive index {0}: must be finite and non-negative")]
    InvalidIndex(f32),

    /// Shape length parameter (radius, thickness) negative, NaN, or infinite.
    #[error("invalid {name} {value}: must be finite and non-negative")]
    InvalidLength {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Source parameter (amplitude, frequency, phase, wavenumber) not finite.
    #[error("invalid source {name} {value}: must be finite")]
    InvalidSourceParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Snapshot taken from a field with different dimensions.
    #[error(
        "snapshot shape {found_width}x{found_height}x{found_channels} \
         does not match field {width}x{height}x{channels}"
    )]
    SnapshotMismatch {
        /// Field width
        width: usize,
        /// Field height
        height: usize,
        /// Field channels
        channels: usize,
        /// Snapshot width
        found_width: usize,
        /// Snapshot height
        found_height: usize,
        /// Snapshot channels
        found_channels: usize,
    },

    /// Snapshot buffer length inconsistent with its declared shape.
    #[error("snapshot buffer {buffer} has {found} values, expected {expected}")]
    SnapshotCorrupt {
        /// Buffer name
        buffer: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        found: usize,
    },
}

/// Check that a length parameter is finite and non-negative.
pub(crate) fn check_length(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FieldError::InvalidLength { name, value })
    }
}

/// Check that a source parameter is finite.
pub(crate) fn check_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FieldError::InvalidSourceParameter { name, value })
    }
}

/// Check that a refractive index value is usable.
pub(crate) fn check_index(value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FieldError::InvalidIndex(value))
    }
}
