//! Forced sources: cells whose displacement is driven by a sinusoid.
//!
//! A [`ForcedSource`] pins one slot every step. A [`SourcePattern`] describes
//! a bank of them (a single point, a disk with a tilted phase front, or a
//! rectangle with a horizontal phase ramp) and rasterizes to a list.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{check_finite, check_length, FieldError, Result};
use crate::grid::{CellRect, Grid};

/// Steps per unit of source time. Scene frequencies assume this cadence.
pub const TEMPORAL_SCALE: f64 = 30.0;

/// A single driven oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcedSource {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Channel driven
    pub channel: usize,
    /// Peak displacement
    pub amplitude: f32,
    /// Angular frequency in radians per source-time unit
    pub frequency: f32,
    /// Phase offset in radians
    pub phase: f32,
}

impl ForcedSource {
    /// Create a new source.
    #[must_use]
    pub fn new(
        x: usize,
        y: usize,
        channel: usize,
        amplitude: f32,
        frequency: f32,
        phase: f32,
    ) -> Self {
        Self {
            x,
            y,
            channel,
            amplitude,
            frequency,
            phase,
        }
    }

    /// Displacement imposed at a given step.
    ///
    /// `amplitude * sin(frequency * step / 30 + phase)`
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn value_at(&self, step: u64) -> f32 {
        let t = step as f64 / TEMPORAL_SCALE;
        let angle = f64::from(self.frequency) * t + f64::from(self.phase);
        (f64::from(self.amplitude) * angle.sin()) as f32
    }

    /// Check the source against a grid.
    ///
    /// # Errors
    /// Returns an error if the cell or channel is outside the grid, or a
    /// parameter is not finite.
    #[allow(clippy::cast_possible_wrap)]
    pub fn validate(&self, grid: &Grid) -> Result<()> {
        if !grid.contains(self.x, self.y) {
            return Err(FieldError::CellOutOfBounds {
                x: self.x as i64,
                y: self.y as i64,
                width: grid.width(),
                height: grid.height(),
            });
        }
        if self.channel >= grid.channels() {
            return Err(FieldError::ChannelOutOfRange {
                channel: self.channel,
                channels: grid.channels(),
            });
        }
        check_finite("amplitude", self.amplitude)?;
        check_finite("frequency", self.frequency)?;
        check_finite("phase", self.phase)
    }
}

/// A bank of sources described by shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePattern {
    /// One oscillator on one channel
    Point {
        x: i32,
        y: i32,
        #[serde(default)]
        channel: usize,
        amplitude: f32,
        frequency: f32,
        #[serde(default)]
        phase: f32,
    },
    /// Every cell of a disk on every channel, phase `k` times the signed
    /// distance to the line through the center at `direction_deg`
    Circle {
        center: Vec2,
        radius: f32,
        direction_deg: f32,
        k: f32,
        amplitude: f32,
        frequency: f32,
    },
    /// Every cell of a rectangle on every channel, phase `k * x`
    Rect {
        rect: CellRect,
        k: f32,
        amplitude: f32,
        frequency: f32,
    },
}

impl SourcePattern {
    /// Create a point source pattern.
    #[must_use]
    pub fn point(
        x: i32,
        y: i32,
        channel: usize,
        amplitude: f32,
        frequency: f32,
        phase: f32,
    ) -> Self {
        Self::Point {
            x,
            y,
            channel,
            amplitude,
            frequency,
            phase,
        }
    }

    /// Create a directional disk pattern.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn circle(
        cx: i32,
        cy: i32,
        radius: f32,
        direction_deg: f32,
        k: f32,
        amplitude: f32,
        frequency: f32,
    ) -> Self {
        Self::Circle {
            center: Vec2::new(cx as f32, cy as f32),
            radius,
            direction_deg,
            k,
            amplitude,
            frequency,
        }
    }

    /// Create a rectangular phase-ramp pattern.
    #[must_use]
    pub fn rect(
        x0: i32,
        x1: i32,
        y0: i32,
        y1: i32,
        k: f32,
        amplitude: f32,
        frequency: f32,
    ) -> Self {
        Self::Rect {
            rect: CellRect::new(x0, x1, y0, y1),
            k,
            amplitude,
            frequency,
        }
    }

    /// Expand the pattern into individual sources, in row-major cell order
    /// with channels innermost.
    ///
    /// Region patterns are clipped to the grid. A point pattern must lie on
    /// the grid.
    ///
    /// # Errors
    /// Returns an error for an off-grid point, a bad channel, a negative
    /// radius, or a non-finite parameter.
    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    pub fn rasterize(&self, grid: &Grid) -> Result<Vec<ForcedSource>> {
        match *self {
            SourcePattern::Point {
                x,
                y,
                channel,
                amplitude,
                frequency,
                phase,
            } => {
                if x < 0 || y < 0 {
                    return Err(FieldError::CellOutOfBounds {
                        x: i64::from(x),
                        y: i64::from(y),
                        width: grid.width(),
                        height: grid.height(),
                    });
                }
                let source =
                    ForcedSource::new(x as usize, y as usize, channel, amplitude, frequency, phase);
                source.validate(grid)?;
                Ok(vec![source])
            }
            SourcePattern::Circle {
                center,
                radius,
                direction_deg,
                k,
                amplitude,
                frequency,
            } => {
                check_length("radius", radius)?;
                check_finite("direction", direction_deg)?;
                check_finite("k", k)?;
                check_finite("amplitude", amplitude)?;
                check_finite("frequency", frequency)?;

                let alpha = direction_deg.to_radians();
                let normal = Vec2::new(alpha.sin(), alpha.cos());
                let bounds =
                    CellRect::covering(center - Vec2::splat(radius), center + Vec2::splat(radius));

                let mut sources = Vec::new();
                if let Some(clipped) = grid.clip(&bounds) {
                    for (x, y) in clipped.cells() {
                        let point = Vec2::new(x as f32, y as f32);
                        if center.distance_squared(point) > radius * radius {
                            continue;
                        }
                        let phase = k * normal.dot(point - center);
                        push_all_channels(&mut sources, grid, x, y, amplitude, frequency, phase);
                    }
                }
                Ok(sources)
            }
            SourcePattern::Rect {
                rect,
                k,
                amplitude,
                frequency,
            } => {
                check_finite("k", k)?;
                check_finite("amplitude", amplitude)?;
                check_finite("frequency", frequency)?;

                let mut sources = Vec::new();
                if let Some(clipped) = grid.clip(&rect) {
                    for (x, y) in clipped.cells() {
                        let phase = k * x as f32;
                        push_all_channels(&mut sources, grid, x, y, amplitude, frequency, phase);
                    }
                }
                Ok(sources)
            }
        }
    }
}

fn push_all_channels(
    sources: &mut Vec<ForcedSource>,
    grid: &Grid,
    x: usize,
    y: usize,
    amplitude: f32,
    frequency: f32,
    phase: f32,
) {
    for channel in 0..grid.channels() {
        sources.push(ForcedSource::new(x, y, channel, amplitude, frequency, phase));
    }
}
