//! Field propagation: the explicit leapfrog update.
//!
//! One step runs five phases over the flat buffers, in this order:
//!
//! 1. **Interior**: velocity gains the Laplacian response of displacement,
//!    scaled by the cell's stiffness (index plus channel dispersion)
//! 2. **Boundary**: the border ring is rewritten per [`BoundaryMode`]
//! 3. **Integrate**: displacement += velocity
//! 4. **Accumulate**: energy += f(displacement)
//! 5. **Drive**: forced sources overwrite their slots
//!
//! The interior phase reads only displacement and writes only velocity, so
//! sweeping in place is equivalent to reading from a frozen snapshot.

use crate::config::{BoundaryMode, EnergyMeasure, Spectrum};
use crate::grid::Grid;
use crate::source::ForcedSource;

/// Mean of the four axis-aligned neighbours of an interior cell.
///
/// # Panics
/// Panics (index out of range) if the cell is on the border ring.
#[inline]
#[must_use]
pub fn neighbor_mean(displacement: &[f32], grid: &Grid, x: usize, y: usize, channel: usize) -> f32 {
    let left = displacement[grid.slot(x - 1, y, channel)];
    let right = displacement[grid.slot(x + 1, y, channel)];
    let up = displacement[grid.slot(x, y - 1, channel)];
    let down = displacement[grid.slot(x, y + 1, channel)];
    (left + right + up + down) / 4.0
}

/// Velocity increment for a single slot.
///
/// # Formula
/// `(neighbor_mean - value) * stiffness`
#[inline]
#[must_use]
pub fn stencil_response(neighbor_mean: f32, value: f32, stiffness: f32) -> f32 {
    (neighbor_mean - value) * stiffness
}

/// Phase 1: accumulate the stencil response into velocity for every interior
/// cell and channel.
pub fn update_interior(
    grid: &Grid,
    spectrum: &Spectrum,
    index: &[f32],
    displacement: &[f32],
    velocity: &mut [f32],
) {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let n = index[grid.cell(x, y)];
            for channel in 0..grid.channels() {
                let slot = grid.slot(x, y, channel);
                let mean = neighbor_mean(displacement, grid, x, y, channel);
                let stiffness = n + spectrum.dispersion(channel);
                velocity[slot] += stencil_response(mean, displacement[slot], stiffness);
            }
        }
    }
}

/// Phase 2: rewrite the border ring.
pub fn apply_boundary(
    mode: BoundaryMode,
    grid: &Grid,
    displacement: &mut [f32],
    velocity: &mut [f32],
) {
    match mode {
        BoundaryMode::Absorbing => absorb_edges(grid, displacement, velocity),
        BoundaryMode::Reflecting => clamp_edges(grid, displacement, velocity),
        BoundaryMode::None => {}
    }
}

/// Copy the sign-flipped velocity of the first interior cell onto each border
/// cell, and set border displacement to the mean of the two nearest interior
/// cells. Column edges first, then row edges; corners end up with the row
/// rule.
fn absorb_edges(grid: &Grid, displacement: &mut [f32], velocity: &mut [f32]) {
    let (w, h) = (grid.width(), grid.height());

    // (border, first interior, second interior) along each axis.
    let columns = [(0, 1, 2), (w - 1, w - 2, w - 3)];
    let rows = [(0, 1, 2), (h - 1, h - 2, h - 3)];

    for (edge, near, far) in columns {
        for y in 0..h {
            for channel in 0..grid.channels() {
                let border = grid.slot(edge, y, channel);
                let inner = grid.slot(near, y, channel);
                let outer = grid.slot(far, y, channel);
                velocity[border] = -velocity[inner];
                displacement[border] = (displacement[inner] + displacement[outer]) / 2.0;
            }
        }
    }

    for (edge, near, far) in rows {
        for x in 0..w {
            for channel in 0..grid.channels() {
                let border = grid.slot(x, edge, channel);
                let inner = grid.slot(x, near, channel);
                let outer = grid.slot(x, far, channel);
                velocity[border] = -velocity[inner];
                displacement[border] = (displacement[inner] + displacement[outer]) / 2.0;
            }
        }
    }
}

/// Pin displacement and velocity to zero on the border ring.
fn clamp_edges(grid: &Grid, displacement: &mut [f32], velocity: &mut [f32]) {
    let (w, h) = (grid.width(), grid.height());
    let mut zero = |x: usize, y: usize| {
        for channel in 0..grid.channels() {
            let slot = grid.slot(x, y, channel);
            displacement[slot] = 0.0;
            velocity[slot] = 0.0;
        }
    };
    for x in 0..w {
        zero(x, 0);
        zero(x, h - 1);
    }
    for y in 1..h - 1 {
        zero(0, y);
        zero(w - 1, y);
    }
}

/// Phase 3: `displacement += velocity` over every slot.
pub fn integrate(displacement: &mut [f32], velocity: &[f32]) {
    for (u, v) in displacement.iter_mut().zip(velocity) {
        *u += v;
    }
}

/// Phase 4: add the energy measure of every slot's displacement.
pub fn accumulate(energy: &mut [f32], displacement: &[f32], measure: EnergyMeasure) {
    for (e, u) in energy.iter_mut().zip(displacement) {
        *e += measure.apply(*u);
    }
}

/// Phase 5: overwrite each source's slot with its sinusoid and zero its
/// velocity. Sources sharing a slot resolve in list order, last one wins.
pub fn drive_sources(
    sources: &[ForcedSource],
    step: u64,
    grid: &Grid,
    displacement: &mut [f32],
    velocity: &mut [f32],
) {
    for source in sources {
        let slot = grid.slot(source.x, source.y, source.channel);
        displacement[slot] = source.value_at(step);
        velocity[slot] = 0.0;
    }
}
