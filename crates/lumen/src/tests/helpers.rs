//! Seeded field builders shared by the cross-module tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{BoundaryMode, Field, FieldConfig, Spectrum};

// =============================================================================
// Random Fields
// =============================================================================

/// Builds a field with random displacement and velocity in `[-0.5, 0.5)` and a
/// random index map in `[0.2, 1.5)`.
///
/// Everything is drawn from a `ChaCha8Rng` seeded with `seed`, so the same
/// arguments always produce the same field.
pub fn random_field(
    seed: u64,
    width: usize,
    height: usize,
    boundary: BoundaryMode,
    spectrum: Spectrum,
) -> Field {
    let config = FieldConfig::new(width, height, boundary).with_spectrum(spectrum);
    let mut field = Field::with_config(&config).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for y in 0..height {
        for x in 0..width {
            field.set_cell_index(x, y, rng.gen_range(0.2..1.5)).unwrap();
            for channel in 0..field.channels() {
                let u = rng.gen_range(-0.5..0.5);
                let v = rng.gen_range(-0.5..0.5);
                field.set_cell_state(x, y, channel, u, v).unwrap();
            }
        }
    }
    field
}

/// Adds a handful of interior point sources on every channel, kept two cells
/// away from the border so boundary checks see only stencil output.
pub fn add_random_sources(field: &mut Field, seed: u64, count: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    for _ in 0..count {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let x = rng.gen_range(2..field.width() - 2) as i32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let y = rng.gen_range(2..field.height() - 2) as i32;
        let amplitude = rng.gen_range(0.1..1.0);
        let frequency = rng.gen_range(1.0..20.0);
        let phase = rng.gen_range(0.0..std::f32::consts::TAU);
        for channel in 0..field.channels() {
            field
                .add_point_source(x, y, channel, amplitude, frequency, phase)
                .unwrap();
        }
    }
}

/// Spectra exercised by the property tests.
pub fn spectra() -> [Spectrum; 2] {
    [Spectrum::Mono, Spectrum::rgb()]
}

/// Boundary modes exercised by the property tests.
pub fn boundaries() -> [BoundaryMode; 3] {
    [
        BoundaryMode::Absorbing,
        BoundaryMode::Reflecting,
        BoundaryMode::None,
    ]
}
