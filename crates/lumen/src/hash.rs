//! State hashing for determinism verification.
//!
//! Two fields built by the same authoring calls and stepped the same number
//! of times must produce identical hashes. Floats are hashed by bit pattern,
//! so `-0.0` and `0.0` hash differently, as do distinct NaN payloads.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::field::Field;
use crate::source::ForcedSource;

/// Compute a deterministic hash of field state.
///
/// This hash includes:
/// - Grid dimensions, boundary mode, and step count
/// - Displacement, velocity, energy, and index buffers
/// - The forced source list, in order
#[must_use]
pub fn hash_field(field: &Field) -> u64 {
    let mut hasher = DefaultHasher::new();

    field.grid().hash(&mut hasher);
    field.boundary().hash(&mut hasher);
    field.step_count().hash(&mut hasher);

    hash_buffer(field.displacement(), &mut hasher);
    hash_buffer(field.velocity(), &mut hasher);
    hash_buffer(field.energy(), &mut hasher);
    hash_buffer(field.index(), &mut hasher);

    field.sources().len().hash(&mut hasher);
    for source in field.sources() {
        hash_source(source, &mut hasher);
    }

    hasher.finish()
}

/// Hash a buffer by converting each f32 to bits.
fn hash_buffer<H: Hasher>(values: &[f32], hasher: &mut H) {
    values.len().hash(hasher);
    for value in values {
        value.to_bits().hash(hasher);
    }
}

fn hash_source<H: Hasher>(source: &ForcedSource, hasher: &mut H) {
    source.x.hash(hasher);
    source.y.hash(hasher);
    source.channel.hash(hasher);
    source.amplitude.to_bits().hash(hasher);
    source.frequency.to_bits().hash(hasher);
    source.phase.to_bits().hash(hasher);
}
