//! Cross-module tests for the stepping engine.
//!
//! - `properties.rs`: invariants that must hold for any scene (proptest)
//! - `scenario.rs`: end-to-end runs of authored scenes
//! - `determinism.rs`: repeatability and snapshot resume
//! - `helpers.rs`: seeded field builders

mod helpers;
