//! Test module for scene-to-frame pipeline tests.
//!
//! - `pipeline.rs`: scenes built, run and rendered end to end

mod pipeline;
