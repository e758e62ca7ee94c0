//! # Lumen Scene
//!
//! Scene description and headless driving for [`lumen`] fields.
//!
//! A [`Scene`] is a [`FieldConfig`](lumen::FieldConfig) plus an ordered list
//! of authoring operations. Scenes load from JSON or come from a named
//! [`Preset`]. A [`Runner`] steps the built field, hands [`Frame`]s to a
//! sink at a fixed cadence, and finishes with a serializable [`RunReport`].
//!
//! ## Usage
//!
//! ```rust
//! use lumen_scene::{Preset, RunOptions, Runner, Scene};
//!
//! let scene = Scene::preset(Preset::PointSource);
//! let mut runner = Runner::new(scene.build()?, RunOptions::new(30))?;
//!
//! let mut frames = 0;
//! let report = runner.run(|_step, frame| {
//!     assert_eq!(frame.width(), 151);
//!     frames += 1;
//!     Ok(())
//! })?;
//!
//! assert_eq!(report.step_count, 30);
//! assert_eq!(frames, 30);
//! # Ok::<(), lumen_scene::SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the engine for scene authors
pub use lumen;

pub mod error;
pub mod frame;
pub mod runner;
pub mod scene;

#[cfg(test)]
mod tests;

pub use error::SceneError;
pub use frame::{Frame, View, INDEX_TINT};
pub use runner::{RunOptions, RunReport, Runner};
pub use scene::{Preset, Scene, SceneOp};
