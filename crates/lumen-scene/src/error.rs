//! Error types for scene loading and headless runs.

use std::path::PathBuf;

use lumen::FieldError;
use thiserror::Error;

/// Errors raised while loading, building or running a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// An authoring operation or the field configuration was rejected
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The scene document is not valid JSON for a scene
    #[error("invalid scene document: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Drawing or encoding a frame image failed
    #[error("failed to render frame {}: {message}", path.display())]
    Render {
        /// Image file involved
        path: PathBuf,
        /// Backend failure, as text
        message: String,
    },

    /// No preset carries this name
    #[error(
        "unknown preset '{0}' (expected one of: point-source, beam-pair, refraction-disk, prism)"
    )]
    UnknownPreset(String),

    /// No view carries this name
    #[error("unknown view '{0}' (expected 'displacement' or 'energy')")]
    UnknownView(String),

    /// A run option is out of range
    #[error("invalid run option {name}: {value}")]
    InvalidRunOption {
        /// Option name
        name: &'static str,
        /// Rejected value, as text
        value: String,
    },
}

impl SceneError {
    /// Wrap an I/O failure with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SceneError::Io {
            path: path.into(),
            source,
        }
    }
}
