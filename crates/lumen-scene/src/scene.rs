//! Scenes: a field configuration plus ordered authoring operations.
//!
//! Scenes are plain serde values, so a JSON document fully describes a run's
//! starting state:
//!
//! ```json
//! {
//!   "config": { "width": 300, "height": 300, "boundary": "absorbing" },
//!   "ops": [
//!     { "index": { "shape": { "circle": { "center": [150, 150], "radius": 100 } },
//!                  "value": 0.4 } },
//!     { "sources": { "rect": { "rect": { "x0": 45, "x1": 46, "y0": 60, "y1": 70 },
//!                              "k": 5, "amplitude": 1, "frequency": 10 } } }
//!   ]
//! }
//! ```
//!
//! Operations apply in order, so later stamps overwrite earlier ones and later
//! sources win on shared slots.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use lumen::{BoundaryMode, Field, FieldConfig, IndexStamp, SourcePattern, StampShape};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SceneError;

// =============================================================================
// Operations
// =============================================================================

/// One authoring step applied to a freshly built field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneOp {
    /// Stamp the refractive index map
    Index(IndexStamp),
    /// Append forced sources
    Sources(SourcePattern),
    /// Seed displacement and velocity of one slot
    CellState {
        /// Column
        x: usize,
        /// Row
        y: usize,
        /// Channel
        #[serde(default)]
        channel: usize,
        /// Initial displacement
        displacement: f32,
        /// Initial velocity
        #[serde(default)]
        velocity: f32,
    },
    /// Drop every source added so far
    ClearSources,
}

impl SceneOp {
    /// Apply this operation to a field.
    ///
    /// # Errors
    /// Returns the field's error for an invalid operation.
    pub fn apply(&self, field: &mut Field) -> lumen::Result<()> {
        match *self {
            SceneOp::Index(ref stamp) => field.stamp_index(stamp).map(|_| ()),
            SceneOp::Sources(ref pattern) => field.add_pattern(pattern).map(|_| ()),
            SceneOp::CellState {
                x,
                y,
                channel,
                displacement,
                velocity,
            } => field.set_cell_state(x, y, channel, displacement, velocity),
            SceneOp::ClearSources => {
                field.clear_sources();
                Ok(())
            }
        }
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// A single oscillator in the middle of a 151x101 absorbing field
    PointSource,
    /// Two directional disks of opposite sign beside each other
    BeamPair,
    /// A plane wave entering a large low-index disk
    RefractionDisk,
    /// A plane wave through a triangular wedge on an RGB field
    Prism,
}

impl Preset {
    /// Every preset, in listing order.
    pub const ALL: [Preset; 4] = [
        Preset::PointSource,
        Preset::BeamPair,
        Preset::RefractionDisk,
        Preset::Prism,
    ];

    /// Command-line name of the preset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Preset::PointSource => "point-source",
            Preset::BeamPair => "beam-pair",
            Preset::RefractionDisk => "refraction-disk",
            Preset::Prism => "prism",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| SceneError::UnknownPreset(s.to_string()))
    }
}

/// Index of the prism glass.
const PRISM_INDEX: f32 = 0.6;

// =============================================================================
// Scene
// =============================================================================

/// A field configuration plus the operations that author it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Grid size, boundary and spectrum
    #[serde(default)]
    pub config: FieldConfig,
    /// Authoring operations, applied in order
    #[serde(default)]
    pub ops: Vec<SceneOp>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            ops: Vec::new(),
        }
    }

    /// Append an operation.
    #[must_use]
    pub fn with(mut self, op: SceneOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Append an operation in place.
    pub fn push(&mut self, op: SceneOp) {
        self.ops.push(op);
    }

    /// Build one of the built-in scenes.
    #[must_use]
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::PointSource => Scene::new(FieldConfig::default()).with(SceneOp::Sources(
                SourcePattern::point(76, 51, 0, 1.0, 10.0, 0.0),
            )),
            Preset::BeamPair => Scene::new(FieldConfig::default())
                .with(SceneOp::Sources(SourcePattern::circle(
                    86, 51, 5.0, 90.0, 10.0, 1.0, 10.0,
                )))
                .with(SceneOp::Sources(SourcePattern::circle(
                    66, 51, 5.0, 90.0, 10.0, -1.0, 10.0,
                ))),
            Preset::RefractionDisk => {
                Scene::new(FieldConfig::new(300, 300, BoundaryMode::Absorbing))
                    .with(SceneOp::Sources(SourcePattern::rect(
                        45, 46, 60, 70, 5.0, 1.0, 10.0,
                    )))
                    .with(SceneOp::Index(IndexStamp::set(
                        StampShape::circle(150, 150, 100.0),
                        0.4,
                    )))
            }
            Preset::Prism => Self::prism(),
        }
    }

    /// Wedge with its apex at (150, 30) and base on row 130, filled row by
    /// row and then bounded by its two slanted faces.
    fn prism() -> Self {
        let mut scene = Scene::new(FieldConfig::new(240, 160, BoundaryMode::Absorbing).rgb());
        for y in 30..=130 {
            let half = (y - 30) / 2;
            scene.push(SceneOp::Index(IndexStamp::set(
                StampShape::rect(150 - half, 150 + half, y, y),
                PRISM_INDEX,
            )));
        }
        for base_x in [100, 200] {
            scene.push(SceneOp::Index(IndexStamp::set(
                StampShape::line(150, base_x, 30, 130),
                PRISM_INDEX,
            )));
        }
        scene.push(SceneOp::Sources(SourcePattern::rect(
            20, 21, 70, 90, 5.0, 1.0, 10.0,
        )));
        scene
    }

    /// Create the field and apply every operation.
    ///
    /// # Errors
    /// Returns the first configuration or operation error, naming the
    /// rejected parameter.
    pub fn build(&self) -> Result<Field, SceneError> {
        let mut field = Field::with_config(&self.config)?;
        for (position, op) in self.ops.iter().enumerate() {
            op.apply(&mut field).inspect_err(|err| {
                debug!(position, ?op, %err, "scene operation rejected");
            })?;
        }
        debug!(
            ops = self.ops.len(),
            sources = field.sources().len(),
            "built scene"
        );
        Ok(field)
    }

    /// Parse a scene from JSON text.
    ///
    /// # Errors
    /// Returns [`SceneError::Json`] for malformed documents.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the scene as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`SceneError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a scene file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| SceneError::io(path, err))?;
        let scene = Self::from_json(&text)?;
        debug!(path = %path.display(), ops = scene.ops.len(), "loaded scene");
        Ok(scene)
    }

    /// Write the scene as JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|err| SceneError::io(path, err))
    }
}

impl From<Preset> for Scene {
    fn from(preset: Preset) -> Self {
        Scene::preset(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen::FieldError;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
            assert_eq!(preset.to_string(), preset.name());
        }
        assert!(matches!(
            "laser".parse::<Preset>(),
            Err(SceneError::UnknownPreset(name)) if name == "laser"
        ));
    }

    #[test]
    fn test_point_source_preset() {
        let field = Scene::preset(Preset::PointSource).build().unwrap();
        assert_eq!((field.width(), field.height()), (151, 101));
        assert_eq!(field.boundary(), BoundaryMode::Absorbing);
        assert_eq!(field.sources().len(), 1);
        assert_eq!((field.sources()[0].x, field.sources()[0].y), (76, 51));
    }

    #[test]
    fn test_beam_pair_preset() {
        let field = Scene::preset(Preset::BeamPair).build().unwrap();
        // 81 lattice cells within radius 5, one disk per sign.
        assert_eq!(field.sources().len(), 2 * 81);
        assert!(field.sources()[..81].iter().all(|s| s.amplitude == 1.0));
        assert!(field.sources()[81..].iter().all(|s| s.amplitude == -1.0));
    }

    #[test]
    fn test_refraction_disk_preset() {
        let field = Scene::preset(Preset::RefractionDisk).build().unwrap();
        assert_eq!(field.sources().len(), 22);
        assert_eq!(field.index_at(150, 150), Some(0.4));
        assert_eq!(field.index_at(150, 49), Some(lumen::DEFAULT_INDEX));
    }

    #[test]
    fn test_prism_preset_is_rgb_wedge() {
        let field = Scene::preset(Preset::Prism).build().unwrap();
        assert_eq!(field.channels(), 3);
        assert_eq!(field.index_at(150, 30), Some(PRISM_INDEX));
        assert_eq!(field.index_at(150, 100), Some(PRISM_INDEX));
        assert_eq!(field.index_at(110, 40), Some(lumen::DEFAULT_INDEX));
        // Every rect source covers all three channels.
        assert_eq!(field.sources().len(), 2 * 21 * 3);
    }

    #[test]
    fn test_hand_written_document() {
        let text = r#"{
            "config": { "width": 40, "height": 30, "boundary": "reflecting" },
            "ops": [
                { "index": { "shape": { "circle": { "center": [20.0, 15.0], "radius": 5.0 } },
                             "value": 0.5 } },
                { "index": { "shape": { "rect": { "rect": {
                                 "x0": 0, "x1": 3, "y0": 0, "y1": 29 } } },
                             "op": "multiply", "value": 2.0 } },
                { "sources": { "point": { "x": 5, "y": 15,
                                          "amplitude": 1.0, "frequency": 10.0 } } },
                { "cell_state": { "x": 10, "y": 10, "displacement": 0.5 } }
            ]
        }"#;
        let scene = Scene::from_json(text).unwrap();
        assert_eq!(scene.ops.len(), 4);

        let field = scene.build().unwrap();
        assert_eq!(field.boundary(), BoundaryMode::Reflecting);
        assert_eq!(field.channels(), 1);
        assert_eq!(field.index_at(20, 15), Some(0.5));
        assert_eq!(field.index_at(1, 1), Some(2.0));
        assert_eq!(field.index_at(10, 1), Some(1.0));
        assert_eq!(field.sources().len(), 1);
        assert_eq!(field.displacement_at(10, 10, 0), Some(0.5));
        assert_eq!(field.velocity_at(10, 10, 0), Some(0.0));
    }

    #[test]
    fn test_reversed_rect_corners_match_the_api() {
        let text = r#"{
            "config": { "width": 20, "height": 20, "boundary": "none" },
            "ops": [
                { "index": { "shape": { "rect": { "rect": {
                                 "x0": 5, "x1": 1, "y0": 4, "y1": 2 } } },
                             "value": 0.5 } },
                { "sources": { "rect": { "rect": { "x0": 12, "x1": 10, "y0": 8, "y1": 6 },
                                         "k": 1.0, "amplitude": 1.0, "frequency": 10.0 } } }
            ]
        }"#;
        let field = Scene::from_json(text).unwrap().build().unwrap();

        let mut expected = Field::new(20, 20, BoundaryMode::None).unwrap();
        assert_eq!(expected.set_rect_index(5, 1, 2, 4, 0.5).unwrap(), 15);
        assert_eq!(expected.add_rect_sources(12, 10, 8, 6, 1.0, 1.0, 10.0).unwrap(), 9);

        assert_eq!(field.index_at(3, 3), Some(0.5));
        assert_eq!(field.index(), expected.index());
        assert_eq!(field.sources(), expected.sources());
    }

    #[test]
    fn test_json_round_trip_preserves_scene() {
        for preset in Preset::ALL {
            let scene = Scene::preset(preset);
            let parsed = Scene::from_json(&scene.to_json().unwrap()).unwrap();
            assert_eq!(parsed, scene, "{preset}");
        }
    }

    #[test]
    fn test_clear_sources_op() {
        let scene = Scene::preset(Preset::PointSource).with(SceneOp::ClearSources);
        assert!(scene.build().unwrap().sources().is_empty());
    }

    #[test]
    fn test_invalid_op_is_reported() {
        let scene = Scene::new(FieldConfig::new(10, 10, BoundaryMode::Absorbing)).with(
            SceneOp::Index(IndexStamp::set(StampShape::circle(5, 5, 2.0), -1.0)),
        );
        assert!(matches!(
            scene.build(),
            Err(SceneError::Field(FieldError::InvalidIndex(_)))
        ));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let scene = Scene::new(FieldConfig::new(2, 10, BoundaryMode::Absorbing));
        assert!(matches!(scene.build(), Err(SceneError::Field(_))));
    }

    #[test]
    fn test_unknown_boundary_string_is_rejected() {
        let text = r#"{ "config": { "width": 10, "height": 10, "boundary": "periodic" } }"#;
        assert!(matches!(Scene::from_json(text), Err(SceneError::Json(_))));
    }

    #[test]
    fn test_empty_document_is_default_scene() {
        let scene = Scene::from_json("{}").unwrap();
        assert_eq!(scene, Scene::default());
        let field = scene.build().unwrap();
        assert_eq!((field.width(), field.height()), (151, 101));
    }
}
