//! # Lumen Python Bindings
//!
//! PyO3 bindings exposing Lumen wave fields to Python.
//!
//! ## Usage
//!
//! ```python
//! from lumen import Field
//!
//! field = Field(300, 300, boundary="absorbing")
//!
//! # A glass disk and a plane wave entering from the left
//! field.set_circle_index(150, 150, 100.0, 0.4)
//! field.add_rect_sources(45, 46, 60, 70, k=5.0, amplitude=1.0, frequency=10.0)
//!
//! field.step(150)
//! u = field.displacement()   # numpy array, shape (300, 300)
//! e = field.energy()         # exposure image
//! ```

use lumen::{BoundaryMode, FieldConfig, FieldError, FieldSnapshot, Spectrum};
use lumen_scene::{Preset, Scene, SceneError};
use numpy::{PyArrayDyn, PyArrayMethods, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn field_err(err: FieldError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn scene_err(err: SceneError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Wave field wrapper for Python.
///
/// Grids come back as numpy arrays of shape `(height, width)` for mono
/// fields and `(height, width, 3)` for RGB fields.
#[pyclass(name = "Field")]
pub struct PyField {
    inner: lumen::Field,
}

impl PyField {
    fn grid_array<'py>(
        &self,
        py: Python<'py>,
        values: &[f32],
        per_cell: usize,
    ) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        let mut shape = vec![self.inner.height(), self.inner.width()];
        if per_cell > 1 {
            shape.push(per_cell);
        }
        values.to_pyarray(py).reshape(shape)
    }
}

#[pymethods]
impl PyField {
    /// Create a field at rest with index 1 everywhere.
    ///
    /// `boundary` is one of "absorbing", "reflecting" or "none". With
    /// `rgb=True` the field carries three channels; `dispersion` overrides
    /// their stiffness offsets.
    #[new]
    #[pyo3(signature = (width=151, height=101, boundary="absorbing", rgb=false, dispersion=None))]
    fn new(
        width: usize,
        height: usize,
        boundary: &str,
        rgb: bool,
        dispersion: Option<[f32; 3]>,
    ) -> PyResult<Self> {
        let boundary: BoundaryMode = boundary.parse().map_err(field_err)?;
        let spectrum = match (rgb, dispersion) {
            (false, None) => Spectrum::Mono,
            (true, None) => Spectrum::rgb(),
            (_, Some(dispersion)) => Spectrum::Rgb { dispersion },
        };
        let config = FieldConfig::new(width, height, boundary).with_spectrum(spectrum);
        let inner = lumen::Field::with_config(&config).map_err(field_err)?;
        Ok(Self { inner })
    }

    /// Build a field from a scene document (JSON text).
    #[staticmethod]
    fn from_scene(text: &str) -> PyResult<Self> {
        let scene = Scene::from_json(text).map_err(scene_err)?;
        let inner = scene.build().map_err(scene_err)?;
        Ok(Self { inner })
    }

    /// Build one of the named presets ("point-source", "beam-pair",
    /// "refraction-disk", "prism").
    #[staticmethod]
    fn from_preset(name: &str) -> PyResult<Self> {
        let preset: Preset = name.parse().map_err(scene_err)?;
        let inner = Scene::preset(preset).build().map_err(scene_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn width(&self) -> usize {
        self.inner.width()
    }

    #[getter]
    fn height(&self) -> usize {
        self.inner.height()
    }

    #[getter]
    fn channels(&self) -> usize {
        self.inner.channels()
    }

    #[getter]
    fn step_count(&self) -> u64 {
        self.inner.step_count()
    }

    #[getter]
    fn boundary(&self) -> &'static str {
        self.inner.boundary().as_str()
    }

    #[getter]
    fn source_count(&self) -> usize {
        self.inner.sources().len()
    }

    // ------------------------------------------------------------------
    // Point reads
    // ------------------------------------------------------------------

    #[pyo3(signature = (x, y, channel=0))]
    fn displacement_at(&self, x: usize, y: usize, channel: usize) -> Option<f32> {
        self.inner.displacement_at(x, y, channel)
    }

    #[pyo3(signature = (x, y, channel=0))]
    fn velocity_at(&self, x: usize, y: usize, channel: usize) -> Option<f32> {
        self.inner.velocity_at(x, y, channel)
    }

    #[pyo3(signature = (x, y, channel=0))]
    fn energy_at(&self, x: usize, y: usize, channel: usize) -> Option<f32> {
        self.inner.energy_at(x, y, channel)
    }

    fn index_at(&self, x: usize, y: usize) -> Option<f32> {
        self.inner.index_at(x, y)
    }

    // ------------------------------------------------------------------
    // Grids
    // ------------------------------------------------------------------

    /// Displacement as a numpy array.
    fn displacement<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        self.grid_array(py, self.inner.displacement(), self.inner.channels())
    }

    /// Velocity as a numpy array.
    fn velocity<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        self.grid_array(py, self.inner.velocity(), self.inner.channels())
    }

    /// Accumulated energy as a numpy array.
    fn energy<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        self.grid_array(py, self.inner.energy(), self.inner.channels())
    }

    /// Refractive index as a `(height, width)` numpy array.
    fn index<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        self.grid_array(py, self.inner.index(), 1)
    }

    // ------------------------------------------------------------------
    // Authoring
    // ------------------------------------------------------------------

    #[pyo3(signature = (x, y, displacement, velocity=0.0, channel=0))]
    fn set_cell_state(
        &mut self,
        x: usize,
        y: usize,
        displacement: f32,
        velocity: f32,
        channel: usize,
    ) -> PyResult<()> {
        self.inner
            .set_cell_state(x, y, channel, displacement, velocity)
            .map_err(field_err)
    }

    fn set_cell_index(&mut self, x: usize, y: usize, value: f32) -> PyResult<()> {
        self.inner.set_cell_index(x, y, value).map_err(field_err)
    }

    /// Returns the number of cells written.
    fn set_rect_index(
        &mut self,
        x0: i32,
        x1: i32,
        y0: i32,
        y1: i32,
        value: f32,
    ) -> PyResult<usize> {
        self.inner
            .set_rect_index(x0, x1, y0, y1, value)
            .map_err(field_err)
    }

    fn set_circle_index(&mut self, cx: i32, cy: i32, radius: f32, value: f32) -> PyResult<usize> {
        self.inner
            .set_circle_index(cx, cy, radius, value)
            .map_err(field_err)
    }

    fn set_line_index(
        &mut self,
        x0: i32,
        x1: i32,
        y0: i32,
        y1: i32,
        value: f32,
    ) -> PyResult<usize> {
        self.inner
            .set_line_index(x0, x1, y0, y1, value)
            .map_err(field_err)
    }

    fn set_lens_index(
        &mut self,
        flat_x: i32,
        center_y: i32,
        radius: f32,
        thickness: f32,
    ) -> PyResult<usize> {
        self.inner
            .set_lens_index(flat_x, center_y, radius, thickness)
            .map_err(field_err)
    }

    #[pyo3(signature = (x, y, amplitude, frequency, phase=0.0, channel=0))]
    fn add_point_source(
        &mut self,
        x: i32,
        y: i32,
        amplitude: f32,
        frequency: f32,
        phase: f32,
        channel: usize,
    ) -> PyResult<()> {
        self.inner
            .add_point_source(x, y, channel, amplitude, frequency, phase)
            .map_err(field_err)
    }

    /// Returns the number of sources added.
    #[pyo3(signature = (cx, cy, radius, direction_deg, k, amplitude, frequency))]
    #[allow(clippy::too_many_arguments)]
    fn add_circle_sources(
        &mut self,
        cx: i32,
        cy: i32,
        radius: f32,
        direction_deg: f32,
        k: f32,
        amplitude: f32,
        frequency: f32,
    ) -> PyResult<usize> {
        self.inner
            .add_circle_sources(cx, cy, radius, direction_deg, k, amplitude, frequency)
            .map_err(field_err)
    }

    /// Returns the number of sources added.
    #[pyo3(signature = (x0, x1, y0, y1, k, amplitude, frequency))]
    #[allow(clippy::too_many_arguments)]
    fn add_rect_sources(
        &mut self,
        x0: i32,
        x1: i32,
        y0: i32,
        y1: i32,
        k: f32,
        amplitude: f32,
        frequency: f32,
    ) -> PyResult<usize> {
        self.inner
            .add_rect_sources(x0, x1, y0, y1, k, amplitude, frequency)
            .map_err(field_err)
    }

    fn clear_sources(&mut self) {
        self.inner.clear_sources();
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Advance by `steps` ticks.
    ///
    /// Releases the GIL during computation for better Python threading.
    #[pyo3(signature = (steps=1))]
    fn step(&mut self, py: Python, steps: u64) {
        py.allow_threads(|| {
            self.inner.step_n(steps);
        });
    }

    /// Zero displacement, velocity and energy; keep index and sources.
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn state_hash(&self) -> u64 {
        self.inner.state_hash()
    }

    /// Serialize the dynamic state, index and step count as JSON.
    fn snapshot_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.snapshot())
            .map_err(|err| PyValueError::new_err(err.to_string()))
    }

    /// Restore state produced by `snapshot_json`.
    fn restore_json(&mut self, text: &str) -> PyResult<()> {
        let snapshot: FieldSnapshot =
            serde_json::from_str(text).map_err(|err| PyValueError::new_err(err.to_string()))?;
        self.inner.restore(&snapshot).map_err(field_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "Field(width={}, height={}, channels={}, boundary='{}', step={})",
            self.inner.width(),
            self.inner.height(),
            self.inner.channels(),
            self.inner.boundary(),
            self.inner.step_count()
        )
    }
}

/// Python module definition.
#[pymodule]
fn _lumen(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyField>()?;
    m.add("TEMPORAL_SCALE", lumen::TEMPORAL_SCALE)?;
    m.add("LENS_INDEX", lumen::LENS_INDEX)?;
    Ok(())
}
