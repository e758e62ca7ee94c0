//! Frame capture: field values to RGB8 pixels.
//!
//! Each slot maps to a byte with `min(255, 255 * |value| * gain)`. Mono
//! fields render gray, RGB fields map channels to red, green and blue. Cells
//! with an index below 1 get [`INDEX_TINT`] added so glass stays visible in
//! dark regions.
//!
//! Frames draw onto any `plotters` drawing area; [`Frame::save_png`] goes
//! through the bitmap backend.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use lumen::{Field, DEFAULT_INDEX};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Color added (saturating) to cells whose index is below 1.
pub const INDEX_TINT: [u8; 3] = [0, 24, 48];

/// Which buffer a frame shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Instantaneous displacement
    #[default]
    Displacement,
    /// Accumulated energy (exposure image)
    Energy,
}

impl View {
    /// Name used in scene files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            View::Displacement => "displacement",
            View::Energy => "energy",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "displacement" => Ok(View::Displacement),
            "energy" => Ok(View::Energy),
            other => Err(SceneError::UnknownView(other.to_string())),
        }
    }
}

/// An RGB8 image of a field, row-major, three bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    /// Render one buffer of a field.
    #[must_use]
    pub fn capture(field: &Field, view: View, gain: f32) -> Self {
        let grid = field.grid();
        let values = match view {
            View::Displacement => field.displacement(),
            View::Energy => field.energy(),
        };
        let channels = grid.channels();

        let mut pixels = Vec::with_capacity(grid.cell_count() * 3);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let mut rgb = if channels == 1 {
                    [brightness(values[grid.slot(x, y, 0)], gain); 3]
                } else {
                    std::array::from_fn(|c| brightness(values[grid.slot(x, y, c)], gain))
                };
                if field.index()[grid.cell(x, y)] < DEFAULT_INDEX {
                    for (component, tint) in rgb.iter_mut().zip(INDEX_TINT) {
                        *component = component.saturating_add(tint);
                    }
                }
                pixels.extend_from_slice(&rgb);
            }
        }

        Self {
            width: grid.width(),
            height: grid.height(),
            pixels,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGB8 bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color of one pixel.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y * self.width + x) * 3;
        Some([self.pixels[at], self.pixels[at + 1], self.pixels[at + 2]])
    }

    /// Paint the frame one pixel per cell, origin top left, then present
    /// the area.
    ///
    /// # Errors
    /// Returns the backend's error if drawing or presenting fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        for (i, rgb) in self.pixels.chunks_exact(3).enumerate() {
            // Grid edges fit in i32.
            let at = ((i % self.width) as i32, (i / self.width) as i32);
            area.draw_pixel(at, &RGBColor(rgb[0], rgb[1], rgb[2]))?;
        }
        area.present()
    }

    /// Write an image file; the extension picks the format (`.png`).
    ///
    /// # Errors
    /// Returns [`SceneError::Render`] if the frame cannot be encoded or
    /// written.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let render_err = |message: String| SceneError::Render {
            path: path.to_path_buf(),
            message,
        };
        let size = match (u32::try_from(self.width), u32::try_from(self.height)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => return Err(render_err("frame exceeds the bitmap size limit".to_string())),
        };
        let area = BitMapBackend::new(path, size).into_drawing_area();
        self.draw(&area).map_err(|err| render_err(err.to_string()))
    }
}

/// `min(255, 255 * |value| * gain)`; NaN maps to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn brightness(value: f32, gain: f32) -> u8 {
    // Float to int casts saturate.
    (255.0 * value.abs() * gain) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen::BoundaryMode;
    use proptest::prelude::*;

    #[test]
    fn test_brightness_mapping() {
        assert_eq!(brightness(0.0, 1.0), 0);
        assert_eq!(brightness(0.5, 1.0), 127);
        assert_eq!(brightness(-0.5, 1.0), 127);
        assert_eq!(brightness(1.0, 1.0), 255);
        assert_eq!(brightness(40.0, 1.0), 255);
        assert_eq!(brightness(0.25, 2.0), 127);
        assert_eq!(brightness(f32::NAN, 1.0), 0);
    }

    proptest! {
        #[test]
        fn brightness_is_even_and_monotone(
            a in 0.0f32..4.0,
            b in 0.0f32..4.0,
            gain in 0.0f32..3.0,
        ) {
            prop_assert_eq!(brightness(a, gain), brightness(-a, gain));
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(brightness(lo, gain) <= brightness(hi, gain));
        }
    }

    #[test]
    fn test_view_parsing() {
        assert_eq!("energy".parse::<View>().unwrap(), View::Energy);
        assert_eq!(View::default().to_string(), "displacement");
        assert!(matches!(
            "phase".parse::<View>(),
            Err(SceneError::UnknownView(_))
        ));
    }

    #[test]
    fn test_mono_capture_is_gray_with_tint() {
        let mut field = Field::new(5, 4, BoundaryMode::Absorbing).unwrap();
        field.set_cell_state(2, 1, 0, 0.5, 0.0).unwrap();
        field.set_cell_index(3, 2, 0.5).unwrap();

        let frame = Frame::capture(&field, View::Displacement, 1.0);
        assert_eq!((frame.width(), frame.height()), (5, 4));
        assert_eq!(frame.pixels().len(), 5 * 4 * 3);
        assert_eq!(frame.pixel(2, 1), Some([127, 127, 127]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.pixel(3, 2), Some(INDEX_TINT));
        assert_eq!(frame.pixel(5, 0), None);
    }

    #[test]
    fn test_rgb_capture_maps_channels() {
        let mut field = Field::rgb(4, 4, BoundaryMode::Reflecting).unwrap();
        field.set_cell_state(1, 1, 0, 1.0, 0.0).unwrap();
        field.set_cell_state(1, 1, 2, -0.5, 0.0).unwrap();

        let frame = Frame::capture(&field, View::Displacement, 1.0);
        assert_eq!(frame.pixel(1, 1), Some([255, 0, 127]));
    }

    #[test]
    fn test_energy_view_reads_energy() {
        let mut field = Field::new(6, 6, BoundaryMode::Absorbing).unwrap();
        field.add_point_source(3, 3, 0, 1.0, 10.0, 0.0).unwrap();
        let blank = Frame::capture(&field, View::Energy, 1.0);
        assert!(blank.pixels().iter().all(|&b| b == 0));

        field.step_n(4);
        let lit = Frame::capture(&field, View::Energy, 100.0);
        assert!(lit.pixels().iter().any(|&b| b > 0));
    }

    #[test]
    fn test_draw_fills_bitmap_buffer() {
        let mut field = Field::rgb(5, 3, BoundaryMode::Absorbing).unwrap();
        field.set_cell_state(1, 1, 0, 1.0, 0.0).unwrap();
        field.set_cell_state(3, 2, 1, -0.5, 0.0).unwrap();
        field.set_cell_index(4, 0, 0.5).unwrap();
        let frame = Frame::capture(&field, View::Displacement, 1.0);

        let mut buffer = vec![0u8; frame.pixels().len()];
        {
            let area = BitMapBackend::with_buffer(&mut buffer, (5, 3)).into_drawing_area();
            frame.draw(&area).unwrap();
        }
        assert_eq!(buffer, frame.pixels());
        // Center row, second column
        assert_eq!(&buffer[18..21], &[255, 0, 0]);
    }

    #[test]
    fn test_save_png_writes_image() {
        let mut field = Field::new(4, 4, BoundaryMode::Absorbing).unwrap();
        field.set_cell_state(1, 1, 0, 1.0, 0.0).unwrap();
        let frame = Frame::capture(&field, View::Displacement, 1.0);

        let path = std::env::temp_dir().join(format!("lumen-frame-{}.png", std::process::id()));
        frame.save_png(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
