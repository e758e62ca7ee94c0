//! Headless runner: steps a field and captures frames on a fixed cadence.
//!
//! The runner replaces an interactive window loop. It calls
//! [`Field::step`] once per tick, renders a [`Frame`] every
//! `frame_every` ticks, and hands each frame to a caller-supplied sink
//! (typically a PNG writer). A finished run yields a [`RunReport`].

use lumen::{Field, FieldStats};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SceneError;
use crate::frame::{Frame, View};

fn default_frame_every() -> u64 {
    1
}

fn default_gain() -> f32 {
    1.0
}

/// How long to run and what to capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Ticks to advance
    pub steps: u64,
    /// Capture a frame after every this many ticks
    #[serde(default = "default_frame_every")]
    pub frame_every: u64,
    /// Buffer rendered into frames
    #[serde(default)]
    pub view: View,
    /// Brightness multiplier
    #[serde(default = "default_gain")]
    pub gain: f32,
}

impl RunOptions {
    /// Run `steps` ticks, capturing displacement every tick at unit gain.
    #[must_use]
    pub fn new(steps: u64) -> Self {
        Self {
            steps,
            frame_every: default_frame_every(),
            view: View::default(),
            gain: default_gain(),
        }
    }

    /// Set the capture cadence.
    #[must_use]
    pub fn with_frame_every(mut self, frame_every: u64) -> Self {
        self.frame_every = frame_every;
        self
    }

    /// Set the rendered buffer.
    #[must_use]
    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    /// Set the brightness multiplier.
    #[must_use]
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Check the cadence and gain.
    ///
    /// # Errors
    /// Returns [`SceneError::InvalidRunOption`] for a zero cadence or a
    /// negative or non-finite gain.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.frame_every == 0 {
            return Err(SceneError::InvalidRunOption {
                name: "frame_every",
                value: self.frame_every.to_string(),
            });
        }
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(SceneError::InvalidRunOption {
                name: "gain",
                value: self.gain.to_string(),
            });
        }
        Ok(())
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Ticks advanced by this run
    pub steps: u64,
    /// Field step counter at the end of the run
    pub step_count: u64,
    /// Frames handed to the sink
    pub frames: usize,
    /// Final [`Field::state_hash`]
    pub state_hash: u64,
    /// Final field statistics
    pub stats: FieldStats,
}

impl RunReport {
    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`SceneError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Drives one field through a run.
#[derive(Debug)]
pub struct Runner {
    field: Field,
    options: RunOptions,
}

impl Runner {
    /// Create a runner over an authored field.
    ///
    /// # Errors
    /// Returns an error if the options are invalid.
    pub fn new(field: Field, options: RunOptions) -> Result<Self, SceneError> {
        options.validate()?;
        Ok(Self { field, options })
    }

    /// The field being driven.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The run options.
    #[must_use]
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Take the field back.
    #[must_use]
    pub fn into_field(self) -> Field {
        self.field
    }

    /// Step through the run, passing each captured frame and the field's
    /// step count to `sink`.
    ///
    /// # Errors
    /// Stops at and returns the first error from `sink`.
    pub fn run<F>(&mut self, mut sink: F) -> Result<RunReport, SceneError>
    where
        F: FnMut(u64, &Frame) -> Result<(), SceneError>,
    {
        let RunOptions {
            steps,
            frame_every,
            view,
            gain,
        } = self.options;
        debug!(steps, frame_every, %view, gain, start = self.field.step_count(), "run started");

        let mut frames = 0;
        for tick in 1..=steps {
            self.field.step();
            if tick % frame_every == 0 {
                let frame = Frame::capture(&self.field, view, gain);
                trace!(step = self.field.step_count(), "captured frame");
                sink(self.field.step_count(), &frame)?;
                frames += 1;
            }
        }

        let report = self.report(frames);
        debug!(frames, state_hash = report.state_hash, "run finished");
        Ok(report)
    }

    /// Step through the run without rendering frames.
    pub fn run_silent(&mut self) -> RunReport {
        self.field.step_n(self.options.steps);
        let report = self.report(0);
        debug!(state_hash = report.state_hash, "run finished");
        report
    }

    fn report(&self, frames: usize) -> RunReport {
        RunReport {
            steps: self.options.steps,
            step_count: self.field.step_count(),
            frames,
            state_hash: self.field.state_hash(),
            stats: self.field.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen::BoundaryMode;

    fn driven_field() -> Field {
        let mut field = Field::new(20, 12, BoundaryMode::Absorbing).unwrap();
        field.add_point_source(10, 6, 0, 1.0, 10.0, 0.0).unwrap();
        field
    }

    #[test]
    fn test_options_validation() {
        assert!(RunOptions::new(10).validate().is_ok());
        assert!(matches!(
            RunOptions::new(10).with_frame_every(0).validate(),
            Err(SceneError::InvalidRunOption { name: "frame_every", .. })
        ));
        assert!(matches!(
            RunOptions::new(10).with_gain(f32::NAN).validate(),
            Err(SceneError::InvalidRunOption { name: "gain", .. })
        ));
        assert!(Runner::new(driven_field(), RunOptions::new(1).with_gain(-1.0)).is_err());
    }

    #[test]
    fn test_frame_cadence() {
        let options = RunOptions::new(10).with_frame_every(3);
        let mut runner = Runner::new(driven_field(), options).unwrap();
        let mut seen = Vec::new();
        let report = runner
            .run(|step, frame| {
                assert_eq!((frame.width(), frame.height()), (20, 12));
                seen.push(step);
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec![3, 6, 9]);
        assert_eq!(report.frames, 3);
        assert_eq!(report.steps, 10);
        assert_eq!(report.step_count, 10);
    }

    #[test]
    fn test_sink_error_stops_run() {
        let mut runner = Runner::new(driven_field(), RunOptions::new(10)).unwrap();
        let result = runner.run(|step, _| {
            if step == 4 {
                return Err(SceneError::InvalidRunOption {
                    name: "sink",
                    value: step.to_string(),
                });
            }
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(runner.field().step_count(), 4);
    }

    #[test]
    fn test_silent_run_matches_framed_run() {
        let mut framed = Runner::new(driven_field(), RunOptions::new(25)).unwrap();
        let mut silent = Runner::new(driven_field(), RunOptions::new(25)).unwrap();

        let a = framed.run(|_, _| Ok(())).unwrap();
        let b = silent.run_silent();

        assert_eq!(a.state_hash, b.state_hash);
        assert_eq!(a.stats, b.stats);
        assert_eq!((a.frames, b.frames), (25, 0));
    }

    #[test]
    fn test_report_json() {
        let mut runner = Runner::new(driven_field(), RunOptions::new(5)).unwrap();
        let report = runner.run_silent();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["steps"], 5);
        assert_eq!(value["stats"]["sources"], 1);
        assert_eq!(value["state_hash"], report.state_hash);

        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.state_hash, report.state_hash);
        assert_eq!(parsed.stats.step_count, 5);
        assert_eq!(parsed.frames, report.frames);
    }

    #[test]
    fn test_runner_continues_restored_field() {
        let mut field = driven_field();
        field.step_n(7);
        let mut runner = Runner::new(field, RunOptions::new(3)).unwrap();
        let mut steps = Vec::new();
        runner
            .run(|step, _| {
                steps.push(step);
                Ok(())
            })
            .unwrap();
        assert_eq!(steps, vec![8, 9, 10]);
        assert_eq!(runner.into_field().step_count(), 10);
    }
}
