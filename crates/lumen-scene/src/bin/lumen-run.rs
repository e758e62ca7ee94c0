//! lumen-run - Headless driver for Lumen wave-field scenes.
//!
//! # Examples
//!
//! ```bash
//! # Run the refraction disk for 150 steps and dump every 5th frame
//! lumen-run --preset refraction-disk --steps 150 --frames out/ --frame-every 5
//!
//! # Run a scene file and keep the exposure image, final state and report
//! lumen-run --scene lens.json --steps 600 --frames out/ --frame-every 600 \
//!     --view energy --gain 0.01 --snapshot state.json --report report.json
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_scene::{Preset, RunOptions, Runner, Scene, View};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Step a wave-field scene headlessly, writing PNG frames and JSON results
#[derive(Parser, Debug)]
#[command(name = "lumen-run")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Built-in scene (point-source, beam-pair, refraction-disk, prism)
    #[arg(long, conflicts_with = "scene")]
    preset: Option<Preset>,

    /// Scene file (JSON)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Number of steps to run
    #[arg(short, long, default_value_t = 300)]
    steps: u64,

    /// Directory for PNG frames (no frames are written when omitted)
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Write a frame every N steps
    #[arg(long, default_value_t = 1)]
    frame_every: u64,

    /// Buffer to render (displacement, energy)
    #[arg(long, default_value = "displacement")]
    view: View,

    /// Brightness multiplier
    #[arg(long, default_value_t = 1.0)]
    gain: f32,

    /// Write the final field snapshot (JSON)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the run report (JSON)
    #[arg(long)]
    report: Option<PathBuf>,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn load_scene(cli: &Cli) -> Result<Scene> {
    match &cli.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("failed to load scene {}", path.display())),
        None => Ok(Scene::preset(cli.preset.unwrap_or(Preset::PointSource))),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let scene = load_scene(cli)?;
    let field = scene.build().context("scene rejected")?;
    info!(
        width = field.width(),
        height = field.height(),
        channels = field.channels(),
        boundary = %field.boundary(),
        sources = field.sources().len(),
        "field ready"
    );

    let options = RunOptions::new(cli.steps)
        .with_frame_every(cli.frame_every)
        .with_view(cli.view)
        .with_gain(cli.gain);
    let mut runner = Runner::new(field, options)?;

    let report = match &cli.frames {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create frame directory {}", dir.display()))?;
            runner.run(|step, frame| frame.save_png(dir.join(format!("frame_{step:06}.png"))))?
        }
        None => runner.run_silent(),
    };
    info!(
        steps = report.step_count,
        frames = report.frames,
        state_hash = %format_args!("{:016x}", report.state_hash),
        peak = report.stats.displacement.peak(),
        "run complete"
    );

    if let Some(path) = &cli.snapshot {
        let json = serde_json::to_string(&runner.field().snapshot())?;
        fs::write(path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), "wrote snapshot");
    }

    if let Some(path) = &cli.report {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
