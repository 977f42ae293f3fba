//! Settings validator for `sightline`.
//!
//! Loads a settings file, validates it and logs the parameters the loops
//! would run with. There is no process backend in this binary.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sightline::{init_logging, Settings, TargetAcquisition};

/// Validate a sightline settings file
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON settings file
    #[arg(short, long)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = Settings::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let acquisition = TargetAcquisition::new(settings.acquisition())
        .context("building target acquisition")?;

    let config = acquisition.config();
    info!(
        "aim cone {:.2} deg, bone {}, smoothing {}",
        config.fov_radians.to_degrees(),
        config.bone_index,
        config.smoothing
    );
    info!(
        "angle per pixel {}, {} entity slots, poll every {:?}, steer every {:?}",
        settings.calibration.angle_per_pixel,
        settings.entity_slots,
        settings.timing.poll_sleep(),
        settings.timing.steering_sleep()
    );
    info!(
        "calibrate with {:?}, yield to {:?}",
        settings.hotkeys.calibrate, settings.hotkeys.competing_feature
    );
    Ok(())
}
