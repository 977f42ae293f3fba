//! Empirical pointer-to-angle calibration.
//!
//! Each pass moves the pointer horizontally by a known number of pixels and
//! measures how far the flattened look direction turned. Several passes of
//! alternating sign are averaged to damp frame jitter.

use std::thread;
use std::time::Duration;

use glam::Vec3;
use log::{debug, info};
use thiserror::Error;

use crate::constants::CALIBRATION_DISPLACEMENTS;
use crate::input::PointerInput;
use crate::vector_math::{angle_between, flatten};

/// Reasons a calibration run produced no usable ratio.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalibrationError {
    /// The look direction could not be sampled.
    #[error("viewer unavailable during calibration sample {sample}")]
    ViewerUnavailable {
        /// Zero-based pass that failed.
        sample: usize,
    },
    /// The averaged ratio is not a finite positive number.
    #[error("calibration produced an unusable angle per pixel: {ratio}")]
    UnusableRatio {
        /// The rejected ratio.
        ratio: f64,
    },
    /// No displacements were supplied.
    #[error("calibration needs at least one non-zero displacement")]
    NoDisplacements,
}

/// Runs the standard five-pass calibration.
///
/// `look` returns the viewer's current look direction, or `None` while it
/// is unavailable. The result is in radians per pixel at the reference
/// field of view.
///
/// # Errors
/// See [`CalibrationError`].
pub fn calibrate(
    look: impl FnMut() -> Option<Vec3>,
    pointer: &dyn PointerInput,
    settle: Duration,
) -> Result<f64, CalibrationError> {
    calibrate_over(&CALIBRATION_DISPLACEMENTS, look, pointer, settle)
}

/// Calibrates over an explicit list of horizontal displacements.
///
/// Zero displacements are skipped. Each pass waits `settle` before both of
/// its samples, so input still in flight has landed. The angular delta of
/// each pass is unsigned, so the result does not depend on the direction
/// of travel.
///
/// # Errors
/// See [`CalibrationError`].
pub fn calibrate_over(
    displacements: &[i32],
    mut look: impl FnMut() -> Option<Vec3>,
    pointer: &dyn PointerInput,
    settle: Duration,
) -> Result<f64, CalibrationError> {
    let mut sum = 0.0_f64;
    let mut passes = 0_u32;
    for (sample, &dx) in displacements.iter().enumerate() {
        if dx == 0 {
            continue;
        }
        let unavailable = CalibrationError::ViewerUnavailable { sample };
        thread::sleep(settle);
        let before = look().ok_or_else(|| unavailable.clone())?;
        pointer.move_pointer(dx, 0);
        thread::sleep(settle);
        let after = look().ok_or(unavailable)?;

        let delta = angle_between(flatten(before), flatten(after));
        let ratio = f64::from(delta) / f64::from(dx.unsigned_abs());
        debug!("calibration pass {sample}: {dx} px turned {delta} rad ({ratio} rad/px)");
        sum += ratio;
        passes += 1;
    }

    if passes == 0 {
        return Err(CalibrationError::NoDisplacements);
    }
    let ratio = sum / f64::from(passes);
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(CalibrationError::UnusableRatio { ratio });
    }
    info!("calibrated angle per pixel: {ratio}");
    Ok(ratio)
}
