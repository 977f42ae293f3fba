//! Canonical defaults shared by the snapshot model, targeting and settings.

use std::time::Duration;

/// Field of view assumed when the remote value reads as zero (degrees).
pub const DEFAULT_FOV: i32 = 90;
/// Reference field of view the angle-per-pixel ratio is expressed against.
pub const REFERENCE_FOV: f64 = 90.0;
/// Skeletal landmark targeted by default (head).
pub const DEFAULT_BONE_INDEX: usize = 8;
/// Default damping divisor applied to steering angles.
pub const DEFAULT_SMOOTHING: f32 = 3.0;
/// Default targeting cone half-angle in degrees.
pub const DEFAULT_AIM_FOV_DEGREES: f32 = 10.0;
/// Radians of view rotation produced by one pixel of pointer motion at the
/// reference field of view, until calibration measures a better value.
pub const DEFAULT_ANGLE_PER_PIXEL: f64 = 0.000_575_966_092_447_44;
/// Multiplier applied to the aim punch before it is folded into the aim.
pub const DEFAULT_RECOIL_SCALE: f32 = 2.0;
/// Number of skeletal bones each entity exposes.
pub const MAX_STUDIO_BONES: usize = 128;
/// Number of entity-list slots scanned each poll.
pub const DEFAULT_ENTITY_SLOTS: usize = 64;
/// Distance in bytes between consecutive entity-list slots.
pub const DEFAULT_ENTITY_STRIDE: u64 = 0x10;

/// Horizontal pointer displacements sampled during calibration.
pub const CALIBRATION_DISPLACEMENTS: [i32; 5] = [100, -200, 300, -400, 200];

/// Sleep between poller iterations.
pub const DEFAULT_POLL_SLEEP: Duration = Duration::from_millis(2);
/// Sleep between steering iterations.
pub const DEFAULT_STEERING_SLEEP: Duration = Duration::from_millis(2);
/// Wait after synthetic input so the game can consume it.
pub const DEFAULT_INPUT_SETTLE: Duration = Duration::from_millis(20);
/// Wait before each calibration sample.
pub const DEFAULT_CALIBRATION_SETTLE: Duration = Duration::from_millis(100);
