//! Direction and angle helpers on top of `glam`.
//!
//! World space is right-handed with `+Z` up. View angles follow the
//! pitch/yaw convention of the game: positive pitch looks down, positive
//! yaw turns counter-clockwise when seen from above.
use glam::Vec3;

/// World up axis.
pub const UP: Vec3 = Vec3::Z;

/// Returns the unit look direction for a pitch and yaw in radians.
///
/// # Examples
/// ```
/// use sightline::vector_math::direction_from_euler;
/// let forward = direction_from_euler(0.0, 0.0);
/// assert!((forward.x - 1.0).abs() < 1e-6);
///
/// let down = direction_from_euler(std::f32::consts::FRAC_PI_2, 0.0);
/// assert!((down.z + 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn direction_from_euler(pitch: f32, yaw: f32) -> Vec3 {
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, -sin_pitch)
}

/// Returns the unsigned angle between two vectors in radians.
///
/// Returns `NaN` when either vector is zero or non-finite so callers can
/// reject the measurement instead of trusting a fabricated zero.
#[must_use]
pub fn angle_between(from: Vec3, to: Vec3) -> f32 {
    match (from.try_normalize(), to.try_normalize()) {
        (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos(),
        _ => f32::NAN,
    }
}

/// Returns the angle from `from` to `to` measured in the plane orthogonal
/// to `normal`, signed by the right-hand rule around `normal`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use sightline::vector_math::{signed_angle, UP};
/// let angle = signed_angle(Vec3::X, Vec3::Y, UP);
/// assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// assert!((signed_angle(Vec3::Y, Vec3::X, UP) + angle).abs() < 1e-6);
/// ```
#[must_use]
pub fn signed_angle(from: Vec3, to: Vec3, normal: Vec3) -> f32 {
    let Some(axis) = normal.try_normalize() else {
        return f32::NAN;
    };
    let from_planar = from.reject_from_normalized(axis);
    let to_planar = to.reject_from_normalized(axis);
    let angle = angle_between(from_planar, to_planar);
    if from_planar.cross(to_planar).dot(axis) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Drops the vertical component so only heading remains.
#[must_use]
pub const fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, direction.y, 0.0)
}
