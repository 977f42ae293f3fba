//! Numeric conversion helpers used across the project.
//!
//! Pointer displacements are integral while the angle math runs in
//! floating point. These helpers keep the conversions explicit and clamp
//! instead of wrapping.

/// Round to the nearest integer and clamp into the `i32` domain.
///
/// Non-finite inputs produce zero so a degenerate ratio never turns into a
/// huge pointer jump.
///
/// # Examples
/// ```
/// use sightline::numeric::round_to_i32;
/// assert_eq!(round_to_i32(2.5), 3);
/// assert_eq!(round_to_i32(-2.4), -2);
/// assert_eq!(round_to_i32(f64::NAN), 0);
/// assert_eq!(round_to_i32(1e12), i32::MAX);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn round_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let clamped = value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    clamped as i32
}

/// Widen a slot index into a remote address offset.
#[must_use]
pub fn slot_offset(index: usize, stride: u64) -> u64 {
    u64::try_from(index)
        .unwrap_or(u64::MAX)
        .saturating_mul(stride)
}
