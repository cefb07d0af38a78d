//! L4 Atomic Layer: Time and interpolation utilities for the carousel
//!
//! Pure functions for frame-rate normalization and blending between levels.

use std::time::Duration;

/// Convert an elapsed frame time into reference-frame units
///
/// # Arguments
/// * `elapsed` - Time since the previous frame
/// * `reference_frame_ms` - Frame length the physics constants assume
///
/// # Returns
/// Multiplier, 1.0 for exactly one reference frame
#[inline]
pub fn frame_multiplier(elapsed: Duration, reference_frame_ms: f64) -> f64 {
    if reference_frame_ms <= 0.0 {
        return 1.0;
    }
    elapsed.as_secs_f64() * 1000.0 / reference_frame_ms
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Bracketing integer levels and the fraction between them
///
/// # Returns
/// `(floor, ceil, fraction)` with `fraction` in [0, 1)
#[inline]
pub fn bracket(position: f64) -> (i32, i32, f64) {
    let floor = position.floor();
    let ceil = position.ceil();
    (floor as i32, ceil as i32, position - floor)
}

/// Level nearest to a continuous position (halves round away from zero)
#[inline]
pub fn nearest_level(position: f64) -> i32 {
    position.round() as i32
}
