//! Mathematical helpers for rotation and vote quantization.

/// Computes sine and cosine for an angle in degrees.
pub(crate) fn sin_cos_deg(angle_deg: f64) -> (f64, f64) {
    angle_deg.to_radians().sin_cos()
}

/// Rounds to the nearest integer, halves away from zero.
///
/// Implemented as a sign-aware half step followed by truncation, matching the
/// quantization used for rotated model coordinates and orientation-bin
/// shifts. The half-step form can jitter by one near exact half boundaries
/// when the argument itself carries rounding error; callers tolerate a
/// one-bin slack for that reason.
#[inline]
pub(crate) fn round_half_away(v: f64) -> i32 {
    if v >= 0.0 {
        (v + 0.5) as i32
    } else {
        (v - 0.5) as i32
    }
}
