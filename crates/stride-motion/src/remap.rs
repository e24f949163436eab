//! Clamped linear remapping.

use glam::Vec3;

/// Clamp `value` to `[in_min, in_max]`, then map it linearly onto
/// `[out_min, out_max]`.
///
/// The result never leaves the output range, whatever the input.  Equal
/// input bounds are a caller error.
///
/// ```rust
/// use stride_motion::remap::remap_clamped;
///
/// assert_eq!(remap_clamped(5.0, 0.0, 10.0, 0.0, 1.0), 0.5);
/// assert_eq!(remap_clamped(99.0, 0.0, 10.0, 0.0, 1.0), 1.0);
/// ```
pub fn remap_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    debug_assert!(in_max != in_min, "remap input range must not be empty");
    let value = value.max(in_min).min(in_max);
    let mapped = (value - in_min) / (in_max - in_min) * (out_max - out_min) + out_min;
    // Rounding can push the mapped value a hair past the bound.
    let (lo, hi) = if out_min <= out_max { (out_min, out_max) } else { (out_max, out_min) };
    mapped.clamp(lo, hi)
}

/// [`remap_clamped`] applied to each axis with the same four bounds.
pub fn remap_clamped_vec3(value: Vec3, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Vec3 {
    Vec3::new(
        remap_clamped(value.x, in_min, in_max, out_min, out_max),
        remap_clamped(value.y, in_min, in_max, out_min, out_max),
        remap_clamped(value.z, in_min, in_max, out_min, out_max),
    )
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp_clamped(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}
