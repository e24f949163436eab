//! Body velocity estimation.
//!
//! The raw velocity is the finite difference of consecutive body positions.
//! It is noisy (frame-time jitter, teleports), so everything downstream uses
//! an exponentially smoothed estimate instead:
//!
//! ```text
//! v_raw      = (p − p_prev) / dt
//! v_smoothed = lerp(v_smoothed, v_raw, min(1, rate · dt))
//! ```
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use stride_motion::velocity::VelocityEstimator;
//!
//! let mut est = VelocityEstimator::new(Vec3::ZERO, 5.0);
//! est.update(Vec3::new(0.0, 0.0, 0.1), 0.1);
//! // raw = 1 m/s forward, blended with weight 0.5.
//! assert!((est.smoothed().z - 0.5).abs() < 1e-5);
//! ```

use glam::Vec3;

/// Exponentially smoothed finite-difference velocity estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityEstimator {
    /// Smoothing rate (1/s).  Larger values track the raw velocity faster.
    rate: f32,
    previous_position: Vec3,
    raw: Vec3,
    smoothed: Vec3,
}

impl VelocityEstimator {
    /// Start at rest at `position`.
    pub fn new(position: Vec3, rate: f32) -> Self {
        Self {
            rate: rate.max(0.0),
            previous_position: position,
            raw: Vec3::ZERO,
            smoothed: Vec3::ZERO,
        }
    }

    /// Resume from a previously captured state.
    pub fn restore(previous_position: Vec3, smoothed: Vec3, rate: f32) -> Self {
        Self {
            rate: rate.max(0.0),
            previous_position,
            raw: Vec3::ZERO,
            smoothed,
        }
    }

    /// Feed the body position of the current frame.
    ///
    /// Returns the updated smoothed velocity.  A non-positive `dt` leaves the
    /// estimator untouched.
    pub fn update(&mut self, position: Vec3, dt: f32) -> Vec3 {
        if dt <= 0.0 {
            return self.smoothed;
        }
        self.raw = (position - self.previous_position) / dt;
        let weight = (self.rate * dt).min(1.0);
        self.smoothed = self.smoothed.lerp(self.raw, weight);
        self.previous_position = position;
        self.smoothed
    }

    /// Velocity measured over the most recent frame only.
    pub fn raw(&self) -> Vec3 {
        self.raw
    }

    pub fn smoothed(&self) -> Vec3 {
        self.smoothed
    }

    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_rest() {
        let est = VelocityEstimator::new(Vec3::new(1.0, 2.0, 3.0), 5.0);
        assert_eq!(est.smoothed(), Vec3::ZERO);
        assert_eq!(est.raw(), Vec3::ZERO);
        assert_eq!(est.previous_position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn converges_to_constant_velocity() {
        let mut est = VelocityEstimator::new(Vec3::ZERO, 5.0);
        let dt = 1.0 / 60.0;
        let v = Vec3::new(2.0, 0.0, -1.0);
        let mut p = Vec3::ZERO;
        for _ in 0..600 {
            p += v * dt;
            est.update(p, dt);
        }
        assert!((est.smoothed() - v).length() < 1e-3, "smoothed = {:?}", est.smoothed());
        assert!((est.raw() - v).length() < 1e-2);
    }

    #[test]
    fn large_dt_saturates_weight() {
        let mut est = VelocityEstimator::new(Vec3::ZERO, 5.0);
        // rate * dt = 5 → weight clamped to 1 → smoothed jumps to raw.
        est.update(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!((est.smoothed().x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut est = VelocityEstimator::new(Vec3::ZERO, 5.0);
        est.update(Vec3::new(0.1, 0.0, 0.0), 0.1);
        let before = est;
        est.update(Vec3::new(50.0, 0.0, 0.0), 0.0);
        est.update(Vec3::new(50.0, 0.0, 0.0), -0.1);
        assert_eq!(est, before);
    }

    #[test]
    fn restore_resumes_identically() {
        let mut a = VelocityEstimator::new(Vec3::ZERO, 5.0);
        a.update(Vec3::new(0.0, 0.0, 0.2), 0.1);
        let mut b = VelocityEstimator::restore(a.previous_position(), a.smoothed(), 5.0);
        for i in 1..5 {
            let p = Vec3::new(0.0, 0.0, 0.2 + i as f32 * 0.15);
            assert_eq!(a.update(p, 0.1), b.update(p, 0.1));
        }
    }
}
