//! Foot target resolution.
//!
//! Every frame each leg gets a fresh target, whatever its step phase:
//!
//! 1. the rest offset is carried along with the body frame;
//! 2. the result is pushed ahead by the smoothed velocity (clamped to one
//!    step size per axis) so feet land where the body is going;
//! 3. a sphere cast from above, leaning in from the body centre, finds the
//!    ground under that prediction.
//!
//! A miss leaves the target at the predicted point, so a leg walking off a
//! ledge keeps a sensible target instead of freezing.

use glam::Vec3;
use stride_motion::remap::{lerp_clamped, remap_clamped_vec3};
use stride_motion::BodyFrame;
use stride_probe::{probe_ground, GroundProbe};
use stride_types::{AnimatorConfig, FootProbeShape, LayerMask};

/// Predicted velocity lead saturates at this many step sizes per second.
const VELOCITY_RANGE_STEPS: f32 = 3.0;

/// Result of resolving one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootTarget {
    pub position: Vec3,
    /// `false` when the probe missed and `position` is the raw prediction.
    pub grounded: bool,
}

/// Computes per-leg targets from the body frame and velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootTargetResolver {
    step_size: f32,
    probe: FootProbeShape,
    mask: LayerMask,
}

impl FootTargetResolver {
    pub fn new(step_size: f32, probe: FootProbeShape, mask: LayerMask) -> Self {
        Self { step_size, probe, mask }
    }

    pub fn from_config(config: &AnimatorConfig) -> Self {
        Self::new(config.step_size, config.foot_probe, config.ground_layer)
    }

    /// Where the foot would land on flat ground: the rest position led by the
    /// clamped velocity.
    pub fn predict(&self, frame: &BodyFrame, rest_offset: Vec3, velocity: Vec3) -> Vec3 {
        let s = self.step_size;
        let range = VELOCITY_RANGE_STEPS * s;
        let lead = remap_clamped_vec3(velocity, -range, range, -s, s);
        frame.transform_point(rest_offset) + lead
    }

    /// Predict and then snap the prediction to the ground.
    pub fn resolve(
        &self,
        frame: &BodyFrame,
        rest_offset: Vec3,
        velocity: Vec3,
        probe: &dyn GroundProbe,
    ) -> FootTarget {
        let predicted = self.predict(frame, rest_offset, velocity);

        let origin = lerp_clamped(predicted, frame.position, self.probe.center_blend)
            + Vec3::Y * self.probe.height;
        let aim = predicted - Vec3::Y * self.probe.depth;

        match probe_ground(
            probe,
            origin,
            self.probe.radius,
            aim - origin,
            self.probe.max_distance,
            self.mask,
        ) {
            Some(hit) => FootTarget { position: hit.point, grounded: true },
            None => FootTarget { position: predicted, grounded: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_probe::flat::FlatGround;
    use stride_probe::scene::NoGround;

    fn resolver() -> FootTargetResolver {
        FootTargetResolver::from_config(&AnimatorConfig::default())
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn prediction_follows_the_body_at_rest() {
        let r = resolver();
        let frame = BodyFrame::from_yaw_degrees(Vec3::new(2.0, 1.0, 0.0), 90.0);
        let p = r.predict(&frame, Vec3::new(0.0, -1.0, 1.0), Vec3::ZERO);
        assert!(close(p, Vec3::new(3.0, 0.0, 0.0)), "p = {p:?}");
    }

    #[test]
    fn velocity_lead_is_clamped_to_one_step() {
        let r = resolver();
        let frame = BodyFrame::default();
        let slow = r.predict(&frame, Vec3::ZERO, Vec3::new(0.0, 0.0, 2.25));
        assert!(close(slow, Vec3::new(0.0, 0.0, 0.75)));
        let fast = r.predict(&frame, Vec3::ZERO, Vec3::new(-100.0, 0.0, 100.0));
        assert!(close(fast, Vec3::new(-1.5, 0.0, 1.5)));
    }

    #[test]
    fn straight_down_probe_lands_under_prediction() {
        let mut config = AnimatorConfig::default();
        config.foot_probe.center_blend = 0.0;
        let r = FootTargetResolver::from_config(&config);
        let frame = BodyFrame::at(Vec3::new(0.0, 1.0, 0.0));
        let t = r.resolve(&frame, Vec3::new(1.0, -1.0, 0.5), Vec3::ZERO, &FlatGround::new(0.25));
        assert!(t.grounded);
        assert!(close(t.position, Vec3::new(1.0, 0.25, 0.5)), "{:?}", t.position);
    }

    #[test]
    fn blended_probe_still_hits_the_ground_plane() {
        let r = resolver();
        let frame = BodyFrame::at(Vec3::new(0.0, 1.0, 0.0));
        let t = r.resolve(&frame, Vec3::new(1.0, -1.0, 0.0), Vec3::ZERO, &FlatGround::new(0.0));
        assert!(t.grounded);
        assert!(t.position.y.abs() < 1e-4);
        // The cast leans outward from the body centre toward the prediction.
        assert!(t.position.x > 0.0 && t.position.x < 1.5, "{:?}", t.position);
    }

    #[test]
    fn miss_falls_back_to_prediction() {
        let r = resolver();
        let frame = BodyFrame::at(Vec3::new(0.0, 1.0, 0.0));
        let rest = Vec3::new(1.0, -1.0, 0.0);
        let velocity = Vec3::new(0.0, 0.0, 1.5);
        let t = r.resolve(&frame, rest, velocity, &NoGround);
        assert!(!t.grounded);
        assert_eq!(t.position, r.predict(&frame, rest, velocity));
    }

    #[test]
    fn ground_outside_the_mask_is_ignored() {
        let mut config = AnimatorConfig::default();
        config.ground_layer = LayerMask::layer(3);
        let r = FootTargetResolver::from_config(&config);
        let t = r.resolve(&BodyFrame::at(Vec3::Y), Vec3::NEG_Y, Vec3::ZERO, &FlatGround::new(0.0));
        assert!(!t.grounded);
    }
}
