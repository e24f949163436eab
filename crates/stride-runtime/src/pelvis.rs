//! Pelvis pose controller.
//!
//! The pelvis rides above the feet rather than above the body root:
//!
//! - **Height** – a wide sphere cast straight down from above the average
//!   foot location finds the ground, and the pelvis eases toward
//!   `ground + pelvis_height`.  A miss freezes the height.
//! - **Tilt** – the body leans into its velocity, `tilt_amount` degrees per
//!   metre per second, about the axis implied by the direction of travel.
//! - **Breathing** – a small vertical sine offset layered on top of the eased
//!   position.  It is recomputed from elapsed time every frame and never fed
//!   back into the easing, so it cannot drift.

use glam::{EulerRot, Quat, Vec3};
use stride_motion::remap::lerp_clamped;
use stride_motion::BodyFrame;
use stride_probe::{probe_ground, GroundProbe};
use stride_types::{AnimatorConfig, LayerMask, PelvisPose, PelvisProbeShape};

use crate::clock::FrameClock;

/// Tuning values read from [`AnimatorConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PelvisParams {
    pub height: f32,
    pub movement_speed: f32,
    pub tilt_amount: f32,
    pub tilt_speed: f32,
    pub yaw_offset_deg: f32,
    pub breath_speed: f32,
    pub breath_movement: f32,
    pub probe: PelvisProbeShape,
    pub mask: LayerMask,
}

impl PelvisParams {
    pub fn from_config(config: &AnimatorConfig) -> Self {
        Self {
            height: config.pelvis_height,
            movement_speed: config.pelvis_movement_speed,
            tilt_amount: config.tilt_amount,
            tilt_speed: config.tilt_speed,
            yaw_offset_deg: config.yaw_offset_deg,
            breath_speed: config.breath_speed,
            breath_movement: config.breath_movement,
            probe: config.pelvis_probe,
            mask: config.ground_layer,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PelvisController {
    params: PelvisParams,
    eased_position: Vec3,
    rotation: Quat,
    breath_offset: Vec3,
}

impl PelvisController {
    pub fn new(params: PelvisParams, initial: PelvisPose) -> Self {
        Self {
            params,
            eased_position: initial.position,
            rotation: initial.rotation.normalize(),
            breath_offset: Vec3::ZERO,
        }
    }

    /// Advance one frame.  Returns whether the height probe found ground.
    ///
    /// `average_foot` is `None` for a rig without legs; the height then stays
    /// where it is while tilt and breathing still update.
    pub fn update(
        &mut self,
        frame: &BodyFrame,
        velocity: Vec3,
        average_foot: Option<Vec3>,
        probe: &dyn GroundProbe,
        clock: &FrameClock,
    ) -> bool {
        let dt = clock.delta;
        if dt <= 0.0 {
            return false;
        }

        let hit = average_foot.and_then(|avg| {
            probe_ground(
                probe,
                avg + Vec3::Y * self.params.probe.height,
                self.params.probe.radius,
                Vec3::NEG_Y,
                self.params.probe.max_distance,
                self.params.mask,
            )
        });
        if let Some(hit) = hit {
            let desired = hit.point + Vec3::Y * self.params.height;
            self.eased_position =
                lerp_clamped(self.eased_position, desired, dt * self.params.movement_speed);
        }

        let target = self.target_rotation(frame, velocity);
        let weight = (dt * self.params.tilt_speed).clamp(0.0, 1.0);
        self.rotation = self.rotation.lerp(target, weight);

        self.breath_offset = Vec3::Y
            * (self.params.breath_movement * (clock.elapsed * self.params.breath_speed).sin());

        hit.is_some()
    }

    /// Orientation the pelvis is easing toward for this body frame and
    /// velocity.
    pub fn target_rotation(&self, frame: &BodyFrame, velocity: Vec3) -> Quat {
        let speed = velocity.length();
        let direction = velocity.normalize_or_zero();
        let lean = speed * self.params.tilt_amount;
        let pitch = frame.right().dot(direction) * lean;
        let roll = frame.forward().dot(direction) * lean;
        let yaw = frame.yaw_degrees() + self.params.yaw_offset_deg;
        Quat::from_euler(
            EulerRot::YXZ,
            yaw.to_radians(),
            pitch.to_radians(),
            roll.to_radians(),
        )
    }

    /// Pose the rig should display: eased position plus breathing.
    pub fn pose(&self) -> PelvisPose {
        PelvisPose::new(self.eased_position + self.breath_offset, self.rotation)
    }

    pub fn eased_position(&self) -> Vec3 {
        self.eased_position
    }

    pub fn breath_offset(&self) -> Vec3 {
        self.breath_offset
    }

    /// Breath-free pose, suitable for persisting.
    pub fn snapshot(&self) -> PelvisPose {
        PelvisPose::new(self.eased_position, self.rotation)
    }

    pub fn restore(&mut self, pose: PelvisPose) {
        self.eased_position = pose.position;
        self.rotation = pose.rotation;
        self.breath_offset = Vec3::ZERO;
    }
}
