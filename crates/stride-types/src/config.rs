//! Animator configuration surface.
//!
//! Every field carries a serde default so a partial TOML file (or an empty
//! one) yields a usable configuration.  Values are static once an animator
//! has been built from them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{LayerMask, StrideError};

/// A single key of an authored easing curve (Hermite tangents).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self { time, value, in_tangent, out_tangent }
    }
}

/// Shape of the downward cast used for pelvis ground-following.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PelvisProbeShape {
    /// Sphere radius of the cast.
    #[serde(default = "default_pelvis_probe_radius")]
    pub radius: f32,
    /// Height above the average foot location the cast starts from.
    #[serde(default = "default_probe_height")]
    pub height: f32,
    #[serde(default = "default_pelvis_probe_max_distance")]
    pub max_distance: f32,
}

impl Default for PelvisProbeShape {
    fn default() -> Self {
        Self {
            radius: default_pelvis_probe_radius(),
            height: default_probe_height(),
            max_distance: default_pelvis_probe_max_distance(),
        }
    }
}

/// Shape of the per-leg cast used for foot target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FootProbeShape {
    #[serde(default = "default_foot_probe_radius")]
    pub radius: f32,
    /// Height above the blended start point the cast begins at.
    #[serde(default = "default_probe_height")]
    pub height: f32,
    /// Depth below the predicted foot position the cast aims at.
    #[serde(default = "default_probe_height")]
    pub depth: f32,
    #[serde(default = "default_foot_probe_max_distance")]
    pub max_distance: f32,
    /// How far the cast origin is pulled from the predicted foot position
    /// toward the body centre (0 = over the foot, 1 = over the body).
    #[serde(default = "default_center_blend")]
    pub center_blend: f32,
}

impl Default for FootProbeShape {
    fn default() -> Self {
        Self {
            radius: default_foot_probe_radius(),
            height: default_probe_height(),
            depth: default_probe_height(),
            max_distance: default_foot_probe_max_distance(),
            center_blend: default_center_blend(),
        }
    }
}

/// Tunables of the procedural animator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnimatorConfig {
    /// Layers the ground probes may hit.
    #[serde(default)]
    pub ground_layer: LayerMask,

    /// Distance between locked and target position that arms a step.
    #[serde(default = "default_step_size")]
    pub step_size: f32,

    /// Timer threshold (seconds) at which an armed leg lifts.
    #[serde(default = "default_step_interval")]
    pub step_interval: f32,

    /// Step progress gained per second.
    #[serde(default = "default_step_speed")]
    pub step_speed: f32,

    /// Magnitude of the uniform noise added to the arming timer (seconds).
    /// Never larger than `step_interval`.
    #[serde(default)]
    pub step_jitter: f32,

    #[serde(default)]
    pub jitter_seed: u64,

    /// Lift height reached by a step of three step sizes or more.
    #[serde(default = "default_max_lift_height")]
    pub max_lift_height: f32,

    /// Keys of the vertical lift curve sampled over step progress.
    #[serde(default = "default_lift_curve")]
    pub lift_curve: Vec<CurveKey>,

    #[serde(default = "default_pelvis_height")]
    pub pelvis_height: f32,

    #[serde(default = "default_pelvis_movement_speed")]
    pub pelvis_movement_speed: f32,

    /// Weight of the target positions when averaging foot locations.
    #[serde(default = "default_towards_target")]
    pub towards_target: f32,

    /// Tilt in degrees per metre per second of body speed.
    #[serde(default = "default_tilt_amount")]
    pub tilt_amount: f32,

    #[serde(default = "default_tilt_speed")]
    pub tilt_speed: f32,

    /// Fixed yaw added to the body yaw when orienting the pelvis (degrees).
    #[serde(default = "default_yaw_offset_deg")]
    pub yaw_offset_deg: f32,

    #[serde(default = "default_breath_speed")]
    pub breath_speed: f32,

    #[serde(default = "default_breath_movement")]
    pub breath_movement: f32,

    /// Exponential smoothing rate of the body velocity estimate.
    #[serde(default = "default_velocity_smoothing")]
    pub velocity_smoothing: f32,

    #[serde(default)]
    pub pelvis_probe: PelvisProbeShape,

    #[serde(default)]
    pub foot_probe: FootProbeShape,

    /// Invoke the debug hook after every frame.
    #[serde(default)]
    pub debug: bool,
}

fn default_step_size() -> f32 {
    1.5
}
fn default_step_interval() -> f32 {
    1.5
}
fn default_step_speed() -> f32 {
    4.0
}
fn default_max_lift_height() -> f32 {
    5.0
}
fn default_lift_curve() -> Vec<CurveKey> {
    vec![
        CurveKey::new(0.0, 0.0, 0.0, 2.0),
        CurveKey::new(0.5, 1.0, 0.0, 0.0),
        CurveKey::new(1.0, 0.0, -2.0, 0.0),
    ]
}
fn default_pelvis_height() -> f32 {
    1.6
}
fn default_pelvis_movement_speed() -> f32 {
    8.0
}
fn default_towards_target() -> f32 {
    0.5
}
fn default_tilt_amount() -> f32 {
    20.0
}
fn default_tilt_speed() -> f32 {
    5.0
}
fn default_yaw_offset_deg() -> f32 {
    90.0
}
fn default_breath_speed() -> f32 {
    0.5
}
fn default_breath_movement() -> f32 {
    0.005
}
fn default_velocity_smoothing() -> f32 {
    5.0
}
fn default_pelvis_probe_radius() -> f32 {
    2.0
}
fn default_pelvis_probe_max_distance() -> f32 {
    100.0
}
fn default_probe_height() -> f32 {
    5.0
}
fn default_foot_probe_radius() -> f32 {
    0.5
}
fn default_foot_probe_max_distance() -> f32 {
    10.0
}
fn default_center_blend() -> f32 {
    0.5
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            ground_layer: LayerMask::default(),
            step_size: default_step_size(),
            step_interval: default_step_interval(),
            step_speed: default_step_speed(),
            step_jitter: 0.0,
            jitter_seed: 0,
            max_lift_height: default_max_lift_height(),
            lift_curve: default_lift_curve(),
            pelvis_height: default_pelvis_height(),
            pelvis_movement_speed: default_pelvis_movement_speed(),
            towards_target: default_towards_target(),
            tilt_amount: default_tilt_amount(),
            tilt_speed: default_tilt_speed(),
            yaw_offset_deg: default_yaw_offset_deg(),
            breath_speed: default_breath_speed(),
            breath_movement: default_breath_movement(),
            velocity_smoothing: default_velocity_smoothing(),
            pelvis_probe: PelvisProbeShape::default(),
            foot_probe: FootProbeShape::default(),
            debug: false,
        }
    }
}

impl AnimatorConfig {
    /// Check every tunable against its physical domain.
    ///
    /// # Errors
    ///
    /// Returns [`StrideError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), StrideError> {
        let scalars = [
            ("step_size", self.step_size),
            ("step_interval", self.step_interval),
            ("step_speed", self.step_speed),
            ("step_jitter", self.step_jitter),
            ("max_lift_height", self.max_lift_height),
            ("pelvis_height", self.pelvis_height),
            ("pelvis_movement_speed", self.pelvis_movement_speed),
            ("towards_target", self.towards_target),
            ("tilt_amount", self.tilt_amount),
            ("tilt_speed", self.tilt_speed),
            ("yaw_offset_deg", self.yaw_offset_deg),
            ("breath_speed", self.breath_speed),
            ("breath_movement", self.breath_movement),
            ("velocity_smoothing", self.velocity_smoothing),
            ("pelvis_probe.radius", self.pelvis_probe.radius),
            ("pelvis_probe.height", self.pelvis_probe.height),
            ("pelvis_probe.max_distance", self.pelvis_probe.max_distance),
            ("foot_probe.radius", self.foot_probe.radius),
            ("foot_probe.height", self.foot_probe.height),
            ("foot_probe.depth", self.foot_probe.depth),
            ("foot_probe.max_distance", self.foot_probe.max_distance),
            ("foot_probe.center_blend", self.foot_probe.center_blend),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(field, "must be a finite number"));
            }
        }

        for (field, value) in [
            ("step_size", self.step_size),
            ("step_interval", self.step_interval),
            ("step_speed", self.step_speed),
            ("pelvis_probe.max_distance", self.pelvis_probe.max_distance),
            ("foot_probe.max_distance", self.foot_probe.max_distance),
        ] {
            if value <= 0.0 {
                return Err(invalid(field, "must be positive"));
            }
        }

        for (field, value) in [
            ("step_jitter", self.step_jitter),
            ("max_lift_height", self.max_lift_height),
            ("velocity_smoothing", self.velocity_smoothing),
            ("pelvis_probe.radius", self.pelvis_probe.radius),
            ("foot_probe.radius", self.foot_probe.radius),
        ] {
            if value < 0.0 {
                return Err(invalid(field, "must not be negative"));
            }
        }

        for (field, value) in [
            ("towards_target", self.towards_target),
            ("foot_probe.center_blend", self.foot_probe.center_blend),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must lie in [0, 1]"));
            }
        }

        if self.step_jitter > self.step_interval {
            return Err(invalid("step_jitter", "must not exceed step_interval"));
        }

        if self.lift_curve.is_empty() {
            return Err(invalid("lift_curve", "needs at least one key"));
        }
        if self.lift_curve.iter().any(|k| {
            ![k.time, k.value, k.in_tangent, k.out_tangent]
                .iter()
                .all(|v| v.is_finite())
        }) {
            return Err(invalid("lift_curve", "keys must be finite"));
        }
        if self.lift_curve.windows(2).any(|w| w[1].time <= w[0].time) {
            return Err(invalid("lift_curve", "key times must strictly increase"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> StrideError {
    StrideError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
