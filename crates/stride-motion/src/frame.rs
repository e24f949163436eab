//! Body reference frame.
//!
//! A [`BodyFrame`] is the character root pose supplied by the host every
//! frame: a world position plus a unit quaternion.  The local axes follow the
//! usual game-engine convention of `+Y` up, `+Z` forward and `+X` right.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use stride_motion::frame::BodyFrame;
//!
//! // Facing +X after a quarter turn to the right.
//! let frame = BodyFrame::from_yaw_degrees(Vec3::new(1.0, 0.0, 0.0), 90.0);
//! let p = frame.transform_point(Vec3::new(0.0, 0.0, 2.0));
//! assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
//! ```

use glam::{EulerRot, Quat, Vec3};

/// World pose of the character body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    pub position: Vec3,
    pub rotation: Quat,
}

impl BodyFrame {
    /// Create a frame.  `rotation` is renormalised.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
        }
    }

    /// Frame at `position` with no rotation.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Frame at `position` turned `yaw` degrees about world up.
    pub fn from_yaw_degrees(position: Vec3, yaw: f32) -> Self {
        Self::new(position, Quat::from_rotation_y(yaw.to_radians()))
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Heading about world up in degrees, in `(-180, 180]`.
    pub fn yaw_degrees(&self) -> f32 {
        let (yaw, _, _) = self.rotation.to_euler(EulerRot::YXZ);
        yaw.to_degrees()
    }

    /// Map a body-local point into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Rotate a body-local direction into world space.
    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Express a world direction along the body's right/up/forward axes.
    pub fn inverse_transform_vector(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    /// Map a world point into body-local coordinates.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.inverse_transform_vector(world - self.position)
    }
}

impl Default for BodyFrame {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
