//! Scripted body motion and rig layout for the headless simulation.

use glam::Vec3;
use stride_motion::BodyFrame;
use stride_probe::{GroundProbe, probe_ground};
use stride_types::LayerMask;

/// Height the body is carried above the ground it starts on.
pub const BODY_HEIGHT: f32 = 1.0;

/// Constant-speed, constant-turn body path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkPath {
    /// Metres per second along the current heading.
    pub speed: f32,
    /// Degrees per second about world up.
    pub turn_rate: f32,
    position: Vec3,
    yaw: f32,
}

impl WalkPath {
    pub fn new(start: Vec3, speed: f32, turn_rate: f32) -> Self {
        Self { speed, turn_rate, position: start, yaw: 0.0 }
    }

    pub fn frame(&self) -> BodyFrame {
        BodyFrame::from_yaw_degrees(self.position, self.yaw)
    }

    /// Move along the path for `dt` seconds and return the new frame.
    pub fn advance(&mut self, dt: f32) -> BodyFrame {
        if dt > 0.0 {
            self.yaw = (self.yaw + self.turn_rate * dt).rem_euclid(360.0);
            let forward = self.frame().forward();
            self.position += forward * self.speed * dt;
        }
        self.frame()
    }
}

/// Feet spread evenly on a ring of `radius` around `center`, starting at the
/// front right.  Each foot is dropped onto the ground below it when `probe`
/// finds any, otherwise it stays at `center.y - BODY_HEIGHT`.
pub fn ring_feet(legs: usize, radius: f32, center: Vec3, probe: &dyn GroundProbe) -> Vec<Vec3> {
    (0..legs)
        .map(|i| {
            let angle = std::f32::consts::TAU * (i as f32 + 0.5) / legs as f32;
            let xz = Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius);
            let above = center + xz + Vec3::Y * 10.0;
            probe_ground(probe, above, 0.0, Vec3::NEG_Y, 50.0, LayerMask::ALL)
                .map(|hit| hit.point)
                .unwrap_or(Vec3::new(above.x, center.y - BODY_HEIGHT, above.z))
        })
        .collect()
}
