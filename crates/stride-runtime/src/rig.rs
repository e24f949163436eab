//! Output side of the animator: pushing poses into the host's scene graph.

use glam::Vec3;
use stride_types::PelvisPose;

/// Host transform service.
///
/// The animator never owns scene nodes; it writes the computed poses
/// through this trait once per frame.
pub trait PoseWriter {
    fn set_foot_position(&mut self, leg: usize, position: Vec3);
    fn set_pelvis_pose(&mut self, pose: PelvisPose);
}

/// In-memory [`PoseWriter`] used by the CLI and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseBuffer {
    pub feet: Vec<Vec3>,
    pub pelvis: PelvisPose,
    /// Number of writes received since creation.
    pub writes: usize,
}

impl PoseBuffer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoseWriter for PoseBuffer {
    fn set_foot_position(&mut self, leg: usize, position: Vec3) {
        if self.feet.len() <= leg {
            self.feet.resize(leg + 1, Vec3::ZERO);
        }
        self.feet[leg] = position;
        self.writes += 1;
    }

    fn set_pelvis_pose(&mut self, pose: PelvisPose) {
        self.pelvis = pose;
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn buffer_grows_to_fit_leg_index() {
        let mut buf = PoseBuffer::new();
        buf.set_foot_position(2, Vec3::X);
        assert_eq!(buf.feet, vec![Vec3::ZERO, Vec3::ZERO, Vec3::X]);
        buf.set_foot_position(0, Vec3::Y);
        assert_eq!(buf.feet[0], Vec3::Y);
        buf.set_pelvis_pose(PelvisPose::new(Vec3::Z, Quat::IDENTITY));
        assert_eq!(buf.pelvis.position, Vec3::Z);
        assert_eq!(buf.writes, 3);
    }
}
