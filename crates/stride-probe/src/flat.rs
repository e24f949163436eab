//! Infinite horizontal ground plane.

use glam::Vec3;
use stride_types::{GroundHit, LayerMask};

use crate::{GroundProbe, SphereCast};

/// The plane `y = height`, facing world up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
    pub layer: LayerMask,
}

impl FlatGround {
    /// A plane on layer 0.
    pub fn new(height: f32) -> Self {
        Self {
            height,
            layer: LayerMask::layer(0),
        }
    }

    pub fn on_layer(mut self, layer: LayerMask) -> Self {
        self.layer = layer;
        self
    }
}

impl GroundProbe for FlatGround {
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit> {
        if !cast.layer_mask.intersects(self.layer) {
            return None;
        }
        // Only downward travel can meet an upward-facing plane.
        let descent = -cast.direction.y;
        if descent <= 0.0 {
            return None;
        }
        // Surfaces already overlapping the sphere at the origin are ignored.
        let clearance = cast.origin.y - cast.radius - self.height;
        if clearance < 0.0 {
            return None;
        }
        let distance = clearance / descent;
        if distance > cast.max_distance {
            return None;
        }
        let center = cast.center_at(distance);
        Some(GroundHit {
            point: Vec3::new(center.x, self.height, center.z),
            normal: Vec3::Y,
            distance,
        })
    }
}
