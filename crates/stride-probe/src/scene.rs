//! [`GroundScene`] – registry of ground surfaces.
//!
//! The scene owns every registered surface and answers a sphere cast with the
//! nearest hit among them.  Layer filtering is left to each surface, so a
//! scene can mix walkable terrain with props on other layers and the cast's
//! mask decides what the feet may land on.

use stride_types::GroundHit;

use crate::{GroundProbe, SphereCast};

/// A world without ground: every cast misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    fn sphere_cast(&self, _cast: &SphereCast) -> Option<GroundHit> {
        None
    }
}

/// Collection of surfaces probed together.
#[derive(Default)]
pub struct GroundScene {
    surfaces: Vec<Box<dyn GroundProbe>>,
}

impl GroundScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface.
    pub fn add_surface(&mut self, surface: Box<dyn GroundProbe>) {
        self.surfaces.push(surface);
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl GroundProbe for GroundScene {
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit> {
        self.surfaces
            .iter()
            .filter_map(|s| s.sphere_cast(cast))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
