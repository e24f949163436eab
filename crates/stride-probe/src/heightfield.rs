//! Regular-grid terrain.
//!
//! Heights are stored row-major (`x` fastest) over a rectangular footprint
//! starting at `origin` (world X/Z).  Sphere casts are resolved by marching
//! the sphere centre along the cast and bisecting the first interval in
//! which the sphere bottom drops below the surface.  Outside the footprint
//! there is no ground.

use glam::{Vec2, Vec3};
use stride_types::{GroundHit, LayerMask};

use crate::{GroundProbe, SphereCast};

const BISECTION_STEPS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    /// World X/Z of sample (0, 0).
    pub origin: Vec2,
    /// Sample counts along X and Z (each at least 2).
    pub dims: (usize, usize),
    /// World units between samples along X and Z.
    pub cell: Vec2,
    pub heights: Vec<f32>,
    pub layer: LayerMask,
}

impl Heightfield {
    /// Build a heightfield from raw samples.
    ///
    /// Returns `None` when the sample count does not match `dims`, when a
    /// dimension has fewer than two samples, or when a cell size is not
    /// positive.
    pub fn from_heights(origin: Vec2, dims: (usize, usize), cell: Vec2, heights: Vec<f32>) -> Option<Self> {
        if dims.0 < 2 || dims.1 < 2 || dims.0 * dims.1 != heights.len() {
            return None;
        }
        if cell.x <= 0.0 || cell.y <= 0.0 {
            return None;
        }
        Some(Self {
            origin,
            dims,
            cell,
            heights,
            layer: LayerMask::layer(0),
        })
    }

    /// Sample `f(x, z)` at every grid point.
    pub fn from_fn(origin: Vec2, dims: (usize, usize), cell: Vec2, f: impl Fn(f32, f32) -> f32) -> Option<Self> {
        let mut heights = Vec::with_capacity(dims.0 * dims.1);
        for iz in 0..dims.1 {
            for ix in 0..dims.0 {
                let x = origin.x + ix as f32 * cell.x;
                let z = origin.y + iz as f32 * cell.y;
                heights.push(f(x, z));
            }
        }
        Self::from_heights(origin, dims, cell, heights)
    }

    pub fn on_layer(mut self, layer: LayerMask) -> Self {
        self.layer = layer;
        self
    }

    fn extent(&self) -> Vec2 {
        Vec2::new(
            (self.dims.0 - 1) as f32 * self.cell.x,
            (self.dims.1 - 1) as f32 * self.cell.y,
        )
    }

    fn sample(&self, ix: usize, iz: usize) -> f32 {
        self.heights[ix + iz * self.dims.0]
    }

    /// Bilinear height at world `(x, z)`, or `None` outside the footprint.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let local = Vec2::new(x, z) - self.origin;
        let extent = self.extent();
        if local.x < 0.0 || local.y < 0.0 || local.x > extent.x || local.y > extent.y {
            return None;
        }
        let fx = local.x / self.cell.x;
        let fz = local.y / self.cell.y;
        let x0 = (fx.floor() as usize).min(self.dims.0 - 2);
        let z0 = (fz.floor() as usize).min(self.dims.1 - 2);
        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h00 = self.sample(x0, z0);
        let h10 = self.sample(x0 + 1, z0);
        let h01 = self.sample(x0, z0 + 1);
        let h11 = self.sample(x0 + 1, z0 + 1);
        let a = h00 * (1.0 - tx) + h10 * tx;
        let b = h01 * (1.0 - tx) + h11 * tx;
        Some(a * (1.0 - tz) + b * tz)
    }

    /// Central-difference surface normal at world `(x, z)`.
    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let ex = self.cell.x * 0.5;
        let ez = self.cell.y * 0.5;
        let h = |x: f32, z: f32, fallback: f32| self.height_at(x, z).unwrap_or(fallback);
        let centre = h(x, z, 0.0);
        let dx = h(x + ex, z, centre) - h(x - ex, z, centre);
        let dz = h(x, z + ez, centre) - h(x, z - ez, centre);
        Vec3::new(-dx / (2.0 * ex), 1.0, -dz / (2.0 * ez)).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Signed gap between the sphere bottom and the surface below the sphere
    /// centre; negative once the sphere has sunk into the terrain.
    fn gap(&self, cast: &SphereCast, distance: f32) -> Option<f32> {
        let c = cast.center_at(distance);
        self.height_at(c.x, c.z).map(|h| c.y - cast.radius - h)
    }
}

impl GroundProbe for Heightfield {
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit> {
        if !cast.layer_mask.intersects(self.layer) {
            return None;
        }
        let stride = (self.cell.x.min(self.cell.y) * 0.25).max(1e-3);
        let steps = (cast.max_distance / stride).ceil().max(1.0) as usize;

        let mut prev_t = 0.0;
        let mut prev_gap = self.gap(cast, 0.0);
        if matches!(prev_gap, Some(g) if g < 0.0) {
            return None;
        }

        for i in 1..=steps {
            let t = (i as f32 * stride).min(cast.max_distance);
            let gap = self.gap(cast, t);
            if let (Some(p), Some(g)) = (prev_gap, gap)
                && p > 0.0
                && g <= 0.0
            {
                let (mut lo, mut hi) = (prev_t, t);
                for _ in 0..BISECTION_STEPS {
                    let mid = 0.5 * (lo + hi);
                    match self.gap(cast, mid) {
                        Some(g) if g > 0.0 => lo = mid,
                        _ => hi = mid,
                    }
                }
                let c = cast.center_at(hi);
                let y = self.height_at(c.x, c.z)?;
                return Some(GroundHit {
                    point: Vec3::new(c.x, y, c.z),
                    normal: self.normal_at(c.x, c.z),
                    distance: hi,
                });
            }
            prev_t = t;
            prev_gap = gap;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(origin: Vec3) -> SphereCast {
        SphereCast {
            origin,
            radius: 0.25,
            direction: Vec3::NEG_Y,
            max_distance: 20.0,
            layer_mask: LayerMask::ALL,
        }
    }

    fn ramp() -> Heightfield {
        // Height rises 0.5 per metre along +X.
        Heightfield::from_fn(Vec2::new(-5.0, -5.0), (11, 11), Vec2::ONE, |x, _| 0.5 * x).unwrap()
    }

    #[test]
    fn rejects_mismatched_sample_count() {
        assert!(Heightfield::from_heights(Vec2::ZERO, (3, 3), Vec2::ONE, vec![0.0; 8]).is_none());
        assert!(Heightfield::from_heights(Vec2::ZERO, (1, 3), Vec2::ONE, vec![0.0; 3]).is_none());
        assert!(Heightfield::from_heights(Vec2::ZERO, (2, 2), Vec2::ZERO, vec![0.0; 4]).is_none());
    }

    #[test]
    fn bilinear_height_interpolates() {
        let hf = ramp();
        assert!((hf.height_at(1.5, 0.0).unwrap() - 0.75).abs() < 1e-5);
        assert!((hf.height_at(-5.0, -5.0).unwrap() + 2.5).abs() < 1e-5);
        assert!((hf.height_at(5.0, 5.0).unwrap() - 2.5).abs() < 1e-5);
        assert!(hf.height_at(5.1, 0.0).is_none());
    }

    #[test]
    fn downward_cast_finds_surface() {
        let hf = ramp();
        let hit = hf.sphere_cast(&down(Vec3::new(2.0, 10.0, 1.0))).unwrap();
        assert!((hit.point.y - 1.0).abs() < 1e-3, "y = {}", hit.point.y);
        assert!((hit.point.x - 2.0).abs() < 1e-5);
        assert!(hit.normal.x < 0.0, "ramp normal leans against the slope");
        assert!((hit.distance - 8.75).abs() < 1e-3);
    }

    #[test]
    fn cast_outside_footprint_misses() {
        let hf = ramp();
        assert!(hf.sphere_cast(&down(Vec3::new(9.0, 10.0, 0.0))).is_none());
    }

    #[test]
    fn cast_starting_underground_misses() {
        let hf = ramp();
        assert!(hf.sphere_cast(&down(Vec3::new(4.0, 1.0, 0.0))).is_none());
    }

    #[test]
    fn flat_field_normal_is_up() {
        let hf = Heightfield::from_heights(Vec2::ZERO, (3, 3), Vec2::ONE, vec![1.0; 9]).unwrap();
        let n = hf.normal_at(1.0, 1.0);
        assert!((n - Vec3::Y).length() < 1e-5);
    }
}
