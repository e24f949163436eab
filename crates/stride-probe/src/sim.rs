//! Simulated ground for headless runs and tests.
//!
//! [`SimGround`] builds a [`GroundScene`] pre-populated with analytic
//! surfaces, so the animator stack can run in CI and from the CLI without a
//! physics engine.  [`CountingProbe`] wraps any probe and records how many
//! casts were issued.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use stride_probe::{probe_ground, sim::SimGround};
//! use stride_types::LayerMask;
//!
//! let ground = SimGround::new().with_flat(0.0).build();
//! let hit = probe_ground(&ground, Vec3::Y * 5.0, 0.5, Vec3::NEG_Y, 10.0, LayerMask::ALL);
//! assert!(hit.is_some());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec2;
use stride_types::GroundHit;

use crate::flat::FlatGround;
use crate::heightfield::Heightfield;
use crate::scene::GroundScene;
use crate::{GroundProbe, SphereCast};

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for a simulated [`GroundScene`].
#[derive(Default)]
pub struct SimGround {
    surfaces: Vec<Box<dyn GroundProbe>>,
}

impl SimGround {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an infinite plane at `height`.
    pub fn with_flat(mut self, height: f32) -> Self {
        self.surfaces.push(Box::new(FlatGround::new(height)));
        self
    }

    /// Add a square patch of rolling hills centred on the origin.
    ///
    /// `half_extent` is the patch half-width in metres, `amplitude` the peak
    /// height and `wavelength` the distance between crests.
    pub fn with_hills(mut self, half_extent: f32, amplitude: f32, wavelength: f32) -> Self {
        let cell = 0.5;
        let samples = ((2.0 * half_extent / cell).ceil() as usize + 1).max(2);
        let k = std::f32::consts::TAU / wavelength.max(f32::EPSILON);
        let hills = Heightfield::from_fn(
            Vec2::splat(-half_extent),
            (samples, samples),
            Vec2::splat(cell),
            |x, z| amplitude * (x * k).sin() * (z * k).cos(),
        );
        if let Some(hf) = hills {
            self.surfaces.push(Box::new(hf));
        }
        self
    }

    /// Add an arbitrary surface.
    pub fn with_surface(mut self, surface: Box<dyn GroundProbe>) -> Self {
        self.surfaces.push(surface);
        self
    }

    /// Consume the builder and return the populated [`GroundScene`].
    pub fn build(self) -> GroundScene {
        let mut scene = GroundScene::new();
        for s in self.surfaces {
            scene.add_surface(s);
        }
        scene
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Instrumentation
// ────────────────────────────────────────────────────────────────────────────

/// Probe wrapper that counts every cast and how many of them hit.
pub struct CountingProbe<P> {
    inner: P,
    casts: AtomicUsize,
    hits: AtomicUsize,
}

impl<P: GroundProbe> CountingProbe<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            casts: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
        }
    }

    pub fn casts(&self) -> usize {
        self.casts.load(Ordering::Relaxed)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.casts.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
    }
}

impl<P: GroundProbe> GroundProbe for CountingProbe<P> {
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit> {
        self.casts.fetch_add(1, Ordering::Relaxed);
        let hit = self.inner.sphere_cast(cast);
        if hit.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe_ground;
    use crate::scene::NoGround;
    use glam::Vec3;
    use stride_types::LayerMask;

    #[test]
    fn flat_sim_ground_hits() {
        let ground = SimGround::new().with_flat(-0.5).build();
        let hit = probe_ground(&ground, Vec3::Y * 3.0, 0.5, Vec3::NEG_Y, 10.0, LayerMask::ALL).unwrap();
        assert!((hit.point.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn hills_stay_within_amplitude() {
        let ground = SimGround::new().with_hills(10.0, 0.75, 6.0).build();
        assert_eq!(ground.len(), 1);
        for i in 0..20 {
            let x = -9.0 + i as f32 * 0.9;
            let hit = probe_ground(&ground, Vec3::new(x, 5.0, 1.3), 0.2, Vec3::NEG_Y, 20.0, LayerMask::ALL)
                .expect("inside the patch");
            assert!(hit.point.y.abs() <= 0.75 + 1e-3, "y = {}", hit.point.y);
        }
    }

    #[test]
    fn hills_over_plane_report_the_higher_surface() {
        let ground = SimGround::new().with_flat(-10.0).with_hills(4.0, 0.5, 4.0).build();
        let inside = probe_ground(&ground, Vec3::new(1.0, 5.0, 0.0), 0.1, Vec3::NEG_Y, 30.0, LayerMask::ALL).unwrap();
        assert!(inside.point.y > -1.0);
        let outside = probe_ground(&ground, Vec3::new(8.0, 5.0, 0.0), 0.1, Vec3::NEG_Y, 30.0, LayerMask::ALL).unwrap();
        assert!((outside.point.y + 10.0).abs() < 1e-5);
    }

    #[test]
    fn counting_probe_tracks_casts_and_hits() {
        let probe = CountingProbe::new(SimGround::new().with_flat(0.0).build());
        probe_ground(&probe, Vec3::Y * 2.0, 0.1, Vec3::NEG_Y, 10.0, LayerMask::ALL);
        probe_ground(&probe, Vec3::Y * 2.0, 0.1, Vec3::Y, 10.0, LayerMask::ALL);
        assert_eq!(probe.casts(), 2);
        assert_eq!(probe.hits(), 1);

        probe.reset();
        assert_eq!(probe.casts(), 0);

        let void = CountingProbe::new(NoGround);
        probe_ground(&void, Vec3::ZERO, 0.1, Vec3::NEG_Y, 10.0, LayerMask::ALL);
        assert_eq!(void.casts(), 1);
        assert_eq!(void.hits(), 0);
    }
}
