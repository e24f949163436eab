//! `stride-probe` – ground probing.
//!
//! The animator never talks to a physics engine directly.  It asks a
//! [`GroundProbe`] "where is the ground along this sphere cast", and the host
//! supplies the implementation.  Simulated backends live alongside the trait
//! so the whole stack runs headless in tests and from the CLI.
//!
//! # Modules
//!
//! - [`flat`] – [`FlatGround`][flat::FlatGround]: infinite horizontal plane.
//! - [`heightfield`] – [`Heightfield`][heightfield::Heightfield]: regular grid
//!   terrain with bilinear height sampling.
//! - [`scene`] – [`GroundScene`][scene::GroundScene]: registry of surfaces that
//!   reports the nearest hit, plus [`NoGround`][scene::NoGround].
//! - [`sim`] – [`SimGround`][sim::SimGround] builder and the
//!   [`CountingProbe`][sim::CountingProbe] instrumentation wrapper.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use stride_probe::{probe_ground, flat::FlatGround};
//! use stride_types::LayerMask;
//!
//! let ground = FlatGround::new(0.0);
//! let hit = probe_ground(&ground, Vec3::new(0.0, 5.0, 0.0), 0.5, Vec3::NEG_Y, 10.0, LayerMask::ALL)
//!     .expect("plane below the origin");
//! assert!(hit.point.y.abs() < 1e-5);
//! ```

pub mod flat;
pub mod heightfield;
pub mod scene;
pub mod sim;

use glam::Vec3;
use stride_types::{GroundHit, LayerMask};
use tracing::trace;

// ────────────────────────────────────────────────────────────────────────────
// Query
// ────────────────────────────────────────────────────────────────────────────

/// A sphere swept from `origin` along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCast {
    pub origin: Vec3,
    pub radius: f32,
    /// Unit direction of travel.
    pub direction: Vec3,
    pub max_distance: f32,
    pub layer_mask: LayerMask,
}

impl SphereCast {
    /// Centre of the swept sphere after travelling `distance`.
    pub fn center_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────────────────

/// The host's raycast service.
///
/// Implementations must be free of side effects visible to the animator: the
/// same cast against the same world returns the same answer, and a miss is a
/// normal outcome rather than an error.
pub trait GroundProbe: Send + Sync {
    /// Return the first surface the swept sphere touches within
    /// `cast.max_distance`, restricted to `cast.layer_mask`.
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit>;
}

impl<P: GroundProbe + ?Sized> GroundProbe for &P {
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit> {
        (**self).sphere_cast(cast)
    }
}

impl<P: GroundProbe + ?Sized> GroundProbe for Box<P> {
    fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit> {
        (**self).sphere_cast(cast)
    }
}

/// Build a [`SphereCast`] and run it against `probe`.
///
/// `direction` need not be normalised.  A zero-length direction, a
/// non-positive `max_distance` or an empty layer mask is a miss.
pub fn probe_ground(
    probe: &dyn GroundProbe,
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    layer_mask: LayerMask,
) -> Option<GroundHit> {
    let direction = direction.try_normalize()?;
    if max_distance <= 0.0 || layer_mask == LayerMask::NONE {
        return None;
    }
    let cast = SphereCast {
        origin,
        radius: radius.max(0.0),
        direction,
        max_distance,
        layer_mask,
    };
    let hit = probe.sphere_cast(&cast);
    if hit.is_none() {
        trace!(origin = ?origin, radius, max_distance, "ground probe missed");
    }
    hit
}
