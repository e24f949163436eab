//! `stride-types` – shared vocabulary of the stride workspace.
//!
//! Value types that cross crate boundaries: layer masks, probe hits, leg
//! phases, serialisable snapshots of animator state, the animator
//! configuration and the workspace-wide [`StrideError`].

pub mod config;

pub use config::{AnimatorConfig, CurveKey, FootProbeShape, PelvisProbeShape};

use glam::{Quat, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Layer mask
// ────────────────────────────────────────────────────────────────────────────

/// Bit set of collision layers a ground probe is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// No layer at all; probes with this mask always miss.
    pub const NONE: Self = Self(0);

    /// Mask with the single layer `index` set (`index` is taken modulo 32).
    pub fn layer(index: u32) -> Self {
        Self(1 << (index % 32))
    }

    /// `true` when every bit of `other` is also set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` when the two masks share at least one layer.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Probe result
// ────────────────────────────────────────────────────────────────────────────

/// A surface contact reported by a ground probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundHit {
    /// World-space contact point on the surface.
    pub point: Vec3,
    /// Surface normal at the contact point.
    pub normal: Vec3,
    /// Distance travelled along the cast direction before contact.
    pub distance: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Leg state
// ────────────────────────────────────────────────────────────────────────────

/// Discrete phase of a single leg.
///
/// A leg is always in exactly one of the two variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum LegPhase {
    /// The foot holds at its locked position.  `armed` is set once the target
    /// has drifted further than the step size and the leg waits for its timer.
    Planted { armed: bool },
    /// The foot travels from its locked position toward its target.
    Stepping { progress: f32 },
}

impl LegPhase {
    pub fn is_planted(&self) -> bool {
        matches!(self, LegPhase::Planted { .. })
    }

    pub fn is_stepping(&self) -> bool {
        matches!(self, LegPhase::Stepping { .. })
    }

    /// Normalised step progress; `0.0` while planted.
    pub fn progress(&self) -> f32 {
        match self {
            LegPhase::Stepping { progress } => *progress,
            LegPhase::Planted { .. } => 0.0,
        }
    }
}

impl Default for LegPhase {
    fn default() -> Self {
        LegPhase::Planted { armed: false }
    }
}

/// Serialisable capture of one leg's mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegSnapshot {
    pub locked_position: Vec3,
    pub target_position: Vec3,
    pub foot_position: Vec3,
    pub timer: f32,
    pub phase: LegPhase,
    pub steps_taken: u64,
}

/// World-space pelvis pose as written to the host rig.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PelvisPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl PelvisPose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for PelvisPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Serialisable capture of a whole animator: per-leg state, velocity
/// estimator memory and the eased pelvis pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorSnapshot {
    pub legs: Vec<LegSnapshot>,
    pub previous_body_position: Vec3,
    pub smoothed_velocity: Vec3,
    pub pelvis: PelvisPose,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Workspace-wide error type.
///
/// Frame updates never fail; errors only arise when building or restoring an
/// animator.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StrideError {
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Leg count mismatch: animator has {expected} legs, got {actual}")]
    LegCountMismatch { expected: usize, actual: usize },

    #[error("Serialization Error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_mask_contains_and_intersects() {
        let ground = LayerMask::layer(3);
        let props = LayerMask::layer(5);
        let both = ground.union(props);

        assert!(both.contains(ground));
        assert!(!ground.contains(both));
        assert!(both.intersects(props));
        assert!(!ground.intersects(props));
        assert!(LayerMask::ALL.contains(both));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    #[test]
    fn leg_phase_progress_is_zero_while_planted() {
        assert_eq!(LegPhase::Planted { armed: true }.progress(), 0.0);
        assert_eq!(LegPhase::Stepping { progress: 0.4 }.progress(), 0.4);
        assert!(LegPhase::default().is_planted());
        assert!(!LegPhase::default().is_stepping());
    }

    #[test]
    fn leg_snapshot_roundtrip() {
        let snap = LegSnapshot {
            locked_position: Vec3::new(1.0, 0.0, 2.0),
            target_position: Vec3::new(1.0, 0.0, 3.7),
            foot_position: Vec3::new(1.0, 0.8, 2.5),
            timer: 1.25,
            phase: LegPhase::Stepping { progress: 0.3 },
            steps_taken: 7,
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"stepping\""));
        let back: LegSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }

    #[test]
    fn stride_error_display() {
        let err = StrideError::InvalidConfig {
            field: "step_size".to_string(),
            reason: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("step_size"));

        let err2 = StrideError::LegCountMismatch { expected: 4, actual: 2 };
        assert!(err2.to_string().contains("4"));
        assert!(err2.to_string().contains("2"));
    }
}
