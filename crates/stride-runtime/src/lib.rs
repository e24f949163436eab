//! `stride-runtime` – the procedural leg animator.
//!
//! Ties the ground probe and the kinematic helpers together into a per-frame
//! update that places feet, steps legs and poses the pelvis.
//!
//! # Modules
//!
//! - [`animator`] – [`ProceduralAnimator`][animator::ProceduralAnimator]:
//!   owns the legs, velocity estimator and pelvis controller and runs them in
//!   order every frame.  Supports snapshot/restore.
//! - [`leg`] – [`Leg`][leg::Leg]: the per-leg step state machine (arming,
//!   staggered timers, lift trajectory).
//! - [`target`] – [`FootTargetResolver`][target::FootTargetResolver]:
//!   velocity-led, ground-snapped foot targets.
//! - [`pelvis`] – [`PelvisController`][pelvis::PelvisController]: pelvis
//!   height, lean and breathing.
//! - [`clock`] – [`FrameClock`][clock::FrameClock]: frame delta and elapsed
//!   time.
//! - [`rig`] – [`PoseWriter`][rig::PoseWriter]: how poses reach the host.
//! - [`debug`] – [`DebugSink`][debug::DebugSink]: optional visualisation hook.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: subscriber
//!   setup with optional OTLP export.

pub mod animator;
pub mod clock;
pub mod debug;
pub mod leg;
pub mod pelvis;
pub mod rig;
pub mod target;
pub mod telemetry;

pub use animator::{FrameReport, ProceduralAnimator};
pub use clock::FrameClock;
pub use debug::{DebugSink, DebugView, RecordingDebugSink, TracingDebugSink};
pub use leg::{Leg, StepEvents, StepParams};
pub use pelvis::{PelvisController, PelvisParams};
pub use rig::{PoseBuffer, PoseWriter};
pub use target::{FootTarget, FootTargetResolver};
pub use telemetry::{TracerProviderGuard, init_tracing};
