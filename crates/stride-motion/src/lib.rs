//! `stride-motion` – kinematic building blocks.
//!
//! Pure math used by the animator runtime: nothing in this crate touches the
//! ground probe or keeps per-leg state.
//!
//! # Modules
//!
//! - [`remap`] – [`remap_clamped`][remap::remap_clamped] and friends: clamped
//!   linear remapping used for every velocity-driven blend.
//! - [`frame`] – [`BodyFrame`][frame::BodyFrame]: the body pose with its
//!   forward/right/up axes, yaw extraction and local↔world transforms.
//! - [`velocity`] – [`VelocityEstimator`][velocity::VelocityEstimator]:
//!   exponentially smoothed finite-difference body velocity.
//! - [`curve`] – [`LiftCurve`][curve::LiftCurve] and
//!   [`KeyframeCurve`][curve::KeyframeCurve]: evaluation of the foot lift
//!   curve.

pub mod curve;
pub mod frame;
pub mod remap;
pub mod velocity;

pub use curve::{KeyframeCurve, LiftCurve};
pub use frame::BodyFrame;
pub use remap::{lerp_clamped, remap_clamped, remap_clamped_vec3};
pub use velocity::VelocityEstimator;
