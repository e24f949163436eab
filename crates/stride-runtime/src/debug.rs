//! Optional debug visualisation hook.
//!
//! When `AnimatorConfig::debug` is set, the animator builds a [`DebugView`]
//! after each frame and hands it to the installed [`DebugSink`].  A renderer
//! can draw the markers as spheres; [`TracingDebugSink`] logs them instead.

use glam::Vec3;
use tracing::trace;

/// Radius of the sphere drawn at a leg's target.
pub const TARGET_MARKER_RADIUS: f32 = 0.3;
/// Radius of the sphere drawn at a leg's locked position.
pub const LOCKED_MARKER_RADIUS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Target,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugMarker {
    pub leg: usize,
    pub kind: MarkerKind,
    pub position: Vec3,
    pub radius: f32,
}

/// Read-only picture of one animator frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugView {
    pub frame: u64,
    pub markers: Vec<DebugMarker>,
    pub body_position: Vec3,
    pub velocity: Vec3,
    pub average_foot: Option<Vec3>,
}

impl DebugView {
    /// Endpoints of the velocity line drawn from the body.
    pub fn velocity_line(&self) -> (Vec3, Vec3) {
        (self.body_position, self.body_position + self.velocity)
    }

    pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &DebugMarker> {
        self.markers.iter().filter(move |m| m.kind == kind)
    }
}

pub trait DebugSink: Send {
    fn draw(&mut self, view: &DebugView);
}

/// Emits each view as `trace!` events on the `stride::debug` target.
#[derive(Debug, Default)]
pub struct TracingDebugSink;

impl DebugSink for TracingDebugSink {
    fn draw(&mut self, view: &DebugView) {
        let (from, to) = view.velocity_line();
        trace!(target: "stride::debug", frame = view.frame, from = ?from, to = ?to, "velocity");
        for m in &view.markers {
            trace!(
                target: "stride::debug",
                frame = view.frame,
                leg = m.leg,
                kind = ?m.kind,
                position = ?m.position,
                radius = m.radius,
                "marker"
            );
        }
    }
}

/// Keeps every view it receives.  Useful in tests.
#[derive(Debug, Default)]
pub struct RecordingDebugSink {
    pub views: Vec<DebugView>,
}

impl DebugSink for RecordingDebugSink {
    fn draw(&mut self, view: &DebugView) {
        self.views.push(view.clone());
    }
}

impl<S: DebugSink + ?Sized> DebugSink for std::sync::Arc<std::sync::Mutex<S>> {
    fn draw(&mut self, view: &DebugView) {
        if let Ok(mut sink) = self.lock() {
            sink.draw(view);
        }
    }
}
