//! [`ProceduralAnimator`] – the per-frame orchestrator.
//!
//! Each call to [`ProceduralAnimator::update`] runs one frame:
//!
//! 1. **Velocity** – the [`VelocityEstimator`] folds in the new body position.
//! 2. **Targets** – the [`FootTargetResolver`] recomputes every leg's target.
//! 3. **Legs** – each [`Leg`] advances its step state machine.
//! 4. **Average** – the average foot location is rebuilt from the legs'
//!    current and target positions.
//! 5. **Pelvis** – the [`PelvisController`] probes from the average and
//!    updates height, tilt and breathing.
//! 6. **Debug** – when enabled, the installed [`DebugSink`] sees the result.
//!
//! A frame whose delta is not positive is skipped entirely.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use stride_motion::BodyFrame;
//! use stride_probe::flat::FlatGround;
//! use stride_runtime::{FrameClock, ProceduralAnimator};
//! use stride_types::{AnimatorConfig, PelvisPose};
//!
//! let frame = BodyFrame::at(Vec3::new(0.0, 1.0, 0.0));
//! let feet = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
//! let mut animator = ProceduralAnimator::new(
//!     AnimatorConfig::default(),
//!     &frame,
//!     &feet,
//!     PelvisPose::new(Vec3::new(0.0, 1.6, 0.0), Default::default()),
//! )
//! .expect("default config is valid");
//!
//! let ground = FlatGround::new(0.0);
//! let mut clock = FrameClock::new();
//! let report = animator.update(&frame, &clock.advance(1.0 / 60.0), &ground);
//! assert_eq!(report.legs_grounded, 2);
//! ```

use glam::Vec3;
use serde::Serialize;
use stride_motion::{BodyFrame, KeyframeCurve, LiftCurve, VelocityEstimator};
use stride_probe::GroundProbe;
use stride_types::{AnimatorConfig, AnimatorSnapshot, PelvisPose, StrideError};
use tracing::{debug, trace};

use crate::clock::FrameClock;
use crate::debug::{
    DebugMarker, DebugSink, DebugView, LOCKED_MARKER_RADIUS, MarkerKind, TARGET_MARKER_RADIUS,
};
use crate::leg::{Leg, StepEvents, StepParams};
use crate::pelvis::{PelvisController, PelvisParams};
use crate::rig::PoseWriter;
use crate::target::FootTargetResolver;

// ─────────────────────────────────────────────────────────────────────────────
// Frame report
// ─────────────────────────────────────────────────────────────────────────────

/// Summary of one [`ProceduralAnimator::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    /// Index of the frame, counting only frames that advanced.
    pub frame: u64,
    pub steps_armed: usize,
    pub steps_started: usize,
    pub steps_completed: usize,
    /// Legs whose target probe found ground.
    pub legs_grounded: usize,
    pub pelvis_grounded: bool,
}

impl FrameReport {
    fn record(&mut self, events: &StepEvents) {
        if events.armed_at.is_some() {
            self.steps_armed += 1;
        }
        if events.started {
            self.steps_started += 1;
        }
        if events.completed {
            self.steps_completed += 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animator
// ─────────────────────────────────────────────────────────────────────────────

/// Procedural leg and pelvis animator for one character.
pub struct ProceduralAnimator {
    config: AnimatorConfig,
    params: StepParams,
    resolver: FootTargetResolver,
    legs: Vec<Leg>,
    events: Vec<StepEvents>,
    velocity: VelocityEstimator,
    pelvis: PelvisController,
    average_foot: Option<Vec3>,
    curve: Box<dyn LiftCurve + Send + Sync>,
    debug_sink: Option<Box<dyn DebugSink>>,
    frame_count: u64,
}

impl ProceduralAnimator {
    /// Build an animator from a validated configuration and the rig's
    /// starting pose.
    ///
    /// Each entry of `feet` becomes one leg, planted where it stands.  The
    /// rest offsets are captured relative to `frame` and never change.
    ///
    /// # Errors
    ///
    /// [`StrideError::InvalidConfig`] when `config` fails validation.
    pub fn new(
        config: AnimatorConfig,
        frame: &BodyFrame,
        feet: &[Vec3],
        pelvis: PelvisPose,
    ) -> Result<Self, StrideError> {
        config.validate()?;
        let curve = KeyframeCurve::from_keys(&config.lift_curve);
        let params = StepParams::from_config(&config, feet.len());
        let mut animator = Self {
            resolver: FootTargetResolver::from_config(&config),
            pelvis: PelvisController::new(PelvisParams::from_config(&config), pelvis),
            velocity: VelocityEstimator::new(frame.position, config.velocity_smoothing),
            params,
            config,
            legs: Vec::new(),
            events: Vec::new(),
            average_foot: None,
            curve: Box::new(curve),
            debug_sink: None,
            frame_count: 0,
        };
        animator.reset(frame, feet, pelvis);
        Ok(animator)
    }

    /// Replace the lift curve built from the configured keys.
    pub fn with_lift_curve(mut self, curve: impl LiftCurve + Send + Sync + 'static) -> Self {
        self.curve = Box::new(curve);
        self
    }

    /// Install the hook invoked after every frame while `config.debug` is set.
    pub fn set_debug_sink(&mut self, sink: Box<dyn DebugSink>) {
        self.debug_sink = Some(sink);
    }

    /// Discard all state and start over from a new pose.  The leg count may
    /// change.
    pub fn reset(&mut self, frame: &BodyFrame, feet: &[Vec3], pelvis: PelvisPose) {
        self.params = StepParams::from_config(&self.config, feet.len());
        self.legs = feet
            .iter()
            .enumerate()
            .map(|(i, &foot)| Leg::new(i, frame, foot, &self.params))
            .collect();
        self.events = vec![StepEvents::default(); feet.len()];
        self.velocity = VelocityEstimator::new(frame.position, self.config.velocity_smoothing);
        self.pelvis = PelvisController::new(PelvisParams::from_config(&self.config), pelvis);
        self.average_foot = average_foot_location(&self.legs, self.config.towards_target);
        self.frame_count = 0;
        debug!(legs = self.legs.len(), "animator reset");
    }

    /// Run one frame.  See the module documentation for the order of work.
    pub fn update(
        &mut self,
        frame: &BodyFrame,
        clock: &FrameClock,
        probe: &dyn GroundProbe,
    ) -> FrameReport {
        let dt = clock.delta;
        if dt <= 0.0 {
            return FrameReport {
                frame: self.frame_count,
                ..FrameReport::default()
            };
        }
        self.frame_count += 1;
        let mut report = FrameReport {
            frame: self.frame_count,
            ..FrameReport::default()
        };

        let velocity = self.velocity.update(frame.position, dt);

        for leg in &mut self.legs {
            let target = self.resolver.resolve(frame, leg.rest_offset(), velocity, probe);
            leg.set_target(target.position);
            if target.grounded {
                report.legs_grounded += 1;
            }
        }

        for (leg, events) in self.legs.iter_mut().zip(self.events.iter_mut()) {
            *events = leg.advance(dt, &self.params, self.curve.as_ref());
            report.record(events);
        }

        self.average_foot = average_foot_location(&self.legs, self.config.towards_target);
        report.pelvis_grounded =
            self.pelvis.update(frame, velocity, self.average_foot, probe, clock);

        if self.config.debug
            && let Some(sink) = self.debug_sink.as_mut()
        {
            let view = build_debug_view(self.frame_count, frame, velocity, self.average_foot, &self.legs);
            sink.draw(&view);
        }

        trace!(
            frame = report.frame,
            armed = report.steps_armed,
            started = report.steps_started,
            completed = report.steps_completed,
            grounded = report.legs_grounded,
            pelvis_grounded = report.pelvis_grounded,
            "animator frame"
        );
        report
    }

    /// Push the current foot positions and pelvis pose to the host.
    pub fn write_pose<W: PoseWriter + ?Sized>(&self, writer: &mut W) {
        for leg in &self.legs {
            writer.set_foot_position(leg.index(), leg.foot_position());
        }
        writer.set_pelvis_pose(self.pelvis.pose());
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Step events of each leg during the most recent frame.
    pub fn frame_events(&self) -> &[StepEvents] {
        &self.events
    }

    pub fn pelvis(&self) -> &PelvisController {
        &self.pelvis
    }

    pub fn pelvis_pose(&self) -> PelvisPose {
        self.pelvis.pose()
    }

    pub fn smoothed_velocity(&self) -> Vec3 {
        self.velocity.smoothed()
    }

    /// `None` for a rig without legs.
    pub fn average_foot_location(&self) -> Option<Vec3> {
        self.average_foot
    }

    /// Frames advanced since construction or the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ── Persistence ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> AnimatorSnapshot {
        AnimatorSnapshot {
            legs: self.legs.iter().map(Leg::snapshot).collect(),
            previous_body_position: self.velocity.previous_position(),
            smoothed_velocity: self.velocity.smoothed(),
            pelvis: self.pelvis.snapshot(),
        }
    }

    /// [`snapshot`](Self::snapshot) encoded as JSON.
    pub fn snapshot_json(&self) -> Result<String, StrideError> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| StrideError::Serialization(e.to_string()))
    }

    /// Decode a JSON snapshot and [`restore`](Self::restore) it.
    pub fn restore_json(&mut self, json: &str) -> Result<(), StrideError> {
        let snapshot: AnimatorSnapshot =
            serde_json::from_str(json).map_err(|e| StrideError::Serialization(e.to_string()))?;
        self.restore(&snapshot)
    }

    /// Resume from `snapshot`.  Rest offsets, configuration and the debug
    /// hook are kept.
    ///
    /// # Errors
    ///
    /// [`StrideError::LegCountMismatch`] when the snapshot was taken from a
    /// rig with a different number of legs.  The animator is left untouched.
    pub fn restore(&mut self, snapshot: &AnimatorSnapshot) -> Result<(), StrideError> {
        if snapshot.legs.len() != self.legs.len() {
            return Err(StrideError::LegCountMismatch {
                expected: self.legs.len(),
                actual: snapshot.legs.len(),
            });
        }
        for (leg, snap) in self.legs.iter_mut().zip(&snapshot.legs) {
            leg.restore(snap);
        }
        self.velocity = VelocityEstimator::restore(
            snapshot.previous_body_position,
            snapshot.smoothed_velocity,
            self.config.velocity_smoothing,
        );
        self.pelvis.restore(snapshot.pelvis);
        self.average_foot = average_foot_location(&self.legs, self.config.towards_target);
        self.events.iter_mut().for_each(|e| *e = StepEvents::default());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Mean of the feet, pulled toward the mean of the targets by
/// `towards_target`.
fn average_foot_location(legs: &[Leg], towards_target: f32) -> Option<Vec3> {
    if legs.is_empty() {
        return None;
    }
    let (feet, targets) = legs.iter().fold((Vec3::ZERO, Vec3::ZERO), |(f, t), leg| {
        (f + leg.foot_position(), t + leg.target_position())
    });
    Some(feet.lerp(targets, towards_target) / legs.len() as f32)
}

fn build_debug_view(
    frame_index: u64,
    frame: &BodyFrame,
    velocity: Vec3,
    average_foot: Option<Vec3>,
    legs: &[Leg],
) -> DebugView {
    let markers = legs
        .iter()
        .flat_map(|leg| {
            [
                DebugMarker {
                    leg: leg.index(),
                    kind: MarkerKind::Target,
                    position: leg.target_position(),
                    radius: TARGET_MARKER_RADIUS,
                },
                DebugMarker {
                    leg: leg.index(),
                    kind: MarkerKind::Locked,
                    position: leg.locked_position(),
                    radius: LOCKED_MARKER_RADIUS,
                },
            ]
        })
        .collect();
    DebugView {
        frame: frame_index,
        markers,
        body_position: frame.position,
        velocity,
        average_foot,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use glam::Quat;
    use stride_probe::SphereCast;
    use stride_probe::flat::FlatGround;
    use stride_probe::scene::NoGround;
    use stride_probe::sim::CountingProbe;
    use stride_types::{GroundHit, LegPhase};

    use crate::debug::RecordingDebugSink;
    use crate::rig::PoseBuffer;

    const DT: f32 = 1.0 / 60.0;

    fn quad_feet() -> Vec<Vec3> {
        vec![
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
        ]
    }

    fn pelvis_start() -> PelvisPose {
        PelvisPose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY)
    }

    fn animator(config: AnimatorConfig, feet: &[Vec3]) -> ProceduralAnimator {
        ProceduralAnimator::new(config, &BodyFrame::at(Vec3::Y), feet, pelvis_start())
            .expect("valid config")
    }

    /// Walk straight ahead at `speed` m/s for `frames` frames, calling `each`
    /// after every update.
    fn walk(
        animator: &mut ProceduralAnimator,
        clock: &mut FrameClock,
        body: &mut Vec3,
        speed: f32,
        frames: usize,
        probe: &dyn GroundProbe,
        mut each: impl FnMut(&ProceduralAnimator, &FrameReport),
    ) {
        for _ in 0..frames {
            *body += Vec3::Z * speed * DT;
            let report = animator.update(&BodyFrame::at(*body), &clock.advance(DT), probe);
            each(&*animator, &report);
        }
    }

    /// Misses with wide casts (the pelvis probe) and sees flat ground with
    /// narrow ones (the foot probes).
    struct NarrowOnly(FlatGround);

    impl GroundProbe for NarrowOnly {
        fn sphere_cast(&self, cast: &SphereCast) -> Option<GroundHit> {
            if cast.radius > 1.0 {
                None
            } else {
                self.0.sphere_cast(cast)
            }
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnimatorConfig { step_size: 0.0, ..AnimatorConfig::default() };
        let err = ProceduralAnimator::new(config, &BodyFrame::default(), &quad_feet(), pelvis_start())
            .err()
            .expect("step_size 0 must be rejected");
        assert!(matches!(err, StrideError::InvalidConfig { .. }));
    }

    #[test]
    fn new_plants_every_leg_with_phase_offsets() {
        let a = animator(AnimatorConfig::default(), &quad_feet());
        assert_eq!(a.legs().len(), 4);
        for (i, leg) in a.legs().iter().enumerate() {
            assert_eq!(leg.phase(), LegPhase::Planted { armed: false });
            assert_eq!(leg.locked_position(), quad_feet()[i]);
            assert_eq!(leg.target_position(), quad_feet()[i]);
            assert!((leg.timer() - i as f32 / 4.0).abs() < 1e-6);
        }
        assert_eq!(a.average_foot_location(), Some(Vec3::ZERO));
    }

    #[test]
    fn stationary_leg_on_flat_ground_never_arms() {
        let mut config = AnimatorConfig::default();
        config.foot_probe.center_blend = 0.0;
        let foot = Vec3::new(1.0, 0.0, 0.0);
        let mut a = animator(config, &[foot]);
        let ground = FlatGround::new(0.0);
        let mut clock = FrameClock::new();
        for _ in 0..600 {
            let report = a.update(&BodyFrame::at(Vec3::Y), &clock.advance(DT), &ground);
            assert_eq!(report.steps_armed, 0);
            assert_eq!(report.legs_grounded, 1);
            assert_eq!(a.legs()[0].phase(), LegPhase::Planted { armed: false });
            assert_eq!(a.legs()[0].foot_position(), foot);
        }
    }

    #[test]
    fn forward_walk_arms_every_leg_with_staggered_timers() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let ground = FlatGround::new(0.0);
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        let mut first_arm: Vec<Option<f32>> = vec![None; 4];
        let mut completions = 0;

        walk(&mut a, &mut clock, &mut body, 3.0, 600, &ground, |a, report| {
            assert_eq!(report.legs_grounded, 4);
            for (i, events) in a.frame_events().iter().enumerate() {
                if let Some(timer) = events.armed_at
                    && first_arm[i].is_none()
                {
                    first_arm[i] = Some(timer);
                }
                if events.completed {
                    completions += 1;
                    let leg = &a.legs()[i];
                    assert_eq!(leg.locked_position(), leg.target_position());
                    assert_eq!(leg.foot_position(), leg.target_position());
                }
            }
        });

        let timers: Vec<f32> = first_arm
            .iter()
            .map(|t| t.expect("every leg arms during a steady walk"))
            .collect();
        let params = StepParams::from_config(a.config(), 4);
        for (i, timer) in timers.iter().enumerate() {
            assert!((timer - (params.step_interval - params.stagger(i))).abs() < 1e-6);
        }
        for pair in timers.windows(2) {
            assert!(pair[0] > pair[1], "timers not distinct: {timers:?}");
        }
        assert!(completions >= 8, "only {completions} steps completed");
        assert!(a.smoothed_velocity().z > 2.9);
    }

    #[test]
    fn pelvis_holds_height_while_its_probe_misses() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let probe = NarrowOnly(FlatGround::new(0.0));
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        let start = a.pelvis().eased_position();
        walk(&mut a, &mut clock, &mut body, 1.0, 10, &probe, |a, report| {
            assert!(!report.pelvis_grounded);
            assert_eq!(a.pelvis().eased_position(), start);
        });
    }

    #[test]
    fn pelvis_follows_ground_under_feet() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let ground = FlatGround::new(0.0);
        let mut clock = FrameClock::new();
        for _ in 0..300 {
            a.update(&BodyFrame::at(Vec3::Y), &clock.advance(DT), &ground);
        }
        assert!((a.pelvis().eased_position().y - 1.6).abs() < 1e-3);
    }

    #[test]
    fn zero_legs_is_safe() {
        let mut a = animator(AnimatorConfig::default(), &[]);
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        walk(&mut a, &mut clock, &mut body, 2.0, 120, &FlatGround::new(0.0), |a, report| {
            assert_eq!(a.average_foot_location(), None);
            assert_eq!(report.legs_grounded, 0);
            assert!(!report.pelvis_grounded);
        });
        let mut buf = PoseBuffer::new();
        a.write_pose(&mut buf);
        assert!(buf.feet.is_empty());
        assert_eq!(buf.writes, 1);
    }

    #[test]
    fn paused_frames_change_nothing() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let ground = FlatGround::new(0.0);
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        walk(&mut a, &mut clock, &mut body, 3.0, 45, &ground, |_, _| {});

        let before = a.snapshot();
        let pose = a.pelvis_pose();
        let frames = a.frame_count();
        for delta in [0.0, -DT] {
            let far = BodyFrame::at(body + Vec3::new(10.0, 0.0, 10.0));
            let report = a.update(&far, &clock.advance(delta), &ground);
            assert_eq!(report, FrameReport { frame: frames, ..FrameReport::default() });
        }
        assert_eq!(a.snapshot(), before);
        assert_eq!(a.pelvis_pose(), pose);
        assert_eq!(a.frame_count(), frames);
    }

    #[test]
    fn each_frame_casts_once_per_leg_plus_pelvis() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let ground = CountingProbe::new(FlatGround::new(0.0));
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        for _ in 0..30 {
            body += Vec3::Z * 2.0 * DT;
            let report = a.update(&BodyFrame::at(body), &clock.advance(DT), &ground);
            assert_eq!(ground.casts(), 5);
            assert_eq!(ground.hits(), report.legs_grounded + usize::from(report.pelvis_grounded));
            ground.reset();
        }

        a.update(&BodyFrame::at(body), &clock.advance(0.0), &ground);
        assert_eq!(ground.casts(), 0);

        let mut legless = animator(AnimatorConfig::default(), &[]);
        legless.update(&BodyFrame::at(Vec3::Y), &clock.advance(DT), &ground);
        assert_eq!(ground.casts(), 0);
    }

    #[test]
    fn snapshot_roundtrip_resumes_identically() {
        let config = AnimatorConfig { step_jitter: 0.1, jitter_seed: 1234, ..AnimatorConfig::default() };
        let ground = FlatGround::new(0.0);
        let mut a = animator(config.clone(), &quad_feet());
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        walk(&mut a, &mut clock, &mut body, 2.5, 60, &ground, |_, _| {});

        let json = serde_json::to_string(&a.snapshot()).expect("serialise");
        let snapshot: AnimatorSnapshot = serde_json::from_str(&json).expect("deserialise");
        let mut b = animator(config, &quad_feet());
        b.restore(&snapshot).expect("same leg count");
        assert_eq!(b.snapshot(), a.snapshot());

        for _ in 0..120 {
            body += Vec3::Z * 2.5 * DT;
            let frame = BodyFrame::at(body);
            let now = clock.advance(DT);
            let ra = a.update(&frame, &now, &ground);
            let rb = b.update(&frame, &now, &ground);
            assert_eq!(ra.steps_completed, rb.steps_completed);
            assert_eq!(a.snapshot(), b.snapshot());
            assert_eq!(a.pelvis_pose(), b.pelvis_pose());
        }
    }

    #[test]
    fn restore_rejects_other_leg_counts() {
        let a = animator(AnimatorConfig::default(), &quad_feet());
        let mut b = animator(AnimatorConfig::default(), &quad_feet()[..2]);
        let before = b.snapshot();
        let err = b.restore(&a.snapshot()).unwrap_err();
        assert_eq!(err, StrideError::LegCountMismatch { expected: 2, actual: 4 });
        assert_eq!(b.snapshot(), before);
    }

    #[test]
    fn json_snapshot_helpers() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        walk(&mut a, &mut clock, &mut body, 3.0, 30, &FlatGround::new(0.0), |_, _| {});

        let json = a.snapshot_json().expect("encode");
        let mut b = animator(AnimatorConfig::default(), &quad_feet());
        b.restore_json(&json).expect("decode");
        assert_eq!(b.snapshot(), a.snapshot());

        let err = b.restore_json("{ not json").unwrap_err();
        assert!(matches!(err, StrideError::Serialization(_)));
    }

    #[test]
    fn reset_discards_progress() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let ground = FlatGround::new(0.0);
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        walk(&mut a, &mut clock, &mut body, 3.0, 120, &ground, |_, _| {});
        assert!(a.legs().iter().any(|l| l.steps_taken() > 0));

        let feet = &quad_feet()[..3];
        a.reset(&BodyFrame::at(Vec3::Y), feet, pelvis_start());
        assert_eq!(a.legs().len(), 3);
        assert_eq!(a.frame_count(), 0);
        assert_eq!(a.smoothed_velocity(), Vec3::ZERO);
        assert!(a.legs().iter().all(|l| l.steps_taken() == 0));
    }

    #[test]
    fn write_pose_pushes_every_foot_and_the_pelvis() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let mut clock = FrameClock::new();
        a.update(&BodyFrame::at(Vec3::Y), &clock.advance(DT), &FlatGround::new(0.0));
        let mut buf = PoseBuffer::new();
        a.write_pose(&mut buf);
        assert_eq!(buf.writes, 5);
        for leg in a.legs() {
            assert_eq!(buf.feet[leg.index()], leg.foot_position());
        }
        assert_eq!(buf.pelvis, a.pelvis_pose());
    }

    #[test]
    fn custom_lift_curve_is_used() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet()).with_lift_curve(|_t: f32| 0.0);
        let ground = FlatGround::new(0.0);
        let mut clock = FrameClock::new();
        let mut body = Vec3::Y;
        walk(&mut a, &mut clock, &mut body, 3.0, 240, &ground, |a, _| {
            for leg in a.legs() {
                assert!(leg.foot_position().y.abs() < 1e-4, "foot lifted: {:?}", leg.foot_position());
            }
        });
    }

    #[test]
    fn debug_sink_only_runs_when_enabled() {
        let ground = FlatGround::new(0.0);
        for enabled in [false, true] {
            let config = AnimatorConfig { debug: enabled, ..AnimatorConfig::default() };
            let mut a = animator(config, &quad_feet());
            let recorder = Arc::new(Mutex::new(RecordingDebugSink::default()));
            a.set_debug_sink(Box::new(Arc::clone(&recorder)));
            let mut clock = FrameClock::new();
            for _ in 0..3 {
                a.update(&BodyFrame::at(Vec3::Y), &clock.advance(DT), &ground);
            }
            let recorded = recorder.lock().unwrap();
            let views = &recorded.views;
            if enabled {
                assert_eq!(views.len(), 3);
                assert_eq!(views[2].frame, 3);
                assert_eq!(views[2].markers.len(), 8);
                assert_eq!(views[2].average_foot, a.average_foot_location());
            } else {
                assert!(views.is_empty());
            }
        }
    }

    #[test]
    fn missing_ground_targets_follow_prediction() {
        let mut a = animator(AnimatorConfig::default(), &quad_feet());
        let mut clock = FrameClock::new();
        let report = a.update(&BodyFrame::at(Vec3::Y), &clock.advance(DT), &NoGround);
        assert_eq!(report.legs_grounded, 0);
        for (leg, foot) in a.legs().iter().zip(quad_feet()) {
            assert!((leg.target_position() - foot).length() < 1e-5);
        }
    }
}
