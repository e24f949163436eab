//! Per-leg step state machine.
//!
//! Each leg decides on its own when to lift, how to travel and when to lock
//! onto its new target.  Two independent rules produce the gait:
//!
//! 1. **Arming** – a planted leg whose target has drifted further than the
//!    step size is armed, and its timer is set close to the step interval
//!    minus a stagger that grows with the leg index.
//! 2. **Triggering** – an armed leg lifts once its timer reaches the step
//!    interval.
//!
//! Because the stagger offsets the timers, legs that arm on the same frame
//! still lift on different frames.  There is no cross-leg coordination.
//!
//! ```text
//!            distance > step_size            timer >= step_interval
//! Planted{armed: false} ───────────► Planted{armed: true} ───────────► Stepping{progress}
//!            ▲                                                              │
//!            └──────────────────────── progress >= 1 ───────────────────────┘
//! ```

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use stride_motion::remap::remap_clamped;
use stride_motion::{BodyFrame, LiftCurve};
use stride_types::{AnimatorConfig, LegPhase, LegSnapshot};
use tracing::debug;

/// Stagger spread across all legs, as a fraction of the step interval.
const STAGGER_FRACTION: f32 = 0.25;

/// Lift reaches `max_lift_height` for steps of this many step sizes.
const LIFT_DISTANCE_STEPS: f32 = 3.0;

// ────────────────────────────────────────────────────────────────────────────
// Parameters
// ────────────────────────────────────────────────────────────────────────────

/// The subset of [`AnimatorConfig`] a leg needs, plus the leg count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    pub step_size: f32,
    pub step_interval: f32,
    pub step_speed: f32,
    pub step_jitter: f32,
    pub jitter_seed: u64,
    pub max_lift_height: f32,
    pub leg_count: usize,
}

impl StepParams {
    pub fn from_config(config: &AnimatorConfig, leg_count: usize) -> Self {
        Self {
            step_size: config.step_size,
            step_interval: config.step_interval,
            step_speed: config.step_speed,
            step_jitter: config.step_jitter,
            jitter_seed: config.jitter_seed,
            max_lift_height: config.max_lift_height,
            leg_count,
        }
    }

    /// Timer value a leg restarts from after completing a step.
    pub fn phase_offset(&self, index: usize) -> f32 {
        if self.leg_count == 0 {
            return 0.0;
        }
        index as f32 / self.leg_count as f32
    }

    /// How much earlier than the step interval leg `index` is allowed to
    /// lift, spread over `[0, 0.25 × step_interval]`.
    pub fn stagger(&self, index: usize) -> f32 {
        if self.leg_count == 0 {
            return 0.0;
        }
        remap_clamped(
            index as f32,
            0.0,
            self.leg_count as f32,
            0.0,
            STAGGER_FRACTION * self.step_interval,
        )
    }

    /// Timer noise for the `steps_taken`-th arming of leg `index`.
    ///
    /// Deterministic in `(seed, index, steps_taken)` so a restored leg draws
    /// the same noise as the uninterrupted one.
    pub fn jitter(&self, index: usize, steps_taken: u64) -> f32 {
        if self.step_jitter <= 0.0 {
            return 0.0;
        }
        let seed = self.jitter_seed
            ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ steps_taken.rotate_left(32);
        SmallRng::seed_from_u64(seed).gen_range(-self.step_jitter..=self.step_jitter)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Events
// ────────────────────────────────────────────────────────────────────────────

/// What happened to a leg during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepEvents {
    /// Timer value assigned when the leg armed this frame.
    pub armed_at: Option<f32>,
    pub started: bool,
    pub completed: bool,
}

impl StepEvents {
    pub fn is_empty(&self) -> bool {
        self.armed_at.is_none() && !self.started && !self.completed
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Leg
// ────────────────────────────────────────────────────────────────────────────

/// One foot end-effector and its step state.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    index: usize,
    /// Rest position relative to the body, in body-local axes.
    rest_offset: Vec3,
    locked_position: Vec3,
    target_position: Vec3,
    foot_position: Vec3,
    timer: f32,
    phase: LegPhase,
    steps_taken: u64,
}

impl Leg {
    /// Plant leg `index` at `foot` and record its rest offset relative to
    /// `frame`.
    pub fn new(index: usize, frame: &BodyFrame, foot: Vec3, params: &StepParams) -> Self {
        Self {
            index,
            rest_offset: frame.inverse_transform_point(foot),
            locked_position: foot,
            target_position: foot,
            foot_position: foot,
            timer: params.phase_offset(index),
            phase: LegPhase::default(),
            steps_taken: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rest_offset(&self) -> Vec3 {
        self.rest_offset
    }

    pub fn locked_position(&self) -> Vec3 {
        self.locked_position
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    /// Where the foot should be displayed this frame.
    pub fn foot_position(&self) -> Vec3 {
        self.foot_position
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn phase(&self) -> LegPhase {
        self.phase
    }

    pub fn step_progress(&self) -> f32 {
        self.phase.progress()
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Replace the desired anchor.  Called every frame by the target
    /// resolver, whatever the phase.
    pub fn set_target(&mut self, target: Vec3) {
        self.target_position = target;
    }

    /// Advance the state machine by `dt` seconds.
    ///
    /// A non-positive `dt` changes nothing.
    pub fn advance(&mut self, dt: f32, params: &StepParams, curve: &dyn LiftCurve) -> StepEvents {
        let mut events = StepEvents::default();
        if dt <= 0.0 {
            return events;
        }

        if let LegPhase::Planted { mut armed } = self.phase {
            let distance = self.locked_position.distance(self.target_position);
            if !armed && distance > params.step_size {
                armed = true;
                self.timer = params.step_interval - params.stagger(self.index)
                    + params.jitter(self.index, self.steps_taken);
                events.armed_at = Some(self.timer);
                debug!(leg = self.index, distance, timer = self.timer, "leg armed");
            }

            if armed && self.timer >= params.step_interval {
                self.phase = LegPhase::Stepping { progress: 0.0 };
                events.started = true;
                debug!(leg = self.index, distance, "step started");
            } else {
                self.phase = LegPhase::Planted { armed };
                self.foot_position = self.locked_position;
            }
        }

        self.timer += dt;

        if let LegPhase::Stepping { progress } = self.phase {
            if progress >= 1.0 {
                self.complete(params);
                events.completed = true;
            } else {
                self.foot_position = self.trajectory(progress, params, curve);
                self.phase = LegPhase::Stepping {
                    progress: progress + dt * params.step_speed,
                };
            }
        }

        events
    }

    /// Foot position at `progress` along the current step: the straight line
    /// from locked to target, raised by the lift curve.  Longer remaining
    /// travel lifts higher, up to `max_lift_height`.
    fn trajectory(&self, progress: f32, params: &StepParams, curve: &dyn LiftCurve) -> Vec3 {
        let along = self.locked_position.lerp(self.target_position, progress);
        let remaining = along.distance(self.target_position);
        let height = remap_clamped(
            remaining,
            0.0,
            LIFT_DISTANCE_STEPS * params.step_size,
            0.0,
            params.max_lift_height,
        );
        along + Vec3::Y * (curve.evaluate(progress) * height)
    }

    fn complete(&mut self, params: &StepParams) {
        self.foot_position = self.target_position;
        self.locked_position = self.target_position;
        self.phase = LegPhase::Planted { armed: false };
        self.timer = params.phase_offset(self.index);
        self.steps_taken += 1;
        debug!(leg = self.index, steps = self.steps_taken, "step completed");
    }

    pub fn snapshot(&self) -> LegSnapshot {
        LegSnapshot {
            locked_position: self.locked_position,
            target_position: self.target_position,
            foot_position: self.foot_position,
            timer: self.timer,
            phase: self.phase,
            steps_taken: self.steps_taken,
        }
    }

    /// Overwrite the mutable state from `snapshot`.  The rest offset is kept.
    pub fn restore(&mut self, snapshot: &LegSnapshot) {
        self.locked_position = snapshot.locked_position;
        self.target_position = snapshot.target_position;
        self.foot_position = snapshot.foot_position;
        self.timer = snapshot.timer;
        self.phase = snapshot.phase;
        self.steps_taken = snapshot.steps_taken;
    }
}
