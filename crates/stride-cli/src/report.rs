//! Terminal and JSON-lines output of a simulated walk.

use colored::Colorize;
use glam::Vec3;
use serde::Serialize;
use stride_motion::BodyFrame;
use stride_runtime::{FrameReport, ProceduralAnimator};
use stride_types::{LegPhase, PelvisPose};

/// One line of `--json` output.
#[derive(Debug, Serialize)]
pub struct FrameLine {
    pub time: f32,
    pub body: Vec3,
    pub pelvis: PelvisPose,
    pub feet: Vec<Vec3>,
    pub phases: Vec<LegPhase>,
    #[serde(flatten)]
    pub report: FrameReport,
}

impl FrameLine {
    pub fn capture(time: f32, frame: &BodyFrame, animator: &ProceduralAnimator, report: FrameReport) -> Self {
        Self {
            time,
            body: frame.position,
            pelvis: animator.pelvis_pose(),
            feet: animator.legs().iter().map(|l| l.foot_position()).collect(),
            phases: animator.legs().iter().map(|l| l.phase()).collect(),
            report,
        }
    }
}

/// Running totals over a whole simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalkSummary {
    pub frames: u64,
    pub simulated_seconds: f32,
    pub steps_completed: usize,
    pub steps_per_leg: Vec<u64>,
    pub pelvis_misses: u64,
    pub target_misses: u64,
    pub pelvis_min_y: Option<f32>,
    pub pelvis_max_y: Option<f32>,
    pub distance_travelled: f32,
}

impl WalkSummary {
    pub fn record(&mut self, dt: f32, report: &FrameReport, animator: &ProceduralAnimator) {
        self.frames += 1;
        self.simulated_seconds += dt;
        self.steps_completed += report.steps_completed;
        self.target_misses += (animator.legs().len() - report.legs_grounded) as u64;
        if !report.pelvis_grounded {
            self.pelvis_misses += 1;
        }
        let y = animator.pelvis_pose().position.y;
        self.pelvis_min_y = Some(self.pelvis_min_y.map_or(y, |m| m.min(y)));
        self.pelvis_max_y = Some(self.pelvis_max_y.map_or(y, |m| m.max(y)));
        self.steps_per_leg = animator.legs().iter().map(|l| l.steps_taken()).collect();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal output
// ─────────────────────────────────────────────────────────────────────────────

pub fn print_banner() {
    println!();
    println!("{}", "  ┌─────────────────────────────┐".bold().cyan());
    println!("{}", "  │   stride · walk simulator   │".bold().cyan());
    println!("{}", "  └─────────────────────────────┘".bold().cyan());
    println!();
}

/// One compact line per frame with a step event.
pub fn print_frame(time: f32, report: &FrameReport, animator: &ProceduralAnimator) {
    if report.steps_armed + report.steps_started + report.steps_completed == 0 {
        return;
    }
    let legs: String = animator
        .legs()
        .iter()
        .map(|l| match l.phase() {
            LegPhase::Planted { armed: false } => "·".dimmed().to_string(),
            LegPhase::Planted { armed: true } => "!".yellow().to_string(),
            LegPhase::Stepping { .. } => "^".green().bold().to_string(),
        })
        .collect();
    let pelvis = animator.pelvis_pose().position;
    let ground = if report.pelvis_grounded { "grounded".green() } else { "no ground".red() };
    println!(
        "  {:>6}  {:>7.3}s  [{}]  armed {}  lifted {}  landed {}  pelvis y {:>6.3} ({})",
        report.frame.to_string().dimmed(),
        time,
        legs,
        report.steps_armed,
        report.steps_started,
        report.steps_completed,
        pelvis.y,
        ground,
    );
}

pub fn print_summary(summary: &WalkSummary) {
    println!();
    println!("  {}", "Summary".bold().underline());
    println!("    frames            {}", summary.frames);
    println!("    simulated         {:.2}s", summary.simulated_seconds);
    println!("    distance          {:.2} m", summary.distance_travelled);
    println!("    steps completed   {}", summary.steps_completed.to_string().green().bold());
    let per_leg: Vec<String> = summary.steps_per_leg.iter().map(u64::to_string).collect();
    println!("    steps per leg     [{}]", per_leg.join(", "));
    if let (Some(lo), Some(hi)) = (summary.pelvis_min_y, summary.pelvis_max_y) {
        println!("    pelvis height     {lo:.3} .. {hi:.3}");
    }
    let misses = |n: u64| if n == 0 { n.to_string().green() } else { n.to_string().yellow() };
    println!("    target misses     {}", misses(summary.target_misses));
    println!("    pelvis misses     {}", misses(summary.pelvis_misses));
    println!();
}
