//! `stride` – headless driver for the procedural leg animator.
//!
//! Walks a simulated body along a scripted path over simulated terrain and
//! reports what the legs and pelvis do:
//!
//! - `stride run` – simulate a walk (optionally paced in real time) and print
//!   step events and a summary, or JSON lines with `--json`.
//! - `stride init` – write the default configuration file.
//! - `stride schema` – print the configuration JSON schema.
//!
//! Ctrl-C stops a running simulation cleanly and still prints the summary.

mod config;
mod report;
mod walk;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use glam::{Quat, Vec3};
use stride_probe::GroundProbe;
use stride_probe::scene::GroundScene;
use stride_probe::sim::SimGround;
use stride_runtime::{FrameClock, PoseBuffer, ProceduralAnimator, TracingDebugSink, init_tracing};
use stride_types::{AnimatorConfig, PelvisPose};
use tracing::{info, warn};

use crate::report::{FrameLine, WalkSummary};
use crate::walk::{BODY_HEIGHT, WalkPath, ring_feet};

#[derive(Debug, Parser)]
#[command(name = "stride", version, about = "Procedural leg placement walk simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a walk and report step events.
    Run(RunArgs),
    /// Write the default configuration file.
    Init {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the JSON schema of the configuration file.
    Schema,
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Config file (defaults to $STRIDE_CONFIG or ~/.stride/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 600)]
    frames: u64,
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Body speed in metres per second.
    #[arg(long, default_value_t = 2.0)]
    speed: f32,
    /// Turn rate in degrees per second.
    #[arg(long, default_value_t = 0.0)]
    turn: f32,
    #[arg(long, default_value_t = 4)]
    legs: usize,
    /// Distance of each foot from the body centre.
    #[arg(long, default_value_t = 1.5)]
    leg_spread: f32,
    #[arg(long, value_enum, default_value_t = Terrain::Flat)]
    terrain: Terrain,
    /// Pace frames in wall-clock time instead of running flat out.
    #[arg(long)]
    realtime: bool,
    /// Emit one JSON object per frame instead of the coloured report.
    #[arg(long)]
    json: bool,
    /// Write the final animator state to this file as JSON.
    #[arg(long)]
    save_snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Terrain {
    Flat,
    Hills,
    /// No ground at all: every probe misses.
    Void,
}

impl Terrain {
    fn build(self) -> GroundScene {
        match self {
            Terrain::Flat => SimGround::new().with_flat(0.0).build(),
            Terrain::Hills => SimGround::new().with_hills(80.0, 0.8, 10.0).build(),
            Terrain::Void => GroundScene::new(),
        }
    }
}

fn main() -> Result<()> {
    let _guard = init_tracing("stride");
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Init { config, force } => init(config, force),
        Command::Schema => {
            let schema = schemars::schema_for!(AnimatorConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = config::config_path(path.as_deref());
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config::save_to(&AnimatorConfig::default(), &path)?;
    println!("  {} Config written to {}", "✓".green().bold(), path.display().to_string().bold());
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", args.fps);
    }
    let path = config::config_path(args.config.as_deref());
    let cfg = config::load_effective(&path)?;
    let debug = cfg.debug;

    let ground = args.terrain.build();
    // Ground height under the origin, or 0 over the void.
    let start_ground = ring_feet(1, 0.0, Vec3::new(0.0, BODY_HEIGHT, 0.0), &ground)
        .first()
        .map_or(0.0, |p| p.y);
    let mut path_walker =
        WalkPath::new(Vec3::new(0.0, start_ground + BODY_HEIGHT, 0.0), args.speed, args.turn);

    let frame = path_walker.frame();
    let feet = ring_feet(args.legs, args.leg_spread, frame.position, &ground);
    let pelvis = PelvisPose::new(frame.position + Vec3::Y * (cfg.pelvis_height - BODY_HEIGHT), Quat::IDENTITY);
    let mut animator = ProceduralAnimator::new(cfg, &frame, &feet, pelvis)
        .context("failed to build animator")?;
    if debug {
        animator.set_debug_sink(Box::new(TracingDebugSink));
    }

    info!(
        legs = args.legs,
        frames = args.frames,
        fps = args.fps,
        terrain = ?args.terrain,
        config = %path.display(),
        "starting walk"
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || shutdown_flag.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "failed to install Ctrl-C handler");
    }

    if !args.json {
        report::print_banner();
    }

    let sim = Simulation {
        args: &args,
        ground: &ground,
        shutdown: &shutdown,
    };
    let summary = if args.realtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("failed to start the runtime")?
            .block_on(sim.run_paced(&mut animator, &mut path_walker))?
    } else {
        sim.run_flat_out(&mut animator, &mut path_walker)?
    };

    if let Some(out) = &args.save_snapshot {
        let json = animator.snapshot_json()?;
        std::fs::write(out, json)
            .with_context(|| format!("failed to write snapshot to {}", out.display()))?;
        info!(path = %out.display(), "snapshot saved");
    }

    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        if shutdown.load(Ordering::SeqCst) {
            println!("{}", "  ⚠  interrupted".yellow().bold());
        }
        report::print_summary(&summary);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Simulation loop
// ─────────────────────────────────────────────────────────────────────────────

struct Simulation<'a> {
    args: &'a RunArgs,
    ground: &'a dyn GroundProbe,
    shutdown: &'a AtomicBool,
}

impl Simulation<'_> {
    fn dt(&self) -> f32 {
        1.0 / self.args.fps
    }

    fn run_flat_out(&self, animator: &mut ProceduralAnimator, walker: &mut WalkPath) -> Result<WalkSummary> {
        let mut state = LoopState::new(walker.frame().position);
        for _ in 0..self.args.frames {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            self.tick(animator, walker, &mut state)?;
        }
        Ok(state.summary)
    }

    async fn run_paced(&self, animator: &mut ProceduralAnimator, walker: &mut WalkPath) -> Result<WalkSummary> {
        let mut interval = tokio::time::interval(Duration::from_secs_f32(self.dt()));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut state = LoopState::new(walker.frame().position);
        for _ in 0..self.args.frames {
            interval.tick().await;
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            self.tick(animator, walker, &mut state)?;
        }
        Ok(state.summary)
    }

    fn tick(&self, animator: &mut ProceduralAnimator, walker: &mut WalkPath, state: &mut LoopState) -> Result<()> {
        let dt = self.dt();
        let frame = walker.advance(dt);
        let clock = state.clock.advance(dt);
        let frame_report = animator.update(&frame, &clock, self.ground);
        animator.write_pose(&mut state.pose);

        state.summary.record(dt, &frame_report, animator);
        state.summary.distance_travelled += frame.position.distance(state.last_body);
        state.last_body = frame.position;

        if self.args.json {
            let line = FrameLine::capture(clock.elapsed, &frame, animator, frame_report);
            println!("{}", serde_json::to_string(&line)?);
        } else {
            report::print_frame(clock.elapsed, &frame_report, animator);
        }
        Ok(())
    }
}

struct LoopState {
    clock: FrameClock,
    pose: PoseBuffer,
    summary: WalkSummary,
    last_body: Vec3,
}

impl LoopState {
    fn new(start: Vec3) -> Self {
        Self {
            clock: FrameClock::new(),
            pose: PoseBuffer::new(),
            summary: WalkSummary::default(),
            last_body: start,
        }
    }
}
