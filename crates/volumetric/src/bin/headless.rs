//! # Volumetric Headless Runner
//!
//! Runs the frame loop at the configured rate with no display attached.
//! Frames are presented to a counting sink; status goes to the log once
//! per second.
//!
//! ```bash
//! volumetric_headless --list
//! volumetric_headless --scene cafeWall --frames 600
//! RUST_LOG=volumetric=debug volumetric_headless --config volumetric.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;
use volumetric::scenes::SceneRegistry;
use volumetric::{AnimationClock, EngineConfig, FrameLoop, NullSink};

/// Interval between status log lines.
const STATUS_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "volumetric_headless", version, about = "Run the volumetric scene engine without a display")]
struct Args {
    /// Engine config file (TOML). Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene to start with, overriding the config.
    #[arg(short, long)]
    scene: Option<String>,

    /// Stop after this many frames. Runs until killed when omitted.
    #[arg(short, long)]
    frames: Option<u64>,

    /// List the available scenes and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let args = Args::parse();

    if args.list {
        let registry = SceneRegistry::builtin();
        for scene in registry.iter() {
            let marker = if scene.composites { " (compositing)" } else { "" };
            println!("  {:<20} {}{marker}", scene.id, scene.name);
        }
        return ExitCode::SUCCESS;
    }

    let mut config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, "cannot load config");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(scene) = args.scene {
        config.frame.initial_scene = scene;
    }

    let (mut frame_loop, _controls) = match FrameLoop::new(&config) {
        Ok(pair) => pair,
        Err(err) => {
            error!(%err, "cannot start engine");
            return ExitCode::FAILURE;
        }
    };

    run(&mut frame_loop, config.frame_period(), args.frames);
    frame_loop.stats().print_summary();
    ExitCode::SUCCESS
}

fn run(frame_loop: &mut FrameLoop, period: Duration, frames: Option<u64>) {
    let clock = AnimationClock::start();
    let mut sink = NullSink::default();
    let status = frame_loop.status();
    let mut last_status = Instant::now();

    info!(
        scene = frame_loop.active_scene().id(),
        dims = %frame_loop.dims(),
        period_ms = period.as_secs_f64() * 1000.0,
        "frame loop started"
    );

    while !frames.is_some_and(|limit| frame_loop.frame_count() >= limit) {
        let frame_start = Instant::now();

        frame_loop.tick(clock.now());
        frame_loop.present_to(&mut sink);

        if last_status.elapsed() >= STATUS_INTERVAL {
            info!("{}", status.latest());
            last_status = Instant::now();
        }

        if let Some(remaining) = period.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    info!(frames = frame_loop.frame_count(), presented = sink.presented, "frame loop stopped");
}
