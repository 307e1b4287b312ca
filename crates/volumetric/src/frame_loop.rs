//! # Frame Loop
//!
//! One frame, start to finish:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. DRAIN CONTROLS                                                   │
//! │    ├─ Apply parameter updates to the active scene                   │
//! │    ├─ Scene switch (outgoing scene's session saved first)           │
//! │    └─ Session saves                                                 │
//! │                                                                     │
//! │ 2. RESOLVE                                                          │
//! │    └─ One ResolvedParams for the whole frame                        │
//! │                                                                     │
//! │ 3. GENERATE                                                         │
//! │    ├─ Acquire write handle to a free buffer                         │
//! │    ├─ Scene generator clears and draws                              │
//! │    └─ Global effects (rotation, strobe, pulse, invert)              │
//! │                                                                     │
//! │ 4. PUBLISH                                                          │
//! │    └─ Atomic store of the latest index; never waits for readers     │
//! │                                                                     │
//! │ 5. REPORT                                                           │
//! │    └─ Stats accumulator + status board                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop does not own a clock or a sleep: callers pass the animation
//! time in and pace the calls themselves.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};
use volumetric_core::{FrameBuffers, GridDims, VoxelBuffer};
use volumetric_scenes::params::{canonical_name, FieldUpdate};
use volumetric_scenes::{
    effects, EffectParams, ParamValue, ParameterResolver, ResolvedParams, SceneKind, SceneRegistry,
    SceneResult, SessionMemory, UpdateOutcome,
};

use crate::config::EngineConfig;
use crate::control::{ControlBus, ControlMessage, ControlReceiver, ControlSender};
use crate::error::ConfigResult;
use crate::sink::DisplaySink;
use crate::status::{StatusBoard, StatusReport};

/// Window over which the reported frame rate is measured.
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Timing and output of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at zero.
    pub frame: u64,
    /// Animation time the frame was generated for.
    pub time: f64,
    /// Lit voxels in the generated frame.
    pub lit: usize,
    /// Control messages applied before generating.
    pub controls: usize,
    /// Generator plus effects time in microseconds.
    pub generate_us: u64,
    /// Whole tick in microseconds.
    pub total_us: u64,
    /// Whether the frame became visible.
    pub published: bool,
}

/// Drives one scene at a time into the frame buffers.
pub struct FrameLoop {
    dims: GridDims,
    registry: SceneRegistry,
    resolver: ParameterResolver,
    session: SessionMemory,
    effects: EffectParams,
    /// Copy of the frame while effects resample it.
    scratch: VoxelBuffer,
    /// Parameters used for the most recent frame.
    resolved: ResolvedParams,
    buffers: Arc<FrameBuffers>,
    inbox: ControlReceiver,
    status: StatusBoard,
    stats: FrameStatsAccumulator,
    frame_period: Duration,
    log_slow_frames: bool,
    frame_count: u64,
    fps: FpsWindow,
}

impl FrameLoop {
    /// Builds the loop and the sender for its control channel.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Grid`] for unusable dimensions and
    /// [`crate::ConfigError::UnknownScene`] for an unregistered initial scene.
    pub fn new(config: &EngineConfig) -> ConfigResult<(Self, ControlSender)> {
        let dims = config.grid_dims()?;
        let initial = config.initial_scene()?;
        let bus = ControlBus::new(config.frame.inbox_capacity.max(1));

        let resolver = ParameterResolver::new(config.defaults, initial);
        let session = SessionMemory::new();
        let resolved = resolver.resolve(initial, &session);
        let frame_period = config.frame_period();

        let frame_loop = Self {
            dims,
            registry: SceneRegistry::builtin(),
            resolver,
            session,
            effects: config.effects,
            scratch: VoxelBuffer::new(dims),
            resolved,
            buffers: FrameBuffers::new(dims),
            inbox: bus.receiver(),
            status: StatusBoard::new(StatusReport::idle(dims, initial)),
            stats: FrameStatsAccumulator::new(frame_period),
            frame_period,
            log_slow_frames: config.frame.log_slow_frames,
            frame_count: 0,
            fps: FpsWindow::new(),
        };
        Ok((frame_loop, bus.sender()))
    }

    /// Runs one frame for animation time `time` (seconds).
    pub fn tick(&mut self, time: f64) -> FrameStats {
        let start = Instant::now();
        let time = if time.is_finite() { time } else { 0.0 };
        let controls = self.apply_controls();

        let kind = self.resolver.active_scene();
        self.resolved = self.resolver.resolve(kind, &self.session);
        let scene = self.registry.get(kind);

        let mut stats = FrameStats {
            frame: self.frame_count,
            time,
            controls,
            ..FrameStats::default()
        };

        match self.buffers.write_handle() {
            Ok(mut frame) => {
                let generate_start = Instant::now();
                scene.generate(&mut frame, time, &self.resolved);
                effects::apply(&mut frame, &mut self.scratch, time, &self.resolved.globals, &self.effects);
                stats.generate_us = micros(generate_start.elapsed());
                stats.lit = frame.lit_count();
                frame.publish();
                stats.published = true;
            }
            Err(err) => warn!(frame = self.frame_count, %err, "frame skipped"),
        }

        stats.total_us = micros(start.elapsed());
        self.finish_frame(kind, stats);
        stats
    }

    /// Makes another scene active.
    ///
    /// The outgoing scene's current values are saved to session memory
    /// first, so switching back restores them. Selecting the active scene
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`volumetric_scenes::SceneError::UnknownScene`] and keeps
    /// the current scene if `id` is not registered.
    pub fn select_scene(&mut self, id: &str) -> SceneResult<SceneKind> {
        let kind = SceneKind::parse(id)?;
        if kind != self.resolver.active_scene() {
            self.save_session();
            self.resolver.select_scene(id)?;
        }
        Ok(kind)
    }

    /// Live update. Effect names change the engine-wide effects; anything
    /// else goes to the active scene.
    pub fn update(&mut self, name: &str, value: ParamValue) -> UpdateOutcome {
        let field = canonical_name(name);
        match self.effects.set(&field, &value) {
            FieldUpdate::Applied => {
                debug!(param = %field, %value, "effect parameter updated");
                UpdateOutcome::Effect
            }
            FieldUpdate::TypeMismatch => {
                warn!(param = %field, got = value.kind_name(), "rejected effect parameter of the wrong type");
                UpdateOutcome::Rejected
            }
            FieldUpdate::Unknown => self.resolver.update(name, value),
        }
    }

    /// Saves the active scene's current values to session memory.
    pub fn save_session(&mut self) {
        let id = self.resolver.active_scene().id();
        if let Err(err) = self.resolver.save_session(id, &mut self.session) {
            warn!(%err, "session not saved");
        }
    }

    /// Shows the last published frame on `sink`.
    ///
    /// Holds a read handle for the duration of the call; a `tick` on
    /// another thread meanwhile still publishes into a free buffer.
    pub fn present_to(&self, sink: &mut dyn DisplaySink) {
        let frame = self.buffers.read_handle();
        let report = self.status.latest();
        sink.present(&frame, &report);
    }

    /// The frame buffers, for a display thread.
    #[must_use]
    pub fn buffers(&self) -> Arc<FrameBuffers> {
        Arc::clone(&self.buffers)
    }

    /// The status board, for a reporting thread.
    #[must_use]
    pub fn status(&self) -> StatusBoard {
        self.status.clone()
    }

    /// Lattice dimensions.
    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// The scene being generated.
    #[inline]
    #[must_use]
    pub fn active_scene(&self) -> SceneKind {
        self.resolver.active_scene()
    }

    /// Parameters used for the most recent frame.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedParams {
        &self.resolved
    }

    /// Current value of an effect, or of a parameter for the active scene.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<ParamValue> {
        self.effects
            .get(&canonical_name(name))
            .or_else(|| self.resolver.get(name, &self.session))
    }

    /// Engine-wide effect settings.
    #[must_use]
    pub fn effects(&self) -> &EffectParams {
        &self.effects
    }

    /// Saved per-scene values.
    #[must_use]
    pub fn session(&self) -> &SessionMemory {
        &self.session
    }

    /// The scene table.
    #[must_use]
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Accumulated frame statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// Frames generated so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn apply_controls(&mut self) -> usize {
        let messages = self.inbox.drain();
        let count = messages.len();

        for message in messages {
            debug!(?message, "control message");
            match message {
                ControlMessage::SetParameters { values } => {
                    for (name, value) in values {
                        self.update(&name, value);
                    }
                }
                ControlMessage::SelectScene { scene } => {
                    if let Err(err) = self.select_scene(&scene) {
                        warn!(%err, active = self.active_scene().id(), "scene selection ignored");
                    }
                }
                ControlMessage::SaveSession => self.save_session(),
            }
        }

        count
    }

    fn finish_frame(&mut self, kind: SceneKind, stats: FrameStats) {
        self.frame_count += 1;
        self.stats.record(stats);

        if self.log_slow_frames && !self.frame_period.is_zero() && stats.total_us > micros(self.frame_period) {
            warn!(
                frame = stats.frame,
                scene = kind.id(),
                took_ms = stats.total_us as f64 / 1000.0,
                budget_ms = self.frame_period.as_secs_f64() * 1000.0,
                "frame exceeded budget"
            );
        }

        self.status.publish(StatusReport {
            dims: [self.dims.x(), self.dims.y(), self.dims.z()],
            fps: self.fps.tick(),
            lit: stats.lit,
            frame: self.frame_count,
            scene: kind.id(),
        });

        trace!(frame = stats.frame, lit = stats.lit, us = stats.total_us, "frame done");
    }
}

#[inline]
fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Wall-clock frame rate, refreshed once per window.
#[derive(Clone, Copy, Debug)]
struct FpsWindow {
    start: Instant,
    frames: u32,
    fps: f64,
}

impl FpsWindow {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) -> f64 {
        self.frames += 1;
        let elapsed = self.start.elapsed();
        if elapsed >= FPS_WINDOW {
            self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.start = Instant::now();
        }
        self.fps
    }
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of whole-tick times.
    pub total_us_sum: u64,
    /// Sum of generator times.
    pub generate_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded the frame period.
    pub frames_over_budget: u64,
    /// Frames generated but never shown.
    pub frames_discarded: u64,
    /// Control messages applied.
    pub controls_applied: u64,
    budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator measuring against `budget` per frame.
    /// A zero budget counts no frame as over.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            generate_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            frames_discarded: 0,
            controls_applied: 0,
            budget_us: micros(budget),
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum = self.total_us_sum.saturating_add(stats.total_us);
        self.generate_us_sum = self.generate_us_sum.saturating_add(stats.generate_us);
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.controls_applied += stats.controls as u64;

        if self.budget_us > 0 && stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
        if !stats.published {
            self.frames_discarded += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average generator time in milliseconds.
    #[must_use]
    pub fn avg_generate_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.generate_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Frames per second the loop could sustain, unpaced.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the share of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Prints a summary of the statistics.
    pub fn print_summary(&self) {
        let min_ms = if self.frames_recorded == 0 { 0.0 } else { self.min_frame_us as f64 / 1000.0 };

        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    FRAME STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ─────────────────────────────────────────────────────────┐");
        println!("│ Frames Recorded:    {}", self.frames_recorded);
        println!("│ Average Frame:      {:.3} ms ({:.1} FPS unpaced)", self.avg_frame_ms(), self.avg_fps());
        println!("│ Average Generate:   {:.3} ms", self.avg_generate_ms());
        println!("│ Min Frame:          {min_ms:.3} ms");
        println!("│ Max Frame:          {:.3} ms", self.max_frame_us as f64 / 1000.0);
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ BUDGET ─────────────────────────────────────────────────────────┐");
        println!("│ Target:             {:.3} ms", self.budget_us as f64 / 1000.0);
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("│ Discarded:          {} frames", self.frames_discarded);
        println!("│ Controls Applied:   {}", self.controls_applied);
        println!("└──────────────────────────────────────────────────────────────────┘");
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new(Duration::from_micros(16_666))
    }
}
