//! # Volumetric
//!
//! The engine around the scene library: it takes control input, runs one
//! scene per frame into the frame buffers, and reports what it did.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Control input  │     │   Frame loop    │     │ Display driver  │
//! │                 │────>│                 │────>│                 │
//! │  • parameters   │     │  • resolve      │     │  • read handle  │
//! │  • scene select │     │  • generate     │     │  • DisplaySink  │
//! │  • session save │     │  • effects      │     │                 │
//! │                 │     │  • publish      │     │                 │
//! └─────────────────┘     └────────┬────────┘     └─────────────────┘
//!                                  │
//!                         ┌────────┴────────┐
//!                         │  Status board   │
//!                         │  dims, fps, lit │
//!                         └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML engine configuration
//! - `clock`: wall-clock and fixed-step animation time
//! - `control`: bounded inbound message channel
//! - `frame_loop`: frame orchestration and timing
//! - `status`: latest-status board
//! - `sink`: display driver seam

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::module_name_repetitions
)]

pub mod clock;
pub mod config;
pub mod control;
pub mod error;
pub mod frame_loop;
pub mod sink;
pub mod status;

// Re-export the layers below
pub use volumetric_core as core;
pub use volumetric_scenes as scenes;

pub use clock::AnimationClock;
pub use config::{EngineConfig, FrameConfig, GridConfig};
pub use control::{ControlBus, ControlMessage, ControlReceiver, ControlSender};
pub use error::{ConfigError, ConfigResult, ControlError};
pub use frame_loop::{FrameLoop, FrameStats, FrameStatsAccumulator};
pub use sink::{CaptureSink, DisplaySink, NullSink};
pub use status::{StatusBoard, StatusReport};
