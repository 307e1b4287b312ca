//! # Frame Handoff Between Render Loop and Display Driver
//!
//! No locks in the hot path.
//!
//! ## The Problem
//!
//! ```text
//! Render loop:    rewrites every voxel each frame
//! Display driver: reads every voxel each frame
//!
//! Shared buffer:  driver sees half of frame N and half of frame N+1
//! With Mutex:     driver stalls the loop (or the other way round)
//! ```
//!
//! ## The Solution: Triple Buffering
//!
//! ```text
//! Frame N:
//!   Loop writes Buffer A
//!   Driver reads Buffer B (latest published frame)
//!   Buffer C idle
//!
//! Publish:
//!   latest = A (single atomic index store, never waits)
//!
//! Frame N+1:
//!   Loop writes Buffer C (B is still held by the driver)
//!   Driver finishes B, then picks up A
//! ```

mod frame_buffers;

pub use frame_buffers::{FrameBuffers, FrameReadHandle, FrameWriteHandle};
