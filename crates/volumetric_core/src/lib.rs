//! # Volumetric Core
//!
//! The voxel lattice shared by every other crate in the workspace:
//! - A validated `GridDims` that owns the flattening convention
//! - A flat `VoxelBuffer` of intensities, reused every frame
//! - `FrameBuffers`, a lock-free triple buffer between the frame loop
//!   and the display driver
//!
//! ## Architecture Rules
//!
//! 1. **Bounds-checked writes** - out-of-range coordinates are dropped, never wrapped
//! 2. **Fixed size** - dimensions are immutable for the lifetime of a buffer
//! 3. **No locks in the hot path** - frames are handed off with one atomic store
//!
//! ## Example
//!
//! ```rust,ignore
//! use volumetric_core::{GridDims, VoxelBuffer};
//!
//! let dims = GridDims::new(16, 16, 16)?;
//! let mut buffer = VoxelBuffer::new(dims);
//! buffer.write(3, 4, 5, 1.0);
//! buffer.write(-1, 0, 0, 1.0); // silently dropped
//! assert_eq!(buffer.lit_count(), 1);
//! ```

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

pub mod buffer;
pub mod error;
pub mod grid;
pub mod sync;

pub use buffer::VoxelBuffer;
pub use error::{FrameError, GridError};
pub use grid::{Axis, GridDims, MAX_VOXELS};
pub use sync::{FrameBuffers, FrameReadHandle, FrameWriteHandle};
