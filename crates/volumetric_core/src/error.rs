//! # Core Error Types
//!
//! Errors raised while setting up the lattice or handing off frames.
//! Out-of-range voxel writes are deliberately absent: they are dropped,
//! not reported.

use thiserror::Error;

use crate::grid::Axis;

/// Errors that can occur when constructing grid dimensions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// One of the axes has zero length.
    #[error("grid axis {axis} has zero length")]
    ZeroDimension {
        /// The offending axis.
        axis: Axis,
    },

    /// The lattice would exceed the supported voxel count.
    #[error("grid of {voxels} voxels exceeds the supported maximum of {max}")]
    TooLarge {
        /// Requested voxel count.
        voxels: u64,
        /// Supported maximum.
        max: u64,
    },
}

/// Errors that can occur when acquiring a buffer for the next frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Another write handle is still alive.
    #[error("another writer holds a frame buffer")]
    WriterActive,

    /// Readers hold every buffer other than the latest frame.
    ///
    /// Cannot happen with a single reader that holds one frame at a time.
    #[error("no free frame buffer: {readers} reader(s) hold the spare buffers")]
    NoFreeBuffer {
        /// Number of read handles alive at the time of the attempt.
        readers: usize,
    },
}
