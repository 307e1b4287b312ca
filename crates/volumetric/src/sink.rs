//! # Display Sink
//!
//! The seam between the engine and whatever drives the physical volume.
//! A sink receives the last published frame plus the status that goes
//! with it. Timing, scan order and transport are the sink's business.

use volumetric_core::{GridDims, VoxelBuffer};

use crate::status::StatusReport;

/// Receives published frames.
pub trait DisplaySink {
    /// Shows one frame. `frame` is only borrowed for the duration of the
    /// call; copy it out if it must outlive the call.
    fn present(&mut self, frame: &VoxelBuffer, report: &StatusReport);
}

/// Sink that remembers only counters. Used by the headless runner.
#[derive(Clone, Debug, Default)]
pub struct NullSink {
    /// Frames presented.
    pub presented: u64,
    /// Lit voxels in the last presented frame.
    pub last_lit: usize,
}

impl DisplaySink for NullSink {
    fn present(&mut self, frame: &VoxelBuffer, _report: &StatusReport) {
        self.presented += 1;
        self.last_lit = frame.lit_count();
    }
}

/// Sink that keeps a copy of the last presented frame.
#[derive(Clone, Debug)]
pub struct CaptureSink {
    frame: VoxelBuffer,
    report: Option<StatusReport>,
}

impl CaptureSink {
    /// Creates a sink sized for `dims` frames.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            frame: VoxelBuffer::new(dims),
            report: None,
        }
    }

    /// The last presented frame (all dark before the first).
    #[must_use]
    pub fn frame(&self) -> &VoxelBuffer {
        &self.frame
    }

    /// The report that came with the last frame.
    #[must_use]
    pub fn report(&self) -> Option<&StatusReport> {
        self.report.as_ref()
    }
}

impl DisplaySink for CaptureSink {
    fn present(&mut self, frame: &VoxelBuffer, report: &StatusReport) {
        if self.frame.dims() == frame.dims() {
            self.frame.copy_from(frame);
        } else {
            self.frame = frame.clone();
        }
        self.report = Some(*report);
    }
}
