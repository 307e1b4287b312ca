//! # Status Reporting
//!
//! The outbound, informational side: what an operator panel shows. The
//! frame loop publishes a report after every frame; any thread may read
//! the latest one.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use volumetric_core::GridDims;
use volumetric_scenes::SceneKind;

/// Snapshot of the engine after one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StatusReport {
    /// Lattice dimensions `[x, y, z]`.
    pub dims: [u32; 3],
    /// Frames per second over the recent window.
    pub fps: f64,
    /// Lit voxels in the last frame.
    pub lit: usize,
    /// Frames generated so far.
    pub frame: u64,
    /// Active scene identifier.
    pub scene: &'static str,
}

impl StatusReport {
    /// An empty report for a freshly started engine.
    #[must_use]
    pub fn idle(dims: GridDims, scene: SceneKind) -> Self {
        Self {
            dims: [dims.x(), dims.y(), dims.z()],
            fps: 0.0,
            lit: 0,
            frame: 0,
            scene: scene.id(),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.dims;
        write!(
            f,
            "{} | {x}x{y}x{z} | frame {} | {:.1} fps | {} lit",
            self.scene, self.frame, self.fps, self.lit
        )
    }
}

/// Shared, always-readable latest status.
#[derive(Clone, Debug)]
pub struct StatusBoard {
    latest: Arc<RwLock<StatusReport>>,
}

impl StatusBoard {
    /// Creates a board holding `initial`.
    #[must_use]
    pub fn new(initial: StatusReport) -> Self {
        Self {
            latest: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replaces the current report.
    pub fn publish(&self, report: StatusReport) {
        *self.latest.write() = report;
    }

    /// The most recent report.
    #[must_use]
    pub fn latest(&self) -> StatusReport {
        *self.latest.read()
    }

    /// The most recent report as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if `fps` is not finite.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.latest())
    }
}
