//! # Scene Error Types
//!
//! The only error that leaves the scene engine. Out-of-range writes are
//! dropped by the buffer and unresolved parameters are `None`; neither is
//! an error.

use thiserror::Error;

/// Errors that can occur when addressing scenes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The identifier is not one of the registered scenes.
    #[error("unknown scene: {0}")]
    UnknownScene(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
