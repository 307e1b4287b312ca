//! # Engine Error Types
//!
//! Errors raised while starting the engine or decoding control input.
//! Nothing here is raised from inside a frame: a running loop only logs.

use std::io;

use thiserror::Error;
use volumetric_core::GridError;

/// Errors that can occur while loading the engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The `[grid]` table describes an unusable lattice.
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    /// `frame.initial_scene` names no registered scene.
    #[error("unknown initial scene: {0}")]
    UnknownScene(String),
}

/// Errors that can occur while decoding an inbound control message.
#[derive(Error, Debug)]
pub enum ControlError {
    /// The payload is not a control message.
    #[error("malformed control message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for engine startup.
pub type ConfigResult<T> = Result<T, ConfigError>;
