//! # Engine Configuration
//!
//! Loaded once at startup from TOML. Every table and every field has a
//! default, so an empty file is a valid config.
//!
//! ```toml
//! [grid]
//! x = 20
//! y = 20
//! z = 20
//!
//! [frame]
//! target_fps = 60
//! inbox_capacity = 256
//! initial_scene = "infiniteCorridor"
//! log_slow_frames = true
//!
//! [defaults]
//! size = 1.0
//! thickness = 0.0
//!
//! [effects]
//! pulse = "slow"
//! rotation_speed = 0.5
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use volumetric_core::{GridDims, GridError};
use volumetric_scenes::{EffectParams, GlobalParams, SceneKind};

use crate::error::{ConfigError, ConfigResult};

/// Lattice dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Points along X.
    pub x: u32,
    /// Points along Y.
    pub y: u32,
    /// Points along Z.
    pub z: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { x: 20, y: 20, z: 20 }
    }
}

/// Frame loop settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames per second the runner aims for.
    pub target_fps: u32,
    /// Control messages that may queue between two frames.
    pub inbox_capacity: usize,
    /// Scene shown before the first selection arrives.
    pub initial_scene: String,
    /// Warn about frames that exceed the frame period.
    pub log_slow_frames: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            inbox_capacity: 256,
            initial_scene: SceneKind::default().id().to_owned(),
            log_slow_frames: true,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `[grid]` table.
    pub grid: GridConfig,
    /// `[frame]` table.
    pub frame: FrameConfig,
    /// `[defaults]` table: engine-wide global parameter defaults.
    pub defaults: GlobalParams,
    /// `[effects]` table: effect settings at startup.
    pub effects: EffectParams,
}

impl EngineConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::UnknownScene`] if the initial scene is not registered.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.initial_scene()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// as [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            x = config.grid.x,
            y = config.grid.y,
            z = config.grid.z,
            scene = %config.frame.initial_scene,
            "config loaded"
        );
        Ok(config)
    }

    /// Validated lattice dimensions.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] for a zero or oversized axis.
    pub fn grid_dims(&self) -> Result<GridDims, GridError> {
        GridDims::new(self.grid.x, self.grid.y, self.grid.z)
    }

    /// The scene to start with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownScene`] if it is not registered.
    pub fn initial_scene(&self) -> ConfigResult<SceneKind> {
        SceneKind::from_id(&self.frame.initial_scene)
            .ok_or_else(|| ConfigError::UnknownScene(self.frame.initial_scene.clone()))
    }

    /// Length of one frame at the target rate. Zero disables pacing.
    #[must_use]
    pub fn frame_period(&self) -> Duration {
        match self.frame.target_fps {
            0 => Duration::ZERO,
            fps => Duration::from_secs(1) / fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volumetric_scenes::{Pulse, Strobe};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.grid_dims().unwrap().len(), 8000);
        assert_eq!(config.initial_scene().unwrap(), SceneKind::InfiniteCorridor);
        assert_eq!(config.frame.inbox_capacity, 256);
    }

    #[test]
    fn test_partial_tables() {
        let config = EngineConfig::from_toml_str(
            r#"
            [grid]
            x = 32

            [frame]
            initial_scene = "cafeWall"

            [defaults]
            size = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.grid, GridConfig { x: 32, y: 20, z: 20 });
        assert_eq!(config.initial_scene().unwrap(), SceneKind::CafeWall);
        assert_eq!(config.defaults.size, 2.0);
        assert_eq!(config.defaults.density, 0.5);
        assert_eq!(config.frame.target_fps, 60);
    }

    #[test]
    fn test_effects_table() {
        let config = EngineConfig::from_toml_str(
            r#"
            [effects]
            strobe = "medium"
            invert = true
            rotation_y = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.effects.strobe, Strobe::Medium);
        assert!(config.effects.invert);
        assert_eq!(config.effects.rotation_y, 0.5);
        assert_eq!(config.effects.pulse, Pulse::Off);

        let err = EngineConfig::from_toml_str("[effects]\npulse = \"frantic\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_initial_scene() {
        let err = EngineConfig::from_toml_str("[frame]\ninitial_scene = \"lavaLamp\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownScene(ref id) if id == "lavaLamp"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("[grid\nx = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = EngineConfig::from_toml_str("[grid]\nx = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let config = EngineConfig::from_toml_str("[grid]\nz = 0").unwrap();
        assert!(config.grid_dims().is_err());
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/volumetric.toml");
        let config = EngineConfig::load(path).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/definitely/not/here/volumetric.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_frame_period() {
        let mut config = EngineConfig::default();
        assert_eq!(config.frame_period(), Duration::from_nanos(16_666_666));
        config.frame.target_fps = 0;
        assert_eq!(config.frame_period(), Duration::ZERO);
    }
}
