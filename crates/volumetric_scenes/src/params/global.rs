//! # Global Parameters
//!
//! Parameters shared by every scene. All of them are real numbers.

use serde::{Deserialize, Serialize};

/// Name of a global parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalKey {
    /// Overall scale of the geometry.
    Size,
    /// How much of the volume is filled.
    Density,
    /// Multiplier applied to time.
    AnimationSpeed,
    /// Spatial or temporal frequency.
    Frequency,
    /// Wave amplitude.
    Amplitude,
    /// Distance between repeated elements.
    Spacing,
    /// Depth exaggeration.
    Depth,
    /// Line thickening radius.
    Thickness,
}

impl GlobalKey {
    /// Every global key, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Size,
        Self::Density,
        Self::AnimationSpeed,
        Self::Frequency,
        Self::Amplitude,
        Self::Spacing,
        Self::Depth,
        Self::Thickness,
    ];

    /// Canonical snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Density => "density",
            Self::AnimationSpeed => "animation_speed",
            Self::Frequency => "frequency",
            Self::Amplitude => "amplitude",
            Self::Spacing => "spacing",
            Self::Depth => "depth",
            Self::Thickness => "thickness",
        }
    }

    /// Looks a key up by name. Accepts the camelCase spelling too.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "size" => Some(Self::Size),
            "density" => Some(Self::Density),
            "animation_speed" | "animationSpeed" => Some(Self::AnimationSpeed),
            "frequency" => Some(Self::Frequency),
            "amplitude" => Some(Self::Amplitude),
            "spacing" => Some(Self::Spacing),
            "depth" => Some(Self::Depth),
            "thickness" => Some(Self::Thickness),
            _ => None,
        }
    }
}

/// Typed record of every global parameter.
///
/// Doubles as the `[defaults]` table of the engine config.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalParams {
    /// Overall scale of the geometry.
    pub size: f64,
    /// How much of the volume is filled.
    pub density: f64,
    /// Multiplier applied to time.
    pub animation_speed: f64,
    /// Spatial or temporal frequency.
    pub frequency: f64,
    /// Wave amplitude.
    pub amplitude: f64,
    /// Distance between repeated elements.
    pub spacing: f64,
    /// Depth exaggeration.
    pub depth: f64,
    /// Line thickening radius.
    pub thickness: f64,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            density: 0.5,
            animation_speed: 1.0,
            frequency: 1.0,
            amplitude: 0.5,
            spacing: 1.0,
            depth: 1.0,
            thickness: 0.0,
        }
    }
}

impl GlobalParams {
    /// Reads a value by key.
    #[must_use]
    pub fn get(&self, key: GlobalKey) -> f64 {
        match key {
            GlobalKey::Size => self.size,
            GlobalKey::Density => self.density,
            GlobalKey::AnimationSpeed => self.animation_speed,
            GlobalKey::Frequency => self.frequency,
            GlobalKey::Amplitude => self.amplitude,
            GlobalKey::Spacing => self.spacing,
            GlobalKey::Depth => self.depth,
            GlobalKey::Thickness => self.thickness,
        }
    }

    /// Writes a value by key.
    pub fn set(&mut self, key: GlobalKey, value: f64) {
        let slot = match key {
            GlobalKey::Size => &mut self.size,
            GlobalKey::Density => &mut self.density,
            GlobalKey::AnimationSpeed => &mut self.animation_speed,
            GlobalKey::Frequency => &mut self.frequency,
            GlobalKey::Amplitude => &mut self.amplitude,
            GlobalKey::Spacing => &mut self.spacing,
            GlobalKey::Depth => &mut self.depth,
            GlobalKey::Thickness => &mut self.thickness,
        };
        *slot = value;
    }

    /// Time scaled by the animation speed, or 0 if the product overflows.
    #[inline]
    #[must_use]
    pub fn scaled_time(&self, time: f64) -> f64 {
        let scaled = time * self.animation_speed;
        if scaled.is_finite() {
            scaled
        } else {
            0.0
        }
    }

    /// Line thickening radius in voxels, clamped to `0..=3`.
    #[inline]
    #[must_use]
    pub fn thickness_radius(&self) -> i32 {
        if self.thickness.is_finite() {
            self.thickness.floor().clamp(0.0, 3.0) as i32
        } else {
            0
        }
    }
}

/// Live overrides of global parameters, one optional slot per key.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobalOverrides {
    slots: [Option<f64>; 8],
}

impl GlobalOverrides {
    /// The override for `key`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, key: GlobalKey) -> Option<f64> {
        self.slots[key as usize]
    }

    /// Sets an override.
    #[inline]
    pub fn set(&mut self, key: GlobalKey, value: f64) {
        self.slots[key as usize] = Some(value);
    }

    /// Removes every override.
    #[inline]
    pub fn clear(&mut self) {
        self.slots = [None; 8];
    }

    /// Number of keys currently overridden.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True if no key is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes every override into `params`.
    pub fn apply_to(&self, params: &mut GlobalParams) {
        for key in GlobalKey::ALL {
            if let Some(value) = self.get(key) {
                params.set(key, value);
            }
        }
    }
}
