//! # Scene Registry
//!
//! The fixed table of scenes. Read-only after construction; there is no
//! way to add or remove a scene at runtime.
//!
//! Dispatch is a closed enum: `SceneKind::generator` is an exhaustive
//! match, so adding a scene without a generator does not compile.

use std::fmt;

use volumetric_core::VoxelBuffer;

use crate::error::{SceneError, SceneResult};
use crate::generators::{radial, scroll, tiling, wireframe};
use crate::params::DefaultValue::{self, Bool, Number};
use crate::params::ResolvedParams;

/// Signature shared by every generator.
pub type GeneratorFn = fn(&mut VoxelBuffer, f64, &ResolvedParams);

/// The registered scenes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneKind {
    /// A rotating trapezoidal room that reads as a box.
    AmesRoom,
    /// Three beams that close into an impossible triangle from one angle.
    PenroseTriangle,
    /// A wireframe cube with ambiguous depth.
    NeckerCube,
    /// Rotating wave loops whose depth is only visible in motion.
    KineticDepth,
    /// Orbiting spheres with brightness tied to their angle.
    Pulfrich,
    /// Rings of stepped brightness that appear to drift.
    RotatingSnakes,
    /// Concentric rings of slanted dashes that read as a spiral.
    FraserSpiral,
    /// Offset tile rows with mortar lines that read as wedges.
    CafeWall,
    /// A checkerboard pulsing in brightness.
    BreathingSquare,
    /// Two line grids interfering as one rotates.
    MoirePattern,
    /// Nested frames scrolling towards the viewer.
    #[default]
    InfiniteCorridor,
    /// Moving stripes over a stationary reference grid.
    MotionAftereffect,
}

impl SceneKind {
    /// Every scene, in registry order.
    pub const ALL: [Self; 12] = [
        Self::AmesRoom,
        Self::PenroseTriangle,
        Self::NeckerCube,
        Self::KineticDepth,
        Self::Pulfrich,
        Self::RotatingSnakes,
        Self::FraserSpiral,
        Self::CafeWall,
        Self::BreathingSquare,
        Self::MoirePattern,
        Self::InfiniteCorridor,
        Self::MotionAftereffect,
    ];

    /// Wire identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::AmesRoom => "amesRoom",
            Self::PenroseTriangle => "penroseTriangle",
            Self::NeckerCube => "neckerCube",
            Self::KineticDepth => "kineticDepth",
            Self::Pulfrich => "pulfrich",
            Self::RotatingSnakes => "rotatingSnakes",
            Self::FraserSpiral => "fraserSpiral",
            Self::CafeWall => "cafeWall",
            Self::BreathingSquare => "breathingSquare",
            Self::MoirePattern => "moirePattern",
            Self::InfiniteCorridor => "infiniteCorridor",
            Self::MotionAftereffect => "motionAftereffect",
        }
    }

    /// Looks a scene up by wire identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Like [`SceneKind::from_id`], failing with `UnknownScene`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if `id` is not registered.
    pub fn parse(id: &str) -> SceneResult<Self> {
        Self::from_id(id).ok_or_else(|| SceneError::UnknownScene(id.to_owned()))
    }

    /// The generator for this scene.
    #[must_use]
    pub fn generator(self) -> GeneratorFn {
        match self {
            Self::AmesRoom => wireframe::ames_room,
            Self::PenroseTriangle => wireframe::penrose_triangle,
            Self::NeckerCube => wireframe::necker_cube,
            Self::KineticDepth => radial::kinetic_depth,
            Self::Pulfrich => radial::pulfrich,
            Self::RotatingSnakes => radial::rotating_snakes,
            Self::FraserSpiral => radial::fraser_spiral,
            Self::CafeWall => tiling::cafe_wall,
            Self::BreathingSquare => tiling::breathing_square,
            Self::MoirePattern => tiling::moire_pattern,
            Self::InfiniteCorridor => scroll::infinite_corridor,
            Self::MotionAftereffect => scroll::motion_aftereffect,
        }
    }

    /// The registry entry for this scene.
    #[must_use]
    pub fn scene(self) -> &'static Scene {
        &SCENES[self as usize]
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One registry entry.
#[derive(Debug)]
pub struct Scene {
    /// Scene kind.
    pub kind: SceneKind,
    /// Wire identifier.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Declared defaults, overriding the engine and record defaults.
    pub defaults: &'static [(&'static str, DefaultValue)],
    /// Parameters the control surface exposes for this scene; these are
    /// what session memory saves.
    pub enabled: &'static [&'static str],
    /// True if the generator layers two patterns on top of each other.
    pub composites: bool,
}

impl Scene {
    /// Renders one frame of this scene.
    #[inline]
    pub fn generate(&self, buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
        (self.kind.generator())(buffer, time, params);
    }
}

static SCENES: [Scene; 12] = [
    Scene {
        kind: SceneKind::AmesRoom,
        id: "amesRoom",
        name: "Ames Room",
        defaults: &[("size", Number(1.0)), ("depth", Number(1.0))],
        enabled: &["size", "animation_speed", "depth", "thickness", "taper", "rotation_rate"],
        composites: false,
    },
    Scene {
        kind: SceneKind::PenroseTriangle,
        id: "penroseTriangle",
        name: "Penrose Triangle",
        defaults: &[("size", Number(0.8))],
        enabled: &["size", "animation_speed", "thickness", "tilt", "beam_width"],
        composites: false,
    },
    Scene {
        kind: SceneKind::NeckerCube,
        id: "neckerCube",
        name: "Necker Cube",
        defaults: &[("size", Number(0.8))],
        enabled: &["size", "animation_speed", "thickness", "rotation_mode"],
        composites: false,
    },
    Scene {
        kind: SceneKind::KineticDepth,
        id: "kineticDepth",
        name: "Kinetic Depth Waves",
        defaults: &[("amplitude", Number(0.5)), ("frequency", Number(1.0))],
        enabled: &["size", "animation_speed", "frequency", "amplitude", "wave_count", "wave_kind"],
        composites: false,
    },
    Scene {
        kind: SceneKind::Pulfrich,
        id: "pulfrich",
        name: "Pulfrich Effect",
        defaults: &[("density", Number(0.5))],
        enabled: &["size", "density", "animation_speed", "object_count"],
        composites: false,
    },
    Scene {
        kind: SceneKind::RotatingSnakes,
        id: "rotatingSnakes",
        name: "Rotating Snakes",
        defaults: &[],
        enabled: &["size", "animation_speed", "ring_count", "segment_count"],
        composites: false,
    },
    Scene {
        kind: SceneKind::FraserSpiral,
        id: "fraserSpiral",
        name: "Fraser Spiral",
        defaults: &[],
        enabled: &["size", "animation_speed", "frequency", "ring_count", "twist"],
        composites: false,
    },
    Scene {
        kind: SceneKind::CafeWall,
        id: "cafeWall",
        name: "Café Wall",
        defaults: &[("size", Number(1.0)), ("spacing", Number(1.0)), ("mortar", Bool(true))],
        enabled: &["size", "spacing", "mortar"],
        composites: false,
    },
    Scene {
        kind: SceneKind::BreathingSquare,
        id: "breathingSquare",
        name: "Breathing Square",
        defaults: &[("size", Number(1.0))],
        enabled: &["size", "animation_speed", "frequency", "pulse_depth"],
        composites: false,
    },
    Scene {
        kind: SceneKind::MoirePattern,
        id: "moirePattern",
        name: "Moiré Pattern",
        defaults: &[("spacing", Number(1.0))],
        enabled: &["spacing", "animation_speed", "rotation_rate"],
        composites: true,
    },
    Scene {
        kind: SceneKind::InfiniteCorridor,
        id: "infiniteCorridor",
        name: "Infinite Corridor",
        defaults: &[("spacing", Number(1.0)), ("depth", Number(1.0))],
        enabled: &["size", "spacing", "depth", "animation_speed", "frame_count"],
        composites: false,
    },
    Scene {
        kind: SceneKind::MotionAftereffect,
        id: "motionAftereffect",
        name: "Motion Aftereffect",
        defaults: &[("animation_speed", Number(0.5)), ("density", Number(0.5))],
        enabled: &["density", "animation_speed", "reference_brightness"],
        composites: true,
    },
];

/// Read-only view of the scene table.
#[derive(Clone, Copy, Debug)]
pub struct SceneRegistry {
    scenes: &'static [Scene],
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SceneRegistry {
    /// The built-in table of twelve scenes.
    #[must_use]
    pub fn builtin() -> Self {
        Self { scenes: &SCENES }
    }

    /// Looks a scene up by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if `id` is not registered.
    pub fn lookup(&self, id: &str) -> SceneResult<&'static Scene> {
        self.scenes
            .iter()
            .find(|scene| scene.id == id)
            .ok_or_else(|| SceneError::UnknownScene(id.to_owned()))
    }

    /// The entry for a scene kind.
    #[must_use]
    pub fn get(&self, kind: SceneKind) -> &'static Scene {
        kind.scene()
    }

    /// Identifiers, in registry order.
    #[must_use]
    pub fn list_ids(&self) -> Vec<&'static str> {
        self.scenes.iter().map(|scene| scene.id).collect()
    }

    /// Display names, in the same order as [`SceneRegistry::list_ids`].
    #[must_use]
    pub fn list_names(&self) -> Vec<&'static str> {
        self.scenes.iter().map(|scene| scene.name).collect()
    }

    /// Iterates over every entry.
    pub fn iter(&self) -> impl Iterator<Item = &'static Scene> {
        self.scenes.iter()
    }

    /// Number of registered scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Always false for the built-in table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{GlobalKey, SceneParams};
    use std::collections::HashSet;

    #[test]
    fn test_table_order_matches_enum() {
        for (i, kind) in SceneKind::ALL.into_iter().enumerate() {
            assert_eq!(SCENES[i].kind, kind);
            assert_eq!(SCENES[i].id, kind.id());
        }
    }

    #[test]
    fn test_twelve_distinct_ids() {
        let registry = SceneRegistry::builtin();
        let ids = registry.list_ids();
        assert_eq!(ids.len(), 12);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 12);
        for id in &ids {
            assert_eq!(registry.lookup(id).unwrap().id, *id);
        }
    }

    #[test]
    fn test_unknown_scene() {
        let registry = SceneRegistry::builtin();
        assert_eq!(
            registry.lookup("doesNotExist").unwrap_err(),
            SceneError::UnknownScene("doesNotExist".to_owned())
        );
        assert_eq!(SceneKind::from_id("doesNotExist"), None);
    }

    #[test]
    fn test_names_follow_ids() {
        let registry = SceneRegistry::builtin();
        let names = registry.list_names();
        assert_eq!(names.len(), registry.list_ids().len());
        assert_eq!(names[7], "Café Wall");
        assert_eq!(registry.list_ids()[7], "cafeWall");
    }

    #[test]
    fn test_declared_names_are_known() {
        for scene in SceneRegistry::builtin().iter() {
            let record = SceneParams::defaults_for(scene.kind);
            let known = |name: &str| GlobalKey::from_name(name).is_some() || record.names().contains(&name);

            for (name, _) in scene.defaults {
                assert!(known(*name), "{}: default {name} is not a parameter", scene.id);
            }
            for name in scene.enabled {
                assert!(known(*name), "{}: enabled {name} is not a parameter", scene.id);
            }
            for name in record.names() {
                assert!(scene.enabled.contains(name), "{}: {name} not enabled", scene.id);
            }
        }
    }

    #[test]
    fn test_only_moire_and_aftereffect_composite() {
        let compositing: Vec<_> = SceneRegistry::builtin()
            .iter()
            .filter(|scene| scene.composites)
            .map(|scene| scene.kind)
            .collect();
        assert_eq!(compositing, vec![SceneKind::MoirePattern, SceneKind::MotionAftereffect]);
    }
}
