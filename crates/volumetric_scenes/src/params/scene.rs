//! # Scene-Specific Parameters
//!
//! One typed record per scene kind. Field names are the parameter names
//! (snake_case) and never collide with a global parameter name.
//!
//! Records are declared with `scene_record!`, which generates the struct,
//! its defaults and name-based `get`/`set`. The global effect settings
//! reuse the same macro. `SceneParams` is the tagged
//! union of all twelve.

use super::value::ParamValue;
use crate::registry::SceneKind;

/// A type that can be stored in a scene parameter record.
pub trait ParamField: Sized + Copy {
    /// Converts to a runtime value.
    fn to_value(self) -> ParamValue;

    /// Converts from a runtime value, or `None` on a type mismatch.
    fn from_value(value: &ParamValue) -> Option<Self>;
}

impl ParamField for f64 {
    fn to_value(self) -> ParamValue {
        ParamValue::Number(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        value.as_number().filter(|n| n.is_finite())
    }
}

impl ParamField for u32 {
    fn to_value(self) -> ParamValue {
        ParamValue::Number(f64::from(self))
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        let n = value.as_number()?;
        if n.is_finite() && n >= 0.0 {
            Some(n.round().min(f64::from(u32::MAX)) as u32)
        } else {
            None
        }
    }
}

impl ParamField for bool {
    fn to_value(self) -> ParamValue {
        ParamValue::Bool(self)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Name used on the wire.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl ParamField for $name {
            fn to_value(self) -> ParamValue {
                ParamValue::Choice(self.name().to_owned())
            }

            fn from_value(value: &ParamValue) -> Option<Self> {
                match value.as_choice()? {
                    $( $text => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use choice_enum;

choice_enum! {
    /// How the Necker cube spins.
    RotationMode {
        /// About Y only.
        Single => "single",
        /// About Y and X.
        Dual => "dual",
    }
}

choice_enum! {
    /// Waveform of the kinetic-depth loops.
    WaveKind {
        /// Sinusoid.
        Sine => "sine",
        /// Triangle wave with the same period.
        Triangle => "triangle",
    }
}

/// Result of writing a named field into a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    /// The value was stored.
    Applied,
    /// The record has the field but the value has the wrong type.
    TypeMismatch,
    /// The record has no field with that name.
    Unknown,
}

macro_rules! scene_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty = $default:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $default, )+
                }
            }
        }

        impl $name {
            /// Parameter names owned by this record.
            pub const NAMES: &'static [&'static str] = &[$( stringify!($field) ),+];

            /// Reads a field by name.
            #[must_use]
            pub fn get(&self, name: &str) -> Option<ParamValue> {
                match name {
                    $( stringify!($field) => Some(self.$field.to_value()), )+
                    _ => None,
                }
            }

            /// Writes a field by name.
            pub fn set(&mut self, name: &str, value: &ParamValue) -> FieldUpdate {
                match name {
                    $(
                        stringify!($field) => match <$ty as ParamField>::from_value(value) {
                            Some(v) => {
                                self.$field = v;
                                FieldUpdate::Applied
                            }
                            None => FieldUpdate::TypeMismatch,
                        },
                    )+
                    _ => FieldUpdate::Unknown,
                }
            }
        }
    };
}

pub(crate) use scene_record;

scene_record! {
    /// Ames room.
    AmesRoomParams {
        /// How much the far (left) wall shrinks, 0 = plain box.
        taper: f64 = 0.4,
        /// Spin about Y in rad/s.
        rotation_rate: f64 = 0.3,
    }
}

scene_record! {
    /// Penrose triangle.
    PenroseTriangleParams {
        /// Fixed tilt about X in radians.
        tilt: f64 = 0.615,
        /// Beam cross-section as a fraction of the grid.
        beam_width: f64 = 0.15,
    }
}

scene_record! {
    /// Necker cube.
    NeckerCubeParams {
        /// Single- or dual-axis spin.
        rotation_mode: RotationMode = RotationMode::Dual,
    }
}

scene_record! {
    /// Kinetic-depth waves.
    KineticDepthParams {
        /// Number of wave loops.
        wave_count: u32 = 8,
        /// Waveform.
        wave_kind: WaveKind = WaveKind::Sine,
    }
}

scene_record! {
    /// Pulfrich effect.
    PulfrichParams {
        /// Number of orbiting spheres.
        object_count: u32 = 8,
    }
}

scene_record! {
    /// Rotating snakes.
    RotatingSnakesParams {
        /// Number of concentric rings.
        ring_count: u32 = 4,
        /// Segments per ring.
        segment_count: u32 = 16,
    }
}

scene_record! {
    /// Fraser spiral.
    FraserSpiralParams {
        /// Number of concentric rings.
        ring_count: u32 = 5,
        /// Dash slant.
        twist: f64 = 0.6,
    }
}

scene_record! {
    /// Café wall.
    CafeWallParams {
        /// Draw mortar lines between bands.
        mortar: bool = true,
    }
}

scene_record! {
    /// Breathing square.
    BreathingSquareParams {
        /// Brightness falloff towards the edge, 0 = flat.
        pulse_depth: f64 = 0.6,
    }
}

scene_record! {
    /// Moiré interference.
    MoirePatternParams {
        /// Rotation of the second grid in rad/s.
        rotation_rate: f64 = 0.1,
    }
}

scene_record! {
    /// Infinite corridor.
    InfiniteCorridorParams {
        /// Number of nested frames.
        frame_count: u32 = 10,
    }
}

scene_record! {
    /// Motion aftereffect.
    MotionAftereffectParams {
        /// Brightness of the stationary reference layers.
        reference_brightness: f64 = 0.3,
    }
}

/// A record type that is one arm of [`SceneParams`].
pub trait SceneRecord: Copy + Default {
    /// Borrows the record if `params` holds this kind.
    fn extract(params: &SceneParams) -> Option<&Self>;
}

macro_rules! scene_params {
    ($( $variant:ident($record:ident) ),+ $(,)?) => {
        /// The scene-specific parameters of one scene kind.
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub enum SceneParams {
            $(
                #[allow(missing_docs)]
                $variant($record),
            )+
        }

        impl SceneParams {
            /// Built-in defaults for a scene kind.
            #[must_use]
            pub fn defaults_for(kind: SceneKind) -> Self {
                match kind {
                    $( SceneKind::$variant => Self::$variant($record::default()), )+
                }
            }

            /// The scene kind this record belongs to.
            #[must_use]
            pub fn kind(&self) -> SceneKind {
                match self {
                    $( Self::$variant(_) => SceneKind::$variant, )+
                }
            }

            /// Parameter names owned by this record.
            #[must_use]
            pub fn names(&self) -> &'static [&'static str] {
                match self {
                    $( Self::$variant(_) => $record::NAMES, )+
                }
            }

            /// Reads a field by name.
            #[must_use]
            pub fn get(&self, name: &str) -> Option<ParamValue> {
                match self {
                    $( Self::$variant(r) => r.get(name), )+
                }
            }

            /// Writes a field by name.
            pub fn set(&mut self, name: &str, value: &ParamValue) -> FieldUpdate {
                match self {
                    $( Self::$variant(r) => r.set(name, value), )+
                }
            }
        }

        $(
            impl SceneRecord for $record {
                fn extract(params: &SceneParams) -> Option<&Self> {
                    match params {
                        SceneParams::$variant(r) => Some(r),
                        _ => None,
                    }
                }
            }
        )+
    };
}

scene_params! {
    AmesRoom(AmesRoomParams),
    PenroseTriangle(PenroseTriangleParams),
    NeckerCube(NeckerCubeParams),
    KineticDepth(KineticDepthParams),
    Pulfrich(PulfrichParams),
    RotatingSnakes(RotatingSnakesParams),
    FraserSpiral(FraserSpiralParams),
    CafeWall(CafeWallParams),
    BreathingSquare(BreathingSquareParams),
    MoirePattern(MoirePatternParams),
    InfiniteCorridor(InfiniteCorridorParams),
    MotionAftereffect(MotionAftereffectParams),
}
