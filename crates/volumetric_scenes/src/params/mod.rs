//! # Parameter Model
//!
//! Two disjoint namespaces, both strongly typed:
//!
//! ```text
//! GlobalParams   size, density, animation_speed, ... (every scene)
//! SceneParams    one record per scene kind (taper, wave_kind, mortar, ...)
//! ```
//!
//! Names that belong to neither are kept verbatim in an `extra` bucket so
//! the control surface can send keys this engine does not know about.

mod global;
mod resolver;
mod scene;
mod session;
mod value;

pub use global::{GlobalKey, GlobalOverrides, GlobalParams};
pub use resolver::{ParameterResolver, ResolvedParams, UpdateOutcome};
pub use scene::{
    AmesRoomParams, BreathingSquareParams, CafeWallParams, FieldUpdate, FraserSpiralParams,
    InfiniteCorridorParams, KineticDepthParams, MoirePatternParams, MotionAftereffectParams,
    NeckerCubeParams, ParamField, PenroseTriangleParams, PulfrichParams, RotatingSnakesParams,
    RotationMode, SceneParams, SceneRecord, WaveKind,
};
pub(crate) use scene::{choice_enum, scene_record};
pub use session::{ParamSnapshot, SessionMemory};
pub use value::{canonical_name, DefaultValue, ParamValue};
