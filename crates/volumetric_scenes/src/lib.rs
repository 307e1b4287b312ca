//! # Volumetric Scenes
//!
//! The pattern library behind the volumetric display.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: a generator is a pure function of (buffer, time, parameters)
//! 2. **Closed set**: the 12 scenes are a compile-time enum, dispatched exhaustively
//! 3. **Typed parameters**: globals and per-scene records are structs, not bags of keys
//! 4. **Disjoint namespaces**: no scene parameter shares a name with a global one
//!
//! ## Core Components
//!
//! - `SceneRegistry`: lookup of the fixed scene table by identifier
//! - `ParameterResolver`: merges engine defaults, scene defaults, session
//!   memory and live updates into a `ResolvedParams`
//! - `SessionMemory`: explicit per-scene store of last-used values
//! - `generators`: the 12 pattern functions, grouped by technique
//! - `effects`: engine-wide rotation, strobe, pulse and invert, applied
//!   after the generator
//!
//! ## Example
//!
//! ```rust,ignore
//! use volumetric_core::{GridDims, VoxelBuffer};
//! use volumetric_scenes::{ParameterResolver, SceneRegistry, SessionMemory};
//!
//! let registry = SceneRegistry::builtin();
//! let mut resolver = ParameterResolver::default();
//! let session = SessionMemory::new();
//!
//! resolver.select_scene("cafeWall")?;
//! resolver.update("size", 2.0.into());
//!
//! let params = resolver.resolve_for_scene("cafeWall", &session)?;
//! let mut buffer = VoxelBuffer::new(GridDims::new(16, 16, 16)?);
//! registry.lookup("cafeWall")?.generate(&mut buffer, 0.0, &params);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::module_name_repetitions
)]

pub mod effects;
pub mod error;
pub mod generators;
pub mod geometry;
pub mod params;
pub mod registry;

pub use effects::{EffectParams, Pulse, Strobe};
pub use error::{SceneError, SceneResult};
pub use params::{
    DefaultValue, GlobalKey, GlobalParams, ParamSnapshot, ParamValue, ParameterResolver,
    ResolvedParams, SceneParams, SessionMemory, UpdateOutcome,
};
pub use registry::{GeneratorFn, Scene, SceneKind, SceneRegistry};
