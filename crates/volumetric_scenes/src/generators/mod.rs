//! # Pattern Generators
//!
//! One function per scene, grouped by technique:
//!
//! | Module      | Technique                          | Scenes                                  |
//! |-------------|------------------------------------|-----------------------------------------|
//! | `wireframe` | rotated 3D edges, sampled          | Ames room, Penrose triangle, Necker cube |
//! | `radial`    | rings and curves in polar coords   | kinetic depth, Pulfrich, snakes, Fraser  |
//! | `tiling`    | tile parity on the X/Y or X/Z plane | café wall, breathing square, moiré       |
//! | `scroll`    | bands and frames moving along Z    | infinite corridor, motion aftereffect    |
//!
//! ## Contract
//!
//! - Signature: `fn(&mut VoxelBuffer, time, &ResolvedParams)`
//! - Pure: no state survives between calls
//! - The first action is `clear()`; a compositing generator documents its
//!   layer order and blend rule
//! - Time is scaled by `animation_speed` before use
//! - A size that resolves to `<= 0` draws nothing
//! - Counts taken from parameters are clamped so one frame stays bounded

pub mod radial;
pub mod scroll;
pub mod tiling;
pub mod wireframe;

/// Largest number of repeated objects (rings, waves, frames) drawn.
pub(crate) const MAX_REPEATS: u32 = 64;
