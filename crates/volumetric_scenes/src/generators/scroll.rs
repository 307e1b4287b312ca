//! # Scrolling Scenes
//!
//! Patterns that move along Z. The corridor wraps its frames modulo the
//! Z extent; this is the only place a generator wraps a coordinate.

use volumetric_core::VoxelBuffer;

use super::MAX_REPEATS;
use crate::params::{InfiniteCorridorParams, MotionAftereffectParams, ResolvedParams};

/// Z speed of the corridor frames, voxels per second.
const CORRIDOR_SPEED: f64 = 3.0;

/// Z speed of the aftereffect stripes, voxels per second.
const STRIPE_SPEED: f64 = 10.0;

/// Every this many Y layers carries the stationary reference grid.
const REFERENCE_EVERY: u32 = 5;

/// One corridor frame, ready to draw.
#[derive(Clone, Copy, Default)]
struct CorridorFrame {
    z: i32,
    depth: f64,
    half_width: i32,
    half_height: i32,
}

/// Infinite corridor.
///
/// `frame_count` rectangular outlines in the X/Y plane, `frameSpacing =
/// max(3, floor(4·spacing))` apart along Z, scrolling at 3 voxels/s. Each
/// frame's Z wraps modulo the Z extent; its normalised depth
/// `n = (baseZ / gz) mod 1` sets both its scale `size·(0.2 + 0.8·n·depth)`
/// and brightness `0.3 + 0.7·n`, so frames grow and brighten as they
/// approach. Frames are drawn far to near.
pub fn infinite_corridor(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let corridor = params.record::<InfiniteCorridorParams>();
    if globals.size <= 0.0 {
        return;
    }

    let dims = buffer.dims();
    let (gx, gy, gz) = (f64::from(dims.x()), f64::from(dims.y()), f64::from(dims.z()));
    let frame_spacing = (4.0 * globals.spacing).floor().max(3.0);
    let travelled = CORRIDOR_SPEED * globals.scaled_time(time);
    let scroll = if travelled.is_finite() {
        travelled.rem_euclid(frame_spacing)
    } else {
        0.0
    };
    let (cx, cy) = ((dims.x() / 2) as i32, (dims.y() / 2) as i32);

    let mut frames = [CorridorFrame::default(); MAX_REPEATS as usize];
    let count = corridor.frame_count.min(MAX_REPEATS) as usize;

    for (i, frame) in frames[..count].iter_mut().enumerate() {
        let base_z = gz - 1.0 - i as f64 * frame_spacing + scroll;
        let depth = (base_z / gz).rem_euclid(1.0);
        let scale = globals.size * (0.2 + 0.8 * depth * globals.depth);
        *frame = CorridorFrame {
            z: (base_z.floor() as i64).rem_euclid(i64::from(dims.z())) as i32,
            depth,
            half_width: (gx / 2.0 * scale).floor().clamp(-1.0, gx) as i32,
            half_height: (gy / 2.0 * scale).floor().clamp(-1.0, gy) as i32,
        };
    }

    let frames = &mut frames[..count];
    frames.sort_unstable_by(|a, b| a.depth.total_cmp(&b.depth));

    for frame in frames.iter() {
        if frame.half_width < 0 || frame.half_height < 0 {
            continue;
        }
        let value = (0.3 + 0.7 * frame.depth) as f32;
        let (left, right) = (cx - frame.half_width, cx + frame.half_width);
        let (bottom, top) = (cy - frame.half_height, cy + frame.half_height);

        for x in left..=right {
            buffer.write(x, bottom, frame.z, value);
            buffer.write(x, top, frame.z, value);
        }
        for y in bottom..=top {
            buffer.write(left, y, frame.z, value);
            buffer.write(right, y, frame.z, value);
        }
    }
}

/// Motion aftereffect. Compositing: stripes, then a reference overlay.
///
/// 1. moving stripes: `bandWidth = max(2, floor(5 − 3·density))`; every Z
///    slice with `(z + 10t) mod (2·bandWidth) < bandWidth` is filled at 1.0
/// 2. reference grid: every 5th Y layer is raised to at least
///    `reference_brightness`, so it stays put while the stripes move
pub fn motion_aftereffect(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let stripes = params.record::<MotionAftereffectParams>();
    let dims = buffer.dims();
    let band = (5.0 - 3.0 * globals.density).floor().max(2.0);
    let period = 2.0 * band;
    let phase = STRIPE_SPEED * globals.scaled_time(time);

    for z in 0..dims.z() {
        if (f64::from(z) + phase).rem_euclid(period) >= band {
            continue;
        }
        for y in 0..dims.y() as i32 {
            for x in 0..dims.x() as i32 {
                buffer.write(x, y, z as i32, 1.0);
            }
        }
    }

    let reference = stripes.reference_brightness as f32;
    if reference <= 0.0 {
        return;
    }
    for y in (0..dims.y()).step_by(REFERENCE_EVERY as usize) {
        for z in 0..dims.z() as i32 {
            for x in 0..dims.x() as i32 {
                buffer.raise(x, y as i32, z, reference);
            }
        }
    }
}
