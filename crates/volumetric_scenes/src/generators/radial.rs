//! # Radial Scenes
//!
//! Rings and closed curves in polar coordinates around the lattice
//! center, converted to Cartesian with a time-dependent angular offset.
//! The illusion comes from brightness or position varying with angle.

use std::f64::consts::TAU;

use volumetric_core::VoxelBuffer;

use super::MAX_REPEATS;
use crate::geometry::{center, extrude_z_raise, plot, triangle_wave, voxel, Vec3};
use crate::params::{
    FraserSpiralParams, KineticDepthParams, PulfrichParams, ResolvedParams, RotatingSnakesParams,
    WaveKind,
};

/// Samples per kinetic-depth loop.
const WAVE_SAMPLES: u32 = 100;

/// Brightness cycle of the rotating-snakes segments.
const SNAKE_STEPS: [f32; 4] = [0.15, 0.45, 1.0, 0.7];

/// Angular speed of the snake rings, rad/s.
const SNAKE_SPIN: f64 = 0.2;

/// Largest segment count per snake ring.
const MAX_SEGMENTS: u32 = 256;

/// Samples per Fraser dash.
const DASH_SAMPLES: u32 = 6;

/// Kinetic-depth waves.
///
/// `wave_count` closed loops on a circle of radius `0.4·min(gx, gz)·size`
/// in the X/Z plane, each displaced in Y by `amplitude·gy/2` times a
/// waveform of `3·frequency·θ + phase`. Loops are evenly phase-shifted
/// and the whole set turns about Y at 0.5 rad/s. Flat in any single
/// frame, the depth only reads when it moves.
pub fn kinetic_depth(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let waves = params.record::<KineticDepthParams>();
    let dims = buffer.dims();
    let radius = 0.4 * f64::from(dims.x().min(dims.z())) * globals.size;
    if radius <= 0.0 {
        return;
    }

    let t = globals.scaled_time(time);
    let height = globals.amplitude * f64::from(dims.y()) / 2.0;
    let lobes = 3.0 * globals.frequency;
    let spin = 0.5 * t;
    let origin = center(buffer);
    let count = waves.wave_count.min(MAX_REPEATS);

    for wave in 0..count {
        let phase = f64::from(wave) / f64::from(count) * TAU + t;
        for i in 0..WAVE_SAMPLES {
            let theta = f64::from(i) / f64::from(WAVE_SAMPLES) * TAU;
            let arg = lobes * theta + phase;
            let lift = match waves.wave_kind {
                WaveKind::Sine => arg.sin(),
                WaveKind::Triangle => triangle_wave(arg),
            };
            let p = Vec3::new(radius * theta.cos(), height * lift, radius * theta.sin());
            plot(buffer, p.rotate_y(spin) + origin, 1.0, 0);
        }
    }
}

/// Pulfrich effect.
///
/// `object_count` spheres of radius `floor(1 + 2·size)` orbiting the
/// center in the X/Y plane on radius `min(gx, gy)·(0.15 + 0.3·density)`.
/// Brightness follows `0.5 + 0.5·sin(angle)`, and spheres at or below 0.3
/// are skipped, so a viewer with one eye filtered sees the orbit tilt in
/// depth. Overlapping spheres keep the brighter value.
pub fn pulfrich(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let orbit = params.record::<PulfrichParams>();
    if globals.size <= 0.0 {
        return;
    }

    let dims = buffer.dims();
    let t = globals.scaled_time(time);
    let orbit_radius = f64::from(dims.x().min(dims.y())) * (0.15 + 0.3 * globals.density);
    let sphere = (1.0 + 2.0 * globals.size).floor().min(f64::from(dims.min_axis())) as i32;
    let origin = center(buffer);
    let count = orbit.object_count.min(MAX_REPEATS);

    for i in 0..count {
        let angle = t + f64::from(i) / f64::from(count) * TAU;
        let brightness = 0.5 + 0.5 * angle.sin();
        if brightness <= 0.3 {
            continue;
        }

        let p = origin + Vec3::new(orbit_radius * angle.cos(), orbit_radius * angle.sin(), 0.0);
        let (Some(x), Some(y), Some(z)) = (voxel(p.x), voxel(p.y), voxel(p.z)) else {
            continue;
        };

        for dz in -sphere..=sphere {
            for dy in -sphere..=sphere {
                for dx in -sphere..=sphere {
                    if dx * dx + dy * dy + dz * dz <= sphere * sphere {
                        buffer.raise(
                            x.saturating_add(dx),
                            y.saturating_add(dy),
                            z.saturating_add(dz),
                            brightness as f32,
                        );
                    }
                }
            }
        }
    }
}

/// Rotating snakes.
///
/// `ring_count` concentric rings in the X/Z plane, repeated on every Y
/// layer. Each ring is cut into `segment_count` segments whose brightness
/// walks the 4-step cycle `[0.15, 0.45, 1.0, 0.7]`, indexed by
/// `(segment + ring + y) mod 4`. Alternate rings turn in opposite
/// directions at 0.2 rad/s.
pub fn rotating_snakes(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let snakes = params.record::<RotatingSnakesParams>();
    let dims = buffer.dims();
    let outer = 0.45 * f64::from(dims.x().min(dims.z())) * globals.size;
    let rings = snakes.ring_count.min(MAX_REPEATS);
    let segments = snakes.segment_count.min(MAX_SEGMENTS);
    if outer <= 0.0 || rings == 0 || segments == 0 {
        return;
    }

    let t = globals.scaled_time(time);
    let origin = center(buffer);

    for ring in 0..rings {
        let r = outer * f64::from(ring + 1) / f64::from(rings);
        let direction = if ring % 2 == 0 { 1.0 } else { -1.0 };
        let offset = direction * SNAKE_SPIN * t;
        let samples = (segments * 4).max((TAU * r * 2.0).ceil().min(4096.0) as u32);

        for i in 0..samples {
            let theta = f64::from(i) / f64::from(samples) * TAU;
            let segment = (u64::from(i) * u64::from(segments) / u64::from(samples)) as u32;
            let world = theta + offset;
            let (Some(x), Some(z)) = (
                voxel(origin.x + r * world.cos()),
                voxel(origin.z + r * world.sin()),
            ) else {
                continue;
            };

            for y in 0..dims.y() {
                let step = (segment + ring + y) % 4;
                buffer.write(x, y as i32, z, SNAKE_STEPS[step as usize]);
            }
        }
    }
}

/// Fraser spiral.
///
/// `ring_count` concentric rings in the X/Y plane, extruded through Z.
/// Each ring is a chain of short dashes; along a dash the radius drifts
/// outwards in proportion to `twist`, which makes the rings read as a
/// spiral. Dashes alternate between 1.0 and 0.5 and the rings turn at
/// `0.3·frequency` rad/s.
pub fn fraser_spiral(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let spiral = params.record::<FraserSpiralParams>();
    let dims = buffer.dims();
    let outer = 0.45 * f64::from(dims.x().min(dims.y())) * globals.size;
    let rings = spiral.ring_count.min(MAX_REPEATS);
    if outer <= 0.0 || rings == 0 {
        return;
    }

    let t = globals.scaled_time(time);
    let rotation = 0.3 * globals.frequency * t;
    let gap = outer / f64::from(rings);
    let origin = center(buffer);

    for ring in 0..rings {
        let r = gap * f64::from(ring + 1);
        let dashes = ((TAU * r / 3.0).round() as u32).clamp(8, 512);
        let arc = TAU / f64::from(dashes);

        for dash in 0..dashes {
            let value = if dash % 2 == 0 { 1.0 } else { 0.5 };
            for k in 0..=DASH_SAMPLES {
                let s = f64::from(k) / f64::from(DASH_SAMPLES);
                let theta = f64::from(dash) * arc + s * arc * 0.8 + rotation;
                let radial = r + (s - 0.5) * spiral.twist * gap;
                let (Some(x), Some(y)) = (
                    voxel(origin.x + radial * theta.cos()),
                    voxel(origin.y + radial * theta.sin()),
                ) else {
                    continue;
                };
                extrude_z_raise(buffer, x, y, value);
            }
        }
    }
}
