//! # Tiling Scenes
//!
//! Tile patterns on a plane, extruded through the remaining axis. Tile
//! color is decided by tile-index parity.

use volumetric_core::VoxelBuffer;

use crate::geometry::{extrude_y, extrude_z};
use crate::params::{BreathingSquareParams, CafeWallParams, MoirePatternParams, ResolvedParams};

/// Brightness of café-wall mortar lines.
const MORTAR: f32 = 0.3;

/// Brightness of each moiré layer.
const MOIRE_LAYER: f32 = 0.5;

/// Breathing-square values below this are not written.
const BREATH_FLOOR: f64 = 0.05;

/// Converts a non-negative tile size to `i32`, or `None` below one voxel.
#[inline]
fn tile_size(raw: f64) -> Option<i32> {
    let tile = raw.floor();
    (tile >= 1.0).then(|| tile.min(f64::from(i32::MAX)) as i32)
}

/// Café wall.
///
/// `tile = floor(gx·size·spacing/4)`. Rows are bands of `tile` voxels in Y;
/// odd bands shift right by `tile/2`. A tile is lit when its column index
/// is even. With `mortar` on, the first row of every band after the first
/// is a constant dim mortar line across the whole width.
pub fn cafe_wall(buffer: &mut VoxelBuffer, _time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let wall = params.record::<CafeWallParams>();
    let dims = buffer.dims();
    let Some(tile) = tile_size(f64::from(dims.x()) * globals.size * globals.spacing / 4.0) else {
        return;
    };
    let offset = tile / 2;

    for y in 0..dims.y() as i32 {
        let band = y / tile;
        let shift = if band % 2 == 1 { offset } else { 0 };
        if wall.mortar && y > 0 && y % tile == 0 {
            for x in 0..dims.x() as i32 {
                extrude_z(buffer, x, y, MORTAR);
            }
            continue;
        }

        for x in 0..dims.x() as i32 {
            let column = (x - shift).div_euclid(tile);
            if column.rem_euclid(2) == 0 {
                extrude_z(buffer, x, y, 1.0);
            }
        }
    }
}

/// Breathing square.
///
/// A checkerboard with `tile = max(1, floor(min(gx, gy)·size/8))`. Lit
/// tiles take `pulse·(1 − pulse_depth·dist/maxDist)` where
/// `pulse = 0.5 + 0.5·sin(π·frequency·t)` and `dist` is the distance from
/// the center in the X/Y plane. Values below 0.05 are left dark.
pub fn breathing_square(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let square = params.record::<BreathingSquareParams>();
    if globals.size <= 0.0 {
        return;
    }

    let dims = buffer.dims();
    let tile = tile_size(f64::from(dims.x().min(dims.y())) * globals.size / 8.0).unwrap_or(1);
    let t = globals.scaled_time(time);
    let pulse = 0.5 + 0.5 * (std::f64::consts::PI * globals.frequency * t).sin();
    let (cx, cy, _) = dims.center();
    let max_dist = cx.hypot(cy);

    for y in 0..dims.y() as i32 {
        for x in 0..dims.x() as i32 {
            if (x / tile + y / tile) % 2 != 0 {
                continue;
            }
            let dist = (f64::from(x) - cx).hypot(f64::from(y) - cy);
            let value = pulse * (1.0 - square.pulse_depth * dist / max_dist);
            if value < BREATH_FLOOR {
                continue;
            }
            extrude_z(buffer, x, y, value.min(1.0) as f32);
        }
    }
}

/// Moiré interference. Compositing: two layers, additive.
///
/// `g = max(2, floor(3·spacing))`. After the clear:
///
/// 1. static layer: planes `x ≡ 0 (mod g)` written at 0.5
/// 2. rotated layer: the same planes rotated about the lattice center in
///    the X/Z plane by `rotation_rate·t`, added with `blend` (0.5, capped
///    at 1)
///
/// Where both layers hit a voxel it reads 1.0; where one does, 0.5.
pub fn moire_pattern(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let moire = params.record::<MoirePatternParams>();
    let dims = buffer.dims();
    let spacing = (3.0 * globals.spacing).floor().clamp(2.0, f64::from(i32::MAX)) as i32;
    let angle = moire.rotation_rate * globals.scaled_time(time);
    let (sin, cos) = angle.sin_cos();
    let (cx, _, cz) = dims.center();

    for x in (0..dims.x() as i32).filter(|x| x % spacing == 0) {
        for z in 0..dims.z() as i32 {
            extrude_y(buffer, x, z, MOIRE_LAYER);
        }
    }

    for z in 0..dims.z() as i32 {
        for x in 0..dims.x() as i32 {
            let rx = cx + (f64::from(x) - cx) * cos - (f64::from(z) - cz) * sin;
            if !rx.is_finite() || (rx.floor() as i64).rem_euclid(i64::from(spacing)) != 0 {
                continue;
            }
            for y in 0..dims.y() as i32 {
                buffer.blend(x, y, z, MOIRE_LAYER);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{GlobalParams, ParameterResolver, SessionMemory};
    use crate::registry::SceneKind;
    use volumetric_core::GridDims;

    fn render(kind: SceneKind, dims: (u32, u32, u32), updates: &[(&str, f64)], time: f64) -> VoxelBuffer {
        let mut resolver = ParameterResolver::new(GlobalParams::default(), kind);
        for (name, value) in updates {
            resolver.update(name, (*value).into());
        }
        let params = resolver.resolve(kind, &SessionMemory::new());
        let mut buffer = VoxelBuffer::new(GridDims::new(dims.0, dims.1, dims.2).unwrap());
        kind.generator()(&mut buffer, time, &params);
        buffer
    }

    #[test]
    fn test_cafe_wall_tiles() {
        // tile = floor(12 * 1 * 1 / 4) = 3, offset = 1
        let buffer = render(SceneKind::CafeWall, (12, 6, 12), &[], 0.0);

        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(buffer.get(x, y, 0), 1.0, "({x}, {y})");
            }
            for x in 3..6 {
                assert_eq!(buffer.get(x, y, 0), 0.0, "({x}, {y})");
            }
        }

        // Second band is shifted right by one.
        for y in 4..6 {
            assert_eq!(buffer.get(0, y, 0), 0.0);
            for x in 1..4 {
                assert_eq!(buffer.get(x, y, 0), 1.0, "({x}, {y})");
            }
            for x in 4..7 {
                assert_eq!(buffer.get(x, y, 0), 0.0, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_cafe_wall_mortar_row() {
        let buffer = render(SceneKind::CafeWall, (12, 6, 12), &[], 0.0);
        // The mortar row is constant across x, over light and dark tiles alike.
        for z in [0, 5, 11] {
            let row: Vec<f32> = (0..12).map(|x| buffer.get(x, 3, z)).collect();
            assert_eq!(row, vec![MORTAR; 12], "z = {z}");
        }
        // Rows on either side keep their tiles.
        assert_eq!(buffer.get(0, 2, 5), 1.0);
        assert_eq!(buffer.get(1, 4, 5), 1.0);
    }

    #[test]
    fn test_cafe_wall_without_mortar() {
        let mut resolver = ParameterResolver::new(GlobalParams::default(), SceneKind::CafeWall);
        resolver.update("mortar", false.into());
        let params = resolver.resolve(SceneKind::CafeWall, &SessionMemory::new());
        let mut buffer = VoxelBuffer::new(GridDims::new(12, 6, 12).unwrap());
        cafe_wall(&mut buffer, 0.0, &params);

        assert!(buffer.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_cafe_wall_extruded() {
        let buffer = render(SceneKind::CafeWall, (12, 6, 12), &[], 0.0);
        for z in 0..12 {
            assert_eq!(buffer.get(0, 0, z), 1.0);
        }
    }

    #[test]
    fn test_cafe_wall_tiny_tile_draws_nothing() {
        let buffer = render(SceneKind::CafeWall, (12, 6, 12), &[("size", 0.2)], 0.0);
        assert_eq!(buffer.lit_count(), 0);
    }

    #[test]
    fn test_moire_coincident_grids_add() {
        // spacing 1 => g = 3; at t = 0 both grids coincide.
        let buffer = render(SceneKind::MoirePattern, (10, 10, 10), &[], 0.0);
        for x in 0..10 {
            let expected = if x % 3 == 0 { 1.0 } else { 0.0 };
            assert_eq!(buffer.get(x, 4, 7), expected, "x = {x}");
        }
    }

    #[test]
    fn test_moire_single_layer_is_half() {
        let buffer = render(SceneKind::MoirePattern, (10, 10, 10), &[("rotation_rate", 1.0)], 0.4);
        let values = buffer.as_slice();
        assert!(values.iter().all(|&v| v == 0.0 || v == 0.5 || v == 1.0));
        assert!(values.contains(&0.5));
    }

    #[test]
    fn test_breathing_square_pulse() {
        // frequency 1: sin(π t) peaks at t = 0.5, bottoms out at t = 1.5.
        let bright = render(SceneKind::BreathingSquare, (16, 16, 4), &[], 0.5);
        let dark = render(SceneKind::BreathingSquare, (16, 16, 4), &[], 1.5);
        assert!(bright.lit_count() > 0);
        assert_eq!(dark.lit_count(), 0);
    }

    #[test]
    fn test_breathing_square_checkerboard() {
        // tile = floor(16 / 8) = 2
        let buffer = render(SceneKind::BreathingSquare, (16, 16, 4), &[("pulse_depth", 0.0)], 0.5);
        assert_eq!(buffer.get(0, 0, 0), 1.0);
        assert_eq!(buffer.get(1, 1, 0), 1.0);
        assert_eq!(buffer.get(2, 0, 0), 0.0);
        assert_eq!(buffer.get(2, 2, 3), 1.0);
    }

    #[test]
    fn test_breathing_square_dims_towards_edge() {
        let buffer = render(SceneKind::BreathingSquare, (16, 16, 4), &[], 0.5);
        assert!(buffer.get(8, 8, 0) > buffer.get(0, 0, 0));
    }
}
