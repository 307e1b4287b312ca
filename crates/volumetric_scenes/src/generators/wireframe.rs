//! # Wireframe Scenes
//!
//! Impossible and ambiguous geometry. Each shape is a handful of 3D edges
//! around the origin; per frame the edges are rotated, moved to the
//! lattice center and sampled at `EDGE_STEP`, with an optional cubic
//! thickening of radius `floor(thickness)`.

use std::f64::consts::FRAC_PI_4;

use volumetric_core::VoxelBuffer;

use crate::geometry::{center, cube_corner, draw_segment, plot, Vec3, CUBE_EDGES};
use crate::params::{
    AmesRoomParams, NeckerCubeParams, PenroseTriangleParams, ResolvedParams, RotationMode,
};

/// Penrose path: along X, then Y, then Z.
const PENROSE_PATH: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// Mean of the path points; the path is drawn around it.
const PENROSE_CENTROID: Vec3 = Vec3::new(0.75, 0.5, 0.25);

/// Unit axes, indexed by beam.
const AXES: [Vec3; 3] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
];

/// Ames room.
///
/// The 12 edges of a box spanning 70% of each axis, Z additionally scaled
/// by `depth`. The left wall (negative X) is shrunk in Y and Z by `taper`,
/// so the box is really a truncated pyramid. Spins about Y at
/// `rotation_rate` rad/s.
pub fn ames_room(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let room = params.record::<AmesRoomParams>();
    if globals.size <= 0.0 {
        return;
    }

    let dims = buffer.dims();
    let reach = 0.35 * globals.size;
    let half = Vec3::new(
        f64::from(dims.x()) * reach,
        f64::from(dims.y()) * reach,
        f64::from(dims.z()) * reach * globals.depth.max(0.0),
    );
    let taper = room.taper.clamp(0.0, 0.95);
    let angle = room.rotation_rate * globals.scaled_time(time);
    let origin = center(buffer);
    let radius = globals.thickness_radius();

    let corners: [Vec3; 8] = std::array::from_fn(|i| {
        let sign = cube_corner(i);
        let shrink = if sign.x < 0.0 { 1.0 - taper } else { 1.0 };
        let local = Vec3::new(sign.x * half.x, sign.y * half.y * shrink, sign.z * half.z * shrink);
        local.rotate_y(angle) + origin
    });

    for (a, b) in CUBE_EDGES {
        draw_segment(buffer, corners[a], corners[b], 1.0, radius);
    }
}

/// Penrose triangle.
///
/// Three square-section beams along X, Y and Z whose open ends line up
/// when viewed down the (1, 1, 1) diagonal. Tilted about X by `tilt`, then
/// rocked about Y around the diagonal view: `π/4 + 0.5·sin(0.5t)`.
pub fn penrose_triangle(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let triangle = params.record::<PenroseTriangleParams>();
    if globals.size <= 0.0 {
        return;
    }

    let t = globals.scaled_time(time);
    let extent = f64::from(buffer.dims().min_axis()) * 0.5 * globals.size;
    let half_width = triangle.beam_width.max(0.0) * extent * 0.5;
    let yaw = FRAC_PI_4 + 0.5 * (0.5 * t).sin();
    let origin = center(buffer);
    let radius = globals.thickness_radius();

    let place = |p: Vec3| ((p - PENROSE_CENTROID) * extent).rotate_x(triangle.tilt).rotate_y(yaw) + origin;

    // Cross-section lines, one voxel apart.
    let steps = half_width.ceil().min(16.0) as i32;
    let spacing = if steps > 0 { half_width / f64::from(steps) } else { 0.0 };

    for (beam, axis) in AXES.iter().enumerate() {
        let u = AXES[(beam + 1) % 3];
        let v = AXES[(beam + 2) % 3];
        let start = PENROSE_PATH[beam];
        let end = start + *axis;

        for du in -steps..=steps {
            for dv in -steps..=steps {
                let offset = (u * f64::from(du) + v * f64::from(dv)) * (spacing / extent);
                draw_segment(buffer, place(start + offset), place(end + offset), 1.0, radius);
            }
        }
    }
}

/// Necker cube.
///
/// A cube spanning 60% of the smallest axis, spun about Y at 0.5 rad/s and,
/// in `dual` mode, about X at 0.3 rad/s. Corners get a marker of at least
/// one voxel radius.
pub fn necker_cube(buffer: &mut VoxelBuffer, time: f64, params: &ResolvedParams) {
    buffer.clear();

    let globals = &params.globals;
    let cube = params.record::<NeckerCubeParams>();
    if globals.size <= 0.0 {
        return;
    }

    let t = globals.scaled_time(time);
    let half = f64::from(buffer.dims().min_axis()) * 0.3 * globals.size;
    let origin = center(buffer);
    let radius = globals.thickness_radius();

    let corners: [Vec3; 8] = std::array::from_fn(|i| {
        let p = (cube_corner(i) * half).rotate_y(0.5 * t);
        let p = match cube.rotation_mode {
            RotationMode::Single => p,
            RotationMode::Dual => p.rotate_x(0.3 * t),
        };
        p + origin
    });

    for (a, b) in CUBE_EDGES {
        draw_segment(buffer, corners[a], corners[b], 1.0, radius);
    }
    for corner in corners {
        plot(buffer, corner, 1.0, radius.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{GlobalParams, ParameterResolver, SessionMemory};
    use crate::registry::SceneKind;
    use volumetric_core::GridDims;

    fn resolver(kind: SceneKind) -> ParameterResolver {
        ParameterResolver::new(GlobalParams::default(), kind)
    }

    fn render(kind: SceneKind, resolver: &ParameterResolver, time: f64) -> VoxelBuffer {
        let params = resolver.resolve(kind, &SessionMemory::new());
        let mut buffer = VoxelBuffer::new(GridDims::new(20, 20, 20).unwrap());
        kind.generator()(&mut buffer, time, &params);
        buffer
    }

    #[test]
    fn test_zero_size_draws_nothing() {
        for kind in [SceneKind::AmesRoom, SceneKind::PenroseTriangle, SceneKind::NeckerCube] {
            let mut resolver = resolver(kind);
            resolver.update("size", 0.0.into());
            assert_eq!(render(kind, &resolver, 1.0).lit_count(), 0, "{kind}");
        }
    }

    #[test]
    fn test_necker_corner_marker() {
        let buffer = render(SceneKind::NeckerCube, &resolver(SceneKind::NeckerCube), 0.0);
        // half = 20 * 0.3 * 0.8 = 4.8, corner at 10 - 4.8 = 5.2
        assert_eq!(buffer.get(5, 5, 5), 1.0);
        assert_eq!(buffer.get(15, 15, 15), 1.0);
        assert_eq!(buffer.get(10, 10, 10), 0.0);
    }

    #[test]
    fn test_necker_modes_diverge_over_time() {
        let mut single = resolver(SceneKind::NeckerCube);
        single.update("rotation_mode", "single".into());
        let dual = resolver(SceneKind::NeckerCube);

        assert_eq!(
            render(SceneKind::NeckerCube, &single, 0.0),
            render(SceneKind::NeckerCube, &dual, 0.0)
        );
        assert_ne!(
            render(SceneKind::NeckerCube, &single, 2.0),
            render(SceneKind::NeckerCube, &dual, 2.0)
        );
    }

    #[test]
    fn test_ames_taper_changes_left_wall() {
        let plain = {
            let mut r = resolver(SceneKind::AmesRoom);
            r.update("taper", 0.0.into());
            render(SceneKind::AmesRoom, &r, 0.0)
        };
        let tapered = render(SceneKind::AmesRoom, &resolver(SceneKind::AmesRoom), 0.0);

        // Left wall top-front corner: x = 10 - 7 = 3, y = z = 10 + 7 = 17.
        assert_eq!(plain.get(3, 17, 17), 1.0);
        assert_eq!(tapered.get(3, 17, 17), 0.0);
        // Right wall is untouched.
        assert_eq!(tapered.get(17, 17, 17), 1.0);
    }

    #[test]
    fn test_ames_rotates() {
        let r = resolver(SceneKind::AmesRoom);
        assert_ne!(
            render(SceneKind::AmesRoom, &r, 0.0),
            render(SceneKind::AmesRoom, &r, 3.0)
        );
    }

    #[test]
    fn test_penrose_draws_beams() {
        let buffer = render(SceneKind::PenroseTriangle, &resolver(SceneKind::PenroseTriangle), 0.0);
        assert!(buffer.lit_count() > 30);
    }

    #[test]
    fn test_thickness_grows_lines() {
        let thin = render(SceneKind::NeckerCube, &resolver(SceneKind::NeckerCube), 0.0);
        let mut r = resolver(SceneKind::NeckerCube);
        r.update("thickness", 1.0.into());
        let thick = render(SceneKind::NeckerCube, &r, 0.0);
        assert!(thick.lit_count() > thin.lit_count());
    }
}
