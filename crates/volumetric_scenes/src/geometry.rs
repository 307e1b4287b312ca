//! # Geometry Helpers
//!
//! Rotation, rasterisation and extrusion shared by the generators.
//!
//! Every position here is a real-valued lattice coordinate. Rasterising
//! rounds to the nearest voxel; non-finite or out-of-range positions are
//! dropped by the buffer, never wrapped.

use std::ops::{Add, Mul, Sub};

use volumetric_core::VoxelBuffer;

/// Parametric step used to sample wireframe edges.
pub const EDGE_STEP: f64 = 0.05;

/// Samples per edge, including both end points.
const EDGE_SAMPLES: i32 = 20;

/// A point or direction in lattice space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Creates a vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Rotates about the X axis (in the Y/Z plane).
    #[inline]
    #[must_use]
    pub fn rotate_x(self, angle: f64) -> Self {
        let (y, z) = rotate2(self.y, self.z, angle);
        Self::new(self.x, y, z)
    }

    /// Rotates about the Y axis (in the X/Z plane).
    #[inline]
    #[must_use]
    pub fn rotate_y(self, angle: f64) -> Self {
        let (x, z) = rotate2(self.x, self.z, angle);
        Self::new(x, self.y, z)
    }

    /// Rotates about the Z axis (in the X/Y plane).
    #[inline]
    #[must_use]
    pub fn rotate_z(self, angle: f64) -> Self {
        let (x, y) = rotate2(self.x, self.y, angle);
        Self::new(x, y, self.z)
    }

    /// Linear interpolation from `self` to `other`.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Standard 2D rotation of `(a, b)` by `angle` radians.
#[inline]
#[must_use]
pub fn rotate2(a: f64, b: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (a * cos - b * sin, a * sin + b * cos)
}

/// Nearest voxel coordinate, or `None` for NaN and infinities.
#[inline]
#[must_use]
pub fn voxel(v: f64) -> Option<i32> {
    // `as` saturates, so huge values land out of range and get dropped.
    v.is_finite().then(|| v.round() as i32)
}

/// Triangle wave with the period and range of `sin`.
#[inline]
#[must_use]
pub fn triangle_wave(x: f64) -> f64 {
    std::f64::consts::FRAC_2_PI * x.sin().asin()
}

/// Lattice center as a vector.
#[inline]
#[must_use]
pub fn center(buffer: &VoxelBuffer) -> Vec3 {
    let (x, y, z) = buffer.dims().center();
    Vec3::new(x, y, z)
}

/// Raises the voxel nearest `p`, and its cubic neighbourhood of `radius`.
pub fn plot(buffer: &mut VoxelBuffer, p: Vec3, value: f32, radius: i32) {
    let (Some(x), Some(y), Some(z)) = (voxel(p.x), voxel(p.y), voxel(p.z)) else {
        return;
    };
    for dz in -radius..=radius {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                buffer.raise(x.saturating_add(dx), y.saturating_add(dy), z.saturating_add(dz), value);
            }
        }
    }
}

/// Samples the segment `a → b` at [`EDGE_STEP`] and plots each sample.
pub fn draw_segment(buffer: &mut VoxelBuffer, a: Vec3, b: Vec3, value: f32, radius: i32) {
    for i in 0..=EDGE_SAMPLES {
        let t = f64::from(i) / f64::from(EDGE_SAMPLES);
        plot(buffer, a.lerp(b, t), value, radius);
    }
}

/// Edges of a cube whose corner `i` has its X/Y/Z sign in bits 0/1/2.
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Unit sign vector of cube corner `i` (each component ±1).
#[inline]
#[must_use]
pub fn cube_corner(i: usize) -> Vec3 {
    let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
    Vec3::new(sign(1), sign(2), sign(4))
}

/// Writes `value` at `(x, y)` through every Z layer.
#[inline]
pub fn extrude_z(buffer: &mut VoxelBuffer, x: i32, y: i32, value: f32) {
    for z in 0..buffer.dims().z() as i32 {
        buffer.write(x, y, z, value);
    }
}

/// Raises `(x, y)` to at least `value` through every Z layer.
#[inline]
pub fn extrude_z_raise(buffer: &mut VoxelBuffer, x: i32, y: i32, value: f32) {
    for z in 0..buffer.dims().z() as i32 {
        buffer.raise(x, y, z, value);
    }
}

/// Writes `value` at `(x, z)` through every Y layer.
#[inline]
pub fn extrude_y(buffer: &mut VoxelBuffer, x: i32, z: i32, value: f32) {
    for y in 0..buffer.dims().y() as i32 {
        buffer.write(x, y, z, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use volumetric_core::GridDims;

    fn buffer() -> VoxelBuffer {
        VoxelBuffer::new(GridDims::new(8, 8, 8).unwrap())
    }

    #[test]
    fn test_rotate2_quarter_turn() {
        let (a, b) = rotate2(1.0, 0.0, FRAC_PI_2);
        assert!(a.abs() < 1e-12);
        assert!((b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_voxel_rejects_non_finite() {
        assert_eq!(voxel(2.4), Some(2));
        assert_eq!(voxel(-0.6), Some(-1));
        assert_eq!(voxel(f64::NAN), None);
        assert_eq!(voxel(f64::INFINITY), None);
        assert_eq!(voxel(1e30), Some(i32::MAX));
    }

    #[test]
    fn test_segment_endpoints_lit() {
        let mut buf = buffer();
        draw_segment(&mut buf, Vec3::new(1.0, 1.0, 1.0), Vec3::new(6.0, 1.0, 1.0), 1.0, 0);
        for x in 1..=6 {
            assert_eq!(buf.get(x, 1, 1), 1.0);
        }
        assert_eq!(buf.lit_count(), 6);
    }

    #[test]
    fn test_plot_radius_is_cubic() {
        let mut buf = buffer();
        plot(&mut buf, Vec3::new(4.0, 4.0, 4.0), 0.5, 1);
        assert_eq!(buf.lit_count(), 27);
    }

    #[test]
    fn test_plot_at_edge_drops_outside() {
        let mut buf = buffer();
        plot(&mut buf, Vec3::new(0.0, 0.0, 0.0), 1.0, 1);
        assert_eq!(buf.lit_count(), 8);
        assert_eq!(buf.dropped_writes(), 19);
    }

    #[test]
    fn test_cube_edges_differ_in_one_axis() {
        for (a, b) in CUBE_EDGES {
            assert_eq!((a ^ b).count_ones(), 1);
            let d = cube_corner(a) - cube_corner(b);
            let moved = [d.x, d.y, d.z].iter().filter(|c| **c != 0.0).count();
            assert_eq!(moved, 1);
        }
    }

    #[test]
    fn test_triangle_wave_range() {
        assert!((triangle_wave(FRAC_PI_2) - 1.0).abs() < 1e-12);
        assert!(triangle_wave(0.0).abs() < 1e-12);
        assert!((triangle_wave(-FRAC_PI_2) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extrusion() {
        let mut buf = buffer();
        extrude_z(&mut buf, 2, 3, 1.0);
        extrude_y(&mut buf, 5, 5, 0.5);
        assert_eq!(buf.lit_count(), 16);
        assert_eq!(buf.get(2, 3, 7), 1.0);
        assert_eq!(buf.get(5, 0, 5), 0.5);
    }
}
