//! # Grid Dimensions
//!
//! The lattice is `x × y × z` points. A point `(x, y, z)` is stored at
//! flat index `x + y * X + z * X * Y`, so X varies fastest.
//!
//! Coordinates are accepted as `i32` everywhere: geometric projection and
//! rotation routinely produce negative or overflowing positions, and those
//! must be representable so they can be rejected.

use std::fmt;

use crate::error::GridError;

/// Largest lattice this crate will allocate (256³ points).
pub const MAX_VOXELS: u64 = 256 * 256 * 256;

/// A lattice axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Width axis (fastest varying in memory).
    X,
    /// Height axis.
    Y,
    /// Depth axis (slowest varying in memory).
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(name)
    }
}

/// Validated lattice dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    x: u32,
    y: u32,
    z: u32,
}

impl GridDims {
    /// Creates validated dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroDimension`] if any axis is zero and
    /// [`GridError::TooLarge`] if the lattice exceeds [`MAX_VOXELS`].
    pub fn new(x: u32, y: u32, z: u32) -> Result<Self, GridError> {
        for (axis, len) in [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)] {
            if len == 0 {
                return Err(GridError::ZeroDimension { axis });
            }
        }

        let voxels = u64::from(x) * u64::from(y) * u64::from(z);
        if voxels > MAX_VOXELS {
            return Err(GridError::TooLarge {
                voxels,
                max: MAX_VOXELS,
            });
        }

        Ok(Self { x, y, z })
    }

    /// Width (X extent).
    #[inline]
    #[must_use]
    pub const fn x(self) -> u32 {
        self.x
    }

    /// Height (Y extent).
    #[inline]
    #[must_use]
    pub const fn y(self) -> u32 {
        self.y
    }

    /// Depth (Z extent).
    #[inline]
    #[must_use]
    pub const fn z(self) -> u32 {
        self.z
    }

    /// Total number of lattice points.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Always false; validated dimensions are never empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Smallest of the three extents.
    #[inline]
    #[must_use]
    pub fn min_axis(self) -> u32 {
        self.x.min(self.y).min(self.z)
    }

    /// Geometric center used by generators (`extent / 2` on each axis).
    #[inline]
    #[must_use]
    pub fn center(self) -> (f64, f64, f64) {
        (
            f64::from(self.x) / 2.0,
            f64::from(self.y) / 2.0,
            f64::from(self.z) / 2.0,
        )
    }

    /// Returns true if the coordinate lies inside the lattice.
    #[inline]
    #[must_use]
    pub fn contains(self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as u32) < self.x
            && (y as u32) < self.y
            && (z as u32) < self.z
    }

    /// Flat index of a coordinate, or `None` if it is out of range.
    #[inline]
    #[must_use]
    pub fn index(self, x: i32, y: i32, z: i32) -> Option<usize> {
        if self.contains(x, y, z) {
            let (x, y, z) = (x as usize, y as usize, z as usize);
            let (w, h) = (self.x as usize, self.y as usize);
            Some(x + y * w + z * w * h)
        } else {
            None
        }
    }

    /// Inverse of [`GridDims::index`].
    #[inline]
    #[must_use]
    pub fn coords(self, index: usize) -> Option<(u32, u32, u32)> {
        if index >= self.len() {
            return None;
        }
        let (w, h) = (self.x as usize, self.y as usize);
        let x = index % w;
        let y = (index / w) % h;
        let z = index / (w * h);
        Some((x as u32, y as u32, z as u32))
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}
