//! # Voxel Buffer
//!
//! One intensity per lattice point, stored contiguously.
//!
//! Intensities are nominally in `[0, 1]`. Some patterns intentionally write
//! partial values (0.3, 0.5) or slightly more than 1 before the driver
//! clamps; the buffer stores whatever it is given.
//!
//! ## Write Rules
//!
//! - `write`: replaces the value
//! - `blend`: additive, capped at 1 (two independent layers composed)
//! - `raise`: keeps the brighter of old and new (overlays, overlapping objects)
//!
//! All three are no-ops for out-of-range coordinates. Dropped writes are
//! counted so tests and diagnostics can observe them, but they are never
//! an error.

use crate::grid::GridDims;

/// A flat, fixed-size voxel intensity buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelBuffer {
    dims: GridDims,
    data: Vec<f32>,
    dropped_writes: u64,
}

impl VoxelBuffer {
    /// Creates a zeroed buffer for the given lattice.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            data: vec![0.0; dims.len()],
            dropped_writes: 0,
        }
    }

    /// Lattice dimensions (immutable for the buffer's lifetime).
    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Number of voxels.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a buffer has at least one voxel.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sets every voxel to zero and resets the dropped-write counter.
    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.dropped_writes = 0;
    }

    /// Sets every voxel to `value`.
    #[inline]
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Writes a value. Out-of-range coordinates are dropped.
    #[inline]
    pub fn write(&mut self, x: i32, y: i32, z: i32, value: f32) {
        if let Some(i) = self.dims.index(x, y, z) {
            self.data[i] = value;
        } else {
            self.dropped_writes += 1;
        }
    }

    /// Adds a value, capping the result at 1. Out-of-range coordinates are dropped.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, z: i32, value: f32) {
        if let Some(i) = self.dims.index(x, y, z) {
            self.data[i] = (self.data[i] + value).min(1.0);
        } else {
            self.dropped_writes += 1;
        }
    }

    /// Keeps the larger of the current value and `value`.
    /// Out-of-range coordinates are dropped.
    #[inline]
    pub fn raise(&mut self, x: i32, y: i32, z: i32, value: f32) {
        if let Some(i) = self.dims.index(x, y, z) {
            self.data[i] = self.data[i].max(value);
        } else {
            self.dropped_writes += 1;
        }
    }

    /// Reads a value; out-of-range coordinates read as 0.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> f32 {
        self.dims.index(x, y, z).map_or(0.0, |i| self.data[i])
    }

    /// Number of non-zero voxels.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// Writes dropped for being out of range since the last [`VoxelBuffer::clear`].
    #[inline]
    #[must_use]
    pub fn dropped_writes(&self) -> u64 {
        self.dropped_writes
    }

    /// Raw intensities in flattening order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw intensities for whole-frame post-processing.
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Brightest voxel, or 0 for a dark frame.
    #[must_use]
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    /// Raw intensities as native-endian bytes, for a display driver.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Copies another buffer's contents.
    ///
    /// # Panics
    ///
    /// Panics if the two buffers have different dimensions.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.dims, other.dims, "buffer dimensions differ");
        self.data.copy_from_slice(&other.data);
        self.dropped_writes = other.dropped_writes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> GridDims {
        GridDims::new(4, 4, 4).unwrap()
    }

    #[test]
    fn test_new_is_zeroed() {
        let buf = VoxelBuffer::new(dims());
        assert_eq!(buf.len(), 64);
        assert_eq!(buf.lit_count(), 0);
    }

    #[test]
    fn test_write_and_get() {
        let mut buf = VoxelBuffer::new(dims());
        buf.write(1, 2, 3, 0.75);
        assert_eq!(buf.get(1, 2, 3), 0.75);
        assert_eq!(buf.as_slice()[1 + 2 * 4 + 3 * 16], 0.75);
        assert_eq!(buf.lit_count(), 1);
    }

    #[test]
    fn test_out_of_range_write_is_noop() {
        let mut buf = VoxelBuffer::new(dims());
        buf.write(-1, 0, 0, 1.0);
        buf.write(4, 0, 0, 1.0);
        buf.blend(0, 4, 0, 1.0);
        buf.raise(0, 0, 99, 1.0);
        assert_eq!(buf.lit_count(), 0);
        assert_eq!(buf.dropped_writes(), 4);
        assert_eq!(buf.get(-1, 0, 0), 0.0);
    }

    #[test]
    fn test_blend_caps_at_one() {
        let mut buf = VoxelBuffer::new(dims());
        buf.blend(0, 0, 0, 0.5);
        assert_eq!(buf.get(0, 0, 0), 0.5);
        buf.blend(0, 0, 0, 0.5);
        assert_eq!(buf.get(0, 0, 0), 1.0);
        buf.blend(0, 0, 0, 0.5);
        assert_eq!(buf.get(0, 0, 0), 1.0);
    }

    #[test]
    fn test_raise_keeps_brighter() {
        let mut buf = VoxelBuffer::new(dims());
        buf.write(0, 0, 0, 0.6);
        buf.raise(0, 0, 0, 0.3);
        assert_eq!(buf.get(0, 0, 0), 0.6);
        buf.raise(0, 0, 0, 0.9);
        assert_eq!(buf.get(0, 0, 0), 0.9);
    }

    #[test]
    fn test_clear_resets_values_and_counter() {
        let mut buf = VoxelBuffer::new(dims());
        buf.fill(0.4);
        buf.write(-5, 0, 0, 1.0);
        buf.clear();
        assert!(buf.as_slice().iter().all(|&v| v == 0.0));
        assert_eq!(buf.dropped_writes(), 0);
    }

    #[test]
    fn test_as_bytes_length() {
        let buf = VoxelBuffer::new(dims());
        assert_eq!(buf.as_bytes().len(), 64 * 4);
    }

    #[test]
    fn test_max_value_and_slice_access() {
        let mut buffer = VoxelBuffer::new(dims());
        assert_eq!(buffer.max_value(), 0.0);

        buffer.write(1, 1, 1, 0.4);
        buffer.write(2, 0, 3, 0.9);
        assert_eq!(buffer.max_value(), 0.9);

        for v in buffer.as_mut_slice() {
            *v *= 0.5;
        }
        assert_eq!(buffer.get(2, 0, 3), 0.45);
        assert_eq!(buffer.lit_count(), 2);
    }

    #[test]
    fn test_copy_from() {
        let mut a = VoxelBuffer::new(dims());
        let mut b = VoxelBuffer::new(dims());
        a.write(2, 2, 2, 1.0);
        b.copy_from(&a);
        assert_eq!(a, b);
    }
}
