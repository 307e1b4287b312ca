//! # Triple-Buffered Voxel Frames
//!
//! Lock-free handoff of completed frames from the frame loop to the
//! display driver.
//!
//! ## Safety Note
//!
//! This module requires unsafe code for lock-free buffering.
//! All unsafe blocks are documented with the invariant they rely on.

#![allow(unsafe_code)]
//!
//! ## Architecture
//!
//! ```text
//!                ┌───────────────────────────────────────────┐
//!                │               FrameBuffers                │
//!                │                                           │
//!                │  ┌─────────┐  ┌─────────┐  ┌─────────┐   │
//!                │  │ Voxels 0│  │ Voxels 1│  │ Voxels 2│   │
//!                │  │ readers │  │ readers │  │ readers │   │
//!                │  └────┬────┘  └────┬────┘  └────┬────┘   │
//!                │       └────────────┼────────────┘        │
//!                │          ┌─────────┴──────────┐          │
//!                │          │ Atomic latest index│          │
//!                │          └────────────────────┘          │
//!                └───────────────────────────────────────────┘
//!                                     │
//!              ┌──────────────────────┼──────────────────────┐
//!              ▼                      ▼                      ▼
//!      ┌──────────────┐       ┌──────────────┐       ┌──────────────┐
//!      │ WriteHandle  │       │  ReadHandle  │       │   publish    │
//!      │ (frame loop) │       │   (driver)   │       │ (index store)│
//!      └──────────────┘       └──────────────┘       └──────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! - `FrameWriteHandle`: exclusive access to a buffer that is neither the
//!   latest frame nor held by any reader (one writer at a time)
//! - `FrameReadHandle`: shared access to the latest frame (many allowed)
//! - `FrameWriteHandle::publish`: a single atomic store of the latest index.
//!   It never waits for readers and never fails
//!
//! A reader registers on the latest buffer, then confirms it is still the
//! latest. The writer only picks a buffer that is not the latest and has
//! no registered reader. Both steps are sequentially consistent, so a
//! reader that raced the writer's pick sees the index move and retries
//! before touching the buffer. No reader ever sees a frame being written.
//!
//! With one driver holding at most one frame, one of the two non-latest
//! buffers is always free, so the loop publishes every frame.

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::buffer::VoxelBuffer;
use crate::error::FrameError;
use crate::grid::GridDims;

/// Number of buffers in rotation.
const BUFFERS: usize = 3;

/// Triple-buffered voxel frames for lock-free handoff.
///
/// ## Usage
///
/// ```rust,ignore
/// let frames = FrameBuffers::new(dims);
///
/// // Frame loop
/// let mut write = frames.write_handle()?;
/// write.clear();
/// write.write(1, 2, 3, 1.0);
/// write.publish();
///
/// // Driver thread
/// let read = frames.read_handle();
/// driver.emit(read.as_bytes());
/// drop(read);
/// ```
pub struct FrameBuffers {
    /// The voxel buffers.
    /// Using UnsafeCell because exclusive access is guaranteed through handles.
    buffers: [UnsafeCell<VoxelBuffer>; BUFFERS],

    /// Active read handles per buffer.
    readers: [AtomicUsize; BUFFERS],

    /// Index of the most recently published buffer.
    latest: AtomicUsize,

    /// Whether a write handle is currently held.
    write_locked: AtomicBool,

    /// Number of frames published.
    frame_count: AtomicU64,
}

impl FrameBuffers {
    /// Creates three zeroed buffers for the given lattice. Buffer 0 is
    /// the initial, blank frame.
    #[must_use]
    pub fn new(dims: GridDims) -> Arc<Self> {
        Arc::new(Self {
            buffers: [
                UnsafeCell::new(VoxelBuffer::new(dims)),
                UnsafeCell::new(VoxelBuffer::new(dims)),
                UnsafeCell::new(VoxelBuffer::new(dims)),
            ],
            readers: [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)],
            latest: AtomicUsize::new(0),
            write_locked: AtomicBool::new(false),
            frame_count: AtomicU64::new(0),
        })
    }

    /// Number of frames published so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    /// Returns whether a write handle is currently active.
    #[inline]
    #[must_use]
    pub fn is_writing(&self) -> bool {
        self.write_locked.load(Ordering::Acquire)
    }

    /// Returns the number of active read handles across all buffers.
    #[must_use]
    pub fn readers(&self) -> usize {
        self.readers.iter().map(|count| count.load(Ordering::SeqCst)).sum()
    }

    /// Index of the buffer new readers will get.
    #[inline]
    #[must_use]
    pub fn latest_index(&self) -> usize {
        self.latest.load(Ordering::SeqCst)
    }

    /// Acquires a free buffer to write the next frame into.
    ///
    /// The returned buffer holds stale contents; generators clear it.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::WriterActive`] if another write handle is
    /// alive, and [`FrameError::NoFreeBuffer`] if readers hold every buffer
    /// except the latest one.
    pub fn write_handle(self: &Arc<Self>) -> Result<FrameWriteHandle, FrameError> {
        if self.write_locked.swap(true, Ordering::AcqRel) {
            return Err(FrameError::WriterActive);
        }

        // Only the writer moves `latest`, so it cannot change under us.
        let latest = self.latest.load(Ordering::SeqCst);
        let free = (0..BUFFERS)
            .filter(|&index| index != latest)
            .find(|&index| self.readers[index].load(Ordering::SeqCst) == 0);

        match free {
            Some(buffer_index) => Ok(FrameWriteHandle {
                frames: Arc::clone(self),
                buffer_index,
            }),
            None => {
                self.write_locked.store(false, Ordering::Release);
                Err(FrameError::NoFreeBuffer { readers: self.readers() })
            }
        }
    }

    /// Acquires the latest published frame.
    ///
    /// Multiple read handles can coexist and never block publishing.
    /// Before the first publish this is a blank frame.
    #[must_use]
    pub fn read_handle(self: &Arc<Self>) -> FrameReadHandle {
        loop {
            let index = self.latest.load(Ordering::SeqCst);
            self.readers[index].fetch_add(1, Ordering::SeqCst);
            if self.latest.load(Ordering::SeqCst) == index {
                return FrameReadHandle {
                    frames: Arc::clone(self),
                    buffer_index: index,
                };
            }
            // A newer frame landed while registering; the old index may
            // already be a write target.
            self.readers[index].fetch_sub(1, Ordering::SeqCst);
            std::hint::spin_loop();
        }
    }

    /// Gets the buffer at `index` mutably.
    ///
    /// # Safety
    ///
    /// Caller must hold the write lock and `index` must be its write target.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn buffer_mut(&self, index: usize) -> &mut VoxelBuffer {
        &mut *self.buffers[index].get()
    }

    /// Gets the buffer at `index`.
    ///
    /// # Safety
    ///
    /// Caller must guarantee no concurrent writer on `index`.
    #[inline]
    unsafe fn buffer(&self, index: usize) -> &VoxelBuffer {
        &*self.buffers[index].get()
    }
}

// SAFETY: Access to the UnsafeCells is partitioned by the atomics above:
// the writer only touches a buffer that is not `latest` and had no reader
// when picked, and a reader only dereferences a buffer it registered on
// while that buffer was `latest`.
unsafe impl Sync for FrameBuffers {}

/// Write handle for the frame loop.
///
/// Provides exclusive mutable access to one free buffer.
/// Dropping the handle without publishing discards the frame.
pub struct FrameWriteHandle {
    frames: Arc<FrameBuffers>,
    buffer_index: usize,
}

impl FrameWriteHandle {
    /// Returns the buffer index this handle writes to (for debugging).
    #[inline]
    #[must_use]
    pub fn buffer_index(&self) -> usize {
        self.buffer_index
    }

    /// Makes the completed frame the latest one.
    ///
    /// Readers already holding an older frame keep it until they drop
    /// their handle; new readers get this one. Returns the new
    /// published-frame count.
    pub fn publish(self) -> u64 {
        let frames = &self.frames;
        frames.latest.store(self.buffer_index, Ordering::SeqCst);
        frames.frame_count.fetch_add(1, Ordering::Relaxed) + 1
        // Write lock released when `self` drops here.
    }
}

impl Deref for FrameWriteHandle {
    type Target = VoxelBuffer;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // SAFETY: We hold exclusive write access (guaranteed by write_locked)
        unsafe { self.frames.buffer(self.buffer_index) }
    }
}

impl DerefMut for FrameWriteHandle {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: We hold exclusive write access (guaranteed by write_locked)
        unsafe { self.frames.buffer_mut(self.buffer_index) }
    }
}

impl Drop for FrameWriteHandle {
    fn drop(&mut self) {
        self.frames.write_locked.store(false, Ordering::Release);
    }
}

/// Read handle for the display driver.
///
/// Provides shared immutable access to one published frame. The frame
/// does not change while the handle is alive, even if newer frames are
/// published in the meantime.
pub struct FrameReadHandle {
    frames: Arc<FrameBuffers>,
    buffer_index: usize,
}

impl FrameReadHandle {
    /// Returns the buffer index this handle reads from (for debugging).
    #[inline]
    #[must_use]
    pub fn buffer_index(&self) -> usize {
        self.buffer_index
    }
}

impl Deref for FrameReadHandle {
    type Target = VoxelBuffer;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // SAFETY: The writer never picks a buffer with a registered reader,
        // and this handle stays registered until it drops.
        unsafe { self.frames.buffer(self.buffer_index) }
    }
}

impl Drop for FrameReadHandle {
    fn drop(&mut self) {
        self.frames.readers[self.buffer_index].fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn frames() -> Arc<FrameBuffers> {
        FrameBuffers::new(GridDims::new(4, 4, 4).unwrap())
    }

    #[test]
    fn test_creation() {
        let frames = frames();
        assert_eq!(frames.frame_count(), 0);
        assert!(!frames.is_writing());
        assert_eq!(frames.readers(), 0);
        assert_eq!(frames.latest_index(), 0);
    }

    #[test]
    fn test_single_writer() {
        let frames = frames();
        let write = frames.write_handle();
        assert!(write.is_ok());
        assert!(frames.is_writing());
        assert_eq!(frames.write_handle().err(), Some(FrameError::WriterActive));
        drop(write);
        assert!(!frames.is_writing());
        assert!(frames.write_handle().is_ok());
    }

    #[test]
    fn test_multiple_readers() {
        let frames = frames();
        let read1 = frames.read_handle();
        let read2 = frames.read_handle();
        assert_eq!(frames.readers(), 2);
        assert_eq!(read1.buffer_index(), read2.buffer_index());
        drop(read1);
        drop(read2);
        assert_eq!(frames.readers(), 0);
    }

    #[test]
    fn test_publish_makes_frame_visible() {
        let frames = frames();

        {
            let read = frames.read_handle();
            assert_eq!(read.lit_count(), 0);
        }

        let mut write = frames.write_handle().unwrap();
        write.write(1, 1, 1, 1.0);
        assert_eq!(write.publish(), 1);
        assert!(!frames.is_writing());

        let read = frames.read_handle();
        assert_eq!(read.get(1, 1, 1), 1.0);
    }

    #[test]
    fn test_unpublished_frame_is_invisible() {
        let frames = frames();
        {
            let mut write = frames.write_handle().unwrap();
            write.fill(1.0);
        }
        let read = frames.read_handle();
        assert_eq!(read.lit_count(), 0);
        assert_eq!(frames.frame_count(), 0);
    }

    #[test]
    fn test_publish_while_reading() {
        let frames = frames();
        let held = frames.read_handle();

        for frame in 1..=10u32 {
            let mut write = frames.write_handle().unwrap();
            assert_ne!(write.buffer_index(), held.buffer_index());
            write.fill(frame as f32 / 10.0);
            assert_eq!(write.publish(), u64::from(frame));
        }

        // The held frame is untouched; new readers get the newest one.
        assert_eq!(held.lit_count(), 0);
        assert_eq!(frames.read_handle().get(0, 0, 0), 1.0);
    }

    #[test]
    fn test_writer_avoids_every_held_buffer() {
        let frames = frames();
        let first = frames.read_handle();

        let mut write = frames.write_handle().unwrap();
        write.fill(0.5);
        write.publish();
        let second = frames.read_handle();
        assert_ne!(first.buffer_index(), second.buffer_index());

        let mut write = frames.write_handle().unwrap();
        write.fill(1.0);
        write.publish();

        // Readers on two buffers plus the latest frame: nothing is free.
        assert_eq!(
            frames.write_handle().err(),
            Some(FrameError::NoFreeBuffer { readers: 2 })
        );
        assert!(!frames.is_writing());
        assert_eq!(second.get(0, 0, 0), 0.5);

        drop(first);
        assert!(frames.write_handle().is_ok());
    }

    #[test]
    fn test_buffers_rotate() {
        let frames = frames();
        let first = frames.write_handle().unwrap();
        let first_index = first.buffer_index();
        assert_ne!(first_index, 0);
        first.publish();

        let second = frames.write_handle().unwrap();
        assert_ne!(second.buffer_index(), first_index);
        let second_index = second.buffer_index();
        second.publish();

        assert_eq!(frames.read_handle().buffer_index(), second_index);
        assert_eq!(frames.frame_count(), 2);
    }

    #[test]
    fn test_concurrent_reader_never_sees_partial_frame() {
        let frames = frames();
        let reader_frames = Arc::clone(&frames);

        let reader = std::thread::spawn(move || {
            for _ in 0..2_000 {
                let read = reader_frames.read_handle();
                let first = read.as_slice()[0];
                assert!(read.as_slice().iter().all(|&v| v == first));
            }
        });

        for frame in 0..2_000u32 {
            let mut write = frames.write_handle().unwrap();
            write.fill((frame % 7) as f32 / 7.0);
            write.publish();
        }

        reader.join().unwrap();
        assert_eq!(frames.frame_count(), 2_000);
    }

    #[test]
    fn test_continuous_reader_does_not_stall_writer() {
        let frames = frames();
        let reader_frames = Arc::clone(&frames);
        let running = Arc::new(AtomicBool::new(true));
        let reader_running = Arc::clone(&running);

        // Holds a frame nearly all the time, like a driver mid-emit.
        let reader = std::thread::spawn(move || {
            while reader_running.load(Ordering::Relaxed) {
                let read = reader_frames.read_handle();
                std::thread::sleep(Duration::from_micros(200));
                drop(read);
            }
        });

        for frame in 0..500u32 {
            let mut write = frames.write_handle().unwrap();
            write.fill((frame % 5) as f32 / 5.0);
            write.publish();
        }
        running.store(false, Ordering::Relaxed);
        reader.join().unwrap();

        assert_eq!(frames.frame_count(), 500);
    }
}
