//! Benchmark for voxel buffer writes and frame handoff.
//!
//! TARGET: a full 64³ frame cleared, written and published well under 1ms
//!
//! Run with: cargo bench --package volumetric_core --bench buffer_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use volumetric_core::{FrameBuffers, GridDims, VoxelBuffer};

fn benchmark_clear(c: &mut Criterion) {
    let dims = GridDims::new(64, 64, 64).unwrap();
    let mut buffer = VoxelBuffer::new(dims);

    let mut group = c.benchmark_group("voxel_buffer");
    group.throughput(Throughput::Elements(dims.len() as u64));
    group.bench_function("clear_64", |b| {
        b.iter(|| {
            buffer.clear();
            black_box(&buffer);
        });
    });
    group.finish();
}

fn benchmark_writes(c: &mut Criterion) {
    let dims = GridDims::new(64, 64, 64).unwrap();
    let mut buffer = VoxelBuffer::new(dims);

    let mut group = c.benchmark_group("voxel_writes");
    group.throughput(Throughput::Elements(dims.len() as u64));

    group.bench_function("write_every_voxel", |b| {
        b.iter(|| {
            for z in 0..64 {
                for y in 0..64 {
                    for x in 0..64 {
                        buffer.write(x, y, z, black_box(0.5));
                    }
                }
            }
        });
    });

    group.bench_function("blend_every_voxel", |b| {
        b.iter(|| {
            buffer.clear();
            for z in 0..64 {
                for y in 0..64 {
                    for x in 0..64 {
                        buffer.blend(x, y, z, black_box(0.25));
                    }
                }
            }
        });
    });

    // Half the writes land outside the lattice.
    group.bench_function("write_with_rejections", |b| {
        b.iter(|| {
            for z in -32..96 {
                for x in -32..96 {
                    buffer.write(x, 10, z, black_box(1.0));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_publish(c: &mut Criterion) {
    let dims = GridDims::new(64, 64, 64).unwrap();
    let frames = FrameBuffers::new(dims);

    c.bench_function("frame_publish_cycle", |b| {
        b.iter(|| {
            if let Ok(mut write) = frames.write_handle() {
                write.clear();
                write.write(32, 32, 32, 1.0);
                black_box(write.publish());
            }
            let read = frames.read_handle();
            black_box(read.as_bytes().len());
        });
    });
}

criterion_group!(benches, benchmark_clear, benchmark_writes, benchmark_publish);
criterion_main!(benches);
