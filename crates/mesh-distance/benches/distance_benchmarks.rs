//! Benchmarks for mesh-distance operations.
//!
//! Run with: cargo bench -p mesh-distance
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-distance -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-distance -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_distance::{
    DistanceCache, DistanceMetric, SceneMesh, Triangle, mesh_distance, point_to_segment_distance,
};
use nalgebra::{Point3, Vector3};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// A flat `n × n` grid of quads (2n² triangles) at height `z`.
fn create_grid(n: usize, z: f64) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(2 * n * n);
    for i in 0..n {
        for j in 0..n {
            let x = i as f64;
            let y = j as f64;
            triangles.push(Triangle::from_coords(
                [x, y, z],
                [x + 1.0, y, z],
                [x + 1.0, y + 1.0, z],
            ));
            triangles.push(Triangle::from_coords(
                [x, y, z],
                [x + 1.0, y + 1.0, z],
                [x, y + 1.0, z],
            ));
        }
    }
    triangles
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_point_to_segment(c: &mut Criterion) {
    let point = Point3::new(0.3, 2.0, -1.0);
    let start = Point3::new(0.0, 0.0, 0.0);
    let end = Point3::new(4.0, 1.0, 0.5);

    c.bench_function("point_to_segment_distance", |b| {
        b.iter(|| point_to_segment_distance(black_box(&point), black_box(&start), black_box(&end)))
    });
}

fn bench_triangle_metrics(c: &mut Criterion) {
    let a = Triangle::from_coords([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
    let b = Triangle::from_coords([3.0, 0.5, 1.0], [4.0, 0.0, 1.5], [3.5, 1.0, 0.0]);

    let mut group = c.benchmark_group("triangle_distance");
    for metric in [DistanceMetric::Vertex, DistanceMetric::EdgeMidpoint] {
        group.bench_with_input(BenchmarkId::from_parameter(metric), &metric, |bench, m| {
            bench.iter(|| m.triangle_distance(black_box(&a), black_box(&b)))
        });
    }
    group.finish();
}

fn bench_mesh_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_distance");
    group.sample_size(20);

    for n in [4, 8, 16] {
        let a = create_grid(n, 0.0);
        let b = create_grid(n, 2.0);
        group.throughput(Throughput::Elements((a.len() * b.len()) as u64));

        for metric in [DistanceMetric::Vertex, DistanceMetric::EdgeMidpoint] {
            group.bench_with_input(
                BenchmarkId::new(metric.as_str(), a.len()),
                &(&a, &b),
                |bench, (a, b)| bench.iter(|| mesh_distance(black_box(a), black_box(b), metric, None)),
            );
        }
    }
    group.finish();
}

fn bench_cache_lookup(c: &mut Criterion) {
    let a = SceneMesh::from_triangles(&create_grid(8, 0.0));
    let b = SceneMesh::from_triangles(&create_grid(8, 0.0));
    b.translate(Vector3::new(0.0, 0.0, 3.0));

    let cache = DistanceCache::new();
    if let Some(handle) = cache.start_computation(&a, &b, None) {
        let _ = handle.wait();
    }

    c.bench_function("cache_try_get_hit", |bench| {
        bench.iter(|| cache.try_get_cached(black_box(&a), black_box(&b)))
    });
}

criterion_group!(
    benches,
    bench_point_to_segment,
    bench_triangle_metrics,
    bench_mesh_distance,
    bench_cache_lookup,
);
criterion_main!(benches);
