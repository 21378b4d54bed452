//! Benchmarks for landmark-mesh reconstruction stages.
//!
//! Run with: cargo bench -p landmark-mesh
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p landmark-mesh -- --save-baseline main
//! 2. After changes: cargo bench -p landmark-mesh -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use landmark_mesh::{
    AdjacencyGraph, MeshReport, OrientParams, PositionSnapshot, TessellateParams, Topology,
    orient_triangles, propagate_winding, tessellate, walk_fans,
};

// =============================================================================
// Test Topology Generation
// =============================================================================

/// A `w` x `h` cell grid with one diagonal per cell.
fn grid_topology(w: u32, h: u32) -> Topology {
    let idx = |x: u32, y: u32| y * (w + 1) + x;
    let mut edges = Vec::new();
    for y in 0..=h {
        for x in 0..=w {
            if x < w {
                edges.push((idx(x, y), idx(x + 1, y)));
            }
            if y < h {
                edges.push((idx(x, y), idx(x, y + 1)));
            }
            if x < w && y < h {
                edges.push((idx(x, y), idx(x + 1, y + 1)));
            }
        }
    }
    Topology::from_pairs(((w + 1) * (h + 1)) as usize, &edges)
}

/// A dome over the grid, viewed from above.
fn grid_snapshot(w: u32, h: u32) -> PositionSnapshot {
    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let mut coords = Vec::new();
    for y in 0..=h {
        for x in 0..=w {
            let (dx, dy) = (x as f64 - cx, y as f64 - cy);
            coords.push([x as f64, y as f64, 0.3 * (-(dx * dx + dy * dy) / 50.0).exp()]);
        }
    }
    PositionSnapshot::from_coords(&coords)
}

fn grid_params(w: u32, h: u32) -> TessellateParams {
    TessellateParams::default().with_reference([w as f64 / 2.0, h as f64 / 2.0, 1000.0])
}

// 18 x 26 vertices is about the size of a face landmark model.
const SIZES: [(&str, u32, u32); 3] = [
    ("grid_100v", 9, 9),
    ("grid_468v", 17, 25),
    ("grid_10kv", 99, 99),
];

// =============================================================================
// Stage Benchmarks
// =============================================================================

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("Graph");

    for (name, w, h) in SIZES {
        let topology = grid_topology(w, h);
        group.throughput(Throughput::Elements(topology.edges.len() as u64));

        group.bench_with_input(BenchmarkId::new("build", name), &topology, |b, topology| {
            b.iter(|| topology.graph().unwrap())
        });
    }

    group.finish();
}

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("Enumeration");

    for (name, w, h) in SIZES {
        let graph: AdjacencyGraph = grid_topology(w, h).graph().unwrap();
        group.throughput(Throughput::Elements(graph.vertex_count() as u64));

        group.bench_with_input(BenchmarkId::new("walk_fans", name), &graph, |b, graph| {
            b.iter(|| walk_fans(black_box(graph), 0))
        });
    }

    group.finish();
}

fn bench_winding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Winding");

    for (name, w, h) in SIZES {
        let graph = grid_topology(w, h).graph().unwrap();
        let snapshot = grid_snapshot(w, h);
        let triangles = walk_fans(&graph, 0).triangles;
        let orient_params = OrientParams::from(&grid_params(w, h));
        group.throughput(Throughput::Elements(triangles.len() as u64));

        group.bench_with_input(BenchmarkId::new("orient", name), &triangles, |b, triangles| {
            b.iter(|| {
                let mut t = triangles.clone();
                orient_triangles(&mut t, black_box(&snapshot), &orient_params)
            })
        });

        group.bench_with_input(BenchmarkId::new("propagate", name), &triangles, |b, triangles| {
            b.iter(|| {
                let mut t = triangles.clone();
                propagate_winding(&mut t, black_box(&snapshot), 0)
            })
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");

    for (name, w, h) in SIZES {
        let topology = grid_topology(w, h);
        let snapshot = grid_snapshot(w, h);
        let params = grid_params(w, h);
        group.throughput(Throughput::Elements(topology.vertex_count as u64));

        group.bench_with_input(BenchmarkId::new("tessellate", name), &topology, |b, topology| {
            b.iter(|| tessellate(black_box(topology), &snapshot, &params).unwrap())
        });

        let triangles = tessellate(&topology, &snapshot, &params).unwrap().triangles;
        group.bench_with_input(BenchmarkId::new("analyze", name), &triangles, |b, triangles| {
            b.iter(|| MeshReport::analyze(black_box(triangles), &snapshot, &params).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_graph,
    bench_enumeration,
    bench_winding,
    bench_pipeline
);
criterion_main!(benches);
