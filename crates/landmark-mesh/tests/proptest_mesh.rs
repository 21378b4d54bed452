//! Property-based tests for reconstruction.
//!
//! Run with: cargo test -p landmark-mesh -- proptest

use landmark_mesh::{
    AdjacencyGraph, MeshReport, OrientParams, PositionSnapshot, TessellateParams, Topology,
    Triangle, find_duplicate_faces, orient_triangles, propagate_winding, tessellate, walk_fans,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn grid_edges(w: u32, h: u32) -> Vec<(u32, u32)> {
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
    edges
}

/// A unit-spaced grid height field with gentle relief, and its edges in
/// shuffled declaration order.
fn arb_grid() -> impl Strategy<Value = (u32, u32, Vec<(u32, u32)>, PositionSnapshot)> {
    (1u32..8, 1u32..8).prop_flat_map(|(w, h)| {
        let n = ((w + 1) * (h + 1)) as usize;
        let heights = prop::collection::vec(-0.25..0.25f64, n);
        let edges = Just(grid_edges(w, h)).prop_shuffle();
        (Just(w), Just(h), edges, heights).prop_map(move |(w, h, edges, heights)| {
            let coords: Vec<[f64; 3]> = heights
                .iter()
                .enumerate()
                .map(|(i, &z)| {
                    let i = i as u32;
                    [(i % (w + 1)) as f64, (i / (w + 1)) as f64, z]
                })
                .collect();
            (w, h, edges, PositionSnapshot::from_coords(&coords))
        })
    })
}

/// Random simple graph on up to 12 vertices.
fn arb_graph() -> impl Strategy<Value = (usize, Vec<(u32, u32)>)> {
    (3usize..12).prop_flat_map(|n| {
        let pair = (0..n as u32, 0..n as u32).prop_filter("no self-loops", |(a, b)| a != b);
        (Just(n), prop::collection::vec(pair, 0..40))
    })
}

fn grid_params(w: u32, h: u32) -> TessellateParams {
    TessellateParams::default().with_reference([w as f64 / 2.0, h as f64 / 2.0, 1000.0])
}

fn sorted_faces(triangles: &[Triangle]) -> Vec<[u32; 3]> {
    let mut faces: Vec<_> = triangles.iter().map(Triangle::sorted).collect();
    faces.sort_unstable();
    faces
}

// =============================================================================
// Enumeration properties
// =============================================================================

proptest! {
    /// Every reported triangle is a 3-cycle, and every 3-cycle in the seed's
    /// component is reported exactly once.
    #[test]
    fn proptest_enumeration_finds_each_cycle_once((n, edges) in arb_graph()) {
        let graph = AdjacencyGraph::from_pairs(n, &edges).unwrap();
        let walk = walk_fans(&graph, 0);

        for t in &walk.triangles {
            let [a, b, c] = t.indices();
            prop_assert!(graph.is_connected(a, b));
            prop_assert!(graph.is_connected(b, c));
            prop_assert!(graph.is_connected(c, a));
        }
        prop_assert!(find_duplicate_faces(&walk.triangles).is_empty());

        let visited = &walk.visit_order;
        let mut expected = 0;
        for (i, &a) in visited.iter().enumerate() {
            for (j, &b) in visited.iter().enumerate().skip(i + 1) {
                for &c in &visited[j + 1..] {
                    if graph.is_connected(a, b) && graph.is_connected(b, c) && graph.is_connected(c, a) {
                        expected += 1;
                    }
                }
            }
        }
        prop_assert_eq!(walk.triangles.len(), expected);
    }

    /// Same input, same output.
    #[test]
    fn proptest_enumeration_is_deterministic((n, edges) in arb_graph()) {
        let graph = AdjacencyGraph::from_pairs(n, &edges).unwrap();
        prop_assert_eq!(walk_fans(&graph, 0).triangles, walk_fans(&graph, 0).triangles);
    }
}

// =============================================================================
// Winding properties
// =============================================================================

proptest! {
    /// Height-field grids come out complete, front-facing, and consistently wound.
    #[test]
    fn proptest_grid_is_consistent((w, h, edges, snapshot) in arb_grid()) {
        let topology = Topology::from_pairs(snapshot.len(), &edges);
        let params = grid_params(w, h);
        let result = tessellate(&topology, &snapshot, &params).unwrap();

        prop_assert_eq!(result.triangles.len(), (2 * w * h) as usize);
        let report = MeshReport::analyze(&result.triangles, &snapshot, &params).unwrap();
        prop_assert!(report.is_consistent());
        prop_assert!(report.is_front_facing());
        prop_assert_eq!(report.unreachable_triangles, 0);
    }

    /// Declaration order changes the triangle list order, never the face set.
    #[test]
    fn proptest_face_set_ignores_edge_order((w, h, edges, snapshot) in arb_grid()) {
        let params = grid_params(w, h);
        let shuffled = tessellate(&Topology::from_pairs(snapshot.len(), &edges), &snapshot, &params).unwrap();
        let ordered = tessellate(&Topology::from_pairs(snapshot.len(), &grid_edges(w, h)), &snapshot, &params).unwrap();
        prop_assert_eq!(sorted_faces(&shuffled.triangles), sorted_faces(&ordered.triangles));
    }

    /// Running orientation and propagation on finished output changes nothing.
    #[test]
    fn proptest_second_pass_is_noop((w, h, edges, snapshot) in arb_grid()) {
        let params = grid_params(w, h);
        let result = tessellate(&Topology::from_pairs(snapshot.len(), &edges), &snapshot, &params).unwrap();

        let mut triangles = result.triangles.clone();
        let orient = orient_triangles(&mut triangles, &snapshot, &OrientParams::from(&params));
        let propagation = propagate_winding(&mut triangles, &snapshot, 0);
        prop_assert_eq!(orient.flipped, 0);
        prop_assert_eq!(propagation.flipped, 0);
        prop_assert_eq!(triangles, result.triangles);
    }
}
