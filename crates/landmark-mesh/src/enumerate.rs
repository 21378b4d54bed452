//! Triangle discovery by walking vertex fans over the adjacency graph.
//!
//! Starting from a seed vertex, each vertex is visited once in depth-first
//! order. When a vertex `v` is visited it is marked done and its fan is
//! scanned: for every neighbor `C[i]` (except the last) that is not done, each
//! not-done neighbor `w` of `C[i]` that also appears later in `v`'s neighbor
//! list closes the triangle `(v, C[i], w)`.
//!
//! Marking a vertex done before scanning its fan means a face is emitted only
//! from the first of its three vertices to be visited, so faces are not
//! repeated.
//!
//! # Limitations
//!
//! This is a face-discovery heuristic. It finds every face of a graph that is
//! the edge skeleton of a triangulated 2-manifold. On arbitrary graphs any
//! 3-cycle is reported as a face, including cycles that are not faces of the
//! intended surface. Vertices not connected to the seed are never visited.

use tracing::debug;

use crate::graph::AdjacencyGraph;
use crate::types::{Triangle, VertexIndex};

/// The result of a fan walk.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    /// Triangles in discovery order, each as `(anchor, middle, end)`.
    pub triangles: Vec<Triangle>,
    /// Vertices in the order they were visited.
    pub visit_order: Vec<VertexIndex>,
}

impl Enumeration {
    /// Number of graph vertices the walk never reached.
    pub fn unvisited_count(&self, graph: &AdjacencyGraph) -> usize {
        graph.vertex_count() - self.visit_order.len()
    }
}

/// Enumerate the triangles reachable from `seed`.
///
/// Returns an empty list if `seed` is not a vertex of `graph`.
pub fn enumerate_triangles(graph: &AdjacencyGraph, seed: VertexIndex) -> Vec<Triangle> {
    walk_fans(graph, seed).triangles
}

/// Enumerate triangles and also record the vertex visit order.
///
/// The walk uses an explicit stack of `(vertex, next neighbor position)`
/// frames and produces the same order as the recursive formulation: a vertex's
/// fan is scanned when it is first entered, and its not-yet-done neighbors are
/// then descended into one at a time, rechecking the done marker after each
/// descent returns.
pub fn walk_fans(graph: &AdjacencyGraph, seed: VertexIndex) -> Enumeration {
    let vertex_count = graph.vertex_count();
    let mut result = Enumeration::default();

    if seed as usize >= vertex_count {
        return result;
    }

    let mut done = vec![false; vertex_count];
    let mut stack: Vec<(VertexIndex, usize)> = Vec::new();

    enter(graph, seed, &mut done, &mut result);
    stack.push((seed, 0));

    while let Some(frame) = stack.last_mut() {
        let (v, cursor) = *frame;
        let neighbors = graph.neighbors(v);

        let next = neighbors[cursor..]
            .iter()
            .position(|&n| !done[n as usize])
            .map(|offset| cursor + offset);

        match next {
            Some(pos) => {
                frame.1 = pos + 1;
                let child = neighbors[pos];
                enter(graph, child, &mut done, &mut result);
                stack.push((child, 0));
            }
            None => {
                stack.pop();
            }
        }
    }

    debug!(
        seed,
        visited = result.visit_order.len(),
        triangles = result.triangles.len(),
        "Enumerated triangle fans"
    );

    result
}

/// Mark `v` done and emit every triangle of its fan that is still open.
fn enter(graph: &AdjacencyGraph, v: VertexIndex, done: &mut [bool], out: &mut Enumeration) {
    done[v as usize] = true;
    out.visit_order.push(v);

    let fan = graph.neighbors(v);
    if fan.len() < 2 {
        return;
    }

    for middle_pos in 0..fan.len() - 1 {
        let middle = fan[middle_pos];
        if done[middle as usize] {
            continue;
        }

        let later = &fan[middle_pos + 1..];
        for &end in graph.neighbors(middle) {
            if done[end as usize] {
                continue;
            }
            // `later` holds no repeats, so at most one triangle per (middle, end).
            if later.contains(&end) {
                out.triangles.push(Triangle::new(v, middle, end));
            }
        }
    }
}
