//! Global winding consistency by breadth-first normal alignment.
//!
//! Local orientation decides each face in isolation, which leaves faces that
//! are nearly edge-on to the viewer free to disagree with their neighbors.
//! This pass walks outward from a seed triangle and flips any neighbor whose
//! reversed normal aligns better with the normal of the triangle that reached
//! it.
//!
//! Two triangles count as neighbors when they share at least one vertex. This
//! is coarser than sharing an edge, so a face can be compared against faces
//! that only touch it at a corner.

use std::collections::VecDeque;

use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::error::MeshWarning;
use crate::types::{PositionSnapshot, Triangle};

/// Triangle-to-triangle adjacency through shared vertices.
///
/// Neighbor lists are sorted by triangle index and never contain the triangle
/// itself.
#[derive(Debug, Clone)]
pub struct TriangleAdjacency {
    neighbors: Vec<Vec<usize>>,
}

impl TriangleAdjacency {
    /// Build adjacency for `triangles`.
    pub fn build(triangles: &[Triangle]) -> Self {
        let vertex_slots = triangles
            .iter()
            .flat_map(|t| t.indices())
            .max()
            .map_or(0, |v| v as usize + 1);

        let mut vertex_to_triangles: Vec<Vec<usize>> = vec![Vec::new(); vertex_slots];
        for (tri_idx, tri) in triangles.iter().enumerate() {
            for v in tri.indices() {
                vertex_to_triangles[v as usize].push(tri_idx);
            }
        }

        let neighbors = triangles
            .iter()
            .enumerate()
            .map(|(tri_idx, tri)| {
                let mut adjacent: Vec<usize> = tri
                    .indices()
                    .iter()
                    .flat_map(|&v| vertex_to_triangles[v as usize].iter().copied())
                    .filter(|&other| other != tri_idx)
                    .collect();
                adjacent.sort_unstable();
                adjacent.dedup();
                adjacent
            })
            .collect();

        Self { neighbors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Triangles sharing a vertex with `triangle`, ascending.
    #[inline]
    pub fn neighbors(&self, triangle: usize) -> &[usize] {
        &self.neighbors[triangle]
    }

    /// Connected components under the shared-vertex relation, each sorted,
    /// ordered by their smallest triangle index.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.len()];
        let mut components = Vec::new();

        for start in 0..self.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(t) = queue.pop_front() {
                for &n in self.neighbors(t) {
                    if !seen[n] {
                        seen[n] = true;
                        component.push(n);
                        queue.push_back(n);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        components
    }
}

/// Summary of a propagation pass.
#[derive(Debug, Clone, Default)]
pub struct PropagationReport {
    /// Triangles whose winding was reversed.
    pub flipped: usize,
    /// Triangles processed, in processing order.
    pub visit_order: Vec<usize>,
    /// Number of triangles never reached from the seed.
    pub unreachable: usize,
    /// `UnreachableComponent` diagnostics, if any.
    pub warnings: Vec<MeshWarning>,
}

impl PropagationReport {
    /// True if every triangle was reached from the seed.
    pub fn is_complete(&self) -> bool {
        self.unreachable == 0
    }
}

/// Make winding consistent across everything reachable from `seed`.
///
/// Each triangle is processed once, in breadth-first order with neighbors
/// taken in ascending index order. Triangles outside the seed's component keep
/// their current winding and are reported as unreachable.
pub fn propagate_winding(
    triangles: &mut [Triangle],
    snapshot: &PositionSnapshot,
    seed: usize,
) -> PropagationReport {
    let adjacency = TriangleAdjacency::build(triangles);
    propagate_with_adjacency(triangles, snapshot, &adjacency, seed)
}

/// [`propagate_winding`] with a prebuilt adjacency.
///
/// `adjacency` must have been built from the same triangle list. Flipping
/// triangles does not change it.
pub fn propagate_with_adjacency(
    triangles: &mut [Triangle],
    snapshot: &PositionSnapshot,
    adjacency: &TriangleAdjacency,
    seed: usize,
) -> PropagationReport {
    let mut report = PropagationReport::default();
    let count = triangles.len();
    if count == 0 {
        return report;
    }

    let mut normals: Vec<Vector3<f64>> = triangles.iter().map(|t| snapshot.face_normal(t)).collect();
    let mut processed = vec![false; count];
    let mut queue: VecDeque<usize> = VecDeque::new();

    if seed < count {
        queue.push_back(seed);
    } else {
        warn!(seed, triangles = count, "Seed triangle out of range, nothing propagated");
    }

    while let Some(tri_idx) = queue.pop_front() {
        // Triangles are queued once per processed neighbor.
        if processed[tri_idx] {
            continue;
        }
        processed[tri_idx] = true;
        report.visit_order.push(tri_idx);

        let normal = normals[tri_idx];
        for &neighbor_idx in adjacency.neighbors(tri_idx) {
            if processed[neighbor_idx] {
                continue;
            }

            let reversed = triangles[neighbor_idx].reversed();
            let reversed_normal = snapshot.face_normal(&reversed);
            if normal.dot(&normals[neighbor_idx]) < normal.dot(&reversed_normal) {
                triangles[neighbor_idx] = reversed;
                normals[neighbor_idx] = reversed_normal;
                report.flipped += 1;
            }

            queue.push_back(neighbor_idx);
        }
    }

    report.unreachable = count - report.visit_order.len();
    if let Some(first_triangle) = processed.iter().position(|&p| !p) {
        warn!(
            unreachable = report.unreachable,
            first_triangle,
            "Triangles not connected to the seed keep their local winding"
        );
        report.warnings.push(MeshWarning::UnreachableComponent {
            triangle_count: report.unreachable,
            first_triangle,
        });
    }

    if report.flipped > 0 {
        info!(
            flipped = report.flipped,
            visited = report.visit_order.len(),
            "Propagated winding from seed triangle"
        );
    } else {
        debug!(
            visited = report.visit_order.len(),
            "Winding already consistent with seed triangle"
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PositionSnapshot {
        PositionSnapshot::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
    }

    #[test]
    fn test_adjacency_is_sorted_and_excludes_self() {
        let tris = [
            Triangle::new(0, 1, 2),
            Triangle::new(3, 4, 5),
            Triangle::new(2, 3, 6),
            Triangle::new(0, 6, 7),
        ];
        let adjacency = TriangleAdjacency::build(&tris);
        assert_eq!(adjacency.neighbors(0), &[2, 3]);
        assert_eq!(adjacency.neighbors(1), &[2]);
        assert_eq!(adjacency.neighbors(2), &[0, 1, 3]);
        assert_eq!(adjacency.neighbors(3), &[0, 2]);
        assert_eq!(adjacency.components(), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_flips_disagreeing_neighbor() {
        let mut tris = vec![Triangle::new(0, 1, 2), Triangle::new(0, 3, 2)];
        let report = propagate_winding(&mut tris, &square(), 0);
        assert_eq!(report.flipped, 1);
        assert_eq!(tris[0], Triangle::new(0, 1, 2));
        assert_eq!(tris[1], Triangle::new(2, 3, 0));
        assert_eq!(tris[0].edge_direction(0, 2), Some(false));
        assert_eq!(tris[1].edge_direction(0, 2), Some(true));
        assert!(report.is_complete());
    }

    #[test]
    fn test_seed_decides_orientation() {
        let mut tris = vec![Triangle::new(0, 3, 2), Triangle::new(0, 1, 2)];
        propagate_winding(&mut tris, &square(), 0);
        assert_eq!(tris[0], Triangle::new(0, 3, 2));
        assert_eq!(tris[1], Triangle::new(2, 1, 0));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut tris = vec![Triangle::new(0, 1, 2), Triangle::new(0, 3, 2)];
        propagate_winding(&mut tris, &square(), 0);
        let after_first = tris.clone();
        let report = propagate_winding(&mut tris, &square(), 0);
        assert_eq!(report.flipped, 0);
        assert_eq!(tris, after_first);
    }

    #[test]
    fn test_unreachable_component_reported() {
        let snapshot = PositionSnapshot::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [5.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
            [5.0, 1.0, 0.0],
        ]);
        let mut tris = vec![Triangle::new(0, 1, 2), Triangle::new(5, 4, 3)];
        let report = propagate_winding(&mut tris, &snapshot, 0);

        assert_eq!(report.unreachable, 1);
        assert_eq!(report.visit_order, vec![0]);
        // Left as it was.
        assert_eq!(tris[1], Triangle::new(5, 4, 3));
        assert_eq!(
            report.warnings,
            vec![MeshWarning::UnreachableComponent {
                triangle_count: 1,
                first_triangle: 1
            }]
        );
    }

    #[test]
    fn test_breadth_first_visit_order() {
        // A fan of four triangles around vertex 0 and a fifth touching only vertex 4.
        let tris = vec![
            Triangle::new(0, 1, 2),
            Triangle::new(0, 2, 3),
            Triangle::new(0, 3, 4),
            Triangle::new(4, 5, 6),
            Triangle::new(0, 4, 1),
        ];
        let snapshot = PositionSnapshot::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, -2.0, 0.0],
            [-1.0, -2.0, 0.0],
        ]);
        let mut working = tris.clone();
        let report = propagate_winding(&mut working, &snapshot, 0);
        assert_eq!(report.visit_order, vec![0, 1, 2, 4, 3]);
    }

    #[test]
    fn test_empty_and_bad_seed() {
        let report = propagate_winding(&mut [], &square(), 0);
        assert!(report.visit_order.is_empty());

        let mut tris = vec![Triangle::new(0, 1, 2)];
        let report = propagate_winding(&mut tris, &square(), 5);
        assert_eq!(report.unreachable, 1);
        assert_eq!(report.warnings.len(), 1);
    }
}
