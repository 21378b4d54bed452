//! The full reconstruction: graph, fan walk, local orientation, propagation.
//!
//! # Example
//!
//! ```
//! use landmark_mesh::{PositionSnapshot, Tessellator, Topology, Triangle};
//!
//! let topology = Topology::from_pairs(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
//! let snapshot = PositionSnapshot::from_coords(&[
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [1.0, 1.0, 0.0],
//!     [0.0, 1.0, 0.0],
//! ]);
//!
//! let result = Tessellator::new(&topology).unwrap().run(&snapshot).unwrap();
//! assert_eq!(result.triangles, vec![Triangle::new(0, 1, 2), Triangle::new(2, 3, 0)]);
//! ```

use tracing::debug;

use crate::enumerate::walk_fans;
use crate::error::{MeshError, MeshResult, MeshWarning};
use crate::graph::AdjacencyGraph;
use crate::orient::{OrientParams, orient_triangles};
use crate::params::TessellateParams;
use crate::topology::Topology;
use crate::tracing_ext::{OperationTimer, log_graph_stats, log_tessellation};
use crate::types::{PositionSnapshot, Triangle};
use crate::winding::propagate_winding;

/// Counters collected across the pipeline stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TessellationStats {
    /// Vertices reached by the fan walk.
    pub visited_vertices: usize,
    /// Triangles found by the fan walk.
    pub enumerated_triangles: usize,
    /// Triangles reversed by local orientation.
    pub locally_flipped: usize,
    /// Triangles reversed by propagation.
    pub propagated_flips: usize,
    /// Triangles with no usable normal.
    pub degenerate_faces: usize,
    /// Triangles propagation never reached.
    pub unreachable_triangles: usize,
}

/// Final triangle list plus everything worth reporting about how it was built.
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    /// Consistently wound triangles, reused unchanged for every frame.
    pub triangles: Vec<Triangle>,
    /// Recoverable anomalies, in the order they were found.
    pub warnings: Vec<MeshWarning>,
    pub stats: TessellationStats,
}

impl Tessellation {
    /// Flattened `[v0, v1, v2, v0, v1, v2, ...]` index buffer.
    pub fn index_buffer(&self) -> Vec<u32> {
        self.triangles.iter().flat_map(|t| t.indices()).collect()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Reusable reconstruction for one topology.
///
/// The adjacency graph is built and validated once, in [`Tessellator::new`],
/// and is never modified afterwards.
#[derive(Debug, Clone)]
pub struct Tessellator {
    graph: AdjacencyGraph,
    params: TessellateParams,
}

impl Tessellator {
    /// Validate `topology` and build its graph.
    pub fn new(topology: &Topology) -> MeshResult<Self> {
        let graph = topology.graph()?;
        log_graph_stats(&graph, topology.name.as_deref().unwrap_or("topology"));
        Ok(Self::from_graph(graph))
    }

    pub fn from_graph(graph: AdjacencyGraph) -> Self {
        Self {
            graph,
            params: TessellateParams::default(),
        }
    }

    pub fn with_params(mut self, params: TessellateParams) -> Self {
        self.params = params;
        self
    }

    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    pub fn params(&self) -> &TessellateParams {
        &self.params
    }

    /// Triangles of the graph before any orientation.
    pub fn enumerate(&self) -> Vec<Triangle> {
        walk_fans(&self.graph, self.params.seed_vertex).triangles
    }

    /// Run every stage against the first-frame `snapshot`.
    ///
    /// # Errors
    ///
    /// [`MeshError::ConfigError`] for invalid parameters or a seed vertex
    /// outside the topology, and [`MeshError::SnapshotMismatch`] if
    /// `snapshot` has fewer positions than the topology has vertices.
    /// Degenerate faces, unreachable faces and vertices the walk never
    /// reached are reported as warnings, not errors.
    pub fn run(&self, snapshot: &PositionSnapshot) -> MeshResult<Tessellation> {
        self.params.validate()?;

        let vertex_count = self.graph.vertex_count();
        if self.params.seed_vertex as usize >= vertex_count {
            return Err(MeshError::config(format!(
                "seed_vertex {} is out of range for {} vertices",
                self.params.seed_vertex, vertex_count
            )));
        }
        if snapshot.len() < vertex_count {
            return Err(MeshError::SnapshotMismatch {
                expected: vertex_count,
                actual: snapshot.len(),
            });
        }

        let _timer =
            OperationTimer::with_context("tessellate", vertex_count, self.graph.edge_count());

        let walk = walk_fans(&self.graph, self.params.seed_vertex);
        let unvisited = first_unvisited(&walk.visit_order, vertex_count);
        let mut triangles = walk.triangles;
        let mut stats = TessellationStats {
            visited_vertices: walk.visit_order.len(),
            enumerated_triangles: triangles.len(),
            ..TessellationStats::default()
        };
        debug!(
            visited = stats.visited_vertices,
            unvisited = vertex_count - stats.visited_vertices,
            triangles = stats.enumerated_triangles,
            "Fan walk finished"
        );

        let orient_params = OrientParams::from(&self.params);
        let orient = orient_triangles(&mut triangles, snapshot, &orient_params);
        stats.locally_flipped = orient.flipped;
        stats.degenerate_faces = orient.degenerate_count();

        let propagation = propagate_winding(&mut triangles, snapshot, self.params.seed_triangle);
        stats.propagated_flips = propagation.flipped;
        stats.unreachable_triangles = propagation.unreachable;

        let mut warnings = orient.warnings;
        warnings.extend(propagation.warnings);
        if let Some(first_vertex) = unvisited {
            warnings.push(MeshWarning::UnvisitedVertices {
                vertex_count: vertex_count - stats.visited_vertices,
                first_vertex,
            });
        }

        let result = Tessellation {
            triangles,
            warnings,
            stats,
        };
        log_tessellation(&result);
        Ok(result)
    }
}

/// Lowest vertex index missing from `visit_order`.
fn first_unvisited(visit_order: &[u32], vertex_count: usize) -> Option<u32> {
    if visit_order.len() == vertex_count {
        return None;
    }
    let mut seen = vec![false; vertex_count];
    for &v in visit_order {
        seen[v as usize] = true;
    }
    seen.iter().position(|&s| !s).map(|v| v as u32)
}

/// Tessellate `topology` in one call.
pub fn tessellate(
    topology: &Topology,
    snapshot: &PositionSnapshot,
    params: &TessellateParams,
) -> MeshResult<Tessellation> {
    Tessellator::new(topology)?
        .with_params(params.clone())
        .run(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn square_topology() -> Topology {
        Topology::from_pairs(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)])
    }

    fn square_snapshot() -> PositionSnapshot {
        PositionSnapshot::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
    }

    #[test]
    fn test_square_stats() {
        let result = tessellate(
            &square_topology(),
            &square_snapshot(),
            &TessellateParams::default(),
        )
        .unwrap();
        assert_eq!(result.stats.enumerated_triangles, 2);
        assert_eq!(result.stats.visited_vertices, 4);
        // (0, 3, 2) faces away from the viewer.
        assert_eq!(result.stats.locally_flipped, 1);
        assert_eq!(result.stats.propagated_flips, 0);
        assert!(!result.has_warnings());
        assert_eq!(result.index_buffer(), vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn test_short_snapshot_rejected() {
        let snapshot = PositionSnapshot::from_coords(&[[0.0, 0.0, 0.0]; 3]);
        let err = tessellate(&square_topology(), &snapshot, &TessellateParams::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SnapshotMismatch);
    }

    #[test]
    fn test_longer_snapshot_accepted() {
        let mut coords = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        coords.extend([[9.0, 9.0, 9.0]; 10]);
        let snapshot = PositionSnapshot::from_coords(&coords);
        let result =
            tessellate(&square_topology(), &snapshot, &TessellateParams::default()).unwrap();
        assert_eq!(result.triangles.len(), 2);
    }

    #[test]
    fn test_invalid_topology_is_fatal() {
        let topology = Topology::from_pairs(4, &[(0, 1), (2, 2)]);
        let err = Tessellator::new(&topology).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidTopology);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let tessellator = Tessellator::new(&square_topology())
            .unwrap()
            .with_params(TessellateParams::default().with_degenerate_epsilon(f64::NAN));
        let err = tessellator.run(&square_snapshot()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[test]
    fn test_seed_outside_topology_rejected() {
        let tessellator = Tessellator::new(&square_topology())
            .unwrap()
            .with_params(TessellateParams::default().with_seed_vertex(99));
        let err = tessellator.run(&square_snapshot()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
        assert!(err.to_string().contains("seed_vertex 99"));
    }

    #[test]
    fn test_disconnected_vertices_warned() {
        // Square plus an isolated edge 4-5 the walk from 0 never reaches.
        let topology =
            Topology::from_pairs(6, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (4, 5)]);
        let mut coords = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        coords.extend([[5.0, 5.0, 0.0], [6.0, 5.0, 0.0]]);
        let snapshot = PositionSnapshot::from_coords(&coords);

        let result = tessellate(&topology, &snapshot, &TessellateParams::default()).unwrap();
        assert_eq!(result.triangles.len(), 2);
        assert_eq!(result.stats.visited_vertices, 4);
        assert_eq!(
            result.warnings,
            vec![MeshWarning::UnvisitedVertices {
                vertex_count: 2,
                first_vertex: 4,
            }]
        );

        let result = tessellate(
            &topology,
            &snapshot,
            &TessellateParams::default().with_seed_vertex(5),
        )
        .unwrap();
        assert!(result.triangles.is_empty());
        assert!(matches!(
            result.warnings.last(),
            Some(MeshWarning::UnvisitedVertices { vertex_count: 4, first_vertex: 0 })
        ));
    }

    #[test]
    fn test_degenerate_face_kept_with_warning() {
        // Vertex 3 sits on the line through 0 and 2.
        let snapshot = PositionSnapshot::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.5, 0.5, 0.0],
        ]);
        let result =
            tessellate(&square_topology(), &snapshot, &TessellateParams::default()).unwrap();
        assert_eq!(result.triangles.len(), 2);
        assert_eq!(result.stats.degenerate_faces, 1);
        assert!(matches!(
            result.warnings[0],
            MeshWarning::DegenerateFace { triangle_index: 1, .. }
        ));
    }
}
