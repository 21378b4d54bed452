//! Per-vertex adjacency built from a static edge list.

use hashbrown::HashSet;
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::types::{Edge, VertexIndex};

/// Undirected landmark connectivity, immutable once built.
///
/// Each vertex's neighbor list keeps the order in which its edges were first
/// declared. Repeated or mirrored declarations contribute once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<VertexIndex>>,
    edge_count: usize,
}

impl AdjacencyGraph {
    /// Build the graph for `vertex_count` vertices.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidTopology`] if any edge is a self-loop or references
    /// a vertex outside `[0, vertex_count)`.
    pub fn build(vertex_count: usize, edges: impl IntoIterator<Item = Edge>) -> MeshResult<Self> {
        let mut neighbors: Vec<Vec<VertexIndex>> = vec![Vec::new(); vertex_count];
        let mut seen: HashSet<(VertexIndex, VertexIndex)> = HashSet::new();
        let mut declared = 0usize;

        for (edge_index, edge) in edges.into_iter().enumerate() {
            declared += 1;

            for v in [edge.a, edge.b] {
                if v as usize >= vertex_count {
                    return Err(MeshError::vertex_out_of_range(edge_index, v, vertex_count));
                }
            }
            if edge.is_self_loop() {
                return Err(MeshError::self_loop(edge_index, edge.a));
            }

            if !seen.insert(edge.canonical()) {
                continue;
            }

            neighbors[edge.a as usize].push(edge.b);
            neighbors[edge.b as usize].push(edge.a);
        }

        let graph = Self {
            neighbors,
            edge_count: seen.len(),
        };

        debug!(
            vertices = vertex_count,
            declared_edges = declared,
            unique_edges = graph.edge_count,
            "Built adjacency graph"
        );

        Ok(graph)
    }

    /// Build from `(a, b)` pairs.
    pub fn from_pairs(vertex_count: usize, pairs: &[(VertexIndex, VertexIndex)]) -> MeshResult<Self> {
        Self::build(vertex_count, pairs.iter().copied().map(Edge::from))
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of distinct undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Neighbors of `v` in first-declared order.
    #[inline]
    pub fn neighbors(&self, v: VertexIndex) -> &[VertexIndex] {
        &self.neighbors[v as usize]
    }

    #[inline]
    pub fn degree(&self, v: VertexIndex) -> usize {
        self.neighbors[v as usize].len()
    }

    /// True if `a` and `b` share an edge.
    pub fn is_connected(&self, a: VertexIndex, b: VertexIndex) -> bool {
        self.neighbors
            .get(a as usize)
            .is_some_and(|n| n.contains(&b))
    }

    /// Vertices with no edges at all.
    pub fn isolated_vertices(&self) -> Vec<VertexIndex> {
        self.neighbors
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_empty())
            .map(|(v, _)| v as VertexIndex)
            .collect()
    }
}
