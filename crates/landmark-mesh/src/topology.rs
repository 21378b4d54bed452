//! Landmark topology: a vertex count and the static list of connections.
//!
//! A topology file is JSON or TOML:
//!
//! ```json
//! { "vertex_count": 4, "edges": [[0, 1], [1, 2], [2, 3], [3, 0], [0, 2]] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{MeshError, MeshResult};
use crate::graph::AdjacencyGraph;
use crate::params::extension;
use crate::types::Edge;

/// Connectivity of a landmark model, identical for every capture made with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Optional model name, for reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of landmarks `N`.
    pub vertex_count: usize,
    /// Undirected connections, in declaration order.
    pub edges: Vec<Edge>,
}

impl Topology {
    pub fn new(vertex_count: usize, edges: Vec<Edge>) -> Self {
        Self {
            name: None,
            vertex_count,
            edges,
        }
    }

    /// Build from `(a, b)` pairs.
    pub fn from_pairs(vertex_count: usize, pairs: &[(u32, u32)]) -> Self {
        Self::new(vertex_count, pairs.iter().copied().map(Edge::from).collect())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build the adjacency graph, validating every edge.
    pub fn graph(&self) -> MeshResult<AdjacencyGraph> {
        AdjacencyGraph::build(self.vertex_count, self.edges.iter().copied())
    }

    /// The 33-landmark body pose model and its 35 skeleton connections.
    ///
    /// Only the hands (wrist, pinky, index) and feet (ankle, heel, foot index)
    /// close triangles.
    pub fn mediapipe_pose() -> Self {
        Self::from_pairs(33, POSE_CONNECTIONS).with_name("pose")
    }

    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load a topology from a `.json` or `.toml` file.
    ///
    /// Edges are not validated here; [`Topology::graph`] does that.
    pub fn load(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| MeshError::io_read(path, e))?;

        let topology = match extension(path).as_deref() {
            Some("json") => {
                Self::from_json(&contents).map_err(|e| MeshError::parse_error(path, e.to_string()))?
            }
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| MeshError::parse_error(path, e.to_string()))?
            }
            other => {
                return Err(MeshError::UnsupportedFormat {
                    extension: other.map(str::to_string),
                });
            }
        };

        info!(
            path = %path.display(),
            vertices = topology.vertex_count,
            edges = topology.edges.len(),
            "Loaded topology"
        );

        Ok(topology)
    }

    /// Write the topology as JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> MeshResult<()> {
        let path = path.as_ref();
        let json = self
            .to_json()
            .map_err(|e| MeshError::parse_error(path, e.to_string()))?;
        std::fs::write(path, json).map_err(|e| MeshError::io_write(path, e))
    }
}

const POSE_CONNECTIONS: &[(u32, u32)] = &[
    (15, 21),
    (16, 20),
    (18, 20),
    (3, 7),
    (14, 16),
    (23, 25),
    (28, 30),
    (11, 23),
    (27, 31),
    (6, 8),
    (15, 17),
    (24, 26),
    (16, 22),
    (4, 5),
    (5, 6),
    (29, 31),
    (12, 24),
    (23, 24),
    (0, 1),
    (9, 10),
    (1, 2),
    (0, 4),
    (11, 13),
    (30, 32),
    (28, 32),
    (15, 19),
    (16, 18),
    (25, 27),
    (26, 28),
    (12, 14),
    (17, 19),
    (2, 3),
    (11, 12),
    (27, 29),
    (13, 15),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::enumerate_triangles;
    use crate::types::Triangle;

    #[test]
    fn test_pose_preset() {
        let pose = Topology::mediapipe_pose();
        assert_eq!(pose.vertex_count, 33);
        assert_eq!(pose.edges.len(), 35);
        let graph = pose.graph().unwrap();
        assert_eq!(graph.edge_count(), 35);
    }

    #[test]
    fn test_pose_hands_and_feet_close_triangles() {
        let graph = Topology::mediapipe_pose().graph().unwrap();
        let mut faces: Vec<[u32; 3]> = enumerate_triangles(&graph, 0)
            .iter()
            .map(Triangle::sorted)
            .collect();
        faces.sort();
        // The head is not connected to the body, so seed from a shoulder.
        assert!(faces.is_empty());

        let mut faces: Vec<[u32; 3]> = enumerate_triangles(&graph, 11)
            .iter()
            .map(Triangle::sorted)
            .collect();
        faces.sort();
        assert_eq!(
            faces,
            vec![[15, 17, 19], [16, 18, 20], [27, 29, 31], [28, 30, 32]]
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let topo = Topology::from_pairs(3, &[(0, 1), (1, 2), (2, 0)]).with_name("tri");
        let json = topo.to_json().unwrap();
        assert_eq!(Topology::from_json(&json).unwrap(), topo);
    }

    #[test]
    fn test_toml_topology() {
        let topo = Topology::from_toml("vertex_count = 3\nedges = [[0, 1], [1, 2]]\n").unwrap();
        assert_eq!(topo.vertex_count, 3);
        assert_eq!(topo.edges, vec![Edge::new(0, 1), Edge::new(1, 2)]);
        assert!(topo.name.is_none());
    }

    #[test]
    fn test_invalid_edges_fail_on_graph() {
        let topo = Topology::from_pairs(3, &[(0, 5)]);
        assert!(topo.graph().is_err());
    }
}
