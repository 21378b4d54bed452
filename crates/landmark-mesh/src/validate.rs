//! Consistency checks for a finished triangle list.

use hashbrown::HashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MeshError, MeshResult, MeshWarning};
use crate::orient::{Facing, OrientParams, classify};
use crate::params::TessellateParams;
use crate::types::{PositionSnapshot, Triangle, VertexIndex};
use crate::winding::TriangleAdjacency;

/// Validation report for a triangle list against its first-frame positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeshReport {
    /// Positions in the snapshot.
    pub vertex_count: usize,

    /// Triangles checked.
    pub triangle_count: usize,

    /// Triangles repeating an earlier unordered vertex triple.
    pub duplicate_faces: usize,

    /// Triangles with no usable normal.
    pub degenerate_faces: usize,

    /// Non-degenerate triangles wound away from the reference point.
    pub back_facing_faces: usize,

    /// Edges traversed in the same direction by two faces.
    pub inconsistent_edges: usize,

    /// Edges used by exactly one face.
    pub boundary_edges: usize,

    /// Edges used by more than two faces.
    pub non_manifold_edges: usize,

    /// Groups of triangles connected through shared vertices.
    pub component_count: usize,

    /// Triangles outside the component of triangle 0.
    pub unreachable_triangles: usize,
}

impl MeshReport {
    /// Analyze `triangles` against `snapshot`.
    ///
    /// # Errors
    ///
    /// [`MeshError::SnapshotMismatch`] if a triangle references a vertex the
    /// snapshot does not have.
    pub fn analyze(
        triangles: &[Triangle],
        snapshot: &PositionSnapshot,
        params: &TessellateParams,
    ) -> MeshResult<Self> {
        if let Some(max) = triangles.iter().flat_map(|t| t.indices()).max() {
            if max as usize >= snapshot.len() {
                return Err(MeshError::SnapshotMismatch {
                    expected: max as usize + 1,
                    actual: snapshot.len(),
                });
            }
        }

        let orient_params = OrientParams::from(params);
        let mut report = MeshReport {
            vertex_count: snapshot.len(),
            triangle_count: triangles.len(),
            duplicate_faces: find_duplicate_faces(triangles).len(),
            ..MeshReport::default()
        };

        for triangle in triangles {
            match classify(triangle, snapshot, &orient_params) {
                Facing::Front => {}
                Facing::Back => report.back_facing_faces += 1,
                Facing::Degenerate => report.degenerate_faces += 1,
            }
        }

        for usage in edge_usage(triangles).values() {
            match usage.faces() {
                1 => report.boundary_edges += 1,
                2 => {}
                _ => report.non_manifold_edges += 1,
            }
            if usage.is_inconsistent() {
                report.inconsistent_edges += 1;
            }
        }

        let components = TriangleAdjacency::build(triangles).components();
        report.component_count = components.len();
        report.unreachable_triangles = components
            .iter()
            .find(|c| c.first() == Some(&0))
            .map_or(0, |c| triangles.len() - c.len());

        debug!(
            triangles = report.triangle_count,
            duplicates = report.duplicate_faces,
            inconsistent = report.inconsistent_edges,
            non_manifold = report.non_manifold_edges,
            components = report.component_count,
            "Mesh analysis complete"
        );
        if report.inconsistent_edges > 0 {
            warn!(
                inconsistent = report.inconsistent_edges,
                "Shared edges traversed in the same direction"
            );
        }

        Ok(report)
    }

    /// No duplicate faces and no shared edge traversed twice in one direction.
    pub fn is_consistent(&self) -> bool {
        self.duplicate_faces == 0 && self.inconsistent_edges == 0
    }

    /// Every non-degenerate face points toward the reference.
    pub fn is_front_facing(&self) -> bool {
        self.back_facing_faces == 0
    }

    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edges == 0
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(
            f,
            "  Components: {} (unreachable triangles: {})",
            self.component_count, self.unreachable_triangles
        )?;
        writeln!(
            f,
            "  Winding: {} (inconsistent edges: {}, duplicate faces: {})",
            if self.is_consistent() { "consistent" } else { "INCONSISTENT" },
            self.inconsistent_edges,
            self.duplicate_faces
        )?;
        writeln!(
            f,
            "  Facing: {} back-facing, {} degenerate",
            self.back_facing_faces, self.degenerate_faces
        )?;
        write!(
            f,
            "  Manifold: {} (boundary edges: {}, non-manifold edges: {})",
            if self.is_manifold() { "yes" } else { "NO" },
            self.boundary_edges,
            self.non_manifold_edges
        )
    }
}

#[derive(Debug, Default)]
struct EdgeUsage {
    forward: usize,
    backward: usize,
}

impl EdgeUsage {
    fn faces(&self) -> usize {
        self.forward + self.backward
    }

    fn is_inconsistent(&self) -> bool {
        self.forward > 1 || self.backward > 1
    }
}

/// Directed usage per undirected edge, keyed by `(min, max)`.
fn edge_usage(triangles: &[Triangle]) -> HashMap<(VertexIndex, VertexIndex), EdgeUsage> {
    let mut usage: HashMap<(VertexIndex, VertexIndex), EdgeUsage> = HashMap::new();
    for triangle in triangles {
        for (from, to) in triangle.directed_edges() {
            let entry = usage.entry((from.min(to), from.max(to))).or_default();
            if from < to {
                entry.forward += 1;
            } else {
                entry.backward += 1;
            }
        }
    }
    usage
}

/// Pairs `(first, later)` of triangles covering the same unordered triple.
pub fn find_duplicate_faces(triangles: &[Triangle]) -> Vec<(usize, usize)> {
    let mut first_seen: HashMap<[VertexIndex; 3], usize> = HashMap::with_capacity(triangles.len());
    let mut duplicates = Vec::new();
    for (i, triangle) in triangles.iter().enumerate() {
        match first_seen.entry(triangle.sorted()) {
            hashbrown::hash_map::Entry::Occupied(e) => duplicates.push((*e.get(), i)),
            hashbrown::hash_map::Entry::Vacant(e) => {
                e.insert(i);
            }
        }
    }
    duplicates
}

/// `DuplicateFace` warnings for every repeated triple.
pub fn duplicate_warnings(triangles: &[Triangle]) -> Vec<MeshWarning> {
    find_duplicate_faces(triangles)
        .into_iter()
        .map(|(first, second)| MeshWarning::DuplicateFace { first, second })
        .collect()
}

/// Undirected edges that two faces traverse in the same direction, sorted.
pub fn inconsistent_edges(triangles: &[Triangle]) -> Vec<(VertexIndex, VertexIndex)> {
    let mut edges: Vec<_> = edge_usage(triangles)
        .into_iter()
        .filter(|(_, usage)| usage.is_inconsistent())
        .map(|(edge, _)| edge)
        .collect();
    edges.sort_unstable();
    edges
}
