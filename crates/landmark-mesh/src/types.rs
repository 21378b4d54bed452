//! Core data types shared by every pipeline stage.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Landmark index in `[0, N)`.
pub type VertexIndex = u32;

/// An undirected connection between two landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Edge {
    pub a: VertexIndex,
    pub b: VertexIndex,
}

impl Edge {
    #[inline]
    pub fn new(a: VertexIndex, b: VertexIndex) -> Self {
        Self { a, b }
    }

    /// `(min, max)` key; mirrored declarations share it.
    #[inline]
    pub fn canonical(&self) -> (VertexIndex, VertexIndex) {
        if self.a < self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }
}

impl From<[u32; 2]> for Edge {
    fn from([a, b]: [u32; 2]) -> Self {
        Self { a, b }
    }
}

impl From<Edge> for [u32; 2] {
    fn from(edge: Edge) -> Self {
        [edge.a, edge.b]
    }
}

impl From<(u32, u32)> for Edge {
    fn from((a, b): (u32, u32)) -> Self {
        Self { a, b }
    }
}

/// An ordered vertex triple. The order encodes winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Triangle(pub [VertexIndex; 3]);

impl Triangle {
    #[inline]
    pub fn new(v0: VertexIndex, v1: VertexIndex, v2: VertexIndex) -> Self {
        Self([v0, v1, v2])
    }

    #[inline]
    pub fn indices(&self) -> [VertexIndex; 3] {
        self.0
    }

    /// Reverse the winding in place by swapping the first and last vertex.
    #[inline]
    pub fn flip(&mut self) {
        self.0.swap(0, 2);
    }

    /// The same face with opposite winding, `(v2, v1, v0)`.
    #[inline]
    pub fn reversed(&self) -> Self {
        let [v0, v1, v2] = self.0;
        Self([v2, v1, v0])
    }

    /// Vertex triple in ascending order, the key for face identity.
    #[inline]
    pub fn sorted(&self) -> [VertexIndex; 3] {
        let mut key = self.0;
        key.sort_unstable();
        key
    }

    /// True if both triangles cover the same unordered vertex triple.
    #[inline]
    pub fn same_face(&self, other: &Triangle) -> bool {
        self.sorted() == other.sorted()
    }

    #[inline]
    pub fn contains(&self, v: VertexIndex) -> bool {
        self.0.contains(&v)
    }

    /// The three directed edges `(v0,v1)`, `(v1,v2)`, `(v2,v0)` in winding order.
    #[inline]
    pub fn directed_edges(&self) -> [(VertexIndex, VertexIndex); 3] {
        let [v0, v1, v2] = self.0;
        [(v0, v1), (v1, v2), (v2, v0)]
    }

    /// Direction in which this triangle walks the undirected edge `{a, b}`.
    ///
    /// `Some(true)` for `a -> b`, `Some(false)` for `b -> a`, `None` if the
    /// edge is not part of the triangle.
    pub fn edge_direction(&self, a: VertexIndex, b: VertexIndex) -> Option<bool> {
        for (from, to) in self.directed_edges() {
            if from == a && to == b {
                return Some(true);
            }
            if from == b && to == a {
                return Some(false);
            }
        }
        None
    }

    /// Add `offset` to every index, or `None` if any index would overflow.
    #[inline]
    pub fn checked_offset(&self, offset: VertexIndex) -> Option<Self> {
        let [v0, v1, v2] = self.0;
        Some(Self([
            v0.checked_add(offset)?,
            v1.checked_add(offset)?,
            v2.checked_add(offset)?,
        ]))
    }
}

impl From<[u32; 3]> for Triangle {
    fn from(v: [u32; 3]) -> Self {
        Self(v)
    }
}

impl std::fmt::Display for Triangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [v0, v1, v2] = self.0;
        write!(f, "[{}, {}, {}]", v0, v1, v2)
    }
}

/// First-frame landmark positions, indexed by vertex.
///
/// This is the only geometry the reconstruction looks at. It is never mutated
/// once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSnapshot {
    positions: Vec<Point3<f64>>,
}

impl PositionSnapshot {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    /// Build from raw `[x, y, z]` triples.
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self {
            positions: coords
                .iter()
                .map(|&[x, y, z]| Point3::new(x, y, z))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of vertex `v`. Callers validate coverage up front.
    #[inline]
    pub fn position(&self, v: VertexIndex) -> &Point3<f64> {
        &self.positions[v as usize]
    }

    #[inline]
    pub fn get(&self, v: VertexIndex) -> Option<&Point3<f64>> {
        self.positions.get(v as usize)
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Unnormalized face normal `(b - a) x (c - a)` of `triangle`.
    #[inline]
    pub fn face_normal(&self, triangle: &Triangle) -> Vector3<f64> {
        let [i0, i1, i2] = triangle.0;
        let a = self.position(i0);
        let b = self.position(i1);
        let c = self.position(i2);
        (b - a).cross(&(c - a))
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }
}

impl From<Vec<Point3<f64>>> for PositionSnapshot {
    fn from(positions: Vec<Point3<f64>>) -> Self {
        Self::new(positions)
    }
}
