//! Per-triangle orientation against a fixed reference viewpoint.
//!
//! A triangle `(a, b, c)` with normal `n = (b - a) x (c - a)` faces the viewer
//! when `n . (a - r) < 0`, where `r` is the reference point. Triangles that
//! fail this test have their first and last vertex swapped.

use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::error::MeshWarning;
use crate::params::TessellateParams;
use crate::types::{PositionSnapshot, Triangle};

/// Viewpoint and tolerance used for local orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientParams {
    /// Point the mesh should face.
    pub reference: Point3<f64>,
    /// Normals at or below this length are treated as degenerate.
    pub degenerate_epsilon: f64,
    /// Orient triangles on the rayon thread pool. Requires the `parallel` feature.
    pub parallel: bool,
}

impl Default for OrientParams {
    fn default() -> Self {
        Self {
            reference: Point3::new(0.0, 0.0, 1.0),
            degenerate_epsilon: 1e-12,
            parallel: false,
        }
    }
}

impl From<&TessellateParams> for OrientParams {
    fn from(params: &TessellateParams) -> Self {
        Self {
            reference: Point3::from(params.reference),
            degenerate_epsilon: params.degenerate_epsilon,
            parallel: params.parallel,
        }
    }
}

/// How a single triangle related to the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Already wound toward the viewer.
    Front,
    /// Wound away from the viewer.
    Back,
    /// Normal too short to decide.
    Degenerate,
}

/// Summary of a local orientation pass.
#[derive(Debug, Clone, Default)]
pub struct OrientReport {
    /// Triangles whose winding was reversed.
    pub flipped: usize,
    /// One `DegenerateFace` warning per triangle left untouched for lack of a normal.
    pub warnings: Vec<MeshWarning>,
}

impl OrientReport {
    pub fn degenerate_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, MeshWarning::DegenerateFace { .. }))
            .count()
    }
}

/// Signed facing value `n . (a - r)`; negative means front-facing.
#[inline]
pub fn facing_sign(normal: &Vector3<f64>, a: &Point3<f64>, reference: &Point3<f64>) -> f64 {
    normal.dot(&(a - reference))
}

/// Classify `triangle` against the viewpoint in `params`.
pub fn classify(triangle: &Triangle, snapshot: &PositionSnapshot, params: &OrientParams) -> Facing {
    let normal = snapshot.face_normal(triangle);
    if normal.norm() <= params.degenerate_epsilon {
        return Facing::Degenerate;
    }
    let a = snapshot.position(triangle.0[0]);
    if facing_sign(&normal, a, &params.reference) < 0.0 {
        Facing::Front
    } else {
        Facing::Back
    }
}

/// True if `triangle` is non-degenerate and faces the viewpoint.
pub fn is_front_facing(triangle: &Triangle, snapshot: &PositionSnapshot, params: &OrientParams) -> bool {
    classify(triangle, snapshot, params) == Facing::Front
}

/// Orient every triangle toward the viewpoint in place.
///
/// Degenerate triangles keep their order and are reported. The snapshot must
/// cover every index referenced by `triangles`.
pub fn orient_triangles(
    triangles: &mut [Triangle],
    snapshot: &PositionSnapshot,
    params: &OrientParams,
) -> OrientReport {
    let outcomes = orient_all(triangles, snapshot, params);

    let mut report = OrientReport::default();
    for (triangle_index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Outcome::Kept => {}
            Outcome::Flipped => report.flipped += 1,
            Outcome::Degenerate(normal_length) => {
                let triangle = triangles[triangle_index];
                debug!(
                    triangle_index,
                    %triangle,
                    normal_length,
                    "Degenerate face, keeping enumerated winding"
                );
                report.warnings.push(MeshWarning::DegenerateFace {
                    triangle_index,
                    triangle,
                    normal_length,
                });
            }
        }
    }

    info!(
        triangles = triangles.len(),
        flipped = report.flipped,
        degenerate = report.warnings.len(),
        "Oriented triangles toward reference viewpoint"
    );

    report
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Kept,
    Flipped,
    Degenerate(f64),
}

fn orient_one(triangle: &mut Triangle, snapshot: &PositionSnapshot, params: &OrientParams) -> Outcome {
    let normal = snapshot.face_normal(triangle);
    let length = normal.norm();
    if length <= params.degenerate_epsilon {
        return Outcome::Degenerate(length);
    }
    let a = snapshot.position(triangle.0[0]);
    if facing_sign(&normal, a, &params.reference) < 0.0 {
        Outcome::Kept
    } else {
        triangle.flip();
        Outcome::Flipped
    }
}

#[cfg(feature = "parallel")]
fn orient_all(
    triangles: &mut [Triangle],
    snapshot: &PositionSnapshot,
    params: &OrientParams,
) -> Vec<Outcome> {
    use rayon::prelude::*;

    if params.parallel {
        triangles
            .par_iter_mut()
            .map(|t| orient_one(t, snapshot, params))
            .collect()
    } else {
        triangles
            .iter_mut()
            .map(|t| orient_one(t, snapshot, params))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn orient_all(
    triangles: &mut [Triangle],
    snapshot: &PositionSnapshot,
    params: &OrientParams,
) -> Vec<Outcome> {
    if params.parallel {
        debug!("Parallel orientation requested without the `parallel` feature, running serially");
    }
    triangles
        .iter_mut()
        .map(|t| orient_one(t, snapshot, params))
        .collect()
}
