//! Capture ingestion: landmark frames, centering, and multi-subject packing.
//!
//! A capture file is a JSON array of frames, each an array of landmarks:
//!
//! ```json
//! [
//!   [{"id": 0, "x": 0.51, "y": 0.43, "z": -0.02}, ...],
//!   [{"id": 0, "x": 0.52, "y": 0.43, "z": -0.02}, ...]
//! ]
//! ```
//!
//! When several subjects are tracked, each frame holds their landmarks back
//! to back, `N` per subject. Only the first frame is used for reconstruction;
//! the other frames are carried for whoever renders them.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::types::{PositionSnapshot, Triangle};

/// One tracked point in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(default)]
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Subject the landmark belongs to, when the tracker reports it.
    #[serde(
        default,
        rename = "face-id",
        skip_serializing_if = "Option::is_none"
    )]
    pub face_id: Option<u32>,
}

impl Landmark {
    pub fn new(id: u32, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            x,
            y,
            z,
            face_id: None,
        }
    }
}

impl std::fmt::Display for Landmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.6}, {:.6}, {:.6}", self.id, self.x, self.y, self.z)
    }
}

/// Axis-aligned bounds over every landmark of every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Bounds containing nothing; the first `encompass` sets both corners.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn encompass(&mut self, x: f64, y: f64, z: f64) {
        let p = Point3::new(x, y, z);
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

/// Maps raw tracker coordinates into scene coordinates.
///
/// `p' = scale * (p - center)` with the Y axis negated when `flip_y` is set,
/// since tracker image coordinates grow downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub center: Option<Point3<f64>>,
    pub scale: f64,
    pub flip_y: bool,
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl FrameTransform {
    pub fn identity() -> Self {
        Self {
            center: None,
            scale: 1.0,
            flip_y: false,
        }
    }

    /// Face captures: centered on the capture bounds, doubled, Y up.
    pub fn for_faces(bounds: &Bounds) -> Self {
        Self {
            center: (!bounds.is_empty()).then(|| bounds.center()),
            scale: 2.0,
            flip_y: true,
        }
    }

    /// Pose world landmarks are already centered on the hips: doubled, Y up.
    pub fn for_pose() -> Self {
        Self {
            center: None,
            scale: 2.0,
            flip_y: true,
        }
    }

    pub fn apply(&self, landmark: &Landmark) -> Point3<f64> {
        let mut p = Point3::new(landmark.x, landmark.y, landmark.z);
        if let Some(center) = self.center {
            p = Point3::from(p - center);
        }
        let y_sign = if self.flip_y { -1.0 } else { 1.0 };
        Point3::new(p.x * self.scale, p.y * self.scale * y_sign, p.z * self.scale)
    }
}

/// Every frame of a landmark capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capture {
    pub frames: Vec<Vec<Landmark>>,
}

impl Capture {
    pub fn new(frames: Vec<Vec<Landmark>>) -> Self {
        Self { frames }
    }

    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Load a capture from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| MeshError::io_read(path, e))?;
        let capture =
            Self::from_json(&contents).map_err(|e| MeshError::parse_error(path, e.to_string()))?;
        info!(
            path = %path.display(),
            frames = capture.frame_count(),
            landmarks = capture.frames.first().map_or(0, Vec::len),
            "Loaded capture"
        );
        Ok(capture)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Bounds over all frames.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for frame in &self.frames {
            for mark in frame {
                bounds.encompass(mark.x, mark.y, mark.z);
            }
        }
        bounds
    }

    /// Number of complete `n`-landmark subjects in the first frame.
    pub fn instance_count(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.frames.first().map_or(0, |f| f.len() / n)
    }

    /// Positions of subject `instance` in frame `frame`, as a snapshot of `n` vertices.
    pub fn frame_snapshot(
        &self,
        frame: usize,
        transform: &FrameTransform,
        instance: usize,
        n: usize,
    ) -> MeshResult<PositionSnapshot> {
        let marks = self.frames.get(frame).ok_or(MeshError::EmptyCapture)?;
        let start = instance.saturating_mul(n);
        let end = start.saturating_add(n);
        if marks.len() < end {
            return Err(MeshError::SnapshotMismatch {
                expected: n,
                actual: marks.len().saturating_sub(start),
            });
        }

        let positions = marks[start..end].iter().map(|m| transform.apply(m)).collect();
        debug!(frame, instance, vertices = n, "Extracted frame snapshot");
        Ok(PositionSnapshot::new(positions))
    }

    /// The first-frame reference pose for subject `instance`.
    pub fn first_frame_snapshot(
        &self,
        transform: &FrameTransform,
        instance: usize,
        n: usize,
    ) -> MeshResult<PositionSnapshot> {
        if self.is_empty() {
            return Err(MeshError::EmptyCapture);
        }
        self.frame_snapshot(0, transform, instance, n)
    }
}

/// Shift `triangles` to address subject `instance` in a packed `n`-per-subject layout.
///
/// # Errors
///
/// [`MeshError::IndexOverflow`] if a shifted index does not fit in a `u32`.
pub fn offset_triangles(
    triangles: &[Triangle],
    instance: usize,
    n: usize,
) -> MeshResult<Vec<Triangle>> {
    let overflow = || MeshError::IndexOverflow {
        instance,
        stride: n,
    };
    let offset = instance
        .checked_mul(n)
        .and_then(|o| u32::try_from(o).ok())
        .ok_or_else(overflow)?;
    triangles
        .iter()
        .map(|t| t.checked_offset(offset).ok_or_else(overflow))
        .collect()
}

/// One offset copy of `triangles` per subject.
pub fn pack_instances(
    triangles: &[Triangle],
    instances: usize,
    n: usize,
) -> MeshResult<Vec<Vec<Triangle>>> {
    (0..instances)
        .map(|instance| offset_triangles(triangles, instance, n))
        .collect()
}
