//! CLI command implementations.

pub mod inspect;
pub mod tessellate;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use landmark_mesh::{
    Capture, FrameTransform, PositionSnapshot, TessellateParams, Topology, Triangle,
};

/// Name that selects the built-in pose skeleton instead of a topology file.
const POSE_PRESET: &str = "pose";

/// Load `--topology`: a file path, or `pose`.
pub fn load_topology(spec: &str) -> Result<Topology> {
    if spec.eq_ignore_ascii_case(POSE_PRESET) {
        return Ok(Topology::mediapipe_pose());
    }
    Ok(Topology::load(spec)?)
}

pub fn is_pose(spec: &str) -> bool {
    spec.eq_ignore_ascii_case(POSE_PRESET)
}

/// Parameters from `--config`, or the preset matching the topology.
pub fn load_params(config: Option<&Path>, topology_spec: &str) -> Result<TessellateParams> {
    match config {
        Some(path) => Ok(TessellateParams::from_file(path)?),
        None if is_pose(topology_spec) => Ok(TessellateParams::for_pose()),
        None => Ok(TessellateParams::for_faces()),
    }
}

/// Transform for the capture's first frame.
pub fn frame_transform(capture: &Capture, topology_spec: &str, no_center: bool) -> FrameTransform {
    let mut transform = if is_pose(topology_spec) {
        FrameTransform::for_pose()
    } else {
        FrameTransform::for_faces(&capture.bounds())
    };
    if no_center {
        transform.center = None;
    }
    transform
}

/// Load a capture and resolve `--stride` against the topology.
pub fn load_capture(
    capture_path: &Path,
    topology: &Topology,
    stride: Option<usize>,
) -> Result<(Capture, usize)> {
    let capture = Capture::load(capture_path)?;
    let stride = stride.unwrap_or(topology.vertex_count);
    if stride < topology.vertex_count {
        anyhow::bail!(
            "stride {} is smaller than the topology's {} vertices",
            stride,
            topology.vertex_count
        );
    }
    Ok((capture, stride))
}

/// First-frame snapshot of subject 0, plus the per-subject stride used.
pub fn first_snapshot(
    capture_path: &Path,
    topology: &Topology,
    topology_spec: &str,
    no_center: bool,
    stride: Option<usize>,
) -> Result<(Capture, PositionSnapshot, usize)> {
    let (capture, stride) = load_capture(capture_path, topology, stride)?;
    let transform = frame_transform(&capture, topology_spec, no_center);
    let snapshot = capture
        .first_frame_snapshot(&transform, 0, stride)
        .with_context(|| format!("Failed to read first frame of {:?}", capture_path))?;
    Ok((capture, snapshot, stride))
}

/// Number of `stride`-landmark subjects the indices of `triangles` reach into.
pub fn subjects_spanned(triangles: &[Triangle], stride: usize) -> usize {
    triangles
        .iter()
        .flat_map(|t| t.indices())
        .max()
        .map_or(1, |max| max as usize / stride.max(1) + 1)
}
