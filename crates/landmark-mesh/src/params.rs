//! Tessellation parameters.
//!
//! Parameters can be built in code, or stored as TOML or JSON and loaded with
//! [`TessellateParams::from_toml_file`] / [`TessellateParams::from_json`].
//!
//! # Example TOML
//!
//! ```toml
//! seed_vertex = 0
//! seed_triangle = 0
//! reference = [0.0, 0.0, 1.0]
//! degenerate_epsilon = 1e-12
//! parallel = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MeshError, MeshResult};

/// Settings for [`crate::Tessellator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellateParams {
    /// Vertex the fan walk starts from.
    pub seed_vertex: u32,
    /// Triangle whose winding the propagation keeps and spreads.
    pub seed_triangle: usize,
    /// Point the mesh is oriented toward.
    pub reference: [f64; 3],
    /// Face normals at or below this length are degenerate.
    pub degenerate_epsilon: f64,
    /// Orient triangles in parallel (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for TessellateParams {
    fn default() -> Self {
        Self {
            seed_vertex: 0,
            seed_triangle: 0,
            reference: [0.0, 0.0, 1.0],
            degenerate_epsilon: 1e-12,
            parallel: false,
        }
    }
}

impl TessellateParams {
    /// Settings for face-mesh captures with centered, doubled coordinates.
    pub fn for_faces() -> Self {
        Self::default()
    }

    /// Settings for body-pose captures.
    ///
    /// Pose world landmarks are in meters around the hips, so the tolerance is
    /// looser than for face captures. The walk starts at the left shoulder
    /// (landmark 11) since the head landmarks are not connected to the body.
    pub fn for_pose() -> Self {
        Self {
            seed_vertex: 11,
            degenerate_epsilon: 1e-9,
            ..Self::default()
        }
    }

    pub fn with_seed_vertex(mut self, seed: u32) -> Self {
        self.seed_vertex = seed;
        self
    }

    pub fn with_seed_triangle(mut self, seed: usize) -> Self {
        self.seed_triangle = seed;
        self
    }

    pub fn with_reference(mut self, reference: [f64; 3]) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_degenerate_epsilon(mut self, epsilon: f64) -> Self {
        self.degenerate_epsilon = epsilon;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject values that cannot produce a meaningful orientation.
    pub fn validate(&self) -> MeshResult<()> {
        if self.reference.iter().any(|c| !c.is_finite()) {
            return Err(MeshError::config(format!(
                "reference point {:?} must be finite",
                self.reference
            )));
        }
        if !(self.degenerate_epsilon >= 0.0 && self.degenerate_epsilon.is_finite()) {
            return Err(MeshError::config(format!(
                "degenerate_epsilon {} must be a finite non-negative number",
                self.degenerate_epsilon
            )));
        }
        Ok(())
    }

    /// Load parameters from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load parameters from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load and validate parameters from a `.toml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| MeshError::io_read(path, e))?;

        let params = match extension(path).as_deref() {
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| MeshError::parse_error(path, e.to_string()))?
            }
            Some("json") => {
                Self::from_json(&contents).map_err(|e| MeshError::parse_error(path, e.to_string()))?
            }
            other => {
                return Err(MeshError::UnsupportedFormat {
                    extension: other.map(str::to_string),
                });
            }
        };

        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| MeshError::io_read(path, e))?;
        let params =
            Self::from_toml(&contents).map_err(|e| MeshError::parse_error(path, e.to_string()))?;
        params.validate()?;
        Ok(params)
    }
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
