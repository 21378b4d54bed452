//! Error and warning types for mesh reconstruction.
//!
//! Two categories of problems come out of the pipeline:
//! - [`MeshError`]: structural failures (bad topology, snapshot that does not
//!   cover the topology, unreadable files). These abort the operation.
//! - [`MeshWarning`]: geometric anomalies on individual faces. These are
//!   collected into reports and never abort the pipeline.
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `MESH-XXXX`:
//! - `MESH-1xxx`: I/O errors (file reading, writing, parsing)
//! - `MESH-2xxx`: Structural errors (topology, snapshot coverage)
//! - `MESH-4xxx`: Format and configuration errors
//!
//! # Example
//!
//! ```
//! use landmark_mesh::{ErrorCode, MeshError};
//!
//! let err = MeshError::self_loop(3, 2);
//! assert_eq!(err.code(), ErrorCode::InvalidTopology);
//! assert_eq!(err.code().as_str(), "MESH-2001");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::Triangle;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // I/O errors (1xxx)
    /// MESH-1001: Failed to read file
    IoRead = 1001,
    /// MESH-1002: Failed to write file
    IoWrite = 1002,
    /// MESH-1003: Failed to parse file contents
    ParseError = 1003,

    // Structural errors (2xxx)
    /// MESH-2001: Edge references an invalid or self-referential vertex
    InvalidTopology = 2001,
    /// MESH-2002: Position snapshot does not cover the topology
    SnapshotMismatch = 2002,
    /// MESH-2003: Capture contains no frames
    EmptyCapture = 2003,
    /// MESH-2004: Offset vertex index does not fit in 32 bits
    IndexOverflow = 2004,

    // Format errors (4xxx)
    /// MESH-4001: Unsupported file format
    UnsupportedFormat = 4001,
    /// MESH-4002: Invalid configuration
    ConfigError = 4002,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `MESH-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "MESH-1001",
            ErrorCode::IoWrite => "MESH-1002",
            ErrorCode::ParseError => "MESH-1003",
            ErrorCode::InvalidTopology => "MESH-2001",
            ErrorCode::SnapshotMismatch => "MESH-2002",
            ErrorCode::EmptyCapture => "MESH-2003",
            ErrorCode::IndexOverflow => "MESH-2004",
            ErrorCode::UnsupportedFormat => "MESH-4001",
            ErrorCode::ConfigError => "MESH-4002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that abort graph construction or pipeline execution.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Error reading from a file.
    #[error("failed to read {path}")]
    #[diagnostic(
        code(mesh::io::read),
        help("Check that the file exists and is readable. Try: ls -la {}", path.display())
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write {path}")]
    #[diagnostic(
        code(mesh::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing file contents.
    #[error("failed to parse {path}: {details}")]
    #[diagnostic(
        code(mesh::parse::error),
        help("Capture files are JSON arrays of frames; topology files are JSON or TOML with `vertex_count` and `edges`.")
    )]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file extension.
    #[error("unsupported file format: {extension:?}")]
    #[diagnostic(
        code(mesh::format::unsupported),
        help("Supported formats: .json and .toml for configuration, .json for captures")
    )]
    UnsupportedFormat { extension: Option<String> },

    /// Invalid topology: an edge is a self-loop or references a vertex outside `[0, N)`.
    #[error("invalid topology: {details}")]
    #[diagnostic(
        code(mesh::topology::invalid),
        help("Every edge must join two distinct vertices below the declared vertex count.")
    )]
    InvalidTopology { details: String },

    /// Position snapshot is shorter than the topology's vertex count.
    #[error("position snapshot covers {actual} vertices, topology needs {expected}")]
    #[diagnostic(
        code(mesh::snapshot::mismatch),
        help("Make sure the capture was recorded with the same landmark model as the topology.")
    )]
    SnapshotMismatch { expected: usize, actual: usize },

    /// Capture has no frames to take a reference pose from.
    #[error("capture contains no frames")]
    #[diagnostic(
        code(mesh::capture::empty),
        help("At least one frame is needed to orient the mesh.")
    )]
    EmptyCapture,

    /// Packing subjects back to back pushed an index past `u32::MAX`.
    #[error("subject {instance} with {stride} landmarks per subject overflows 32-bit indices")]
    #[diagnostic(
        code(mesh::capture::index_overflow),
        help("Split the capture into fewer subjects per index buffer.")
    )]
    IndexOverflow { instance: usize, stride: usize },

    /// Invalid tessellation configuration.
    #[error("invalid configuration: {details}")]
    #[diagnostic(code(mesh::config::invalid))]
    ConfigError { details: String },
}

impl MeshError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::IoRead { .. } => ErrorCode::IoRead,
            MeshError::IoWrite { .. } => ErrorCode::IoWrite,
            MeshError::ParseError { .. } => ErrorCode::ParseError,
            MeshError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            MeshError::InvalidTopology { .. } => ErrorCode::InvalidTopology,
            MeshError::SnapshotMismatch { .. } => ErrorCode::SnapshotMismatch,
            MeshError::EmptyCapture => ErrorCode::EmptyCapture,
            MeshError::IndexOverflow { .. } => ErrorCode::IndexOverflow,
            MeshError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// True for errors caused by the input topology or capture structure.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            MeshError::InvalidTopology { .. }
                | MeshError::SnapshotMismatch { .. }
                | MeshError::EmptyCapture
        )
    }

    // Constructor helpers for common error patterns

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseError.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        MeshError::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an InvalidTopology error.
    pub fn invalid_topology(details: impl Into<String>) -> Self {
        MeshError::InvalidTopology {
            details: details.into(),
        }
    }

    /// Edge `edge_index` joins vertex `vertex` to itself.
    pub fn self_loop(edge_index: usize, vertex: u32) -> Self {
        Self::invalid_topology(format!(
            "edge {} is a self-loop on vertex {}",
            edge_index, vertex
        ))
    }

    /// Edge `edge_index` references `vertex`, which is not below `vertex_count`.
    pub fn vertex_out_of_range(edge_index: usize, vertex: u32, vertex_count: usize) -> Self {
        Self::invalid_topology(format!(
            "edge {} references vertex {}, but topology only has {} vertices",
            edge_index, vertex, vertex_count
        ))
    }

    /// Create a ConfigError.
    pub fn config(details: impl Into<String>) -> Self {
        MeshError::ConfigError {
            details: details.into(),
        }
    }
}

/// Recoverable anomalies collected while reconstructing a mesh.
///
/// Faces that trigger a warning are kept in the output; the caller decides
/// whether to surface the warning.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshWarning {
    /// Triangle positions are collinear or coincident, so its facing is undefined.
    /// The face keeps its enumerated winding.
    DegenerateFace {
        triangle_index: usize,
        triangle: Triangle,
        normal_length: f64,
    },
    /// Triangles the winding propagation never reached from the seed triangle.
    /// They keep the winding chosen by local orientation.
    UnreachableComponent {
        triangle_count: usize,
        first_triangle: usize,
    },
    /// Two faces cover the same unordered vertex triple.
    DuplicateFace { first: usize, second: usize },
    /// Vertices the fan walk never reached from the seed vertex. No triangle
    /// touching them is in the output.
    UnvisitedVertices {
        vertex_count: usize,
        first_vertex: u32,
    },
}

/// Severity levels for warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningSeverity {
    /// Informational, no action needed.
    Info,
    /// Output may render incorrectly in places.
    Warning,
}

impl MeshWarning {
    /// Returns a severity level for the warning.
    pub fn severity(&self) -> WarningSeverity {
        match self {
            MeshWarning::DegenerateFace { .. } => WarningSeverity::Info,
            MeshWarning::UnreachableComponent { .. } => WarningSeverity::Warning,
            MeshWarning::DuplicateFace { .. } => WarningSeverity::Warning,
            MeshWarning::UnvisitedVertices { .. } => WarningSeverity::Warning,
        }
    }

    /// Returns a code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            MeshWarning::DegenerateFace { .. } => "MESH-2005",
            MeshWarning::UnreachableComponent { .. } => "MESH-2006",
            MeshWarning::DuplicateFace { .. } => "MESH-2007",
            MeshWarning::UnvisitedVertices { .. } => "MESH-2008",
        }
    }
}

impl std::fmt::Display for MeshWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshWarning::DegenerateFace {
                triangle_index,
                triangle,
                normal_length,
            } => write!(
                f,
                "triangle {} {} is degenerate (normal length {:.2e})",
                triangle_index, triangle, normal_length
            ),
            MeshWarning::UnreachableComponent {
                triangle_count,
                first_triangle,
            } => write!(
                f,
                "{} triangles (first: {}) are not connected to the seed triangle",
                triangle_count, first_triangle
            ),
            MeshWarning::DuplicateFace { first, second } => {
                write!(f, "triangles {} and {} cover the same face", first, second)
            }
            MeshWarning::UnvisitedVertices {
                vertex_count,
                first_vertex,
            } => write!(
                f,
                "{} vertices (first: {}) are not connected to the seed vertex",
                vertex_count, first_vertex
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MeshError::vertex_out_of_range(4, 12, 10);
        assert_eq!(err.code(), ErrorCode::InvalidTopology);
        assert_eq!(err.code().as_str(), "MESH-2001");
        assert!(err.is_structural());

        let err = MeshError::SnapshotMismatch {
            expected: 468,
            actual: 10,
        };
        assert_eq!(err.code().to_string(), "MESH-2002");
    }

    #[test]
    fn test_error_display() {
        let err = MeshError::vertex_out_of_range(4, 12, 10);
        let display = err.to_string();
        assert!(display.contains("edge 4"));
        assert!(display.contains("vertex 12"));
        assert!(display.contains("10 vertices"));

        let err = MeshError::self_loop(0, 2);
        assert!(err.to_string().contains("self-loop on vertex 2"));
    }

    #[test]
    fn test_io_errors_are_not_structural() {
        let err = MeshError::io_read(
            "missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert!(!err.is_structural());
        assert_eq!(err.code(), ErrorCode::IoRead);
    }

    #[test]
    fn test_warning_severity() {
        let w = MeshWarning::DegenerateFace {
            triangle_index: 0,
            triangle: Triangle::new(0, 1, 2),
            normal_length: 0.0,
        };
        assert_eq!(w.severity(), WarningSeverity::Info);
        assert_eq!(w.code(), "MESH-2005");

        let w = MeshWarning::UnreachableComponent {
            triangle_count: 3,
            first_triangle: 7,
        };
        assert_eq!(w.severity(), WarningSeverity::Warning);
        assert!(w.to_string().contains("3 triangles"));

        let w = MeshWarning::UnvisitedVertices {
            vertex_count: 11,
            first_vertex: 0,
        };
        assert_eq!(w.code(), "MESH-2008");
        assert!(w.to_string().contains("11 vertices"));
    }
}
