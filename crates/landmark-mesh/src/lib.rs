//! Triangle mesh reconstruction for landmark trackers.
//!
//! Landmark models (face meshes, body pose skeletons) publish a fixed list of
//! connections between landmarks, but no triangles. This crate recovers the
//! triangles once from that connection list, orients them against the first
//! captured frame, and makes their winding consistent. The resulting index
//! buffer is reused unchanged for every later frame.
//!
//! # Features
//!
//! - **Graph**: Validated, deduplicated adjacency lists in first-mention order
//! - **Enumeration**: Deterministic fan walk that finds every 3-cycle reachable from a seed
//! - **Orientation**: Per-triangle winding toward a reference viewpoint
//! - **Propagation**: Breadth-first winding agreement across shared vertices
//! - **Captures**: Landmark frame loading, centering, scaling, and multi-subject packing
//! - **Validation**: Duplicate, inconsistent, non-manifold, and unreachable face counts
//!
//! # Coordinate System
//!
//! Face captures are centered on their bounding box, doubled, and mirrored in
//! Y before orientation. The default viewpoint is `(0, 0, 1)`; a triangle is
//! front-facing when its normal points away from it, `n . (a - r) < 0`.
//!
//! # Quick Start
//!
//! ```no_run
//! use landmark_mesh::{Capture, FrameTransform, TessellateParams, Tessellator, Topology};
//!
//! let topology = Topology::load("face_topology.json").unwrap();
//! let capture = Capture::load("capture.json").unwrap();
//!
//! let transform = FrameTransform::for_faces(&capture.bounds());
//! let snapshot = capture.first_frame_snapshot(&transform, 0, 478).unwrap();
//!
//! let result = Tessellator::new(&topology)
//!     .unwrap()
//!     .with_params(TessellateParams::for_faces())
//!     .run(&snapshot)
//!     .unwrap();
//!
//! for warning in &result.warnings {
//!     println!("{}: {}", warning.code(), warning);
//! }
//! landmark_mesh::save_obj("face.obj", &snapshot, &result.triangles).unwrap();
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return `MeshResult<T>`, which is `Result<T, MeshError>`.
//! Structural problems in the connection list are fatal; faces that cannot be
//! oriented are kept and reported as [`MeshWarning`]s.
//!
//! ```
//! use landmark_mesh::{MeshError, Topology};
//!
//! let topology = Topology::from_pairs(3, &[(0, 1), (1, 1)]);
//! match topology.graph() {
//!     Ok(_) => println!("valid"),
//!     Err(MeshError::InvalidTopology { details }) => println!("bad topology: {}", details),
//!     Err(e) => println!("other error: {}", e),
//! }
//! ```
//!
//! # Logging
//!
//! Events are emitted through `tracing`; see [`tracing_ext`] for targets and
//! levels.

mod error;
mod frames;
mod graph;
mod params;
mod pipeline;
mod topology;
pub mod tracing_ext;
mod types;

pub mod enumerate;
pub mod io;
pub mod orient;
pub mod validate;
pub mod winding;

pub use error::{ErrorCode, MeshError, MeshResult, MeshWarning, WarningSeverity};
pub use types::{Edge, PositionSnapshot, Triangle, VertexIndex};

pub use graph::AdjacencyGraph;
pub use params::TessellateParams;
pub use pipeline::{Tessellation, TessellationStats, Tessellator, tessellate};
pub use topology::Topology;

pub use enumerate::{Enumeration, enumerate_triangles, walk_fans};
pub use frames::{Bounds, Capture, FrameTransform, Landmark, offset_triangles, pack_instances};
pub use io::{load_triangles_json, save_obj, save_triangles_json};
pub use orient::{Facing, OrientParams, OrientReport, orient_triangles};
pub use validate::{MeshReport, find_duplicate_faces};
pub use winding::{PropagationReport, TriangleAdjacency, propagate_winding};
