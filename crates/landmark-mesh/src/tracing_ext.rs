//! Tracing helpers for reconstruction stages.
//!
//! The library only emits events; install a subscriber in the application to
//! see them:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=landmark_mesh=debug for per-stage detail
//! // RUST_LOG=landmark_mesh::timing=info for stage timings
//! ```
//!
//! # Log Levels
//!
//! - **WARN**: Unreachable triangles, out-of-range seeds
//! - **INFO**: Stage summaries, timing
//! - **DEBUG**: Graph statistics, per-face degenerate reports
//! - **TRACE**: Detailed graph dumps

use std::time::Instant;
use tracing::{Span, debug, info, trace};

use crate::graph::AdjacencyGraph;
use crate::pipeline::Tessellation;

/// A timer that logs its elapsed time when dropped.
///
/// ```rust,ignore
/// use landmark_mesh::tracing_ext::OperationTimer;
///
/// fn stage() {
///     let _timer = OperationTimer::new("stage");
///     // ... work ...
/// } // logs "Operation completed" with elapsed_ms
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("mesh_operation", operation = name);
        debug!(target: "landmark_mesh::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Timer with the topology size attached to its span.
    pub fn with_context(name: &'static str, vertex_count: usize, edge_count: usize) -> Self {
        let span = tracing::info_span!(
            "mesh_operation",
            operation = name,
            vertices = vertex_count,
            edges = edge_count
        );
        debug!(
            target: "landmark_mesh::timing",
            operation = name,
            vertices = vertex_count,
            edges = edge_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            target: "landmark_mesh::timing",
            operation = self.name,
            elapsed_ms = format!("{:.3}", self.elapsed_ms()),
            "Operation completed"
        );
    }
}

/// Log graph statistics at debug level, and the full neighbor lists at trace.
pub fn log_graph_stats(graph: &AdjacencyGraph, context: &str) {
    let max_degree = (0..graph.vertex_count() as u32)
        .map(|v| graph.degree(v))
        .max()
        .unwrap_or(0);

    debug!(
        target: "landmark_mesh::graph",
        context = context,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        isolated = graph.isolated_vertices().len(),
        max_degree = max_degree,
        "Graph state"
    );

    for v in 0..graph.vertex_count() as u32 {
        trace!(
            target: "landmark_mesh::graph",
            vertex = v,
            neighbors = ?graph.neighbors(v),
            "Vertex neighbors"
        );
    }
}

/// Log the outcome of a full tessellation.
pub fn log_tessellation(result: &Tessellation) {
    info!(
        target: "landmark_mesh::pipeline",
        triangles = result.triangles.len(),
        locally_flipped = result.stats.locally_flipped,
        propagated_flips = result.stats.propagated_flips,
        degenerate = result.stats.degenerate_faces,
        unreachable = result.stats.unreachable_triangles,
        warnings = result.warnings.len(),
        "Tessellation completed"
    );
}
