//! Tracing extensions for distance operations.
//!
//! Structured logging and timing built on the `tracing` facade. The library
//! never installs a subscriber; applications do:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=mesh_distance=debug for cache decisions
//! // RUST_LOG=mesh_distance::progress=trace for per-row progress
//! ```
//!
//! # Targets
//!
//! - `mesh_distance::timing`: operation start (DEBUG) and completion (INFO)
//! - `mesh_distance::progress`: per-row progress (TRACE)
//! - `mesh_distance::cache`: hits, misses, launches, completions
//! - `mesh_distance::io`: mesh loading

use std::time::{Duration, Instant};
use tracing::{Span, debug, info, trace, warn};

use crate::measure::DistanceResult;
use crate::types::Mesh;

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// fn expensive_operation() {
///     let _timer = OperationTimer::new("expensive_operation");
///     // ... do work ...
/// } // logs elapsed_ms here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("distance_operation", operation = name);
        debug!(target: "mesh_distance::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer carrying both triangle counts.
    pub fn with_context(name: &'static str, triangles_a: usize, triangles_b: usize) -> Self {
        let span = tracing::info_span!(
            "distance_operation",
            operation = name,
            triangles_a = triangles_a,
            triangles_b = triangles_b
        );
        debug!(
            target: "mesh_distance::timing",
            operation = name,
            triangles_a = triangles_a,
            triangles_b = triangles_b,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get the elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// The span for this operation. Enter it so that logs emitted while the
    /// operation runs carry its fields.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "mesh_distance::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log mesh statistics at debug level.
pub fn log_mesh_stats(mesh: &Mesh, context: &str) {
    let dims = mesh
        .bounds()
        .map(|(min, max)| max - min)
        .unwrap_or_else(nalgebra::Vector3::zeros);

    debug!(
        target: "mesh_distance::io",
        context = context,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        dimensions = format!("{:.2} x {:.2} x {:.2}", dims.x, dims.y, dims.z),
        "Mesh state"
    );
}

/// Log progress of the batch engine, one event per completed row.
pub fn log_progress(rows_done: usize, rows_total: usize) {
    trace!(
        target: "mesh_distance::progress",
        current = rows_done,
        total = rows_total,
        "Progress update"
    );
}

/// Log a finished distance computation.
pub fn log_distance_result(result: &DistanceResult) {
    if result.is_measured() {
        info!(
            target: "mesh_distance::timing",
            distance = result.distance,
            lap_ms = format!("{:.2}", result.lap_ms()),
            triangles_a = result.triangles_a,
            triangles_b = result.triangles_b,
            "Distance computed"
        );
    } else {
        warn!(
            target: "mesh_distance::timing",
            triangles_a = result.triangles_a,
            triangles_b = result.triangles_b,
            "Distance unmeasured: no triangle pairs to compare"
        );
    }
}
