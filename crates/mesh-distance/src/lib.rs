//! Minimum distance between triangle meshes.
//!
//! This crate measures how close two triangle surfaces come to each other by
//! brute force: every triangle of one mesh against every triangle of the
//! other. On top of the synchronous engine sits a cache that answers repeat
//! queries instantly and recomputes in the background when a mesh moves.
//!
//! # Features
//!
//! - **Primitives**: point-to-segment distance, two triangle-to-triangle
//!   approximations ([`DistanceMetric`])
//! - **Batch engine**: [`mesh_distance`] with per-row progress reporting
//! - **Cached queries**: [`DistanceCache`] with non-blocking lookups,
//!   duplicate-launch rejection and transform-based staleness
//! - **File I/O**: Load STL and OBJ meshes
//!
//! # Accuracy
//!
//! Triangle-to-triangle distance is **approximate**. Only vertices (or edge
//! midpoints) of one triangle are tested against the edges of the other, so
//! two triangles that cross through their interiors can report a positive
//! distance, and two edges that pass close to each other in their middles
//! are overestimated. See [`geometry`] for details.
//!
//! # Quick Start
//!
//! ```
//! use mesh_distance::{DistanceMetric, Triangle, mesh_distance};
//!
//! let a = vec![Triangle::from_coords([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])];
//! let b = vec![Triangle::from_coords([0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [0.0, 1.0, 2.0])];
//!
//! let d = mesh_distance(&a, &b, DistanceMetric::Vertex, None);
//! assert!((d - 2.0).abs() < 1e-12);
//! ```
//!
//! # Cached Queries
//!
//! The cache is meant to be polled from a frame or event loop: ask, and if
//! the answer is a miss, launch a computation and keep polling.
//!
//! ```
//! use mesh_distance::{CacheLookup, DistanceCache, SceneMesh, Triangle};
//! use nalgebra::Vector3;
//!
//! let tri = Triangle::from_coords([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
//! let a = SceneMesh::from_triangles(&[tri]);
//! let b = SceneMesh::from_triangles(&[tri]);
//! b.translate(Vector3::new(0.0, 0.0, 3.0));
//!
//! let cache = DistanceCache::new();
//! let distance = loop {
//!     match cache.try_get_cached(&a, &b) {
//!         CacheLookup::Hit(d) => break d,
//!         CacheLookup::InFlight => std::thread::yield_now(),
//!         CacheLookup::Miss => {
//!             cache.start_computation(&a, &b, None);
//!         }
//!     }
//! };
//! assert!((distance - 3.0).abs() < 1e-12);
//!
//! // Moving either mesh invalidates the entry.
//! b.translate(Vector3::new(0.0, 0.0, 1.0));
//! assert_eq!(cache.try_get_cached(&a, &b), CacheLookup::Miss);
//! ```
//!
//! # Empty Meshes
//!
//! If either side has no triangles the engine compares nothing and returns
//! [`UNMEASURED_DISTANCE`] (`f64::MAX`). Use
//! [`DistanceResult::is_measured`] to tell that apart from a real value.
//!
//! # Supported Formats
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | STL    | `.stl`    | Binary & ASCII |
//! | OBJ    | `.obj`    | Polygons are triangulated, all models merged |

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
pub mod tracing_ext;
mod types;

pub mod cache;
pub mod geometry;
pub mod io;
pub mod measure;
pub mod params;
pub mod progress;
pub mod scan;
pub mod transform;

pub use error::{ErrorCode, MeshError, MeshLocation, MeshResult, RecoverySuggestion};
pub use types::{Mesh, Triangle, Vertex};

pub use cache::{CacheEntry, CacheLookup, CacheState, DistanceCache, DistanceHandle, PairKey};
pub use geometry::{
    DistanceMetric, point_to_segment_distance, triangle_distance_edge_midpoint,
    triangle_distance_vertex,
};
pub use io::{MeshFormat, load_mesh, validate_mesh_data};
pub use measure::{
    DistanceResult, UNMEASURED_DISTANCE, measure_distance, measure_sources, mesh_distance,
};
pub use params::DistanceParams;
pub use scan::{MeshId, MeshSource, SceneMesh, scan_triangles};
pub use transform::Transform;

// Re-export progress reporting types for long-running operations
pub use progress::{
    CallbackProgressReporter, ChannelProgressReporter, NoOpProgressReporter, OperationEstimate,
    ProgressCallback, ProgressReporter, estimate_distance_time, progress_channel,
};

// Re-export tracing extensions for structured logging and performance monitoring
pub use tracing_ext::{OperationTimer, log_distance_result, log_mesh_stats, log_progress};

impl Mesh {
    /// Load a mesh from a file, auto-detecting format from extension.
    pub fn load(path: impl AsRef<std::path::Path>) -> MeshResult<Self> {
        io::load_mesh(path.as_ref())
    }

    /// Minimum distance to another mesh, both in their own coordinates.
    ///
    /// Faces with out-of-range indices are skipped.
    pub fn distance_to(&self, other: &Mesh, metric: DistanceMetric) -> DistanceResult {
        let collect = |mesh: &Mesh| -> Vec<Triangle> {
            (0..mesh.face_count())
                .filter_map(|idx| mesh.triangle(idx))
                .collect()
        };
        let triangles_a = collect(self);
        let triangles_b = collect(other);
        measure_distance(&triangles_a, &triangles_b, metric, None)
    }
}
