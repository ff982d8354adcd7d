//! Batch distance engine.
//!
//! Compares every triangle of the first list against every triangle of the
//! second and keeps the running minimum. The loop is deliberately brute force
//! (no spatial acceleration) and runs on a single thread; the cached layer in
//! [`crate::cache`] moves it off the caller's thread.
//!
//! # Progress
//!
//! After each triangle of the first list has been compared against the whole
//! second list, the engine reports `rows_done / rows_total`. Once all rows are
//! done it reports `1.0` one more time, so a list of `n` triangles produces
//! `n + 1` reports and an empty first list produces exactly one.
//!
//! # Empty input
//!
//! If either list is empty no pair is compared and the distance stays at
//! [`UNMEASURED_DISTANCE`]. That value is indistinguishable from a huge real
//! distance, so callers should check [`DistanceResult::is_measured`] (or the
//! triangle counts) instead of the number.

use std::time::{Duration, Instant};

use crate::geometry::DistanceMetric;
use crate::params::DistanceParams;
use crate::progress::ProgressReporter;
use crate::scan::{MeshSource, scan_triangles};
use crate::tracing_ext::{OperationTimer, log_distance_result, log_progress};
use crate::types::Triangle;

/// Sentinel distance returned when no triangle pair was compared.
pub const UNMEASURED_DISTANCE: f64 = f64::MAX;

/// Outcome of one completed distance computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceResult {
    /// Minimum distance found, or [`UNMEASURED_DISTANCE`].
    pub distance: f64,
    /// Wall-clock duration of the computation.
    pub elapsed: Duration,
    /// Number of triangles in the first mesh.
    pub triangles_a: usize,
    /// Number of triangles in the second mesh.
    pub triangles_b: usize,
}

impl DistanceResult {
    /// Result for inputs that produced no triangle pairs.
    pub fn unmeasured(triangles_a: usize, triangles_b: usize) -> Self {
        Self {
            distance: UNMEASURED_DISTANCE,
            elapsed: Duration::ZERO,
            triangles_a,
            triangles_b,
        }
    }

    /// Whether at least one triangle pair was compared.
    #[inline]
    pub fn is_measured(&self) -> bool {
        self.triangles_a > 0 && self.triangles_b > 0
    }

    /// The distance, or `None` when nothing was compared.
    #[inline]
    pub fn measured_distance(&self) -> Option<f64> {
        self.is_measured().then_some(self.distance)
    }

    /// Lap time in milliseconds.
    #[inline]
    pub fn lap_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Number of triangle pairs compared.
    #[inline]
    pub fn pair_count(&self) -> u64 {
        self.triangles_a as u64 * self.triangles_b as u64
    }
}

impl std::fmt::Display for DistanceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Distance:")?;
        match self.measured_distance() {
            Some(d) => writeln!(f, "  Distance: {:.6}", d)?,
            None => writeln!(f, "  Distance: unmeasured (no triangles to compare)")?,
        }
        writeln!(f, "  Lap: {:.2} ms", self.lap_ms())?;
        writeln!(
            f,
            "  Triangles: {} x {}",
            self.triangles_a, self.triangles_b
        )?;
        Ok(())
    }
}

/// Minimum distance between two triangle lists.
///
/// Returns [`UNMEASURED_DISTANCE`] if either list is empty. Progress, if a
/// reporter is given, follows the schedule described in the module docs.
///
/// # Example
/// ```
/// use mesh_distance::{DistanceMetric, Triangle, mesh_distance};
///
/// let a = Triangle::from_coords([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
/// let b = Triangle::from_coords([10.0, 0.0, 0.0], [11.0, 0.0, 0.0], [10.0, 1.0, 0.0]);
///
/// let d = mesh_distance(&[a], &[b], DistanceMetric::Vertex, None);
/// assert!((d - 9.0).abs() < 1e-12);
/// ```
pub fn mesh_distance(
    triangles_a: &[Triangle],
    triangles_b: &[Triangle],
    metric: DistanceMetric,
    progress: Option<&dyn ProgressReporter>,
) -> f64 {
    let rows = triangles_a.len();
    let mut min_distance = UNMEASURED_DISTANCE;

    for (row, tri_a) in triangles_a.iter().enumerate() {
        for tri_b in triangles_b {
            let distance = metric.triangle_distance(tri_a, tri_b);
            if distance < min_distance {
                min_distance = distance;
            }
        }

        let rows_done = row + 1;
        if let Some(reporter) = progress {
            reporter.report_progress(rows_done as f64 / rows as f64);
        }
        log_progress(rows_done, rows);
    }

    if let Some(reporter) = progress {
        reporter.report_progress(1.0);
    }

    min_distance
}

/// Run the engine on the calling thread and time it.
pub fn measure_distance(
    triangles_a: &[Triangle],
    triangles_b: &[Triangle],
    metric: DistanceMetric,
    progress: Option<&dyn ProgressReporter>,
) -> DistanceResult {
    let start = Instant::now();
    let distance = {
        let timer =
            OperationTimer::with_context("mesh_distance", triangles_a.len(), triangles_b.len());
        let _entered = timer.span().enter();
        mesh_distance(triangles_a, triangles_b, metric, progress)
    };

    let result = DistanceResult {
        distance,
        elapsed: start.elapsed(),
        triangles_a: triangles_a.len(),
        triangles_b: triangles_b.len(),
    };
    log_distance_result(&result);
    result
}

/// Scan two mesh sources and measure them on the calling thread.
///
/// Absent sources scan to empty triangle lists. The lap time includes the
/// scan.
pub fn measure_sources(
    source_a: Option<&dyn MeshSource>,
    source_b: Option<&dyn MeshSource>,
    params: &DistanceParams,
    progress: Option<&dyn ProgressReporter>,
) -> DistanceResult {
    let start = Instant::now();
    let triangles_a = scan_triangles(source_a).unwrap_or_default();
    let triangles_b = scan_triangles(source_b).unwrap_or_default();

    let mut result = measure_distance(&triangles_a, &triangles_b, params.metric, progress);
    result.elapsed = start.elapsed();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn grid(n: usize, z: f64) -> Vec<Triangle> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                Triangle::from_coords([x, 0.0, z], [x + 1.0, 0.0, z], [x, 1.0, z])
            })
            .collect()
    }

    #[test]
    fn test_parallel_layers() {
        let a = grid(4, 0.0);
        let b = grid(3, 2.5);
        let d = mesh_distance(&a, &b, DistanceMetric::Vertex, None);
        assert!((d - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_inputs_are_unmeasured() {
        let a = grid(3, 0.0);
        assert_eq!(
            mesh_distance(&[], &a, DistanceMetric::Vertex, None),
            UNMEASURED_DISTANCE
        );
        assert_eq!(
            mesh_distance(&a, &[], DistanceMetric::EdgeMidpoint, None),
            UNMEASURED_DISTANCE
        );

        let result = measure_distance(&a, &[], DistanceMetric::Vertex, None);
        assert!(!result.is_measured());
        assert_eq!(result.triangles_a, 3);
        assert_eq!(result.triangles_b, 0);
        assert_eq!(result.measured_distance(), None);
    }

    #[test]
    fn test_progress_schedule() {
        let seen = Mutex::new(Vec::new());
        let reporter = |f: f64| seen.lock().unwrap().push(f);

        let a = grid(4, 0.0);
        let b = grid(2, 1.0);
        mesh_distance(&a, &b, DistanceMetric::Vertex, Some(&reporter));

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen, vec![0.25, 0.5, 0.75, 1.0, 1.0]);
    }

    #[test]
    fn test_progress_with_empty_first_list() {
        let seen = Mutex::new(Vec::new());
        let reporter = |f: f64| seen.lock().unwrap().push(f);

        mesh_distance(&[], &grid(2, 0.0), DistanceMetric::Vertex, Some(&reporter));
        assert_eq!(seen.into_inner().unwrap(), vec![1.0]);
    }

    #[test]
    fn test_progress_rows_with_empty_second_list() {
        let seen = Mutex::new(Vec::new());
        let reporter = |f: f64| seen.lock().unwrap().push(f);

        mesh_distance(&grid(2, 0.0), &[], DistanceMetric::Vertex, Some(&reporter));
        assert_eq!(seen.into_inner().unwrap(), vec![0.5, 1.0, 1.0]);
    }

    #[test]
    fn test_measure_distance_record() {
        let a = grid(5, 0.0);
        let b = grid(7, 1.0);
        let result = measure_distance(&a, &b, DistanceMetric::Vertex, None);
        assert!(result.is_measured());
        assert_eq!(result.triangles_a, 5);
        assert_eq!(result.triangles_b, 7);
        assert_eq!(result.pair_count(), 35);
        assert!((result.distance - 1.0).abs() < 1e-12);
        assert!(result.lap_ms() >= 0.0);
    }

    #[test]
    fn test_display() {
        let text = DistanceResult::unmeasured(0, 4).to_string();
        assert!(text.contains("unmeasured"));
        assert!(text.contains("0 x 4"));
    }
}
