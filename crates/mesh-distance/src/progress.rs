//! Progress reporting and time estimation for distance computations.
//!
//! The batch engine reports a fraction in `[0, 1]` after every completed row
//! (one triangle of the first mesh against the whole second mesh), followed by
//! a final `1.0`. Reports arrive on whichever thread runs the computation; for
//! cached computations that is a worker thread, so sinks must be `Send + Sync`
//! and should return quickly. Marshaling onto a UI thread is the caller's job;
//! [`progress_channel`] is the simplest way to do it.
//!
//! # Example
//!
//! ```
//! use mesh_distance::progress::progress_channel;
//!
//! let (callback, receiver) = progress_channel();
//! callback(0.5);
//! callback(1.0);
//! let seen: Vec<f64> = receiver.try_iter().collect();
//! assert_eq!(seen, vec![0.5, 1.0]);
//! ```

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::geometry::DistanceMetric;

/// Shared progress callback, invoked with a fraction in `[0, 1]`.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Receiver side of progress reports.
pub trait ProgressReporter: Send + Sync {
    /// Report the completed fraction (0.0 to 1.0).
    fn report_progress(&self, fraction: f64);
}

impl<F> ProgressReporter for F
where
    F: Fn(f64) + Send + Sync + ?Sized,
{
    #[inline]
    fn report_progress(&self, fraction: f64) {
        self(fraction)
    }
}

/// A no-op progress reporter that does nothing.
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    #[inline]
    fn report_progress(&self, _fraction: f64) {}
}

/// A progress reporter that calls a shared [`ProgressCallback`].
pub struct CallbackProgressReporter<'a> {
    callback: &'a ProgressCallback,
}

impl<'a> CallbackProgressReporter<'a> {
    /// Create a new callback reporter.
    pub fn new(callback: &'a ProgressCallback) -> Self {
        Self { callback }
    }
}

impl ProgressReporter for CallbackProgressReporter<'_> {
    #[inline]
    fn report_progress(&self, fraction: f64) {
        (self.callback)(fraction)
    }
}

/// A progress reporter that forwards every report into a channel.
///
/// Sends never block; reports are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelProgressReporter {
    sender: Sender<f64>,
}

impl ChannelProgressReporter {
    /// Create a reporter and the receiver that observes it.
    pub fn new() -> (Self, Receiver<f64>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl ProgressReporter for ChannelProgressReporter {
    #[inline]
    fn report_progress(&self, fraction: f64) {
        let _ = self.sender.send(fraction);
    }
}

/// Create a [`ProgressCallback`] that forwards into a channel.
pub fn progress_channel() -> (ProgressCallback, Receiver<f64>) {
    let (reporter, receiver) = ChannelProgressReporter::new();
    let callback: ProgressCallback =
        Arc::new(move |fraction: f64| reporter.report_progress(fraction));
    (callback, receiver)
}

// ============================================================================
// Operation Time Estimation
// ============================================================================

/// Rough throughput of point-segment queries per second on a mid-range core.
const POINT_SEGMENT_QUERIES_PER_SECOND: f64 = 80_000_000.0;

/// Point-segment queries per triangle pair (both metrics).
const QUERIES_PER_PAIR: u64 = 18;

/// Estimate of a distance computation's cost.
#[derive(Debug, Clone)]
pub struct OperationEstimate {
    /// Number of triangle pairs compared.
    pub pair_count: u64,

    /// Number of point-segment distance evaluations.
    pub point_segment_queries: u64,

    /// Number of progress reports the engine will emit.
    pub progress_reports: u64,

    /// Estimated time in seconds.
    pub estimated_seconds: f64,

    /// Complexity description.
    pub complexity: String,
}

/// Estimate the time for comparing two triangle lists.
///
/// The engine is a single-threaded nested loop, so the estimate scales with
/// the product of the two triangle counts. Midpoint sampling pays a small
/// extra cost for computing midpoints per pair.
pub fn estimate_distance_time(
    triangles_a: usize,
    triangles_b: usize,
    metric: DistanceMetric,
) -> OperationEstimate {
    let pair_count = triangles_a as u64 * triangles_b as u64;
    let point_segment_queries = pair_count * QUERIES_PER_PAIR;

    let overhead = match metric {
        DistanceMetric::Vertex => 1.0,
        DistanceMetric::EdgeMidpoint => 1.15,
    };
    let estimated_seconds =
        point_segment_queries as f64 * overhead / POINT_SEGMENT_QUERIES_PER_SECOND;

    OperationEstimate {
        pair_count,
        point_segment_queries,
        progress_reports: triangles_a as u64 + 1,
        estimated_seconds,
        complexity: "O(A × B)".to_string(),
    }
}
