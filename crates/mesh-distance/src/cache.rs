//! Cached, non-blocking distance queries between pairs of mesh sources.
//!
//! [`DistanceCache`] keeps one entry per ordered pair of [`MeshId`]s. An
//! entry is created the moment a computation is launched and records the
//! transforms of both meshes at that moment. The computation runs on a rayon
//! worker; when it finishes the entry becomes active and carries the
//! distance.
//!
//! # Entry lifecycle
//!
//! ```text
//! Absent ──start──▶ Computing ──done──▶ Ready ──mesh moved──▶ Stale
//!    ▲                  │                                       │
//!    └──worker panic────┘              Stale ──start──▶ Computing
//! ```
//!
//! - A launch is rejected while the pair is `Computing`.
//! - A `Ready` entry whose snapshots no longer equal the live transforms
//!   (exact comparison) is reported as a miss.
//! - The key is ordered: `(a, b)` and `(b, a)` are separate entries.
//! - Entries are never evicted.
//!
//! # Example
//! ```
//! use mesh_distance::{CacheLookup, DistanceCache, SceneMesh, Triangle};
//!
//! let a = SceneMesh::from_triangles(&[Triangle::from_coords(
//!     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0],
//! )]);
//! let b = SceneMesh::from_triangles(&[Triangle::from_coords(
//!     [10.0, 0.0, 0.0], [11.0, 0.0, 0.0], [10.0, 1.0, 0.0],
//! )]);
//!
//! let cache = DistanceCache::new();
//! assert_eq!(cache.try_get_cached(&a, &b), CacheLookup::Miss);
//!
//! let handle = cache.start_computation(&a, &b, None).unwrap();
//! let result = handle.wait().unwrap();
//! assert!((result.distance - 9.0).abs() < 1e-12);
//! assert_eq!(cache.try_get_cached(&a, &b), CacheLookup::Hit(result.distance));
//! ```

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Instant;

use futures::channel::oneshot;
use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::error::{MeshError, MeshResult};
use crate::measure::{DistanceResult, UNMEASURED_DISTANCE, mesh_distance};
use crate::params::DistanceParams;
use crate::progress::{CallbackProgressReporter, ProgressCallback, ProgressReporter};
use crate::scan::{MeshId, MeshSource};
use crate::tracing_ext::{OperationTimer, log_distance_result};
use crate::transform::Transform;

/// Ordered pair of mesh identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub first: MeshId,
    pub second: MeshId,
}

impl PairKey {
    pub fn new(first: MeshId, second: MeshId) -> Self {
        Self { first, second }
    }

    /// Key for two sources, in argument order.
    pub fn of(a: &dyn MeshSource, b: &dyn MeshSource) -> Self {
        Self::new(a.mesh_id(), b.mesh_id())
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// One cache slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    /// Last computed distance; [`UNMEASURED_DISTANCE`] until the first
    /// computation for this pair completes.
    pub distance: f64,
    /// `false` while a computation for this pair is in flight.
    pub active: bool,
    /// Transform of the first mesh when the computation was launched.
    pub snapshot_a: Transform,
    /// Transform of the second mesh when the computation was launched.
    pub snapshot_b: Transform,
}

impl CacheEntry {
    fn in_flight(snapshot_a: Transform, snapshot_b: Transform) -> Self {
        Self {
            distance: UNMEASURED_DISTANCE,
            active: false,
            snapshot_a,
            snapshot_b,
        }
    }

    /// Whether both snapshots equal the given transforms exactly.
    pub fn matches(&self, transform_a: &Transform, transform_b: &Transform) -> bool {
        self.snapshot_a == *transform_a && self.snapshot_b == *transform_b
    }
}

/// Where a pair sits in the entry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CacheState {
    /// Never launched, or the last launch aborted.
    Absent,
    /// A computation is in flight.
    Computing,
    /// Completed and both meshes are where they were at launch.
    Ready(f64),
    /// Completed but at least one mesh has moved since launch.
    Stale,
}

/// Answer to [`DistanceCache::try_get_cached`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CacheLookup {
    /// A valid distance is available.
    Hit(f64),
    /// A computation is in flight; try again later.
    InFlight,
    /// Nothing usable: never computed, or computed for old transforms.
    Miss,
}

impl CacheLookup {
    #[inline]
    pub fn found(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    #[inline]
    pub fn in_flight(&self) -> bool {
        matches!(self, CacheLookup::InFlight)
    }

    /// The cached distance, if this is a hit.
    #[inline]
    pub fn distance(&self) -> Option<f64> {
        match self {
            CacheLookup::Hit(distance) => Some(*distance),
            _ => None,
        }
    }
}

impl From<CacheState> for CacheLookup {
    fn from(state: CacheState) -> Self {
        match state {
            CacheState::Ready(distance) => CacheLookup::Hit(distance),
            CacheState::Computing => CacheLookup::InFlight,
            CacheState::Absent | CacheState::Stale => CacheLookup::Miss,
        }
    }
}

type EntryMap = HashMap<PairKey, CacheEntry>;

fn lock_entries(entries: &Mutex<EntryMap>) -> MutexGuard<'_, EntryMap> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pairwise distance cache with background computation.
///
/// Cloning is cheap and yields another handle to the same entries and pool.
#[derive(Debug, Clone)]
pub struct DistanceCache {
    entries: Arc<Mutex<EntryMap>>,
    params: DistanceParams,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Default for DistanceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceCache {
    /// Empty cache using the vertex metric on rayon's global pool.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            params: DistanceParams::default(),
            pool: None,
        }
    }

    /// Empty cache with custom parameters.
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidParams`] for invalid params and
    /// [`MeshError::WorkerPool`] if a dedicated pool cannot be started.
    pub fn with_params(params: DistanceParams) -> MeshResult<Self> {
        params.validate()?;

        let pool = match params.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("mesh-distance-{i}"))
                    .build()
                    .map_err(|e| MeshError::WorkerPool {
                        details: e.to_string(),
                    })?;
                Some(Arc::new(pool))
            }
            None => None,
        };

        Ok(Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            params,
            pool,
        })
    }

    pub fn params(&self) -> &DistanceParams {
        &self.params
    }

    /// Number of pairs with an entry, in flight or completed.
    pub fn len(&self) -> usize {
        lock_entries(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock_entries(&self.entries).is_empty()
    }

    /// Copy of the raw entry for `(a, b)`.
    pub fn entry(&self, a: &dyn MeshSource, b: &dyn MeshSource) -> Option<CacheEntry> {
        lock_entries(&self.entries).get(&PairKey::of(a, b)).copied()
    }

    /// Lifecycle state of `(a, b)` against the sources' live transforms.
    pub fn state(&self, a: &dyn MeshSource, b: &dyn MeshSource) -> CacheState {
        let key = PairKey::of(a, b);
        let transform_a = a.transform();
        let transform_b = b.transform();

        let entries = lock_entries(&self.entries);
        match entries.get(&key) {
            None => CacheState::Absent,
            Some(entry) if !entry.active => CacheState::Computing,
            Some(entry) if entry.matches(&transform_a, &transform_b) => {
                CacheState::Ready(entry.distance)
            }
            Some(_) => CacheState::Stale,
        }
    }

    /// Non-blocking lookup of the distance between `a` and `b`.
    ///
    /// Never launches anything. A miss means the caller should call
    /// [`start_computation`](Self::start_computation) if it wants a value.
    pub fn try_get_cached(&self, a: &dyn MeshSource, b: &dyn MeshSource) -> CacheLookup {
        let state = self.state(a, b);
        debug!(
            target: "mesh_distance::cache",
            first = %a.mesh_id(),
            second = %b.mesh_id(),
            state = ?state,
            "Cache lookup"
        );
        state.into()
    }

    /// Launch a background computation for `(a, b)`.
    ///
    /// Returns `None` without doing anything if a computation for the same
    /// ordered pair is already in flight. Otherwise the transforms of both
    /// meshes are snapshotted, the entry is marked in flight, the triangles
    /// are scanned at those snapshots on the calling thread and the engine
    /// runs on a worker.
    ///
    /// `progress`, if given, is called from the worker thread.
    pub fn start_computation(
        &self,
        a: &dyn MeshSource,
        b: &dyn MeshSource,
        progress: Option<ProgressCallback>,
    ) -> Option<DistanceHandle> {
        let key = PairKey::of(a, b);
        let started = Instant::now();
        let snapshot_a = a.transform();
        let snapshot_b = b.transform();

        {
            let mut entries = lock_entries(&self.entries);
            if let Some(entry) = entries.get(&key)
                && !entry.active
            {
                debug!(target: "mesh_distance::cache", pair = %key, "Launch rejected: already computing");
                return None;
            }
            entries.insert(key, CacheEntry::in_flight(snapshot_a, snapshot_b));
        }

        let triangles_a = a.world_triangles_at(&snapshot_a);
        let triangles_b = b.world_triangles_at(&snapshot_b);
        info!(
            target: "mesh_distance::cache",
            pair = %key,
            triangles_a = triangles_a.len(),
            triangles_b = triangles_b.len(),
            "Launching computation"
        );

        let (sender, receiver) = oneshot::channel();
        let entries = Arc::clone(&self.entries);
        let metric = self.params.metric;

        let job = move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let timer = OperationTimer::with_context(
                    "cached_distance",
                    triangles_a.len(),
                    triangles_b.len(),
                );
                let _entered = timer.span().enter();
                let reporter = progress.as_ref().map(CallbackProgressReporter::new);
                mesh_distance(
                    &triangles_a,
                    &triangles_b,
                    metric,
                    reporter.as_ref().map(|r| r as &dyn ProgressReporter),
                )
            }));

            match outcome {
                Ok(distance) => {
                    let result = DistanceResult {
                        distance,
                        elapsed: started.elapsed(),
                        triangles_a: triangles_a.len(),
                        triangles_b: triangles_b.len(),
                    };
                    // Publish before signalling so a resolved handle implies a
                    // ready entry.
                    if let Some(entry) = lock_entries(&entries).get_mut(&key) {
                        entry.distance = distance;
                        entry.active = true;
                    }
                    info!(target: "mesh_distance::cache", pair = %key, distance, "Cached distance ready");
                    log_distance_result(&result);
                    // The caller may have dropped the handle.
                    let _ = sender.send(result);
                }
                Err(_) => {
                    lock_entries(&entries).remove(&key);
                    warn!(target: "mesh_distance::cache", pair = %key, "Computation panicked; entry released");
                }
            }
        };

        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }

        Some(DistanceHandle { key, receiver })
    }

    /// Launch and block until the result is in.
    ///
    /// Returns `None` if a computation for the pair is already in flight.
    pub fn compute_blocking(
        &self,
        a: &dyn MeshSource,
        b: &dyn MeshSource,
        progress: Option<ProgressCallback>,
    ) -> Option<MeshResult<DistanceResult>> {
        self.start_computation(a, b, progress)
            .map(DistanceHandle::wait)
    }
}

/// Completion handle for a launched computation.
///
/// Resolves to the [`DistanceResult`] once the worker finishes, or to
/// [`MeshError::ComputationAborted`] if the worker died. Dropping the handle
/// does not cancel the computation; the cache is updated either way.
#[derive(Debug)]
pub struct DistanceHandle {
    key: PairKey,
    receiver: oneshot::Receiver<DistanceResult>,
}

impl DistanceHandle {
    /// The pair this handle belongs to.
    pub fn key(&self) -> PairKey {
        self.key
    }

    /// Check for completion without blocking.
    ///
    /// Returns `None` while the computation is running. The outcome is
    /// handed out once; later calls after a result report an abort.
    pub fn try_result(&mut self) -> Option<MeshResult<DistanceResult>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(Ok(result)),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(aborted(self.key))),
        }
    }

    /// Block the calling thread until the computation finishes.
    pub fn wait(self) -> MeshResult<DistanceResult> {
        pollster::block_on(self)
    }
}

impl Future for DistanceHandle {
    type Output = MeshResult<DistanceResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let key = self.key;
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.map_err(|oneshot::Canceled| aborted(key)))
    }
}

fn aborted(key: PairKey) -> MeshError {
    MeshError::ComputationAborted {
        pair: key.to_string(),
    }
}
