//! Mesh sources: where triangles and transforms come from.
//!
//! The cache does not know about scene graphs. It talks to anything that can
//! name itself ([`MeshId`]), hand out its triangles in world space, and report
//! its current [`Transform`]. [`SceneMesh`] is the stock implementation: an
//! indexed mesh in local space plus a transform that can be changed at any
//! time from any thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use nalgebra::Vector3;

use crate::transform::Transform;
use crate::types::{Mesh, Triangle};

/// Identity of a mesh source, used as half of a cache key.
///
/// Ids from [`MeshId::next`] and ids wrapped with [`MeshId::from_raw`] live in
/// separate namespaces: a host id never equals an allocated one, even when
/// the raw numbers match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId {
    origin: IdOrigin,
    raw: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum IdOrigin {
    Allocated,
    Host,
}

impl MeshId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        MeshId {
            origin: IdOrigin::Allocated,
            raw: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Wrap an id assigned by the host application.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        MeshId {
            origin: IdOrigin::Host,
            raw,
        }
    }

    /// The raw id value, without its namespace.
    #[inline]
    pub const fn get(self) -> u64 {
        self.raw
    }

    /// Whether this id came from [`MeshId::from_raw`].
    #[inline]
    pub const fn is_host(self) -> bool {
        matches!(self.origin, IdOrigin::Host)
    }
}

impl std::fmt::Display for MeshId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.origin {
            IdOrigin::Allocated => write!(f, "mesh#{}", self.raw),
            IdOrigin::Host => write!(f, "host#{}", self.raw),
        }
    }
}

/// Something that owns a triangle surface placed in the world.
///
/// Implementations must be cheap enough to call on the caller's thread right
/// before a computation is launched.
pub trait MeshSource {
    /// Stable identity of this source.
    fn mesh_id(&self) -> MeshId;

    /// The current world transform.
    fn transform(&self) -> Transform;

    /// All triangles, mapped into world space with `transform`.
    ///
    /// The cache passes the exact snapshot it stores, so the geometry and the
    /// snapshot always describe the same placement.
    fn world_triangles_at(&self, transform: &Transform) -> Vec<Triangle>;

    /// All triangles at the current transform.
    fn world_triangles(&self) -> Vec<Triangle> {
        self.world_triangles_at(&self.transform())
    }
}

/// Scan an optional source into a world-space triangle list.
///
/// Returns `None` for an absent source; callers treat that like an empty list.
pub fn scan_triangles(source: Option<&dyn MeshSource>) -> Option<Vec<Triangle>> {
    source.map(|s| s.world_triangles())
}

/// A mesh in local space with a mutable world transform.
///
/// Cloning yields another handle to the same source (same [`MeshId`], shared
/// transform).
///
/// # Example
/// ```
/// use mesh_distance::{MeshSource, SceneMesh, Triangle};
/// use nalgebra::Vector3;
///
/// let tri = Triangle::from_coords([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
/// let mesh = SceneMesh::from_triangles(&[tri]);
/// mesh.translate(Vector3::new(5.0, 0.0, 0.0));
///
/// let world = mesh.world_triangles();
/// assert_eq!(world[0].p1.x, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct SceneMesh {
    inner: Arc<SceneMeshInner>,
}

#[derive(Debug)]
struct SceneMeshInner {
    id: MeshId,
    mesh: Mesh,
    transform: RwLock<Transform>,
}

impl SceneMesh {
    /// Place `mesh` at the origin with an identity transform.
    pub fn new(mesh: Mesh) -> Self {
        Self::with_transform(mesh, Transform::identity())
    }

    /// Place `mesh` with the given transform.
    pub fn with_transform(mesh: Mesh, transform: Transform) -> Self {
        Self {
            inner: Arc::new(SceneMeshInner {
                id: MeshId::next(),
                mesh,
                transform: RwLock::new(transform),
            }),
        }
    }

    /// Build a source from a flat triangle list in local space.
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        Self::new(Mesh::from_triangles(triangles))
    }

    /// The local-space mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.inner.mesh
    }

    /// Replace the world transform.
    pub fn set_transform(&self, transform: Transform) {
        *self
            .inner
            .transform
            .write()
            .unwrap_or_else(PoisonError::into_inner) = transform;
    }

    /// Move the mesh by `offset` in world space.
    pub fn translate(&self, offset: Vector3<f64>) {
        let mut transform = self
            .inner
            .transform
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        transform.position += offset;
    }
}

impl MeshSource for SceneMesh {
    fn mesh_id(&self) -> MeshId {
        self.inner.id
    }

    fn transform(&self) -> Transform {
        *self
            .inner
            .transform
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn world_triangles_at(&self, transform: &Transform) -> Vec<Triangle> {
        let mesh = &self.inner.mesh;
        // Faces with out-of-range indices are skipped rather than panicking.
        (0..mesh.face_count())
            .filter_map(|face_idx| mesh.triangle(face_idx))
            .map(|tri| tri.map(|p| transform.apply(p)))
            .collect()
    }
}
