//! Core mesh data types.

use nalgebra::Point3;

/// A vertex in the mesh.
///
/// Coordinates are unit-agnostic; distances come back in the same unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// 3D position in the mesh's local space.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a new vertex at `position`.
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A triangle mesh with indexed vertices and faces.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Build a mesh from a flat triangle list (three vertices per triangle,
    /// no sharing).
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut mesh = Self::with_capacity(triangles.len() * 3, triangles.len());
        for tri in triangles {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.push(Vertex::new(tri.p1));
            mesh.vertices.push(Vertex::new(tri.p2));
            mesh.vertices.push(Vertex::new(tri.p3));
            mesh.faces.push([base, base + 1, base + 2]);
        }
        mesh
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces (triangles) in the mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh is empty (no vertices or faces).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;

        let mut min = first.position;
        let mut max = first.position;

        for vertex in &self.vertices[1..] {
            let p = &vertex.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Iterate over triangles, yielding Triangle structs with actual vertex data.
    ///
    /// Faces must reference valid vertices; meshes produced by
    /// [`crate::io::load_mesh`] are validated on load.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| Triangle {
            p1: self.vertices[i0 as usize].position,
            p2: self.vertices[i1 as usize].position,
            p3: self.vertices[i2 as usize].position,
        })
    }

    /// Get a specific triangle by face index.
    pub fn triangle(&self, face_idx: usize) -> Option<Triangle> {
        let &[i0, i1, i2] = self.faces.get(face_idx)?;
        Some(Triangle {
            p1: self.vertices.get(i0 as usize)?.position,
            p2: self.vertices.get(i1 as usize)?.position,
            p3: self.vertices.get(i2 as usize)?.position,
        })
    }
}

/// A triangle as three points. Value type, no identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Point3<f64>,
    pub p2: Point3<f64>,
    pub p3: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    pub fn new(p1: Point3<f64>, p2: Point3<f64>, p3: Point3<f64>) -> Self {
        Self { p1, p2, p3 }
    }

    /// Create a triangle from raw coordinate triples.
    #[inline]
    pub fn from_coords(p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> Self {
        Self::new(Point3::from(p1), Point3::from(p2), Point3::from(p3))
    }

    /// The three corners in order.
    #[inline]
    pub fn vertices(&self) -> [Point3<f64>; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Get the three edges as (start, end) pairs: p1-p2, p2-p3, p3-p1.
    #[inline]
    pub fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        [(self.p1, self.p2), (self.p2, self.p3), (self.p3, self.p1)]
    }

    /// Midpoints of the three edges, in the same order as [`Triangle::edges`].
    #[inline]
    pub fn edge_midpoints(&self) -> [Point3<f64>; 3] {
        [
            nalgebra::center(&self.p1, &self.p2),
            nalgebra::center(&self.p2, &self.p3),
            nalgebra::center(&self.p3, &self.p1),
        ]
    }

    /// Apply `f` to every corner.
    #[inline]
    pub fn map(&self, f: impl Fn(&Point3<f64>) -> Point3<f64>) -> Self {
        Self::new(f(&self.p1), f(&self.p2), f(&self.p3))
    }
}
