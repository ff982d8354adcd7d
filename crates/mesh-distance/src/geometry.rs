//! Point, segment and triangle distance primitives.
//!
//! Triangle-to-triangle distance is approximated by sampling features of one
//! triangle against the edges of the other, in both directions:
//!
//! - [`DistanceMetric::Vertex`] tests the three corners of each triangle
//!   against the three edges of the other (18 point-segment queries). This is
//!   exact when the closest features are a vertex and an edge (or two
//!   vertices), and overestimates when the closest pair lies strictly inside
//!   two edges.
//! - [`DistanceMetric::EdgeMidpoint`] tests the three edge midpoints instead.
//!   It reacts to edge-interior proximity but loses corner precision; it is a
//!   different approximation, not a refinement of the vertex one.
//!
//! Neither variant reports zero for interpenetrating triangles whose sampled
//! features stay apart.

use nalgebra::Point3;

use crate::types::Triangle;

/// Which features are sampled when measuring triangle-to-triangle distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DistanceMetric {
    /// Corners of each triangle against the edges of the other.
    #[default]
    Vertex,
    /// Edge midpoints of each triangle against the edges of the other.
    EdgeMidpoint,
}

impl DistanceMetric {
    /// Select a metric from a boolean flag (`true` selects edge midpoints).
    #[inline]
    pub fn from_flag(use_edge_midpoint: bool) -> Self {
        if use_edge_midpoint {
            DistanceMetric::EdgeMidpoint
        } else {
            DistanceMetric::Vertex
        }
    }

    /// Short lowercase name, as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Vertex => "vertex",
            DistanceMetric::EdgeMidpoint => "edge_midpoint",
        }
    }

    /// Distance between two triangles using this metric.
    #[inline]
    pub fn triangle_distance(&self, a: &Triangle, b: &Triangle) -> f64 {
        match self {
            DistanceMetric::Vertex => triangle_distance_vertex(a, b),
            DistanceMetric::EdgeMidpoint => triangle_distance_edge_midpoint(a, b),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "vertex" => Ok(DistanceMetric::Vertex),
            "edge_midpoint" | "midpoint" => Ok(DistanceMetric::EdgeMidpoint),
            other => Err(format!("unknown distance metric: {other}")),
        }
    }
}

/// Distance from `point` to the closed segment `edge_start`-`edge_end`.
///
/// The projection parameter is clamped to `[0, 1]`, so the result is measured
/// to the nearest point on the segment rather than the infinite line. A
/// zero-length segment yields the direct distance to its (coincident)
/// endpoints.
///
/// # Example
/// ```
/// use mesh_distance::geometry::point_to_segment_distance;
/// use nalgebra::Point3;
///
/// let d = point_to_segment_distance(
///     &Point3::new(0.5, 2.0, 0.0),
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
/// );
/// assert!((d - 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn point_to_segment_distance(
    point: &Point3<f64>,
    edge_start: &Point3<f64>,
    edge_end: &Point3<f64>,
) -> f64 {
    let edge_dir = edge_end - edge_start;
    let point_dir = point - edge_start;

    let edge_length_sq = edge_dir.norm_squared();
    if edge_length_sq == 0.0 {
        return point_dir.norm();
    }

    let t = (point_dir.dot(&edge_dir) / edge_length_sq).clamp(0.0, 1.0);
    let projection = edge_start + edge_dir * t;

    (point - projection).norm()
}

/// Minimum distance from any of `points` to any edge of `triangle`.
#[inline]
fn points_to_edges(points: &[Point3<f64>; 3], triangle: &Triangle) -> f64 {
    let edges = triangle.edges();
    let mut min_distance = f64::MAX;
    for point in points {
        for (start, end) in &edges {
            min_distance = min_distance.min(point_to_segment_distance(point, start, end));
        }
    }
    min_distance
}

/// Triangle distance sampling corners against opposite edges (18 queries).
///
/// Zero whenever the triangles share a vertex.
pub fn triangle_distance_vertex(a: &Triangle, b: &Triangle) -> f64 {
    points_to_edges(&a.vertices(), b).min(points_to_edges(&b.vertices(), a))
}

/// Triangle distance sampling edge midpoints against opposite edges (18 queries).
///
/// Zero (up to rounding) whenever the triangles share an edge.
pub fn triangle_distance_edge_midpoint(a: &Triangle, b: &Triangle) -> f64 {
    points_to_edges(&a.edge_midpoints(), b).min(points_to_edges(&b.edge_midpoints(), a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn origin_triangle() -> Triangle {
        Triangle::from_coords([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])
    }

    fn translated(tri: &Triangle, dx: f64, dy: f64, dz: f64) -> Triangle {
        let offset = nalgebra::Vector3::new(dx, dy, dz);
        tri.map(|p| p + offset)
    }

    #[test]
    fn test_point_to_segment_interior() {
        let d = point_to_segment_distance(
            &Point3::new(0.5, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(d, 1.0);
    }

    #[test]
    fn test_point_to_segment_clamped() {
        // Beyond the end: distance to the endpoint, not the infinite line.
        let d = point_to_segment_distance(
            &Point3::new(4.0, 4.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(d, 5.0);

        let d = point_to_segment_distance(
            &Point3::new(-3.0, 0.0, 4.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_point_to_degenerate_segment() {
        let p = Point3::new(1.0, 2.0, 2.0);
        let e = Point3::new(0.0, 0.0, 0.0);
        assert_relative_eq!(point_to_segment_distance(&p, &e, &e), 3.0);
    }

    #[test]
    fn test_point_on_segment() {
        let d = point_to_segment_distance(
            &Point3::new(0.25, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_translated_triangles() {
        let a = origin_triangle();
        let b = translated(&a, 10.0, 0.0, 0.0);
        // Closest pair is (1,0,0) - (10,0,0).
        assert_relative_eq!(triangle_distance_vertex(&a, &b), 9.0);
        assert_relative_eq!(triangle_distance_vertex(&b, &a), 9.0);
    }

    #[test]
    fn test_shared_vertex_is_zero() {
        let a = origin_triangle();
        let b = Triangle::from_coords([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, -1.0, 0.0]);
        assert_eq!(triangle_distance_vertex(&a, &b), 0.0);
        assert_eq!(triangle_distance_vertex(&b, &a), 0.0);
    }

    #[test]
    fn test_shared_edge_both_metrics() {
        let a = origin_triangle();
        let b = Triangle::from_coords([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        assert_eq!(triangle_distance_vertex(&a, &b), 0.0);
        assert!(triangle_distance_edge_midpoint(&a, &b) < 1e-12);
    }

    #[test]
    fn test_edge_midpoint_differs_from_vertex() {
        // Crossed segments in parallel planes: the closest approach is inside
        // both edges, where corner sampling overestimates.
        let a = Triangle::from_coords([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -5.0]);
        let b = Triangle::from_coords([0.0, -1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 6.0]);

        let vertex = triangle_distance_vertex(&a, &b);
        let midpoint = triangle_distance_edge_midpoint(&a, &b);

        assert_relative_eq!(midpoint, 1.0);
        assert!(vertex > midpoint);
    }

    #[test]
    fn test_metric_dispatch() {
        let a = origin_triangle();
        let b = translated(&a, 0.0, 0.0, 2.0);
        assert_eq!(
            DistanceMetric::Vertex.triangle_distance(&a, &b),
            triangle_distance_vertex(&a, &b)
        );
        assert_eq!(
            DistanceMetric::EdgeMidpoint.triangle_distance(&a, &b),
            triangle_distance_edge_midpoint(&a, &b)
        );
    }

    #[test]
    fn test_metric_from_flag_and_str() {
        assert_eq!(DistanceMetric::from_flag(false), DistanceMetric::Vertex);
        assert_eq!(DistanceMetric::from_flag(true), DistanceMetric::EdgeMidpoint);
        assert_eq!(
            "edge-midpoint".parse::<DistanceMetric>(),
            Ok(DistanceMetric::EdgeMidpoint)
        );
        assert_eq!("Vertex".parse::<DistanceMetric>(), Ok(DistanceMetric::Vertex));
        assert!("nearest".parse::<DistanceMetric>().is_err());
        assert_eq!(DistanceMetric::EdgeMidpoint.to_string(), "edge_midpoint");
    }
}
