//! Property-based tests for the distance primitives and the batch engine.
//!
//! Run with: cargo test -p mesh-distance -- proptest

use mesh_distance::{
    DistanceMetric, Triangle, UNMEASURED_DISTANCE, mesh_distance, point_to_segment_distance,
    triangle_distance_edge_midpoint, triangle_distance_vertex,
};
use nalgebra::Point3;
use proptest::prelude::*;
use std::sync::Mutex;

// =============================================================================
// Strategies
// =============================================================================

/// Generate a random point in a bounded range.
fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Generate a random (possibly degenerate) triangle.
fn arb_triangle() -> impl Strategy<Value = Triangle> {
    (arb_point(), arb_point(), arb_point()).prop_map(|(p1, p2, p3)| Triangle::new(p1, p2, p3))
}

fn arb_metric() -> impl Strategy<Value = DistanceMetric> {
    prop_oneof![Just(DistanceMetric::Vertex), Just(DistanceMetric::EdgeMidpoint)]
}

// =============================================================================
// Point-to-segment
// =============================================================================

proptest! {
    #[test]
    fn degenerate_segment_is_point_distance(point in arb_point(), end in arb_point()) {
        let d = point_to_segment_distance(&point, &end, &end);
        prop_assert_eq!(d, (point - end).norm());
    }

    #[test]
    fn segment_distance_bounded_by_endpoints(
        point in arb_point(),
        start in arb_point(),
        end in arb_point(),
    ) {
        let d = point_to_segment_distance(&point, &start, &end);
        let to_start = (point - start).norm();
        let to_end = (point - end).norm();

        prop_assert!(d >= 0.0);
        prop_assert!(d <= to_start + 1e-9);
        prop_assert!(d <= to_end + 1e-9);
    }

    #[test]
    fn endpoints_lie_on_segment(start in arb_point(), end in arb_point()) {
        prop_assert!(point_to_segment_distance(&start, &start, &end) < 1e-9);
        prop_assert!(point_to_segment_distance(&end, &start, &end) < 1e-9);
    }
}

// =============================================================================
// Triangle-to-triangle
// =============================================================================

proptest! {
    #[test]
    fn vertex_metric_is_symmetric(a in arb_triangle(), b in arb_triangle()) {
        prop_assert_eq!(triangle_distance_vertex(&a, &b), triangle_distance_vertex(&b, &a));
    }

    #[test]
    fn midpoint_metric_is_symmetric(a in arb_triangle(), b in arb_triangle()) {
        prop_assert_eq!(
            triangle_distance_edge_midpoint(&a, &b),
            triangle_distance_edge_midpoint(&b, &a)
        );
    }

    #[test]
    fn shared_vertex_gives_zero(a in arb_triangle(), q in arb_point(), r in arb_point()) {
        let b = Triangle::new(a.p2, q, r);
        prop_assert!(triangle_distance_vertex(&a, &b) < 1e-9);
    }

    #[test]
    fn distance_is_non_negative(
        a in arb_triangle(),
        b in arb_triangle(),
        metric in arb_metric(),
    ) {
        prop_assert!(metric.triangle_distance(&a, &b) >= 0.0);
    }
}

// =============================================================================
// Batch engine
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn engine_matches_pairwise_minimum(
        a in prop::collection::vec(arb_triangle(), 1..6),
        b in prop::collection::vec(arb_triangle(), 1..6),
        metric in arb_metric(),
    ) {
        let expected = a
            .iter()
            .flat_map(|ta| b.iter().map(move |tb| metric.triangle_distance(ta, tb)))
            .fold(UNMEASURED_DISTANCE, f64::min);

        prop_assert_eq!(mesh_distance(&a, &b, metric, None), expected);
    }

    #[test]
    fn engine_progress_schedule(
        a in prop::collection::vec(arb_triangle(), 0..8),
        b in prop::collection::vec(arb_triangle(), 0..4),
    ) {
        let seen = Mutex::new(Vec::new());
        let sink = |f: f64| seen.lock().unwrap().push(f);
        mesh_distance(&a, &b, DistanceMetric::Vertex, Some(&sink));

        let seen = seen.into_inner().unwrap();
        prop_assert_eq!(seen.len(), a.len() + 1);
        prop_assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(seen.last().copied(), Some(1.0));
        if !a.is_empty() {
            prop_assert_eq!(seen[a.len() - 1], 1.0);
        }
    }

    #[test]
    fn engine_empty_side_is_unmeasured(a in prop::collection::vec(arb_triangle(), 0..6)) {
        prop_assert_eq!(mesh_distance(&a, &[], DistanceMetric::Vertex, None), UNMEASURED_DISTANCE);
        prop_assert_eq!(mesh_distance(&[], &a, DistanceMetric::EdgeMidpoint, None), UNMEASURED_DISTANCE);
    }
}
