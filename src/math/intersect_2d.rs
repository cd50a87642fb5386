use super::{Point2, Vector2, TOLERANCE};

/// Result of intersecting two bounded segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments are disjoint.
    None,
    /// The segments meet in exactly one point.
    Point(Point2),
    /// The segments are collinear and share a stretch between two points.
    Overlap(Point2, Point2),
}

impl SegmentIntersection {
    /// Number of intersection points reported.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Point(_) => 1,
            Self::Overlap(_, _) => 2,
        }
    }
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = cross_2d(d1, d2);
    if cross.abs() < TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let d = p2 - p1;
    let t = cross_2d(&d, d2) / cross;
    let u = cross_2d(&d, d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// `tolerance` is an absolute distance: endpoints within `tolerance` of the
/// other segment count as touching, and nearly parallel segments closer than
/// `tolerance` are treated as collinear.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    tolerance: f64,
) -> SegmentIntersection {
    let da = a1 - a0;
    let db = b1 - b0;
    let len_a = da.norm();
    let len_b = db.norm();

    if len_a <= tolerance || len_b <= tolerance {
        return degenerate_intersection(a0, a1, b0, b1, tolerance);
    }

    if let Some((t, u)) = line_line_intersect_2d(a0, &da, b0, &db) {
        let eps_t = tolerance / len_a;
        let eps_u = tolerance / len_b;
        if t >= -eps_t && t <= 1.0 + eps_t && u >= -eps_u && u <= 1.0 + eps_u {
            let t = t.clamp(0.0, 1.0);
            return SegmentIntersection::Point(*a0 + da * t);
        }
        return SegmentIntersection::None;
    }

    // Parallel: only collinear segments can meet.
    let offset = cross_2d(&da, &(b0 - a0)).abs() / len_a;
    if offset > tolerance {
        return SegmentIntersection::None;
    }

    let len_sq = len_a * len_a;
    let tb0 = da.dot(&(b0 - a0)) / len_sq;
    let tb1 = da.dot(&(b1 - a0)) / len_sq;
    let lo = tb0.min(tb1).max(0.0);
    let hi = tb0.max(tb1).min(1.0);
    let eps_t = tolerance / len_a;

    if hi < lo - eps_t {
        SegmentIntersection::None
    } else if (hi - lo) * len_a <= tolerance {
        SegmentIntersection::Point(*a0 + da * lo.clamp(0.0, 1.0))
    } else {
        SegmentIntersection::Overlap(*a0 + da * lo, *a0 + da * hi)
    }
}

/// Handles segments where at least one side has collapsed to a point.
fn degenerate_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    tolerance: f64,
) -> SegmentIntersection {
    let (point, s0, s1) = if (a1 - a0).norm() <= tolerance {
        (a0, b0, b1)
    } else {
        (b0, a0, a1)
    };
    if point_segment_distance(point, s0, s1) <= tolerance {
        SegmentIntersection::Point(*point)
    } else {
        SegmentIntersection::None
    }
}

/// Minimum distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn point_segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (*p - (*a + d * t)).norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_segments() {
        let hit = segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(2.0, 2.0),
            &p(0.0, 2.0),
            &p(2.0, 0.0),
            1e-12,
        );
        match hit {
            SegmentIntersection::Point(q) => {
                assert!((q.x - 1.0).abs() < TOLERANCE);
                assert!((q.y - 1.0).abs() < TOLERANCE);
            }
            other => panic!("expected a single point, got {other:?}"),
        }
    }

    #[test]
    fn disjoint_segments() {
        let hit = segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(0.0, 1.0),
            &p(1.0, 2.0),
            1e-12,
        );
        assert_eq!(hit.count(), 0);
    }

    #[test]
    fn touching_at_endpoint() {
        let hit = segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 1.0),
            1e-12,
        );
        assert_eq!(hit.count(), 1);
    }

    #[test]
    fn collinear_overlap_reports_two_points() {
        let hit = segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(1.0, 0.0),
            &p(3.0, 0.0),
            1e-12,
        );
        match hit {
            SegmentIntersection::Overlap(a, b) => {
                assert!((a.x - 1.0).abs() < TOLERANCE);
                assert!((b.x - 2.0).abs() < TOLERANCE);
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn parallel_apart() {
        let hit = segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(0.0, 1.0),
            &p(2.0, 1.0),
            1e-12,
        );
        assert_eq!(hit, SegmentIntersection::None);
    }

    #[test]
    fn line_line_parameters() {
        let (t, u) = line_line_intersect_2d(
            &p(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &p(3.0, -1.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 3.0).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn point_segment_distance_clamps() {
        let d = point_segment_distance(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0));
        assert!((d - 5.0).abs() < TOLERANCE);
        let d = point_segment_distance(&p(0.5, 1.0), &p(0.0, 0.0), &p(1.0, 0.0));
        assert!((d - 1.0).abs() < TOLERANCE);
    }
}
