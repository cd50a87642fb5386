use super::Point2;

/// Computes the signed area of a ring in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The ring is
/// implicitly closed; a repeated closing vertex contributes nothing.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the ring with counter-clockwise winding.
#[must_use]
pub fn ensure_ccw(mut points: Vec<Point2>) -> Vec<Point2> {
    if signed_area_2d(&points) < 0.0 {
        points.reverse();
    }
    points
}

/// Returns the ring with clockwise winding.
#[must_use]
pub fn ensure_cw(mut points: Vec<Point2>) -> Vec<Point2> {
    if signed_area_2d(&points) > 0.0 {
        points.reverse();
    }
    points
}

/// Drops consecutive vertices closer than `tolerance`, including the closing
/// vertex of a ring that repeats the first one.
#[must_use]
pub fn filter_close_points(points: &[Point2], tolerance: f64, closed: bool) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| (p - last).norm() > tolerance) {
            out.push(*p);
        }
    }
    if closed {
        while out.len() > 1 && (out[out.len() - 1] - out[0]).norm() <= tolerance {
            out.pop();
        }
    }
    out
}
