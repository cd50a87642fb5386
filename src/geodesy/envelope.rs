//! Envelope measurements in true surface distance.

use std::f64::consts::{FRAC_PI_2, PI};

use super::Ellipsoid;
use crate::geometry::Envelope;
use crate::math::Point2;

/// Moves the envelope's edges by `dx` meters east/west and `dy` meters
/// north/south. Positive offsets grow the envelope, negative offsets shrink
/// it; an envelope that shrinks past itself becomes empty.
#[must_use]
pub fn inflate(ellipsoid: &Ellipsoid, env: &Envelope, dx: f64, dy: f64) -> Envelope {
    if env.is_empty() {
        return *env;
    }

    let (ymin_az, ymax_az) = if dy > 0.0 { (PI, 0.0) } else { (0.0, PI) };
    let (xmin_az, xmax_az) = if dx > 0.0 {
        (3.0 * FRAC_PI_2, FRAC_PI_2)
    } else {
        (FRAC_PI_2, 3.0 * FRAC_PI_2)
    };
    let dx = dx.abs();
    let dy = dy.abs();

    let ymin = ellipsoid.forward_deg(&env.lower_left(), dy, ymin_az).y;
    let xmin = ellipsoid.forward_deg(&env.upper_left(), dx, xmin_az).x;
    let ymax = ellipsoid.forward_deg(&env.upper_right(), dy, ymax_az).y;
    let xmax = ellipsoid.forward_deg(&env.lower_right(), dx, xmax_az).x;

    if xmin > xmax || ymin > ymax {
        return Envelope::empty();
    }
    Envelope {
        xmin,
        ymin,
        xmax,
        ymax,
    }
}

/// Largest geodesic length of the bottom and top edges, in meters.
#[must_use]
pub fn width(ellipsoid: &Ellipsoid, env: &Envelope) -> f64 {
    let lower = ellipsoid.distance_deg(&env.lower_left(), &env.lower_right());
    let upper = ellipsoid.distance_deg(&env.upper_left(), &env.upper_right());
    lower.max(upper)
}

/// Largest geodesic length of the left and right edges, in meters.
#[must_use]
pub fn height(ellipsoid: &Ellipsoid, env: &Envelope) -> f64 {
    let left = ellipsoid.distance_deg(&env.lower_left(), &env.upper_left());
    let right = ellipsoid.distance_deg(&env.lower_right(), &env.upper_right());
    left.max(right)
}

/// Point halfway along the geodesic from `from` to `to`.
#[must_use]
pub fn midpoint(ellipsoid: &Ellipsoid, from: &Point2, to: &Point2) -> Point2 {
    let r = ellipsoid.inverse_deg(from, to);
    ellipsoid.forward_deg(from, r.distance / 2.0, r.az12)
}

/// Midpoint of the midpoints of the envelope's two diagonals.
#[must_use]
pub fn geodetic_center(ellipsoid: &Ellipsoid, env: &Envelope) -> Point2 {
    let a = midpoint(ellipsoid, &env.lower_right(), &env.upper_left());
    let b = midpoint(ellipsoid, &env.lower_left(), &env.upper_right());
    midpoint(ellipsoid, &a, &b)
}
