//! Ellipsoidal geodesy: direct and inverse geodesic problems and envelope
//! helpers measured in true surface distance.

pub mod direct;
pub mod envelope;
pub mod inverse;

pub use direct::forward;
pub use inverse::{inverse, InverseResult};

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::{Point2, DEG_TO_RAD, RAD_TO_DEG};

/// Relative tolerance used by the angle comparisons of the solvers.
const ANGLE_EPS: f64 = 3.552_713_678_800_500_929_355_62e-15;

/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    semi_major_axis: f64,
    eccentricity_squared: f64,
}

impl Ellipsoid {
    /// WGS 84.
    pub const WGS84: Self = Self {
        semi_major_axis: 6_378_137.0,
        eccentricity_squared: 0.006_694_379_990_141_316_5,
    };

    /// Creates an ellipsoid from its semi-major axis (meters) and squared
    /// eccentricity.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidEllipsoid` unless the axis is positive
    /// and finite and `0 <= e² < 1`.
    pub fn new(semi_major_axis: f64, eccentricity_squared: f64) -> Result<Self> {
        let valid = semi_major_axis.is_finite()
            && semi_major_axis > 0.0
            && (0.0..1.0).contains(&eccentricity_squared);
        if !valid {
            return Err(GeometryError::InvalidEllipsoid {
                semi_major_axis,
                eccentricity_squared,
            }
            .into());
        }
        Ok(Self {
            semi_major_axis,
            eccentricity_squared,
        })
    }

    /// A sphere of the given radius.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidEllipsoid` for a non-positive radius.
    pub fn sphere(radius: f64) -> Result<Self> {
        Self::new(radius, 0.0)
    }

    #[must_use]
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.eccentricity_squared
    }

    /// Flattening `f = 1 - sqrt(1 - e²)`.
    #[must_use]
    pub fn flattening(&self) -> f64 {
        1.0 - (1.0 - self.eccentricity_squared).sqrt()
    }

    #[must_use]
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening())
    }

    /// Meridional arc length from the equator to a pole.
    #[must_use]
    pub fn quarter_meridian(&self) -> f64 {
        let t = (1.0 - self.eccentricity_squared).sqrt();
        let n = (1.0 - t) / (1.0 + t);
        let n2 = n * n;
        self.semi_major_axis / (1.0 + n)
            * (1.0 + n2 * (1.0 / 4.0 + n2 * (1.0 / 64.0 + n2 * (1.0 / 256.0))))
            * FRAC_PI_2
    }

    /// Solves the direct problem for a point in degrees.
    ///
    /// `azimuth` is in radians, clockwise from north; the result is in degrees.
    #[must_use]
    pub fn forward_deg(&self, from: &Point2, distance: f64, azimuth: f64) -> Point2 {
        let (lam, phi) = forward(
            self,
            from.x * DEG_TO_RAD,
            from.y * DEG_TO_RAD,
            distance,
            azimuth,
        );
        Point2::new(lam * RAD_TO_DEG, phi * RAD_TO_DEG)
    }

    /// Solves the inverse problem between two points in degrees.
    #[must_use]
    pub fn inverse_deg(&self, from: &Point2, to: &Point2) -> InverseResult {
        inverse(
            self,
            from.x * DEG_TO_RAD,
            from.y * DEG_TO_RAD,
            to.x * DEG_TO_RAD,
            to.y * DEG_TO_RAD,
        )
    }

    /// Geodesic distance in meters between two points in degrees.
    #[must_use]
    pub fn distance_deg(&self, from: &Point2, to: &Point2) -> f64 {
        self.inverse_deg(from, to).distance
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Relative equality with the solvers' angle tolerance.
#[allow(clippy::float_cmp)]
pub(crate) fn nearly_eq(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= ANGLE_EPS * (1.0 + (a.abs() + b.abs()) / 2.0)
}

pub(crate) fn nearly_zero(a: f64) -> bool {
    a.abs() <= ANGLE_EPS
}

/// Magnitude of `a` with the sign of `b` (zero counts as positive).
pub(crate) fn with_sign_of(a: f64, b: f64) -> f64 {
    if b >= 0.0 {
        a.abs()
    } else {
        -a.abs()
    }
}

/// Wraps an angle into `[-π, π]`.
pub(crate) fn wrap_pi(angle: f64) -> f64 {
    let d = angle - (angle / TAU).round_ties_even() * TAU;
    if d.abs() <= PI {
        d
    } else if d < 0.0 {
        d + TAU
    } else {
        d - TAU
    }
}

/// Brings a longitude/latitude pair in radians into the principal range,
/// folding latitudes beyond a pole onto the opposite meridian.
pub(crate) fn reduce_lon_lat(lam: f64, phi: f64) -> (f64, f64) {
    let lam = wrap_pi(lam);
    let phi = wrap_pi(phi);
    if phi.abs() > FRAC_PI_2 {
        (wrap_pi(lam + PI), with_sign_of(PI, phi) - phi)
    } else {
        (lam, phi)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wgs84_constants() {
        let e = Ellipsoid::WGS84;
        assert!((e.flattening() - 1.0 / 298.257_223_563).abs() < 1e-12);
        assert!((e.semi_minor_axis() - 6_356_752.314_245).abs() < 1e-3);
        assert!((e.quarter_meridian() - 10_001_965.729).abs() < 1e-2);
    }

    #[test]
    fn rejects_invalid_ellipsoids() {
        assert!(Ellipsoid::new(0.0, 0.0).is_err());
        assert!(Ellipsoid::new(-1.0, 0.0).is_err());
        assert!(Ellipsoid::new(6_378_137.0, 1.0).is_err());
        assert!(Ellipsoid::new(f64::NAN, 0.0).is_err());
        assert!(Ellipsoid::sphere(6_371_000.0).is_ok());
    }

    #[test]
    fn wrap_pi_range() {
        assert!((wrap_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-15);
        assert!((wrap_pi(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-15);
        assert!((wrap_pi(4.0 * TAU + 0.25) - 0.25).abs() < 1e-13);
        assert!(wrap_pi(PI).abs() <= PI);
    }

    #[test]
    fn reduce_folds_over_the_pole() {
        let (lam, phi) = reduce_lon_lat(0.0, 100.0 * DEG_TO_RAD);
        assert!((phi - 80.0 * DEG_TO_RAD).abs() < 1e-14);
        assert!((lam.abs() - PI).abs() < 1e-14);
    }

    #[test]
    fn near_equality() {
        assert!(nearly_eq(1.0, 1.0 + 1e-16));
        assert!(!nearly_eq(1.0, 1.0 + 1e-12));
        assert!(nearly_zero(1e-16));
        assert!((with_sign_of(2.0, -0.5) + 2.0).abs() < f64::EPSILON);
    }
}
