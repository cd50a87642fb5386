use tracing::debug;

use super::{nearly_eq, Ellipsoid};

/// Upper bound on σ refinements; the fixed point is normally reached in a
/// handful of steps.
const MAX_ITERATIONS: usize = 1000;

/// Relative distance error of [`forward`] on terrestrial ellipsoids.
///
/// The A and B series are truncated after the `u²` terms they carry, so an
/// endpoint lands within `RELATIVE_ACCURACY * distance` meters of the exact
/// geodesic destination.
pub const RELATIVE_ACCURACY: f64 = 2e-5;

/// Solves the direct geodesic problem (Vincenty, after Rapp's formulation).
///
/// Starting at `(lam1, phi1)` in radians, travels `distance` meters along
/// `azimuth` (radians, clockwise from north, any range) and returns the
/// destination `(lam2, phi2)` in radians. The longitude is not wrapped.
#[must_use]
pub fn forward(
    ellipsoid: &Ellipsoid,
    lam1: f64,
    phi1: f64,
    distance: f64,
    azimuth: f64,
) -> (f64, f64) {
    let e2 = ellipsoid.eccentricity_squared();
    let f = ellipsoid.flattening();
    let beta1 = ((1.0 - f) * phi1.tan()).atan();
    let (sin_beta1, cos_beta1) = beta1.sin_cos();
    let (sin_az, cos_az) = azimuth.sin_cos();

    let sin_alpha = cos_beta1 * sin_az;
    let sin_alpha2 = sin_alpha * sin_alpha;
    let cos_alpha2 = 1.0 - sin_alpha2;
    let u2 = e2 / (1.0 - e2) * cos_alpha2;

    let big_a = 1.0 + (u2 / 16384.0) * (4096.0 + u2 * (320.0 - 175.0 * u2));
    let big_b = (u2 / 1024.0) * (256.0 + u2 * (74.0 - 47.0 * u2));

    // Angular distance on the auxiliary sphere from the equator to the start.
    let sigma1 = (beta1.tan() / cos_az).atan();

    let b = ellipsoid.semi_minor_axis();
    let first_approx = distance / (b * big_a);
    let (sigma, converged) = refine_sigma(first_approx, sigma1, big_b, MAX_ITERATIONS);
    if !converged {
        debug!(
            iterations = MAX_ITERATIONS,
            lam1, phi1, distance, azimuth, "direct geodesic hit its iteration limit"
        );
    }

    let (sin_sigma, cos_sigma) = sigma.sin_cos();

    let lambda = (sin_sigma * sin_az).atan2(cos_beta1 * cos_sigma - sin_beta1 * sin_sigma * cos_az);
    let c = (f / 16.0) * cos_alpha2 * (4.0 + f * (4.0 - 3.0 * cos_alpha2));

    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    let cos_2sigma_m2 = cos_2sigma_m * cos_2sigma_m;
    let bracket = cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m2);
    let lam2 = lam1 + lambda - (1.0 - c) * f * sin_alpha * (sigma + c * sin_sigma * bracket);

    let phi_num = sin_beta1 * cos_sigma + cos_beta1 * sin_sigma * cos_az;
    let tail = sin_beta1 * sin_sigma - cos_beta1 * cos_sigma * cos_az;
    let phi_den = (1.0 - f) * (sin_alpha2 + tail * tail).sqrt();
    let phi2 = phi_num.atan2(phi_den);

    (lam2, phi2)
}

/// Iterates σ until two successive values agree or `max_iterations` runs out.
/// Returns the last σ and whether it settled.
fn refine_sigma(first_approx: f64, sigma1: f64, big_b: f64, max_iterations: usize) -> (f64, bool) {
    let b_4th = big_b / 4.0;
    let b_6th = big_b / 6.0;
    let mut sigma = first_approx;
    let mut last_sigma = f64::MIN_POSITIVE;

    let mut iterations = 0;
    while !nearly_eq(sigma, last_sigma) && iterations < max_iterations {
        last_sigma = sigma;
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let cos_2sigma_m2 = cos_2sigma_m * cos_2sigma_m;
        let sin_sigma = sigma.sin();
        let sin_sigma2 = sin_sigma * sin_sigma;
        let cos_sigma_group = sigma.cos() * (-1.0 + 2.0 * cos_2sigma_m2);
        let cos_2sigma_m_group =
            cos_2sigma_m * (-3.0 + 4.0 * sin_sigma2) * (-3.0 + 4.0 * cos_2sigma_m2);
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m + b_4th * cos_sigma_group - b_6th * cos_2sigma_m_group);
        sigma = first_approx + delta_sigma;
        iterations += 1;
    }
    (sigma, nearly_eq(sigma, last_sigma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point2, DEG_TO_RAD, RAD_TO_DEG};

    fn forward_deg(lon: f64, lat: f64, distance: f64, az_deg: f64) -> (f64, f64) {
        let (lam, phi) = forward(
            &Ellipsoid::WGS84,
            lon * DEG_TO_RAD,
            lat * DEG_TO_RAD,
            distance,
            az_deg * DEG_TO_RAD,
        );
        (lam * RAD_TO_DEG, phi * RAD_TO_DEG)
    }

    #[test]
    fn due_north_from_origin() {
        let (lon, lat) = forward_deg(0.0, 0.0, 2000.0, 0.0);
        assert!(lon.abs() < 1e-12);
        assert!((lat - 0.018_087_39).abs() < 1e-6);
    }

    #[test]
    fn northern_hemisphere_steps() {
        let (lon, lat) = forward_deg(45.0, 45.0, 2000.0, 20.0);
        assert!((lon - 45.008_678_11).abs() < 1e-6);
        assert!((lat - 45.016_910_97).abs() < 1e-6);

        let (lon, lat) = forward_deg(60.0, 45.0, 2000.0, 20.0);
        assert!((lon - 60.008_678_11).abs() < 1e-6);
        assert!((lat - 45.016_910_97).abs() < 1e-6);
    }

    #[test]
    fn southern_hemisphere_steps() {
        let (lon, lat) = forward_deg(-65.0, -45.0, 2000.0, -20.0);
        assert!((lon + 65.008_673_01).abs() < 1e-6);
        assert!((lat + 44.983_088_32).abs() < 1e-6);

        let (lon, lat) = forward_deg(-165.0, -45.0, 2000.0, 220.0);
        assert!((lon + 165.016_308_63).abs() < 1e-6);
        assert!((lat + 45.013_785_05).abs() < 1e-6);
    }

    #[test]
    fn zero_distance_is_identity() {
        let (lon, lat) = forward_deg(12.5, -33.0, 0.0, 1.234);
        assert!((lon - 12.5).abs() < 1e-12);
        assert!((lat + 33.0).abs() < 1e-12);
    }

    #[test]
    fn round_trip_stays_within_series_accuracy() {
        let e = Ellipsoid::WGS84;
        let pairs = [
            ((10.0, 10.0), (11.0, 11.0)),
            ((-120.0, 35.0), (-118.0, 36.0)),
            ((30.0, -50.0), (31.0, -48.0)),
            ((0.0, 0.0), (40.0, 30.0)),
        ];
        for ((lon1, lat1), (lon2, lat2)) in pairs {
            let p1 = Point2::new(lon1, lat1);
            let p2 = Point2::new(lon2, lat2);
            let r = e.inverse_deg(&p1, &p2);
            let q = e.forward_deg(&p1, r.distance, r.az12);
            let miss = e.distance_deg(&q, &p2);
            assert!(miss < RELATIVE_ACCURACY * r.distance, "missed by {miss} m");
        }
    }

    #[test]
    fn sigma_refinement_reports_its_limit() {
        let (settled, converged) = refine_sigma(0.1, 0.3, 0.0017, MAX_ITERATIONS);
        assert!(converged);
        let (capped, converged) = refine_sigma(0.1, 0.3, 0.0017, 1);
        assert!(!converged);
        assert!((capped - settled).abs() < 1e-5);
    }

    #[test]
    fn long_distances_terminate() {
        let polar = 4.0 * Ellipsoid::WGS84.quarter_meridian();
        for k in 0..24 {
            let az = f64::from(k) * 15.0;
            let (lon, lat) = forward_deg(10.0, 20.0, 3.0 * polar, az);
            assert!(lon.is_finite() && lat.is_finite());
            assert!(lat.abs() <= 90.0);
        }
    }
}
