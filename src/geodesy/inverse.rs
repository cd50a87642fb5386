use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;

use super::{nearly_eq, nearly_zero, reduce_lon_lat, with_sign_of, wrap_pi, Ellipsoid};

const TOL: f64 = 1.0e-14;
const EPS: f64 = 1.0e-15;
const MAX_ITERATIONS: u32 = 100;

/// Result of the inverse geodesic problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseResult {
    /// Azimuth at the first point towards the second, radians in `[-π, π]`.
    pub az12: f64,
    /// Azimuth at the second point towards the first, radians in `[-π, π]`.
    pub az21: f64,
    /// Geodesic distance in meters.
    pub distance: f64,
    /// `false` when the iteration stopped at its step limit; the values are
    /// then the last estimate.
    pub converged: bool,
}

impl InverseResult {
    fn exact(az12: f64, az21: f64, distance: f64) -> Self {
        Self {
            az12,
            az21,
            distance,
            converged: true,
        }
    }
}

/// Which fixed-point variable the iteration refines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Longitude difference on the auxiliary sphere.
    LongLine,
    /// Sine of the equatorial azimuth, for nearly antipodal points.
    Antipodal,
}

/// Solves the inverse geodesic problem between `(lam1, phi1)` and
/// `(lam2, phi2)`, all in radians.
///
/// Coincident points, antipodal points and spheres are answered in closed
/// form. Otherwise runs Vincenty's iteration in long-line mode, switching once
/// to antipodal mode when the auxiliary longitude difference passes π, and
/// applies Helmert's series to the final arc length.
#[must_use]
pub fn inverse(ellipsoid: &Ellipsoid, lam1: f64, phi1: f64, lam2: f64, phi2: f64) -> InverseResult {
    solve(ellipsoid, lam1, phi1, lam2, phi2, MAX_ITERATIONS)
}

#[allow(clippy::too_many_lines, clippy::similar_names)]
fn solve(
    ellipsoid: &Ellipsoid,
    lam1: f64,
    phi1: f64,
    lam2: f64,
    phi2: f64,
    max_iterations: u32,
) -> InverseResult {
    let a = ellipsoid.semi_major_axis();
    let e2 = ellipsoid.eccentricity_squared();

    let (lam1, phi1) = reduce_lon_lat(lam1, phi1);
    let (lam2, phi2) = reduce_lon_lat(lam2, phi2);
    let dlam = wrap_pi(lam2 - lam1);

    if nearly_eq(phi1, phi2) && (nearly_zero(dlam) || nearly_eq(phi1.abs(), FRAC_PI_2)) {
        return InverseResult::exact(0.0, 0.0, 0.0);
    }
    if nearly_eq(phi1, -phi2) {
        if nearly_eq(phi1.abs(), FRAC_PI_2) {
            // Opposite poles.
            let (az12, az21) = if phi1 > 0.0 {
                (wrap_pi(PI - wrap_pi(lam2)), wrap_pi(lam2))
            } else {
                (wrap_pi(lam2), wrap_pi(PI - wrap_pi(lam2)))
            };
            return InverseResult::exact(az12, az21, 2.0 * ellipsoid.quarter_meridian());
        }
        if nearly_eq(dlam.abs(), PI) {
            return InverseResult::exact(0.0, 0.0, 2.0 * ellipsoid.quarter_meridian());
        }
    }

    if nearly_zero(e2) {
        return spherical(a, lam1, phi1, lam2, phi2, dlam);
    }

    let f = ellipsoid.flattening();
    let boa = 1.0 - f;

    let eta1 = (boa * phi1.tan()).atan();
    let (sin_eta1, cos_eta1) = eta1.sin_cos();
    let eta2 = (boa * phi2.tan()).atan();
    let (sin_eta2, cos_eta2) = eta2.sin_cos();

    let mut prev = dlam;
    let mut test = dlam;
    let mut lam_sph = dlam;
    let mut mode = Mode::LongLine;

    let mut sin_lam_sph = 0.0;
    let mut cos_lam_sph = 0.0;
    let mut temp = 0.0;
    let mut sigma = 0.0;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sin_azeq = 0.0;
    let mut cos2_azeq = 0.0;
    let mut costm = 0.0;
    let mut costm2 = 0.0;
    let mut c = 0.0;

    let cos_tm = |cos_sigma: f64, cos2_azeq: f64| {
        let denom = if cos2_azeq.abs() < EPS {
            with_sign_of(EPS, cos2_azeq)
        } else {
            cos2_azeq
        };
        cos_sigma - 2.0 * (sin_eta1 * sin_eta2 / denom)
    };
    let c_coef = |cos2_azeq: f64| ((-3.0 * cos2_azeq + 4.0) * f + 4.0) * cos2_azeq * f / 16.0;

    let mut converged = false;
    let mut iterations = 0;
    while !converged && iterations < max_iterations {
        iterations += 1;

        if mode == Mode::LongLine {
            (sin_lam_sph, cos_lam_sph) = lam_sph.sin_cos();
            let tem1 = cos_eta2 * sin_lam_sph;
            temp = cos_eta1 * sin_eta2 - sin_eta1 * cos_eta2 * cos_lam_sph;
            sin_sigma = (tem1 * tem1 + temp * temp).sqrt();
            cos_sigma = sin_eta1 * sin_eta2 + cos_eta1 * cos_eta2 * cos_lam_sph;
            sigma = sin_sigma.atan2(cos_sigma);

            let denom = if sin_sigma.abs() < EPS {
                with_sign_of(EPS, sin_sigma)
            } else {
                sin_sigma
            };
            sin_azeq = cos_eta1 * cos_eta2 * sin_lam_sph / denom;
            cos2_azeq = 1.0 - sin_azeq * sin_azeq;
            costm = cos_tm(cos_sigma, cos2_azeq);
            costm2 = costm * costm;
            c = c_coef(cos2_azeq);
        }

        let d = (1.0 - c)
            * f
            * (sigma + c * sin_sigma * (costm + cos_sigma * c * (2.0 * costm2 - 1.0)));

        match mode {
            Mode::LongLine => {
                lam_sph = dlam + d * sin_azeq;
                if (lam_sph - test).abs() < TOL {
                    converged = true;
                    continue;
                }

                if lam_sph.abs() > PI {
                    mode = Mode::Antipodal;
                    lam_sph = if dlam < 0.0 { -PI } else { PI };
                    sin_azeq = 0.0;
                    cos2_azeq = 1.0;
                    test = 2.0;
                    prev = test;

                    sigma = PI - ((sin_eta1 / cos_eta1).atan() + (sin_eta2 / cos_eta2).atan()).abs();
                    (sin_sigma, cos_sigma) = sigma.sin_cos();
                    c = c_coef(cos2_azeq);
                    costm = cos_tm(cos_sigma, cos2_azeq);
                    costm2 = costm * costm;
                    continue;
                }

                if (lam_sph - test) * (test - prev) < 0.0 && iterations > 5 {
                    lam_sph = (2.0 * lam_sph + 3.0 * test + prev) / 6.0;
                }
                prev = test;
                test = lam_sph;
            }
            Mode::Antipodal => {
                sin_azeq = (lam_sph - dlam) / d;
                if (sin_azeq - test) * (test - prev) < 0.0 && iterations > 5 {
                    sin_azeq = (2.0 * sin_azeq + 3.0 * test + prev) / 6.0;
                }
                prev = test;
                test = sin_azeq;
                cos2_azeq = 1.0 - sin_azeq * sin_azeq;
                sin_lam_sph = sin_azeq * sin_sigma / (cos_eta1 * cos_eta2);
                cos_lam_sph = -(1.0 - sin_lam_sph * sin_lam_sph).abs().sqrt();
                lam_sph = sin_lam_sph.atan2(cos_lam_sph);
                let tem1 = cos_eta2 * sin_lam_sph;
                temp = cos_eta1 * sin_eta2 - sin_eta1 * cos_eta2 * cos_lam_sph;
                sin_sigma = (tem1 * tem1 + temp * temp).sqrt();
                cos_sigma = sin_eta1 * sin_eta2 + cos_eta1 * cos_eta2 * cos_lam_sph;
                sigma = sin_sigma.atan2(cos_sigma);
                c = c_coef(cos2_azeq);
                if (sin_azeq - prev).abs() < TOL {
                    converged = true;
                    continue;
                }
                costm = cos_tm(cos_sigma, cos2_azeq);
                costm2 = costm * costm;
            }
        }
    }

    if !converged {
        debug!(
            iterations,
            lam1, phi1, lam2, phi2, "inverse geodesic hit its iteration limit"
        );
    }

    // Helmert (1880), from Vincenty's antipodal inverse solution.
    let ep2 = 1.0 / (boa * boa) - 1.0;
    let bige = (1.0 + ep2 * cos2_azeq).sqrt();
    let bigf = (bige - 1.0) / (bige + 1.0);
    let biga = (1.0 + bigf * bigf / 4.0) / (1.0 - bigf);
    let bigb = bigf * (1.0 - 0.375 * bigf * bigf);
    let z = bigb / 6.0 * costm * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * costm2);
    let dsigma = bigb
        * sin_sigma
        * (costm + bigb / 4.0 * (cos_sigma * (-1.0 + 2.0 * costm2) - z));
    let distance = (boa * a) * biga * (sigma - dsigma);

    let (az12, az21) = match mode {
        Mode::Antipodal => {
            let sin_az = sin_azeq / cos_eta1;
            let mut cos_az = (1.0 - sin_az * sin_az).sqrt();
            if temp < 0.0 {
                cos_az = -cos_az;
            }
            let az12 = sin_az.atan2(cos_az);
            let az21 = (-sin_azeq).atan2(sin_eta1 * sin_sigma - cos_eta1 * cos_sigma * cos_az);
            (az12, az21)
        }
        Mode::LongLine => {
            let az12 = (cos_eta2 * sin_lam_sph)
                .atan2(cos_eta1 * sin_eta2 - sin_eta1 * cos_eta2 * cos_lam_sph);
            let az21 = (-cos_eta1 * sin_lam_sph)
                .atan2(sin_eta1 * cos_eta2 - cos_eta1 * sin_eta2 * cos_lam_sph);
            (az12, az21)
        }
    };

    InverseResult {
        az12: wrap_pi(az12),
        az21: wrap_pi(az21),
        distance,
        converged,
    }
}

/// Closed-form solution on a sphere of radius `a`.
fn spherical(a: f64, lam1: f64, phi1: f64, lam2: f64, phi2: f64, dlam: f64) -> InverseResult {
    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_phi2, cos_phi2) = phi2.sin_cos();

    let tem1 = ((phi2 - phi1) / 2.0).sin();
    let tem2 = (dlam / 2.0).sin();
    let sigma = 2.0 * (tem1 * tem1 + cos_phi1 * cos_phi2 * tem2 * tem2).sqrt().asin();

    let az12 = if nearly_eq(phi1.abs(), FRAC_PI_2) {
        if phi1 < 0.0 {
            lam2
        } else {
            wrap_pi(PI - lam2)
        }
    } else {
        (cos_phi2 * dlam.sin()).atan2(cos_phi1 * sin_phi2 - sin_phi1 * cos_phi2 * dlam.cos())
    };

    let az21 = if nearly_eq(phi2.abs(), FRAC_PI_2) {
        if phi2 < 0.0 {
            lam1
        } else {
            wrap_pi(PI - lam1)
        }
    } else {
        let back =
            (cos_phi1 * dlam.sin()).atan2(sin_phi2 * cos_phi1 * dlam.cos() - cos_phi2 * sin_phi1);
        wrap_pi(back + PI)
    };

    InverseResult::exact(az12, az21, sigma * a)
}
