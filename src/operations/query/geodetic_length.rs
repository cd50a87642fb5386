use crate::geodesy::Ellipsoid;
use crate::geometry::Geometry;
use crate::math::summation::KahanSum;
use crate::math::Point2;

/// Sums the geodesic lengths of every segment of a geometry, in meters.
#[derive(Debug)]
pub struct GeodeticLength<'a> {
    geometry: &'a Geometry,
    ellipsoid: Ellipsoid,
}

impl<'a> GeodeticLength<'a> {
    /// Creates a new length query on WGS84.
    #[must_use]
    pub fn new(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            ellipsoid: Ellipsoid::WGS84,
        }
    }

    #[must_use]
    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    /// Executes the query.
    ///
    /// Points have no length. Polygon rings and closed paths include their
    /// closing segment; an envelope is measured around its four edges.
    #[must_use]
    pub fn execute(&self) -> f64 {
        let mut total = KahanSum::new(0.0);
        match self.geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::Polyline(polyline) => {
                for path in &polyline.paths {
                    for (a, b) in path.segments() {
                        total.add(self.ellipsoid.distance_deg(a, b));
                    }
                }
            }
            Geometry::Polygon(polygon) => {
                for ring in polygon.rings() {
                    self.add_ring(&ring.points, &mut total);
                }
            }
            Geometry::Envelope(env) => {
                if !env.is_empty() {
                    self.add_ring(&env.to_ring().points, &mut total);
                }
            }
        }
        total.result()
    }

    fn add_ring(&self, points: &[Point2], total: &mut KahanSum) {
        for w in points.windows(2) {
            total.add(self.ellipsoid.distance_deg(&w[0], &w[1]));
        }
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if points.len() > 2 && first != last {
                total.add(self.ellipsoid.distance_deg(last, first));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Envelope, Path, Polygon, Polyline};

    fn triangle() -> Vec<Point2> {
        vec![
            Point2::new(10.0, 10.0),
            Point2::new(20.0, 20.0),
            Point2::new(20.0, 10.0),
        ]
    }

    #[test]
    fn triangle_perimeter() {
        let polygon = Geometry::Polygon(Polygon::from_rings(vec![triangle()]));
        let length = GeodeticLength::new(&polygon).execute();
        assert!((length - 3_744_719.409_459_757_2).abs() < 1e-3);
    }

    #[test]
    fn closed_path_matches_polygon() {
        let polygon = Geometry::Polygon(Polygon::from_rings(vec![triangle()]));
        let closed = Geometry::Polyline(Polyline::new(vec![Path::closed(triangle())]));
        let open = Geometry::Polyline(Polyline::from_points(triangle()));
        let p = GeodeticLength::new(&polygon).execute();
        let c = GeodeticLength::new(&closed).execute();
        let o = GeodeticLength::new(&open).execute();
        assert!((p - c).abs() < 1e-9);
        assert!(o < c);
    }

    #[test]
    fn points_have_no_length() {
        let point = Geometry::Point(Point2::new(1.0, 2.0));
        assert!(GeodeticLength::new(&point).execute().abs() < f64::EPSILON);
        let many = Geometry::MultiPoint(triangle());
        assert!(GeodeticLength::new(&many).execute().abs() < f64::EPSILON);
    }

    #[test]
    fn envelope_is_measured_around_its_edges() {
        let env = Envelope::new(0.0, 0.0, 1.0, 1.0);
        let as_env = GeodeticLength::new(&Geometry::Envelope(env)).execute();
        let as_poly = GeodeticLength::new(&Geometry::Polygon(env.to_polygon())).execute();
        assert!((as_env - as_poly).abs() < 1e-9);
        assert!(as_env > 4.0 * 110_000.0);
    }

    #[test]
    fn sphere_meridian_arc() {
        let sphere = Ellipsoid::sphere(6_371_000.0).unwrap_or_default();
        let line = Geometry::Polyline(Polyline::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 45.0),
        ]));
        let length = GeodeticLength::new(&line).with_ellipsoid(sphere).execute();
        assert!((length - 6_371_000.0 * std::f64::consts::FRAC_PI_4).abs() < 1e-6);
    }
}
