use crate::error::{OperationError, Result};
use crate::geodesy::Ellipsoid;
use crate::geometry::{Envelope, Geometry, Path, Polygon, Polyline, Ring};
use crate::math::Point2;

/// Inserts vertices along geodesics so that no segment exceeds a length.
///
/// New vertices lie on the geodesic from each segment's start, evenly
/// spaced. Points pass through unchanged; envelopes come back as polygons.
#[derive(Debug)]
pub struct GeodesicDensify<'a> {
    geometry: &'a Geometry,
    max_segment_length: f64,
    ellipsoid: Ellipsoid,
}

impl<'a> GeodesicDensify<'a> {
    /// Creates a new densify operation on WGS84.
    #[must_use]
    pub fn new(geometry: &'a Geometry, max_segment_length: f64) -> Self {
        Self {
            geometry,
            max_segment_length,
            ellipsoid: Ellipsoid::WGS84,
        }
    }

    #[must_use]
    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    /// Executes the densification.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `max_segment_length` is not
    /// a positive number.
    pub fn execute(&self) -> Result<Geometry> {
        if self.max_segment_length.is_nan() || self.max_segment_length <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "max segment length must be positive, got {}",
                self.max_segment_length
            ))
            .into());
        }
        if self.geometry.is_empty() {
            return Ok(self.geometry.clone());
        }

        let densified = match self.geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => self.geometry.clone(),
            Geometry::Polyline(polyline) => Geometry::Polyline(Polyline::new(
                polyline
                    .paths
                    .iter()
                    .map(|path| Path {
                        points: self.densify(&path.points, path.closed),
                        closed: path.closed,
                    })
                    .collect(),
            )),
            Geometry::Polygon(polygon) => Geometry::Polygon(self.densify_polygon(polygon)),
            Geometry::Envelope(env) => Geometry::Polygon(self.densify_envelope(env)),
        };
        Ok(densified)
    }

    fn densify_polygon(&self, polygon: &Polygon) -> Polygon {
        Polygon::new(
            polygon
                .rings()
                .iter()
                .map(|ring| {
                    let explicit_close = ring.points.len() > 1 && ring.points.first() == ring.points.last();
                    Ring::new(self.densify(&ring.points, !explicit_close))
                })
                .collect(),
        )
    }

    fn densify_envelope(&self, env: &Envelope) -> Polygon {
        let top = self.ellipsoid.distance_deg(&env.upper_left(), &env.upper_right());
        let bottom = self.ellipsoid.distance_deg(&env.lower_left(), &env.lower_right());
        let side = self.ellipsoid.distance_deg(&env.lower_left(), &env.upper_left());
        let polygon = env.to_polygon();
        if top <= self.max_segment_length
            && bottom <= self.max_segment_length
            && side <= self.max_segment_length
        {
            return polygon;
        }
        self.densify_polygon(&polygon)
    }

    /// Densifies a vertex run, including the segment from the last vertex back
    /// to the first when `close` is set.
    fn densify(&self, points: &[Point2], close: bool) -> Vec<Point2> {
        let mut out = Vec::with_capacity(points.len());
        let Some(first) = points.first() else {
            return out;
        };
        out.push(*first);
        for w in points.windows(2) {
            self.fill(&w[0], &w[1], &mut out);
            out.push(w[1]);
        }
        if close && points.len() > 1 {
            if let Some(last) = points.last() {
                self.fill(last, first, &mut out);
            }
        }
        out
    }

    /// Pushes the interior vertices of one segment.
    fn fill(&self, from: &Point2, to: &Point2, out: &mut Vec<Point2>) {
        let inverse = self.ellipsoid.inverse_deg(from, to);
        if inverse.distance <= self.max_segment_length {
            return;
        }
        let count = (inverse.distance / self.max_segment_length).ceil();
        let step = inverse.distance / count;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count as usize;
        for k in 1..count {
            #[allow(clippy::cast_precision_loss)]
            let along = step * k as f64;
            out.push(self.ellipsoid.forward_deg(from, along, inverse.az12));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::query::GeodeticLength;

    fn segments_within(points: &[Point2], max: f64) -> bool {
        points
            .windows(2)
            .all(|w| Ellipsoid::WGS84.distance_deg(&w[0], &w[1]) <= max + 1e-6)
    }

    #[test]
    fn splits_long_segments_evenly() {
        let line = Geometry::Polyline(Polyline::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
        ]));
        let out = GeodesicDensify::new(&line, 10_000.0).execute().unwrap();
        let Geometry::Polyline(polyline) = out else {
            panic!("expected a polyline");
        };
        let points = &polyline.paths[0].points;
        // 111.3 km in 10 km pieces needs 12 segments.
        assert_eq!(points.len(), 13);
        assert!(segments_within(points, 10_000.0));
        assert!(points.iter().all(|p| p.y.abs() < 1e-9));
    }

    #[test]
    fn short_segments_are_untouched() {
        let line = Geometry::Polyline(Polyline::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.01, 0.0),
        ]));
        let out = GeodesicDensify::new(&line, 10_000.0).execute().unwrap();
        assert_eq!(out, line);
    }

    #[test]
    fn closing_segment_of_rings_is_densified() {
        let polygon = Geometry::Polygon(Polygon::from_rings(vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ]]));
        let out = GeodesicDensify::new(&polygon, 50_000.0).execute().unwrap();
        let Geometry::Polygon(densified) = &out else {
            panic!("expected a polygon");
        };
        let ring = &densified.rings()[0].points;
        let mut closed = ring.clone();
        closed.push(ring[0]);
        assert!(segments_within(&closed, 50_000.0));

        let before = GeodeticLength::new(&polygon).execute();
        let after = GeodeticLength::new(&out).execute();
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn envelope_becomes_polygon() {
        let env = Geometry::Envelope(Envelope::new(0.0, 0.0, 1.0, 1.0));
        let coarse = GeodesicDensify::new(&env, 1_000_000.0).execute().unwrap();
        let Geometry::Polygon(coarse) = coarse else {
            panic!("expected a polygon");
        };
        assert_eq!(coarse.point_count(), 4);

        let fine = GeodesicDensify::new(&env, 20_000.0).execute().unwrap();
        let Geometry::Polygon(fine) = fine else {
            panic!("expected a polygon");
        };
        assert!(fine.point_count() > 20);
    }

    #[test]
    fn points_pass_through() {
        let point = Geometry::Point(Point2::new(1.0, 1.0));
        assert_eq!(GeodesicDensify::new(&point, 1.0).execute().unwrap(), point);
    }

    #[test]
    fn rejects_non_positive_length() {
        let point = Geometry::Point(Point2::new(1.0, 1.0));
        assert!(GeodesicDensify::new(&point, 0.0).execute().is_err());
        assert!(GeodesicDensify::new(&point, f64::NAN).execute().is_err());
    }
}
