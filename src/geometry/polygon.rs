use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;

use super::envelope::Envelope;

/// A closed ring of longitude/latitude vertices.
///
/// The ring closes implicitly from the last vertex back to the first. A
/// trailing copy of the first vertex is allowed and does not change the
/// ring's area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    pub points: Vec<Point2>,
}

impl Ring {
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Signed planar area in square degrees; positive when counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// `true` for counter-clockwise (exterior) rings.
    #[must_use]
    pub fn is_exterior(&self) -> bool {
        self.signed_area() > 0.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An area made of rings. Exterior rings wind counter-clockwise, holes
/// clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    /// Creates a polygon, dropping rings without vertices.
    #[must_use]
    pub fn new(rings: Vec<Ring>) -> Self {
        Self {
            rings: rings.into_iter().filter(|r| !r.is_empty()).collect(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { rings: Vec::new() }
    }

    /// Builds a polygon from raw coordinate rings.
    #[must_use]
    pub fn from_rings(rings: Vec<Vec<Point2>>) -> Self {
        Self::new(rings.into_iter().map(Ring::new).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    #[must_use]
    pub fn into_rings(self) -> Vec<Ring> {
        self.rings
    }

    pub fn push_ring(&mut self, ring: Ring) {
        if !ring.is_empty() {
            self.rings.push(ring);
        }
    }

    /// Appends every ring of `other`.
    pub fn extend(&mut self, other: Polygon) {
        self.rings.extend(other.rings);
    }

    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Total number of stored vertices over all rings.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }

    /// Planar area in square degrees (exteriors minus holes).
    #[must_use]
    pub fn area(&self) -> f64 {
        self.rings.iter().map(Ring::signed_area).sum()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_points(self.rings.iter().flat_map(|r| r.points.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ]
    }

    #[test]
    fn hole_subtracts_area() {
        let mut hole = square(1.0, 1.0, 1.0);
        hole.reverse();
        let poly = Polygon::from_rings(vec![square(0.0, 0.0, 3.0), hole]);
        assert_eq!(poly.ring_count(), 2);
        assert_eq!(poly.point_count(), 8);
        assert!((poly.area() - 8.0).abs() < TOLERANCE);
        assert!(poly.rings()[0].is_exterior());
        assert!(!poly.rings()[1].is_exterior());
    }

    #[test]
    fn closing_vertex_keeps_area() {
        let mut pts = square(0.0, 0.0, 2.0);
        pts.push(pts[0]);
        let ring = Ring::new(pts);
        assert_eq!(ring.len(), 5);
        assert!((ring.signed_area() - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn empty_rings_are_dropped() {
        let poly = Polygon::from_rings(vec![Vec::new(), square(0.0, 0.0, 1.0)]);
        assert_eq!(poly.ring_count(), 1);
        let env = poly.envelope();
        assert!((env.xmax - 1.0).abs() < TOLERANCE);
    }
}
