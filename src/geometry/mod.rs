pub mod envelope;
pub mod polygon;
pub mod polyline;

pub use envelope::Envelope;
pub use polygon::{Polygon, Ring};
pub use polyline::{Path, Polyline};

use crate::math::Point2;

/// Input geometry in longitude/latitude degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single position; empty when a coordinate is NaN.
    Point(Point2),
    MultiPoint(Vec<Point2>),
    Polyline(Polyline),
    Polygon(Polygon),
    Envelope(Envelope),
}

impl Geometry {
    /// `true` if the geometry has no usable vertex.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(p) => !is_valid_point(p),
            Self::MultiPoint(points) => !points.iter().any(is_valid_point),
            Self::Polyline(polyline) => polyline.is_empty(),
            Self::Polygon(polygon) => polygon.is_empty(),
            Self::Envelope(envelope) => envelope.is_empty(),
        }
    }

    /// `true` for polygons and envelopes.
    #[must_use]
    pub fn is_area(&self) -> bool {
        matches!(self, Self::Polygon(_) | Self::Envelope(_))
    }

    /// Planar bounding envelope in degrees.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        match self {
            Self::Point(p) => Envelope::from_points(std::iter::once(p)),
            Self::MultiPoint(points) => Envelope::from_points(points),
            Self::Polyline(polyline) => polyline.envelope(),
            Self::Polygon(polygon) => polygon.envelope(),
            Self::Envelope(envelope) => *envelope,
        }
    }

    /// Short type name for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::MultiPoint(_) => "multipoint",
            Self::Polyline(_) => "polyline",
            Self::Polygon(_) => "polygon",
            Self::Envelope(_) => "envelope",
        }
    }
}

/// `true` when both coordinates are finite.
#[must_use]
pub fn is_valid_point(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

impl From<Point2> for Geometry {
    fn from(p: Point2) -> Self {
        Self::Point(p)
    }
}

impl From<Polyline> for Geometry {
    fn from(p: Polyline) -> Self {
        Self::Polyline(p)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<Envelope> for Geometry {
    fn from(e: Envelope) -> Self {
        Self::Envelope(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness() {
        assert!(Geometry::Point(Point2::new(f64::NAN, f64::NAN)).is_empty());
        assert!(!Geometry::Point(Point2::new(1.0, 2.0)).is_empty());
        assert!(Geometry::MultiPoint(Vec::new()).is_empty());
        assert!(Geometry::Polygon(Polygon::empty()).is_empty());
        assert!(Geometry::Envelope(Envelope::empty()).is_empty());
    }

    #[test]
    fn area_kinds() {
        assert!(Geometry::from(Envelope::new(0.0, 0.0, 1.0, 1.0)).is_area());
        assert!(!Geometry::from(Polyline::default()).is_area());
        assert_eq!(Geometry::from(Point2::origin()).kind(), "point");
    }

    #[test]
    fn point_envelope_is_degenerate() {
        let env = Geometry::Point(Point2::new(3.0, 4.0)).envelope();
        assert!(env.width().abs() < f64::EPSILON);
        assert!((env.xmin - 3.0).abs() < f64::EPSILON);
    }
}
