use crate::math::Point2;

use super::polygon::{Polygon, Ring};

/// Axis-aligned longitude/latitude rectangle in degrees.
///
/// An envelope whose `xmin` is NaN is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Envelope {
    /// Creates an envelope from two opposite corners in any order.
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            xmin: x0.min(x1),
            ymin: y0.min(y1),
            xmax: x0.max(x1),
            ymax: y0.max(y1),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            xmin: f64::NAN,
            ymin: f64::NAN,
            xmax: f64::NAN,
            ymax: f64::NAN,
        }
    }

    /// Bounding envelope of a point set; empty for no points.
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut env = Self::empty();
        for p in points {
            env.merge_point(p);
        }
        env
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xmin.is_nan()
    }

    /// Grows the envelope to contain `p`. Non-finite points are ignored.
    pub fn merge_point(&mut self, p: &Point2) {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return;
        }
        if self.is_empty() {
            *self = Self::new(p.x, p.y, p.x, p.y);
            return;
        }
        self.xmin = self.xmin.min(p.x);
        self.ymin = self.ymin.min(p.y);
        self.xmax = self.xmax.max(p.x);
        self.ymax = self.ymax.max(p.y);
    }

    pub fn merge(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }
        self.merge_point(&other.lower_left());
        self.merge_point(&other.upper_right());
    }

    /// Planar width in degrees.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Planar height in degrees.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Planar center in degrees.
    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(
            0.5 * (self.xmin + self.xmax),
            0.5 * (self.ymin + self.ymax),
        )
    }

    #[must_use]
    pub fn lower_left(&self) -> Point2 {
        Point2::new(self.xmin, self.ymin)
    }

    #[must_use]
    pub fn lower_right(&self) -> Point2 {
        Point2::new(self.xmax, self.ymin)
    }

    #[must_use]
    pub fn upper_left(&self) -> Point2 {
        Point2::new(self.xmin, self.ymax)
    }

    #[must_use]
    pub fn upper_right(&self) -> Point2 {
        Point2::new(self.xmax, self.ymax)
    }

    /// The envelope's boundary as a counter-clockwise ring.
    #[must_use]
    pub fn to_ring(&self) -> Ring {
        Ring::new(vec![
            self.lower_left(),
            self.lower_right(),
            self.upper_right(),
            self.upper_left(),
        ])
    }

    /// The envelope as a single-ring polygon; empty for an empty envelope.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        if self.is_empty() {
            Polygon::empty()
        } else {
            Polygon::new(vec![self.to_ring()])
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}
