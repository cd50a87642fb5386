use crate::math::Point2;

use super::envelope::Envelope;

/// An ordered run of longitude/latitude vertices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub points: Vec<Point2>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

impl Path {
    #[must_use]
    pub fn open(points: Vec<Point2>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    #[must_use]
    pub fn closed(points: Vec<Point2>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// `true` if the path is flagged closed or its end repeats its start.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed || (self.points.len() > 1 && self.points.first() == self.points.last())
    }

    #[must_use]
    pub fn first(&self) -> Option<&Point2> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Point2> {
        self.points.last()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_points(&self.points)
    }

    /// Consecutive vertex pairs, including the closing pair of a flagged-closed
    /// path.
    pub fn segments(&self) -> impl Iterator<Item = (&Point2, &Point2)> + '_ {
        let closing = if self.closed && self.points.len() > 1 {
            self.points.last().zip(self.points.first())
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|w| (&w[0], &w[1]))
            .chain(closing)
    }
}

/// A set of paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub paths: Vec<Path>,
}

impl Polyline {
    #[must_use]
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    /// A polyline holding one open path.
    #[must_use]
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self {
            paths: vec![Path::open(points)],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(|p| p.points.is_empty())
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.points.len()).sum()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_points(self.paths.iter().flat_map(|p| p.points.iter()))
    }
}
