use i_overlay::core::fill_rule::FillRule as OverlayFillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use super::{FillRule, GeometryKernel};
use crate::error::Result;
use crate::geometry::{Polygon, Ring};
use crate::math::polygon_2d::{ensure_ccw, ensure_cw};
use crate::math::Point2;

type Contour = Vec<[f64; 2]>;

/// [`GeometryKernel`] backed by `i_overlay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayKernel;

impl OverlayKernel {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn run(subject: &[Contour], clip: &[Contour], rule: OverlayRule, fill: FillRule) -> Polygon {
        let subject: Vec<Contour> = subject.iter().filter(|c| c.len() >= 3).cloned().collect();
        let clip: Vec<Contour> = clip.iter().filter(|c| c.len() >= 3).cloned().collect();
        if subject.is_empty() && clip.is_empty() {
            return Polygon::empty();
        }
        let fill = match fill {
            FillRule::EvenOdd => OverlayFillRule::EvenOdd,
            FillRule::NonZero => OverlayFillRule::NonZero,
        };
        let shapes = subject.overlay(&clip, rule, fill);
        shapes_to_polygon(shapes)
    }
}

impl GeometryKernel for OverlayKernel {
    fn simplify(&self, rings: Vec<Vec<Point2>>, rule: FillRule) -> Result<Polygon> {
        let subject: Vec<Contour> = rings.iter().map(|r| to_contour(r)).collect();
        Ok(Self::run(&subject, &[], OverlayRule::Subject, rule))
    }

    fn union(&self, a: &Polygon, b: &Polygon) -> Result<Polygon> {
        if a.is_empty() {
            return Ok(b.clone());
        }
        if b.is_empty() {
            return Ok(a.clone());
        }
        Ok(Self::run(
            &polygon_contours(a),
            &polygon_contours(b),
            OverlayRule::Union,
            FillRule::NonZero,
        ))
    }

    fn difference(&self, a: &Polygon, b: &Polygon) -> Result<Polygon> {
        if a.is_empty() || b.is_empty() {
            return Ok(a.clone());
        }
        Ok(Self::run(
            &polygon_contours(a),
            &polygon_contours(b),
            OverlayRule::Difference,
            FillRule::NonZero,
        ))
    }
}

fn to_contour(points: &[Point2]) -> Contour {
    let mut contour: Contour = points.iter().map(|p| [p.x, p.y]).collect();
    if contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    contour
}

fn polygon_contours(polygon: &Polygon) -> Vec<Contour> {
    polygon.rings().iter().map(|r| to_contour(&r.points)).collect()
}

/// Each shape is an outer contour followed by its holes.
fn shapes_to_polygon(shapes: Vec<Vec<Contour>>) -> Polygon {
    let mut polygon = Polygon::empty();
    for shape in shapes {
        for (i, contour) in shape.into_iter().enumerate() {
            if contour.len() < 3 {
                continue;
            }
            let points: Vec<Point2> = contour.into_iter().map(|p| Point2::new(p[0], p[1])).collect();
            let points = if i == 0 {
                ensure_ccw(points)
            } else {
                ensure_cw(points)
            };
            polygon.push_ring(Ring::new(points));
        }
    }
    polygon
}
