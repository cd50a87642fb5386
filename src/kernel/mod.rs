//! Planar boolean operations the buffer engine delegates to.
//!
//! Buffering works in longitude/latitude degrees; the kernel treats those as
//! plain planar coordinates.

mod overlay;

pub use overlay::OverlayKernel;

use crate::error::Result;
use crate::geometry::{Path, Polygon, Polyline};
use crate::math::Point2;

/// Rule deciding which points a set of possibly overlapping rings covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Covered where a ray crosses an odd number of edges.
    EvenOdd,
    /// Covered where the winding number is non-zero.
    #[default]
    NonZero,
}

/// Boolean-topology collaborator for the buffer engine.
///
/// Every returned polygon is simple: exterior rings counter-clockwise, holes
/// clockwise, no repeated closing vertex.
pub trait GeometryKernel {
    /// Resolves arbitrary rings into a simple polygon under `rule`.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology cannot be resolved.
    fn simplify(&self, rings: Vec<Vec<Point2>>, rule: FillRule) -> Result<Polygon>;

    /// Union of two simple polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology cannot be resolved.
    fn union(&self, a: &Polygon, b: &Polygon) -> Result<Polygon>;

    /// `a` minus `b`, both simple polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology cannot be resolved.
    fn difference(&self, a: &Polygon, b: &Polygon) -> Result<Polygon>;

    /// Union of any number of simple polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology cannot be resolved.
    fn union_all(&self, polygons: Vec<Polygon>) -> Result<Polygon> {
        let rings = polygons
            .into_iter()
            .flat_map(Polygon::into_rings)
            .map(|r| r.points)
            .collect();
        self.simplify(rings, FillRule::NonZero)
    }

    /// The rings of a polygon as closed paths.
    fn boundary(&self, polygon: &Polygon) -> Polyline {
        Polyline::new(
            polygon
                .rings()
                .iter()
                .map(|r| Path::closed(r.points.clone()))
                .collect(),
        )
    }
}
