mod arc;
mod assemble;
mod cleanup;
mod closed_path;
pub mod command;
mod cursor;
pub mod params;
pub mod progress;

pub use cursor::BufferCursor;
pub use params::{BufferOptions, BufferParams};
pub use progress::{NoProgress, Progress, ProgressTracker};

use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geodesy::{envelope, Ellipsoid};
use crate::geometry::{is_valid_point, Envelope, Geometry, Path, Polygon, Polyline, Ring};
use crate::kernel::{FillRule, GeometryKernel, OverlayKernel};
use crate::math::polygon_2d::filter_close_points;
use crate::math::Point2;

/// Buffers a geometry by a distance in meters on an ellipsoid.
///
/// Positive distances grow the geometry, negative distances shrink polygons
/// and envelopes. Coordinates are longitude/latitude degrees; the result is
/// a simple polygon in the same frame.
#[derive(Debug, Clone)]
pub struct GeodesicBuffer {
    geometry: Geometry,
    distance: f64,
    ellipsoid: Ellipsoid,
    options: BufferOptions,
}

impl GeodesicBuffer {
    /// Creates a buffer operation on WGS84 with default options.
    #[must_use]
    pub fn new(geometry: impl Into<Geometry>, distance: f64) -> Self {
        Self {
            geometry: geometry.into(),
            distance,
            ellipsoid: Ellipsoid::WGS84,
            options: BufferOptions::default(),
        }
    }

    #[must_use]
    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: BufferOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the buffer.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a NaN distance or a negative
    /// max deviation, `OperationError::Cancelled` if `tracker` asks to stop,
    /// or any error raised by `kernel`.
    pub fn execute(
        &self,
        kernel: &dyn GeometryKernel,
        tracker: &mut dyn ProgressTracker,
    ) -> Result<Polygon> {
        run(
            &self.geometry,
            self.distance,
            &self.ellipsoid,
            &self.options,
            kernel,
            tracker,
        )
    }
}

/// Buffers `geometry` by `distance` meters using the [`OverlayKernel`].
///
/// `max_deviation` is the largest allowed gap in meters between a true arc
/// and its chords (zero picks a default), `max_vertices_in_full_circle` caps
/// the vertices of a full circle (non-positive picks 96).
///
/// # Errors
///
/// See [`GeodesicBuffer::execute`].
pub fn buffer(
    geometry: &Geometry,
    distance: f64,
    ellipsoid: &Ellipsoid,
    max_deviation: f64,
    max_vertices_in_full_circle: i32,
    tracker: &mut dyn ProgressTracker,
) -> Result<Polygon> {
    let options = BufferOptions::default()
        .with_max_deviation(max_deviation)
        .with_max_vertices_in_full_circle(max_vertices_in_full_circle);
    run(
        geometry,
        distance,
        ellipsoid,
        &options,
        &OverlayKernel::new(),
        tracker,
    )
}

pub(crate) fn run(
    geometry: &Geometry,
    distance: f64,
    ellipsoid: &Ellipsoid,
    options: &BufferOptions,
    kernel: &dyn GeometryKernel,
    tracker: &mut dyn ProgressTracker,
) -> Result<Polygon> {
    if distance.is_nan() {
        return Err(OperationError::InvalidInput("buffer distance is NaN".to_owned()).into());
    }
    if options.max_deviation < 0.0 {
        return Err(OperationError::InvalidInput(format!(
            "max deviation must not be negative, got {}",
            options.max_deviation
        ))
        .into());
    }
    if geometry.is_empty() {
        return Ok(Polygon::empty());
    }

    let extent = geometry.envelope();
    if distance <= 0.0 {
        if !geometry.is_area() {
            return Ok(Polygon::empty());
        }
        let limit = -2.0 * distance;
        if envelope::width(ellipsoid, &extent) <= limit
            || envelope::height(ellipsoid, &extent) <= limit
        {
            debug!(kind = geometry.kind(), distance, "negative buffer consumes the geometry");
            return Ok(Polygon::empty());
        }
    }

    let params = BufferParams::derive(ellipsoid, distance, options, &extent)?;
    let mut bufferer = Bufferer {
        ellipsoid,
        params,
        kernel,
        progress: Progress::new(tracker),
    };
    let result = bufferer.geometry(geometry)?;
    debug!(
        kind = geometry.kind(),
        distance,
        rings = result.ring_count(),
        vertices = bufferer.progress.count(),
        "buffered geometry"
    );
    Ok(result)
}

/// Per-call state shared by the dispatch paths.
struct Bufferer<'a, 'p> {
    ellipsoid: &'a Ellipsoid,
    params: BufferParams,
    kernel: &'a dyn GeometryKernel,
    progress: Progress<'p>,
}

impl Bufferer<'_, '_> {
    fn geometry(&mut self, geometry: &Geometry) -> Result<Polygon> {
        match geometry {
            Geometry::Point(p) => self.point(p),
            Geometry::MultiPoint(points) => self.multi_point(points),
            Geometry::Polyline(polyline) => self.polyline(polyline),
            Geometry::Polygon(polygon) => self.polygon(polygon),
            Geometry::Envelope(env) => self.envelope(env),
        }
    }

    fn point(&mut self, center: &Point2) -> Result<Polygon> {
        let ring = arc::circle(self.ellipsoid, &self.params, center, &mut self.progress)?;
        Ok(Polygon::new(vec![Ring::new(ring)]))
    }

    fn multi_point(&mut self, points: &[Point2]) -> Result<Polygon> {
        let mut circles = Vec::with_capacity(points.len());
        for p in points.iter().filter(|p| is_valid_point(p)) {
            circles.push(self.point(p)?);
        }
        self.kernel.union_all(circles)
    }

    fn polyline(&mut self, polyline: &Polyline) -> Result<Polygon> {
        let extent = polyline.envelope();
        if self.is_degenerate(&extent) {
            let center = envelope::geodetic_center(self.ellipsoid, &extent);
            return self.point(&center);
        }

        let groups = merge_open_paths(&polyline.paths);
        let mut parts = Vec::with_capacity(groups.len());
        for path in &groups {
            parts.push(self.path(path)?);
        }
        self.kernel.union_all(parts)
    }

    fn path(&mut self, path: &Path) -> Result<Polygon> {
        if path.points.is_empty() {
            return Ok(Polygon::empty());
        }
        let extent = path.envelope();
        if path.points.len() == 1 || self.is_degenerate(&extent) {
            let center = envelope::geodetic_center(self.ellipsoid, &extent);
            return self.point(&center);
        }

        let mut rings = Vec::with_capacity(2);
        if path.is_closed() {
            let mut points = path.points.clone();
            if points.len() > 1 && points.first() == points.last() {
                points.pop();
            }
            rings.extend(self.ring(&points, true)?);
            rings.extend(self.ring(&closed_path::reversed_ring(&points), false)?);
        } else {
            rings.extend(self.ring(&closed_path::open_path_ring(&path.points), true)?);
        }
        self.kernel.simplify(rings, FillRule::NonZero)
    }

    /// Offsets one closed ring to its left. A ring that filters down to a
    /// single point yields a circle when walked forward and nothing when
    /// walked in reverse.
    fn ring(&mut self, points: &[Point2], forward: bool) -> Result<Option<Vec<Point2>>> {
        let filtered = filter_close_points(points, self.params.filter_tolerance, true);
        if filtered.len() < 2 {
            if !forward {
                return Ok(None);
            }
            let Some(first) = points.first() else {
                return Ok(None);
            };
            let circle = arc::circle(self.ellipsoid, &self.params, first, &mut self.progress)?;
            return Ok(Some(circle));
        }

        let mut arena = closed_path::build(self.ellipsoid, &self.params, &filtered);
        trace!(vertices = filtered.len(), commands = arena.len(), "built buffer commands");
        let cleaned = cleanup::apply(&mut arena, self.params.tolerance)?;
        let ring = assemble::ring(
            self.ellipsoid,
            &self.params,
            &arena,
            cleaned.start,
            &mut self.progress,
        )?;
        Ok(Some(ring))
    }

    fn polygon(&mut self, polygon: &Polygon) -> Result<Polygon> {
        if self.params.distance > 0.0 {
            let extent = polygon.envelope();
            if self.is_degenerate(&extent) {
                let center = envelope::geodetic_center(self.ellipsoid, &extent);
                return self.point(&center);
            }
        }

        let rings = polygon.rings().iter().map(|r| r.points.clone()).collect();
        let simple = self.kernel.simplify(rings, FillRule::EvenOdd)?;
        #[allow(clippy::float_cmp)]
        let unchanged = self.params.distance == 0.0;
        if unchanged || simple.is_empty() {
            return Ok(simple);
        }

        // Grow or shrink by the band around the boundary.
        let boundary = self.kernel.boundary(&simple);
        let band = self.polyline(&boundary)?;
        if self.params.distance < 0.0 {
            self.kernel.difference(&simple, &band)
        } else {
            self.kernel.union(&band, &simple)
        }
    }

    fn envelope(&mut self, env: &Envelope) -> Result<Polygon> {
        let distance = self.params.distance;
        if distance < 0.0 {
            Ok(envelope::inflate(self.ellipsoid, env, distance, distance).to_polygon())
        } else if distance > 0.0 {
            self.polygon(&env.to_polygon())
        } else {
            Ok(env.to_polygon())
        }
    }

    /// Extent too small to matter at the current deviation.
    fn is_degenerate(&self, extent: &Envelope) -> bool {
        let width = envelope::width(self.ellipsoid, extent);
        let height = envelope::height(self.ellipsoid, extent);
        width.max(height) < self.params.densify_distance * 0.5
    }
}

/// Joins each run of open paths whose starts repeat the previous end into
/// one path. Closed paths are never joined.
fn merge_open_paths(paths: &[Path]) -> Vec<Path> {
    let mut merged: Vec<Path> = Vec::with_capacity(paths.len());
    for path in paths.iter().filter(|p| !p.points.is_empty()) {
        if !path.is_closed() {
            if let Some(last) = merged.last_mut() {
                if !last.is_closed() && last.last() == path.first() {
                    last.points.extend_from_slice(&path.points[1..]);
                    continue;
                }
            }
        }
        merged.push(path.clone());
    }
    merged
}
