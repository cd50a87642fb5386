use std::f64::consts::{PI, TAU};

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geodesy::{envelope, Ellipsoid};
use crate::geometry::Envelope;

/// Vertex budget for a full circle when none is requested.
pub const DEFAULT_MAX_VERTICES: i32 = 96;

/// Smallest vertex budget for a full circle.
pub const MIN_VERTICES: i32 = 12;

/// Caller-facing buffer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferOptions {
    /// Largest allowed gap in meters between a true arc and its chords.
    /// Zero or NaN picks `|distance| * 1e-5`.
    pub max_deviation: f64,
    /// Vertex budget for a full circle; non-positive values mean 96.
    pub max_vertices_in_full_circle: i32,
    /// Whether a [`BufferCursor`](super::BufferCursor) merges its outputs.
    pub union_results: bool,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            max_deviation: 0.0,
            max_vertices_in_full_circle: DEFAULT_MAX_VERTICES,
            union_results: false,
        }
    }
}

impl BufferOptions {
    #[must_use]
    pub fn with_max_deviation(mut self, meters: f64) -> Self {
        self.max_deviation = meters;
        self
    }

    #[must_use]
    pub fn with_max_vertices_in_full_circle(mut self, count: i32) -> Self {
        self.max_vertices_in_full_circle = count;
        self
    }

    #[must_use]
    pub fn with_union_results(mut self, union: bool) -> Self {
        self.union_results = union;
        self
    }
}

/// Tessellation parameters derived once per buffer call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferParams {
    /// Signed buffer distance in meters.
    pub distance: f64,
    pub abs_distance: f64,
    /// Chord deviation in meters actually used.
    pub densify_distance: f64,
    /// Vertex budget for a full circle after reconciling with the deviation.
    pub max_vertices_in_full_circle: i32,
    /// Coordinate tolerance in degrees for local intersection tests.
    pub tolerance: f64,
    /// Distance in degrees under which consecutive input vertices merge.
    pub filter_tolerance: f64,
    /// Vertices of a full circle, a multiple of four.
    pub arc_vertex_count: usize,
    /// Azimuth step of a full circle in radians.
    pub angle_step: f64,
}

impl BufferParams {
    /// Derives the parameters for buffering geometry bounded by `extent`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a NaN distance or a negative
    /// deviation.
    pub fn derive(
        ellipsoid: &Ellipsoid,
        distance: f64,
        options: &BufferOptions,
        extent: &Envelope,
    ) -> Result<Self> {
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

        let abs_distance = distance.abs();
        let mut max_vertices = if options.max_vertices_in_full_circle <= 0 {
            DEFAULT_MAX_VERTICES
        } else {
            options.max_vertices_in_full_circle
        };

        let mut densify = options.max_deviation;
        if densify.is_nan() || densify == 0.0 {
            densify = abs_distance * 1e-5;
        } else if densify > abs_distance * 0.5 {
            densify = abs_distance * 0.5;
        }
        max_vertices = max_vertices.max(MIN_VERTICES);

        // The deviation and the vertex budget must agree: a coarse budget
        // raises the deviation, a coarse deviation lowers the budget.
        let budget_deviation = abs_distance * (1.0 - (PI / f64::from(max_vertices)).cos());
        if budget_deviation > densify {
            densify = budget_deviation;
        } else {
            let vertex_count = PI / (1.0 - densify / abs_distance).acos();
            if vertex_count < f64::from(max_vertices) - 1.0 {
                #[allow(clippy::cast_possible_truncation)]
                let truncated = vertex_count as i32;
                max_vertices = truncated;
                if max_vertices < MIN_VERTICES {
                    max_vertices = MIN_VERTICES;
                    densify = abs_distance * (1.0 - (PI / f64::from(max_vertices)).cos());
                }
            }
        }

        let extent = if distance > 0.0 {
            envelope::inflate(ellipsoid, extent, distance, distance)
        } else {
            *extent
        };
        let tolerance = coordinate_tolerance(&extent);
        let meters_per_degree = ellipsoid.semi_major_axis() * PI / 180.0;
        let filter_tolerance = tolerance.min(densify * 0.25 / meters_per_degree);

        let n = circle_vertex_count(densify, abs_distance, max_vertices, 4);
        let arc_vertex_count = n.div_ceil(4) * 4;
        #[allow(clippy::cast_precision_loss)]
        let angle_step = TAU / arc_vertex_count as f64;

        let params = Self {
            distance,
            abs_distance,
            densify_distance: densify,
            max_vertices_in_full_circle: max_vertices,
            tolerance,
            filter_tolerance,
            arc_vertex_count,
            angle_step,
        };
        debug!(
            distance,
            densify = params.densify_distance,
            max_vertices = params.max_vertices_in_full_circle,
            arc_vertices = params.arc_vertex_count,
            tolerance = params.tolerance,
            "derived buffer parameters"
        );
        Ok(params)
    }
}

/// Vertices needed for a full circle so that no chord deviates more than
/// `densify` from a circle of radius `radius`, clamped to
/// `[min_n, max_vertices]`.
fn circle_vertex_count(densify: f64, radius: f64, max_vertices: i32, min_n: i32) -> usize {
    #[allow(clippy::float_cmp)]
    let n = if densify == 0.0 {
        max_vertices
    } else {
        let r = if radius == 0.0 { 0.0 } else { densify / radius };
        let cos_a = 1.0 - r;
        let n = if cos_a < -1.0 {
            f64::from(min_n)
        } else {
            TAU / cos_a.acos() + 0.5
        };
        #[allow(clippy::cast_possible_truncation)]
        let n = n.clamp(f64::from(min_n), f64::from(max_vertices)) as i32;
        n
    };
    usize::try_from(n.max(min_n)).unwrap_or(4)
}

/// Conservative coordinate tolerance for an extent in degrees.
fn coordinate_tolerance(extent: &Envelope) -> f64 {
    let magnitude = if extent.is_empty() {
        1.0
    } else {
        extent.xmin.abs() + extent.xmax.abs() + extent.ymin.abs() + extent.ymax.abs() + 1.0
    };
    4.0 * magnitude * 100.0 * f64::EPSILON
}
