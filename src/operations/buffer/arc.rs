use std::f64::consts::TAU;

use super::params::BufferParams;
use super::progress::Progress;
use crate::error::Result;
use crate::geodesy::Ellipsoid;
use crate::math::polygon_2d::ensure_ccw;
use crate::math::Point2;

/// Sweeps within this of a full turn are treated as empty.
const FULL_TURN_SLACK: f64 = 1e-9;

/// Appends the vertices of the arc around `center` from `from` to `to`,
/// sweeping clockwise in azimuth. `from` itself is not emitted; `to` is.
///
/// # Errors
///
/// Returns `OperationError::Cancelled` if progress tracking asks to stop.
pub fn append(
    ellipsoid: &Ellipsoid,
    params: &BufferParams,
    center: &Point2,
    from: &Point2,
    to: &Point2,
    out: &mut Vec<Point2>,
    progress: &mut Progress<'_>,
) -> Result<()> {
    let start = positive_azimuth(ellipsoid.inverse_deg(center, from).az12);
    let end = positive_azimuth(ellipsoid.inverse_deg(center, to).az12);
    let mut sweep = if end < start {
        TAU - start + end
    } else {
        end - start
    };
    if sweep >= TAU - FULL_TURN_SLACK {
        sweep = 0.0;
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let count = (params.arc_vertex_count as f64 * sweep / TAU).floor() as usize;
    if count > 1 {
        #[allow(clippy::cast_precision_loss)]
        let step = sweep / count as f64;
        for i in 1..count {
            #[allow(clippy::cast_precision_loss)]
            let azimuth = start + step * i as f64;
            out.push(ellipsoid.forward_deg(center, params.abs_distance, azimuth));
            progress.tick()?;
        }
    }
    out.push(*to);
    progress.tick()
}

/// Ring of `arc_vertex_count` vertices at `abs_distance` around `center`,
/// counter-clockwise, with the first vertex repeated at the end.
///
/// # Errors
///
/// Returns `OperationError::Cancelled` if progress tracking asks to stop.
pub fn circle(
    ellipsoid: &Ellipsoid,
    params: &BufferParams,
    center: &Point2,
    progress: &mut Progress<'_>,
) -> Result<Vec<Point2>> {
    let n = params.arc_vertex_count;
    let mut ring = Vec::with_capacity(n + 1);
    for i in 0..n {
        #[allow(clippy::cast_precision_loss)]
        let azimuth = params.angle_step * i as f64;
        ring.push(ellipsoid.forward_deg(center, params.abs_distance, azimuth));
        progress.tick()?;
    }
    if let Some(first) = ring.first().copied() {
        ring.push(first);
        progress.tick()?;
    }
    Ok(ensure_ccw(ring))
}

fn positive_azimuth(azimuth: f64) -> f64 {
    if azimuth < 0.0 {
        azimuth + TAU
    } else {
        azimuth
    }
}
