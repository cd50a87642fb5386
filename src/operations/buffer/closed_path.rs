use std::f64::consts::FRAC_PI_2;

use super::command::{CommandArena, CommandKind};
use super::params::BufferParams;
use crate::geodesy::Ellipsoid;
use crate::math::intersect_2d::cross_2d;
use crate::math::{Point2, Vector2};

/// Emits the offset commands for a closed ring, offsetting every edge to its
/// left by `abs_distance`.
///
/// `ring` lists at least two vertices without repeating the first. Convex
/// corners become [`CommandKind::Arc`] joins around the input vertex; concave
/// corners are bridged by two [`CommandKind::Connector`]s through the vertex.
/// The returned arena is a closed cycle.
#[must_use]
pub fn build(ellipsoid: &Ellipsoid, params: &BufferParams, ring: &[Point2]) -> CommandArena {
    let mut arena = CommandArena::new();
    let n = ring.len();
    if n < 2 {
        return arena;
    }
    let d = params.abs_distance;

    let mut current = ring[0];
    let mut before = ring[n - 1];
    let incoming = ellipsoid.inverse_deg(&before, &current);
    let mut left_prev = ellipsoid.forward_deg(&current, d, incoming.az12 - FRAC_PI_2);

    for i in 0..n {
        let after = ring[(i + 1) % n];
        let edge = ellipsoid.inverse_deg(&current, &after);
        let left_az = edge.az12 - FRAC_PI_2;
        let start = ellipsoid.forward_deg(&current, d, left_az);

        // Both tangents are taken at `current`, so walking straight back
        // along the incoming edge gives exactly opposite vectors.
        let arrival = -tangent(ellipsoid.inverse_deg(&current, &before).az12);
        let departure = tangent(edge.az12);

        let cross = cross_2d(&arrival, &departure);
        let dot = arrival.dot(&departure);
        #[allow(clippy::float_cmp)]
        let convex = cross < 0.0 || (cross == 0.0 && dot < 0.0);
        if convex {
            arena.push(left_prev, start, CommandKind::Arc { center: current });
        } else if left_prev != start {
            arena.push(left_prev, current, CommandKind::Connector);
            arena.push(current, start, CommandKind::Connector);
        }

        let end = ellipsoid.forward_deg(&after, d, left_az);
        arena.push(start, end, CommandKind::Line);

        left_prev = end;
        before = current;
        current = after;
    }

    arena.close_cycle();
    arena
}

/// Unit direction of an azimuth in an east/north frame.
fn tangent(azimuth: f64) -> Vector2 {
    Vector2::new(azimuth.sin(), azimuth.cos())
}

/// Vertex order that traces both sides of an open path as one ring:
/// out along the path and back along its interior vertices.
#[must_use]
pub fn open_path_ring(points: &[Point2]) -> Vec<Point2> {
    let mut ring = points.to_vec();
    if points.len() > 2 {
        ring.extend(points[1..points.len() - 1].iter().rev());
    }
    ring
}

/// The same ring walked in the opposite direction, starting at the same
/// vertex.
#[must_use]
pub fn reversed_ring(ring: &[Point2]) -> Vec<Point2> {
    let mut reversed = Vec::with_capacity(ring.len());
    if let Some(first) = ring.first() {
        reversed.push(*first);
        reversed.extend(ring[1..].iter().rev());
    }
    reversed
}
