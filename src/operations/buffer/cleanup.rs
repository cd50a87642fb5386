//! Local removal of the self-crossings that concave corners leave behind.
//!
//! Only a crossing between two offset lines separated by connectors is
//! resolved, and only when they meet in a single point. Everything else is
//! left to the winding simplify that follows assembly.

use tracing::trace;

use super::command::CommandArena;
use crate::error::{OperationError, Result};
use crate::math::intersect_2d::{segment_segment_intersect_2d, SegmentIntersection};

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cleanup {
    /// First surviving command; assembly starts here.
    pub start: usize,
    /// Number of crossings spliced out.
    pub splices: usize,
}

/// Splices out the connectors between crossing offset lines.
///
/// # Errors
///
/// Returns `OperationError::Internal` if the command links are broken.
pub fn apply(arena: &mut CommandArena, tolerance: f64) -> Result<Cleanup> {
    if arena.is_empty() {
        return Ok(Cleanup {
            start: 0,
            splices: 0,
        });
    }

    let start = first_connection(arena)?;
    let mut splices = 0;
    let mut index = start;
    let mut steps = 0;
    loop {
        let command = *arena.get(index)?;
        let mut next_index = command.next;
        let mut gap = 1;
        while next_index != index {
            let next = arena.get(next_index)?;
            if next.is_connection() {
                break;
            }
            next_index = next.next;
            gap += 1;
            if gap > arena.len() {
                return Err(broken_cycle());
            }
        }

        if gap > 1 && next_index != index {
            let next = *arena.get(next_index)?;
            if command.is_line() && next.is_line() {
                let hit = segment_segment_intersect_2d(
                    &command.from,
                    &command.to,
                    &next.from,
                    &next.to,
                    tolerance,
                );
                if let SegmentIntersection::Point(p) = hit {
                    let current = arena.get_mut(index)?;
                    current.to = p;
                    current.next = next_index;
                    let following = arena.get_mut(next_index)?;
                    following.from = p;
                    following.prev = index;
                    splices += 1;
                }
            }
        }

        index = next_index;
        if index == start {
            break;
        }
        steps += 1;
        if steps > arena.len() {
            return Err(broken_cycle());
        }
    }

    trace!(commands = arena.len(), splices, "cleaned buffer commands");
    Ok(Cleanup { start, splices })
}

/// First line or arc reached from index 0.
fn first_connection(arena: &CommandArena) -> Result<usize> {
    let mut index = 0;
    for _ in 0..arena.len() {
        let command = arena.get(index)?;
        if command.is_connection() {
            return Ok(index);
        }
        index = command.next;
    }
    Ok(0)
}

fn broken_cycle() -> crate::error::GeodesicError {
    OperationError::Internal("buffer command links do not form a cycle".to_owned()).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::operations::buffer::command::CommandKind;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// Offset lines of a concave corner at (0, 0): the first line runs east
    /// past the corner, the second runs north from below it.
    fn concave_corner() -> CommandArena {
        let mut arena = CommandArena::new();
        arena.push(p(-2.0, 0.5), p(0.0, 0.5), CommandKind::Line);
        arena.push(p(0.0, 0.5), p(0.0, 0.0), CommandKind::Connector);
        arena.push(p(0.0, 0.0), p(-0.5, 0.0), CommandKind::Connector);
        arena.push(p(-0.5, 0.0), p(-0.5, 2.0), CommandKind::Line);
        arena.push(p(-0.5, 2.0), p(-2.0, 0.5), CommandKind::Line);
        arena.close_cycle();
        arena
    }

    #[test]
    fn splices_crossing_lines() {
        let mut arena = concave_corner();
        let result = apply(&mut arena, 1e-12).unwrap();
        assert_eq!(result.splices, 1);
        assert_eq!(result.start, 0);
        assert_eq!(arena.cycle_from(0).unwrap(), vec![0, 3, 4]);
        let first = arena.get(0).unwrap();
        assert!((first.to.x + 0.5).abs() < 1e-12);
        assert!((first.to.y - 0.5).abs() < 1e-12);
        assert_eq!(arena.get(3).unwrap().from, first.to);
    }

    #[test]
    fn adjacent_lines_are_left_alone() {
        let mut arena = CommandArena::new();
        arena.push(p(0.0, 0.0), p(1.0, 0.0), CommandKind::Line);
        arena.push(p(1.0, 0.0), p(1.0, 1.0), CommandKind::Line);
        arena.push(p(1.0, 1.0), p(0.0, 0.0), CommandKind::Line);
        arena.close_cycle();
        let result = apply(&mut arena, 1e-12).unwrap();
        assert_eq!(result.splices, 0);
        assert_eq!(arena.cycle_from(0).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn disjoint_lines_keep_their_connectors() {
        let mut arena = CommandArena::new();
        arena.push(p(0.0, 0.0), p(1.0, 0.0), CommandKind::Line);
        arena.push(p(1.0, 0.0), p(2.0, 1.0), CommandKind::Connector);
        arena.push(p(2.0, 1.0), p(2.0, 3.0), CommandKind::Line);
        arena.push(p(2.0, 3.0), p(0.0, 0.0), CommandKind::Line);
        arena.close_cycle();
        let result = apply(&mut arena, 1e-12).unwrap();
        assert_eq!(result.splices, 0);
        assert_eq!(arena.cycle_from(0).unwrap().len(), 4);
    }

    #[test]
    fn starts_at_first_connection() {
        let mut arena = CommandArena::new();
        arena.push(p(0.0, 0.0), p(1.0, 0.0), CommandKind::Connector);
        arena.push(p(1.0, 0.0), p(1.0, 1.0), CommandKind::Line);
        arena.push(p(1.0, 1.0), p(0.0, 0.0), CommandKind::Line);
        arena.close_cycle();
        assert_eq!(apply(&mut arena, 1e-12).unwrap().start, 1);
    }

    #[test]
    fn empty_arena() {
        let mut arena = CommandArena::new();
        assert_eq!(apply(&mut arena, 1e-12).unwrap().splices, 0);
    }
}
