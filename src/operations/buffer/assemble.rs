use super::arc;
use super::command::{CommandArena, CommandKind};
use super::params::BufferParams;
use super::progress::Progress;
use crate::error::Result;
use crate::geodesy::Ellipsoid;
use crate::math::Point2;

/// Walks the command cycle from `start` and expands it into one closed ring.
///
/// Arc commands are tessellated around their centers; lines and connectors
/// contribute their end points. The ring ends on the first command's start.
///
/// # Errors
///
/// Returns `OperationError::Internal` for a broken cycle, or
/// `OperationError::Cancelled` if progress tracking asks to stop.
pub fn ring(
    ellipsoid: &Ellipsoid,
    params: &BufferParams,
    arena: &CommandArena,
    start: usize,
    progress: &mut Progress<'_>,
) -> Result<Vec<Point2>> {
    if arena.is_empty() {
        return Ok(Vec::new());
    }

    let order = arena.cycle_from(start)?;
    let mut out = Vec::with_capacity(order.len() * 2);
    out.push(arena.get(start)?.from);
    progress.tick()?;

    for index in order {
        let command = arena.get(index)?;
        match command.kind {
            CommandKind::Arc { center } => {
                arc::append(
                    ellipsoid,
                    params,
                    &center,
                    &command.from,
                    &command.to,
                    &mut out,
                    progress,
                )?;
            }
            CommandKind::Line | CommandKind::Connector => {
                out.push(command.to);
                progress.tick()?;
            }
        }
    }
    Ok(out)
}
