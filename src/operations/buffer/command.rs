use crate::error::{OperationError, Result};
use crate::math::Point2;

/// What a buffer command draws between its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandKind {
    /// Offset copy of an input edge.
    Line,
    /// Geodesic arc around `center`, swept clockwise in azimuth.
    Arc { center: Point2 },
    /// Straight bridge through an input vertex at a concave corner.
    Connector,
}

/// One step of an offset ring, linked into a cycle by arena indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferCommand {
    pub from: Point2,
    pub to: Point2,
    pub kind: CommandKind,
    pub next: usize,
    pub prev: usize,
}

impl BufferCommand {
    /// `true` for commands that carry offset geometry (lines and arcs).
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self.kind, CommandKind::Line | CommandKind::Arc { .. })
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        matches!(self.kind, CommandKind::Line)
    }
}

/// Flat storage for the commands of one offset ring.
///
/// Commands are appended in ring order; [`close_cycle`](Self::close_cycle)
/// links the last back to the first. Cleanup splices the cycle by rewriting
/// `next`/`prev` only, so skipped commands stay in place.
#[derive(Debug, Clone, Default)]
pub struct CommandArena {
    commands: Vec<BufferCommand>,
}

impl CommandArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command linked after the previous one.
    pub fn push(&mut self, from: Point2, to: Point2, kind: CommandKind) -> usize {
        let index = self.commands.len();
        let prev = index.saturating_sub(1);
        if let Some(last) = self.commands.last_mut() {
            last.next = index;
        }
        self.commands.push(BufferCommand {
            from,
            to,
            kind,
            next: index,
            prev,
        });
        index
    }

    /// Links the last command back to the first.
    pub fn close_cycle(&mut self) {
        let Some(last) = self.commands.len().checked_sub(1) else {
            return;
        };
        self.commands[last].next = 0;
        self.commands[0].prev = last;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// # Errors
    ///
    /// Returns `OperationError::Internal` for an index outside the arena.
    pub fn get(&self, index: usize) -> Result<&BufferCommand> {
        self.commands.get(index).ok_or_else(|| broken_link(index))
    }

    /// # Errors
    ///
    /// Returns `OperationError::Internal` for an index outside the arena.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut BufferCommand> {
        self.commands.get_mut(index).ok_or_else(|| broken_link(index))
    }

    /// Indices reached by following `next` from `start` until the cycle
    /// returns to it.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Internal` if the links leave the arena or never
    /// come back to `start`.
    pub fn cycle_from(&self, start: usize) -> Result<Vec<usize>> {
        let mut order = Vec::new();
        let mut index = start;
        loop {
            order.push(index);
            index = self.get(index)?.next;
            if index == start {
                return Ok(order);
            }
            if order.len() > self.commands.len() {
                return Err(OperationError::Internal(
                    "buffer command links do not form a cycle".to_owned(),
                )
                .into());
            }
        }
    }
}

fn broken_link(index: usize) -> crate::error::GeodesicError {
    OperationError::Internal(format!("buffer command index {index} out of range")).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64) -> Point2 {
        Point2::new(x, 0.0)
    }

    #[test]
    fn push_links_in_order() {
        let mut arena = CommandArena::new();
        arena.push(p(0.0), p(1.0), CommandKind::Line);
        arena.push(p(1.0), p(2.0), CommandKind::Connector);
        arena.push(p(2.0), p(3.0), CommandKind::Line);
        arena.close_cycle();

        assert_eq!(arena.len(), 3);
        assert_eq!(arena.get(0).unwrap().next, 1);
        assert_eq!(arena.get(0).unwrap().prev, 2);
        assert_eq!(arena.get(2).unwrap().next, 0);
        assert_eq!(arena.get(2).unwrap().prev, 1);
        assert_eq!(arena.cycle_from(1).unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn single_command_cycles_to_itself() {
        let mut arena = CommandArena::new();
        arena.push(p(0.0), p(1.0), CommandKind::Line);
        arena.close_cycle();
        assert_eq!(arena.cycle_from(0).unwrap(), vec![0]);
    }

    #[test]
    fn splice_skips_commands() {
        let mut arena = CommandArena::new();
        for i in 0..4 {
            let x = f64::from(i);
            arena.push(p(x), p(x + 1.0), CommandKind::Line);
        }
        arena.close_cycle();
        arena.get_mut(0).unwrap().next = 2;
        arena.get_mut(2).unwrap().prev = 0;
        assert_eq!(arena.cycle_from(0).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn broken_links_are_internal_errors() {
        let mut arena = CommandArena::new();
        arena.push(p(0.0), p(1.0), CommandKind::Line);
        arena.push(p(1.0), p(2.0), CommandKind::Line);
        arena.close_cycle();
        arena.get_mut(1).unwrap().next = 1;
        assert!(arena.cycle_from(0).is_err());
        assert!(arena.get(7).is_err());
    }

    #[test]
    fn connection_kinds() {
        let line = BufferCommand {
            from: p(0.0),
            to: p(1.0),
            kind: CommandKind::Line,
            next: 0,
            prev: 0,
        };
        let arc = BufferCommand {
            kind: CommandKind::Arc { center: p(0.5) },
            ..line
        };
        let connector = BufferCommand {
            kind: CommandKind::Connector,
            ..line
        };
        assert!(line.is_connection() && line.is_line());
        assert!(arc.is_connection() && !arc.is_line());
        assert!(!connector.is_connection());
    }
}
