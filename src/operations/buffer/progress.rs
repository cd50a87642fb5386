use tracing::debug;

use crate::error::{OperationError, Result};

/// Number of emitted vertices between two polls of the tracker.
pub const POLL_INTERVAL: u64 = 1024;

/// Cooperative cancellation hook polled while a buffer is built.
///
/// Returning `false` aborts the operation with
/// [`OperationError::Cancelled`]. Any `FnMut() -> bool` closure is a tracker.
pub trait ProgressTracker {
    /// Returns `true` to keep going.
    fn progress(&mut self) -> bool;
}

impl<F> ProgressTracker for F
where
    F: FnMut() -> bool,
{
    fn progress(&mut self) -> bool {
        self()
    }
}

/// Tracker that never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressTracker for NoProgress {
    fn progress(&mut self) -> bool {
        true
    }
}

/// Vertex counter that polls a [`ProgressTracker`] every [`POLL_INTERVAL`]
/// ticks.
pub struct Progress<'a> {
    tracker: &'a mut dyn ProgressTracker,
    count: u64,
}

impl<'a> Progress<'a> {
    #[must_use]
    pub fn new(tracker: &'a mut dyn ProgressTracker) -> Self {
        Self { tracker, count: 0 }
    }

    /// Records one emitted vertex.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Cancelled` when the tracker asks to stop.
    pub fn tick(&mut self) -> Result<()> {
        self.count += 1;
        if self.count % POLL_INTERVAL == 0 && !self.tracker.progress() {
            debug!(vertices = self.count, "buffer cancelled by progress tracker");
            return Err(OperationError::Cancelled.into());
        }
        Ok(())
    }

    /// Vertices recorded so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl std::fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").field("count", &self.count).finish_non_exhaustive()
    }
}
