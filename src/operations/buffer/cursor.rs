use tracing::debug;

use super::params::BufferOptions;
use super::progress::ProgressTracker;
use crate::error::{OperationError, Result};
use crate::geodesy::Ellipsoid;
use crate::geometry::{Geometry, Polygon};
use crate::kernel::GeometryKernel;

/// Lazily buffers a sequence of geometries.
///
/// The i-th geometry uses `distances[i]`, and the last distance repeats for
/// any geometry past the end of the list. With
/// [`BufferOptions::union_results`] the cursor yields a single item: the
/// union of every buffered geometry.
pub struct BufferCursor<'a, I> {
    inputs: I,
    distances: Vec<f64>,
    index: usize,
    ellipsoid: Ellipsoid,
    options: BufferOptions,
    kernel: &'a dyn GeometryKernel,
    tracker: &'a mut dyn ProgressTracker,
    done: bool,
}

impl<'a, I> BufferCursor<'a, I>
where
    I: Iterator<Item = Geometry>,
{
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `distances` is empty.
    pub fn new(
        inputs: impl IntoIterator<IntoIter = I>,
        distances: Vec<f64>,
        kernel: &'a dyn GeometryKernel,
        tracker: &'a mut dyn ProgressTracker,
    ) -> Result<Self> {
        if distances.is_empty() {
            return Err(
                OperationError::InvalidInput("at least one buffer distance required".to_owned())
                    .into(),
            );
        }
        Ok(Self {
            inputs: inputs.into_iter(),
            distances,
            index: 0,
            ellipsoid: Ellipsoid::WGS84,
            options: BufferOptions::default(),
            kernel,
            tracker,
            done: false,
        })
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

    fn distance_for(&self, index: usize) -> f64 {
        let last = self.distances.len() - 1;
        self.distances[index.min(last)]
    }

    fn buffer_one(&mut self, geometry: &Geometry) -> Result<Polygon> {
        let distance = self.distance_for(self.index);
        self.index += 1;
        super::run(
            geometry,
            distance,
            &self.ellipsoid,
            &self.options,
            self.kernel,
            &mut *self.tracker,
        )
    }

    fn union_all(&mut self) -> Result<Polygon> {
        let mut parts = Vec::new();
        while let Some(geometry) = self.inputs.next() {
            parts.push(self.buffer_one(&geometry)?);
        }
        debug!(count = parts.len(), "merging buffered geometries");
        self.kernel.union_all(parts)
    }
}

impl<I> Iterator for BufferCursor<'_, I>
where
    I: Iterator<Item = Geometry>,
{
    type Item = Result<Polygon>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.options.union_results {
            self.done = true;
            return Some(self.union_all());
        }
        match self.inputs.next() {
            Some(geometry) => Some(self.buffer_one(&geometry)),
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<I> std::fmt::Debug for BufferCursor<'_, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferCursor")
            .field("distances", &self.distances)
            .field("index", &self.index)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::OverlayKernel;
    use crate::math::Point2;
    use crate::operations::buffer::progress::NoProgress;

    fn points() -> Vec<Geometry> {
        vec![
            Geometry::Point(Point2::new(0.0, 0.0)),
            Geometry::Point(Point2::new(1.0, 0.0)),
            Geometry::Point(Point2::new(2.0, 0.0)),
        ]
    }

    #[test]
    fn last_distance_repeats() {
        let kernel = OverlayKernel::new();
        let mut tracker = NoProgress;
        let results: Vec<Polygon> =
            BufferCursor::new(points(), vec![1000.0, 2000.0], &kernel, &mut tracker)
                .unwrap()
                .collect::<Result<_>>()
                .unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[1].area() > results[0].area());
        assert!((results[2].area() - results[1].area()).abs() < 1e-9);
    }

    #[test]
    fn union_yields_one_item() {
        let kernel = OverlayKernel::new();
        let mut tracker = NoProgress;
        let options = BufferOptions::default().with_union_results(true);
        let mut cursor = BufferCursor::new(points(), vec![100_000.0], &kernel, &mut tracker)
            .unwrap()
            .with_options(options);
        let merged = cursor.next().unwrap().unwrap();
        assert_eq!(merged.ring_count(), 1);
        assert!(cursor.next().is_none());
    }

    #[test]
    fn union_of_nothing_is_empty() {
        let kernel = OverlayKernel::new();
        let mut tracker = NoProgress;
        let options = BufferOptions::default().with_union_results(true);
        let mut cursor = BufferCursor::new(Vec::<Geometry>::new(), vec![10.0], &kernel, &mut tracker)
            .unwrap()
            .with_options(options);
        assert!(cursor.next().unwrap().unwrap().is_empty());
        assert!(cursor.next().is_none());
    }

    #[test]
    fn empty_distance_list_is_rejected() {
        let kernel = OverlayKernel::new();
        let mut tracker = NoProgress;
        assert!(BufferCursor::new(points(), Vec::new(), &kernel, &mut tracker).is_err());
    }
}
