/// Kahan compensated summation.
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum {
    sum: f64,
    compensation: f64,
}

impl KahanSum {
    /// Creates a summator starting at `start`.
    #[must_use]
    pub fn new(start: f64) -> Self {
        Self {
            sum: start,
            compensation: 0.0,
        }
    }

    /// Adds a term.
    pub fn add(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// Returns the compensated sum.
    #[must_use]
    pub fn result(&self) -> f64 {
        self.sum
    }
}
