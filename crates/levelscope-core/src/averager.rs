//! Fixed-size running mean.

/// Running average over the last `size` values.
///
/// `add` is O(1): the overwritten value is subtracted from the running sum
/// and the new one added. The sum is accumulated in `f64` and recomputed from
/// the ring each time the write index wraps, so it cannot drift however long
/// the meter runs.
#[derive(Debug, Clone)]
pub struct Averager {
    container: Vec<f32>,
    write_index: usize,
    running_total: f64,
    average: f32,
}

impl Averager {
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize, initial_value: f32) -> Self {
        let mut averager = Self {
            container: Vec::new(),
            write_index: 0,
            running_total: 0.0,
            average: initial_value,
        };
        averager.resize(size, initial_value);
        averager
    }

    /// Reinitialise to `size` copies of `fill`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn resize(&mut self, size: usize, fill: f32) {
        assert!(size > 0, "Averager size must be non-zero");
        self.container.resize(size, fill);
        self.clear(fill);
    }

    /// Overwrite every entry with `fill`, keeping the size.
    pub fn clear(&mut self, fill: f32) {
        self.container.fill(fill);
        self.write_index = 0;
        self.resum();
    }

    #[inline]
    pub fn add(&mut self, value: f32) {
        let idx = self.write_index;
        self.running_total -= self.container[idx] as f64;
        self.container[idx] = value;
        self.running_total += value as f64;

        self.write_index = (idx + 1) % self.container.len();
        if self.write_index == 0 {
            self.resum();
        } else {
            self.compute_average();
        }
    }

    #[inline]
    pub fn average(&self) -> f32 {
        self.average
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.container.len()
    }

    /// Sum of the ring contents as currently tracked.
    #[inline]
    pub fn running_total(&self) -> f64 {
        self.running_total
    }

    fn resum(&mut self) {
        self.running_total = self.container.iter().map(|&v| v as f64).sum();
        self.compute_average();
    }

    #[inline]
    fn compute_average(&mut self) {
        self.average = (self.running_total / self.container.len() as f64) as f32;
    }
}
