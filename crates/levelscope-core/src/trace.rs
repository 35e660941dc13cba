//! Fixed-size history ring for level plots.

/// Ring of the last `size` scalar samples.
///
/// The write index always points one past the newest sample, which is the
/// oldest one retained. Walk [`data`](TraceBuffer::data) from
/// [`read_index`](TraceBuffer::read_index), wrapping once, for chronological
/// order.
///
/// Not synchronised: it lives on the thread that drains the block transport.
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    buffer: Vec<f32>,
    write_index: usize,
}

impl TraceBuffer {
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize, fill: f32) -> Self {
        assert!(size > 0, "TraceBuffer size must be non-zero");
        Self {
            buffer: vec![fill; size],
            write_index: 0,
        }
    }

    /// Change the size, refilling every entry with `fill`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn resize(&mut self, size: usize, fill: f32) {
        assert!(size > 0, "TraceBuffer size must be non-zero");
        self.buffer.resize(size, fill);
        self.clear(fill);
    }

    pub fn clear(&mut self, fill: f32) {
        self.buffer.fill(fill);
        self.write_index = 0;
    }

    #[inline]
    pub fn write(&mut self, value: f32) {
        self.buffer[self.write_index] = value;
        self.write_index += 1;
        if self.write_index == self.buffer.len() {
            self.write_index = 0;
        }
    }

    /// Raw backing storage, not in chronological order.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.buffer
    }

    /// Index of the oldest retained sample.
    #[inline]
    pub fn read_index(&self) -> usize {
        self.write_index
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Samples oldest to newest.
    pub fn iter_chronological(&self) -> impl Iterator<Item = f32> + '_ {
        self.iter_from(self.write_index)
    }

    /// Every sample once, starting at `start` and wrapping.
    pub fn iter_from(&self, start: usize) -> impl Iterator<Item = f32> + '_ {
        let start = start % self.buffer.len();
        let (older, newer) = self.buffer.split_at(start);
        newer.iter().chain(older.iter()).copied()
    }
}
