//! Scrolling level history.

use levelscope_core::{TraceBuffer, NEGATIVE_INFINITY_DB};

/// One history entry per refresh.
pub const HISTOGRAM_SIZE: usize = 776;

/// Layout of the RMS and peak histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramView {
    /// Stacked; each plot starts at the oldest entry.
    #[default]
    Rows,
    /// Side by side; each plot starts half a buffer later.
    Columns,
}

impl HistogramView {
    pub fn from_id(id: u32) -> Self {
        match id {
            2 => HistogramView::Columns,
            _ => HistogramView::Rows,
        }
    }
}

/// Scrolling level history of the L/R mean.
#[derive(Debug, Clone)]
pub struct Histogram {
    label: String,
    buffer: TraceBuffer,
    threshold: f32,
    view: HistogramView,
}

impl Histogram {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            buffer: TraceBuffer::new(HISTOGRAM_SIZE, NEGATIVE_INFINITY_DB),
            threshold: 0.0,
            view: HistogramView::default(),
        }
    }

    pub fn update(&mut self, left_db: f32, right_db: f32) {
        self.buffer.write((left_db + right_db) / 2.0);
    }

    pub fn set_threshold(&mut self, threshold_db: f32) {
        self.threshold = threshold_db;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_view(&mut self, view: HistogramView) {
        self.view = view;
    }

    pub fn view(&self) -> HistogramView {
        self.view
    }

    pub fn clear(&mut self) {
        self.buffer.clear(NEGATIVE_INFINITY_DB);
    }

    /// Index the plot starts drawing from for the current view.
    pub fn start_index(&self) -> usize {
        let size = self.buffer.size();
        match self.view {
            HistogramView::Rows => self.buffer.read_index(),
            HistogramView::Columns => (self.buffer.read_index() + size / 2) % size,
        }
    }

    /// Every entry in drawing order.
    pub fn ordered(&self) -> impl Iterator<Item = f32> + '_ {
        self.buffer.iter_from(self.start_index())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn trace(&self) -> &TraceBuffer {
        &self.buffer
    }
}
