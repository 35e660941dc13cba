//! Stereo phase correlation
//!
//! Per-sample normalized cross-correlation of the left and right channels:
//!
//! ```text
//! corr = lp(l * r) / sqrt(lp(l²) * lp(r²))
//! ```
//!
//! where `lp` is a short FIR low-pass. The result lies in `[-1, 1]`:
//! - 1.0 = mono (L and R identical)
//! - 0.0 = uncorrelated, or silence
//! - -1.0 = out of phase
//!
//! Each per-sample value feeds two running means: an instantaneous one over
//! one block and a slower one over several blocks.

use crate::filter::{design_fir_lowpass, FirFilter};
use levelscope_core::{AudioBlock, Averager};
use std::sync::Arc;

pub const DEFAULT_CUTOFF_HZ: f32 = 100.0;
pub const DEFAULT_FILTER_ORDER: usize = 2;
/// Averaged window length in blocks.
pub const DEFAULT_AVERAGED_BLOCKS: usize = 6;

/// Filter and window settings for [`CorrelationEstimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CorrelationConfig {
    pub cutoff_hz: f32,
    pub filter_order: usize,
    pub averaged_blocks: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            filter_order: DEFAULT_FILTER_ORDER,
            averaged_blocks: DEFAULT_AVERAGED_BLOCKS,
        }
    }
}

/// Low-pass-smoothed L/R correlation.
#[derive(Debug, Clone)]
pub struct CorrelationEstimator {
    config: CorrelationConfig,
    sample_rate: f64,
    product: FirFilter,
    left_power: FirFilter,
    right_power: FirFilter,
    instantaneous: Averager,
    averaged: Averager,
}

impl CorrelationEstimator {
    pub fn new(sample_rate: f64, block_size: usize) -> Self {
        Self::with_config(sample_rate, block_size, CorrelationConfig::default())
    }

    /// # Panics
    ///
    /// Panics if `block_size` or `config.averaged_blocks` is zero.
    pub fn with_config(sample_rate: f64, block_size: usize, config: CorrelationConfig) -> Self {
        let empty: Arc<[f32]> = Arc::from(Vec::new());
        let mut estimator = Self {
            config,
            sample_rate,
            product: FirFilter::new(empty.clone()),
            left_power: FirFilter::new(empty.clone()),
            right_power: FirFilter::new(empty),
            instantaneous: Averager::new(block_size, 0.0),
            averaged: Averager::new(block_size * config.averaged_blocks, 0.0),
        };
        estimator.prepare_filters(sample_rate);
        estimator
    }

    /// Design the low-pass for `sample_rate` and install it in all three
    /// filters, clearing their state.
    pub fn prepare_filters(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        let coefficients =
            design_fir_lowpass(self.config.cutoff_hz, sample_rate, self.config.filter_order);

        tracing::debug!(
            "Correlation filters designed: {} Hz cut-off, {} taps at {} Hz",
            self.config.cutoff_hz,
            coefficients.len(),
            sample_rate
        );

        self.product.set_coefficients(coefficients.clone());
        self.left_power.set_coefficients(coefficients.clone());
        self.right_power.set_coefficients(coefficients);
    }

    /// Resize both averaging windows for a new block size. History is lost.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is zero.
    pub fn set_block_size(&mut self, block_size: usize) {
        self.instantaneous.resize(block_size, 0.0);
        self.averaged
            .resize(block_size * self.config.averaged_blocks, 0.0);
    }

    /// Change the filter settings and redesign at the current sample rate.
    pub fn set_config(&mut self, config: CorrelationConfig) {
        let block_size = self.instantaneous.size();
        self.config = config;
        self.prepare_filters(self.sample_rate);
        self.averaged.resize(block_size * config.averaged_blocks, 0.0);
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Process every frame of `block`. Blocks without channels are ignored.
    pub fn update(&mut self, block: &AudioBlock) {
        if block.channels() == 0 {
            return;
        }

        for (l, r) in block.stereo_frames() {
            let num = self.product.process_sample(l * r);
            let den = (self.left_power.process_sample(l * l)
                * self.right_power.process_sample(r * r))
            .sqrt();

            let correlation = if den == 0.0 || !den.is_finite() {
                0.0
            } else {
                (num / den).clamp(-1.0, 1.0)
            };

            self.instantaneous.add(correlation);
            self.averaged.add(correlation);
        }
    }

    /// Mean over the last block's worth of samples.
    pub fn instantaneous(&self) -> f32 {
        self.instantaneous.average()
    }

    /// Mean over the last `averaged_blocks` blocks.
    pub fn averaged(&self) -> f32 {
        self.averaged.average()
    }

    pub fn reset(&mut self) {
        self.product.reset();
        self.left_power.reset();
        self.right_power.reset();
        self.instantaneous.clear(0.0);
        self.averaged.clear(0.0);
    }
}
