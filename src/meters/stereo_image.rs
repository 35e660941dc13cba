//! Goniometer and correlation for one stereo stream.

use levelscope_analysis::{CorrelationConfig, CorrelationEstimator, Goniometer};
use levelscope_core::AudioBlock;

/// Goniometer plus correlation meter.
#[derive(Debug, Clone)]
pub struct StereoImageMeter {
    goniometer: Goniometer,
    correlation: CorrelationEstimator,
}

impl StereoImageMeter {
    pub fn new(sample_rate: f64, block_size: usize, channels: usize) -> Self {
        Self::with_correlation(sample_rate, block_size, channels, CorrelationConfig::default())
    }

    pub fn with_correlation(
        sample_rate: f64,
        block_size: usize,
        channels: usize,
        config: CorrelationConfig,
    ) -> Self {
        Self {
            goniometer: Goniometer::new(channels, block_size),
            correlation: CorrelationEstimator::with_config(sample_rate, block_size, config),
        }
    }

    pub fn update(&mut self, block: &AudioBlock) {
        self.goniometer.update(block);
        self.correlation.update(block);
    }

    /// Goniometer zoom from a 50..200 % rotary.
    pub fn set_goniometer_scale(&mut self, percent: f32) {
        self.goniometer.set_scale(percent);
    }

    /// 0 = mono, 1 = uncorrelated, 2 = fully out of phase.
    pub fn width(&self) -> f32 {
        (1.0 - self.correlation.averaged()).clamp(0.0, 2.0)
    }

    pub fn reset(&mut self) {
        self.goniometer.clear();
        self.correlation.reset();
    }

    pub fn goniometer(&self) -> &Goniometer {
        &self.goniometer
    }

    pub fn correlation(&self) -> &CorrelationEstimator {
        &self.correlation
    }
}
