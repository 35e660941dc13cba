//! Builder for configuring and constructing a `MeterEngine`.

use crate::{MeterEngine, Result};
use levelscope_analysis::CorrelationConfig;
use levelscope_core::{
    AveragingDuration, BlockFifo, BlockProducer, DecayRate, Error as CoreError, HoldTimePreset,
    MeterConfig,
};

/// Building preallocates the transport for `block_size` × `channels`, so the
/// producer half can go straight to the audio callback.
///
/// # Example
///
/// ```
/// use levelscope::prelude::*;
///
/// let (producer, engine) = MeterEngine::builder()
///     .sample_rate(48000.0)
///     .block_size(480)
///     .decay_rate(DecayRate::Db24)
///     .hold_time(HoldTimePreset::Sec2)
///     .build()?;
///
/// assert_eq!(producer.capacity(), 5);
/// assert_eq!(engine.config().block_size, 480);
/// # Ok::<(), levelscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeterEngineBuilder {
    config: MeterConfig,
    correlation: CorrelationConfig,
}

impl MeterEngineBuilder {
    /// Replace every setting at once.
    pub fn config(mut self, config: MeterConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Largest block the audio callback will push. Default: 512
    pub fn block_size(mut self, frames: usize) -> Self {
        self.config.block_size = frames;
        self
    }

    /// Default: 2
    pub fn channels(mut self, channels: usize) -> Self {
        self.config.channels = channels;
        self
    }

    /// Default: 40
    pub fn refresh_hz(mut self, refresh_hz: f32) -> Self {
        self.config.refresh_hz = refresh_hz;
        self
    }

    /// Blocks buffered between the audio and display threads. Default: 5
    pub fn fifo_capacity(mut self, capacity: usize) -> Self {
        self.config.fifo_capacity = capacity;
        self
    }

    pub fn rms_threshold(mut self, threshold_db: f32) -> Self {
        self.config.rms_threshold_db = threshold_db;
        self
    }

    pub fn peak_threshold(mut self, threshold_db: f32) -> Self {
        self.config.peak_threshold_db = threshold_db;
        self
    }

    pub fn decay_rate(mut self, rate: DecayRate) -> Self {
        self.config.decay_rate = rate;
        self
    }

    pub fn hold_time(mut self, hold_time: HoldTimePreset) -> Self {
        self.config.hold_time = hold_time;
        self
    }

    pub fn averaging(mut self, duration: AveragingDuration) -> Self {
        self.config.averaging = duration;
        self
    }

    /// Correlation low-pass and window settings.
    pub fn correlation(mut self, config: CorrelationConfig) -> Self {
        self.correlation = config;
        self
    }

    pub fn build(self) -> Result<(BlockProducer, MeterEngine)> {
        self.config.validate()?;
        validate_correlation(&self.correlation, self.config.sample_rate)?;

        let mut fifo = BlockFifo::new(self.config.fifo_capacity);
        fifo.prepare(self.config.block_size, self.config.channels);
        let (producer, consumer) = fifo.split();

        tracing::debug!(
            "Meter engine built: {} Hz, {} frames x {} channels, refresh {} Hz",
            self.config.sample_rate,
            self.config.block_size,
            self.config.channels,
            self.config.refresh_hz
        );

        let engine = MeterEngine::from_parts(self.config, self.correlation, consumer);
        Ok((producer, engine))
    }
}

fn validate_correlation(config: &CorrelationConfig, sample_rate: f64) -> Result<()> {
    let nyquist = sample_rate / 2.0;
    if !(config.cutoff_hz > 0.0 && (config.cutoff_hz as f64) < nyquist) {
        return Err(CoreError::InvalidConfig(format!(
            "correlation cut-off {} Hz must lie in (0, {nyquist}) Hz",
            config.cutoff_hz
        ))
        .into());
    }
    if config.averaged_blocks == 0 {
        return Err(
            CoreError::InvalidConfig("averaged_blocks must be at least 1".to_string()).into(),
        );
    }
    Ok(())
}
