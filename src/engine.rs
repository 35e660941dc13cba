//! MeterEngine that drives every meter from the block transport

use crate::meters::{Histogram, HistogramView, MeterView, Scale, StereoImageMeter, StereoMeter};
use crate::snapshot::{MeterSnapshot, StereoMeterSnapshot};
use crate::Result;
use levelscope_analysis::{BlockLevels, CorrelationConfig};
use levelscope_core::{
    AudioBlock, AveragingDuration, BlockConsumer, DecayRate, HoldTimePreset, MeterConfig,
};
use std::time::Instant;

/// Display-side metering state.
///
/// Owns the consuming end of the block transport. Call
/// [`refresh`](Self::refresh) at `refresh_hz`; each call takes the newest
/// block (if any), feeds every meter, then ticks the hold state machines.
///
/// # Example
///
/// ```
/// use levelscope::prelude::*;
/// use std::time::Instant;
///
/// let (mut producer, mut engine) = MeterEngine::builder()
///     .sample_rate(48000.0)
///     .block_size(256)
///     .build()?;
///
/// // Audio thread
/// producer.push(&AudioBlock::new(2, 256));
///
/// // Display timer
/// assert!(engine.refresh(Instant::now()));
/// let snapshot = engine.snapshot();
/// assert_eq!(snapshot.rms.left.level_db, -48.0);
/// # Ok::<(), levelscope::Error>(())
/// ```
pub struct MeterEngine {
    config: MeterConfig,
    consumer: BlockConsumer,

    /// Latest block pulled from the transport
    incoming: AudioBlock,
    levels: BlockLevels,

    rms_meter: StereoMeter,
    peak_meter: StereoMeter,
    rms_histogram: Histogram,
    peak_histogram: Histogram,
    stereo_image: StereoImageMeter,

    blocks_consumed: u64,
}

impl MeterEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::MeterEngineBuilder {
        crate::MeterEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        config: MeterConfig,
        correlation: CorrelationConfig,
        consumer: BlockConsumer,
    ) -> Self {
        let mut engine = Self {
            incoming: AudioBlock::new(config.channels, config.block_size),
            levels: BlockLevels::default(),
            rms_meter: StereoMeter::new("RMS"),
            peak_meter: StereoMeter::new("Peak"),
            rms_histogram: Histogram::new("RMS"),
            peak_histogram: Histogram::new("Peak"),
            stereo_image: StereoImageMeter::with_correlation(
                config.sample_rate,
                config.block_size,
                config.channels,
                correlation,
            ),
            consumer,
            config,
            blocks_consumed: 0,
        };
        engine.apply_config();
        engine
    }

    fn apply_config(&mut self) {
        let config = self.config.clone();
        for meter in [&mut self.rms_meter, &mut self.peak_meter] {
            meter.set_tick_rate(config.refresh_hz);
            meter.set_decay_rate(config.decay_rate.db_per_second());
            meter.set_hold_time(config.hold_time);
            meter.set_averaging_duration(config.averaging);
        }
        self.set_threshold(Scale::Rms, config.rms_threshold_db);
        self.set_threshold(Scale::Peak, config.peak_threshold_db);
    }

    /// One display frame. Returns true if a new block was consumed.
    ///
    /// Hold state machines tick whether or not audio arrived, so ticks keep
    /// falling after the stream stops.
    pub fn refresh(&mut self, now: Instant) -> bool {
        let consumed = self.consumer.pull_latest(&mut self.incoming);

        if consumed {
            self.blocks_consumed += 1;
            self.levels = BlockLevels::measure(&self.incoming);
            let BlockLevels { left, right } = self.levels;

            self.rms_meter.update(left.rms_db, right.rms_db, now);
            self.peak_meter.update(left.peak_db, right.peak_db, now);
            self.rms_histogram.update(left.rms_db, right.rms_db);
            self.peak_histogram.update(left.peak_db, right.peak_db);
            self.stereo_image.update(&self.incoming);
        }

        self.rms_meter.tick(now);
        self.peak_meter.tick(now);
        consumed
    }

    /// Threshold of the stereo meter and histogram showing `scale`.
    pub fn set_threshold(&mut self, scale: Scale, threshold_db: f32) {
        match scale {
            Scale::Rms => {
                self.config.rms_threshold_db = threshold_db;
                self.rms_meter.set_threshold(threshold_db);
                self.rms_histogram.set_threshold(threshold_db);
            }
            Scale::Peak => {
                self.config.peak_threshold_db = threshold_db;
                self.peak_meter.set_threshold(threshold_db);
                self.peak_histogram.set_threshold(threshold_db);
            }
        }
    }

    pub fn set_decay_rate(&mut self, rate: DecayRate) {
        self.config.decay_rate = rate;
        self.rms_meter.set_decay_rate(rate.db_per_second());
        self.peak_meter.set_decay_rate(rate.db_per_second());
    }

    pub fn set_hold_time(&mut self, hold_time: HoldTimePreset) {
        self.config.hold_time = hold_time;
        self.rms_meter.set_hold_time(hold_time);
        self.peak_meter.set_hold_time(hold_time);
    }

    pub fn set_averaging_duration(&mut self, duration: AveragingDuration) {
        self.config.averaging = duration;
        self.rms_meter.set_averaging_duration(duration);
        self.peak_meter.set_averaging_duration(duration);
    }

    /// Change how often [`refresh`](Self::refresh) will be called. Decay
    /// increments and averaging windows are rescaled so their timing in
    /// seconds is unchanged.
    pub fn set_refresh_rate(&mut self, refresh_hz: f32) -> Result<()> {
        MeterConfig {
            refresh_hz,
            ..self.config.clone()
        }
        .validate()?;

        self.config.refresh_hz = refresh_hz;
        let averaging = self.config.averaging;
        for meter in [&mut self.rms_meter, &mut self.peak_meter] {
            meter.set_tick_rate(refresh_hz);
            meter.set_averaging_duration(averaging);
        }
        tracing::debug!("Meter refresh rate set to {} Hz", refresh_hz);
        Ok(())
    }

    /// Drop every falling tick to the floor.
    pub fn reset_holds(&mut self) {
        self.rms_meter.reset_value_holder();
        self.peak_meter.reset_value_holder();
    }

    pub fn set_meter_view(&mut self, view: MeterView) {
        self.rms_meter.set_view(view);
        self.peak_meter.set_view(view);
    }

    pub fn set_tick_visible(&mut self, visible: bool) {
        self.rms_meter.set_tick_visible(visible);
        self.peak_meter.set_tick_visible(visible);
    }

    pub fn set_histogram_view(&mut self, view: HistogramView) {
        self.rms_histogram.set_view(view);
        self.peak_histogram.set_view(view);
    }

    pub fn set_goniometer_scale(&mut self, percent: f32) {
        self.stereo_image.set_goniometer_scale(percent);
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    /// Levels of the last consumed block.
    pub fn levels(&self) -> &BlockLevels {
        &self.levels
    }

    pub fn stereo_meter(&self, scale: Scale) -> &StereoMeter {
        match scale {
            Scale::Rms => &self.rms_meter,
            Scale::Peak => &self.peak_meter,
        }
    }

    pub fn histogram(&self, scale: Scale) -> &Histogram {
        match scale {
            Scale::Rms => &self.rms_histogram,
            Scale::Peak => &self.peak_histogram,
        }
    }

    pub fn stereo_image(&self) -> &StereoImageMeter {
        &self.stereo_image
    }

    pub fn blocks_consumed(&self) -> u64 {
        self.blocks_consumed
    }

    /// Blocks the audio thread overwrote before they were displayed.
    pub fn blocks_overwritten(&self) -> u64 {
        self.consumer.overwritten()
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        let correlation = self.stereo_image.correlation();
        MeterSnapshot {
            rms: StereoMeterSnapshot::capture(&self.rms_meter),
            peak: StereoMeterSnapshot::capture(&self.peak_meter),
            rms_history: self.rms_histogram.ordered().collect(),
            peak_history: self.peak_histogram.ordered().collect(),
            histogram_view: self.rms_histogram.view(),
            correlation: correlation.instantaneous(),
            correlation_averaged: correlation.averaged(),
            width: self.stereo_image.width(),
            goniometer: self.stereo_image.goniometer().scaled_points().collect(),
            blocks_consumed: self.blocks_consumed,
            blocks_overwritten: self.consumer.overwritten(),
        }
    }
}

impl std::fmt::Debug for MeterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeterEngine")
            .field("config", &self.config)
            .field("blocks_consumed", &self.blocks_consumed)
            .finish_non_exhaustive()
    }
}
