//! Metering configuration and the preset choices offered by the UI.
//!
//! Preset ids start at 1 to match combo-box item ids; unknown ids fall back
//! to the default choice.

use crate::hold::{HoldTime, DEFAULT_TICK_HZ};
use crate::transport::DEFAULT_FIFO_CAPACITY;
use crate::{Error, Result};

/// Largest block the transport preallocates for.
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Release speed choices in dB per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum DecayRate {
    Db3,
    Db6,
    #[default]
    Db12,
    Db24,
    Db36,
}

impl DecayRate {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => DecayRate::Db3,
            2 => DecayRate::Db6,
            3 => DecayRate::Db12,
            4 => DecayRate::Db24,
            5 => DecayRate::Db36,
            _ => DecayRate::default(),
        }
    }

    pub fn db_per_second(&self) -> f32 {
        match self {
            DecayRate::Db3 => 3.0,
            DecayRate::Db6 => 6.0,
            DecayRate::Db12 => 12.0,
            DecayRate::Db24 => 24.0,
            DecayRate::Db36 => 36.0,
        }
    }
}

/// Peak hold choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum HoldTimePreset {
    Off,
    #[default]
    Ms500,
    Sec2,
    Sec4,
    Sec6,
    Infinite,
}

impl HoldTimePreset {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => HoldTimePreset::Off,
            2 => HoldTimePreset::Ms500,
            3 => HoldTimePreset::Sec2,
            4 => HoldTimePreset::Sec4,
            5 => HoldTimePreset::Sec6,
            6 => HoldTimePreset::Infinite,
            _ => HoldTimePreset::default(),
        }
    }

    pub fn hold_time(&self) -> HoldTime {
        match self {
            HoldTimePreset::Off => HoldTime::from_millis(0),
            HoldTimePreset::Ms500 => HoldTime::from_millis(500),
            HoldTimePreset::Sec2 => HoldTime::from_millis(2000),
            HoldTimePreset::Sec4 => HoldTime::from_millis(4000),
            HoldTimePreset::Sec6 => HoldTime::from_millis(6000),
            HoldTimePreset::Infinite => HoldTime::Infinite,
        }
    }
}

impl From<HoldTimePreset> for HoldTime {
    fn from(preset: HoldTimePreset) -> Self {
        preset.hold_time()
    }
}

/// Window of the running level average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum AveragingDuration {
    Ms100,
    Ms250,
    #[default]
    Ms500,
    Ms1000,
    Ms2000,
}

impl AveragingDuration {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => AveragingDuration::Ms100,
            2 => AveragingDuration::Ms250,
            3 => AveragingDuration::Ms500,
            4 => AveragingDuration::Ms1000,
            5 => AveragingDuration::Ms2000,
            _ => AveragingDuration::default(),
        }
    }

    pub fn millis(&self) -> u32 {
        match self {
            AveragingDuration::Ms100 => 100,
            AveragingDuration::Ms250 => 250,
            AveragingDuration::Ms500 => 500,
            AveragingDuration::Ms1000 => 1000,
            AveragingDuration::Ms2000 => 2000,
        }
    }

    /// Number of refresh ticks covering the duration (at least one).
    pub fn window_len(&self, refresh_hz: f32) -> usize {
        ((self.millis() as f32 * refresh_hz / 1000.0).round() as usize).max(1)
    }
}

/// Configuration for the metering engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct MeterConfig {
    pub sample_rate: f64,
    /// Frames per audio callback; the transport preallocates for this.
    pub block_size: usize,
    pub channels: usize,
    /// Display refresh rate. Hold ticks and averaging windows run at this rate.
    pub refresh_hz: f32,
    pub fifo_capacity: usize,
    pub rms_threshold_db: f32,
    pub peak_threshold_db: f32,
    pub decay_rate: DecayRate,
    pub hold_time: HoldTimePreset,
    pub averaging: AveragingDuration,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            block_size: 512,
            channels: 2,
            refresh_hz: DEFAULT_TICK_HZ,
            fifo_capacity: DEFAULT_FIFO_CAPACITY,
            rms_threshold_db: 0.0,
            peak_threshold_db: 0.0,
            decay_rate: DecayRate::default(),
            hold_time: HoldTimePreset::default(),
            averaging: AveragingDuration::default(),
        }
    }
}

impl MeterConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000.0..=384000.0).contains(&self.sample_rate) {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize(self.block_size));
        }
        if self.channels == 0 || self.channels > 2 {
            return Err(Error::InvalidChannelCount(self.channels));
        }
        if !(self.refresh_hz > 0.0 && self.refresh_hz <= 240.0) {
            return Err(Error::InvalidRefreshRate(self.refresh_hz));
        }
        if self.fifo_capacity == 0 {
            return Err(Error::InvalidConfig(
                "fifo_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
