//! Plain-data copies of the meter state for rendering on another thread.

use crate::meters::{HistogramView, MacroMeter, MeterView, StereoMeter};
use levelscope_analysis::GonioPoint;

/// One channel of a stereo meter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSnapshot {
    pub level_db: f32,
    pub falling_tick_db: f32,
    pub average_db: f32,
    pub average_falling_tick_db: f32,
    /// Numeric readout: the held peak while over threshold.
    pub readout_db: f32,
    pub readout_over_threshold: bool,
    pub level_over_threshold: bool,
    pub average_over_threshold: bool,
}

impl ChannelSnapshot {
    pub(crate) fn capture(meter: &MacroMeter) -> Self {
        Self {
            level_db: meter.instant().level(),
            falling_tick_db: meter.instant().falling_tick_value(),
            average_db: meter.average().level(),
            average_falling_tick_db: meter.average().falling_tick_value(),
            readout_db: meter.readout().display_value(),
            readout_over_threshold: meter.readout().is_over_threshold(),
            level_over_threshold: meter.instant().is_over_threshold(),
            average_over_threshold: meter.average().is_over_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StereoMeterSnapshot {
    pub left: ChannelSnapshot,
    pub right: ChannelSnapshot,
    pub threshold_db: f32,
    pub view: MeterView,
    pub ticks_visible: bool,
}

impl StereoMeterSnapshot {
    pub(crate) fn capture(meter: &StereoMeter) -> Self {
        Self {
            left: ChannelSnapshot::capture(meter.left()),
            right: ChannelSnapshot::capture(meter.right()),
            threshold_db: meter.threshold(),
            view: meter.view(),
            ticks_visible: meter.left().instant().is_tick_visible(),
        }
    }
}

/// Everything a frame of the metering UI draws.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterSnapshot {
    pub rms: StereoMeterSnapshot,
    pub peak: StereoMeterSnapshot,
    /// Histogram entries in drawing order.
    pub rms_history: Vec<f32>,
    pub peak_history: Vec<f32>,
    pub histogram_view: HistogramView,
    pub correlation: f32,
    pub correlation_averaged: f32,
    pub width: f32,
    /// Goniometer points, already zoomed.
    pub goniometer: Vec<GonioPoint>,
    pub blocks_consumed: u64,
    pub blocks_overwritten: u64,
}
