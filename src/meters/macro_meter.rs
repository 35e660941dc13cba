//! Per-channel meter: text readout plus instant and average bars.

use super::Meter;
use levelscope_core::hold::DEFAULT_TICK_HZ;
use levelscope_core::{AveragingDuration, Averager, HoldTime, ValueHolder, NEGATIVE_INFINITY_DB};
use std::time::Instant;

/// 500 ms at the default 40 Hz refresh.
pub const DEFAULT_AVERAGER_LEN: usize = 20;

/// One channel of a stereo meter: a numeric readout, an instant bar and a
/// bar showing the running average.
#[derive(Debug, Clone)]
pub struct MacroMeter {
    averager: Averager,
    readout: ValueHolder,
    instant: Meter,
    average: Meter,
    refresh_hz: f32,
    needs_redraw: bool,
}

impl Default for MacroMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroMeter {
    pub fn new() -> Self {
        Self {
            averager: Averager::new(DEFAULT_AVERAGER_LEN, NEGATIVE_INFINITY_DB),
            readout: ValueHolder::threshold(0.0),
            instant: Meter::new(),
            average: Meter::new(),
            refresh_hz: DEFAULT_TICK_HZ,
            needs_redraw: false,
        }
    }

    pub fn update(&mut self, level_db: f32, now: Instant) {
        self.averager.add(level_db);
        self.readout.update_held_value(level_db, now);
        self.instant.update(level_db, now);
        self.average.update(self.averager.average(), now);
        self.needs_redraw = true;
    }

    /// Advance every hold state machine. Returns true if anything moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut moved = self.readout.tick(now);
        moved |= self.instant.tick(now);
        moved |= self.average.tick(now);
        self.needs_redraw |= moved;
        moved
    }

    pub fn set_threshold(&mut self, threshold_db: f32) {
        self.readout.set_threshold(threshold_db);
        self.instant.set_threshold(threshold_db);
        self.average.set_threshold(threshold_db);
    }

    pub fn set_decay_rate(&mut self, db_per_second: f32) {
        self.instant.set_decay_rate(db_per_second);
        self.average.set_decay_rate(db_per_second);
    }

    /// Hold time of the falling ticks. The readout keeps its own hold.
    pub fn set_hold_time(&mut self, hold_time: HoldTime) {
        self.instant.set_hold_time(hold_time);
        self.average.set_hold_time(hold_time);
    }

    /// Rate [`tick`](Self::tick) is called at. Averaging windows given as a
    /// duration are sized against it.
    pub fn set_tick_rate(&mut self, tick_hz: f32) {
        self.refresh_hz = tick_hz;
        self.readout.set_tick_rate(tick_hz);
        self.instant.set_tick_rate(tick_hz);
        self.average.set_tick_rate(tick_hz);
    }

    pub fn reset_value_holder(&mut self) {
        self.instant.reset_value_holder();
        self.average.reset_value_holder();
        self.needs_redraw = true;
    }

    /// Change the averaging window to `len` refreshes, seeding it with the
    /// current average so the bar does not jump.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn resize_averager(&mut self, len: usize) {
        let fill = self.averager.average();
        self.averager.resize(len, fill);
    }

    pub fn set_averaging_duration(&mut self, duration: AveragingDuration) {
        self.resize_averager(duration.window_len(self.refresh_hz));
    }

    pub fn set_tick_visible(&mut self, visible: bool) {
        self.instant.set_tick_visible(visible);
        self.average.set_tick_visible(visible);
    }

    /// Clears the redraw flag, returning whether it was set.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn instant(&self) -> &Meter {
        &self.instant
    }

    pub fn average(&self) -> &Meter {
        &self.average
    }

    pub fn readout(&self) -> &ValueHolder {
        &self.readout
    }

    pub fn averager(&self) -> &Averager {
        &self.averager
    }
}
