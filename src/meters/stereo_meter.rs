//! Left/right pair of channel meters sharing one threshold and view.

use super::MacroMeter;
use levelscope_core::{AveragingDuration, HoldTime};
use std::time::Instant;

/// Which bars a stereo meter shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeterView {
    #[default]
    Both,
    Peak,
    Average,
}

impl MeterView {
    /// 1 = both, 2 = instant only, 3 = average only. Unknown ids keep both.
    pub fn from_id(id: u32) -> Self {
        match id {
            2 => MeterView::Peak,
            3 => MeterView::Average,
            _ => MeterView::Both,
        }
    }

    pub fn shows_instant(&self) -> bool {
        matches!(self, MeterView::Both | MeterView::Peak)
    }

    pub fn shows_average(&self) -> bool {
        matches!(self, MeterView::Both | MeterView::Average)
    }
}

/// Left and right [`MacroMeter`]s sharing all settings.
#[derive(Debug, Clone)]
pub struct StereoMeter {
    label: String,
    left: MacroMeter,
    right: MacroMeter,
    threshold: f32,
    view: MeterView,
}

impl StereoMeter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            left: MacroMeter::new(),
            right: MacroMeter::new(),
            threshold: 0.0,
            view: MeterView::default(),
        }
    }

    pub fn update(&mut self, left_db: f32, right_db: f32, now: Instant) {
        self.left.update(left_db, now);
        self.right.update(right_db, now);
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let left = self.left.tick(now);
        let right = self.right.tick(now);
        left || right
    }

    pub fn set_threshold(&mut self, threshold_db: f32) {
        self.threshold = threshold_db;
        self.left.set_threshold(threshold_db);
        self.right.set_threshold(threshold_db);
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_decay_rate(&mut self, db_per_second: f32) {
        self.left.set_decay_rate(db_per_second);
        self.right.set_decay_rate(db_per_second);
    }

    pub fn set_hold_time(&mut self, hold_time: impl Into<HoldTime>) {
        let hold_time = hold_time.into();
        self.left.set_hold_time(hold_time);
        self.right.set_hold_time(hold_time);
    }

    pub fn set_tick_rate(&mut self, tick_hz: f32) {
        self.left.set_tick_rate(tick_hz);
        self.right.set_tick_rate(tick_hz);
    }

    pub fn reset_value_holder(&mut self) {
        self.left.reset_value_holder();
        self.right.reset_value_holder();
    }

    pub fn resize_averager(&mut self, len: usize) {
        self.left.resize_averager(len);
        self.right.resize_averager(len);
    }

    pub fn set_averaging_duration(&mut self, duration: AveragingDuration) {
        self.left.set_averaging_duration(duration);
        self.right.set_averaging_duration(duration);
    }

    pub fn set_view(&mut self, view: MeterView) {
        self.view = view;
    }

    pub fn view(&self) -> MeterView {
        self.view
    }

    pub fn set_tick_visible(&mut self, visible: bool) {
        self.left.set_tick_visible(visible);
        self.right.set_tick_visible(visible);
    }

    /// True if either channel changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        let left = self.left.take_redraw();
        let right = self.right.take_redraw();
        left || right
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn left(&self) -> &MacroMeter {
        &self.left
    }

    pub fn right(&self) -> &MacroMeter {
        &self.right
    }
}
