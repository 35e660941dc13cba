//! Single bar meter with a decaying falling tick.

use levelscope_core::db::clamp_to_scale;
use levelscope_core::{HoldTime, ValueHolder, NEGATIVE_INFINITY_DB};
use std::time::Instant;

/// One bar with a threshold and a decaying falling tick.
#[derive(Debug, Clone)]
pub struct Meter {
    level: f32,
    threshold: f32,
    falling_tick: ValueHolder,
    tick_visible: bool,
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

impl Meter {
    pub fn new() -> Self {
        Self {
            level: NEGATIVE_INFINITY_DB,
            threshold: 0.0,
            falling_tick: ValueHolder::decaying(),
            tick_visible: true,
        }
    }

    pub fn update(&mut self, level_db: f32, now: Instant) {
        self.level = clamp_to_scale(level_db);
        self.falling_tick.update_held_value(self.level, now);
    }

    /// Advance the falling tick. Returns true if it moved.
    #[inline]
    pub fn tick(&mut self, now: Instant) -> bool {
        self.falling_tick.tick(now)
    }

    pub fn set_threshold(&mut self, threshold_db: f32) {
        self.threshold = threshold_db;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_decay_rate(&mut self, db_per_second: f32) {
        self.falling_tick.set_decay_rate(db_per_second);
    }

    pub fn set_hold_time(&mut self, hold_time: HoldTime) {
        self.falling_tick.set_hold_time(hold_time);
    }

    pub fn hold_time(&self) -> HoldTime {
        self.falling_tick.hold_time()
    }

    pub fn set_tick_rate(&mut self, tick_hz: f32) {
        self.falling_tick.set_tick_rate(tick_hz);
    }

    pub fn reset_value_holder(&mut self) {
        self.falling_tick.reset();
    }

    pub fn set_tick_visible(&mut self, visible: bool) {
        self.tick_visible = visible;
    }

    pub fn is_tick_visible(&self) -> bool {
        self.tick_visible
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_over_threshold(&self) -> bool {
        self.threshold <= self.level
    }

    /// Where the falling tick is drawn. With no hold time the tick simply
    /// follows the level.
    pub fn falling_tick_value(&self) -> f32 {
        if self.falling_tick.hold_time().is_zero() {
            self.level
        } else {
            self.falling_tick.current_value()
        }
    }

    pub fn falling_tick(&self) -> &ValueHolder {
        &self.falling_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_threshold_is_inclusive() {
        let mut meter = Meter::new();
        meter.set_threshold(-6.0);
        meter.update(-6.0, Instant::now());
        assert!(meter.is_over_threshold());
        meter.update(-6.5, Instant::now());
        assert!(!meter.is_over_threshold());
    }

    #[test]
    fn test_zero_hold_tick_follows_level() {
        let mut meter = Meter::new();
        meter.set_hold_time(HoldTime::from_millis(0));
        let t0 = Instant::now();
        meter.update(-3.0, t0);
        meter.update(-20.0, t0 + Duration::from_millis(25));
        assert_eq!(meter.falling_tick_value(), -20.0);
    }

    #[test]
    fn test_held_tick_stays_above_level() {
        let mut meter = Meter::new();
        meter.set_hold_time(HoldTime::from_millis(500));
        let t0 = Instant::now();
        meter.update(-3.0, t0);
        meter.update(-20.0, t0 + Duration::from_millis(25));
        meter.tick(t0 + Duration::from_millis(50));
        assert_eq!(meter.falling_tick_value(), -3.0);
        assert_eq!(meter.level(), -20.0);
    }

    #[test]
    fn test_reset_drops_tick_to_floor() {
        let mut meter = Meter::new();
        let t0 = Instant::now();
        meter.update(0.0, t0);
        meter.reset_value_holder();
        assert_eq!(meter.falling_tick().current_value(), NEGATIVE_INFINITY_DB);
    }
}
