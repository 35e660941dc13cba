//! Peak hold and ballistic decay.
//!
//! A [`ValueHolder`] is fed levels as they arrive and ticked on a fixed-rate
//! timer. Once no new peak has arrived for the hold time, each tick applies
//! the policy:
//!
//! - [`HoldPolicy::Decaying`]: the level falls by `decay_per_tick * multiplier`
//!   and the multiplier grows by `acceleration`, so the fall speeds up like an
//!   analog needle. Reaching the floor resets the multiplier.
//! - [`HoldPolicy::Threshold`]: the held over-threshold peak drops straight
//!   back to the floor.
//!
//! Time is passed in by the caller, so the tick can share the loop that
//! drains the block transport.
//!
//! # Example
//!
//! ```
//! use levelscope_core::{HoldTime, ValueHolder};
//! use std::time::{Duration, Instant};
//!
//! let mut tick = ValueHolder::decaying();
//! tick.set_hold_time(HoldTime::from_millis(0));
//!
//! let start = Instant::now();
//! tick.update_held_value(-3.0, start);
//! tick.tick(start + Duration::from_millis(25));
//! assert!(tick.current_value() < -3.0);
//! ```

use crate::db::{clamp_to_scale, NEGATIVE_INFINITY_DB};
use core::time::Duration;
use std::time::Instant;

/// Tick rate the decay increment is computed for.
pub const DEFAULT_TICK_HZ: f32 = 40.0;

pub const DEFAULT_DECAY_RATE_DB_PER_SEC: f32 = 12.0;

/// Per-tick growth of the decay multiplier. Tuned by ear; exposed through
/// [`ValueHolder::set_decay_acceleration`] for calibration.
pub const DEFAULT_DECAY_ACCELERATION: f32 = 1.04;

pub const DEFAULT_HOLD_TIME_MS: u64 = 2000;

/// How long a peak stays put before the policy kicks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum HoldTime {
    Finite(Duration),
    /// Never release; only [`ValueHolder::reset`] clears the peak.
    Infinite,
}

impl HoldTime {
    pub fn from_millis(ms: u64) -> Self {
        HoldTime::Finite(Duration::from_millis(ms))
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, HoldTime::Finite(d) if d.is_zero())
    }

    /// True once strictly more than the hold time has passed.
    #[inline]
    pub fn has_elapsed(&self, since_peak: Duration) -> bool {
        match self {
            HoldTime::Finite(hold) => since_peak > *hold,
            HoldTime::Infinite => false,
        }
    }
}

impl Default for HoldTime {
    fn default() -> Self {
        HoldTime::from_millis(DEFAULT_HOLD_TIME_MS)
    }
}

/// What a tick past the hold time does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldPolicy {
    Decaying {
        /// dB per second the decay was configured with.
        decay_rate: f32,
        /// `decay_rate / tick_hz`.
        decay_per_tick: f32,
        multiplier: f32,
        acceleration: f32,
    },
    Threshold {
        threshold: f32,
    },
}

/// Peak/hold state machine with a pluggable release policy.
#[derive(Debug, Clone)]
pub struct ValueHolder {
    current: f32,
    held: f32,
    peak_time: Option<Instant>,
    hold_time: HoldTime,
    tick_hz: f32,
    policy: HoldPolicy,
}

impl ValueHolder {
    fn with_policy(policy: HoldPolicy) -> Self {
        Self {
            current: NEGATIVE_INFINITY_DB,
            held: NEGATIVE_INFINITY_DB,
            peak_time: None,
            hold_time: HoldTime::default(),
            tick_hz: DEFAULT_TICK_HZ,
            policy,
        }
    }

    /// Falling-tick holder decaying at the default 12 dB/s.
    pub fn decaying() -> Self {
        let mut holder = Self::with_policy(HoldPolicy::Decaying {
            decay_rate: 0.0,
            decay_per_tick: 0.0,
            multiplier: 1.0,
            acceleration: DEFAULT_DECAY_ACCELERATION,
        });
        holder.set_decay_rate(DEFAULT_DECAY_RATE_DB_PER_SEC);
        holder
    }

    /// Over-threshold readout holder.
    pub fn threshold(threshold_db: f32) -> Self {
        Self::with_policy(HoldPolicy::Threshold {
            threshold: threshold_db,
        })
    }

    /// Feed a new level.
    pub fn update_held_value(&mut self, input: f32, now: Instant) {
        match &mut self.policy {
            HoldPolicy::Decaying { multiplier, .. } => {
                if input > self.current {
                    self.current = clamp_to_scale(input);
                    self.held = self.current;
                    self.peak_time = Some(now);
                    *multiplier = 1.0;
                }
            }
            HoldPolicy::Threshold { threshold } => {
                self.current = clamp_to_scale(input);
                if self.current > *threshold {
                    self.peak_time = Some(now);
                    if self.current > self.held {
                        self.held = self.current;
                    }
                }
            }
        }
    }

    /// Timer callback. Returns true if the hold time had elapsed and the
    /// policy ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let elapsed = match self.peak_time {
            Some(peak) => self
                .hold_time
                .has_elapsed(now.saturating_duration_since(peak)),
            // Nothing held yet: only an infinite hold keeps the state frozen.
            None => self.hold_time != HoldTime::Infinite,
        };
        if !elapsed {
            return false;
        }

        match &mut self.policy {
            HoldPolicy::Decaying {
                decay_per_tick,
                multiplier,
                acceleration,
                ..
            } => {
                self.current = clamp_to_scale(self.current - *decay_per_tick * *multiplier);
                *multiplier *= *acceleration;
                if self.current <= NEGATIVE_INFINITY_DB {
                    *multiplier = 1.0;
                }
            }
            HoldPolicy::Threshold { .. } => {
                self.held = NEGATIVE_INFINITY_DB;
            }
        }
        true
    }

    /// Set the release speed in dB per second. Ignored by threshold holders.
    pub fn set_decay_rate(&mut self, db_per_second: f32) {
        let tick_hz = self.tick_hz;
        if let HoldPolicy::Decaying {
            decay_rate,
            decay_per_tick,
            ..
        } = &mut self.policy
        {
            *decay_rate = db_per_second;
            *decay_per_tick = db_per_second / tick_hz;
        }
    }

    pub fn decay_rate(&self) -> Option<f32> {
        match self.policy {
            HoldPolicy::Decaying { decay_rate, .. } => Some(decay_rate),
            HoldPolicy::Threshold { .. } => None,
        }
    }

    /// Growth factor applied to the decay multiplier each tick.
    pub fn set_decay_acceleration(&mut self, factor: f32) {
        if let HoldPolicy::Decaying { acceleration, .. } = &mut self.policy {
            *acceleration = factor;
        }
    }

    pub fn decay_multiplier(&self) -> f32 {
        match self.policy {
            HoldPolicy::Decaying { multiplier, .. } => multiplier,
            HoldPolicy::Threshold { .. } => 1.0,
        }
    }

    /// Frequency `tick` is called at. Recomputes the per-tick decay.
    pub fn set_tick_rate(&mut self, tick_hz: f32) {
        debug_assert!(tick_hz > 0.0, "tick rate must be positive");
        self.tick_hz = tick_hz;
        if let Some(rate) = self.decay_rate() {
            self.set_decay_rate(rate);
        }
    }

    pub fn tick_rate(&self) -> f32 {
        self.tick_hz
    }

    pub fn set_hold_time(&mut self, hold_time: HoldTime) {
        self.hold_time = hold_time;
    }

    pub fn hold_time(&self) -> HoldTime {
        self.hold_time
    }

    pub fn set_threshold(&mut self, threshold_db: f32) {
        if let HoldPolicy::Threshold { threshold } = &mut self.policy {
            *threshold = threshold_db;
        }
    }

    pub fn threshold_db(&self) -> Option<f32> {
        match self.policy {
            HoldPolicy::Threshold { threshold } => Some(threshold),
            HoldPolicy::Decaying { .. } => None,
        }
    }

    /// Over-threshold state of the last input. Always false for decaying holders.
    pub fn is_over_threshold(&self) -> bool {
        match self.policy {
            HoldPolicy::Threshold { threshold } => self.current > threshold,
            HoldPolicy::Decaying { .. } => false,
        }
    }

    /// Value a readout should show: the held peak while over threshold,
    /// the current level otherwise.
    pub fn display_value(&self) -> f32 {
        if self.is_over_threshold() {
            self.held
        } else {
            self.current
        }
    }

    /// Clear the peak immediately.
    pub fn reset(&mut self) {
        self.current = NEGATIVE_INFINITY_DB;
        self.held = NEGATIVE_INFINITY_DB;
        if let HoldPolicy::Decaying { multiplier, .. } = &mut self.policy {
            *multiplier = 1.0;
        }
    }

    #[inline]
    pub fn current_value(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn held_value(&self) -> f32 {
        self.held
    }

    pub fn policy(&self) -> &HoldPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TICK: Duration = Duration::from_millis(25);

    #[test]
    fn test_decaying_starts_at_floor() {
        let holder = ValueHolder::decaying();
        assert_eq!(holder.current_value(), NEGATIVE_INFINITY_DB);
        assert_eq!(holder.decay_rate(), Some(12.0));
        assert_eq!(holder.hold_time(), HoldTime::from_millis(2000));
    }

    #[test]
    fn test_lower_input_does_not_replace_peak() {
        let now = Instant::now();
        let mut holder = ValueHolder::decaying();
        holder.update_held_value(-3.0, now);
        holder.update_held_value(-6.0, now);
        assert_eq!(holder.current_value(), -3.0);
        assert_eq!(holder.held_value(), -3.0);
    }

    #[test]
    fn test_input_clamped_to_scale() {
        let now = Instant::now();
        let mut holder = ValueHolder::decaying();
        holder.update_held_value(20.0, now);
        assert_eq!(holder.current_value(), 6.0);
    }

    #[test]
    fn test_hold_time_delays_decay() {
        let start = Instant::now();
        let mut holder = ValueHolder::decaying();
        holder.set_hold_time(HoldTime::from_millis(500));
        holder.update_held_value(-3.0, start);

        assert!(!holder.tick(start + Duration::from_millis(500)));
        assert_eq!(holder.current_value(), -3.0);

        assert!(holder.tick(start + Duration::from_millis(525)));
        assert_relative_eq!(holder.current_value(), -3.3, epsilon = 1e-5);
    }

    #[test]
    fn test_decay_accelerates() {
        let start = Instant::now();
        let mut holder = ValueHolder::decaying();
        holder.set_hold_time(HoldTime::from_millis(0));
        holder.update_held_value(0.0, start);

        let mut now = start;
        let mut previous = holder.current_value();
        let mut last_step = 0.0;
        for _ in 0..10 {
            now += TICK;
            holder.tick(now);
            let step = previous - holder.current_value();
            assert!(step > last_step);
            last_step = step;
            previous = holder.current_value();
        }
        // 0.3 dB * (1 + 1.04 + ... + 1.04^9)
        let expected: f32 = (0..10).map(|i| 0.3 * 1.04f32.powi(i)).sum();
        assert_relative_eq!(holder.current_value(), -expected, epsilon = 1e-4);
    }

    #[test]
    fn test_floor_resets_multiplier() {
        let start = Instant::now();
        let mut holder = ValueHolder::decaying();
        holder.set_hold_time(HoldTime::from_millis(0));
        holder.set_decay_rate(400.0);
        holder.update_held_value(0.0, start);

        let mut now = start;
        while holder.current_value() > NEGATIVE_INFINITY_DB {
            now += TICK;
            holder.tick(now);
        }
        assert_eq!(holder.decay_multiplier(), 1.0);
    }

    #[test]
    fn test_new_peak_resets_multiplier() {
        let start = Instant::now();
        let mut holder = ValueHolder::decaying();
        holder.set_hold_time(HoldTime::from_millis(0));
        holder.update_held_value(0.0, start);
        holder.tick(start + TICK);
        holder.tick(start + TICK * 2);
        assert!(holder.decay_multiplier() > 1.0);

        holder.update_held_value(3.0, start + TICK * 3);
        assert_eq!(holder.decay_multiplier(), 1.0);
        assert_eq!(holder.current_value(), 3.0);
    }

    #[test]
    fn test_infinite_hold_never_decays() {
        let start = Instant::now();
        let mut holder = ValueHolder::decaying();
        holder.set_hold_time(HoldTime::Infinite);
        holder.update_held_value(-10.0, start);
        for i in 1..1000 {
            assert!(!holder.tick(start + TICK * i));
        }
        assert_eq!(holder.current_value(), -10.0);

        holder.reset();
        assert_eq!(holder.current_value(), NEGATIVE_INFINITY_DB);
    }

    #[test]
    fn test_tick_rate_rescales_decay() {
        let mut holder = ValueHolder::decaying();
        holder.set_tick_rate(30.0);
        match *holder.policy() {
            HoldPolicy::Decaying { decay_per_tick, .. } => {
                assert_relative_eq!(decay_per_tick, 0.4)
            }
            HoldPolicy::Threshold { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_threshold_tracks_over_state() {
        let now = Instant::now();
        let mut holder = ValueHolder::threshold(-6.0);
        holder.update_held_value(-10.0, now);
        assert!(!holder.is_over_threshold());
        assert_eq!(holder.display_value(), -10.0);

        holder.update_held_value(-2.0, now);
        holder.update_held_value(-4.0, now);
        assert!(holder.is_over_threshold());
        assert_eq!(holder.held_value(), -2.0);
        assert_eq!(holder.display_value(), -2.0);

        holder.update_held_value(-20.0, now);
        assert!(!holder.is_over_threshold());
        assert_eq!(holder.display_value(), -20.0);
    }

    #[test]
    fn test_threshold_held_resets_after_hold() {
        let start = Instant::now();
        let mut holder = ValueHolder::threshold(0.0);
        holder.set_hold_time(HoldTime::from_millis(500));
        holder.update_held_value(3.0, start);
        holder.update_held_value(-10.0, start + TICK);

        assert!(!holder.tick(start + Duration::from_millis(400)));
        assert_eq!(holder.held_value(), 3.0);

        assert!(holder.tick(start + Duration::from_millis(501)));
        assert_eq!(holder.held_value(), NEGATIVE_INFINITY_DB);
        assert_eq!(holder.current_value(), -10.0);
    }

    #[test]
    fn test_decay_rate_ignored_for_threshold() {
        let mut holder = ValueHolder::threshold(0.0);
        holder.set_decay_rate(36.0);
        assert_eq!(holder.decay_rate(), None);
        assert_eq!(holder.threshold_db(), Some(0.0));
    }
}
