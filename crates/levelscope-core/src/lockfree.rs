//! Shared scalars read by the UI while the refresh thread writes them.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cache-line aligned atomic f32, e.g. the live refresh rate.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

/// Cache-line aligned run/stop flag.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_refresh_rate_visible_across_threads() {
        let rate = Arc::new(AtomicFloat::new(40.0));
        let writer = Arc::clone(&rate);
        std::thread::spawn(move || writer.set(60.0))
            .join()
            .unwrap();
        assert_eq!(rate.get(), 60.0);
    }

    #[test]
    fn test_running_flag_clears() {
        let running = AtomicFlag::new(true);
        assert!(running.get());
        running.set(false);
        assert!(!running.get());
    }
}
