//! Test helpers and fixtures for levelscope integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (averages of identical values)
//! - `DB_EPSILON` (0.01): Level conversions
//! - `CORRELATION_EPSILON` (0.01): Correlation after filter settling

#![allow(dead_code)]

pub mod tolerances;

use levelscope::prelude::*;
use std::time::{Duration, Instant};

/// Matches the scenario the correlation defaults were tuned for.
pub const TEST_SAMPLE_RATE: f64 = 44100.0;

pub const TEST_BLOCK_SIZE: usize = 512;

/// Period of the default 40 Hz display refresh.
pub const TICK: Duration = Duration::from_millis(25);

/// Engine with the default 40 Hz refresh and a 512 frame stereo transport.
pub fn test_engine() -> (BlockProducer, MeterEngine) {
    MeterEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .block_size(TEST_BLOCK_SIZE)
        .build()
        .expect("Failed to create test engine")
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate white noise (random samples in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / u32::MAX as f32) * 4.0 - 1.0
        })
        .collect()
}

/// Stereo block of `left` with the right channel scaled by `right_gain`.
pub fn stereo_block(left: &[f32], right_gain: f32) -> AudioBlock {
    let right: Vec<f32> = left.iter().map(|s| s * right_gain).collect();
    AudioBlock::from_channels(&[left, &right[..]])
}

/// Stereo block filled with one value per channel.
pub fn constant_block(frames: usize, left: f32, right: f32) -> AudioBlock {
    AudioBlock::from_channels(&[&vec![left; frames][..], &vec![right; frames][..]])
}

/// `count` timestamps one display refresh apart, starting one tick after `start`.
pub fn ticks(start: Instant, count: u32) -> impl Iterator<Item = Instant> {
    (1..=count).map(move |i| start + TICK * i)
}
