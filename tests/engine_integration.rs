//! Engine integration tests
//!
//! Refresh pipeline, builder validation and the live refresh thread.
//!
//! Run with:
//! ```bash
//! cargo test -p levelscope --test engine_integration
//! ```

use levelscope::prelude::*;
use levelscope::{Error, NEGATIVE_INFINITY_DB};
use std::time::{Duration, Instant};

#[path = "helpers/mod.rs"]
mod helpers;
use helpers::*;

/// An empty transport returns false and leaves every reading alone.
#[test]
fn test_refresh_on_empty_transport() {
    let (mut producer, mut engine) = test_engine();
    let t0 = Instant::now();
    assert!(!engine.refresh(t0));
    assert_eq!(
        engine.stereo_meter(Scale::Rms).left().instant().level(),
        NEGATIVE_INFINITY_DB
    );

    producer.push(&constant_block(TEST_BLOCK_SIZE, 0.5, 0.25));
    assert!(engine.refresh(t0 + TICK));
    let before = engine.snapshot();

    assert!(!engine.refresh(t0 + TICK * 2));
    let after = engine.snapshot();
    assert_eq!(before.rms.left.level_db, after.rms.left.level_db);
    assert_eq!(before.peak.right.level_db, after.peak.right.level_db);
    assert_eq!(after.blocks_consumed, 1);
}

/// A block longer than the prepared size is metered on its leading frames.
#[test]
fn test_oversized_block_is_truncated_not_rejected() {
    let (mut producer, mut engine) = test_engine();
    producer.push(&constant_block(TEST_BLOCK_SIZE + 88, 0.5, 0.5));

    assert!(engine.refresh(Instant::now()));
    let peak = engine.stereo_meter(Scale::Peak).left().instant().level();
    assert!((peak - -6.02).abs() < 0.05, "peak {peak}");
    assert_eq!(engine.blocks_consumed(), 1);
}

/// RMS and peak of a known sine land on the right meters.
#[test]
fn test_sine_levels_reach_meters() {
    let (mut producer, mut engine) = test_engine();
    let sine: Vec<f32> = generate_sine(1000.0, TEST_SAMPLE_RATE, TEST_BLOCK_SIZE)
        .into_iter()
        .map(|s| s * 0.5)
        .collect();
    producer.push(&stereo_block(&sine, 1.0));
    engine.refresh(Instant::now());

    let snapshot = engine.snapshot();
    // 0.5 peak = -6.02 dB; RMS of a sine is 3 dB lower.
    assert!((snapshot.peak.left.level_db + 6.02).abs() < 0.1);
    assert!((snapshot.rms.left.level_db + 9.03).abs() < 0.1);
    assert_eq!(snapshot.rms.left.level_db, snapshot.rms.right.level_db);
}

/// Over-threshold flags follow the configured thresholds.
#[test]
fn test_threshold_flags() {
    let (mut producer, mut engine) = test_engine();
    engine.set_threshold(Scale::Peak, -12.0);
    producer.push(&constant_block(TEST_BLOCK_SIZE, 0.5, 0.01));
    engine.refresh(Instant::now());

    let peak = engine.snapshot().peak;
    assert!(peak.left.level_over_threshold);
    assert!(peak.left.readout_over_threshold);
    assert!(!peak.right.level_over_threshold);
    assert_eq!(peak.threshold_db, -12.0);
}

#[test]
fn test_builder_validation_errors() {
    let result = MeterEngine::builder().sample_rate(100.0).build();
    assert!(matches!(result, Err(Error::Core(_))));

    let result = MeterEngine::builder().refresh_hz(1000.0).build();
    assert!(matches!(result, Err(Error::Core(_))));
}

/// Mono sources are measured as dual mono.
#[test]
fn test_mono_engine() {
    let (mut producer, mut engine) = MeterEngine::builder()
        .channels(1)
        .block_size(256)
        .build()
        .expect("Failed to create mono engine");

    producer.push(&AudioBlock::from_channels(&[&[0.5; 256][..]]));
    engine.refresh(Instant::now());

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.peak.left.level_db, snapshot.peak.right.level_db);
    assert!(snapshot.correlation > 0.99);
    assert!(snapshot.goniometer.iter().all(|p| p.side == 0.0));
}

/// Views and presets show up in the snapshot.
#[test]
fn test_views_in_snapshot() {
    let (_producer, mut engine) = test_engine();
    engine.set_meter_view(MeterView::from_id(2));
    engine.set_histogram_view(HistogramView::Columns);
    engine.set_tick_visible(false);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.rms.view, MeterView::Peak);
    assert_eq!(snapshot.histogram_view, HistogramView::Columns);
    assert!(!snapshot.peak.ticks_visible);
}

/// The live thread refreshes on its own and applies commands.
#[test]
fn test_live_refresh_thread() {
    let (mut producer, engine) = MeterEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .block_size(TEST_BLOCK_SIZE)
        .refresh_hz(100.0)
        .build()
        .expect("Failed to create test engine");

    let meters = spawn_refresh_thread(engine)
        .expect("Failed to spawn refresh thread")
        .threshold(Scale::Rms, -20.0)
        .decay_rate(DecayRate::Db36);

    producer.push(&constant_block(TEST_BLOCK_SIZE, 0.5, 0.5));

    let deadline = Instant::now() + Duration::from_secs(2);
    while meters.snapshot().blocks_consumed == 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    let snapshot = meters.snapshot();
    assert_eq!(snapshot.blocks_consumed, 1);
    assert!((snapshot.peak.left.level_db + 6.02).abs() < 0.1);
    assert!(meters.is_running());
    assert_eq!(meters.refresh_hz(), 100.0);

    let engine = meters.stop().expect("refresh thread should join");
    assert_eq!(engine.stereo_meter(Scale::Rms).threshold(), -20.0);
    assert_eq!(engine.config().decay_rate, DecayRate::Db36);
}

/// Invalid commands are rejected without stopping the thread.
#[test]
fn test_live_rejects_bad_refresh_rate() {
    let (_producer, engine) = test_engine();
    let meters = spawn_refresh_thread(engine)
        .expect("Failed to spawn refresh thread")
        .refresh_rate(0.0)
        .refresh_rate(50.0);

    let deadline = Instant::now() + Duration::from_secs(2);
    while meters.refresh_hz() != 50.0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(meters.refresh_hz(), 50.0);
    assert!(meters.is_running());
    assert!(meters.send(MeterCommand::ResetHolds).is_ok());
}
