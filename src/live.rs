//! Live metering on a background refresh thread.
//!
//! The thread owns the [`MeterEngine`], refreshes it at the configured rate
//! and publishes a [`MeterSnapshot`] via `ArcSwap` after every frame, for
//! lock-free reads from the UI thread. Settings changes arrive as
//! [`MeterCommand`]s over a channel so the engine never needs a lock.

use crate::handle::MeterHandle;
use crate::meters::{HistogramView, MeterView, Scale};
use crate::snapshot::MeterSnapshot;
use crate::{Error, MeterEngine, Result};
use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use levelscope_core::{AtomicFlag, AtomicFloat, AveragingDuration, DecayRate, HoldTimePreset};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A settings change for the refresh thread to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeterCommand {
    SetThreshold { scale: Scale, threshold_db: f32 },
    SetDecayRate(DecayRate),
    SetHoldTime(HoldTimePreset),
    SetAveraging(AveragingDuration),
    SetRefreshRate(f32),
    SetMeterView(MeterView),
    SetTickVisible(bool),
    SetHistogramView(HistogramView),
    SetGoniometerScale(f32),
    ResetHolds,
}

impl MeterCommand {
    pub fn apply(self, engine: &mut MeterEngine) -> Result<()> {
        match self {
            MeterCommand::SetThreshold {
                scale,
                threshold_db,
            } => engine.set_threshold(scale, threshold_db),
            MeterCommand::SetDecayRate(rate) => engine.set_decay_rate(rate),
            MeterCommand::SetHoldTime(hold) => engine.set_hold_time(hold),
            MeterCommand::SetAveraging(duration) => engine.set_averaging_duration(duration),
            MeterCommand::SetRefreshRate(hz) => engine.set_refresh_rate(hz)?,
            MeterCommand::SetMeterView(view) => engine.set_meter_view(view),
            MeterCommand::SetTickVisible(visible) => engine.set_tick_visible(visible),
            MeterCommand::SetHistogramView(view) => engine.set_histogram_view(view),
            MeterCommand::SetGoniometerScale(percent) => engine.set_goniometer_scale(percent),
            MeterCommand::ResetHolds => engine.reset_holds(),
        }
        Ok(())
    }
}

/// Shared state between the refresh thread and [`MeterHandle`].
///
/// All fields are lock-free for reads from any thread.
pub struct LiveMeterState {
    /// Latest published frame.
    pub snapshot: ArcSwap<MeterSnapshot>,
    refresh_hz: AtomicFloat,
    running: AtomicFlag,
}

impl LiveMeterState {
    pub fn new(initial: MeterSnapshot, refresh_hz: f32) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(initial),
            refresh_hz: AtomicFloat::new(refresh_hz),
            running: AtomicFlag::new(true),
        }
    }

    /// Signal the refresh thread to stop.
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Rate the thread is currently refreshing at.
    pub fn refresh_hz(&self) -> f32 {
        self.refresh_hz.get()
    }
}

fn frame_period(refresh_hz: f32) -> Duration {
    Duration::from_secs_f32(1.0 / refresh_hz)
}

/// Run the refresh loop.
///
/// Between frames the thread waits on `commands`, so settings changes are
/// applied as they arrive rather than on the next frame. A due frame always
/// runs before the next queued command, so a command backlog cannot starve
/// refresh. Returns the engine once `state.stop()` is called or every command
/// sender is dropped.
pub fn run_refresh_thread(
    mut engine: MeterEngine,
    commands: Receiver<MeterCommand>,
    state: Arc<LiveMeterState>,
) -> MeterEngine {
    tracing::debug!(
        "Refresh thread started at {} Hz",
        engine.config().refresh_hz
    );

    let mut next_frame = Instant::now();

    while state.is_running() {
        let now = Instant::now();
        if now >= next_frame {
            engine.refresh(now);
            state.snapshot.store(Arc::new(engine.snapshot()));

            next_frame += frame_period(engine.config().refresh_hz);
            // Fell behind: skip the missed frames instead of bursting.
            if next_frame < now {
                next_frame = now + frame_period(engine.config().refresh_hz);
            }
            continue;
        }

        match commands.recv_deadline(next_frame) {
            Ok(command) => {
                if let Err(e) = command.apply(&mut engine) {
                    tracing::warn!("Ignoring meter command {:?}: {}", command, e);
                }
                state.refresh_hz.set(engine.config().refresh_hz);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    state.stop();
    tracing::debug!("Refresh thread stopped");
    engine
}

/// Move `engine` onto a background thread refreshing at its configured rate.
pub fn spawn_refresh_thread(engine: MeterEngine) -> Result<MeterHandle> {
    let (sender, receiver) = crossbeam_channel::unbounded();
    let state = Arc::new(LiveMeterState::new(
        engine.snapshot(),
        engine.config().refresh_hz,
    ));

    let thread_state = Arc::clone(&state);
    let join = std::thread::Builder::new()
        .name("levelscope-refresh".to_string())
        .spawn(move || run_refresh_thread(engine, receiver, thread_state))
        .map_err(Error::ThreadSpawn)?;

    Ok(MeterHandle::new(sender, state, join))
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelscope_core::AudioBlock;

    fn engine() -> (levelscope_core::BlockProducer, MeterEngine) {
        MeterEngine::builder()
            .block_size(256)
            .refresh_hz(200.0)
            .build()
            .expect("valid engine config")
    }

    #[test]
    fn test_command_apply_forwards() {
        let (_producer, mut engine) = engine();
        let result = MeterCommand::SetThreshold {
            scale: Scale::Peak,
            threshold_db: -9.0,
        }
        .apply(&mut engine);
        assert!(result.is_ok());
        assert_eq!(engine.stereo_meter(Scale::Peak).threshold(), -9.0);

        assert!(MeterCommand::SetRefreshRate(-1.0).apply(&mut engine).is_err());
    }

    #[test]
    fn test_thread_exits_when_senders_drop() {
        let (mut producer, engine) = engine();
        let (sender, receiver) = crossbeam_channel::unbounded();
        let state = Arc::new(LiveMeterState::new(engine.snapshot(), 200.0));

        let thread_state = Arc::clone(&state);
        let join = std::thread::spawn(move || run_refresh_thread(engine, receiver, thread_state));

        producer.push(&AudioBlock::new(2, 256));
        std::thread::sleep(Duration::from_millis(50));
        drop(sender);

        let engine = join.join().expect("refresh thread panicked");
        assert_eq!(engine.blocks_consumed(), 1);
        assert!(!state.is_running());
        assert_eq!(state.snapshot.load().blocks_consumed, 1);
    }

    #[test]
    fn test_command_flood_does_not_starve_refresh() {
        let (mut producer, engine) = engine();
        let (sender, receiver) = crossbeam_channel::bounded(1024);
        let state = Arc::new(LiveMeterState::new(engine.snapshot(), 200.0));

        let thread_state = Arc::clone(&state);
        let join = std::thread::spawn(move || run_refresh_thread(engine, receiver, thread_state));

        let flooding = Arc::new(AtomicFlag::new(true));
        let flood = {
            let flooding = Arc::clone(&flooding);
            std::thread::spawn(move || {
                let mut visible = false;
                while flooding.get() {
                    visible = !visible;
                    if sender.send(MeterCommand::SetTickVisible(visible)).is_err() {
                        break;
                    }
                }
            })
        };

        std::thread::sleep(Duration::from_millis(20));
        producer.push(&AudioBlock::new(2, 256));
        std::thread::sleep(Duration::from_millis(150));
        let consumed_during_flood = state.snapshot.load().blocks_consumed;

        flooding.set(false);
        flood.join().expect("flood thread panicked");
        state.stop();
        join.join().expect("refresh thread panicked");

        assert_eq!(consumed_during_flood, 1);
    }

    #[test]
    fn test_drop_at_low_refresh_rate_returns_promptly() {
        let (_producer, engine) = MeterEngine::builder()
            .refresh_hz(0.25)
            .build()
            .expect("valid engine config");
        let handle = spawn_refresh_thread(engine).expect("spawn refresh thread");
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        drop(handle);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_stop_at_low_refresh_rate_returns_engine_promptly() {
        let (_producer, engine) = MeterEngine::builder()
            .refresh_hz(0.25)
            .build()
            .expect("valid engine config");
        let handle = spawn_refresh_thread(engine).expect("spawn refresh thread");
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        let engine = handle.stop().expect("stop refresh thread");
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(engine.config().refresh_hz, 0.25);
    }
}
