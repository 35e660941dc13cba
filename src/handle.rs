//! Fluent API handle for the live refresh thread.

use crate::live::{LiveMeterState, MeterCommand};
use crate::meters::{HistogramView, MeterView, Scale};
use crate::snapshot::MeterSnapshot;
use crate::{Error, MeterEngine, Result};
use crossbeam_channel::Sender;
use levelscope_core::{AveragingDuration, DecayRate, HoldTimePreset};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Fluent API handle for live metering.
///
/// Created via [`spawn_refresh_thread`](crate::spawn_refresh_thread).
/// Dropping the handle stops and joins the thread.
///
/// # Example
/// ```ignore
/// let meters = spawn_refresh_thread(engine)?
///     .threshold(Scale::Rms, -18.0)
///     .decay_rate(DecayRate::Db24)
///     .hold_time(HoldTimePreset::Infinite);
///
/// // From the UI thread, every frame
/// let frame = meters.snapshot();
/// draw(&frame.rms, &frame.peak);
/// ```
pub struct MeterHandle {
    commands: Option<Sender<MeterCommand>>,
    state: Arc<LiveMeterState>,
    thread: Option<JoinHandle<MeterEngine>>,
}

impl MeterHandle {
    pub(crate) fn new(
        commands: Sender<MeterCommand>,
        state: Arc<LiveMeterState>,
        thread: JoinHandle<MeterEngine>,
    ) -> Self {
        Self {
            commands: Some(commands),
            state,
            thread: Some(thread),
        }
    }

    /// Queue a command for the refresh thread.
    pub fn send(&self, command: MeterCommand) -> Result<()> {
        self.commands
            .as_ref()
            .ok_or(Error::RefreshThreadStopped)?
            .send(command)
            .map_err(|_| Error::RefreshThreadStopped)
    }

    fn send_or_warn(&self, command: MeterCommand) {
        if self.send(command).is_err() {
            tracing::warn!("Refresh thread stopped; dropped {:?}", command);
        }
    }

    pub fn threshold(self, scale: Scale, threshold_db: f32) -> Self {
        self.send_or_warn(MeterCommand::SetThreshold {
            scale,
            threshold_db,
        });
        self
    }

    pub fn decay_rate(self, rate: DecayRate) -> Self {
        self.send_or_warn(MeterCommand::SetDecayRate(rate));
        self
    }

    pub fn hold_time(self, hold_time: HoldTimePreset) -> Self {
        self.send_or_warn(MeterCommand::SetHoldTime(hold_time));
        self
    }

    pub fn averaging(self, duration: AveragingDuration) -> Self {
        self.send_or_warn(MeterCommand::SetAveraging(duration));
        self
    }

    /// Invalid rates are rejected by the thread and the old rate kept.
    pub fn refresh_rate(self, refresh_hz: f32) -> Self {
        self.send_or_warn(MeterCommand::SetRefreshRate(refresh_hz));
        self
    }

    pub fn meter_view(self, view: MeterView) -> Self {
        self.send_or_warn(MeterCommand::SetMeterView(view));
        self
    }

    pub fn ticks_visible(self, visible: bool) -> Self {
        self.send_or_warn(MeterCommand::SetTickVisible(visible));
        self
    }

    pub fn histogram_view(self, view: HistogramView) -> Self {
        self.send_or_warn(MeterCommand::SetHistogramView(view));
        self
    }

    /// 50..200 % zoom.
    pub fn goniometer_scale(self, percent: f32) -> Self {
        self.send_or_warn(MeterCommand::SetGoniometerScale(percent));
        self
    }

    pub fn reset_holds(self) -> Self {
        self.send_or_warn(MeterCommand::ResetHolds);
        self
    }

    /// Latest published frame.
    pub fn snapshot(&self) -> Arc<MeterSnapshot> {
        self.state.snapshot.load_full()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn refresh_hz(&self) -> f32 {
        self.state.refresh_hz()
    }

    /// Stop the thread and take the engine back.
    pub fn stop(mut self) -> Result<MeterEngine> {
        self.shutdown();
        let thread = self.thread.take().ok_or(Error::RefreshThreadStopped)?;
        thread.join().map_err(|_| Error::RefreshThreadStopped)
    }

    pub fn inner(&self) -> &Arc<LiveMeterState> {
        &self.state
    }

    /// Dropping the sender wakes the thread out of its frame wait.
    fn shutdown(&mut self) {
        self.state.stop();
        self.commands = None;
    }
}

impl Drop for MeterHandle {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("Refresh thread panicked");
            }
        }
    }
}
