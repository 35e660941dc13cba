//! # levelscope - Real-time Stereo Level Metering
//!
//! Display-side metering for an audio stream, built from modular subsystems.
//!
//! ## Architecture
//!
//! levelscope is an umbrella crate that coordinates:
//! - **levelscope-core** - Lossy block transport, averager, trace buffer, peak hold ballistics
//! - **levelscope-analysis** - Block levels, FIR low-pass design, stereo correlation, goniometer
//!
//! and adds the meter models ([`meters`]), the [`MeterEngine`] that feeds them
//! from the transport, and an optional background refresh thread.
//!
//! ## Quick Start
//!
//! ```
//! use levelscope::prelude::*;
//! use std::time::Instant;
//!
//! let (mut producer, mut engine) = MeterEngine::builder()
//!     .sample_rate(44100.0)
//!     .block_size(512)
//!     .build()?;
//!
//! // In the audio callback: never blocks, never allocates
//! let block = AudioBlock::new(2, 512);
//! producer.push(&block);
//!
//! // On the display timer
//! engine.refresh(Instant::now());
//! let peak = engine.stereo_meter(Scale::Peak);
//! println!("L peak {:.1} dB", peak.left().instant().level());
//! # Ok::<(), levelscope::Error>(())
//! ```
//!
//! ## Threads
//!
//! Only [`BlockProducer::push`] runs on the audio thread. Everything else
//! belongs to whichever thread owns the engine, either the host's UI timer
//! or the thread started by [`spawn_refresh_thread`].
//!
//! ## Feature Flags
//!
//! - `serialization` - serde derives on configuration and presets

/// Re-export of levelscope-core for direct access
pub use levelscope_core as core;

/// Re-export of levelscope-analysis for direct access
pub use levelscope_analysis as analysis;

// Core types
pub use levelscope_core::{
    AudioBlock,
    AveragingDuration,
    Averager,
    BlockConsumer,
    BlockFifo,
    BlockProducer,
    DecayRate,
    HoldPolicy,
    HoldTime,
    HoldTimePreset,
    // Configuration
    MeterConfig,
    TraceBuffer,
    ValueHolder,
    MAX_DECIBELS,
    NEGATIVE_INFINITY_DB,
};

// Analysis
pub use levelscope_analysis::{
    BlockLevels, ChannelLevels, CorrelationConfig, CorrelationEstimator, GonioPoint, Goniometer,
};

mod error;
pub use error::{Error, Result};

pub mod meters;
pub use meters::{
    Histogram, HistogramView, MacroMeter, Meter, MeterView, Scale, StereoImageMeter, StereoMeter,
};

mod snapshot;
pub use snapshot::{ChannelSnapshot, MeterSnapshot, StereoMeterSnapshot};

mod builder;
mod engine;

pub use builder::MeterEngineBuilder;
pub use engine::MeterEngine;

mod handle;
mod live;

pub use handle::MeterHandle;
pub use live::{run_refresh_thread, spawn_refresh_thread, LiveMeterState, MeterCommand};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{MeterEngine, MeterEngineBuilder};

    // Live thread
    pub use crate::{spawn_refresh_thread, MeterCommand, MeterHandle, MeterSnapshot};

    // Essential types
    pub use crate::core::{AudioBlock, BlockProducer};

    // Presets
    pub use crate::core::{AveragingDuration, DecayRate, HoldTimePreset};

    // Meters
    pub use crate::meters::{HistogramView, MeterView, Scale};
}
