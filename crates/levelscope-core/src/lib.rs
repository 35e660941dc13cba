//! Real-time metering primitives.
//!
//! # Primary API
//!
//! - [`BlockFifo`] / [`BlockProducer`] / [`BlockConsumer`]: lossy SPSC hand-off of
//!   whole audio blocks from the audio callback to the display thread
//! - [`Averager`]: fixed-size running mean
//! - [`TraceBuffer`]: fixed-size history ring for plots
//! - [`ValueHolder`]: peak hold and ballistic decay state machine
//! - [`MeterConfig`]: validated engine configuration and UI presets
//!
//! Only [`BlockProducer::push`] is meant to run on the audio thread. Everything
//! else is owned by the thread that drains the transport.
//!
//! # Example
//!
//! ```
//! use levelscope_core::{AudioBlock, BlockFifo};
//!
//! let mut fifo = BlockFifo::new(5);
//! fifo.prepare(512, 2);
//! let (mut producer, mut consumer) = fifo.split();
//!
//! // Audio thread
//! let block = AudioBlock::new(2, 512);
//! producer.push(&block);
//!
//! // Display thread
//! let mut latest = AudioBlock::new(2, 512);
//! assert!(consumer.pull_latest(&mut latest));
//! ```

pub mod error;
pub use error::{Error, Result};

mod block;
pub use block::AudioBlock;

mod transport;
pub use transport::{BlockConsumer, BlockFifo, BlockProducer, DEFAULT_FIFO_CAPACITY};

mod averager;
pub use averager::Averager;

mod trace;
pub use trace::TraceBuffer;

pub mod hold;
pub use hold::{HoldPolicy, HoldTime, ValueHolder};

pub mod config;
pub use config::{AveragingDuration, DecayRate, HoldTimePreset, MeterConfig};

pub mod db;
pub use db::{gain_to_db, MAX_DECIBELS, NEGATIVE_INFINITY_DB};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};
