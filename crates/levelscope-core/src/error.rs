//! Error types for levelscope-core.

use thiserror::Error;

/// Error type for levelscope-core operations.
///
/// Only configuration can fail. The transport and the meter primitives are
/// total once constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid sample rate: {0}. Must be between 8000 and 384000 Hz")]
    InvalidSampleRate(f64),

    #[error("Invalid channel count: {0}. Metering supports 1 or 2 channels")]
    InvalidChannelCount(usize),

    #[error("Invalid block size: {0}. Must be between 1 and 8192 frames")]
    InvalidBlockSize(usize),

    #[error("Invalid refresh rate: {0} Hz")]
    InvalidRefreshRate(f32),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
