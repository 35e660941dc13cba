//! Centralized error type for the levelscope umbrella crate.
//!
//! Wraps the core error so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] levelscope_core::Error),

    #[error("Failed to spawn refresh thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    #[error("Refresh thread has stopped")]
    RefreshThreadStopped,
}

pub type Result<T> = std::result::Result<T, Error>;
