//! # levelscope analysis
//!
//! DSP run on the display thread for every block pulled from the transport:
//! - **Levels**: per-channel RMS and peak, linear and in dB
//! - **Filters**: window-method FIR low-pass design and a direct-form FIR filter
//! - **Correlation**: low-pass-smoothed normalized L/R cross-correlation
//! - **Goniometer**: mid/side trace of the latest block
//!
//! ## Example
//!
//! ```rust
//! use levelscope_analysis::{BlockLevels, CorrelationEstimator};
//! use levelscope_core::AudioBlock;
//!
//! let left: Vec<f32> = (0..512).map(|i| (i as f32 * 0.1).sin()).collect();
//! let block = AudioBlock::from_channels(&[&left[..], &left[..]]);
//!
//! let levels = BlockLevels::measure(&block);
//! assert!(levels.left.peak_db > -6.0);
//!
//! let mut correlation = CorrelationEstimator::new(44100.0, 512);
//! correlation.update(&block);
//! assert!(correlation.instantaneous() > 0.0);
//! ```

pub mod correlation;
pub mod filter;
pub mod goniometer;
pub mod levels;

pub use correlation::{CorrelationConfig, CorrelationEstimator};
pub use filter::{design_fir_lowpass, hann_window, FirFilter};
pub use goniometer::{GonioPoint, Goniometer};
pub use levels::{peak, rms, BlockLevels, ChannelLevels};
