//! Display-side meter models.
//!
//! Each type mirrors one panel of the metering UI and holds only display
//! state. Levels arrive in dB, already floored at
//! [`NEGATIVE_INFINITY_DB`](levelscope_core::NEGATIVE_INFINITY_DB).

mod histogram;
mod macro_meter;
mod meter;
mod stereo_image;
mod stereo_meter;

pub use histogram::{Histogram, HistogramView, HISTOGRAM_SIZE};
pub use macro_meter::{MacroMeter, DEFAULT_AVERAGER_LEN};
pub use meter::Meter;
pub use stereo_image::StereoImageMeter;
pub use stereo_meter::{MeterView, StereoMeter};

/// Which level measurement a meter or histogram shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Rms,
    Peak,
}
