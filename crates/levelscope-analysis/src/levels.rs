//! Block level measurement.

use levelscope_core::{gain_to_db, AudioBlock, NEGATIVE_INFINITY_DB};

/// Root mean square of `samples`, 0 for an empty slice.
#[inline]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Largest absolute sample value.
#[inline]
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Levels of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLevels {
    pub rms: f32,
    pub peak: f32,
    pub rms_db: f32,
    pub peak_db: f32,
}

impl ChannelLevels {
    pub fn measure(samples: &[f32]) -> Self {
        let rms = rms(samples);
        let peak = peak(samples);
        Self {
            rms,
            peak,
            rms_db: gain_to_db(rms, NEGATIVE_INFINITY_DB),
            peak_db: gain_to_db(peak, NEGATIVE_INFINITY_DB),
        }
    }
}

impl Default for ChannelLevels {
    fn default() -> Self {
        Self {
            rms: 0.0,
            peak: 0.0,
            rms_db: NEGATIVE_INFINITY_DB,
            peak_db: NEGATIVE_INFINITY_DB,
        }
    }
}

/// Left/right levels of a block. A mono block reports the same levels on both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockLevels {
    pub left: ChannelLevels,
    pub right: ChannelLevels,
}

impl BlockLevels {
    pub fn measure(block: &AudioBlock) -> Self {
        match block.channels() {
            0 => Self::default(),
            1 => {
                let mono = ChannelLevels::measure(block.channel(0));
                Self {
                    left: mono,
                    right: mono,
                }
            }
            _ => Self {
                left: ChannelLevels::measure(block.channel(0)),
                right: ChannelLevels::measure(block.channel(1)),
            },
        }
    }
}
