//! Mid/side goniometer trace.

use levelscope_core::db::db_to_gain;
use levelscope_core::AudioBlock;

/// Blocks shorter than this fade the previous trace instead of replacing it.
pub const MIN_TRACE_FRAMES: usize = 256;

/// Attenuation applied to mid/side, and to a stale trace on each short block.
pub const TRACE_GAIN_DB: f32 = -3.0;

const MIN_SCALE_PERCENT: f32 = 50.0;
const MAX_SCALE_PERCENT: f32 = 200.0;
const MIN_SCALE: f32 = 0.2;
const MAX_SCALE: f32 = 0.8;

/// One point of the trace. Both axes lie in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct GonioPoint {
    pub side: f32,
    pub mid: f32,
}

/// Keeps the latest block and renders it as mid/side points.
#[derive(Debug, Clone)]
pub struct Goniometer {
    buffer: AudioBlock,
    gain: f32,
    scale: f32,
}

impl Goniometer {
    pub fn new(channels: usize, max_frames: usize) -> Self {
        Self {
            buffer: AudioBlock::new(channels, max_frames),
            gain: db_to_gain(TRACE_GAIN_DB),
            scale: Self::scale_for_percent(100.0),
        }
    }

    pub fn update(&mut self, block: &AudioBlock) {
        if block.frames() >= MIN_TRACE_FRAMES {
            if self.buffer.channels() != block.channels()
                || self.buffer.capacity() < block.frames()
            {
                self.buffer = AudioBlock::new(block.channels(), block.capacity());
            }
            self.buffer.set_frames(block.frames());
            for ch in 0..block.channels() {
                self.buffer.channel_mut(ch).copy_from_slice(block.channel(ch));
            }
        } else {
            self.buffer.apply_gain(self.gain);
        }
    }

    /// Set the display zoom from a 50..200 % rotary.
    pub fn set_scale(&mut self, percent: f32) {
        self.scale = Self::scale_for_percent(percent);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn scale_for_percent(percent: f32) -> f32 {
        let percent = percent.clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT);
        let t = (percent - MIN_SCALE_PERCENT) / (MAX_SCALE_PERCENT - MIN_SCALE_PERCENT);
        MIN_SCALE + t * (MAX_SCALE - MIN_SCALE)
    }

    /// Points of the current trace, unscaled.
    pub fn points(&self) -> impl Iterator<Item = GonioPoint> + '_ {
        let gain = self.gain;
        self.buffer.stereo_frames().map(move |(l, r)| GonioPoint {
            side: ((l - r) * gain).clamp(-1.0, 1.0),
            mid: ((l + r) * gain).clamp(-1.0, 1.0),
        })
    }

    /// Points multiplied by the display scale.
    pub fn scaled_points(&self) -> impl Iterator<Item = GonioPoint> + '_ {
        let scale = self.scale;
        self.points().map(move |p| GonioPoint {
            side: p.side * scale,
            mid: p.mid * scale,
        })
    }

    pub fn len(&self) -> usize {
        self.buffer.frames()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.frames() == 0
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
