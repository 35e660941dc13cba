//! Planar multi-channel audio block.

/// One callback's worth of audio, stored planar (channel after channel).
///
/// The metering pipeline preallocates blocks once and reuses them, so
/// [`set_frames`](AudioBlock::set_frames) only ever shrinks or regrows within
/// the capacity given at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    channels: usize,
    frames: usize,
    capacity: usize,
    data: Vec<f32>,
}

impl AudioBlock {
    /// Silent block of `channels` × `frames`.
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            channels,
            frames,
            capacity: frames,
            data: vec![0.0; channels * frames],
        }
    }

    /// Build a block from per-channel slices. Channels are truncated to the
    /// shortest slice.
    pub fn from_channels(channels: &[&[f32]]) -> Self {
        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        let mut block = Self::new(channels.len(), frames);
        for (ch, samples) in channels.iter().enumerate() {
            block.channel_mut(ch).copy_from_slice(&samples[..frames]);
        }
        block
    }

    /// Build a block from interleaved samples.
    pub fn from_interleaved(samples: &[f32], channels: usize) -> Self {
        if channels == 0 {
            return Self::new(0, 0);
        }
        let frames = samples.len() / channels;
        let mut block = Self::new(channels, frames);
        for (frame, chunk) in samples.chunks_exact(channels).enumerate() {
            for (ch, &s) in chunk.iter().enumerate() {
                block.data[ch * block.capacity + frame] = s;
            }
        }
        block
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Maximum frame count this block can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the active frame count within capacity.
    ///
    /// RT-safe: never allocates. Requests beyond capacity are clamped.
    #[inline]
    pub fn set_frames(&mut self, frames: usize) {
        debug_assert!(frames <= self.capacity, "frame count exceeds block capacity");
        self.frames = frames.min(self.capacity);
    }

    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.capacity;
        &self.data[start..start + self.frames]
    }

    #[inline]
    pub fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        let start = ch * self.capacity;
        &mut self.data[start..start + self.frames]
    }

    #[inline]
    pub fn sample(&self, ch: usize, frame: usize) -> f32 {
        self.data[ch * self.capacity + frame]
    }

    /// Iterate `(left, right)` frame pairs.
    ///
    /// A mono block yields its single channel on both sides.
    pub fn stereo_frames(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        let left = if self.channels > 0 { self.channel(0) } else { &[] };
        let right = if self.channels > 1 { self.channel(1) } else { left };
        left.iter().copied().zip(right.iter().copied())
    }

    pub fn apply_gain(&mut self, gain: f32) {
        for ch in 0..self.channels {
            self.channel_mut(ch).iter_mut().for_each(|s| *s *= gain);
        }
    }

    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|s| *s = 0.0);
    }
}

impl Default for AudioBlock {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interleaved_deinterleaves() {
        let block = AudioBlock::from_interleaved(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0], 2);
        assert_eq!(block.frames(), 3);
        assert_eq!(block.channel(0), &[1.0, 2.0, 3.0]);
        assert_eq!(block.channel(1), &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_set_frames_within_capacity() {
        let mut block = AudioBlock::from_channels(&[&[1.0, 2.0, 3.0, 4.0]]);
        block.set_frames(2);
        assert_eq!(block.channel(0), &[1.0, 2.0]);
        block.set_frames(4);
        assert_eq!(block.channel(0), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_mono_stereo_frames_duplicate() {
        let block = AudioBlock::from_channels(&[&[0.5, -0.25]]);
        let pairs: Vec<_> = block.stereo_frames().collect();
        assert_eq!(pairs, vec![(0.5, 0.5), (-0.25, -0.25)]);
    }

    #[test]
    fn test_apply_gain() {
        let mut block = AudioBlock::from_channels(&[&[1.0, 2.0], &[-1.0, -2.0]]);
        block.apply_gain(0.5);
        assert_eq!(block.channel(0), &[0.5, 1.0]);
        assert_eq!(block.channel(1), &[-0.5, -1.0]);
    }
}
