//! Lossy lock-free hand-off of whole audio blocks.
//!
//! The audio callback pushes one block per callback; the display thread
//! drains on its own timer. The ring holds a handful of slots and the
//! producer overwrites the oldest unread slot when the consumer falls behind,
//! so the audio thread never waits.
//!
//! Each slot is a seqlock: the producer bumps the slot stamp to an odd value,
//! writes the samples (stored as atomic floats) and bumps it to the next even
//! value. A consumer that observes a changed stamp after copying discards its
//! copy and retries, so an overwrite racing a read can never surface torn data.

use crate::AudioBlock;
use atomic_float::AtomicF32;
use std::sync::atomic::{fence, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Default ring capacity in blocks.
pub const DEFAULT_FIFO_CAPACITY: usize = 5;

struct Slot {
    /// `2 * generation + 1` while being written, `2 * generation + 2` once complete.
    stamp: AtomicU64,
    frames: AtomicUsize,
    samples: Box<[AtomicF32]>,
}

impl Slot {
    fn new(channels: usize, max_frames: usize) -> Self {
        Self {
            stamp: AtomicU64::new(0),
            frames: AtomicUsize::new(0),
            samples: (0..channels * max_frames)
                .map(|_| AtomicF32::new(0.0))
                .collect(),
        }
    }
}

struct Shared {
    slots: Box<[Slot]>,
    channels: usize,
    max_frames: usize,
    /// Blocks ever written. Only the producer stores to it.
    head: AtomicU64,
    /// Blocks consumed or discarded. Advanced by the consumer on read and by
    /// the producer when it has to drop the oldest slot.
    tail: AtomicU64,
    overwritten: AtomicU64,
}

impl Shared {
    fn empty() -> Self {
        Self {
            slots: Box::new([]),
            channels: 0,
            max_frames: 0,
            head: AtomicU64::new(0),
            tail: AtomicU64::new(0),
            overwritten: AtomicU64::new(0),
        }
    }

    fn prepared(capacity: usize, max_frames: usize, channels: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Slot::new(channels, max_frames)).collect(),
            channels,
            max_frames,
            ..Self::empty()
        }
    }

    #[inline]
    fn is_prepared(&self) -> bool {
        !self.slots.is_empty()
    }

    /// RT-safe: no locks, no allocation, bounded retries.
    fn push(&self, block: &AudioBlock) {
        let capacity = self.slots.len() as u64;
        if capacity == 0 {
            debug_assert!(false, "BlockFifo::push called before prepare");
            return;
        }

        let head = self.head.load(Ordering::Relaxed);

        // Make room by discarding the oldest unread block(s).
        let mut tail = self.tail.load(Ordering::Acquire);
        while head - tail >= capacity {
            let new_tail = head - capacity + 1;
            match self.tail.compare_exchange_weak(
                tail,
                new_tail,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.overwritten
                        .fetch_add(new_tail - tail, Ordering::Relaxed);
                    break;
                }
                Err(current) => tail = current,
            }
        }

        let slot = &self.slots[(head % capacity) as usize];
        let stamp = head * 2 + 1;
        slot.stamp.store(stamp, Ordering::Relaxed);
        fence(Ordering::Release);

        // Oversized blocks are truncated to the prepared capacity.
        let frames = block.frames().min(self.max_frames);
        slot.frames.store(frames, Ordering::Relaxed);

        for ch in 0..self.channels {
            let dst = &slot.samples[ch * self.max_frames..ch * self.max_frames + frames];
            if ch < block.channels() {
                for (d, &s) in dst.iter().zip(block.channel(ch)) {
                    d.store(s, Ordering::Relaxed);
                }
            } else {
                dst.iter().for_each(|d| d.store(0.0, Ordering::Relaxed));
            }
        }

        slot.stamp.store(stamp + 1, Ordering::Release);
        self.head.store(head + 1, Ordering::Release);
    }

    fn pull(&self, out: &mut AudioBlock) -> bool {
        let capacity = self.slots.len() as u64;
        if capacity == 0 {
            return false;
        }

        if out.channels() != self.channels || out.capacity() < self.max_frames {
            *out = AudioBlock::new(self.channels, self.max_frames);
        }

        loop {
            let tail = self.tail.load(Ordering::Acquire);
            let head = self.head.load(Ordering::Acquire);
            if tail == head {
                return false;
            }

            let slot = &self.slots[(tail % capacity) as usize];
            let expected = tail * 2 + 2;
            if slot.stamp.load(Ordering::Acquire) != expected {
                // Lapped by the producer; tail has already moved on.
                continue;
            }

            let frames = slot.frames.load(Ordering::Relaxed);
            out.set_frames(frames);
            for ch in 0..self.channels {
                let src = &slot.samples[ch * self.max_frames..ch * self.max_frames + frames];
                for (d, s) in out.channel_mut(ch).iter_mut().zip(src) {
                    *d = s.load(Ordering::Relaxed);
                }
            }

            fence(Ordering::Acquire);
            if slot.stamp.load(Ordering::Relaxed) != expected {
                continue;
            }

            if self
                .tail
                .compare_exchange(tail, tail + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    fn num_available(&self) -> usize {
        // Tail first: head read afterwards can only be larger.
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (head.saturating_sub(tail) as usize).min(self.slots.len())
    }
}

/// Unsplit block transport.
///
/// Allocate with [`prepare`](BlockFifo::prepare), then [`split`](BlockFifo::split)
/// into a producer for the audio thread and a consumer for the display
/// thread. The unsplit fifo can also be driven from a single thread.
pub struct BlockFifo {
    capacity: usize,
    shared: Arc<Shared>,
}

impl BlockFifo {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BlockFifo capacity must be non-zero");
        Self {
            capacity,
            shared: Arc::new(Shared::empty()),
        }
    }

    /// Allocate every slot for blocks of up to `frames` × `channels`.
    ///
    /// Discards anything queued. Taking `&mut self` guarantees no push or
    /// pull can run concurrently.
    pub fn prepare(&mut self, frames: usize, channels: usize) {
        self.shared = Arc::new(Shared::prepared(self.capacity, frames, channels));
        tracing::debug!(
            "Prepared block fifo: {} slots of {} frames x {} channels",
            self.capacity,
            frames,
            channels
        );
    }

    pub fn is_prepared(&self) -> bool {
        self.shared.is_prepared()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, block: &AudioBlock) {
        self.shared.push(block);
    }

    /// Copy the oldest unread block into `out`.
    ///
    /// Returns false when nothing is queued; the caller keeps its last block.
    pub fn pull(&mut self, out: &mut AudioBlock) -> bool {
        self.shared.pull(out)
    }

    pub fn num_available(&self) -> usize {
        self.shared.num_available()
    }

    /// Blocks dropped because the ring was full.
    pub fn overwritten(&self) -> u64 {
        self.shared.overwritten.load(Ordering::Relaxed)
    }

    pub fn split(self) -> (BlockProducer, BlockConsumer) {
        (
            BlockProducer {
                shared: Arc::clone(&self.shared),
            },
            BlockConsumer {
                shared: self.shared,
                seen_overwritten: 0,
            },
        )
    }
}

impl Default for BlockFifo {
    fn default() -> Self {
        Self::new(DEFAULT_FIFO_CAPACITY)
    }
}

/// Audio-thread side of the transport.
pub struct BlockProducer {
    shared: Arc<Shared>,
}

impl BlockProducer {
    /// Copy `block` into the ring, overwriting the oldest unread block when full.
    ///
    /// RT-safe: never blocks and never allocates.
    #[inline]
    pub fn push(&mut self, block: &AudioBlock) {
        self.shared.push(block);
    }

    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }
}

/// Display-thread side of the transport.
pub struct BlockConsumer {
    shared: Arc<Shared>,
    seen_overwritten: u64,
}

impl BlockConsumer {
    /// Copy the oldest unread block into `out`. Returns false when empty.
    #[inline]
    pub fn pull(&mut self, out: &mut AudioBlock) -> bool {
        self.shared.pull(out)
    }

    /// Drain to the most recent block, discarding staler ones.
    ///
    /// Returns false when nothing was queued, leaving `out` untouched.
    pub fn pull_latest(&mut self, out: &mut AudioBlock) -> bool {
        let mut pulled = false;
        while self.shared.pull(out) {
            pulled = true;
        }

        let overwritten = self.overwritten();
        if overwritten != self.seen_overwritten {
            tracing::trace!(
                "Block fifo overwrote {} unread blocks",
                overwritten - self.seen_overwritten
            );
            self.seen_overwritten = overwritten;
        }

        pulled
    }

    #[inline]
    pub fn num_available(&self) -> usize {
        self.shared.num_available()
    }

    pub fn overwritten(&self) -> u64 {
        self.shared.overwritten.load(Ordering::Relaxed)
    }

    pub fn channels(&self) -> usize {
        self.shared.channels
    }

    pub fn max_frames(&self) -> usize {
        self.shared.max_frames
    }
}
