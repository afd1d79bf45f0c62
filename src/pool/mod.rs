//! Live block storage
//!
//! [`BlockPool`] keeps every live [`Block`] in insertion order, releases them
//! according to an [`EvictionPolicy`], and ages them when lifetimes are in
//! use. Each block entering or leaving the pool is reported to the pool's
//! [`Tracker`] exactly once.
//!
//! # Example
//!
//! ```
//! use memstress::config::workload::EvictionPolicy;
//! use memstress::pool::BlockPool;
//! use memstress::random::RandomEngine;
//! use memstress::stats::AllocStats;
//!
//! let mut rng = RandomEngine::seeded(1);
//! let mut pool = BlockPool::new(4, AllocStats::new());
//!
//! pool.add(10, -1);
//! pool.add(50, -1);
//! pool.add(30, -1);
//!
//! assert_eq!(pool.remove(EvictionPolicy::BigFirst, &mut rng), Some(50));
//! assert_eq!(pool.live_bytes(), 40);
//! assert_eq!(pool.tracker().total_frees(), 1);
//! ```

pub mod block;

pub use block::Block;

use crate::config::workload::EvictionPolicy;
use crate::random::RandomEngine;
use crate::stats::Tracker;
use std::collections::VecDeque;

/// Ordered set of live blocks
///
/// `capacity` is advisory: [`BlockPool::add`] never refuses a block, the
/// controller checks [`BlockPool::is_full`] before allocating. Dropping the
/// pool drains it, so the tracker always sees a free for every allocation.
pub struct BlockPool<T: Tracker> {
    blocks: VecDeque<Block>,
    capacity: usize,
    tracker: T,
}

impl<T: Tracker> BlockPool<T> {
    pub fn new(capacity: usize, tracker: T) -> Self {
        Self {
            blocks: VecDeque::with_capacity(capacity),
            capacity,
            tracker,
        }
    }

    /// Number of live blocks
    #[inline]
    pub fn count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.blocks.len() >= self.capacity
    }

    /// Sum of live block sizes
    pub fn live_bytes(&self) -> u64 {
        self.blocks.iter().map(|b| b.size() as u64).sum()
    }

    /// Live blocks, oldest first
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    /// Allocate a block and append it at the tail
    pub fn add(&mut self, size: usize, ttl: i64) {
        self.blocks.push_back(Block::new(size, ttl));
        self.tracker.on_alloc(size);
    }

    /// Release one block chosen by `policy`
    ///
    /// Returns the released size, or `None` if the pool is empty or the policy
    /// is [`EvictionPolicy::Never`]. Only [`EvictionPolicy::Random`] draws
    /// from `rng`.
    pub fn remove(&mut self, policy: EvictionPolicy, rng: &mut RandomEngine) -> Option<usize> {
        if self.blocks.is_empty() {
            return None;
        }

        let block = match policy {
            EvictionPolicy::Lifo => self.blocks.pop_back(),
            EvictionPolicy::Fifo => self.blocks.pop_front(),
            EvictionPolicy::Random => {
                let index = rng.uniform(0, self.blocks.len());
                self.blocks.remove(index)
            }
            EvictionPolicy::BigFirst => {
                let index = self.position_by(|candidate, best| candidate > best);
                self.blocks.remove(index)
            }
            EvictionPolicy::SmallFirst => {
                let index = self.position_by(|candidate, best| candidate < best);
                self.blocks.remove(index)
            }
            EvictionPolicy::Never => None,
        }?;

        let size = block.size();
        drop(block);
        self.tracker.on_free(size);
        Some(size)
    }

    /// Index of the block whose size wins `better`, earliest on ties
    ///
    /// Only called on a non-empty pool.
    fn position_by(&self, better: impl Fn(usize, usize) -> bool) -> usize {
        let mut best = 0;
        for (i, block) in self.blocks.iter().enumerate().skip(1) {
            if better(block.size(), self.blocks[best].size()) {
                best = i;
            }
        }
        best
    }

    /// Age every mortal block by one step and release the ones that expire
    ///
    /// Returns the number of blocks released. Survivors keep their order.
    pub fn age_and_prune(&mut self) -> usize {
        let tracker = &mut self.tracker;
        let before = self.blocks.len();

        self.blocks.retain_mut(|block| {
            block.tick();
            if block.is_dead() {
                tracker.on_free(block.size());
                false
            } else {
                true
            }
        });

        before - self.blocks.len()
    }

    /// Release every block, oldest first
    ///
    /// Returns the number of blocks released.
    pub fn drain(&mut self) -> usize {
        let released = self.blocks.len();
        while let Some(block) = self.blocks.pop_front() {
            let size = block.size();
            drop(block);
            self.tracker.on_free(size);
        }
        released
    }
}

impl<T: Tracker> Drop for BlockPool<T> {
    fn drop(&mut self) {
        self.drain();
    }
}
