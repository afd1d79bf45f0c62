//! Per-step workload decisions
//!
//! [`WorkloadController`] drives one [`BlockPool`]: every call to
//! [`WorkloadController::step`] ages the pool (when lifetimes are enabled),
//! then either allocates a new block or evicts one under the configured
//! policy. All randomness comes from the controller's [`RandomEngine`], so a
//! seed fully determines the sequence of outcomes.
//!
//! # Example
//!
//! ```
//! use memstress::config::WorkloadConfig;
//! use memstress::random::RandomEngine;
//! use memstress::stats::AllocStats;
//! use memstress::workload::{StepOutcome, WorkloadController};
//!
//! let config = WorkloadConfig {
//!     capacity: 2,
//!     alloc_frequency: 1.0,
//!     min_size: 64,
//!     max_size: 64,
//!     ..Default::default()
//! };
//! let mut controller =
//!     WorkloadController::new(config, RandomEngine::seeded(1), AllocStats::new()).unwrap();
//!
//! assert!(matches!(controller.step().outcome, StepOutcome::Allocated { size: 64, .. }));
//! assert!(matches!(controller.step().outcome, StepOutcome::Allocated { .. }));
//! assert!(matches!(controller.step().outcome, StepOutcome::Freed { size: 64 }));
//! ```

pub mod trend;

use crate::config::validator::{validate_workload, ConfigError};
use crate::config::workload::{SizeMode, TtlMode};
use crate::config::WorkloadConfig;
use crate::pool::BlockPool;
use crate::random::RandomEngine;
use crate::stats::Tracker;
use trend::TrendState;

/// What a single step did to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A block of `size` bytes living `ttl` steps was added
    Allocated { size: usize, ttl: i64 },
    /// A block of `size` bytes was evicted
    Freed { size: usize },
    /// Nothing to evict (empty pool or `never` policy)
    Idle,
}

/// Result of [`WorkloadController::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub outcome: StepOutcome,
    /// Blocks released by TTL expiry before the decision
    pub pruned: usize,
}

/// Allocation/eviction decision loop state
pub struct WorkloadController<T: Tracker> {
    config: WorkloadConfig,
    rng: RandomEngine,
    pool: BlockPool<T>,
    trend: TrendState,
    steps: u64,
}

impl<T: Tracker> WorkloadController<T> {
    /// Validate `config` and build an empty pool reporting to `tracker`
    pub fn new(config: WorkloadConfig, rng: RandomEngine, tracker: T) -> Result<Self, ConfigError> {
        validate_workload(&config)?;

        let pool = BlockPool::new(config.capacity, tracker);
        let trend = TrendState::new(&config);

        Ok(Self {
            config,
            rng,
            pool,
            trend,
            steps: 0,
        })
    }

    /// Execute one iteration
    pub fn step(&mut self) -> StepReport {
        self.steps += 1;

        let pruned = if self.config.ttl_mode != TtlMode::Off {
            self.pool.age_and_prune()
        } else {
            0
        };

        let outcome = if self.should_alloc() {
            let size = self.next_size();
            let ttl = self.next_ttl();
            self.pool.add(size, ttl);
            StepOutcome::Allocated { size, ttl }
        } else {
            match self.pool.remove(self.config.policy, &mut self.rng) {
                Some(size) => StepOutcome::Freed { size },
                None => StepOutcome::Idle,
            }
        };

        StepReport { outcome, pruned }
    }

    /// Below capacity, allocate with probability `alloc_frequency`
    ///
    /// No draw is made when the pool is full.
    #[inline]
    fn should_alloc(&mut self) -> bool {
        !self.pool.is_full() && self.rng.uniform01() < self.config.alloc_frequency
    }

    fn next_size(&mut self) -> usize {
        let list = &self.config.size_list;
        if list.is_empty() {
            return self.trend.next(&mut self.rng, &self.config);
        }

        match self.config.size_mode {
            SizeMode::Exact => self.rng.weighted_choice(list, &self.config.size_weights),
            SizeMode::Nearest => {
                let target = self.trend.next(&mut self.rng, &self.config);
                nearest(&self.config.size_list, target)
            }
        }
    }

    fn next_ttl(&mut self) -> i64 {
        match self.config.ttl_mode {
            TtlMode::Off => -1,
            TtlMode::Fixed => self.config.ttl_fixed,
            TtlMode::List => self
                .rng
                .weighted_choice(&self.config.ttl_list, &self.config.ttl_weights),
        }
    }

    /// Steps executed so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    pub fn pool(&self) -> &BlockPool<T> {
        &self.pool
    }

    pub fn tracker(&self) -> &T {
        self.pool.tracker()
    }

    pub fn trend(&self) -> &TrendState {
        &self.trend
    }

    /// Release every live block; returns how many were released
    pub fn drain(&mut self) -> usize {
        self.pool.drain()
    }

    /// Take the pool and engine apart, e.g. to keep stepping elsewhere
    pub fn into_parts(self) -> (BlockPool<T>, RandomEngine) {
        (self.pool, self.rng)
    }
}

/// List entry closest to `target`, first one on ties
///
/// `list` must not be empty.
fn nearest(list: &[usize], target: usize) -> usize {
    let mut best = list[0];
    for &candidate in &list[1..] {
        if candidate.abs_diff(target) < best.abs_diff(target) {
            best = candidate;
        }
    }
    best
}
