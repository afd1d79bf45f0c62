//! Allocation statistics
//!
//! The pool reports every block creation and removal through the [`Tracker`]
//! trait. [`AllocStats`] is the tracker used by the binary: it keeps running
//! byte/count totals, the peak live footprint, and a histogram of allocation
//! sizes. Process memory counters are only sampled when a [`StatsSnapshot`]
//! is taken, never per event.
//!
//! # Example
//!
//! ```
//! use memstress::stats::{AllocStats, Tracker};
//!
//! let mut stats = AllocStats::new();
//! stats.on_alloc(4096);
//! stats.on_alloc(1024);
//! stats.on_free(4096);
//!
//! assert_eq!(stats.current_bytes(), 1024);
//! assert_eq!(stats.peak_bytes(), 5120);
//! assert_eq!(stats.total_allocs(), 2);
//! assert_eq!(stats.total_frees(), 1);
//! ```

pub mod histogram;
pub mod live;
pub mod memory;

use histogram::SizeHistogram;
use memory::ProcessMemory;
use serde::Serialize;
use std::fmt;

/// Receiver of block lifecycle events
///
/// Called synchronously, exactly once per block creation (`on_alloc`) and
/// once per block removal (`on_free`), with the block's size in bytes.
pub trait Tracker {
    fn on_alloc(&mut self, size: usize);
    fn on_free(&mut self, size: usize);
}

impl<T: Tracker + ?Sized> Tracker for &mut T {
    #[inline]
    fn on_alloc(&mut self, size: usize) {
        (**self).on_alloc(size);
    }

    #[inline]
    fn on_free(&mut self, size: usize) {
        (**self).on_free(size);
    }
}

/// Running allocation counters
#[derive(Debug, Clone, Default)]
pub struct AllocStats {
    peak_bytes: u64,
    total_bytes: u64,
    total_allocs: u64,
    current_bytes: u64,
    current_allocs: u64,
    freed_bytes: u64,
    total_frees: u64,
    peak_allocs: u64,
    sizes: SizeHistogram,
}

impl AllocStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest live byte count seen
    pub fn peak_bytes(&self) -> u64 {
        self.peak_bytes
    }

    /// Bytes allocated over the whole run
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Allocations over the whole run
    pub fn total_allocs(&self) -> u64 {
        self.total_allocs
    }

    /// Live bytes
    pub fn current_bytes(&self) -> u64 {
        self.current_bytes
    }

    /// Live blocks
    pub fn current_allocs(&self) -> u64 {
        self.current_allocs
    }

    /// Highest live block count seen
    pub fn peak_allocs(&self) -> u64 {
        self.peak_allocs
    }

    /// Bytes released over the whole run
    pub fn freed_bytes(&self) -> u64 {
        self.freed_bytes
    }

    /// Frees over the whole run
    pub fn total_frees(&self) -> u64 {
        self.total_frees
    }

    /// Histogram of allocation sizes
    pub fn sizes(&self) -> &SizeHistogram {
        &self.sizes
    }

    /// Capture the counters together with the process memory counters
    pub fn snapshot(&self, step: u64) -> StatsSnapshot {
        self.snapshot_with_memory(step, ProcessMemory::sample_or_default())
    }

    /// Capture the counters with externally supplied memory counters
    pub fn snapshot_with_memory(&self, step: u64, memory: ProcessMemory) -> StatsSnapshot {
        StatsSnapshot {
            timestamp: chrono::Utc::now(),
            step,
            peak_size_allocated: self.peak_bytes,
            total_size_allocated: self.total_bytes,
            total_number_of_allocations: self.total_allocs,
            current_size_allocated: self.current_bytes,
            current_number_of_allocations: self.current_allocs,
            freed_allocation_size: self.freed_bytes,
            total_number_of_frees: self.total_frees,
            size_p50: self.sizes.percentile(50.0).unwrap_or(0),
            size_p90: self.sizes.percentile(90.0).unwrap_or(0),
            size_p99: self.sizes.percentile(99.0).unwrap_or(0),
            size_max: self.sizes.max().unwrap_or(0),
            memory,
        }
    }
}

impl Tracker for AllocStats {
    fn on_alloc(&mut self, size: usize) {
        let size = size as u64;
        self.total_allocs += 1;
        self.current_allocs += 1;
        self.total_bytes += size;
        self.current_bytes += size;

        self.peak_bytes = self.peak_bytes.max(self.current_bytes);
        self.peak_allocs = self.peak_allocs.max(self.current_allocs);
        self.sizes.record(size as usize);
    }

    fn on_free(&mut self, size: usize) {
        let size = size as u64;
        self.total_frees += 1;
        self.current_allocs = self.current_allocs.saturating_sub(1);
        self.current_bytes = self.current_bytes.saturating_sub(size);
        self.freed_bytes += size;
    }
}

/// Point-in-time view of the allocation counters and process memory
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub step: u64,
    pub peak_size_allocated: u64,
    pub total_size_allocated: u64,
    pub total_number_of_allocations: u64,
    pub current_size_allocated: u64,
    pub current_number_of_allocations: u64,
    pub freed_allocation_size: u64,
    pub total_number_of_frees: u64,
    pub size_p50: u64,
    pub size_p90: u64,
    pub size_p99: u64,
    pub size_max: u64,
    pub memory: ProcessMemory,
}

impl StatsSnapshot {
    /// Live tracked bytes as a fraction of RSS (0.0 if RSS is unknown)
    pub fn memory_efficiency(&self) -> f64 {
        if self.memory.vm_rss == 0 {
            return 0.0;
        }
        self.current_size_allocated as f64 / self.memory.vm_rss as f64
    }

    /// RSS bytes not accounted for by live blocks
    pub fn memory_overhead_bytes(&self) -> u64 {
        self.memory.vm_rss.saturating_sub(self.current_size_allocated)
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Allocator tracking:")?;
        writeln!(f, "  Peak size allocated:     {}", self.peak_size_allocated)?;
        writeln!(f, "  Total size allocated:    {}", self.total_size_allocated)?;
        writeln!(f, "  Total allocations:       {}", self.total_number_of_allocations)?;
        writeln!(f, "  Total frees:             {}", self.total_number_of_frees)?;
        writeln!(f, "  Current size allocated:  {}", self.current_size_allocated)?;
        writeln!(f, "  Current allocations:     {}", self.current_number_of_allocations)?;
        writeln!(f, "  Freed allocation size:   {}", self.freed_allocation_size)?;
        writeln!(f, "Process memory:")?;
        write!(f, "{}", self.memory)?;
        writeln!(f, "Analysis:")?;
        writeln!(f, "  Memory efficiency:       {:.2}%", self.memory_efficiency() * 100.0)?;
        writeln!(f, "  Memory overhead:         {} bytes", self.memory_overhead_bytes())
    }
}
