//! memstress - synthetic allocation workload generator
//!
//! memstress repeatedly decides to allocate or free heap blocks, drawing block
//! sizes, lifetimes and eviction order from configurable statistical models,
//! so an allocator can be observed under a reproducible load.
//!
//! # Architecture
//!
//! - **Deterministic sampling**: seeded xorshift64* engine with uniform,
//!   exponential, power-law and weighted discrete draws
//! - **Block pool**: live blocks in insertion order, six eviction policies,
//!   per-step lifetime aging
//! - **Workload controller**: per-step allocate/evict decision, size trends
//!   (grow, shrink, saw) and size lists
//! - **Statistics**: allocation counters, size histogram, `/proc` memory
//!   counters, CSV/JSON/text reports

pub mod config;
pub mod output;
pub mod pool;
pub mod random;
pub mod runner;
pub mod stats;
pub mod util;
pub mod workload;

// Re-export commonly used types
pub use config::Config;
pub use pool::BlockPool;
pub use random::RandomEngine;
pub use runner::{RunSummary, Runner};
pub use stats::{AllocStats, Tracker};
pub use workload::{StepOutcome, WorkloadController};

/// Result type used throughout memstress
pub type Result<T> = anyhow::Result<T>;
