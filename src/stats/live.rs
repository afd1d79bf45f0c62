//! Live progress line
//!
//! Prints a single carriage-return line with the step counter, live block
//! count and allocation rate while a run is in progress. Updates are rate
//! limited by [`LiveStats::should_update`] so the hot loop can poll it every
//! step.
//!
//! # Example
//!
//! ```no_run
//! use memstress::stats::live::LiveStats;
//! use memstress::stats::AllocStats;
//! use std::time::Duration;
//!
//! let mut live = LiveStats::new(Duration::from_millis(100));
//! let stats = AllocStats::new();
//!
//! if live.should_update() {
//!     live.update(10, &stats);
//!     live.display_console(Some(1000));
//! }
//! ```

use crate::config::workload::format_bytes;
use crate::stats::AllocStats;
use crate::util::time::{calculate_rate, format_rate};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Progress tracker for the console
#[derive(Debug)]
pub struct LiveStats {
    interval: Duration,
    last_update: Instant,
    last: LiveSnapshot,
    current: LiveSnapshot,
    update_count: u64,
    run_start: Instant,
}

#[derive(Debug, Clone, Copy)]
struct LiveSnapshot {
    timestamp: Instant,
    step: u64,
    total_allocs: u64,
    total_frees: u64,
    live_blocks: u64,
    live_bytes: u64,
}

impl LiveSnapshot {
    fn zero(now: Instant) -> Self {
        Self {
            timestamp: now,
            step: 0,
            total_allocs: 0,
            total_frees: 0,
            live_blocks: 0,
            live_bytes: 0,
        }
    }
}

impl LiveStats {
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            interval,
            last_update: now,
            last: LiveSnapshot::zero(now),
            current: LiveSnapshot::zero(now),
            update_count: 0,
            run_start: now,
        }
    }

    /// `true` once `interval` has passed since the last update
    #[inline]
    pub fn should_update(&self) -> bool {
        self.last_update.elapsed() >= self.interval
    }

    /// Record the counters at `step`
    pub fn update(&mut self, step: u64, stats: &AllocStats) {
        let now = Instant::now();
        self.last = self.current;
        self.current = LiveSnapshot {
            timestamp: now,
            step,
            total_allocs: stats.total_allocs(),
            total_frees: stats.total_frees(),
            live_blocks: stats.current_allocs(),
            live_bytes: stats.current_bytes(),
        };
        self.last_update = now;
        self.update_count += 1;
    }

    /// Allocations per second since the previous update
    pub fn alloc_rate(&self) -> f64 {
        let elapsed = self.current.timestamp.duration_since(self.last.timestamp);
        calculate_rate(self.current.total_allocs - self.last.total_allocs, elapsed)
    }

    /// Steps per second since the previous update
    pub fn step_rate(&self) -> f64 {
        let elapsed = self.current.timestamp.duration_since(self.last.timestamp);
        calculate_rate(self.current.step - self.last.step, elapsed)
    }

    /// Render the progress line without printing it
    pub fn render(&self, total_steps: Option<u64>) -> String {
        let elapsed = self.run_start.elapsed().as_secs();
        let step = match total_steps {
            Some(total) => format!("{}/{}", self.current.step, total),
            None => self.current.step.to_string(),
        };

        format!(
            "[{:3}s] step {} ({} steps/s) live: {} ({}) allocs: {} frees: {} ({} allocs/s)",
            elapsed,
            step,
            format_rate(self.step_rate()),
            self.current.live_blocks,
            format_bytes(self.current.live_bytes),
            self.current.total_allocs,
            self.current.total_frees,
            format_rate(self.alloc_rate()),
        )
    }

    /// Overwrite the current terminal line with the progress line
    pub fn display_console(&self, total_steps: Option<u64>) {
        print!("\r{}   ", self.render(total_steps));
        io::stdout().flush().ok();
    }

    /// Terminate the progress line so later output starts on a fresh line
    pub fn finish(&self) {
        if self.update_count > 0 {
            println!();
        }
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}
