//! Run driver
//!
//! [`Runner`] owns the outer loop around a [`WorkloadController`]: it steps
//! until the completion condition is met, records snapshots at the configured
//! interval, keeps the optional progress line fresh, and drains the pool at
//! the end so every allocation is matched by a free.
//!
//! Snapshot rows are taken at step 0, after every `snap_interval` steps, and
//! once more after the final drain.

use crate::config::validator::validate_config;
use crate::config::workload::CompletionMode;
use crate::config::Config;
use crate::output::csv::CsvWriter;
use crate::random::RandomEngine;
use crate::stats::live::LiveStats;
use crate::stats::{AllocStats, StatsSnapshot};
use crate::workload::{StepOutcome, WorkloadController};
use crate::Result;
use anyhow::Context;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Progress line refresh period
const LIVE_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Steps executed
    pub steps: u64,
    /// Wall-clock time spent stepping (drain excluded)
    pub elapsed: Duration,
    /// Steps that allocated a block
    pub alloc_steps: u64,
    /// Steps that evicted a block
    pub free_steps: u64,
    /// Steps that did neither
    pub idle_steps: u64,
    /// Blocks released by TTL expiry
    pub expired: u64,
    /// Highest live block count observed after a step
    pub peak_live_blocks: usize,
    /// Live blocks when stepping stopped
    pub live_blocks_at_end: usize,
    /// Live bytes when stepping stopped
    pub live_bytes_at_end: u64,
    /// Snapshot rows written to CSV
    pub snapshots_written: u64,
    /// Counters after the final drain
    pub final_snapshot: StatsSnapshot,
}

impl RunSummary {
    /// Steps per second
    pub fn step_rate(&self) -> f64 {
        crate::util::time::calculate_rate(self.steps, self.elapsed)
    }
}

/// Drives one workload from a validated [`Config`]
pub struct Runner<'a> {
    config: &'a Config,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Execute the workload to completion
    pub fn run(&self) -> Result<RunSummary> {
        validate_config(self.config).context("Invalid configuration")?;

        let workload = self.config.workload.clone();
        let output = &self.config.output;
        let runtime = &self.config.runtime;

        let rng = RandomEngine::seeded(runtime.seed);
        let mut controller = WorkloadController::new(workload, rng, AllocStats::new())
            .context("Invalid workload configuration")?;

        let mut csv = match output.csv_output {
            Some(ref path) => {
                info!(path = %path.display(), "writing snapshots");
                Some(CsvWriter::create(path)?)
            }
            None => None,
        };

        let mut live = output.display.then(|| LiveStats::new(LIVE_INTERVAL));
        let total_steps = match runtime.completion {
            CompletionMode::Iterations { count } => Some(count),
            CompletionMode::Duration { .. } => None,
        };

        let snap_interval = output.snap_interval;
        let mut snapshots_written = 0;
        let mut record = |csv: &mut Option<CsvWriter>, snapshot: &StatsSnapshot| {
            if let Some(writer) = csv.as_mut() {
                match writer.append_snapshot(snapshot) {
                    Ok(()) => snapshots_written += 1,
                    Err(e) => warn!(step = snapshot.step, error = %e, "failed to write snapshot"),
                }
            }
        };

        record(&mut csv, &controller.tracker().snapshot(0));

        let mut summary_counts = StepCounts::default();
        let start = Instant::now();

        while !finished(runtime.completion, controller.steps(), start) {
            let report = controller.step();
            summary_counts.add(report.outcome, report.pruned);
            summary_counts.peak_live = summary_counts.peak_live.max(controller.pool().count());

            let step = controller.steps();
            if step % snap_interval == 0 {
                let snapshot = controller.tracker().snapshot(step);
                debug!(
                    step,
                    live_blocks = snapshot.current_number_of_allocations,
                    live_bytes = snapshot.current_size_allocated,
                    rss = snapshot.memory.vm_rss,
                    "snapshot"
                );
                record(&mut csv, &snapshot);
            }

            if let Some(live) = live.as_mut() {
                if live.should_update() {
                    live.update(step, controller.tracker());
                    live.display_console(total_steps);
                }
            }
        }

        let elapsed = start.elapsed();
        if let Some(live) = live.as_mut() {
            live.update(controller.steps(), controller.tracker());
            live.display_console(total_steps);
            live.finish();
        }

        let live_blocks_at_end = controller.pool().count();
        let live_bytes_at_end = controller.pool().live_bytes();
        let drained = controller.drain();
        debug!(drained, "pool drained");

        let final_snapshot = controller.tracker().snapshot(controller.steps());
        record(&mut csv, &final_snapshot);

        if let Some(mut writer) = csv {
            if let Err(e) = writer.flush() {
                warn!(error = %e, "failed to flush CSV output");
            }
        }

        info!(
            steps = controller.steps(),
            elapsed_ms = elapsed.as_millis() as u64,
            "run complete"
        );

        Ok(RunSummary {
            steps: controller.steps(),
            elapsed,
            alloc_steps: summary_counts.allocs,
            free_steps: summary_counts.frees,
            idle_steps: summary_counts.idle,
            expired: summary_counts.expired,
            peak_live_blocks: summary_counts.peak_live,
            live_blocks_at_end,
            live_bytes_at_end,
            snapshots_written,
            final_snapshot,
        })
    }
}

#[derive(Debug, Default)]
struct StepCounts {
    allocs: u64,
    frees: u64,
    idle: u64,
    expired: u64,
    peak_live: usize,
}

impl StepCounts {
    fn add(&mut self, outcome: StepOutcome, pruned: usize) {
        match outcome {
            StepOutcome::Allocated { .. } => self.allocs += 1,
            StepOutcome::Freed { .. } => self.frees += 1,
            StepOutcome::Idle => self.idle += 1,
        }
        self.expired += pruned as u64;
    }
}

fn finished(completion: CompletionMode, steps: u64, start: Instant) -> bool {
    match completion {
        CompletionMode::Iterations { count } => steps >= count,
        CompletionMode::Duration { seconds } => start.elapsed() >= Duration::from_secs(seconds),
    }
}
