//! JSON run summary
//!
//! The summary holds the effective configuration, run totals and the final
//! snapshot, so a single file is enough to reproduce and compare runs.

use crate::config::Config;
use crate::runner::RunSummary;
use crate::stats::StatsSnapshot;
use crate::util::time::format_duration;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Run identification
#[derive(Debug, Serialize)]
pub struct JsonRunInfo<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub end_time: String,
    pub duration: JsonDuration,
    pub config: &'a Config,
}

/// Step and block totals
#[derive(Debug, Serialize)]
pub struct JsonRunTotals {
    pub steps: u64,
    pub steps_per_sec: f64,
    pub alloc_steps: u64,
    pub free_steps: u64,
    pub idle_steps: u64,
    pub expired_blocks: u64,
    pub peak_live_blocks: usize,
    pub live_blocks_at_end: usize,
    pub live_bytes_at_end: u64,
}

/// Complete JSON document
#[derive(Debug, Serialize)]
pub struct JsonRunOutput<'a> {
    pub run_info: JsonRunInfo<'a>,
    pub totals: JsonRunTotals,
    pub final_snapshot: &'a StatsSnapshot,
}

/// Assemble the JSON document for a finished run
pub fn build_json_output<'a>(config: &'a Config, summary: &'a RunSummary) -> JsonRunOutput<'a> {
    JsonRunOutput {
        run_info: JsonRunInfo {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            end_time: summary.final_snapshot.timestamp.to_rfc3339(),
            duration: JsonDuration::from_duration(summary.elapsed),
            config,
        },
        totals: JsonRunTotals {
            steps: summary.steps,
            steps_per_sec: summary.step_rate(),
            alloc_steps: summary.alloc_steps,
            free_steps: summary.free_steps,
            idle_steps: summary.idle_steps,
            expired_blocks: summary.expired,
            peak_live_blocks: summary.peak_live_blocks,
            live_blocks_at_end: summary.live_blocks_at_end,
            live_bytes_at_end: summary.live_bytes_at_end,
        },
        final_snapshot: &summary.final_snapshot,
    }
}

/// Write JSON output to file
pub fn write_json_output(output_path: &Path, output: &JsonRunOutput<'_>, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, output)?;
    } else {
        serde_json::to_writer(&mut writer, output)?;
    }

    writer.flush()?;
    Ok(())
}
