//! CSV snapshot output
//!
//! Writes a header row followed by one row per [`StatsSnapshot`]. Rows are
//! buffered; call [`CsvWriter::flush`] (or drop the writer) at the end of the
//! run.

use crate::stats::StatsSnapshot;
use crate::Result;
use anyhow::Context;
use chrono::SecondsFormat;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column names, in row order
pub const CSV_HEADER: &str = "timestamp,step,peak_size_allocated,total_size_allocated,\
total_number_of_allocations,current_size_allocated,current_number_of_allocations,\
freed_allocation_size,vm_peak_bytes,vm_size_bytes,vm_rss_bytes,vm_hwm_bytes,\
vm_data_bytes,vm_stk_bytes,vm_exe_bytes,vm_lib_bytes";

/// Time-series writer for allocation snapshots
pub struct CsvWriter<W: Write = BufWriter<File>> {
    out: W,
    rows: u64,
}

impl CsvWriter {
    /// Create (or truncate) `path` and write the header row
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV output {}", path.display()))?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap an arbitrary writer and emit the header row
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{}", CSV_HEADER)?;
        Ok(Self { out, rows: 0 })
    }

    /// Append one snapshot row
    pub fn append_snapshot(&mut self, snapshot: &StatsSnapshot) -> Result<()> {
        let mem = &snapshot.memory;
        writeln!(
            self.out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            snapshot.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            snapshot.step,
            snapshot.peak_size_allocated,
            snapshot.total_size_allocated,
            snapshot.total_number_of_allocations,
            snapshot.current_size_allocated,
            snapshot.current_number_of_allocations,
            snapshot.freed_allocation_size,
            mem.vm_peak,
            mem.vm_size,
            mem.vm_rss,
            mem.vm_hwm,
            mem.vm_data,
            mem.vm_stk,
            mem.vm_exe,
            mem.vm_lib,
        )?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far (header excluded)
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
