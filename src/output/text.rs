//! Human-readable text output

use crate::config::workload::format_bytes;
use crate::config::Config;
use crate::runner::RunSummary;
use crate::util::time::{format_duration, format_number, format_rate};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Print run results to stdout
pub fn print_results(summary: &RunSummary, config: &Config) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // stdout going away mid-report is not worth failing the run for
    let _ = write_results(&mut out, summary, config);
}

/// Render the results report
///
/// Sections: steps and rates, block totals, size histogram, process memory
/// at the end of the run.
pub fn write_results<W: Write>(out: &mut W, summary: &RunSummary, config: &Config) -> io::Result<()> {
    let snap = &summary.final_snapshot;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "                    RUN RESULTS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;

    writeln!(out, "Elapsed Time: {}", format_duration(summary.elapsed))?;
    writeln!(out)?;

    writeln!(out, "Steps:")?;
    writeln!(
        out,
        "  Total:    {} ({} steps/s)",
        format_number(summary.steps),
        format_rate(summary.step_rate())
    )?;
    writeln!(out, "  Alloc:    {}", format_number(summary.alloc_steps))?;
    writeln!(out, "  Free:     {}", format_number(summary.free_steps))?;
    if summary.idle_steps > 0 {
        writeln!(out, "  Idle:     {}", format_number(summary.idle_steps))?;
    }
    if summary.expired > 0 {
        writeln!(out, "  Expired:  {} blocks", format_number(summary.expired))?;
    }
    writeln!(out)?;

    writeln!(out, "Blocks:")?;
    writeln!(
        out,
        "  Allocations: {} ({})",
        format_number(snap.total_number_of_allocations),
        format_bytes(snap.total_size_allocated)
    )?;
    writeln!(
        out,
        "  Frees:       {} ({})",
        format_number(snap.total_number_of_frees),
        format_bytes(snap.freed_allocation_size)
    )?;
    writeln!(
        out,
        "  Peak live:   {} blocks, {}",
        format_number(summary.peak_live_blocks as u64),
        format_bytes(snap.peak_size_allocated)
    )?;
    writeln!(
        out,
        "  At end:      {} blocks, {} (capacity {})",
        format_number(summary.live_blocks_at_end as u64),
        format_bytes(summary.live_bytes_at_end),
        format_number(config.workload.capacity as u64)
    )?;
    writeln!(out)?;

    writeln!(out, "Block Sizes:")?;
    if snap.total_number_of_allocations > 0 {
        writeln!(out, "  p50:  {}", format_bytes(snap.size_p50))?;
        writeln!(out, "  p90:  {}", format_bytes(snap.size_p90))?;
        writeln!(out, "  p99:  {}", format_bytes(snap.size_p99))?;
        writeln!(out, "  Max:  {}", format_bytes(snap.size_max))?;
    } else {
        writeln!(out, "  No allocations made")?;
    }
    writeln!(out)?;

    writeln!(out, "Process memory:")?;
    write!(out, "{}", snap.memory)?;
    if snap.memory.vm_rss > 0 {
        writeln!(out, "  Tracked / RSS at end:          {:.2}%", snap.memory_efficiency() * 100.0)?;
    }
    writeln!(out)?;

    writeln!(out, "{}", RULE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::workload::CompletionMode;
    use crate::runner::Runner;

    #[test]
    fn test_report_sections() {
        let mut config = Config::default();
        config.workload.capacity = 4;
        config.workload.alloc_frequency = 1.0;
        config.workload.min_size = 256;
        config.workload.max_size = 256;
        config.runtime.seed = 1;
        config.runtime.completion = CompletionMode::Iterations { count: 20 };
        let summary = Runner::new(&config).run().unwrap();

        let mut buf = Vec::new();
        write_results(&mut buf, &summary, &config).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("RUN RESULTS"));
        assert!(text.contains("Alloc:    12"), "{}", text);
        assert!(text.contains("Free:     8"), "{}", text);
        assert!(text.contains("At end:      4 blocks, 1.00KB (capacity 4)"), "{}", text);
        assert!(text.contains("p50:  256B"), "{}", text);
    }
}
