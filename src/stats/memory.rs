//! Process memory counters
//!
//! Reads `/proc/self/status` on Linux. On other systems (or if the file is
//! unreadable) every counter stays at zero.

use serde::Serialize;
use std::fmt;
use std::fs;

/// Memory counters of the current process, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessMemory {
    /// Peak virtual memory size (VmPeak)
    pub vm_peak: u64,
    /// Virtual memory size (VmSize)
    pub vm_size: u64,
    /// Resident set size (VmRSS)
    pub vm_rss: u64,
    /// Peak resident set size (VmHWM)
    pub vm_hwm: u64,
    /// Data segment size (VmData)
    pub vm_data: u64,
    /// Stack size (VmStk)
    pub vm_stk: u64,
    /// Text segment size (VmExe)
    pub vm_exe: u64,
    /// Shared library code size (VmLib)
    pub vm_lib: u64,
}

impl ProcessMemory {
    /// Sample the current process
    ///
    /// Returns `None` if `/proc/self/status` cannot be read.
    pub fn sample() -> Option<Self> {
        let status = fs::read_to_string("/proc/self/status").ok()?;
        Some(Self::parse_status(&status))
    }

    /// Sample, falling back to all-zero counters
    pub fn sample_or_default() -> Self {
        Self::sample().unwrap_or_default()
    }

    /// Parse the contents of a `/proc/<pid>/status` file
    pub fn parse_status(status: &str) -> Self {
        let mut mem = Self::default();

        for line in status.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            // VmRSS:     12345 kB
            let bytes = value
                .split_whitespace()
                .next()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0)
                * 1024;

            match key.trim() {
                "VmPeak" => mem.vm_peak = bytes,
                "VmSize" => mem.vm_size = bytes,
                "VmRSS" => mem.vm_rss = bytes,
                "VmHWM" => mem.vm_hwm = bytes,
                "VmData" => mem.vm_data = bytes,
                "VmStk" => mem.vm_stk = bytes,
                "VmExe" => mem.vm_exe = bytes,
                "VmLib" => mem.vm_lib = bytes,
                _ => {}
            }
        }

        mem
    }
}

impl fmt::Display for ProcessMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Peak Virtual Memory (VmPeak):  {} bytes", self.vm_peak)?;
        writeln!(f, "  Virtual Memory Size (VmSize):  {} bytes", self.vm_size)?;
        writeln!(f, "  Resident Set Size (VmRSS):     {} bytes", self.vm_rss)?;
        writeln!(f, "  Peak Resident Size (VmHWM):    {} bytes", self.vm_hwm)?;
        writeln!(f, "  Data Segment (VmData):         {} bytes", self.vm_data)?;
        writeln!(f, "  Stack Size (VmStk):            {} bytes", self.vm_stk)?;
        writeln!(f, "  Text Segment (VmExe):          {} bytes", self.vm_exe)?;
        writeln!(f, "  Shared Libraries (VmLib):      {} bytes", self.vm_lib)
    }
}
