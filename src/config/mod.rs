//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;
pub mod workload;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use workload::*;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Shape of the allocation workload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Eviction policy for free steps
    #[serde(default)]
    pub policy: EvictionPolicy,
    /// Maximum number of live blocks
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Probability [0, 1] that a step below capacity allocates
    #[serde(default = "default_alloc_frequency")]
    pub alloc_frequency: f64,
    /// Smallest block size in bytes
    #[serde(default = "default_min_size")]
    pub min_size: usize,
    /// Largest block size in bytes
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Size evolution over time
    #[serde(default)]
    pub size_trend: SizeTrend,
    /// Cursor increment for grow/shrink/saw trends
    #[serde(default = "default_size_step")]
    pub size_step: usize,
    /// Symmetric +- jitter applied to `size_step`
    #[serde(default)]
    pub trend_jitter: usize,
    /// Fixed block sizes (empty = use trend/distribution)
    #[serde(default)]
    pub size_list: Vec<usize>,
    /// Weights for `size_list` (empty = uniform)
    #[serde(default)]
    pub size_weights: Vec<usize>,
    /// How `size_list` is applied
    #[serde(default)]
    pub size_mode: SizeMode,
    /// Size distribution for the `none` trend
    #[serde(default)]
    pub distribution: SizeDistribution,
    /// Lifetime assignment
    #[serde(default)]
    pub ttl_mode: TtlMode,
    /// Lifetime in steps for `fixed` mode (negative = immortal)
    #[serde(default = "default_ttl_fixed")]
    pub ttl_fixed: i64,
    /// Lifetimes for `list` mode
    #[serde(default)]
    pub ttl_list: Vec<i64>,
    /// Weights for `ttl_list` (empty = uniform)
    #[serde(default)]
    pub ttl_weights: Vec<usize>,
}

fn default_capacity() -> usize {
    10_000
}

fn default_alloc_frequency() -> f64 {
    0.7
}

fn default_min_size() -> usize {
    16
}

fn default_max_size() -> usize {
    1 << 20
}

fn default_size_step() -> usize {
    1 << 10
}

fn default_ttl_fixed() -> i64 {
    10
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            policy: EvictionPolicy::default(),
            capacity: default_capacity(),
            alloc_frequency: default_alloc_frequency(),
            min_size: default_min_size(),
            max_size: default_max_size(),
            size_trend: SizeTrend::default(),
            size_step: default_size_step(),
            trend_jitter: 0,
            size_list: Vec::new(),
            size_weights: Vec::new(),
            size_mode: SizeMode::default(),
            distribution: SizeDistribution::default(),
            ttl_mode: TtlMode::default(),
            ttl_fixed: default_ttl_fixed(),
            ttl_list: Vec::new(),
            ttl_weights: Vec::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV snapshot file path
    pub csv_output: Option<PathBuf>,
    /// JSON summary file path
    pub json_output: Option<PathBuf>,
    /// Snapshot every N steps
    #[serde(default = "default_snap_interval")]
    pub snap_interval: u64,
    /// Show a live progress line
    #[serde(default)]
    pub display: bool,
}

fn default_snap_interval() -> u64 {
    1000
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_output: None,
            json_output: None,
            snap_interval: default_snap_interval(),
            display: false,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// RNG seed (0 = wall-clock time)
    #[serde(default)]
    pub seed: u64,
    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
    /// When to stop stepping
    #[serde(default)]
    pub completion: CompletionMode,
}

// Display trait implementations

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Workload: {}", self.workload)?;
        writeln!(f, "  Sizes: {}", SizeSummary(&self.workload))?;
        writeln!(f, "  Lifetime: {}", TtlSummary(&self.workload))?;
        writeln!(f, "  Output: {}", self.output)?;
        writeln!(f, "  Runtime: {}", self.runtime)?;
        Ok(())
    }
}

impl fmt::Display for WorkloadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "policy={}, capacity={}, alloc_frequency={}",
            self.policy, self.capacity, self.alloc_frequency
        )
    }
}

struct SizeSummary<'a>(&'a WorkloadConfig);

impl fmt::Display for SizeSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.0;
        write!(
            f,
            "[{}, {}], trend={}",
            format_bytes(w.min_size as u64),
            format_bytes(w.max_size as u64),
            w.size_trend
        )?;
        if w.size_trend != SizeTrend::None {
            write!(f, " step={} jitter={}", format_bytes(w.size_step as u64), w.trend_jitter)?;
        } else {
            write!(f, ", distribution={}", w.distribution)?;
        }
        if !w.size_list.is_empty() {
            write!(f, ", list={:?} mode={}", w.size_list, w.size_mode)?;
            if !w.size_weights.is_empty() {
                write!(f, " weights={:?}", w.size_weights)?;
            }
        }
        Ok(())
    }
}

struct TtlSummary<'a>(&'a WorkloadConfig);

impl fmt::Display for TtlSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.0;
        match w.ttl_mode {
            TtlMode::Off => write!(f, "off"),
            TtlMode::Fixed => write!(f, "fixed({} steps)", w.ttl_fixed),
            TtlMode::List => {
                write!(f, "list={:?}", w.ttl_list)?;
                if !w.ttl_weights.is_empty() {
                    write!(f, " weights={:?}", w.ttl_weights)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut outputs = Vec::new();
        if let Some(ref path) = self.csv_output {
            outputs.push(format!("csv={}", path.display()));
        }
        if let Some(ref path) = self.json_output {
            outputs.push(format!("json={}", path.display()));
        }
        if self.display {
            outputs.push("progress".to_string());
        }
        if outputs.is_empty() {
            write!(f, "summary only")?;
        } else {
            write!(f, "{}", outputs.join(", "))?;
        }
        write!(f, ", snapshot every {} steps", self.snap_interval)
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "completion={}, seed={}", self.completion, self.seed)?;
        if self.debug {
            write!(f, ", debug")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let w = WorkloadConfig::default();
        assert_eq!(w.policy, EvictionPolicy::Lifo);
        assert_eq!(w.capacity, 10_000);
        assert_eq!(w.alloc_frequency, 0.7);
        assert_eq!(w.min_size, 16);
        assert_eq!(w.max_size, 1 << 20);
        assert_eq!(w.size_step, 1024);
        assert_eq!(w.ttl_fixed, 10);
        assert_eq!(Config::default().output.snap_interval, 1000);
    }

    #[test]
    fn test_display_mentions_key_fields() {
        let mut config = Config::default();
        config.workload.ttl_mode = TtlMode::Fixed;
        config.workload.size_list = vec![64, 128];
        let text = config.to_string();
        assert!(text.contains("policy=lifo"));
        assert!(text.contains("fixed(10 steps)"));
        assert!(text.contains("list=[64, 128]"));
    }
}
