//! CLI argument parsing using clap
//!
//! Every workload flag is optional: unset flags fall back to the TOML file
//! given with `--config`, then to the built-in defaults.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// memstress - synthetic allocation workload generator
#[derive(Parser, Debug, Default)]
#[command(name = "memstress")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (CLI flags take precedence)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // === General run control ===
    /// Free policy [default: lifo]
    #[arg(short = 'p', long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Total alloc/free steps [default: 10000]
    #[arg(short = 'n', long, conflicts_with = "duration")]
    pub iterations: Option<u64>,

    /// Run for this long instead of a step count (e.g., 30s, 5m)
    #[arg(short = 'd', long)]
    pub duration: Option<String>,

    /// Probability [0, 1] that a step allocates while below capacity [default: 0.7]
    #[arg(short = 'f', long = "alloc-freq")]
    pub alloc_freq: Option<f64>,

    /// RNG seed, 0 = wall-clock time [default: 0]
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    // === Pool sizing ===
    /// Max live blocks [default: 10000]
    #[arg(short = 'c', long)]
    pub capacity: Option<usize>,

    // === Block size ===
    /// Min block size (e.g., 16, 4k) [default: 16]
    #[arg(short = 'a', long = "min-size")]
    pub min_size: Option<String>,

    /// Max block size (e.g., 64k, 1M) [default: 1M]
    #[arg(short = 'A', long = "max-size")]
    pub max_size: Option<String>,

    /// Block size evolution over time; 'none' draws sizes from the distribution
    #[arg(long = "size-trend", value_enum)]
    pub size_trend: Option<TrendArg>,

    /// Cursor step for grow/shrink/saw trends [default: 1k]
    #[arg(long = "size-step")]
    pub size_step: Option<String>,

    /// Uniform +- jitter added to the trend step [default: 0]
    #[arg(long = "trend-jitter")]
    pub trend_jitter: Option<String>,

    /// Only use these block sizes (comma-separated, e.g., 64,1k,4k)
    #[arg(long = "size-list")]
    pub size_list: Option<String>,

    /// How the size list is used; 'nearest' snaps trend/distribution sizes to it
    #[arg(long = "size-mode", value_enum)]
    pub size_mode: Option<SizeModeArg>,

    /// Weights for the size list (comma-separated)
    #[arg(long = "size-weights")]
    pub size_weights: Option<String>,

    // === Block size distribution ===
    /// Size distribution [default: uniform]
    #[arg(short = 'P', long, value_enum)]
    pub distribution: Option<DistributionArg>,

    /// Distribution parameter: lambda for exp, alpha for powerlaw [default: 1.0]
    #[arg(short = 'r', long = "dist-param")]
    pub dist_param: Option<f64>,

    // === Block lifetime ===
    /// Lifetime mode [default: off]
    #[arg(long = "ttl-mode", value_enum)]
    pub ttl_mode: Option<TtlModeArg>,

    /// Number of steps blocks live in 'fixed' mode [default: 10]
    #[arg(long = "ttl-fixed", allow_negative_numbers = true)]
    pub ttl_fixed: Option<i64>,

    /// Lifetimes for 'list' mode (comma-separated)
    #[arg(long = "ttl-list")]
    pub ttl_list: Option<String>,

    /// Weights for the lifetime list (comma-separated)
    #[arg(long = "ttl-weights")]
    pub ttl_weights: Option<String>,

    // === Instrumentation & output ===
    /// Snapshot statistics every N steps [default: 1000]
    #[arg(short = 'i', long = "snap-interval")]
    pub snap_interval: Option<u64>,

    /// Path to CSV metrics log
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Path to JSON summary
    #[arg(long = "json-output")]
    pub json_output: Option<PathBuf>,

    /// Display a live progress line
    #[arg(long)]
    pub display: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Eviction policy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Lifo,
    Fifo,
    Random,
    BigFirst,
    SmallFirst,
    Never,
}

/// Size trend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrendArg {
    None,
    Grow,
    Shrink,
    Saw,
}

/// Size list mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SizeModeArg {
    Exact,
    Nearest,
}

/// Size distribution selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistributionArg {
    Uniform,
    Exp,
    Powerlaw,
}

/// Lifetime mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TtlModeArg {
    Off,
    Fixed,
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from([
            "memstress", "-p", "big-first", "-n", "500", "-f", "0.5", "-c", "64", "-a", "32",
            "-A", "4k", "-P", "exp", "-r", "0.01",
        ])
        .unwrap();
        assert_eq!(cli.policy, Some(PolicyArg::BigFirst));
        assert_eq!(cli.iterations, Some(500));
        assert_eq!(cli.alloc_freq, Some(0.5));
        assert_eq!(cli.capacity, Some(64));
        assert_eq!(cli.min_size.as_deref(), Some("32"));
        assert_eq!(cli.max_size.as_deref(), Some("4k"));
        assert_eq!(cli.distribution, Some(DistributionArg::Exp));
        assert_eq!(cli.dist_param, Some(0.01));
    }

    #[test]
    fn test_iterations_conflicts_with_duration() {
        let result = Cli::try_parse_from(["memstress", "-n", "10", "-d", "5s"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(Cli::try_parse_from(["memstress", "--policy", "lru"]).is_err());
    }

    #[test]
    fn test_negative_ttl_fixed() {
        let cli = Cli::try_parse_from(["memstress", "--ttl-fixed", "-1"]).unwrap();
        assert_eq!(cli.ttl_fixed, Some(-1));
    }
}
