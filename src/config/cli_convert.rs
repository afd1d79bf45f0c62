//! Conversion from CLI arguments to `Config`

use super::cli::{Cli, DistributionArg, PolicyArg, SizeModeArg, TrendArg, TtlModeArg};
use super::workload::*;
use super::Config;
use anyhow::{Context, Result};
use tracing::debug;

/// Parse a size string (e.g., "4k", "1M", "1G") to bytes
pub fn parse_size(s: &str) -> Result<usize> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("k") || s.ends_with("kb") {
        (s.trim_end_matches("kb").trim_end_matches("k"), 1usize << 10)
    } else if s.ends_with("m") || s.ends_with("mb") {
        (s.trim_end_matches("mb").trim_end_matches("m"), 1 << 20)
    } else if s.ends_with("g") || s.ends_with("gb") {
        (s.trim_end_matches("gb").trim_end_matches("g"), 1 << 30)
    } else {
        (s.trim_end_matches("b"), 1)
    };

    let num: usize = num_str
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size overflows: {}", s))
}

/// Parse a duration string (e.g., "60s", "5m", "1h") to seconds
pub fn parse_duration(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("sec") || s.ends_with("s") {
        (s.trim_end_matches("sec").trim_end_matches("s"), 1u64)
    } else if s.ends_with("min") || s.ends_with("m") {
        (s.trim_end_matches("min").trim_end_matches("m"), 60)
    } else if s.ends_with("hr") || s.ends_with("h") {
        (s.trim_end_matches("hr").trim_end_matches("h"), 3600)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Duration overflows: {}", s))
}

/// Parse a comma-separated list of sizes (e.g., "64,1k,4k")
pub fn parse_size_list(s: &str) -> Result<Vec<usize>> {
    split_list(s).map(parse_size).collect()
}

/// Parse a comma-separated list of weights
pub fn parse_weight_list(s: &str) -> Result<Vec<usize>> {
    split_list(s)
        .map(|item| {
            item.parse::<usize>()
                .with_context(|| format!("Invalid weight: {}", item))
        })
        .collect()
}

/// Parse a comma-separated list of lifetimes (negative = immortal)
pub fn parse_ttl_list(s: &str) -> Result<Vec<i64>> {
    split_list(s)
        .map(|item| {
            item.parse::<i64>()
                .with_context(|| format!("Invalid lifetime: {}", item))
        })
        .collect()
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Convert CLI policy to workload policy
pub fn convert_policy(arg: PolicyArg) -> EvictionPolicy {
    match arg {
        PolicyArg::Lifo => EvictionPolicy::Lifo,
        PolicyArg::Fifo => EvictionPolicy::Fifo,
        PolicyArg::Random => EvictionPolicy::Random,
        PolicyArg::BigFirst => EvictionPolicy::BigFirst,
        PolicyArg::SmallFirst => EvictionPolicy::SmallFirst,
        PolicyArg::Never => EvictionPolicy::Never,
    }
}

/// Convert CLI trend to workload trend
pub fn convert_trend(arg: TrendArg) -> SizeTrend {
    match arg {
        TrendArg::None => SizeTrend::None,
        TrendArg::Grow => SizeTrend::Grow,
        TrendArg::Shrink => SizeTrend::Shrink,
        TrendArg::Saw => SizeTrend::Saw,
    }
}

/// Convert CLI size mode to workload size mode
pub fn convert_size_mode(arg: SizeModeArg) -> SizeMode {
    match arg {
        SizeModeArg::Exact => SizeMode::Exact,
        SizeModeArg::Nearest => SizeMode::Nearest,
    }
}

/// Convert CLI TTL mode to workload TTL mode
pub fn convert_ttl_mode(arg: TtlModeArg) -> TtlMode {
    match arg {
        TtlModeArg::Off => TtlMode::Off,
        TtlModeArg::Fixed => TtlMode::Fixed,
        TtlModeArg::List => TtlMode::List,
    }
}

/// Build the size distribution from the CLI kind and its parameter
///
/// When only `--dist-param` is given, the parameter is applied to the
/// distribution already present in `current`.
pub fn convert_distribution(
    arg: Option<DistributionArg>,
    param: Option<f64>,
    current: SizeDistribution,
) -> SizeDistribution {
    let kind = arg.unwrap_or(match current {
        SizeDistribution::Uniform => DistributionArg::Uniform,
        SizeDistribution::Exponential { .. } => DistributionArg::Exp,
        SizeDistribution::PowerLaw { .. } => DistributionArg::Powerlaw,
    });
    let current_param = match current {
        SizeDistribution::Uniform => 1.0,
        SizeDistribution::Exponential { lambda } => lambda,
        SizeDistribution::PowerLaw { alpha } => alpha,
    };
    let param = param.unwrap_or(current_param);

    match kind {
        DistributionArg::Uniform => SizeDistribution::Uniform,
        DistributionArg::Exp => SizeDistribution::Exponential { lambda: param },
        DistributionArg::Powerlaw => SizeDistribution::PowerLaw { alpha: param },
    }
}

/// Build the run configuration from CLI arguments
///
/// Loads the `--config` file first when present, then applies every flag
/// that was given on the command line.
pub fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => super::toml::parse_toml_file(path)?,
        None => Config::default(),
    };

    apply_cli(cli, base)
}

/// Override `config` with the flags present in `cli`
pub fn apply_cli(cli: &Cli, mut config: Config) -> Result<Config> {
    let workload = &mut config.workload;

    if let Some(policy) = cli.policy {
        workload.policy = convert_policy(policy);
    }
    if let Some(freq) = cli.alloc_freq {
        workload.alloc_frequency = freq;
    }
    if let Some(capacity) = cli.capacity {
        workload.capacity = capacity;
    }
    if let Some(ref s) = cli.min_size {
        workload.min_size = parse_size(s).context("--min-size")?;
    }
    if let Some(ref s) = cli.max_size {
        workload.max_size = parse_size(s).context("--max-size")?;
    }
    if let Some(trend) = cli.size_trend {
        workload.size_trend = convert_trend(trend);
    }
    if let Some(ref s) = cli.size_step {
        workload.size_step = parse_size(s).context("--size-step")?;
    }
    if let Some(ref s) = cli.trend_jitter {
        workload.trend_jitter = parse_size(s).context("--trend-jitter")?;
    }
    if let Some(ref s) = cli.size_list {
        workload.size_list = parse_size_list(s).context("--size-list")?;
    }
    if let Some(mode) = cli.size_mode {
        workload.size_mode = convert_size_mode(mode);
    }
    if let Some(ref s) = cli.size_weights {
        workload.size_weights = parse_weight_list(s).context("--size-weights")?;
    }
    workload.distribution = convert_distribution(cli.distribution, cli.dist_param, workload.distribution);

    if let Some(mode) = cli.ttl_mode {
        workload.ttl_mode = convert_ttl_mode(mode);
    }
    if let Some(ttl) = cli.ttl_fixed {
        workload.ttl_fixed = ttl;
    }
    if let Some(ref s) = cli.ttl_list {
        workload.ttl_list = parse_ttl_list(s).context("--ttl-list")?;
    }
    if let Some(ref s) = cli.ttl_weights {
        workload.ttl_weights = parse_weight_list(s).context("--ttl-weights")?;
    }

    // A min above max widens the range rather than failing
    if cli.min_size.is_some() && workload.min_size > workload.max_size {
        debug!(
            min_size = workload.min_size,
            max_size = workload.max_size,
            "raising max_size to min_size"
        );
        workload.max_size = workload.min_size;
    }

    if let Some(count) = cli.iterations {
        config.runtime.completion = CompletionMode::Iterations { count };
    } else if let Some(ref s) = cli.duration {
        let seconds = parse_duration(s).context("--duration")?;
        config.runtime.completion = CompletionMode::Duration { seconds };
    }
    if let Some(seed) = cli.seed {
        config.runtime.seed = seed;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    if let Some(interval) = cli.snap_interval {
        config.output.snap_interval = interval;
    }
    if let Some(ref path) = cli.output {
        config.output.csv_output = Some(path.clone());
    }
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if cli.display {
        config.output.display = true;
    }

    Ok(config)
}
