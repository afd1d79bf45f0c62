//! TOML configuration file parsing
//!
//! A config file mirrors the [`Config`] structure; every field is optional.
//!
//! ```toml
//! [workload]
//! policy = "big-first"
//! capacity = 4096
//! size_trend = "saw"
//! distribution = { powerlaw = { alpha = 1.5 } }
//! ttl_mode = "list"
//! ttl_list = [10, 100, -1]
//!
//! [runtime]
//! seed = 42
//! completion = { duration = { seconds = 30 } }
//! ```

use super::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Render a configuration back to TOML
pub fn to_toml_string(config: &Config) -> Result<String> {
    ::toml::to_string_pretty(config).context("Failed to serialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_empty_gives_defaults() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config.workload.capacity, 10_000);
        assert_eq!(config.output.snap_interval, 1000);
        assert_eq!(config.runtime.completion, CompletionMode::Iterations { count: 10_000 });
    }

    #[test]
    fn test_parse_full_workload() {
        let toml = r#"
            [workload]
            policy = "small-first"
            capacity = 128
            alloc_frequency = 0.9
            min_size = 64
            max_size = 8192
            size_trend = "grow"
            size_step = 128
            trend_jitter = 16
            size_list = [64, 256, 1024]
            size_weights = [1, 1, 2]
            size_mode = "nearest"
            distribution = { exponential = { lambda = 0.25 } }
            ttl_mode = "list"
            ttl_list = [5, -1]
            ttl_weights = [3, 1]

            [output]
            csv_output = "snapshots.csv"
            snap_interval = 50
            display = true

            [runtime]
            seed = 7
            completion = { duration = { seconds = 12 } }
        "#;

        let config = parse_toml_string(toml).unwrap();
        let w = &config.workload;
        assert_eq!(w.policy, EvictionPolicy::SmallFirst);
        assert_eq!(w.capacity, 128);
        assert_eq!(w.size_trend, SizeTrend::Grow);
        assert_eq!(w.size_mode, SizeMode::Nearest);
        assert_eq!(w.distribution, SizeDistribution::Exponential { lambda: 0.25 });
        assert_eq!(w.ttl_mode, TtlMode::List);
        assert_eq!(w.ttl_list, vec![5, -1]);
        assert_eq!(config.output.snap_interval, 50);
        assert!(config.output.display);
        assert_eq!(config.runtime.seed, 7);
        assert_eq!(config.runtime.completion, CompletionMode::Duration { seconds: 12 });
    }

    #[test]
    fn test_powerlaw_spelling() {
        let config = parse_toml_string(
            "[workload]\ndistribution = { powerlaw = { alpha = 2.0 } }\n",
        )
        .unwrap();
        assert_eq!(config.workload.distribution, SizeDistribution::PowerLaw { alpha: 2.0 });
    }

    #[test]
    fn test_unknown_policy_is_error() {
        assert!(parse_toml_string("[workload]\npolicy = \"lru\"\n").is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let mut config = Config::default();
        config.workload.policy = EvictionPolicy::Random;
        config.workload.ttl_mode = TtlMode::Fixed;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(to_toml_string(&config).unwrap().as_bytes()).unwrap();

        let loaded = parse_toml_file(file.path()).unwrap();
        assert_eq!(loaded.workload.policy, EvictionPolicy::Random);
        assert_eq!(loaded.workload.ttl_mode, TtlMode::Fixed);
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = parse_toml_file(Path::new("/nonexistent/memstress.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/memstress.toml"));
    }
}
