//! Workload definition structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which live block is released when a step decides to free
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionPolicy {
    /// Most recently inserted block
    Lifo,
    /// Least recently inserted block
    Fifo,
    /// Uniformly random block
    Random,
    /// Largest block, earliest inserted on ties
    BigFirst,
    /// Smallest block, earliest inserted on ties
    SmallFirst,
    /// Never evict; blocks only leave through TTL expiry
    Never,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::Lifo
    }
}

/// How block sizes evolve over the run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeTrend {
    /// Independent draws from the size distribution
    None,
    /// Sizes climb from `min_size` and saturate at `max_size`
    Grow,
    /// Sizes fall from `max_size` and saturate at `min_size`
    Shrink,
    /// Sizes climb from `min_size` and wrap back when exceeding `max_size`
    Saw,
}

impl Default for SizeTrend {
    fn default() -> Self {
        Self::None
    }
}

/// How a configured size list is used
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    /// Weighted pick straight from the list
    Exact,
    /// Trend/distribution target snapped to the closest list entry
    Nearest,
}

impl Default for SizeMode {
    fn default() -> Self {
        Self::Exact
    }
}

/// Size distribution used when no trend or list overrides it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SizeDistribution {
    Uniform,
    Exponential { lambda: f64 },
    PowerLaw { alpha: f64 },
}

impl Default for SizeDistribution {
    fn default() -> Self {
        Self::Uniform
    }
}

/// Block lifetime assignment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TtlMode {
    /// Blocks are immortal
    Off,
    /// Every block lives `ttl_fixed` steps
    Fixed,
    /// Lifetime drawn from `ttl_list`
    List,
}

impl Default for TtlMode {
    fn default() -> Self {
        Self::Off
    }
}

/// When the driving loop stops issuing steps
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMode {
    Iterations { count: u64 },
    Duration { seconds: u64 },
}

impl Default for CompletionMode {
    fn default() -> Self {
        Self::Iterations { count: 10_000 }
    }
}

impl CompletionMode {
    /// Validate the completion mode
    pub fn validate(&self) -> Result<(), String> {
        match self {
            CompletionMode::Iterations { count } if *count == 0 => {
                Err("Iteration count must be greater than 0".to_string())
            }
            CompletionMode::Duration { seconds } if *seconds == 0 => {
                Err("Duration must be greater than 0".to_string())
            }
            _ => Ok(()),
        }
    }
}

// Display trait implementations

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lifo => write!(f, "lifo"),
            EvictionPolicy::Fifo => write!(f, "fifo"),
            EvictionPolicy::Random => write!(f, "random"),
            EvictionPolicy::BigFirst => write!(f, "big-first"),
            EvictionPolicy::SmallFirst => write!(f, "small-first"),
            EvictionPolicy::Never => write!(f, "never"),
        }
    }
}

impl fmt::Display for SizeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeTrend::None => write!(f, "none"),
            SizeTrend::Grow => write!(f, "grow"),
            SizeTrend::Shrink => write!(f, "shrink"),
            SizeTrend::Saw => write!(f, "saw"),
        }
    }
}

impl fmt::Display for SizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeMode::Exact => write!(f, "exact"),
            SizeMode::Nearest => write!(f, "nearest"),
        }
    }
}

impl fmt::Display for SizeDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeDistribution::Uniform => write!(f, "uniform"),
            SizeDistribution::Exponential { lambda } => write!(f, "exp(lambda={})", lambda),
            SizeDistribution::PowerLaw { alpha } => write!(f, "powerlaw(alpha={})", alpha),
        }
    }
}

impl fmt::Display for TtlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtlMode::Off => write!(f, "off"),
            TtlMode::Fixed => write!(f, "fixed"),
            TtlMode::List => write!(f, "list"),
        }
    }
}

impl fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionMode::Iterations { count } => write!(f, "iterations({})", count),
            CompletionMode::Duration { seconds } => write!(f, "duration({}s)", seconds),
        }
    }
}

/// Format a byte count with binary units
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2}TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2}GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2}KB", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_mode_validate() {
        assert!(CompletionMode::Iterations { count: 1 }.validate().is_ok());
        assert!(CompletionMode::Iterations { count: 0 }.validate().is_err());
        assert!(CompletionMode::Duration { seconds: 5 }.validate().is_ok());
        assert!(CompletionMode::Duration { seconds: 0 }.validate().is_err());
    }

    #[test]
    fn test_display_names_match_cli_spelling() {
        assert_eq!(EvictionPolicy::BigFirst.to_string(), "big-first");
        assert_eq!(EvictionPolicy::SmallFirst.to_string(), "small-first");
        assert_eq!(SizeDistribution::Exponential { lambda: 0.5 }.to_string(), "exp(lambda=0.5)");
        assert_eq!(TtlMode::List.to_string(), "list");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(1536), "1.50KB");
        assert_eq!(format_bytes(1 << 20), "1.00MB");
    }
}
