//! Configuration validation
//!
//! Every check runs once before the first step. A configuration that passes
//! [`validate_config`] can never trip a sampling precondition during the run.

use super::*;
use thiserror::Error;

/// Invalid configuration detected before the run starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("alloc_frequency must be in [0, 1], got {0}")]
    AllocFrequencyOutOfRange(f64),

    #[error("capacity must be greater than 0")]
    ZeroCapacity,

    #[error("min_size must be greater than 0")]
    ZeroMinSize,

    #[error("min_size ({min}) must not exceed max_size ({max})")]
    InvertedSizeRange { min: usize, max: usize },

    #[error("size_step must not be zero")]
    ZeroSizeStep,

    #[error("size_list entry {index} is zero")]
    ZeroSizeInList { index: usize },

    #[error("ttl_fixed must not be zero")]
    ZeroFixedTtl,

    #[error("ttl_mode is 'list' but ttl_list is empty")]
    EmptyTtlList,

    #[error("ttl_list entry {index} is zero")]
    ZeroTtlInList { index: usize },

    #[error("number of weights doesn't match the number of items in {list}: W({weights}) != L({values})")]
    WeightCountMismatch {
        list: &'static str,
        values: usize,
        weights: usize,
    },

    #[error("{list} weights sum to zero")]
    ZeroTotalWeight { list: &'static str },

    #[error("{list} weights overflow when summed")]
    WeightSumOverflow { list: &'static str },

    #[error("{field} must not exceed {max}, got {value}")]
    TrendStepTooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("exponential lambda must be positive and finite, got {0}")]
    InvalidLambda(f64),

    #[error("powerlaw alpha must be non-zero and finite, got {0}")]
    InvalidAlpha(f64),

    #[error("policy 'never' requires a ttl_mode other than 'off' (blocks would never be released)")]
    UnboundedGrowth,

    #[error("invalid completion mode: {0}")]
    InvalidCompletion(String),

    #[error("snap_interval must be greater than 0")]
    ZeroSnapInterval,
}

/// Largest `size_step` / `trend_jitter` the trend arithmetic can carry
pub const MAX_TREND_STEP: usize = i64::MAX as usize / 2;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_workload(&config.workload)?;
    validate_output(&config.output)?;
    validate_runtime(&config.runtime)?;
    Ok(())
}

/// Validate workload configuration
pub fn validate_workload(workload: &WorkloadConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&workload.alloc_frequency) {
        return Err(ConfigError::AllocFrequencyOutOfRange(workload.alloc_frequency));
    }

    if workload.capacity == 0 {
        return Err(ConfigError::ZeroCapacity);
    }

    validate_sizes(workload)?;
    validate_distribution(&workload.distribution)?;
    validate_lifetimes(workload)?;

    if workload.policy == EvictionPolicy::Never && workload.ttl_mode == TtlMode::Off {
        return Err(ConfigError::UnboundedGrowth);
    }

    Ok(())
}

fn validate_sizes(workload: &WorkloadConfig) -> Result<(), ConfigError> {
    if workload.min_size == 0 {
        return Err(ConfigError::ZeroMinSize);
    }

    if workload.min_size > workload.max_size {
        return Err(ConfigError::InvertedSizeRange {
            min: workload.min_size,
            max: workload.max_size,
        });
    }

    if workload.size_step == 0 {
        return Err(ConfigError::ZeroSizeStep);
    }

    for (field, value) in [("size_step", workload.size_step), ("trend_jitter", workload.trend_jitter)] {
        if value > MAX_TREND_STEP {
            return Err(ConfigError::TrendStepTooLarge {
                field,
                value,
                max: MAX_TREND_STEP,
            });
        }
    }

    if let Some(index) = workload.size_list.iter().position(|s| *s == 0) {
        return Err(ConfigError::ZeroSizeInList { index });
    }

    if !workload.size_list.is_empty() {
        validate_weights("size_list", workload.size_list.len(), &workload.size_weights)?;
    }

    Ok(())
}

fn validate_lifetimes(workload: &WorkloadConfig) -> Result<(), ConfigError> {
    if workload.ttl_fixed == 0 {
        return Err(ConfigError::ZeroFixedTtl);
    }

    if let Some(index) = workload.ttl_list.iter().position(|t| *t == 0) {
        return Err(ConfigError::ZeroTtlInList { index });
    }

    if workload.ttl_mode == TtlMode::List && workload.ttl_list.is_empty() {
        return Err(ConfigError::EmptyTtlList);
    }

    if !workload.ttl_list.is_empty() {
        validate_weights("ttl_list", workload.ttl_list.len(), &workload.ttl_weights)?;
    }

    Ok(())
}

/// Weights are optional; when given they must pair up with the values
fn validate_weights(list: &'static str, values: usize, weights: &[usize]) -> Result<(), ConfigError> {
    if weights.is_empty() {
        return Ok(());
    }

    if weights.len() != values {
        return Err(ConfigError::WeightCountMismatch {
            list,
            values,
            weights: weights.len(),
        });
    }

    let total = weights
        .iter()
        .try_fold(0usize, |acc, w| acc.checked_add(*w))
        .ok_or(ConfigError::WeightSumOverflow { list })?;

    if total == 0 {
        return Err(ConfigError::ZeroTotalWeight { list });
    }

    Ok(())
}

/// Validate distribution parameters
fn validate_distribution(dist: &SizeDistribution) -> Result<(), ConfigError> {
    match *dist {
        SizeDistribution::Uniform => {}
        SizeDistribution::Exponential { lambda } => {
            if !(lambda > 0.0 && lambda.is_finite()) {
                return Err(ConfigError::InvalidLambda(lambda));
            }
        }
        SizeDistribution::PowerLaw { alpha } => {
            if alpha == 0.0 || !alpha.is_finite() {
                return Err(ConfigError::InvalidAlpha(alpha));
            }
        }
    }

    Ok(())
}

fn validate_output(output: &OutputConfig) -> Result<(), ConfigError> {
    if output.snap_interval == 0 {
        return Err(ConfigError::ZeroSnapInterval);
    }
    Ok(())
}

fn validate_runtime(runtime: &RuntimeConfig) -> Result<(), ConfigError> {
    runtime
        .completion
        .validate()
        .map_err(ConfigError::InvalidCompletion)
}
