//! Size trend state

use crate::config::workload::SizeTrend;
use crate::config::WorkloadConfig;
use crate::random::RandomEngine;

/// Cursor of the active size trend
///
/// `Grow` and `Saw` start at `min_size`, `Shrink` starts at `max_size`.
/// Each call to [`TrendState::next`] returns the cursor and then moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendState {
    None,
    Grow { cursor: usize },
    Shrink { cursor: usize },
    Saw { cursor: usize },
}

impl TrendState {
    pub fn new(config: &WorkloadConfig) -> Self {
        match config.size_trend {
            SizeTrend::None => TrendState::None,
            SizeTrend::Grow => TrendState::Grow { cursor: config.min_size },
            SizeTrend::Shrink => TrendState::Shrink { cursor: config.max_size },
            SizeTrend::Saw => TrendState::Saw { cursor: config.min_size },
        }
    }

    /// Current cursor, `None` for the distribution-driven trend
    pub fn cursor(&self) -> Option<usize> {
        match *self {
            TrendState::None => None,
            TrendState::Grow { cursor } | TrendState::Shrink { cursor } | TrendState::Saw { cursor } => {
                Some(cursor)
            }
        }
    }

    /// Produce the next size and advance the cursor
    ///
    /// The jitter draw is made on every call, including for `None`, so the
    /// random stream advances identically whatever the trend.
    pub fn next(&mut self, rng: &mut RandomEngine, config: &WorkloadConfig) -> usize {
        let (min, max) = (config.min_size, config.max_size);
        let jitter = rng.uniform(0, config.trend_jitter * 2) as i64 - config.trend_jitter as i64;
        let step = (config.size_step as i64 + jitter).max(1) as usize;

        match self {
            TrendState::None => rng.sample(min, max, &config.distribution),
            TrendState::Grow { cursor } => {
                let size = *cursor;
                *cursor = cursor.saturating_add(step).clamp(min, max);
                size
            }
            TrendState::Shrink { cursor } => {
                let size = *cursor;
                *cursor = if step > *cursor { min } else { *cursor - step };
                *cursor = (*cursor).clamp(min, max);
                size
            }
            TrendState::Saw { cursor } => {
                let size = *cursor;
                *cursor = cursor.saturating_add(step);
                if *cursor > max {
                    *cursor = min;
                }
                size
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend_config(trend: SizeTrend, min: usize, max: usize, step: usize) -> WorkloadConfig {
        WorkloadConfig {
            size_trend: trend,
            min_size: min,
            max_size: max,
            size_step: step,
            ..Default::default()
        }
    }

    fn run(config: &WorkloadConfig, n: usize) -> Vec<usize> {
        let mut rng = RandomEngine::seeded(5);
        let mut state = TrendState::new(config);
        (0..n).map(|_| state.next(&mut rng, config)).collect()
    }

    #[test]
    fn test_grow_saturates() {
        let config = trend_config(SizeTrend::Grow, 100, 200, 50);
        assert_eq!(run(&config, 5), vec![100, 150, 200, 200, 200]);
    }

    #[test]
    fn test_saw_wraps() {
        let config = trend_config(SizeTrend::Saw, 100, 200, 50);
        assert_eq!(run(&config, 7), vec![100, 150, 200, 100, 150, 200, 100]);
    }

    #[test]
    fn test_shrink_floors_at_min() {
        let config = trend_config(SizeTrend::Shrink, 100, 200, 50);
        assert_eq!(run(&config, 4), vec![200, 150, 100, 100]);

        let config = trend_config(SizeTrend::Shrink, 10, 100, 60);
        assert_eq!(run(&config, 4), vec![100, 40, 10, 10]);
    }

    #[test]
    fn test_jitter_stays_positive() {
        let mut config = trend_config(SizeTrend::Grow, 1, 1_000_000, 1);
        config.trend_jitter = 10;
        let sizes = run(&config, 200);
        assert!(sizes.windows(2).all(|w| w[1] > w[0]), "grow must be strictly increasing below max");
    }

    #[test]
    fn test_largest_step_and_jitter_stay_in_range() {
        use crate::config::validator::{validate_workload, MAX_TREND_STEP};

        for trend in [SizeTrend::Grow, SizeTrend::Shrink, SizeTrend::Saw] {
            let mut config = trend_config(trend, 64, 4096, MAX_TREND_STEP);
            config.trend_jitter = MAX_TREND_STEP;
            assert!(validate_workload(&config).is_ok());

            let sizes = run(&config, 50);
            assert!(sizes.iter().all(|s| (64..=4096).contains(s)), "{:?}: {:?}", trend, sizes);
        }
    }

    #[test]
    fn test_jitter_drawn_for_every_trend() {
        let mut rng_none = RandomEngine::seeded(11);
        let mut rng_grow = RandomEngine::seeded(11);
        let mut none = trend_config(SizeTrend::None, 64, 64, 8);
        none.trend_jitter = 4;
        let mut grow = none.clone();
        grow.size_trend = SizeTrend::Grow;

        TrendState::new(&none).next(&mut rng_none, &none);
        TrendState::new(&grow).next(&mut rng_grow, &grow);
        // none: jitter + uniform(64, 64); grow: jitter only
        rng_grow.next_u64();
        assert_eq!(rng_none.state(), rng_grow.state());
    }

    #[test]
    fn test_none_has_no_cursor() {
        let config = trend_config(SizeTrend::None, 16, 32, 1);
        let state = TrendState::new(&config);
        assert_eq!(state.cursor(), None);
        assert!(run(&config, 100).iter().all(|s| (16..32).contains(s)));
    }
}
