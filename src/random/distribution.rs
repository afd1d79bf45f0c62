//! Bounded size distributions
//!
//! Sizes are drawn as integers in `[min, max]`. Each sampler consumes exactly
//! one `uniform01()` draw, which keeps the stream position independent of the
//! chosen law.
//!
//! - **Exponential**: inverse CDF `-ln(1 - u) / lambda`, clamped into range.
//!   Small values dominate; `lambda` controls how quickly the tail decays.
//! - **Power law**: inverse CDF of a power law bounded to `[min, max]`. With
//!   `alpha == 1` it degenerates to a log-uniform law.

use super::RandomEngine;
use crate::config::workload::SizeDistribution;

/// Tolerance under which `alpha` is treated as exactly 1.
const LOG_UNIFORM_EPSILON: f64 = 1e-8;

impl RandomEngine {
    /// Exponentially distributed integer in `[min, max]`
    ///
    /// Panics if `min > max` or `lambda <= 0`.
    pub fn exponential(&mut self, min: usize, max: usize, lambda: f64) -> usize {
        assert!(min <= max, "exponential: min ({}) > max ({})", min, max);
        assert!(lambda > 0.0, "exponential: lambda must be positive, got {}", lambda);

        let u = self.uniform01();
        let x = -(1.0 - u).ln() / lambda;

        clamp_to_range(x, min, max)
    }

    /// Power-law distributed integer in `[min, max]`
    ///
    /// Panics if `min > max`.
    pub fn powerlaw(&mut self, min: usize, max: usize, alpha: f64) -> usize {
        assert!(min <= max, "powerlaw: min ({}) > max ({})", min, max);

        let u = self.uniform01();
        let (lo, hi) = (min as f64, max as f64);

        let x = if (alpha - 1.0).abs() < LOG_UNIFORM_EPSILON {
            lo * (hi / lo).powf(u)
        } else {
            let e = 1.0 - alpha;
            let lo_e = lo.powf(e);
            let hi_e = hi.powf(e);
            (lo_e + u * (hi_e - lo_e)).powf(1.0 / e)
        };

        // fp drift (and min == 0) can land outside the range
        clamp_to_range(x, min, max)
    }

    /// Draw a size in `[min, max]` according to `distribution`
    ///
    /// The uniform case keeps the half-open `[min, max)` contract of
    /// [`RandomEngine::uniform`].
    pub fn sample(&mut self, min: usize, max: usize, distribution: &SizeDistribution) -> usize {
        match *distribution {
            SizeDistribution::Uniform => self.uniform(min, max),
            SizeDistribution::Exponential { lambda } => self.exponential(min, max, lambda),
            SizeDistribution::PowerLaw { alpha } => self.powerlaw(min, max, alpha),
        }
    }
}

#[inline]
fn clamp_to_range(x: f64, min: usize, max: usize) -> usize {
    // `as` saturates, NaN maps to 0
    (x as usize).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_in_range() {
        let mut rng = RandomEngine::seeded(11);
        for lambda in [0.001, 0.01, 0.5, 1.0, 4.0] {
            for _ in 0..10_000 {
                let v = rng.exponential(16, 4096, lambda);
                assert!((16..=4096).contains(&v), "lambda={} v={}", lambda, v);
            }
        }
    }

    #[test]
    fn test_exponential_favours_small_values() {
        let mut rng = RandomEngine::seeded(12);
        let max = 10_000;
        let mut low = 0;
        for _ in 0..10_000 {
            if rng.exponential(0, max, 0.001) < max / 5 {
                low += 1;
            }
        }
        // P(x < 2000) = 1 - e^-2 ~= 0.86
        assert!(low > 8_000, "low = {}", low);
    }

    #[test]
    fn test_exponential_large_lambda_pins_min() {
        let mut rng = RandomEngine::seeded(13);
        for _ in 0..1_000 {
            assert_eq!(rng.exponential(64, 128, 1000.0), 64);
        }
    }

    #[test]
    #[should_panic(expected = "lambda must be positive")]
    fn test_exponential_zero_lambda_panics() {
        let mut rng = RandomEngine::seeded(1);
        rng.exponential(1, 10, 0.0);
    }

    #[test]
    fn test_powerlaw_in_range() {
        let mut rng = RandomEngine::seeded(21);
        for alpha in [0.5, 1.0, 1.5, 2.0, 3.0] {
            for _ in 0..10_000 {
                let v = rng.powerlaw(16, 1 << 20, alpha);
                assert!((16..=1 << 20).contains(&v), "alpha={} v={}", alpha, v);
            }
        }
    }

    #[test]
    fn test_powerlaw_log_uniform_branch() {
        let mut rng = RandomEngine::seeded(22);
        // Log-uniform: each power-of-ten decade gets roughly a third
        let mut decades = [0u32; 3];
        for _ in 0..9_000 {
            let v = rng.powerlaw(10, 10_000, 1.0);
            let bucket = match v {
                0..=99 => 0,
                100..=999 => 1,
                _ => 2,
            };
            decades[bucket] += 1;
        }
        for count in decades {
            assert!(count > 2_500 && count < 3_500, "decades = {:?}", decades);
        }
    }

    #[test]
    fn test_powerlaw_heavy_alpha_skews_low() {
        let mut rng = RandomEngine::seeded(23);
        let mut low = 0;
        for _ in 0..10_000 {
            if rng.powerlaw(1, 1000, 2.5) < 10 {
                low += 1;
            }
        }
        assert!(low > 9_000, "low = {}", low);
    }

    #[test]
    fn test_powerlaw_degenerate_range() {
        let mut rng = RandomEngine::seeded(24);
        assert_eq!(rng.powerlaw(512, 512, 2.0), 512);
        assert_eq!(rng.powerlaw(512, 512, 1.0), 512);
    }

    #[test]
    fn test_sample_dispatch_consumes_one_draw() {
        let dists = [
            SizeDistribution::Uniform,
            SizeDistribution::Exponential { lambda: 0.01 },
            SizeDistribution::PowerLaw { alpha: 1.5 },
        ];
        for dist in dists {
            let mut a = RandomEngine::seeded(77);
            let mut b = RandomEngine::seeded(77);
            a.sample(16, 4096, &dist);
            b.uniform01();
            assert_eq!(a.state(), b.state(), "{:?}", dist);
        }
    }
}
