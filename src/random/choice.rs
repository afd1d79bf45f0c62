//! Discrete choice over configured lists (sizes, lifetimes)

use super::RandomEngine;

impl RandomEngine {
    /// Pick one element of `values` uniformly
    ///
    /// Panics if `values` is empty.
    pub fn choice<T: Copy>(&mut self, values: &[T]) -> T {
        assert!(!values.is_empty(), "choice: empty value list");

        values[self.uniform(0, values.len())]
    }

    /// Pick one element of `values` with probability proportional to `weights`
    ///
    /// An empty `weights` slice falls back to [`RandomEngine::choice`].
    /// Otherwise a vote is drawn in `[0, sum(weights))` and the first value
    /// whose cumulative weight is strictly greater than the vote wins, so
    /// zero-weight entries are never returned.
    ///
    /// Panics if `values` is empty, if the lengths differ, or if all weights
    /// are zero.
    pub fn weighted_choice<T: Copy>(&mut self, values: &[T], weights: &[usize]) -> T {
        assert!(!values.is_empty(), "weighted_choice: empty value list");

        if weights.is_empty() {
            return self.choice(values);
        }

        assert_eq!(
            values.len(),
            weights.len(),
            "weighted_choice: {} values but {} weights",
            values.len(),
            weights.len()
        );

        let total: usize = weights.iter().sum();
        assert!(total > 0, "weighted_choice: weights sum to zero");

        let vote = self.uniform(0, total);
        let mut cumulative = 0;
        for (value, weight) in values.iter().zip(weights) {
            cumulative += weight;
            if vote < cumulative {
                return *value;
            }
        }

        // vote < total, so the loop always returns
        unreachable!("weighted_choice: vote {} not below total {}", vote, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_weights_never_selected() {
        let mut rng = RandomEngine::seeded(1);
        for _ in 0..10_000 {
            assert_eq!(rng.weighted_choice(&[1, 2, 3], &[0, 0, 1]), 3);
        }
    }

    #[test]
    fn test_zero_weight_in_middle() {
        let mut rng = RandomEngine::seeded(2);
        for _ in 0..10_000 {
            let v = rng.weighted_choice(&[10, 20, 30], &[5, 0, 5]);
            assert_ne!(v, 20);
        }
    }

    #[test]
    fn test_weights_are_proportional() {
        let mut rng = RandomEngine::seeded(3);
        let mut counts = [0u32; 2];
        for _ in 0..10_000 {
            match rng.weighted_choice(&[0usize, 1], &[80, 20]) {
                0 => counts[0] += 1,
                _ => counts[1] += 1,
            }
        }
        assert!(counts[0] > 7_500 && counts[0] < 8_500, "counts = {:?}", counts);
    }

    #[test]
    fn test_empty_weights_is_uniform_choice() {
        let mut a = RandomEngine::seeded(4);
        let mut b = RandomEngine::seeded(4);
        let values = [7, 8, 9, 10];
        for _ in 0..100 {
            assert_eq!(a.weighted_choice(&values, &[]), b.choice(&values));
        }
    }

    #[test]
    fn test_choice_covers_all_values() {
        let mut rng = RandomEngine::seeded(5);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            seen[rng.choice(&[0usize, 1, 2, 3])] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_single_value() {
        let mut rng = RandomEngine::seeded(6);
        assert_eq!(rng.weighted_choice(&[42], &[3]), 42);
        assert_eq!(rng.choice(&[42]), 42);
    }

    #[test]
    #[should_panic(expected = "weighted_choice: 3 values but 2 weights")]
    fn test_mismatched_lengths_panics() {
        let mut rng = RandomEngine::seeded(7);
        rng.weighted_choice(&[1, 2, 3], &[1, 1]);
    }

    #[test]
    #[should_panic(expected = "empty value list")]
    fn test_empty_values_panics() {
        let mut rng = RandomEngine::seeded(8);
        let empty: [usize; 0] = [];
        rng.choice(&empty);
    }
}
