//! Deterministic pseudo-random engine
//!
//! Every random decision in a run (allocate or free, block size, lifetime,
//! random eviction victim) is drawn from a single [`RandomEngine`]. The engine
//! is a xorshift64* generator seeded through SplitMix64, so a given seed
//! produces the same stream on every platform and every run.
//!
//! # Example
//!
//! ```
//! use memstress::random::RandomEngine;
//!
//! let mut a = RandomEngine::seeded(42);
//! let mut b = RandomEngine::seeded(42);
//!
//! for _ in 0..16 {
//!     assert_eq!(a.next_u64(), b.next_u64());
//! }
//!
//! let size = a.uniform(16, 4096);
//! assert!((16..4096).contains(&size));
//! ```

pub mod choice;
pub mod distribution;

use rand::{RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Golden-ratio increment of SplitMix64, also used as the fallback state.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Output multiplier of xorshift64*.
const XS64_STAR_MULTIPLIER: u64 = 2_685_821_657_736_338_717;

/// 2^-53, maps a 53-bit integer into `[0, 1)`.
const UNIT_53: f64 = 1.0 / (1u64 << 53) as f64;

/// Seeded xorshift64* generator with distribution helpers
///
/// The state is a single `u64` that is never zero (zero is an absorbing
/// state for xorshift). All sampling helpers (`uniform`, `exponential`,
/// `powerlaw`, `weighted_choice`) consume draws from this one stream, so the
/// order of calls fully determines the sequence of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomEngine {
    state: u64,
}

impl RandomEngine {
    /// Create an engine from `seed`
    ///
    /// A seed of `0` is replaced with the current wall-clock time in seconds.
    pub fn seeded(seed: u64) -> Self {
        let seed = if seed == 0 { wall_clock_seed() } else { seed };

        let mut state = splitmix64(seed);
        if state == 0 {
            state = GOLDEN_GAMMA;
        }

        Self { state }
    }

    /// Current raw generator state
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance the generator and return the next 64-bit output
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(XS64_STAR_MULTIPLIER)
    }

    /// Uniform double in `[0, 1)` built from the top 53 bits of one draw
    #[inline]
    pub fn uniform01(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * UNIT_53
    }

    /// Uniform integer in `[min, max)`
    ///
    /// Returns `min` when `min == max`. Panics if `min > max`.
    #[inline]
    pub fn uniform(&mut self, min: usize, max: usize) -> usize {
        assert!(min <= max, "uniform: min ({}) > max ({})", min, max);

        min + ((max - min) as f64 * self.uniform01()) as usize
    }

    /// Fair coin
    pub fn coin_flip(&mut self) -> bool {
        self.uniform(0, 2) == 1
    }
}

/// SplitMix64 finaliser used to spread the user seed over all 64 bits
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1)
}

impl RngCore for RandomEngine {
    fn next_u32(&mut self) -> u32 {
        (RandomEngine::next_u64(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        RandomEngine::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = RandomEngine::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for RandomEngine {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::seeded(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_splitmix64_reference() {
        assert_eq!(splitmix64(0), 0xe220_a839_7b1d_cdaf);
        assert_eq!(splitmix64(1), 0x910a_2dec_8902_5cc1);
    }

    #[test]
    fn test_seeded_state() {
        assert_eq!(RandomEngine::seeded(1).state(), 0x910a_2dec_8902_5cc1);
        assert_eq!(RandomEngine::seeded(42).state(), 0xbdd7_3226_2feb_6e95);
    }

    #[test]
    fn test_golden_sequence_seed_1() {
        let mut rng = RandomEngine::seeded(1);
        let expected = [
            0x4b46_a55d_f361_1b9b,
            0xd7e1_f141_0e76_3ef4,
            0x5f14_ec66_975f_9b06,
            0x3b2c_74fa_d44d_6cdb,
        ];
        for value in expected {
            assert_eq!(rng.next_u64(), value);
        }
    }

    #[test]
    fn test_golden_sequence_seed_42() {
        let mut rng = RandomEngine::seeded(42);
        let expected = [
            0x31b0_ece7_c4f6_97a2,
            0x9008_a3b1_cb68_6f03,
            0x7c71_73ab_d97b_e16f,
            0x4567_2c8c_8d6b_8c4f,
        ];
        for value in expected {
            assert_eq!(rng.next_u64(), value);
        }
    }

    #[test]
    fn test_golden_uniform_seed_42() {
        let mut rng = RandomEngine::seeded(42);
        let drawn: Vec<usize> = (0..8).map(|_| rng.uniform(0, 100)).collect();
        assert_eq!(drawn, vec![19, 56, 48, 27, 80, 58, 30, 79]);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandomEngine::seeded(12345);
        let mut b = RandomEngine::seeded(12345);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_uniform01_range() {
        let mut rng = RandomEngine::seeded(7);
        for _ in 0..10_000 {
            let u = rng.uniform01();
            assert!((0.0..1.0).contains(&u), "uniform01 out of range: {}", u);
        }
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = RandomEngine::seeded(99);
        for _ in 0..10_000 {
            let v = rng.uniform(10, 20);
            assert!((10..20).contains(&v), "uniform out of range: {}", v);
        }
    }

    #[test]
    fn test_uniform_empty_range_returns_min() {
        let mut rng = RandomEngine::seeded(3);
        assert_eq!(rng.uniform(5, 5), 5);
    }

    #[test]
    #[should_panic(expected = "uniform: min")]
    fn test_uniform_inverted_range_panics() {
        let mut rng = RandomEngine::seeded(3);
        rng.uniform(10, 5);
    }

    #[test]
    fn test_coin_flip_is_roughly_fair() {
        let mut rng = RandomEngine::seeded(2024);
        let heads = (0..10_000).filter(|_| rng.coin_flip()).count();
        assert!(heads > 4_500 && heads < 5_500, "heads = {}", heads);
    }

    #[test]
    fn test_rng_core_shares_stream() {
        let mut a = RandomEngine::seeded(42);
        let mut b = RandomEngine::seed_from_u64(42);
        assert_eq!(a.next_u64(), RngCore::next_u64(&mut b));

        let x: u64 = b.gen_range(0..1000);
        assert!(x < 1000);
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut a = RandomEngine::seeded(5);
        let mut b = RandomEngine::seeded(5);
        let mut buf = [0u8; 11];
        a.fill_bytes(&mut buf);

        let first = b.next_u64().to_le_bytes();
        let second = b.next_u64().to_le_bytes();
        assert_eq!(&buf[..8], &first);
        assert_eq!(&buf[8..], &second[..3]);
    }
}
