//! Maps a block number to epoch, seed, cache size and dataset size.
//!
//! All sizing constants are grouped into `EthashParams` rather than being free-standing
//! globals so that a short-epoch test profile can override `epoch_length` without
//! touching the prime-search logic, the same way this codebase's other PoW algorithm
//! exposes `mainnet()` / `testnet()` / `regtest()` presets.

use crate::primitives::keccak256;
use serde::{Deserialize, Serialize};

/// Bytes per 32-bit word.
pub const WORD_BYTES: u64 = 4;
/// Width of one mix-hash "page" read from the dataset per access.
pub const MIX_BYTES: u64 = 128;
/// Width of one cache row / dataset item.
pub const HASH_BYTES: u64 = 64;
/// Cache rows that feed into each dataset item.
pub const DATASET_PARENTS: u64 = 256;
/// Passes of the cache-mixing step.
pub const CACHE_ROUNDS: u32 = 3;
/// Dataset lookups per `hashimoto` evaluation.
pub const ACCESSES: u32 = 64;

/// Sizing and epoch parameters for one network profile. The algorithm itself (primitives,
/// cache construction, dataset derivation, hashimoto) never changes across profiles; only
/// these numbers do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthashParams {
    /// Blocks per epoch. Revision-23 Ethash mainnet uses 30000.
    pub epoch_length: u64,
    pub cache_bytes_init: u64,
    pub cache_bytes_growth: u64,
    pub dataset_bytes_init: u64,
    pub dataset_bytes_growth: u64,
}

impl EthashParams {
    /// Revision-23 Ethash mainnet constants.
    pub fn mainnet() -> Self {
        EthashParams {
            epoch_length: 30_000,
            cache_bytes_init: 1 << 24,
            cache_bytes_growth: 1 << 17,
            dataset_bytes_init: 1 << 30,
            dataset_bytes_growth: 1 << 23,
        }
    }

    /// A scaled-down profile for fast-moving integration tests and local development
    /// chains: short epochs and kilobyte-scale caches instead of mainnet's tens of
    /// megabytes, using the same derivation rules throughout.
    pub fn regtest() -> Self {
        EthashParams {
            epoch_length: 30,
            cache_bytes_init: 4096,
            cache_bytes_growth: 64,
            dataset_bytes_init: 32_768,
            dataset_bytes_growth: 128,
        }
    }

    /// The epoch a block number falls into: `number / epoch_length`.
    pub fn epoch(&self, number: u64) -> u64 {
        number / self.epoch_length
    }

    /// Keccak-256 applied `epoch(number)` times to the 32-byte zero seed. Epoch 0's seed
    /// is all zero bytes, since the loop runs zero times.
    pub fn seed(&self, number: u64) -> [u8; 32] {
        let mut seed = [0u8; 32];
        for _ in 0..self.epoch(number) {
            seed = keccak256(&seed);
        }
        seed
    }

    /// The cache size in bytes for the epoch containing `number`: the largest multiple of
    /// `HASH_BYTES` not exceeding the growth budget whose row count is prime.
    pub fn cache_size(&self, number: u64) -> u64 {
        let budget = self.cache_bytes_init + self.cache_bytes_growth * self.epoch(number) - HASH_BYTES;
        largest_prime_sized(budget, HASH_BYTES)
    }

    /// The dataset (DAG) size in bytes for the epoch containing `number`, analogous to
    /// `cache_size` but budgeted against `dataset_bytes_init`/`_growth` and measured in
    /// `MIX_BYTES` units.
    pub fn dataset_size(&self, number: u64) -> u64 {
        let budget =
            self.dataset_bytes_init + self.dataset_bytes_growth * self.epoch(number) - MIX_BYTES;
        largest_prime_sized(budget, MIX_BYTES)
    }
}

impl Default for EthashParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Finds the largest `s <= budget` such that `s` is a multiple of `unit` and `s / unit` is
/// prime, searching downward in steps of `2 * unit` (mirrors the Ethash reference search,
/// which starts from an odd multiple and steps by evens to stay odd).
fn largest_prime_sized(budget: u64, unit: u64) -> u64 {
    let mut size = budget / unit;
    // budget/unit is even by construction (both init and growth constants are even
    // multiples of unit); the first candidate to test is the odd count just below it.
    if size % 2 == 0 {
        size -= 1;
    }
    while !is_prime(size) {
        size -= 2;
    }
    size * unit
}

/// Trial division up to floor(sqrt(n)). The search space here is a handful of odd
/// candidates per epoch, so speed is not a concern; determinism is.
fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3u64;
    while divisor.saturating_mul(divisor) <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_floor_division() {
        let p = EthashParams::mainnet();
        assert_eq!(p.epoch(0), 0);
        assert_eq!(p.epoch(29_999), 0);
        assert_eq!(p.epoch(30_000), 1);
    }

    #[test]
    fn seed_recurrence() {
        let p = EthashParams::mainnet();
        assert_eq!(p.seed(0), [0u8; 32]);
        assert_eq!(p.seed(30_000), keccak256(&[0u8; 32]));
        assert_eq!(p.seed(60_000), keccak256(&keccak256(&[0u8; 32])));
    }

    #[test]
    fn epoch_stability() {
        let p = EthashParams::mainnet();
        assert_eq!(p.seed(5), p.seed(29_999));
        assert_eq!(p.cache_size(5), p.cache_size(29_999));
        assert_eq!(p.dataset_size(5), p.dataset_size(29_999));
    }

    #[test]
    fn cache_size_is_prime_row_count_within_budget() {
        let p = EthashParams::mainnet();
        for number in [0u64, 30_000, 60_000, 90_000] {
            let size = p.cache_size(number);
            assert_eq!(size % HASH_BYTES, 0);
            assert!(is_prime(size / HASH_BYTES));
            let budget = p.cache_bytes_init + p.cache_bytes_growth * p.epoch(number) - HASH_BYTES;
            assert!(size <= budget);
        }
    }

    #[test]
    fn dataset_size_is_prime_row_count_within_budget() {
        let p = EthashParams::mainnet();
        for number in [0u64, 30_000, 60_000] {
            let size = p.dataset_size(number);
            assert_eq!(size % MIX_BYTES, 0);
            assert!(is_prime(size / MIX_BYTES));
            let budget =
                p.dataset_bytes_init + p.dataset_bytes_growth * p.epoch(number) - MIX_BYTES;
            assert!(size <= budget);
        }
    }

    #[test]
    fn known_genesis_sizes() {
        // Published revision-23 Ethash values for epoch 0.
        let p = EthashParams::mainnet();
        assert_eq!(p.cache_size(0), 16_776_896);
        assert_eq!(p.dataset_size(0), 1_073_739_904);
    }

    #[test]
    fn regtest_has_short_epochs_and_small_caches() {
        let mainnet = EthashParams::mainnet();
        let regtest = EthashParams::regtest();
        assert_eq!(regtest.epoch_length, 30);
        assert!(regtest.cache_size(0) < mainnet.cache_size(0));
        assert_eq!(regtest.cache_size(0) % HASH_BYTES, 0);
    }
}
