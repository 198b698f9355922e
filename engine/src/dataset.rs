//! On-demand dataset ("DAG") item derivation from an epoch cache.

use crate::cache::Cache;
use crate::params::{DATASET_PARENTS, HASH_BYTES, WORD_BYTES};
use crate::primitives::{bytes_to_words_le, fnv, keccak512, rem_unsigned, words_to_bytes_le};

/// Words per cache row / dataset item.
const WORDS_PER_ROW: usize = (HASH_BYTES / WORD_BYTES) as usize; // 16

/// Derives the 16-word (64-byte) dataset item at `index` from `cache`.
pub fn dataset_item(cache: &Cache, index: u32) -> [u32; 16] {
    let rows = cache.rows();
    let row = index as usize % rows;

    let mut mix = [0u32; WORDS_PER_ROW];
    mix.copy_from_slice(&cache.words()[row * WORDS_PER_ROW..(row + 1) * WORDS_PER_ROW]);
    mix[0] ^= index;
    mix = words_array(keccak512(&words_to_bytes_le(&mix)));

    for j in 0..DATASET_PARENTS as u32 {
        let cache_index = rem_unsigned(fnv(index ^ j, mix[(j as usize) % WORDS_PER_ROW]), rows as u32) as usize;
        for k in 0..WORDS_PER_ROW {
            mix[k] = fnv(mix[k], cache.words()[cache_index * WORDS_PER_ROW + k]);
        }
    }

    words_array(keccak512(&words_to_bytes_le(&mix)))
}

fn words_array(bytes: [u8; 64]) -> [u32; 16] {
    let words = bytes_to_words_le(&bytes);
    let mut out = [0u32; 16];
    out.copy_from_slice(&words);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EthashParams;

    #[test]
    fn deterministic_across_calls() {
        let params = EthashParams::mainnet();
        let cache = Cache::build(&params.seed(0), 64 * 64).unwrap();
        let a = dataset_item(&cache, 3);
        let b = dataset_item(&cache, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn different_indices_differ() {
        let params = EthashParams::mainnet();
        let cache = Cache::build(&params.seed(0), 64 * 64).unwrap();
        assert_ne!(dataset_item(&cache, 0), dataset_item(&cache, 1));
    }

    #[test]
    fn output_is_64_bytes_worth_of_words() {
        let params = EthashParams::mainnet();
        let cache = Cache::build(&params.seed(0), 64 * 64).unwrap();
        assert_eq!(dataset_item(&cache, 0).len(), 16);
    }
}
