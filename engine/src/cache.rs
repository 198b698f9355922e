//! Epoch cache construction: seed -> sequential Keccak-512 chain -> `CACHE_ROUNDS` of
//! self-mixing.

use crate::error::EthashError;
use crate::params::{CACHE_ROUNDS, HASH_BYTES};
use crate::primitives::{bytes_to_words_le, keccak512, rem_unsigned};
use log::debug;
use std::time::Instant;

/// An immutable per-epoch cache: `HASH_BYTES`-wide rows reinterpreted as little-endian
/// `u32` words. Once built, a `Cache` is never mutated again; the engine layer only ever
/// hands it out behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    words: Vec<u32>,
}

impl Cache {
    /// Builds the cache for the epoch whose seed is `seed` and whose size is
    /// `cache_bytes` (must be a multiple of `HASH_BYTES`; callers get this from
    /// `EthashParams::cache_size`). Mainnet cache sizes run into the tens of megabytes and
    /// grow every epoch, so the backing allocation is fallible rather than aborting the
    /// process on exhaustion (§7's "resource exhaustion" error path).
    pub fn build(seed: &[u8; 32], cache_bytes: u64) -> Result<Cache, EthashError> {
        let started = Instant::now();
        let rows = (cache_bytes / HASH_BYTES) as usize;
        let byte_len = rows * HASH_BYTES as usize;
        debug!("ethash_cache_build_start rows={}", rows);

        let mut data: Vec<u8> = Vec::new();
        data.try_reserve_exact(byte_len).map_err(|e| {
            EthashError::CacheGeneration(format!(
                "failed to allocate {byte_len} bytes for {rows} cache rows: {e}"
            ))
        })?;
        data.resize(byte_len, 0);
        data[0..64].copy_from_slice(&keccak512(seed));
        for i in 1..rows {
            let prev = data[(i - 1) * 64..i * 64].to_vec();
            data[i * 64..(i + 1) * 64].copy_from_slice(&keccak512(&prev));
        }

        let mut scratch = [0u8; 64];
        for _ in 0..CACHE_ROUNDS {
            for i in 0..rows {
                let first_word = u32::from_le_bytes([
                    data[i * 64],
                    data[i * 64 + 1],
                    data[i * 64 + 2],
                    data[i * 64 + 3],
                ]);
                let v = rem_unsigned(first_word, rows as u32) as usize;
                let prev_row = (i + rows - 1) % rows;
                for k in 0..64 {
                    scratch[k] = data[prev_row * 64 + k] ^ data[v * 64 + k];
                }
                data[i * 64..(i + 1) * 64].copy_from_slice(&keccak512(&scratch));
            }
        }

        debug!(
            "ethash_cache_build_done rows={} elapsed_ms={}",
            rows,
            started.elapsed().as_millis()
        );

        Ok(Cache {
            words: bytes_to_words_le(&data),
        })
    }

    /// Cache contents as little-endian 32-bit words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of `HASH_BYTES`-wide rows in this cache.
    pub fn rows(&self) -> usize {
        self.words.len() / (HASH_BYTES as usize / 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::words_to_bytes_le;

    #[test]
    fn head_row_is_keccak512_of_seed() {
        let seed = [0u8; 32];
        let cache = Cache::build(&seed, 64 * 16).unwrap();
        let head = words_to_bytes_le(&cache.words()[0..16]);
        assert_eq!(head, keccak512(&seed));
    }

    #[test]
    fn build_is_deterministic() {
        let seed = [7u8; 32];
        let a = Cache::build(&seed, 64 * 32).unwrap();
        let b = Cache::build(&seed, 64 * 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_produce_different_caches() {
        let a = Cache::build(&[1u8; 32], 64 * 16).unwrap();
        let b = Cache::build(&[2u8; 32], 64 * 16).unwrap();
        assert_ne!(a.words(), b.words());
    }

    #[test]
    fn rows_matches_requested_size() {
        let cache = Cache::build(&[0u8; 32], 64 * 40).unwrap();
        assert_eq!(cache.rows(), 40);
    }

    #[test]
    fn rejects_allocation_too_large_to_reserve() {
        // Not a real epoch size (no real epoch ever needs exabytes); exercises the
        // fallible allocation path directly rather than actually exhausting memory.
        let err = Cache::build(&[0u8; 32], 1u64 << 63).unwrap_err();
        assert!(matches!(err, EthashError::CacheGeneration(_)));
    }
}
