//! `EthashEngine`: owns the process-wide epoch -> cache memoization and exposes the
//! convenience `verify` entry point that chains cache resolution, hashimoto, and the
//! difficulty check.

use crate::cache::Cache;
use crate::dataset::dataset_item;
use crate::error::EthashError;
use crate::hashimoto::{hashimoto, ProofOfWork};
use crate::params::EthashParams;
use crate::verify::check_difficulty;
use ethashd_core::BlockHeader;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// At most this many distinct epochs' caches are kept alive at once: the current epoch
/// and the previous one, so verification straddling an epoch boundary never has to
/// rebuild a cache it just evicted.
const MAX_LIVE_CACHES: usize = 2;

/// Shared, read-mostly Ethash context: one `EthashParams` profile plus a bounded,
/// lock-protected map from epoch to its cache.
#[derive(Debug)]
pub struct EthashEngine {
    params: EthashParams,
    caches: RwLock<HashMap<u64, Arc<Cache>>>,
    /// Insertion order, oldest first, used to decide which cache to evict. Kept alongside
    /// the map rather than derived from it because `HashMap` iteration order is
    /// unspecified.
    order: RwLock<Vec<u64>>,
}

impl EthashEngine {
    /// Builds an engine for the given parameter profile. No caches are built yet; they
    /// are built lazily on first use of their epoch.
    pub fn new(params: EthashParams) -> Self {
        EthashEngine {
            params,
            caches: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
        }
    }

    pub fn params(&self) -> &EthashParams {
        &self.params
    }

    /// Returns the cache for the epoch containing `number`, building and memoizing it if
    /// this is the first request for that epoch. At most `MAX_LIVE_CACHES` epochs are
    /// kept; requesting a third distinct epoch evicts the oldest. `Err` only if building a
    /// new cache's backing allocation fails; a memoized cache is always returned `Ok`.
    pub fn cache_for(&self, number: u64) -> Result<Arc<Cache>, EthashError> {
        let epoch = self.params.epoch(number);

        if let Some(cache) = self.caches.read().unwrap().get(&epoch) {
            return Ok(cache.clone());
        }

        let seed = self.params.seed(number);
        let cache_bytes = self.params.cache_size(number);
        info!("ethash_engine_cache_miss epoch={}", epoch);
        let built = Arc::new(Cache::build(&seed, cache_bytes)?);

        let mut caches = self.caches.write().unwrap();
        let mut order = self.order.write().unwrap();
        // Another thread may have built the same epoch while we didn't hold the lock;
        // prefer whichever landed first so identical epochs never diverge in memory.
        let cache = caches.entry(epoch).or_insert(built).clone();
        if !order.contains(&epoch) {
            order.push(epoch);
        }
        while order.len() > MAX_LIVE_CACHES {
            let evicted = order.remove(0);
            caches.remove(&evicted);
            debug!("ethash_engine_cache_evict epoch={}", evicted);
        }

        Ok(cache)
    }

    /// Runs `hashimoto_light` for `number`/`header_prehash`/`nonce` against this engine's
    /// memoized cache.
    pub fn hashimoto_light(
        &self,
        number: u64,
        header_prehash: &[u8; 32],
        nonce: &[u8; 8],
    ) -> Result<ProofOfWork, EthashError> {
        let cache = self.cache_for(number)?;
        let dataset_bytes = self.params.dataset_size(number);
        hashimoto(header_prehash, nonce, dataset_bytes, |i| {
            dataset_item(&cache, i)
        })
    }

    /// Resolves the cache for `header.number`, runs hashimoto, and checks the result
    /// against `header.difficulty` and `header.mix_hash`. Returns `Ok(false)` for any PoW
    /// that fails to meet the claimed difficulty; `Err` only for malformed inputs.
    ///
    /// `header.difficulty` is a plain `pub` field, not a validated type, so a zero
    /// difficulty (e.g. from a struct literal or deserialized from untrusted bytes) is
    /// rejected here before doing any hashimoto work rather than relying on the caller
    /// having gone through `BlockHeader::new`.
    pub fn verify(&self, header: &BlockHeader) -> Result<bool, EthashError> {
        if header.difficulty == 0 {
            debug!("ethash_engine_verify_failed number={} reason=zero_difficulty", header.number);
            return Ok(false);
        }
        let proof = self.hashimoto_light(header.number, &header.seal_hash, &header.nonce)?;
        let accepted = check_difficulty(header.difficulty, &header.mix_hash, &proof);
        if !accepted {
            debug!(
                "ethash_engine_verify_failed number={} epoch={}",
                header.number,
                self.params.epoch(header.number)
            );
        }
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(number: u64, difficulty: u64, nonce: [u8; 8]) -> BlockHeader {
        BlockHeader {
            number,
            difficulty,
            mix_hash: [0u8; 32],
            nonce,
            seal_hash: crate::primitives::keccak256(b""),
        }
    }

    #[test]
    fn cache_is_memoized_within_an_epoch() {
        let engine = EthashEngine::new(EthashParams::regtest());
        let a = engine.cache_for(0).unwrap();
        let b = engine.cache_for(5).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn third_epoch_evicts_the_oldest() {
        let engine = EthashEngine::new(EthashParams::regtest());
        let epoch_len = engine.params().epoch_length;
        let c0 = engine.cache_for(0).unwrap();
        let _c1 = engine.cache_for(epoch_len).unwrap();
        let _c2 = engine.cache_for(2 * epoch_len).unwrap();
        let c0_again = engine.cache_for(0).unwrap();
        // Epoch 0 was evicted by the time epoch 2 was requested, so this is a fresh
        // (but byte-identical) cache, not the same allocation.
        assert!(!Arc::ptr_eq(&c0, &c0_again));
        assert_eq!(c0.words(), c0_again.words());
    }

    #[test]
    fn verify_fails_closed_on_mismatched_difficulty_without_erroring() {
        let engine = EthashEngine::new(EthashParams::regtest());
        let h = header(0, 1 << 63, [0u8; 8]);
        let accepted = engine.verify(&h).unwrap();
        // With an astronomically high difficulty this arbitrary nonce will not satisfy
        // the target; the important assertion is that this is `Ok(false)`, not an error.
        assert!(!accepted);
    }

    #[test]
    fn verify_rejects_zero_difficulty_struct_literal_without_panicking() {
        // Constructed directly (not via `BlockHeader::new`, which would reject this),
        // to exercise the case where the type's invariant was bypassed.
        let engine = EthashEngine::new(EthashParams::regtest());
        let h = header(0, 0, [0u8; 8]);
        assert!(!engine.verify(&h).unwrap());
    }

    #[test]
    fn verify_is_idempotent() {
        let engine = EthashEngine::new(EthashParams::regtest());
        let h = header(0, 1, [0u8; 8]);
        assert_eq!(engine.verify(&h).unwrap(), engine.verify(&h).unwrap());
    }
}
