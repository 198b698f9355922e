//! The memory-hard mixing kernel: 64 dataset-item lookups folded with FNV into a 32-word
//! mix, then compressed into a mix hash and a difficulty boundary.

use crate::error::EthashError;
use crate::params::{MIX_BYTES, WORD_BYTES};
use crate::primitives::{bytes_to_words_le, fnv, keccak256, keccak512, rem_unsigned, words_to_bytes_le};

const MIX_WORDS: usize = (MIX_BYTES / WORD_BYTES) as usize; // 32
const MIX_HASHES: usize = 2; // MIX_BYTES / HASH_BYTES
const ROW_WORDS: usize = 16; // HASH_BYTES / WORD_BYTES

/// The two outputs of one `hashimoto` evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOfWork {
    pub mix_hash: [u8; 32],
    pub difficulty_boundary: [u8; 32],
}

/// Runs the hashimoto kernel over a caller-supplied dataset lookup.
///
/// `lookup(i)` must return the 16-word dataset item at index `i`; the light path derives
/// it from the epoch cache on every call, a full-DAG path would index a materialized
/// array instead. Either way `hashimoto` itself does not care which.
pub fn hashimoto(
    header_prehash: &[u8; 32],
    nonce: &[u8; 8],
    dataset_byte_size: u64,
    lookup: impl Fn(u32) -> [u32; 16],
) -> Result<ProofOfWork, EthashError> {
    if dataset_byte_size % MIX_BYTES != 0 {
        return Err(EthashError::InvalidInput(format!(
            "dataset byte size {} is not a multiple of MIX_BYTES ({})",
            dataset_byte_size, MIX_BYTES
        )));
    }
    let num_full_pages = (dataset_byte_size / MIX_BYTES) as u32;

    let mut reversed_nonce = *nonce;
    reversed_nonce.reverse();
    let mut seed_input = Vec::with_capacity(40);
    seed_input.extend_from_slice(header_prehash);
    seed_input.extend_from_slice(&reversed_nonce);
    let s = bytes_to_words_le(&keccak512(&seed_input));

    let mut mix = [0u32; MIX_WORDS];
    for (i, word) in mix.iter_mut().enumerate() {
        *word = s[i % s.len()];
    }

    for i in 0..crate::params::ACCESSES {
        let p = rem_unsigned(fnv(i ^ s[0], mix[(i as usize) % MIX_WORDS]), num_full_pages);

        let mut new_data = [0u32; MIX_WORDS];
        for j in 0..MIX_HASHES {
            let item = lookup(p * MIX_HASHES as u32 + j as u32);
            new_data[j * ROW_WORDS..(j + 1) * ROW_WORDS].copy_from_slice(&item);
        }
        for k in 0..MIX_WORDS {
            mix[k] = fnv(mix[k], new_data[k]);
        }
    }

    let mut cmix = [0u32; MIX_WORDS / 4];
    for (out_idx, chunk) in mix.chunks_exact(4).enumerate() {
        cmix[out_idx] = fnv(fnv(fnv(chunk[0], chunk[1]), chunk[2]), chunk[3]);
    }

    let mix_hash_bytes = words_to_bytes_le(&cmix);
    let mut mix_hash = [0u8; 32];
    mix_hash.copy_from_slice(&mix_hash_bytes);

    let mut boundary_input = words_to_bytes_le(&s);
    boundary_input.extend_from_slice(&mix_hash_bytes);
    let difficulty_boundary = keccak256(&boundary_input);

    Ok(ProofOfWork {
        mix_hash,
        difficulty_boundary,
    })
}
