//! Low-level building blocks the rest of the engine composes: Keccak hashing, the FNV
//! mixing step, little-endian word marshaling, unsigned modulo, and big-endian byte
//! comparison.

use byteorder::{ByteOrder, LittleEndian};
use sha3::{Digest, Keccak256, Keccak512};
use std::cmp::Ordering;

/// `FNV_PRIME` from the Ethash spec, used by the `fnv` mixing step.
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Keccak-256 (not SHA3-256) of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-512 (not SHA3-512) of `data`.
pub fn keccak512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Keccak512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `(a * FNV_PRIME) XOR b`, wrapping on overflow as unsigned 32-bit arithmetic.
#[inline]
pub fn fnv(a: u32, b: u32) -> u32 {
    a.wrapping_mul(FNV_PRIME) ^ b
}

/// Groups `buf` into little-endian `u32` words. `buf.len()` must be a multiple of 4.
pub fn bytes_to_words_le(buf: &[u8]) -> Vec<u32> {
    debug_assert_eq!(buf.len() % 4, 0, "bytes_to_words_le: length not a multiple of 4");
    buf.chunks_exact(4).map(LittleEndian::read_u32).collect()
}

/// Inverse of `bytes_to_words_le`: emits each word little-endian.
pub fn words_to_bytes_le(words: &[u32]) -> Vec<u8> {
    let mut out = vec![0u8; words.len() * 4];
    LittleEndian::write_u32_into(words, &mut out);
    out
}

/// Unsigned 32-bit modulo. Native Rust `u32` arithmetic is already unsigned, so this is a
/// thin wrapper kept around only to name the operation at call sites that mirror the
/// reference specification's "rem_unsigned" step (which compensates for a host language
/// without unsigned integers).
#[inline]
pub fn rem_unsigned(dividend: u32, divisor: u32) -> u32 {
    dividend % divisor
}

/// Compares two byte sequences as unsigned big-endian integers. Both slices are expected
/// to already be the same length (typically 32 bytes); if they aren't, the shorter one is
/// treated as if padded with leading zeros.
pub fn unsigned_be_compare(a: &[u8], b: &[u8]) -> Ordering {
    if a.len() != b.len() {
        let (shorter, longer, shorter_first) = if a.len() < b.len() {
            (a, b, true)
        } else {
            (b, a, false)
        };
        let pad = longer.len() - shorter.len();
        if longer[..pad].iter().any(|&byte| byte != 0) {
            return if shorter_first {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        return unsigned_be_compare(shorter, &longer[pad..]);
    }
    a.cmp(b)
}
