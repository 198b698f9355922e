//! Difficulty target computation and the final accept/reject decision.

use crate::hashimoto::ProofOfWork;
use crate::primitives::unsigned_be_compare;
use std::cmp::Ordering;

/// Computes `2^256 / difficulty`, left-padded to 32 bytes big-endian. Returns `None` for
/// `difficulty == 0`: the data model requires difficulty to be a positive integer (§3),
/// but that invariant is not enforced by the `BlockHeader` type itself (its fields are
/// plain `pub`, constructible via a struct literal or via deserialization of untrusted
/// bytes), so this function treats a zero difficulty as "no valid target" rather than
/// dividing by zero.
///
/// `difficulty == 1` is a special case: the true quotient is `2^256`, which does not fit
/// in 256 bits at all. By the same convention every Ethash/Bitcoin-style implementation
/// uses, that case saturates to the largest representable 256-bit value (all-ones) rather
/// than overflowing, i.e. "minimum difficulty accepts everything".
pub fn target_from_difficulty(difficulty: u64) -> Option<[u8; 32]> {
    if difficulty == 0 {
        return None;
    }
    if difficulty == 1 {
        return Some([0xffu8; 32]);
    }
    // Long-divide 2^256 by `difficulty` one byte at a time. 2^256 is represented as an
    // implicit leading 1 bit followed by 256 zero bits; seeding the running remainder
    // with that leading 1 before consuming the (all-zero) byte stream computes
    // floor(2^256 / difficulty) without ever materializing a 257-bit numerator.
    let mut quotient = [0u8; 32];
    let mut remainder: u128 = 1;
    for byte in quotient.iter_mut() {
        remainder <<= 8;
        *byte = (remainder / difficulty as u128) as u8;
        remainder %= difficulty as u128;
    }
    Some(quotient)
}

/// Accepts iff `target >= proof.difficulty_boundary` (i.e. the boundary is numerically no
/// larger than the target) and the computed mix hash matches the header's claimed one. A
/// `difficulty` of zero has no valid target and is always rejected, never a panic.
pub fn check_difficulty(difficulty: u64, header_mix_hash: &[u8; 32], proof: &ProofOfWork) -> bool {
    let Some(target) = target_from_difficulty(difficulty) else {
        return false;
    };
    let boundary_ok = !matches!(
        unsigned_be_compare(&target, &proof.difficulty_boundary),
        Ordering::Less
    );
    boundary_ok && header_mix_hash == &proof.mix_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_one_yields_max_target() {
        assert_eq!(target_from_difficulty(1), Some([0xffu8; 32]));
    }

    #[test]
    fn difficulty_zero_has_no_target() {
        assert_eq!(target_from_difficulty(0), None);
    }

    #[test]
    fn higher_difficulty_yields_smaller_target() {
        let t1 = target_from_difficulty(2).unwrap();
        let t2 = target_from_difficulty(1 << 20).unwrap();
        assert_eq!(unsigned_be_compare(&t1, &t2), Ordering::Greater);
    }

    #[test]
    fn accepts_when_boundary_at_or_below_target() {
        let proof = ProofOfWork {
            mix_hash: [9u8; 32],
            difficulty_boundary: [0u8; 32],
        };
        assert!(check_difficulty(1, &[9u8; 32], &proof));
    }

    #[test]
    fn rejects_when_boundary_exceeds_target() {
        // difficulty = 2^255 -> target's leading byte is 0x00 with the rest 0xff-ish;
        // a boundary whose leading byte is >= 2 is clearly above that target.
        let difficulty = 1u64 << 63; // largest representable in u64, still << 2^255
        let mut boundary = [0u8; 32];
        boundary[0] = 0xff;
        let proof = ProofOfWork {
            mix_hash: [0u8; 32],
            difficulty_boundary: boundary,
        };
        assert!(!check_difficulty(difficulty, &[0u8; 32], &proof));
    }

    #[test]
    fn rejects_on_mix_hash_mismatch_even_if_boundary_passes() {
        let proof = ProofOfWork {
            mix_hash: [1u8; 32],
            difficulty_boundary: [0u8; 32],
        };
        assert!(!check_difficulty(1, &[2u8; 32], &proof));
    }

    #[test]
    fn idempotent() {
        let proof = ProofOfWork {
            mix_hash: [3u8; 32],
            difficulty_boundary: [5u8; 32],
        };
        let a = check_difficulty(1000, &[3u8; 32], &proof);
        let b = check_difficulty(1000, &[3u8; 32], &proof);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_difficulty_is_rejected_not_a_panic() {
        let proof = ProofOfWork {
            mix_hash: [0u8; 32],
            difficulty_boundary: [0u8; 32],
        };
        assert!(!check_difficulty(0, &[0u8; 32], &proof));
    }
}
