//! Minimal block header types shared between the Ethash engine and its callers.
//!
//! Full header parsing, RLP codecs, chain storage and wire protocols live outside this
//! crate; `BlockHeader` here only carries the fields the Ethash engine needs to verify a
//! claimed proof of work.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 32-byte hash type used throughout the engine (Keccak-256 output width).
pub type Hash = [u8; 32];

/// Networks this header may belong to. Only `epoch_length` differs between them in
/// practice; see `ethashd_engine::EthashParams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    /// Main production network.
    Mainnet,
    /// Test network for development.
    Testnet,
    /// Local regression testing, short epochs.
    Regtest,
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
            Network::Regtest => write!(f, "regtest"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(CoreError::UnknownNetwork(other.to_string())),
        }
    }
}

/// The subset of a block header the Ethash engine needs.
///
/// `seal_hash` stands in for "Keccak-256 of the header's RLP encoding with the nonce and
/// mix-hash fields stripped": producing that hash is the chain layer's job, not this
/// crate's, so it is carried here as an opaque, already-computed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block height, used to derive the Ethash epoch.
    pub number: u64,
    /// Claimed difficulty. Must be >= 1.
    pub difficulty: u64,
    /// Mix hash claimed by the header.
    pub mix_hash: Hash,
    /// Proof-of-work nonce, big-endian as carried in the header.
    pub nonce: [u8; 8],
    /// Keccak-256 of the header's encoding with `nonce` and `mix_hash` cleared.
    pub seal_hash: Hash,
}

impl BlockHeader {
    /// Builds a header from its constituent fields, checking only shape invariants that
    /// are cheap and load-bearing for the engine (a zero difficulty would make the target
    /// computation meaningless).
    pub fn new(
        number: u64,
        difficulty: u64,
        mix_hash: Hash,
        nonce: [u8; 8],
        seal_hash: Hash,
    ) -> Result<Self, CoreError> {
        if difficulty == 0 {
            return Err(CoreError::InvalidDifficulty);
        }
        Ok(BlockHeader {
            number,
            difficulty,
            mix_hash,
            nonce,
            seal_hash,
        })
    }
}

/// Errors produced while constructing or interpreting header types.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("difficulty must be >= 1")]
    InvalidDifficulty,

    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] ethashd_util::UtilError),

    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("unknown network profile: {0} (expected mainnet, testnet or regtest)")]
    UnknownNetwork(String),
}

/// Parses a hex string (with or without a `0x` prefix) into a fixed-size byte array.
pub fn hash_from_hex(s: &str) -> Result<Hash, CoreError> {
    let bytes = ethashd_util::hex_to_bytes(s.trim_start_matches("0x"))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| CoreError::WrongLength {
            expected: 32,
            actual: v.len(),
        })
}

/// Parses a hex string into an 8-byte nonce, big-endian as carried in the header.
pub fn nonce_from_hex(s: &str) -> Result<[u8; 8], CoreError> {
    let bytes = ethashd_util::hex_to_bytes(s.trim_start_matches("0x"))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| CoreError::WrongLength {
            expected: 8,
            actual: v.len(),
        })
}
