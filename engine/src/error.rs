//! Error taxonomy for the Ethash engine. Kept narrow: malformed inputs, cache/DAG
//! construction failures, and nothing else — a failed PoW check is a normal `false`
//! return, never an error (see `EthashEngine::verify`).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EthashError {
    /// A caller-supplied value had the wrong shape (wrong length, misaligned size, etc).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Cache or dataset-item construction could not proceed (e.g. allocation failure).
    #[error("cache generation failed: {0}")]
    CacheGeneration(String),
}
