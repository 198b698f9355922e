//! Ethash proof-of-work engine.
//!
//! Four composable layers, leaves first: primitives (Keccak, FNV, word marshaling),
//! parameters (epoch/seed/size derivation), cache & dataset construction, and the
//! hashimoto mixing kernel plus the difficulty check built on top of it. `EthashEngine`
//! wraps all four behind the process-wide cache memoization described in the module
//! docs on [`engine::EthashEngine`].

pub mod cache;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod hashimoto;
pub mod params;
pub mod primitives;
pub mod verify;

pub use cache::Cache;
pub use dataset::dataset_item;
pub use engine::EthashEngine;
pub use error::EthashError;
pub use hashimoto::{hashimoto, ProofOfWork};
pub use params::EthashParams;
pub use verify::{check_difficulty, target_from_difficulty};
