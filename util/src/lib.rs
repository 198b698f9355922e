//! Small shared utilities: hex helpers and logging setup.

use thiserror::Error;

/// Errors from the hex helpers below.
#[derive(Error, Debug)]
pub enum UtilError {
    #[error("hex decoding error: {0}")]
    HexError(#[from] hex::FromHexError),
}

/// Converts a hex string to bytes.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, UtilError> {
    Ok(hex::decode(hex)?)
}

/// Converts bytes to a hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Initializes `env_logger` at the given verbosity level (0 = errors only, 4+ = trace),
/// matching the level mapping the binary entry point uses.
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let _ = env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .try_init();
}
