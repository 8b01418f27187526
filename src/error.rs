//! Error types for klvgen.

use thiserror::Error;

/// Result type alias using klvgen's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for klvgen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration validation failed (bad rate, range, or address).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error (socket setup or send).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
