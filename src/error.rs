//! Error types for spsim operations.

use thiserror::Error;

/// Result type alias for spsim operations.
pub type Result<T> = std::result::Result<T, SpsimError>;

/// Error taxonomy for the similarity engine.
///
/// The core is purely computational: degenerate inputs (empty strings,
/// identical strings) are defined results, never errors. The only core
/// failure mode is a malformed phrase input.
#[derive(Error, Debug)]
pub enum SpsimError {
    /// A token sequence contained an empty token or a token with
    /// internal whitespace.
    #[error("invalid phrase: {0}")]
    InvalidPhrase(String),

    /// IO error (CLI layer only)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
