//! Error types for resolute

use std::io;
use thiserror::Error;

/// Recoverable error conditions surfaced to callers.
///
/// Internal invariant violations (ordering admissibility breaches mid-search,
/// container bookkeeping going wrong) are bugs and panic instead.
#[derive(Error, Debug)]
pub enum ProverError {
    /// Malformed input, inconsistent options, or non-admissible KBO parameters
    #[error("user error: {0}")]
    User(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Asynchronous cancellation observed
    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, ProverError>;
