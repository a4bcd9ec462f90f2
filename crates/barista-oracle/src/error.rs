//! Error types for oracle calls.

use barista_core::error::BaristaError;

/// Errors from the oracle subsystem.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle unreachable: {0}")]
    Transport(String),
    #[error("oracle returned no completion")]
    EmptyCompletion,
    #[error("oracle output malformed: {0}")]
    Malformed(String),
    /// The test oracle ran out of scripted replies.
    #[error("scripted oracle exhausted")]
    Exhausted,
}

impl From<OracleError> for BaristaError {
    fn from(err: OracleError) -> Self {
        BaristaError::Oracle(err.to_string())
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Transport(err.to_string())
    }
}
