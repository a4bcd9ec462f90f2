use thiserror::Error;

/// Top-level error type for the Barista system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for BaristaError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BaristaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Menu error: {0}")]
    Menu(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Voice error: {0}")]
    Voice(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BaristaError {
    fn from(err: toml::de::Error) -> Self {
        BaristaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BaristaError {
    fn from(err: toml::ser::Error) -> Self {
        BaristaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BaristaError {
    fn from(err: serde_json::Error) -> Self {
        BaristaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Barista operations.
pub type Result<T> = std::result::Result<T, BaristaError>;
