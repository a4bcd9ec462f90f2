//! Error types for ledger access.

use barista_core::error::BaristaError;

/// Errors from the ledger subsystem.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger row malformed: {0}")]
    Malformed(String),
    #[error("row index {index} out of range (ledger has {len} rows)")]
    OutOfRange { index: usize, len: usize },
}

impl From<LedgerError> for BaristaError {
    fn from(err: LedgerError) -> Self {
        BaristaError::Ledger(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::Malformed("not an array".to_string());
        assert_eq!(err.to_string(), "ledger row malformed: not an array");

        let err = LedgerError::OutOfRange { index: 9, len: 2 };
        assert_eq!(err.to_string(), "row index 9 out of range (ledger has 2 rows)");
    }

    #[test]
    fn test_ledger_error_into_barista_error() {
        let err: BaristaError = LedgerError::Malformed("bad".to_string()).into();
        assert!(matches!(err, BaristaError::Ledger(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LedgerError = io.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}
