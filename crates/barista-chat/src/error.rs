//! Error types for the conversation engine.

use barista_core::error::BaristaError;
use barista_ledger::LedgerError;
use barista_oracle::OracleError;

/// Errors from the order-construction engine and its sibling paths.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("session id is required")]
    MissingSessionId,
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),
    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<ChatError> for BaristaError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MissingSessionId => {
                BaristaError::InvalidInput(err.to_string())
            }
            ChatError::Oracle(e) => e.into(),
            ChatError::Ledger(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MissingSessionId.to_string(),
            "session id is required"
        );

        let err = ChatError::Oracle(OracleError::EmptyCompletion);
        assert_eq!(
            err.to_string(),
            "oracle failure: oracle returned no completion"
        );
    }

    #[test]
    fn test_validation_errors_map_to_invalid_input() {
        let err: BaristaError = ChatError::EmptyMessage.into();
        assert!(matches!(err, BaristaError::InvalidInput(_)));

        let err: BaristaError = ChatError::MissingSessionId.into();
        assert!(matches!(err, BaristaError::InvalidInput(_)));
    }

    #[test]
    fn test_upstream_errors_keep_their_taxonomy() {
        let err: BaristaError = ChatError::Oracle(OracleError::EmptyCompletion).into();
        assert!(matches!(err, BaristaError::Oracle(_)));

        let err: BaristaError =
            ChatError::Ledger(LedgerError::Malformed("bad row".to_string())).into();
        assert!(matches!(err, BaristaError::Ledger(_)));
    }
}
