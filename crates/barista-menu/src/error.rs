//! Error types for menu fetching and parsing.

use barista_core::error::BaristaError;

/// Errors from the menu subsystem.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("menu source unreachable: {0}")]
    Source(String),
    #[error("menu payload malformed: {0}")]
    Malformed(String),
}

impl From<MenuError> for BaristaError {
    fn from(err: MenuError) -> Self {
        BaristaError::Menu(err.to_string())
    }
}

impl From<reqwest::Error> for MenuError {
    fn from(err: reqwest::Error) -> Self {
        MenuError::Source(err.to_string())
    }
}
