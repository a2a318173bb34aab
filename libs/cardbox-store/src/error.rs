//! Deck store error types.

use cardbox_core::CardListError;
use thiserror::Error;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A new card batch failed structural validation. Raised only for
    /// incoming data; stored data is never rejected this way.
    #[error("malformed card batch: {0}")]
    MalformedInput(#[from] CardListError),

    #[error("bad format JSON: {0}")]
    BadJson(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("another deck is already named '{0}'")]
    NameConflict(String),

    #[error("package export failed: {0}")]
    Export(String),
}
