//! Error types for cardbox-core.

use thiserror::Error;

/// Result type alias using CardListError.
pub type Result<T> = std::result::Result<T, CardListError>;

/// Errors raised when a JSON card batch fails structural validation.
///
/// These only ever describe *incoming* data. Card lists that are already
/// stored are trusted; see [`crate::merge::merge_cards`].
#[derive(Debug, Error)]
pub enum CardListError {
    #[error("card list must be a JSON array")]
    NotAnArray,

    #[error("card at index {index} is not an object")]
    NotAnObject { index: usize },

    #[error("card at index {index} is missing the '{field}' field")]
    MissingField { index: usize, field: &'static str },
}
