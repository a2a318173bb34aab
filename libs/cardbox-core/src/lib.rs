//! Core flashcard library shared by the deck store and its callers.
//!
//! Provides:
//! - Structural validation for JSON card batches
//! - Text normalization and duplicate keys for cards
//! - The merge engine that combines a new batch into an existing card list
//! - Shared types (CardContent, MergeStats, MergeOutcome)
//!
//! Everything in this crate is pure: no I/O, no clocks, no database. The
//! deck store routes every card-insertion path through [`merge_card_lists`]
//! so that deduplication semantics live in exactly one place.

pub mod batch;
pub mod error;
pub mod merge;
pub mod types;

pub use batch::{card_list_from_value, is_card_list_valid};
pub use error::{CardListError, Result};
pub use merge::{merge_card_lists, merge_cards, normalize_text};
pub use types::{CardContent, MergeOutcome, MergeStats};
