//! Persistent flashcard deck store.
//!
//! Decks and cards live in a local SQLite database. Every card-insertion
//! path routes through the cardbox-core merge engine, so no deck gains two
//! cards with the same normalized key. The store also owns the one-time
//! import of the legacy per-deck JSON library, a validated JSON intake
//! helper, and Anki package export.
//!
//! The store targets a single-process interactive application: each
//! operation opens its own connection and commits before returning.
//! Operations are atomic individually but concurrent read-merge-write
//! sequences against the same deck are not isolated from each other.

pub mod config;
pub mod error;
pub mod export;
pub mod intake;
mod migrate;
pub mod schema;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use store::{Card, Deck, DeckStore, DeckSummary, MoveStats};
