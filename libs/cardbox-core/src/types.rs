//! Core types for deck and card handling.

use serde::{Deserialize, Serialize};

use crate::merge::normalize_text;

/// A question/answer pair, independent of any storage identity.
///
/// Cards are never compared by identity or source formatting; equality for
/// deduplication purposes goes through [`CardContent::normalized_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    pub question: String,
    pub answer: String,
}

impl CardContent {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Case- and whitespace-insensitive fingerprint used for deduplication.
    ///
    /// Computed on demand; never persisted.
    pub fn normalized_key(&self) -> (String, String) {
        (normalize_text(&self.question), normalize_text(&self.answer))
    }
}

/// Statistics produced by a merge.
///
/// `duplicates` counts cross-batch and within-batch duplicates combined, so
/// `added + duplicates` equals the raw incoming length and
/// `after == before + added` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub before: usize,
    pub added: usize,
    pub duplicates: usize,
    pub after: usize,
}

/// Result of merging an incoming batch into an existing card list.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The existing cards unchanged and in order, followed by newly
    /// accepted cards in the order they appeared in the incoming batch.
    pub merged: Vec<CardContent>,
    pub stats: MergeStats,
}
