//! The card merge engine.
//!
//! Single source of truth for deduplication semantics: every add/move path
//! in the deck store funnels through [`merge_card_lists`].

use std::collections::HashSet;

use serde_json::Value;

use crate::batch::{card_list_from_value, is_card_list_valid};
use crate::error::Result;
use crate::types::{CardContent, MergeOutcome, MergeStats};

/// Normalize card text for comparison: trim, replace non-breaking spaces
/// with regular spaces, lowercase.
pub fn normalize_text(text: &str) -> String {
    text.trim().replace('\u{00A0}', " ").to_lowercase()
}

/// Merge `incoming` into `existing`, discarding duplicates by normalized key.
///
/// The result preserves `existing` unchanged and in order, then appends the
/// accepted incoming cards in input order. Two incoming cards with the same
/// key keep only the first occurrence.
pub fn merge_card_lists(existing: &[CardContent], incoming: &[CardContent]) -> MergeOutcome {
    let mut seen: HashSet<(String, String)> =
        existing.iter().map(CardContent::normalized_key).collect();

    let mut merged = existing.to_vec();
    let mut added = 0;
    let mut duplicates = 0;

    for card in incoming {
        if seen.insert(card.normalized_key()) {
            merged.push(card.clone());
            added += 1;
        } else {
            duplicates += 1;
        }
    }

    let stats = MergeStats {
        before: existing.len(),
        added,
        duplicates,
        after: merged.len(),
    };
    MergeOutcome { merged, stats }
}

/// Merge two JSON card batches.
///
/// An `existing` batch that fails validation is treated as empty rather
/// than raised: stored data that has gone bad must not block a merge. An
/// invalid `incoming` batch is an error, since a malformed new batch
/// signals caller misuse or corrupted input. The asymmetry is deliberate;
/// do not unify the two policies.
pub fn merge_cards(existing: &Value, incoming: &Value) -> Result<MergeOutcome> {
    let existing = if is_card_list_valid(existing) {
        card_list_from_value(existing)?
    } else {
        Vec::new()
    };
    let incoming = card_list_from_value(incoming)?;

    Ok(merge_card_lists(&existing, &incoming))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CardListError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn card(question: &str, answer: &str) -> CardContent {
        CardContent::new(question, answer)
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_text("  What?  "), "what?");
        assert_eq!(normalize_text("PARIS"), "paris");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn normalize_replaces_non_breaking_space() {
        assert_eq!(normalize_text("a\u{00A0}b"), "a b");
        // NBSP at the edges counts as whitespace and is trimmed first.
        assert_eq!(normalize_text("\u{00A0}x\u{00A0}"), "x");
    }

    #[test]
    fn merge_appends_new_cards_in_order() {
        let existing = vec![card("A", "1"), card("B", "2")];
        let incoming = vec![card("C", "3"), card("A", "1"), card("D", "4")];

        let outcome = merge_card_lists(&existing, &incoming);
        assert_eq!(
            outcome.merged,
            vec![card("A", "1"), card("B", "2"), card("C", "3"), card("D", "4")]
        );
        assert_eq!(
            outcome.stats,
            MergeStats { before: 2, added: 2, duplicates: 1, after: 4 }
        );
    }

    #[test]
    fn merge_dedups_on_case_and_whitespace() {
        let existing = vec![card(" Cap? ", "Paris")];
        let incoming = vec![card("cap?", "PARIS")];

        let outcome = merge_card_lists(&existing, &incoming);
        assert_eq!(outcome.merged, existing);
        assert_eq!(outcome.stats.added, 0);
        assert_eq!(outcome.stats.duplicates, 1);
    }

    #[test]
    fn within_batch_duplicates_keep_first_occurrence() {
        let incoming = vec![card("Q", "a"), card(" q ", "A"), card("Q", "a")];

        let outcome = merge_card_lists(&[], &incoming);
        assert_eq!(outcome.merged, vec![card("Q", "a")]);
        assert_eq!(
            outcome.stats,
            MergeStats { before: 0, added: 1, duplicates: 2, after: 1 }
        );
    }

    #[test]
    fn remerge_is_idempotent() {
        let existing = vec![card("A", "1")];
        let incoming = vec![card("B", "2"), card("C", "3")];

        let first = merge_card_lists(&existing, &incoming);
        let second = merge_card_lists(&first.merged, &[]);
        assert_eq!(second.merged, first.merged);
        assert_eq!(second.stats.added, 0);
        assert_eq!(second.stats.duplicates, 0);
    }

    #[test]
    fn stats_arithmetic_holds() {
        let existing = vec![card("A", "1"), card("B", "2")];
        let incoming = vec![card("A", "1"), card("C", "3"), card("c", "3 ")];

        let outcome = merge_card_lists(&existing, &incoming);
        assert_eq!(outcome.stats.after, outcome.stats.before + outcome.stats.added);
        assert_eq!(outcome.stats.added + outcome.stats.duplicates, incoming.len());
    }

    #[test]
    fn invalid_incoming_is_rejected() {
        let err = merge_cards(&json!([]), &json!([{"q": "x"}])).unwrap_err();
        assert!(matches!(err, CardListError::MissingField { index: 0, field: "question" }));
    }

    #[test]
    fn invalid_existing_is_treated_as_empty() {
        let existing = json!({"not": "a list"});
        let incoming = json!([{"question": "Q", "answer": "A"}]);

        let outcome = merge_cards(&existing, &incoming).unwrap();
        assert_eq!(outcome.merged, vec![card("Q", "A")]);
        assert_eq!(
            outcome.stats,
            MergeStats { before: 0, added: 1, duplicates: 0, after: 1 }
        );
    }

    #[test]
    fn merge_from_json_batches() {
        let existing = json!([{"question": "A", "answer": "1"}]);
        let incoming = json!([
            {"question": "a ", "answer": " 1"},
            {"question": "B", "answer": "2"},
        ]);

        let outcome = merge_cards(&existing, &incoming).unwrap();
        assert_eq!(outcome.merged, vec![card("A", "1"), card("B", "2")]);
        assert_eq!(
            outcome.stats,
            MergeStats { before: 1, added: 1, duplicates: 1, after: 2 }
        );
    }
}
