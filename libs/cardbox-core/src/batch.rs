//! Structural validation and typing of JSON card batches.
//!
//! A batch is valid iff it is a JSON array whose every element is an object
//! containing both a `question` and an `answer` key. Field *values* are not
//! type-checked here; anything present is coerced to text when the batch is
//! converted to [`CardContent`].

use serde_json::Value;

use crate::error::{CardListError, Result};
use crate::types::CardContent;

/// Check whether `value` is a structurally valid card list.
///
/// Used as a boundary guard before a batch is accepted into the store, and
/// by callers for pre-validation before submission.
pub fn is_card_list_valid(value: &Value) -> bool {
    match value.as_array() {
        Some(cards) => cards.iter().all(|card| {
            card.as_object()
                .map_or(false, |obj| obj.contains_key("question") && obj.contains_key("answer"))
        }),
        None => false,
    }
}

/// Convert a JSON batch into typed cards, or report why it is malformed.
pub fn card_list_from_value(value: &Value) -> Result<Vec<CardContent>> {
    let cards = value.as_array().ok_or(CardListError::NotAnArray)?;

    cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let obj = card
                .as_object()
                .ok_or(CardListError::NotAnObject { index })?;
            let question = obj
                .get("question")
                .ok_or(CardListError::MissingField { index, field: "question" })?;
            let answer = obj
                .get("answer")
                .ok_or(CardListError::MissingField { index, field: "answer" })?;
            Ok(CardContent::new(field_text(question), field_text(answer)))
        })
        .collect()
}

/// Coerce a card field value to text. Null becomes empty, scalars keep
/// their display form, nested structures keep their compact JSON text.
fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
