//! Anki package export.
//!
//! The `.apkg` binary layout belongs to the serializer crate; this module
//! only supplies the note contract the package expects (exactly two
//! fields per card, question first) plus the fixed model and deck
//! identifiers. Keeping the identifiers stable means re-exported decks
//! merge cleanly when imported into the flashcard application again.

use std::fs;
use std::path::{Path, PathBuf};

use cardbox_core::card_list_from_value;
use cardbox_core::types::CardContent;
use genanki_rs::{Deck, Field, Model, Note, Template};
use serde_json::Value;

use crate::error::{Result, StoreError};

const MODEL_ID: i64 = 1607392319;
const DECK_ID: i64 = 2059400110;

fn note_model() -> Model {
    Model::new(
        MODEL_ID,
        "Simple Model",
        vec![Field::new("Question"), Field::new("Answer")],
        vec![Template::new("Card 1")
            .qfmt("{{Question}}")
            .afmt(r#"{{FrontSide}}<hr id="answer">{{Answer}}"#)],
    )
}

/// Write `cards` as `<out_dir>/<deck_name>.apkg` and return the path.
pub fn write_apkg(out_dir: &Path, deck_name: &str, cards: &[CardContent]) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;

    let model = note_model();
    let mut deck = Deck::new(DECK_ID, deck_name, "");
    for card in cards {
        let note = Note::new(model.clone(), vec![card.question.as_str(), card.answer.as_str()])
            .map_err(|e| StoreError::Export(e.to_string()))?;
        deck.add_note(note);
    }

    let path = out_dir.join(format!("{}.apkg", sanitize_filename(deck_name)));
    let path_str = path.to_string_lossy();
    deck.write_to_file(&path_str)
        .map_err(|e| StoreError::Export(e.to_string()))?;

    tracing::debug!(deck = deck_name, cards = cards.len(), path = %path.display(), "wrote package");
    Ok(path)
}

/// Export a standalone JSON card file, bypassing the store.
pub fn write_apkg_from_file(json_path: &Path, out_dir: &Path, deck_name: &str) -> Result<PathBuf> {
    let text = fs::read_to_string(json_path)?;
    let value: Value = serde_json::from_str(&text)?;
    let cards = card_list_from_value(&value)?;
    write_apkg(out_dir, deck_name, &cards)
}

/// Replace characters that are invalid in file names with underscores.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_reserved_characters() {
        assert_eq!(sanitize_filename(r#"a/b\c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_filename("Spanish Verbs"), "Spanish Verbs");
    }
}
