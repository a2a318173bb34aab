//! One-time import of the legacy per-deck JSON library.

use std::fs;
use std::path::Path;

use cardbox_core::types::CardContent;
use cardbox_core::{card_list_from_value, is_card_list_valid};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::error::Result;

/// Import every `*.json` deck file found in `library_dir`.
///
/// Legacy files are trusted as already curated: cards are inserted
/// verbatim, without deduplication. A file that cannot be read or parsed
/// is skipped, as is one whose deck name already exists; an absent or
/// unlistable directory means no legacy decks. Only database failures
/// propagate; a bad file must never block startup.
///
/// Returns the number of decks imported.
pub(crate) fn import_legacy_library(conn: &Connection, library_dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(library_dir) {
        Ok(entries) => entries,
        Err(_) => {
            tracing::debug!(dir = %library_dir.display(), "no legacy deck library found");
            return Ok(0);
        }
    };

    let now = Utc::now().to_rfc3339();
    let mut imported = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("json"));
        if !is_json {
            continue;
        }
        let deck_name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM decks WHERE name = ?1",
                params![deck_name],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            continue;
        }

        let cards = match read_deck_file(&path) {
            Some(cards) => cards,
            None => {
                tracing::warn!(file = %path.display(), "skipping unreadable legacy deck file");
                continue;
            }
        };

        conn.execute(
            "INSERT INTO decks(name, created_at, updated_at) VALUES(?1, ?2, ?3)",
            params![deck_name, now, now],
        )?;
        let deck_id = conn.last_insert_rowid();
        for card in &cards {
            conn.execute(
                "INSERT INTO cards(deck_id, question, answer, created_at, updated_at)
                 VALUES(?1, ?2, ?3, ?4, ?5)",
                params![deck_id, card.question, card.answer, now, now],
            )?;
        }
        tracing::debug!(deck = %deck_name, cards = cards.len(), "imported legacy deck");
        imported += 1;
    }

    Ok(imported)
}

fn read_deck_file(path: &Path) -> Option<Vec<CardContent>> {
    let text = fs::read_to_string(path).ok()?;
    let value: Value = serde_json::from_str(&text).ok()?;
    if !is_card_list_valid(&value) {
        return None;
    }
    card_list_from_value(&value).ok()
}
