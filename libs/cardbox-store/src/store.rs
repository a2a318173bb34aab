//! Deck and card persistence.

use std::path::PathBuf;

use cardbox_core::types::{CardContent, MergeStats};
use cardbox_core::{card_list_from_value, merge_card_lists};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::{export, intake, migrate, schema};

/// A deck with its stored metadata.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Deck listing entry with a live card count.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeckSummary {
    pub id: i64,
    pub name: String,
    pub card_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored card.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Card {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Statistics for a deck-to-deck move.
///
/// `moved` is the source's original card count. The source is drained even
/// when some of its cards were rejected as duplicates of the target.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MoveStats {
    pub moved: usize,
    pub added: usize,
    pub duplicates: usize,
    pub after_target: usize,
}

/// The persistent deck store.
///
/// Each operation opens its own connection against the configured database
/// file and commits before returning.
pub struct DeckStore {
    config: StoreConfig,
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl DeckStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Connection::open(&self.config.db_path)?)
    }

    /// Idempotently create the schema and, exactly once, import the legacy
    /// per-deck JSON library.
    ///
    /// The migration runs inside the same transaction that records the
    /// `json_migrated` flag, so a concurrent second startup cannot import
    /// the library twice.
    pub fn init(&self) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute_batch(schema::SCHEMA)?;
        tx.execute(
            "INSERT OR IGNORE INTO schema_version(version) VALUES (?1)",
            params![schema::SCHEMA_VERSION],
        )?;

        let migrated: Option<String> = tx
            .query_row(
                "SELECT value FROM app_meta WHERE key = 'json_migrated'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if migrated.as_deref() != Some("1") {
            let imported = migrate::import_legacy_library(&tx, &self.config.legacy_library_dir)?;
            if imported > 0 {
                tracing::info!(imported, "imported legacy deck files into the store");
            }
            tx.execute(
                "INSERT OR REPLACE INTO app_meta(key, value) VALUES('json_migrated', '1')",
                [],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// List decks with live card counts, most recently updated first.
    ///
    /// A non-empty `search` filters to decks whose name contains it,
    /// case-insensitively.
    pub fn list_decks(&self, search: &str) -> Result<Vec<DeckSummary>> {
        let conn = self.connect()?;
        let sql = if search.is_empty() {
            "SELECT d.id, d.name,
                    COALESCE((SELECT COUNT(1) FROM cards c WHERE c.deck_id = d.id), 0) AS card_count,
                    d.created_at, d.updated_at
             FROM decks d
             ORDER BY d.updated_at DESC"
        } else {
            "SELECT d.id, d.name,
                    COALESCE((SELECT COUNT(1) FROM cards c WHERE c.deck_id = d.id), 0) AS card_count,
                    d.created_at, d.updated_at
             FROM decks d
             WHERE lower(d.name) LIKE ?1
             ORDER BY d.updated_at DESC"
        };

        let mut stmt = conn.prepare(sql)?;
        let rows = if search.is_empty() {
            stmt.query_map([], Self::row_to_summary)?
        } else {
            let like = format!("%{}%", search.to_lowercase());
            stmt.query_map(params![like], Self::row_to_summary)?
        };

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub fn get_deck_by_name(&self, name: &str) -> Result<Option<Deck>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT id, name, created_at, updated_at FROM decks WHERE name = ?1",
            params![name],
            Self::row_to_deck,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Create an empty deck. The name is trimmed and must be non-empty and
    /// unique across the store.
    pub fn create_deck(&self, name: &str) -> Result<Deck> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidArgument(
                "deck name cannot be empty".into(),
            ));
        }

        let now = now();
        let conn = self.connect()?;
        match conn.execute(
            "INSERT INTO decks(name, created_at, updated_at) VALUES(?1, ?2, ?3)",
            params![name, now, now],
        ) {
            Ok(_) => Ok(Deck {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                created_at: now.clone(),
                updated_at: now,
            }),
            Err(e) if is_unique_violation(&e) => Err(StoreError::NameConflict(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// All cards of a deck, ordered by insertion id ascending.
    pub fn get_deck_cards(&self, deck_id: i64) -> Result<Vec<Card>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, question, answer, created_at, updated_at
             FROM cards WHERE deck_id = ?1 ORDER BY id ASC",
        )?;
        let cards = stmt
            .query_map(params![deck_id], Self::row_to_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    /// Like [`get_deck_cards`](Self::get_deck_cards) but by deck name; an
    /// absent deck yields an empty list, not an error.
    pub fn get_deck_cards_by_name(&self, name: &str) -> Result<Vec<Card>> {
        match self.get_deck_by_name(name)? {
            Some(deck) => self.get_deck_cards(deck.id),
            None => Ok(Vec::new()),
        }
    }

    /// Merge a JSON card batch into a deck.
    ///
    /// Fails with [`StoreError::MalformedInput`] if the batch is not a list
    /// of objects carrying `question` and `answer`. Only newly accepted
    /// cards are inserted; the deck's `updated_at` is bumped either way.
    pub fn add_cards(&self, deck_id: i64, incoming: &Value) -> Result<MergeStats> {
        let incoming = card_list_from_value(incoming)?;
        self.merge_into(deck_id, &incoming)
    }

    fn merge_into(&self, deck_id: i64, incoming: &[CardContent]) -> Result<MergeStats> {
        let now = now();
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let existing = load_deck_contents(&tx, deck_id)?;
        let outcome = merge_card_lists(&existing, incoming);
        for card in &outcome.merged[outcome.stats.before..] {
            tx.execute(
                "INSERT INTO cards(deck_id, question, answer, created_at, updated_at)
                 VALUES(?1, ?2, ?3, ?4, ?5)",
                params![deck_id, card.question, card.answer, now, now],
            )?;
        }
        tx.execute(
            "UPDATE decks SET updated_at = ?1 WHERE id = ?2",
            params![now, deck_id],
        )?;
        tx.commit()?;

        tracing::debug!(
            deck_id,
            added = outcome.stats.added,
            duplicates = outcome.stats.duplicates,
            "merged card batch"
        );
        Ok(outcome.stats)
    }

    /// Rename a deck. The new name is trimmed, must be non-empty, and must
    /// not belong to another deck; renaming a deck to its own current name
    /// succeeds.
    pub fn rename_deck(&self, deck_id: i64, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::InvalidArgument(
                "new deck name cannot be empty".into(),
            ));
        }

        let conn = self.connect()?;
        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM decks WHERE name = ?1 AND id <> ?2",
                params![new_name, deck_id],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(StoreError::NameConflict(new_name.to_string()));
        }

        conn.execute(
            "UPDATE decks SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![new_name, now(), deck_id],
        )?;
        Ok(())
    }

    /// Delete a deck and all of its cards. Unknown ids are a no-op.
    pub fn delete_deck(&self, deck_id: i64) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM cards WHERE deck_id = ?1", params![deck_id])?;
        tx.execute("DELETE FROM decks WHERE id = ?1", params![deck_id])?;
        tx.commit()?;
        Ok(())
    }

    /// Rewrite a card's content. Both fields are trimmed and must be
    /// non-empty. Unknown ids are a no-op.
    pub fn update_card(&self, card_id: i64, question: &str, answer: &str) -> Result<()> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(StoreError::InvalidArgument(
                "question and answer cannot be empty".into(),
            ));
        }

        let conn = self.connect()?;
        conn.execute(
            "UPDATE cards SET question = ?1, answer = ?2, updated_at = ?3 WHERE id = ?4",
            params![question, answer, now(), card_id],
        )?;
        Ok(())
    }

    /// Delete a single card. Unknown ids are a no-op.
    pub fn delete_card(&self, card_id: i64) -> Result<()> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM cards WHERE id = ?1", params![card_id])?;
        Ok(())
    }

    /// Move all cards from one deck into another, deduplicating against
    /// the target's content.
    ///
    /// The source is emptied unconditionally afterwards, including the
    /// cards that were rejected as duplicates. Draining the source even
    /// when nothing was copied is the contract, not an accident.
    pub fn move_deck_contents(&self, source_deck_id: i64, target_deck_id: i64) -> Result<MoveStats> {
        if source_deck_id == target_deck_id {
            return Err(StoreError::InvalidArgument(
                "source and target deck must be different".into(),
            ));
        }

        let source_cards = {
            let conn = self.connect()?;
            load_deck_contents(&conn, source_deck_id)?
        };
        let moved = source_cards.len();

        let stats = self.merge_into(target_deck_id, &source_cards)?;

        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM cards WHERE deck_id = ?1",
            params![source_deck_id],
        )?;
        conn.execute(
            "UPDATE decks SET updated_at = ?1 WHERE id IN (?2, ?3)",
            params![now(), source_deck_id, target_deck_id],
        )?;

        Ok(MoveStats {
            moved,
            added: stats.added,
            duplicates: moved - stats.added,
            after_target: stats.after,
        })
    }

    /// Export a deck's cards as an Anki package; returns the written path.
    ///
    /// Pure data handoff: no merge or dedup logic runs here.
    pub fn export_deck(&self, deck_id: i64, deck_name: &str) -> Result<PathBuf> {
        let cards = self.get_deck_cards(deck_id)?;
        let contents: Vec<CardContent> = cards
            .into_iter()
            .map(|c| CardContent::new(c.question, c.answer))
            .collect();
        export::write_apkg(&self.config.export_dir, deck_name, &contents)
    }

    /// Validate a raw JSON batch and save it under the intake directory.
    pub fn save_validated_json(&self, deck_name: &str, json_text: &str) -> Result<PathBuf> {
        intake::save_validated_json(&self.config.intake_dir, deck_name, json_text)
    }

    fn row_to_deck(row: &rusqlite::Row) -> rusqlite::Result<Deck> {
        Ok(Deck {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }

    fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<DeckSummary> {
        Ok(DeckSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            card_count: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Card> {
        Ok(Card {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

/// Load a deck's question/answer pairs in insertion order.
fn load_deck_contents(conn: &Connection, deck_id: i64) -> Result<Vec<CardContent>> {
    let mut stmt =
        conn.prepare("SELECT question, answer FROM cards WHERE deck_id = ?1 ORDER BY id ASC")?;
    let contents = stmt
        .query_map(params![deck_id], |row| {
            Ok(CardContent::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(contents)
}
