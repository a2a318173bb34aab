//! Tests for the one-time legacy JSON library migration.

use std::fs;

use cardbox_store::{DeckStore, StoreConfig};
use tempfile::TempDir;

fn library_store(files: &[(&str, &str)]) -> (DeckStore, TempDir) {
    let tmp = TempDir::new().unwrap();
    let config = StoreConfig::under(tmp.path());
    fs::create_dir_all(&config.legacy_library_dir).unwrap();
    for (name, contents) in files {
        fs::write(config.legacy_library_dir.join(name), contents).unwrap();
    }
    (DeckStore::new(config), tmp)
}

#[test]
fn imports_library_files_as_decks() {
    let (store, _tmp) = library_store(&[
        (
            "Spanish.json",
            r#"[{"question": "Hola?", "answer": "Hello"},
                {"question": "Adios?", "answer": "Goodbye"}]"#,
        ),
        ("French.json", r#"[{"question": "Oui?", "answer": "Yes"}]"#),
    ]);
    store.init().unwrap();

    let decks = store.list_decks("").unwrap();
    assert_eq!(decks.len(), 2);

    let spanish = store.get_deck_cards_by_name("Spanish").unwrap();
    assert_eq!(spanish.len(), 2);
    assert_eq!(spanish[0].question, "Hola?");
}

#[test]
fn migration_runs_only_once() {
    let (store, _tmp) = library_store(&[(
        "Spanish.json",
        r#"[{"question": "Hola?", "answer": "Hello"}]"#,
    )]);
    store.init().unwrap();

    // A file dropped in after the first init is never picked up.
    fs::write(
        store.config().legacy_library_dir.join("Late.json"),
        r#"[{"question": "Q", "answer": "A"}]"#,
    )
    .unwrap();
    store.init().unwrap();

    let decks = store.list_decks("").unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].name, "Spanish");
}

#[test]
fn legacy_cards_are_imported_verbatim() {
    // Duplicate cards in a legacy file are trusted, not deduplicated.
    let (store, _tmp) = library_store(&[(
        "Dupes.json",
        r#"[{"question": "Q", "answer": "A"},
            {"question": "Q", "answer": "A"}]"#,
    )]);
    store.init().unwrap();

    assert_eq!(store.get_deck_cards_by_name("Dupes").unwrap().len(), 2);
}

#[test]
fn bad_files_are_skipped_without_blocking_startup() {
    let (store, _tmp) = library_store(&[
        ("broken.json", "{ not json"),
        ("wrong-shape.json", r#"{"question": "Q", "answer": "A"}"#),
        ("notes.txt", "ignored entirely"),
        ("Good.json", r#"[{"question": "Q", "answer": "A"}]"#),
    ]);
    store.init().unwrap();

    let decks = store.list_decks("").unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].name, "Good");
    assert_eq!(decks[0].card_count, 1);
}

#[test]
fn missing_library_directory_is_fine() {
    let tmp = TempDir::new().unwrap();
    let store = DeckStore::new(StoreConfig::under(tmp.path()));
    store.init().unwrap();

    assert!(store.list_decks("").unwrap().is_empty());
}
