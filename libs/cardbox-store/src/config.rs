//! Filesystem layout for the deck store.

use std::path::{Path, PathBuf};

/// Directory layout the store operates on.
///
/// The legacy library, intake, and export directories keep the names the
/// application has always used on disk, so existing user data is found
/// where it was left. All paths are independent so tests can root the
/// whole layout under a temporary directory.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Legacy per-deck JSON files, imported once at init.
    pub legacy_library_dir: PathBuf,
    /// Where validated intake batches are saved.
    pub intake_dir: PathBuf,
    /// Where exported packages are written.
    pub export_dir: PathBuf,
}

impl StoreConfig {
    /// Per-user layout under the platform-local data directory.
    pub fn default_paths() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cardbox");
        Self::under(data_dir)
    }

    /// Root every path under `dir`.
    pub fn under(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            db_path: dir.join("cardbox.db"),
            legacy_library_dir: dir.join("DeckLibrary"),
            intake_dir: dir.join("JSONs"),
            export_dir: dir.join("Decks"),
        }
    }
}
