//! Validated JSON intake.
//!
//! Callers submit raw pasted JSON; a structurally valid batch is saved
//! pretty-printed under the intake directory so the original upload can be
//! re-imported or audited later. Extra fields on the cards are preserved
//! in the saved file (the merge engine drops them only at insertion time).

use std::fs;
use std::path::{Path, PathBuf};

use cardbox_core::card_list_from_value;
use chrono::Local;
use serde_json::Value;

use crate::error::Result;
use crate::export::sanitize_filename;

/// Validate `json_text` as a card batch and persist it as
/// `<intake_dir>/<deck_name>_<timestamp>.json`. Returns the written path.
pub fn save_validated_json(intake_dir: &Path, deck_name: &str, json_text: &str) -> Result<PathBuf> {
    let value: Value = serde_json::from_str(json_text)?;
    card_list_from_value(&value)?;

    fs::create_dir_all(intake_dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let file_name = format!("{}_{}.json", sanitize_filename(deck_name), timestamp);
    let path = intake_dir.join(file_name);
    fs::write(&path, serde_json::to_string_pretty(&value)?)?;
    Ok(path)
}
