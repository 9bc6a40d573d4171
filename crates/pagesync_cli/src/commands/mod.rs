//! CLI subcommand implementations.

pub mod add;
pub mod delete;
pub mod list;
pub mod update;

use pagesync_engine::{CollectionTransport, Entry, LoadOutcome, SyncController, SyncResult};
use pagesync_protocol::RecordId;

/// Loads pages until the id is present locally or the collection ends.
pub async fn load_until_found<T: CollectionTransport>(
    controller: &SyncController<T>,
    id: RecordId,
) -> SyncResult<bool> {
    loop {
        if controller.records().iter().any(|r| r.id == id) {
            return Ok(true);
        }
        match controller.load_more().await? {
            LoadOutcome::Loaded { exhausted: true, .. } | LoadOutcome::Skipped => {
                return Ok(controller.records().iter().any(|r| r.id == id));
            }
            LoadOutcome::Loaded { .. } => {}
        }
    }
}

/// Prints one collection row.
pub fn print_entry(entry: &Entry) {
    let id = match entry.id() {
        Some(id) => id.to_string(),
        None => "(pending)".into(),
    };
    let fields = entry
        .fields()
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{id:>10}  {fields}");
}

/// Parses a `key=value` command-line field argument.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}
