//! The `add` subcommand: create a record.

use pagesync_engine::{CollectionTransport, SyncController};
use pagesync_protocol::RecordDraft;
use std::error::Error;

/// Creates a record from `key=value` field pairs and prints it.
pub async fn run<T: CollectionTransport>(
    controller: &SyncController<T>,
    fields: Vec<(String, String)>,
) -> Result<(), Box<dyn Error>> {
    let draft = RecordDraft::from_fields(fields);
    let created = controller.create(draft).await?;
    println!("created record {}", created.id);
    Ok(())
}
