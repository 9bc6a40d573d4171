//! The `update` subcommand: edit fields and commit the full record.

use pagesync_engine::{CollectionTransport, SyncController};
use pagesync_protocol::RecordId;
use std::error::Error;

/// Patches the given fields locally, then sends the whole record.
pub async fn run<T: CollectionTransport>(
    controller: &SyncController<T>,
    id: u64,
    fields: Vec<(String, String)>,
) -> Result<(), Box<dyn Error>> {
    let id = RecordId::new(id);
    if !super::load_until_found(controller, id).await? {
        return Err(format!("record {id} not found in collection").into());
    }

    for (key, value) in fields {
        controller.patch_field(id, key, value)?;
    }
    let updated = controller.update(id).await?;
    println!("updated record {}", updated.id);
    Ok(())
}
