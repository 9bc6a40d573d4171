//! The `delete` subcommand.

use pagesync_engine::{CollectionTransport, SyncController};
use pagesync_protocol::RecordId;
use std::error::Error;

/// Deletes the record with this id.
pub async fn run<T: CollectionTransport>(
    controller: &SyncController<T>,
    id: u64,
) -> Result<(), Box<dyn Error>> {
    let id = RecordId::new(id);
    if !super::load_until_found(controller, id).await? {
        return Err(format!("record {id} not found in collection").into());
    }

    controller.delete(id).await?;
    println!("deleted record {id}");
    Ok(())
}
