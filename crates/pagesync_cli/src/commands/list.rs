//! The `list` subcommand: page through the collection.

use pagesync_engine::{CollectionTransport, LoadOutcome, SyncController};
use std::error::Error;
use tracing::info;

/// Fetches up to `pages` pages (all of them if `None`) and prints the rows.
pub async fn run<T: CollectionTransport>(
    controller: &SyncController<T>,
    pages: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let mut fetched = 0u32;
    loop {
        if pages.is_some_and(|limit| fetched >= limit) {
            break;
        }
        match controller.load_more().await? {
            LoadOutcome::Loaded { exhausted, .. } => {
                fetched += 1;
                if exhausted {
                    break;
                }
            }
            LoadOutcome::Skipped => break,
        }
    }

    let stats = controller.stats();
    info!(
        pages = stats.pages_fetched,
        records = stats.records_appended,
        "collection loaded"
    );

    for entry in controller.snapshot() {
        super::print_entry(&entry);
    }
    if controller.load_state().is_exhausted() {
        println!("-- end of collection --");
    }
    Ok(())
}
