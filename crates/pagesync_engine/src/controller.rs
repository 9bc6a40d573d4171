//! The sync controller: load-more / create / update / delete.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::state::{LoadState, LoadTracker};
use crate::store::{CollectionStore, Entry};
use crate::transport::CollectionTransport;
use pagesync_protocol::{Record, RecordDraft, RecordId};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Outcome of a [`SyncController::load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and merged.
    Loaded {
        /// Records actually appended (after dedup).
        appended: usize,
        /// Whether the collection is now read to its end.
        exhausted: bool,
    },
    /// No fetch was permitted: one is already in flight, the collection is
    /// exhausted, or the tracker is errored and awaits a retry.
    Skipped,
}

/// Counters over the controller's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Pages fetched successfully.
    pub pages_fetched: u64,
    /// Records appended by page merges.
    pub records_appended: u64,
    /// Creates confirmed by the server.
    pub creates: u64,
    /// Updates confirmed by the server.
    pub updates: u64,
    /// Deletes confirmed by the server.
    pub deletes: u64,
    /// Optimistic changes undone after a failed remote call.
    pub rollbacks: u64,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Coordinates transport, load tracker and collection store.
///
/// Each operation is atomic from the caller's perspective: the collection
/// is only ever observed before the optimistic change, after it, or after
/// the compensating rollback — never mid-protocol. Store and tracker locks
/// are released before every outbound call, so independent mutations may
/// overlap freely; overlapping page loads collapse into one fetch via the
/// tracker.
pub struct SyncController<T: CollectionTransport> {
    config: SyncConfig,
    transport: T,
    tracker: Mutex<LoadTracker>,
    store: Mutex<CollectionStore>,
    stats: Mutex<SyncStats>,
}

impl<T: CollectionTransport> SyncController<T> {
    /// Creates a controller positioned at page 1 with an empty collection.
    pub fn new(config: SyncConfig, transport: T) -> Self {
        let tracker = LoadTracker::new(config.page_size);
        Self {
            config,
            transport,
            tracker: Mutex::new(tracker),
            store: Mutex::new(CollectionStore::new()),
            stats: Mutex::new(SyncStats::default()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the current load state.
    pub fn load_state(&self) -> LoadState {
        self.tracker.lock().state().clone()
    }

    /// Returns a snapshot of lifetime counters.
    pub fn stats(&self) -> SyncStats {
        self.stats.lock().clone()
    }

    /// Returns all visible rows in order, pending inserts included.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.store.lock().snapshot()
    }

    /// Returns the committed records in order.
    pub fn records(&self) -> Vec<Record> {
        self.store.lock().records()
    }

    /// Fetches and merges the next page, if one may be fetched.
    ///
    /// Returns [`LoadOutcome::Skipped`] without any outbound call unless
    /// the tracker is idle — this is what keeps rapid repeated calls from
    /// fetching the same page twice.
    pub async fn load_more(&self) -> SyncResult<LoadOutcome> {
        let cursor = match self.tracker.lock().begin_fetch() {
            Some(cursor) => cursor,
            None => {
                debug!("load skipped: fetch not permitted");
                return Ok(LoadOutcome::Skipped);
            }
        };

        match self.transport.fetch_page(&cursor).await {
            Ok(records) => {
                let fetched = records.len();
                let appended = self.store.lock().append_page(records);
                let exhausted = self.tracker.lock().complete_fetch(fetched);
                {
                    let mut stats = self.stats.lock();
                    stats.pages_fetched += 1;
                    stats.records_appended += appended as u64;
                    stats.last_error = None;
                }
                debug!(page = cursor.page, fetched, appended, exhausted, "page merged");
                Ok(LoadOutcome::Loaded {
                    appended,
                    exhausted,
                })
            }
            Err(error) => {
                self.tracker.lock().fail_fetch(error.to_string());
                self.stats.lock().last_error = Some(error.to_string());
                warn!(page = cursor.page, %error, "page fetch failed");
                Err(error)
            }
        }
    }

    /// Leaves the errored load state so the failed page can be re-fetched.
    ///
    /// Returns true if the tracker was errored.
    pub fn retry(&self) -> bool {
        self.tracker.lock().retry()
    }

    /// Creates a record.
    ///
    /// Field values are trimmed; every configured required field must then
    /// be non-empty, or the call fails with no network traffic. The draft
    /// appears in the collection immediately and is either confirmed under
    /// its server id or removed again — a failed create leaves the
    /// collection exactly as it was.
    pub async fn create(&self, draft: RecordDraft) -> SyncResult<Record> {
        let draft = normalize(draft);
        for field in &self.config.required_fields {
            if draft.field(field).is_none_or(str::is_empty) {
                return Err(SyncError::validation(field));
            }
        }

        let token = self.store.lock().optimistic_insert(draft.clone());

        match self.transport.create(&draft).await {
            Ok(record) => {
                let record = self.store.lock().confirm_insert(token, record)?;
                self.stats.lock().creates += 1;
                debug!(id = %record.id, "create confirmed");
                Ok(record)
            }
            Err(error) => {
                if self.store.lock().rollback_insert(token).is_err() {
                    warn!(%token, "pending insert vanished before rollback");
                }
                let mut stats = self.stats.lock();
                stats.rollbacks += 1;
                stats.last_error = Some(error.to_string());
                warn!(%error, "create failed, placeholder removed");
                Err(error)
            }
        }
    }

    /// Edits one field of a record locally.
    ///
    /// The edit is local state until [`SyncController::update`] commits it.
    pub fn patch_field(
        &self,
        id: RecordId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> SyncResult<()> {
        self.store.lock().patch_field(id, key, value)
    }

    /// Sends the record's current local state as the authoritative value.
    ///
    /// On success the server's returned record replaces the local one. On
    /// failure the local edit is kept — it is the user's draft until
    /// explicitly re-sent — and the error is surfaced.
    pub async fn update(&self, id: RecordId) -> SyncResult<Record> {
        let record = self
            .store
            .lock()
            .get(id)
            .ok_or(SyncError::NotFound { id })?;

        match self.transport.update(&record).await {
            Ok(server_record) => {
                if !self.store.lock().replace(server_record.clone()) {
                    warn!(%id, "record vanished while update was in flight");
                }
                self.stats.lock().updates += 1;
                debug!(%id, "update confirmed");
                Ok(server_record)
            }
            Err(error) => {
                self.stats.lock().last_error = Some(error.to_string());
                warn!(%id, %error, "update failed, keeping local edit");
                Err(error)
            }
        }
    }

    /// Deletes a record.
    ///
    /// The record disappears from the collection immediately. A failed
    /// remote delete restores it at the index it occupied.
    pub async fn delete(&self, id: RecordId) -> SyncResult<Record> {
        let (record, index) = self.store.lock().remove(id)?;

        match self.transport.delete(id).await {
            Ok(()) => {
                self.stats.lock().deletes += 1;
                debug!(%id, "delete confirmed");
                Ok(record)
            }
            Err(error) => {
                if !self.store.lock().restore(record, index) {
                    warn!(%id, "record re-fetched while delete was in flight; not restored");
                }
                let mut stats = self.stats.lock();
                stats.rollbacks += 1;
                stats.last_error = Some(error.to_string());
                warn!(%id, %error, "delete failed, record restored");
                Err(error)
            }
        }
    }
}

/// Trims every field value; whitespace-only input counts as absent.
fn normalize(draft: RecordDraft) -> RecordDraft {
    RecordDraft {
        fields: draft
            .fields
            .into_iter()
            .map(|(key, value)| {
                let trimmed = value.trim().to_owned();
                (key, trimmed)
            })
            .collect(),
    }
}
