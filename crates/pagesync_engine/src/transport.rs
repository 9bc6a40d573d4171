//! Transport layer abstraction for collection operations.

use crate::error::{SyncError, SyncResult};
use pagesync_protocol::{PageCursor, Record, RecordDraft, RecordId};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A collection transport performs the remote calls of the controller.
///
/// This trait abstracts the network layer, allowing different
/// implementations (HTTP, in-memory fakes for testing, etc.). Each method
/// maps to exactly one outbound request; retry policy belongs to the
/// caller, not here.
#[allow(async_fn_in_trait)]
pub trait CollectionTransport {
    /// Fetches one page of records, preserving server order.
    async fn fetch_page(&self, cursor: &PageCursor) -> SyncResult<Vec<Record>>;

    /// Creates a record; the server assigns the id.
    async fn create(&self, draft: &RecordDraft) -> SyncResult<Record>;

    /// Replaces the record with this id by the given full record.
    async fn update(&self, record: &Record) -> SyncResult<Record>;

    /// Deletes the record with this id.
    async fn delete(&self, id: RecordId) -> SyncResult<()>;
}

/// A mock transport for testing.
///
/// Page responses are consumed in FIFO order; mutation responses are
/// one-shot. Every call is counted.
#[derive(Debug, Default)]
pub struct MockTransport {
    pages: Mutex<VecDeque<SyncResult<Vec<Record>>>>,
    create_response: Mutex<Option<SyncResult<Record>>>,
    update_response: Mutex<Option<SyncResult<Record>>>,
    delete_response: Mutex<Option<SyncResult<()>>>,
    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockTransport {
    /// Creates a mock with no responses queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful page response.
    pub fn push_page(&self, records: Vec<Record>) {
        self.pages.lock().push_back(Ok(records));
    }

    /// Queues a failed page response.
    pub fn push_page_error(&self, error: SyncError) {
        self.pages.lock().push_back(Err(error));
    }

    /// Sets the response for the next create call.
    pub fn set_create_response(&self, response: SyncResult<Record>) {
        *self.create_response.lock() = Some(response);
    }

    /// Sets the response for the next update call.
    pub fn set_update_response(&self, response: SyncResult<Record>) {
        *self.update_response.lock() = Some(response);
    }

    /// Sets the response for the next delete call.
    pub fn set_delete_response(&self, response: SyncResult<()>) {
        *self.delete_response.lock() = Some(response);
    }

    /// Returns how many page fetches were issued.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Returns how many create calls were issued.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Returns how many update calls were issued.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Returns how many delete calls were issued.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

impl CollectionTransport for MockTransport {
    async fn fetch_page(&self, _cursor: &PageCursor) -> SyncResult<Vec<Record>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::transport_fatal("no mock page response queued")))
    }

    async fn create(&self, _draft: &RecordDraft) -> SyncResult<Record> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.create_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(SyncError::transport_fatal("no mock create response set")))
    }

    async fn update(&self, _record: &Record) -> SyncResult<Record> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.update_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(SyncError::transport_fatal("no mock update response set")))
    }

    async fn delete(&self, _id: RecordId) -> SyncResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.delete_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(SyncError::transport_fatal("no mock delete response set")))
    }
}
