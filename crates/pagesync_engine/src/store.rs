//! Ordered, deduplicated in-memory collection with optimistic mutations.

use crate::error::{SyncError, SyncResult};
use pagesync_protocol::{FieldMap, Record, RecordDraft, RecordId};
use std::fmt;

/// Handle to a pending optimistic insert.
///
/// Returned by [`CollectionStore::optimistic_insert`] and consumed by
/// [`CollectionStore::confirm_insert`] or
/// [`CollectionStore::rollback_insert`]. The token stays valid while
/// entries shift position around the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InsertToken(u64);

impl InsertToken {
    /// Returns the raw token value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InsertToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One visible row of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A server-confirmed record.
    Committed(Record),
    /// A locally inserted row awaiting server confirmation.
    Pending {
        /// Handle of the optimistic insert.
        token: InsertToken,
        /// The draft fields as they will be sent.
        fields: FieldMap,
    },
}

impl Entry {
    /// Returns the committed id, or `None` while pending.
    pub fn id(&self) -> Option<RecordId> {
        match self {
            Entry::Committed(record) => Some(record.id),
            Entry::Pending { .. } => None,
        }
    }

    /// Returns the entry's fields.
    pub fn fields(&self) -> &FieldMap {
        match self {
            Entry::Committed(record) => &record.fields,
            Entry::Pending { fields, .. } => fields,
        }
    }

    /// Returns true if the entry awaits server confirmation.
    pub fn is_pending(&self) -> bool {
        matches!(self, Entry::Pending { .. })
    }
}

/// The ordered, id-unique collection.
///
/// Order is arrival order: fetched pages append in server order, optimistic
/// inserts append at the tail. Every operation preserves two invariants —
/// no two committed entries share an id, and existing entries never reorder.
///
/// The store is the single owner of the collection; callers mutate it only
/// through these operations.
#[derive(Debug, Default)]
pub struct CollectionStore {
    entries: Vec<Entry>,
    next_token: u64,
}

impl CollectionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of visible rows, pending included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a committed record with this id is present.
    pub fn contains(&self, id: RecordId) -> bool {
        self.entries.iter().any(|e| e.id() == Some(id))
    }

    /// Returns a clone of the committed record with this id.
    pub fn get(&self, id: RecordId) -> Option<Record> {
        self.entries.iter().find_map(|e| match e {
            Entry::Committed(record) if record.id == id => Some(record.clone()),
            _ => None,
        })
    }

    /// Returns a clone of all visible rows in order.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Returns clones of the committed records in order.
    pub fn records(&self) -> Vec<Record> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Committed(record) => Some(record.clone()),
                Entry::Pending { .. } => None,
            })
            .collect()
    }

    /// Returns the committed ids in order.
    pub fn committed_ids(&self) -> Vec<RecordId> {
        self.entries.iter().filter_map(Entry::id).collect()
    }

    /// Merges a fetched page into the collection.
    ///
    /// Records whose id is already committed are ignored, so fetching the
    /// same page twice is idempotent. New records append in the given
    /// order. Returns the count actually appended.
    pub fn append_page(&mut self, records: Vec<Record>) -> usize {
        let mut appended = 0;
        for record in records {
            if self.contains(record.id) {
                continue;
            }
            self.entries.push(Entry::Committed(record));
            appended += 1;
        }
        appended
    }

    /// Appends a pending row for an optimistic insert.
    pub fn optimistic_insert(&mut self, draft: RecordDraft) -> InsertToken {
        self.next_token += 1;
        let token = InsertToken(self.next_token);
        self.entries.push(Entry::Pending {
            token,
            fields: draft.fields,
        });
        token
    }

    /// Replaces a pending row with the server's record, in place.
    ///
    /// The server id may be anything. Should it already be committed
    /// elsewhere in the collection, the pending row is dropped instead of
    /// duplicated (the same merge rule [`CollectionStore::append_page`]
    /// applies) and the already-present record is returned.
    pub fn confirm_insert(&mut self, token: InsertToken, record: Record) -> SyncResult<Record> {
        let position = self.pending_position(token)?;
        if let Some(existing) = self.get(record.id) {
            self.entries.remove(position);
            return Ok(existing);
        }
        self.entries[position] = Entry::Committed(record.clone());
        Ok(record)
    }

    /// Removes a pending row; used when the create call fails.
    pub fn rollback_insert(&mut self, token: InsertToken) -> SyncResult<()> {
        let position = self.pending_position(token)?;
        self.entries.remove(position);
        Ok(())
    }

    /// Edits one field of a committed record in place.
    pub fn patch_field(
        &mut self,
        id: RecordId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> SyncResult<()> {
        for entry in &mut self.entries {
            if let Entry::Committed(record) = entry {
                if record.id == id {
                    record.set_field(key, value);
                    return Ok(());
                }
            }
        }
        Err(SyncError::NotFound { id })
    }

    /// Replaces the committed record with the same id, in place.
    ///
    /// Returns false if no such record exists (it may have been removed
    /// while the reconciling call was in flight).
    pub fn replace(&mut self, record: Record) -> bool {
        for entry in &mut self.entries {
            if let Entry::Committed(existing) = entry {
                if existing.id == record.id {
                    *existing = record;
                    return true;
                }
            }
        }
        false
    }

    /// Removes the committed record with this id.
    ///
    /// Returns the record and the index it occupied, for a possible
    /// [`CollectionStore::restore`].
    pub fn remove(&mut self, id: RecordId) -> SyncResult<(Record, usize)> {
        let position = self
            .entries
            .iter()
            .position(|e| e.id() == Some(id))
            .ok_or(SyncError::NotFound { id })?;
        match self.entries.remove(position) {
            Entry::Committed(record) => Ok((record, position)),
            Entry::Pending { .. } => unreachable!("position matched a committed id"),
        }
    }

    /// Reinserts a previously removed record at its prior index.
    ///
    /// The index is clamped to the current length. Returns false — and
    /// leaves the collection untouched — if the id is already committed
    /// again (a page fetched while the delete was in flight can
    /// legitimately re-deliver it).
    pub fn restore(&mut self, record: Record, index: usize) -> bool {
        if self.contains(record.id) {
            return false;
        }
        let position = index.min(self.entries.len());
        self.entries.insert(position, Entry::Committed(record));
        true
    }

    fn pending_position(&self, token: InsertToken) -> SyncResult<usize> {
        self.entries
            .iter()
            .position(|e| matches!(e, Entry::Pending { token: t, .. } if *t == token))
            .ok_or(SyncError::PendingNotFound {
                token: token.as_u64(),
            })
    }
}
