//! # pagesync Protocol
//!
//! Wire-level record and cursor types for pagesync.
//!
//! This crate provides:
//! - `Record` and `RecordDraft` for collection rows
//! - `RecordId` for server-assigned identity
//! - `PageCursor` for bounded page reads
//! - JSON encoding/decoding against the remote collection API
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cursor;
mod error;
mod record;

pub use cursor::PageCursor;
pub use error::{WireError, WireResult};
pub use record::{decode_page, decode_record, FieldMap, Record, RecordDraft, RecordId};
