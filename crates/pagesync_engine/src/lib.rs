//! # pagesync Engine
//!
//! Incremental paginated-collection sync engine.
//!
//! This crate provides:
//! - Load-state machine (idle → fetching → idle/exhausted/errored)
//! - Ordered, id-deduplicated collection store with optimistic mutations
//! - Sync controller for load-more / create / update / delete
//! - Transport abstraction with an HTTP binding
//!
//! ## Architecture
//!
//! The engine implements an **optimistic client** model against an
//! authoritative server:
//! 1. Page reads append to the local collection, deduplicated by record id
//! 2. Mutations apply locally first, then go to the server
//! 3. The server's response commits the change or the local change is
//!    rolled back
//!
//! ## Key Invariants
//!
//! - At most one page fetch is in flight at any time
//! - No two committed records share an id
//! - Record order is arrival order; it never drifts during merges
//! - Every failed create/delete is compensated before the error surfaces

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod http;
mod state;
mod store;
mod transport;

pub use config::SyncConfig;
pub use controller::{LoadOutcome, SyncController, SyncStats};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use state::{LoadState, LoadTracker};
pub use store::{CollectionStore, Entry, InsertToken};
pub use transport::{CollectionTransport, MockTransport};
