//! Configuration for the sync engine.

use std::time::Duration;

/// Configuration for a collection controller.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote API (e.g. "https://api.example.com").
    pub base_url: String,
    /// Collection path under the base URL.
    pub collection: String,
    /// Records per page; fixed for the controller's lifetime.
    pub page_size: u32,
    /// Fields that must be non-blank for a create call to go out.
    pub required_fields: Vec<String>,
    /// Request timeout, applied by the concrete HTTP client.
    pub timeout: Duration,
}

impl SyncConfig {
    /// Creates a configuration with the default collection layout:
    /// collection `users`, page size 10, required fields
    /// `name`/`email`/`website`, 30 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            collection: "users".into(),
            page_size: 10,
            required_fields: vec!["name".into(), "email".into(), "website".into()],
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the collection path.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sets the page size. Values below 1 are raised to 1.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sets the fields a create call must carry non-blank.
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("")
    }
}
