//! HTTP binding of the collection transport.
//!
//! The actual HTTP client is abstracted via a trait so the engine carries
//! no HTTP library dependency; frontends plug in reqwest, hyper, a test
//! double, or anything else that can move a request.

use crate::error::{SyncError, SyncResult};
use crate::transport::CollectionTransport;
use pagesync_protocol::{decode_page, decode_record, PageCursor, Record, RecordDraft, RecordId};

/// HTTP verb of a collection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Paged read.
    Get,
    /// Create.
    Post,
    /// Full update.
    Put,
    /// Delete.
    Delete,
}

impl HttpMethod {
    /// Returns the verb as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One outbound HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The verb.
    pub method: HttpMethod,
    /// Absolute URL, query string included.
    pub url: String,
    /// JSON body, for POST and PUT.
    pub body: Option<String>,
}

/// One HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual transport. A client performs
/// exactly the request it is handed — no retries, no caching.
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    /// Executes a request and returns the response, or a transport-level
    /// error message (connectivity, timeout).
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

/// HTTP-based collection transport.
///
/// Speaks the paged REST dialect of the remote collection API: `GET` with
/// `_page`/`_limit` query parameters for reads, `POST`/`PUT`/`DELETE` on
/// the collection and record URLs for mutations, JSON bodies throughout.
pub struct HttpTransport<C: HttpClient> {
    base_url: String,
    collection: String,
    client: C,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a transport for one collection under a base URL.
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>, client: C) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            collection: collection.into(),
            client,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }

    fn record_url(&self, id: RecordId) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, id)
    }

    async fn send(&self, request: HttpRequest) -> SyncResult<HttpResponse> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(SyncError::transport_retryable)?;

        if !response.is_success() {
            return Err(SyncError::Server {
                status: response.status,
                message: response.body,
            });
        }
        Ok(response)
    }
}

impl<C: HttpClient> CollectionTransport for HttpTransport<C> {
    async fn fetch_page(&self, cursor: &PageCursor) -> SyncResult<Vec<Record>> {
        let url = format!(
            "{}?_page={}&_limit={}",
            self.collection_url(),
            cursor.page,
            cursor.page_size
        );
        let response = self
            .send(HttpRequest {
                method: HttpMethod::Get,
                url,
                body: None,
            })
            .await?;
        Ok(decode_page(&response.body)?)
    }

    async fn create(&self, draft: &RecordDraft) -> SyncResult<Record> {
        let response = self
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: self.collection_url(),
                body: Some(draft.to_json().to_string()),
            })
            .await?;
        Ok(decode_record(&response.body)?)
    }

    async fn update(&self, record: &Record) -> SyncResult<Record> {
        let response = self
            .send(HttpRequest {
                method: HttpMethod::Put,
                url: self.record_url(record.id),
                body: Some(record.to_json().to_string()),
            })
            .await?;
        Ok(decode_record(&response.body)?)
    }

    async fn delete(&self, id: RecordId) -> SyncResult<()> {
        self.send(HttpRequest {
            method: HttpMethod::Delete,
            url: self.record_url(id),
            body: None,
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    struct TestClient {
        responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl TestClient {
        fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn push_ok(&self, status: u16, body: &str) {
            self.responses.lock().push_back(Ok(HttpResponse {
                status,
                body: body.into(),
            }));
        }

        fn push_err(&self, message: &str) {
            self.responses.lock().push_back(Err(message.into()));
        }

        fn last_request(&self) -> HttpRequest {
            self.requests.lock().last().cloned().unwrap()
        }
    }

    impl HttpClient for &TestClient {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
            self.requests.lock().push(request);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err("no response scripted".into()))
        }
    }

    fn transport(client: &TestClient) -> HttpTransport<&TestClient> {
        HttpTransport::new("https://api.example.com/", "users", client)
    }

    #[tokio::test]
    async fn fetch_page_url_and_decode() {
        let client = TestClient::new();
        client.push_ok(200, r#"[{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]"#);

        let page = transport(&client)
            .fetch_page(&PageCursor::new(3, 10))
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        let request = client.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "https://api.example.com/users?_page=3&_limit=10"
        );
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn create_posts_draft_without_id() {
        let client = TestClient::new();
        client.push_ok(201, r#"{"id": 11, "name": "new"}"#);

        let draft = RecordDraft::from_fields([("name", "new")]);
        let created = transport(&client).create(&draft).await.unwrap();

        assert_eq!(created.id.as_u64(), 11);
        let request = client.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.example.com/users");
        let body: serde_json::Value = serde_json::from_str(&request.body.unwrap()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body.get("name"), Some(&serde_json::Value::from("new")));
    }

    #[tokio::test]
    async fn update_puts_full_record() {
        let client = TestClient::new();
        client.push_ok(200, r#"{"id": 5, "name": "n", "email": "a@b.com"}"#);

        let mut record = Record::new(RecordId::new(5), [("name", "n")]);
        record.set_field("email", "a@b.com");
        let updated = transport(&client).update(&record).await.unwrap();

        assert_eq!(updated.field("email"), Some("a@b.com"));
        let request = client.last_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "https://api.example.com/users/5");
        let body: serde_json::Value = serde_json::from_str(&request.body.unwrap()).unwrap();
        assert_eq!(body.get("id"), Some(&serde_json::Value::from(5)));
        assert_eq!(body.get("email"), Some(&serde_json::Value::from("a@b.com")));
    }

    #[tokio::test]
    async fn delete_hits_record_url() {
        let client = TestClient::new();
        client.push_ok(200, "{}");

        transport(&client).delete(RecordId::new(7)).await.unwrap();

        let request = client.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "https://api.example.com/users/7");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_server_error() {
        let client = TestClient::new();
        client.push_ok(500, "boom");

        let err = transport(&client)
            .fetch_page(&PageCursor::first(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Server { status: 500, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn client_failure_maps_to_retryable_transport_error() {
        let client = TestClient::new();
        client.push_err("connection refused");

        let err = transport(&client)
            .fetch_page(&PageCursor::first(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Transport { retryable: true, .. }));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_decode_error() {
        let client = TestClient::new();
        client.push_ok(200, "not json");

        let err = transport(&client)
            .fetch_page(&PageCursor::first(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }
}
