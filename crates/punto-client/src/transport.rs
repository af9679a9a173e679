//! # HTTP Transport
//!
//! JSON over HTTP to the back-office REST service, with bearer auth,
//! status mapping and retry of idempotent reads.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  get/post/patch/delete(path, session)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base_url + path                                                        │
//! │  Authorization: Bearer <token>    (when a session is given)             │
//! │  x-request-id: <uuid v4>                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────┐   2xx ──────────► decode JSON (empty body = null)         │
//! │  │ response │   401/403 ──────► Unauthorized                            │
//! │  └──────────┘   404 ──────────► NotFound { resource, id }               │
//! │       │         other 4xx ────► Rejected { status, message }            │
//! │       │         5xx ──────────► Server { status }          ─┐           │
//! │       │         no response ──► Transport / Timeout         ├─ GET only:│
//! │       │                                                     │  backoff  │
//! │       └─────────────────────────────────────────────────────┘  & retry  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are never retried: a POST that timed out may still have created
//! the record.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use reqwest::{Method, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::{ApiSettings, ClientConfig};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Retry Policy
// =============================================================================

/// How idempotent reads are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. 0 disables retrying.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

impl From<&ApiSettings> for RetryPolicy {
    fn from(api: &ApiSettings) -> Self {
        RetryPolicy {
            max_retries: api.max_retries,
            initial_backoff: api.initial_backoff(),
            max_backoff: api.max_backoff(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&ApiSettings::default())
    }
}

// =============================================================================
// Transport
// =============================================================================

/// HTTP client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Builds a transport from validated configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let base_url = config.base_url()?;

        let client = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .user_agent(concat!("punto-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpTransport {
            client,
            base_url,
            retry: RetryPolicy::from(&config.api),
            timeout_secs: config.api.timeout_secs,
        })
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Absolute URL for a service path such as `/product/7`.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// GET, retried with backoff on transport and 5xx errors.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&Session>,
    ) -> ClientResult<T> {
        let mut backoff = self.retry.create_backoff();
        let mut attempt = 0u32;

        loop {
            match self.execute(Method::GET, path, session, None).await {
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(e);
                    };
                    warn!(
                        path,
                        attempt,
                        max_retries = self.retry.max_retries,
                        ?delay,
                        error = %e,
                        "Retrying GET"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// POST a JSON body.
    pub async fn post<B, T>(&self, path: &str, session: Option<&Session>, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.execute(Method::POST, path, session, Some(body)).await
    }

    /// PATCH a JSON body.
    pub async fn patch<B, T>(&self, path: &str, session: Option<&Session>, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.execute(Method::PATCH, path, session, Some(body)).await
    }

    /// DELETE; whatever the service answers with is ignored.
    pub async fn delete(&self, path: &str, session: Option<&Session>) -> ClientResult<()> {
        self.execute::<IgnoredAny>(Method::DELETE, path, session, None)
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let request_id = Uuid::new_v4();
        let url = self.url_for(path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(session) = session {
            request = request.bearer_auth(session.token());
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!(%method, path, %request_id, "Sending request");

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;

        debug!(%method, path, %request_id, status = status.as_u16(), bytes = bytes.len(), "Received response");

        if status.is_success() {
            decode_body(&bytes)
        } else {
            Err(map_status(status, path, &bytes))
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> ClientResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ClientError::Decode(format!("request body: {}", e)))
}

/// Decodes a success body; an empty body reads as JSON `null`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Maps a non-success status to an error.
///
/// For 404 the resource and id are read off the path: `/product/7` is
/// product `7`.
pub(crate) fn map_status(status: StatusCode, path: &str, body: &[u8]) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => {
            let mut segments = path.trim_matches('/').splitn(2, '/');
            let resource = segments.next().unwrap_or_default().to_string();
            let id = segments.next().unwrap_or_default().to_string();
            ClientError::NotFound { resource, id }
        }
        s if s.is_server_error() => ClientError::Server { status: s.as_u16() },
        s => ClientError::Rejected {
            status: s.as_u16(),
            message: service_message(body)
                .unwrap_or_else(|| s.canonical_reason().unwrap_or("rejected").to_string()),
        },
    }
}

/// The `message` of an error body: a string, or a list of strings.
fn service_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, "/product", b""),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, "/product", b""),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, "/product", b""),
            ClientError::Server { status: 502 }
        ));

        match map_status(StatusCode::NOT_FOUND, "/sale-detail/41", b"") {
            ClientError::NotFound { resource, id } => {
                assert_eq!(resource, "sale-detail");
                assert_eq!(id, "41");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejected_message_extraction() {
        let single = map_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "/product",
            br#"{"statusCode":422,"message":"productName must not be empty"}"#,
        );
        assert_eq!(
            single.to_string(),
            "Request rejected (422): productName must not be empty"
        );

        let list = map_status(
            StatusCode::BAD_REQUEST,
            "/tax",
            br#"{"message":["taxName is required","taxPercentage must be a number"]}"#,
        );
        assert!(matches!(
            list,
            ClientError::Rejected { status: 400, ref message }
                if message == "taxName is required; taxPercentage must be a number"
        ));

        let plain = map_status(StatusCode::CONFLICT, "/tax", b"conflict!");
        assert!(matches!(plain, ClientError::Rejected { status: 409, ref message } if message == "Conflict"));
    }

    #[test]
    fn test_decode_empty_body() {
        let unit: () = decode_body(b"").unwrap();
        assert_eq!(unit, ());
        let none: Option<u32> = decode_body(b"  ").unwrap();
        assert_eq!(none, None);
        assert!(matches!(decode_body::<u32>(b"{"), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_url_join_keeps_base_path() {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://localhost:3000/api/".to_string();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url_for("/product/7"), "http://localhost:3000/api/product/7");
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let policy = RetryPolicy::from(&ApiSettings::default());
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(200));
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }
}
