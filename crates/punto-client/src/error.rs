//! # Client Error Types
//!
//! Error types for everything that talks to the REST service.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Auth        │  │     HTTP                │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Unauthorized   │  │  NotFound   (404)       │ │
//! │  │  InvalidUrl     │  │  InvalidToken   │  │  Rejected   (4xx)       │ │
//! │  │  ConfigLoad/Save│  │  LoginFailed    │  │  Server     (5xx)       │ │
//! │  └─────────────────┘  └─────────────────┘  │  Transport / Timeout    │ │
//! │                                            │  Decode                 │ │
//! │  ┌─────────────────────────────────────┐   └─────────────────────────┘ │
//! │  │  Domain (from punto-core)           │                               │
//! │  │  Core(CoreError)                    │                               │
//! │  │  Validation(ValidationError)        │                               │
//! │  └─────────────────────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use punto_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure of a request.
///
/// ## Design Principles
/// - Each variant includes enough context to act on
/// - Errors are categorized for retry decisions
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid service URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Auth Errors
    // =========================================================================
    /// The service refused the bearer token (401/403).
    #[error("Not authorized: log in again")]
    Unauthorized,

    /// The token could not be decoded.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Login was refused.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    // =========================================================================
    // HTTP Errors
    // =========================================================================
    /// 404 for a specific record.
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// Any other 4xx; `message` is the service's own text when it sent one.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 5xx.
    #[error("Service error ({status})")]
    Server { status: u16 },

    /// Connection could not be made or broke mid-request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A draft failed its checks and was not sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClientError::InvalidToken(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl ClientError {
    /// Returns true if the request may succeed when sent again.
    ///
    /// ## Retryable Errors
    /// - Transport failures (network issues)
    /// - Timeouts
    /// - 5xx responses
    ///
    /// Everything else is an answer from the service and will not change.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Timeout(_) | ClientError::Server { .. }
        )
    }

    /// Returns true if the user must log in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized | ClientError::InvalidToken(_) | ClientError::LoginFailed(_)
        )
    }
}
