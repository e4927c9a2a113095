// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Three layers:
// - FetchError: one URL could not be fetched. Never fatal for the session,
//   the frontier records it and moves on.
// - SinkError: an output artifact could not be written (after one retry).
// - CrawlError: anything that ends a session early.
//
// main.rs wraps all of these into anyhow::Error at the application edge.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

// Whether a failed fetch is worth another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeouts, connection problems, 5xx and 429 responses
    Retryable,
    /// 4xx responses, redirect loops, malformed requests
    Terminal,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    #[error("redirected off-site to {to}")]
    OutOfScopeRedirect { to: String },

    #[error("cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Status { status } => {
                if *status >= 500 || *status == 429 {
                    FailureKind::Retryable
                } else {
                    FailureKind::Terminal
                }
            }
            FetchError::Timeout | FetchError::Connect(_) | FetchError::Body(_) => {
                FailureKind::Retryable
            }
            FetchError::TooManyRedirects
            | FetchError::Request(_)
            | FetchError::RetriesExhausted { .. }
            | FetchError::OutOfScopeRedirect { .. }
            | FetchError::Cancelled => FailureKind::Terminal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == FailureKind::Retryable
    }
}

// Sorts reqwest's error into our categories.
// Connection resets surface as request/body errors, so those retry too.
impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(error.to_string())
        } else if let Some(status) = error.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else if error.is_request() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct SinkError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error(transparent)]
    Sink(#[from] SinkError),
}
