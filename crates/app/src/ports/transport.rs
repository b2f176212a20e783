//! Transport port: one HTTP exchange with a deadline.
//!
//! The browser adapter implements it with `fetch` plus an abort timer; tests
//! and the dev server's end-to-end suite plug in their own.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// HTTP verb used by the device API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request. `body` is JSON when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    /// The exchange must be abandoned once this elapses.
    pub timeout: Duration,
}

/// A received response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The exchange did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The deadline elapsed and the request was aborted.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// DNS, connection or CORS failure.
    #[error("network error: {0}")]
    Network(String),
}

/// Sends HTTP requests.
///
/// Implementations must enforce [`HttpRequest::timeout`] themselves and
/// report it as [`TransportError::Timeout`]. The returned future need not be
/// `Send`.
pub trait Transport: Clone + 'static {
    /// Perform a single request.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>>;
}
