//! Seams between the generation client and the platform it runs on.
//!
//! The browser build plugs in `gloo-net` and `setTimeout`; tests plug in
//! scripted fakes. Both traits are used by value through generics, so the
//! returned futures need not be `Send`.

use std::time::Duration;

use crate::wire::GenerateContentRequest;

/// Status and body of an HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Rate limiting and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.status == 429 || self.status >= 500
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("network error: {message}")]
pub struct NetworkError {
    pub message: String,
}

impl NetworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POSTs `body` as JSON to `url`.
    async fn post(
        &self,
        url: &str,
        body: &GenerateContentRequest,
    ) -> Result<HttpResponse, NetworkError>;
}

#[allow(async_fn_in_trait)]
pub trait Timer {
    /// Suspends the calling task without blocking other pending work.
    async fn sleep(&self, duration: Duration);
}
