//! Transport abstraction
//!
//! The extraction core only sees `(method, url, headers, query) ->
//! {status, headers, body}`. Status classification happens in the core,
//! so a transport returns non-success responses as values.

use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;
use std::collections::HashMap;

/// A single outgoing request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL without query string
    pub url: String,
    /// Request headers, in insertion order
    pub headers: Vec<(String, String)>,
    /// Query parameters, in insertion order
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// A GET request for `url`
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Add several headers
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// A fully-read response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Check for a 2xx/3xx status
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Sends requests and returns the final response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request
    ///
    /// Returns `Err` only when no response could be obtained at all
    /// (connection failure, timeout). HTTP error statuses are returned as
    /// responses.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
