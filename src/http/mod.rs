//! HTTP transport module
//!
//! Provides the [`Transport`] seam used by the paginator and its reqwest
//! implementation.
//!
//! # Features
//!
//! - **Automatic Retries**: 429/5xx, timeouts and connection errors
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{HttpRequest, HttpResponse, Transport};
