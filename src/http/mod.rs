//! HTTP transport module
//!
//! Provides the `RequestSender` seam and its reqwest-backed implementation.
//!
//! # Features
//!
//! - **Credentials**: Basic/Bearer auth applied to every request
//! - **Optional Retries**: 429/5xx and timeouts, with backoff (off by default)
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Error payloads**: Non-2xx bodies mapped to `Error::Api`

mod client;
mod rate_limit;
mod sender;

pub use client::{default_user_agent, HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use sender::{Request, RequestBody, RequestSender, Response};

#[cfg(test)]
mod tests;
