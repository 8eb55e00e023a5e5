//! HTTP client with optional retry and rate limiting
//!
//! Provides the reqwest-backed `RequestSender`:
//! - Credentials applied to every request
//! - Optional retries with configurable backoff (off by default)
//! - Optional rate limiting to prevent API throttling
//! - Response bodies read fully before returning

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::sender::{Request, RequestBody, RequestSender, Response};
use crate::auth::{Authenticator, Credentials};
use crate::error::{is_retryable_status, Error, Result};
use crate::types::BackoffType;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries (0 disables retrying)
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 0,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: default_user_agent(),
        }
    }
}

/// User agent sent when none is configured
pub fn default_user_agent() -> String {
    format!("comms-rest/{}", env!("CARGO_PKG_VERSION"))
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with optional retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
            rate_limiter,
        })
    }

    /// Create a client with credentials
    pub fn with_credentials(config: HttpClientConfig, credentials: Credentials) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_credentials(credentials);
        Ok(client)
    }

    /// Replace the credentials
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.authenticator = Authenticator::new(credentials);
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Execute a request, retrying when configured to
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let max_retries = request.max_retries.unwrap_or(self.config.max_retries);
        let timeout = request.timeout.unwrap_or(self.config.timeout);

        let mut attempt = 0;

        loop {
            // Wait for rate limiter
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let req = self.build_request(&request, timeout);

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if attempt < max_retries && is_retryable_status(status.as_u16()) {
                        let delay = if status == StatusCode::TOO_MANY_REQUESTS {
                            extract_retry_after(response.headers()).map_or_else(
                                || self.calculate_backoff(attempt),
                                |secs| self.config.max_backoff.min(Duration::from_secs(secs)),
                            )
                        } else {
                            self.calculate_backoff(attempt)
                        };
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let headers = response.headers().clone();
                    let body = response.text().await?;
                    debug!(
                        "{} {} -> {}",
                        request.method,
                        request.url,
                        status.as_u16()
                    );
                    return Ok(Response {
                        status: status.as_u16(),
                        headers,
                        body,
                    });
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Transport error ({e}), attempt {}/{}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(Error::Transport(e));
                }
            }
        }
    }

    fn build_request(&self, request: &Request, timeout: Duration) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(timeout);

        // Add default headers
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        // Add request-specific headers
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        match &request.body {
            Some(RequestBody::Form(params)) => req = req.form(params),
            None => {}
        }

        self.authenticator.apply(req)
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self
                .config
                .initial_backoff
                .saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

#[async_trait]
impl RequestSender for HttpClient {
    async fn send(&self, request: Request) -> Result<Response> {
        self.execute(request).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("credentials", self.authenticator.credentials())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value in seconds
fn extract_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}
