//! Client configuration
//!
//! `ClientConfig` carries credentials, region/edge routing and HTTP
//! settings. It is loaded from YAML or JSON, read from environment variables
//! through an explicit constructor, or built in code. Nothing in the crate
//! reads the environment implicitly.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, OptionStringExt, StringMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Base domain every API host lives under
pub const DEFAULT_BASE_DOMAIN: &str = "twilio.com";

/// Environment variable names read by `ClientConfig::from_env`
pub mod env {
    /// Account SID
    pub const ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
    /// Auth token for the account
    pub const AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
    /// API key SID
    pub const API_KEY: &str = "TWILIO_API_KEY";
    /// API key secret
    pub const API_SECRET: &str = "TWILIO_API_SECRET";
    /// Region (e.g. `ie1`)
    pub const REGION: &str = "TWILIO_REGION";
    /// Edge location (e.g. `dublin`)
    pub const EDGE: &str = "TWILIO_EDGE";
}

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Account SID, also substituted into account-scoped paths
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Auth token paired with the account SID
    #[serde(default)]
    pub auth_token: Option<String>,

    /// API key SID (preferred over the auth token when set)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API key secret
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Region for host rewriting
    #[serde(default)]
    pub region: Option<String>,

    /// Edge for host rewriting
    #[serde(default)]
    pub edge: Option<String>,

    /// Base domain (defaults to `twilio.com`)
    #[serde(default)]
    pub base_domain: Option<String>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ClientConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &redact(&self.auth_token))
            .field("api_key", &self.api_key)
            .field("api_secret", &redact(&self.api_secret))
            .field("region", &self.region)
            .field("edge", &self.edge)
            .field("base_domain", &self.base_domain)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP settings as they appear in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for 429/5xx and timeouts (0 disables retrying)
    #[serde(default)]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// First retry delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Retry delay ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent on every request
    #[serde(default)]
    pub headers: StringMap,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit: None,
            user_agent: None,
            headers: StringMap::new(),
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

impl ClientConfig {
    /// Config authenticating with an account SID and auth token
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: Some(account_sid.into()),
            auth_token: Some(auth_token.into()),
            ..Self::default()
        }
    }

    /// Read the `TWILIO_*` environment variables
    pub fn from_env() -> Self {
        Self::from_env_vars(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup; empty values count as unset
    pub fn from_env_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).none_if_empty();
        Self {
            account_sid: var(env::ACCOUNT_SID),
            auth_token: var(env::AUTH_TOKEN),
            api_key: var(env::API_KEY),
            api_secret: var(env::API_SECRET),
            region: var(env::REGION),
            edge: var(env::EDGE),
            ..Self::default()
        }
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fill unset fields from another config (typically the environment)
    #[must_use]
    pub fn or(mut self, fallback: Self) -> Self {
        self.account_sid = self.account_sid.or(fallback.account_sid);
        self.auth_token = self.auth_token.or(fallback.auth_token);
        self.api_key = self.api_key.or(fallback.api_key);
        self.api_secret = self.api_secret.or(fallback.api_secret);
        self.region = self.region.or(fallback.region);
        self.edge = self.edge.or(fallback.edge);
        self.base_domain = self.base_domain.or(fallback.base_domain);
        self
    }

    /// Authenticate with an API key instead of the auth token
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.api_secret = Some(secret.into());
        self
    }

    /// Set the region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the edge
    #[must_use]
    pub fn with_edge(mut self, edge: impl Into<String>) -> Self {
        self.edge = Some(edge.into());
        self
    }

    /// Override the base domain
    #[must_use]
    pub fn with_base_domain(mut self, base_domain: impl Into<String>) -> Self {
        self.base_domain = Some(base_domain.into());
        self
    }

    /// Enable retries
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.http.max_retries = max_retries;
        self
    }
}

// ============================================================================
// Derived Settings
// ============================================================================

impl ClientConfig {
    /// Base domain, falling back to the default
    pub fn base_domain(&self) -> &str {
        self.base_domain
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_BASE_DOMAIN)
    }

    /// Credentials to sign requests with
    ///
    /// An API key and secret win over the account SID and auth token.
    pub fn credentials(&self) -> Result<Credentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => return Ok(Credentials::basic(key, secret)),
            (Some(_), None) => return Err(Error::missing_field("api_secret")),
            (None, Some(_)) => return Err(Error::missing_field("api_key")),
            (None, None) => {}
        }

        let account_sid = self
            .account_sid
            .as_ref()
            .ok_or_else(|| Error::missing_field("account_sid"))?;
        let auth_token = self
            .auth_token
            .as_ref()
            .ok_or_else(|| Error::missing_field("auth_token"))?;

        Ok(Credentials::basic(account_sid, auth_token))
    }

    /// Transport settings for `HttpClient`
    pub fn http_client_config(&self) -> HttpClientConfig {
        let settings = &self.http;
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .max_retries(settings.max_retries)
            .backoff(
                settings.backoff,
                Duration::from_millis(settings.initial_backoff_ms),
                Duration::from_millis(settings.max_backoff_ms),
            );

        if let Some(rate_limit) = &settings.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        if let Some(agent) = settings.user_agent.as_deref().filter(|a| !a.is_empty()) {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &settings.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}
