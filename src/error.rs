//! Error types for comms-rest
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for comms-rest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}", format_api_error(*status, code.as_ref(), message))]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
        more_info: Option<String>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

fn format_api_error(status: u16, code: Option<&u32>, message: &str) -> String {
    match code {
        Some(code) => format!("HTTP {status} (error {code}): {message}"),
        None => format!("HTTP {status}: {message}"),
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an API error with only a status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: None,
            message: message.into(),
            more_info: None,
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            Error::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for comms-rest
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("account_sid");
        assert_eq!(
            err.to_string(),
            "Missing required config field: account_sid"
        );

        let err = Error::api(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::Api {
            status: 404,
            code: Some(20404),
            message: "The requested resource was not found".to_string(),
            more_info: None,
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404 (error 20404): The requested resource was not found"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::api(429, "").is_retryable());
        assert!(Error::api(500, "").is_retryable());
        assert!(Error::api(503, "").is_retryable());

        assert!(!Error::api(400, "").is_retryable());
        assert!(!Error::api(401, "").is_retryable());
        assert!(!Error::api(404, "").is_retryable());
        assert!(!Error::decode("bad envelope").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::api(401, "unauthorized").status(), Some(401));
        assert_eq!(Error::decode("x").status(), None);
    }
}
