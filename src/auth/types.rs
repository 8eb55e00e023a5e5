//! Credential types
//!
//! Runtime credentials resolved from a `ClientConfig`.

use std::collections::HashMap;

/// Credentials attached to every outgoing request
#[derive(Clone, Default)]
pub enum Credentials {
    /// No authentication
    #[default]
    None,

    /// HTTP Basic authentication
    ///
    /// Either an account SID with its auth token, or an API key SID with
    /// its secret.
    Basic {
        /// Username (account SID or API key SID)
        username: String,
        /// Password (auth token or API key secret)
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Custom headers
    CustomHeaders {
        /// Headers to add to each request
        headers: HashMap<String, String>,
    },
}

impl Credentials {
    /// Basic credentials from a username/password pair
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token credentials
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Whether any credentials are present
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Username used for basic auth, if any
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Basic { username, .. } => Some(username),
            _ => None,
        }
    }
}

// Secrets never show up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Self::CustomHeaders { headers } => f
                .debug_struct("CustomHeaders")
                .field("headers", &headers.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}
