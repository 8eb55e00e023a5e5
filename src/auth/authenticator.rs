//! Authenticator implementation
//!
//! Applies credentials to outgoing request builders.

use super::types::Credentials;
use reqwest::RequestBuilder;

/// Authenticator handles applying credentials to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    credentials: Credentials,
}

impl Authenticator {
    /// Create a new authenticator with the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::None => req,

            Credentials::Basic { username, password } => req.basic_auth(username, Some(password)),

            Credentials::Bearer { token } => req.bearer_auth(token),

            Credentials::CustomHeaders { headers } => {
                let mut req = req;
                for (key, value) in headers {
                    req = req.header(key.as_str(), value.as_str());
                }
                req
            }
        }
    }

    /// Get the current credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
