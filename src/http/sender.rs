//! Request/response types and the `RequestSender` seam
//!
//! Everything above the transport (pagination, domain routing) talks to a
//! `RequestSender`, so the reqwest-backed client can be swapped out.

use crate::error::{Error, Result};
use crate::types::Method;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` parameters
    Form(Vec<(String, String)>),
}

/// A single HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Fully-qualified URL
    pub url: String,
    /// Query parameters, in insertion order
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Optional body
    pub body: Option<RequestBody>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl Request {
    /// Create a request for the given method and URL
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
            max_retries: None,
        }
    }

    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Create a DELETE request
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a form-encoded body
    #[must_use]
    pub fn form(mut self, params: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(params));
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A fully-read HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as text
    pub body: String,
}

impl Response {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }

    /// Convert a non-2xx response into an API error
    ///
    /// The error body is expected to look like
    /// `{"code": 20404, "message": "...", "more_info": "...", "status": 404}`;
    /// anything else keeps the raw body as the message.
    pub fn into_api_error(self) -> Error {
        let parsed: Option<ApiErrorBody> = serde_json::from_str(&self.body).ok();
        match parsed {
            Some(body) => Error::Api {
                status: self.status,
                code: body.code,
                message: body.message.unwrap_or_else(|| self.body.clone()),
                more_info: body.more_info,
            },
            None => Error::api(self.status, self.body),
        }
    }

    /// Return self on success, or the API error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_api_error())
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    more_info: Option<String>,
}

/// Issues one HTTP request and returns the status and body
///
/// Non-2xx statuses are returned as responses, not errors. Only
/// connection-level failures are `Err`.
#[async_trait]
pub trait RequestSender: Send + Sync {
    /// Send a request
    async fn send(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<S: RequestSender + ?Sized> RequestSender for std::sync::Arc<S> {
    async fn send(&self, request: Request) -> Result<Response> {
        (**self).send(request).await
    }
}
