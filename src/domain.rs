//! Domain and version routing
//!
//! A `Domain` is one API host (`api`, `messaging`, `lookups`, ...) and a
//! `Version` is a versioned path prefix on that host. Generated resources
//! build relative URIs and hand them to a `Version`, which turns them into
//! absolute URLs and runs the request.

use crate::error::Result;
use crate::http::{Request, RequestSender};
use crate::pagination::{Page, PageFetcher, PageLimit, RecordStream};
use crate::types::Record;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Region used when only an edge is configured
pub const DEFAULT_REGION: &str = "us1";

/// Resolve the hostname for a named API domain
///
/// - no region, no edge: `{name}.{base}`
/// - region only: `{name}.{region}.{base}`
/// - edge: `{name}.{edge}.{region or us1}.{base}`
pub fn regional_host(
    name: &str,
    base_domain: &str,
    region: Option<&str>,
    edge: Option<&str>,
) -> String {
    let region = region.filter(|r| !r.is_empty());
    let edge = edge.filter(|e| !e.is_empty());

    match (edge, region) {
        (Some(edge), region) => format!(
            "{name}.{edge}.{}.{base_domain}",
            region.unwrap_or(DEFAULT_REGION)
        ),
        (None, Some(region)) => format!("{name}.{region}.{base_domain}"),
        (None, None) => format!("{name}.{base_domain}"),
    }
}

/// Returns true for `http://` and `https://` URLs
pub(crate) fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// One API host
#[derive(Clone)]
pub struct Domain {
    base_url: String,
    sender: Arc<dyn RequestSender>,
}

impl Domain {
    /// Create a domain rooted at an explicit base URL
    pub fn new(base_url: impl Into<String>, sender: Arc<dyn RequestSender>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sender,
        }
    }

    /// Create a domain for a named host, applying region/edge rewriting
    pub fn regional(
        name: &str,
        base_domain: &str,
        region: Option<&str>,
        edge: Option<&str>,
        sender: Arc<dyn RequestSender>,
    ) -> Self {
        let host = regional_host(name, base_domain, region, edge);
        Self::new(format!("https://{host}"), sender)
    }

    /// Base URL with no trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a relative URI onto the base URL; absolute URLs pass through
    pub fn absolute_url(&self, uri: &str) -> String {
        if is_absolute(uri) {
            return uri.to_string();
        }
        format!("{}/{}", self.base_url, uri.trim_start_matches('/'))
    }

    /// A version of this domain (e.g. `2010-04-01`, `v1`)
    pub fn version(&self, version: impl Into<String>) -> Version {
        Version {
            domain: self.clone(),
            version: version.into().trim_matches('/').to_string(),
        }
    }

    /// Sender shared by every version of this domain
    pub fn sender(&self) -> Arc<dyn RequestSender> {
        Arc::clone(&self.sender)
    }

    /// Fetcher that resolves host-relative cursors against this domain
    pub fn page_fetcher(&self) -> PageFetcher {
        PageFetcher::new(self.sender()).with_base_url(self.base_url.as_str())
    }
}

impl std::fmt::Debug for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domain")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// A versioned path prefix on a domain
#[derive(Clone, Debug)]
pub struct Version {
    domain: Domain,
    version: String,
}

impl Version {
    /// The owning domain
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The version segment
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Turn a URI relative to this version into an absolute URL
    ///
    /// Absolute URLs (such as next-page cursors) are returned unchanged.
    pub fn absolute_url(&self, uri: &str) -> String {
        if is_absolute(uri) {
            return uri.to_string();
        }
        self.domain
            .absolute_url(&format!("{}/{}", self.version, uri.trim_start_matches('/')))
    }

    fn fetcher(&self) -> PageFetcher {
        self.domain.page_fetcher()
    }

    /// Fetch a single resource instance
    pub async fn fetch(&self, uri: &str) -> Result<Record> {
        self.fetch_as(uri, &[]).await
    }

    /// Fetch a single resource instance with query parameters, decoded as `T`
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        uri: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = self.absolute_url(uri);
        debug!("Fetching {url}");
        let response = self
            .domain
            .sender
            .send(Request::get(url).queries(params.iter().cloned()))
            .await?
            .error_for_status()?;
        response.json()
    }

    /// Create a resource instance (form-encoded POST)
    pub async fn create(&self, uri: &str, form: Vec<(String, String)>) -> Result<Record> {
        self.post_form(uri, form).await
    }

    /// Update a resource instance (form-encoded POST)
    pub async fn update(&self, uri: &str, form: Vec<(String, String)>) -> Result<Record> {
        self.post_form(uri, form).await
    }

    async fn post_form(&self, uri: &str, form: Vec<(String, String)>) -> Result<Record> {
        let url = self.absolute_url(uri);
        debug!("Posting {} form fields to {url}", form.len());
        let response = self
            .domain
            .sender
            .send(Request::post(url).form(form))
            .await?
            .error_for_status()?;
        response.json()
    }

    /// Delete a resource instance; true when the server answered 204
    pub async fn delete(&self, uri: &str) -> Result<bool> {
        let url = self.absolute_url(uri);
        debug!("Deleting {url}");
        let response = self
            .domain
            .sender
            .send(Request::delete(url))
            .await?
            .error_for_status()?;
        Ok(response.status == 204)
    }

    /// Fetch the first page of a list resource
    pub async fn page<T: DeserializeOwned>(
        &self,
        uri: &str,
        params: &[(String, String)],
        limit: PageLimit,
    ) -> Result<Page<T>> {
        self.fetcher()
            .first_page(&self.absolute_url(uri), params, limit)
            .await
    }

    /// Fetch a page by URL, e.g. a cursor kept from an earlier response
    ///
    /// Cursors are host-relative (`/2010-04-01/...`), so a relative `url`
    /// is joined onto the domain, not onto this version.
    pub async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        self.fetcher()
            .fetch_page(&self.domain.absolute_url(url))
            .await
    }

    /// Lazily stream records of a list resource across pages
    pub fn stream<T>(
        &self,
        uri: &str,
        params: &[(String, String)],
        limit: PageLimit,
    ) -> RecordStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.fetcher()
            .stream_with_params(&self.absolute_url(uri), params, limit)
    }

    /// Read records of a list resource into memory
    pub async fn list<T>(
        &self,
        uri: &str,
        params: &[(String, String)],
        limit: PageLimit,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.stream(uri, params, limit).collect_records().await
    }
}
