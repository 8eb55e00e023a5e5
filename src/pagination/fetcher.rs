//! Single-page retrieval
//!
//! `PageFetcher` turns one list response into a `Page` and is the entry
//! point for lazily streaming records across pages.

use super::envelope::decode_page_with_base;
use super::stream::RecordStream;
use super::types::{with_query, Page, PageLimit};
use crate::error::Result;
use crate::http::{Request, RequestSender};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Fetches and decodes list pages through a `RequestSender`
///
/// Never retries; retry policy belongs to the sender.
#[derive(Clone)]
pub struct PageFetcher {
    sender: Arc<dyn RequestSender>,
    base_url: Option<String>,
}

impl PageFetcher {
    /// Create a fetcher over the given sender
    pub fn new(sender: Arc<dyn RequestSender>) -> Self {
        Self {
            sender,
            base_url: None,
        }
    }

    /// Resolve host-relative cursors against a domain base URL
    ///
    /// Needed when the base URL has a path prefix; without one, cursors
    /// resolve against the URL of the page that carried them.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Base URL used for host-relative cursors, if set
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// GET one page from a fully-qualified URL
    ///
    /// Non-2xx responses become `Error::Api`; bodies that are not a list
    /// envelope become `Error::Decode`.
    pub async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        let response = self
            .sender
            .send(Request::get(url))
            .await?
            .error_for_status()?;

        let page = decode_page_with_base(&response.body, url, self.base_url.as_deref())?;
        debug!(
            "Fetched page from {url}: {} records, next page: {}",
            page.len(),
            page.has_next_page()
        );
        Ok(page)
    }

    /// Fetch the first page of a list, applying params and the page size
    pub async fn first_page<T: DeserializeOwned>(
        &self,
        start_url: &str,
        params: &[(String, String)],
        limit: PageLimit,
    ) -> Result<Page<T>> {
        let url = with_query(start_url, params, limit.effective_page_size())?;
        self.fetch_page(&url).await
    }

    /// Lazily stream records starting at `start_url`
    pub fn stream<T>(&self, start_url: &str, limit: PageLimit) -> RecordStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.stream_with_params(start_url, &[], limit)
    }

    /// Lazily stream records, with extra query params on the first request
    pub fn stream_with_params<T>(
        &self,
        start_url: &str,
        params: &[(String, String)],
        limit: PageLimit,
    ) -> RecordStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        RecordStream::new(self.clone(), start_url.to_string(), params.to_vec(), limit)
    }

    /// Read every record up to the limit into memory
    pub async fn list<T>(&self, start_url: &str, limit: PageLimit) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.stream(start_url, limit).collect_records().await
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
