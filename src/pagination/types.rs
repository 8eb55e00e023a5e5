//! Pagination types
//!
//! `Page` is one decoded list response; `PageLimit` carries the caller's
//! total limit and per-request page size.

use crate::error::Result;
use crate::types::Record;
use serde::de::DeserializeOwned;
use url::Url;

/// Query parameter carrying the per-request page size
pub const PAGE_SIZE_PARAM: &str = "PageSize";

/// Largest page size the server accepts
///
/// Only used when deriving a page size from a limit; the server enforces it.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Total limit and per-request page size for a list operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLimit {
    /// Maximum records to yield across all pages (None = unbounded)
    pub limit: Option<u64>,
    /// Records requested per HTTP call (None = server default, commonly 50)
    pub page_size: Option<u32>,
}

impl PageLimit {
    /// Create a page limit
    pub fn new(limit: Option<u64>, page_size: Option<u32>) -> Self {
        Self { limit, page_size }
    }

    /// No limit, server-default page size
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Limit total records
    pub fn limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            page_size: None,
        }
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// True when the caller asked for zero records
    pub fn is_zero(&self) -> bool {
        self.limit == Some(0)
    }

    /// Page size to send on the first request, if any
    ///
    /// Clamped to the limit. When only a limit is given the page size is
    /// the limit, capped at `MAX_PAGE_SIZE`. A zero page size counts as unset.
    pub fn effective_page_size(&self) -> Option<u32> {
        let page_size = self.page_size.filter(|p| *p > 0);
        match (self.limit, page_size) {
            (Some(limit), Some(size)) => Some(limit.min(u64::from(size)) as u32),
            (Some(limit), None) => Some(limit.min(u64::from(MAX_PAGE_SIZE)) as u32),
            (None, size) => size,
        }
    }
}

/// Pagination metadata carried by a list envelope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// Name of the envelope key holding the records
    pub key: Option<String>,
    /// Zero-based page number
    pub page: Option<u64>,
    /// Page size the server applied
    pub page_size: Option<u64>,
    /// URL of this page
    pub url: Option<String>,
    /// URL of the first page
    pub first_page_url: Option<String>,
    /// URL of the previous page
    pub previous_page_url: Option<String>,
}

/// One page of a list response
///
/// Records keep server order. Pages are immutable once decoded.
#[derive(Debug, Clone)]
pub struct Page<T = Record> {
    records: Vec<T>,
    next_page_url: Option<String>,
    meta: PageMeta,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(records: Vec<T>, next_page_url: Option<String>, meta: PageMeta) -> Self {
        Self {
            records,
            next_page_url: next_page_url.filter(|u| !u.is_empty()),
            meta,
        }
    }

    /// Records on this page
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Consume the page, keeping only its records
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// Absolute URL of the next page, if the server sent one
    pub fn next_page_url(&self) -> Option<&str> {
        self.next_page_url.as_deref()
    }

    /// Whether a next page exists
    pub fn has_next_page(&self) -> bool {
        self.next_page_url.is_some()
    }

    /// Envelope metadata
    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the page has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split into records and cursor
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.records, self.next_page_url)
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Fetch the page after this one, or `None` when there is no cursor
    pub async fn next_page(&self, fetcher: &super::PageFetcher) -> Result<Option<Page<T>>> {
        match &self.next_page_url {
            Some(url) => fetcher.fetch_page(url).await.map(Some),
            None => Ok(None),
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Merge query parameters and a page size into a URL
///
/// Parameters replace any existing pair with the same key.
pub fn with_query(
    url: &str,
    params: &[(String, String)],
    page_size: Option<u32>,
) -> Result<String> {
    let mut parsed = Url::parse(url)?;

    let mut replacements: Vec<(String, String)> = params.to_vec();
    if let Some(size) = page_size {
        replacements.push((PAGE_SIZE_PARAM.to_string(), size.to_string()));
    }
    if replacements.is_empty() {
        return Ok(parsed.into());
    }

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !replacements.iter().any(|(r, _)| r == k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .extend_pairs(replacements);

    Ok(parsed.into())
}
