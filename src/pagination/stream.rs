//! Lazy record stream across pages
//!
//! Fetches the first page on first poll, yields its records one at a time,
//! and follows `next_page_url` until the limit is reached or the server
//! stops sending a cursor. No page is requested before the previous one has
//! been decoded. Dropping the stream stops further requests.

use super::fetcher::PageFetcher;
use super::types::PageLimit;
use crate::error::{Error, Result};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

/// Progress counters for a `RecordStream`
#[derive(Debug, Default)]
pub struct StreamStats {
    pages_fetched: AtomicU64,
    records_yielded: AtomicU64,
}

impl StreamStats {
    /// HTTP pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    /// Records handed to the consumer so far
    pub fn records_yielded(&self) -> u64 {
        self.records_yielded.load(Ordering::Relaxed)
    }
}

/// Where the next page comes from
enum Cursor {
    /// First request: start URL plus caller params and page size
    Start {
        url: String,
        params: Vec<(String, String)>,
    },
    /// Opaque URL from the previous page
    Next(String),
    /// No more pages
    Exhausted,
}

struct State<T> {
    fetcher: PageFetcher,
    cursor: Cursor,
    limit: PageLimit,
    buffer: VecDeque<T>,
    remaining: Option<u64>,
    stats: Arc<StreamStats>,
}

impl<T: DeserializeOwned> State<T> {
    /// Pull the next record, fetching pages as needed
    async fn next_record(&mut self) -> Result<Option<T>> {
        loop {
            if self.remaining == Some(0) {
                return Ok(None);
            }

            if let Some(record) = self.buffer.pop_front() {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                self.stats.records_yielded.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(record));
            }

            let page = match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
                Cursor::Start { url, params } => {
                    self.fetcher.first_page::<T>(&url, &params, self.limit).await?
                }
                Cursor::Next(url) => self.fetcher.fetch_page::<T>(&url).await?,
                Cursor::Exhausted => return Ok(None),
            };

            let pages = self.stats.pages_fetched.fetch_add(1, Ordering::Relaxed) + 1;
            let (records, next) = page.into_parts();
            debug!(
                "Page {pages}: {} records, {}",
                records.len(),
                if next.is_some() { "more pages" } else { "last page" }
            );

            self.buffer.extend(records);
            if let Some(url) = next {
                self.cursor = Cursor::Next(url);
            }
        }
    }
}

/// A lazily produced, finite sequence of records spanning many pages
///
/// Yields `Err` at most once, at the point of failure, and then ends.
/// Records already yielded stay valid. Not restartable.
pub struct RecordStream<T> {
    inner: BoxStream<'static, Result<T>>,
    stats: Arc<StreamStats>,
}

impl<T> RecordStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub(crate) fn new(
        fetcher: PageFetcher,
        start_url: String,
        params: Vec<(String, String)>,
        limit: PageLimit,
    ) -> Self {
        let stats = Arc::new(StreamStats::default());

        if limit.is_zero() {
            return Self {
                inner: stream::empty().boxed(),
                stats,
            };
        }

        let state = State {
            fetcher,
            cursor: Cursor::Start {
                url: start_url,
                params,
            },
            limit,
            buffer: VecDeque::new(),
            remaining: limit.limit,
            stats: Arc::clone(&stats),
        };

        let inner = stream::try_unfold(state, |mut state| async move {
            let record = state.next_record().await?;
            Ok::<_, Error>(record.map(|record| (record, state)))
        })
        .boxed();

        Self { inner, stats }
    }

    /// Shared progress counters
    pub fn stats(&self) -> Arc<StreamStats> {
        Arc::clone(&self.stats)
    }

    /// Collect all remaining records, failing on the first error
    pub async fn collect_records(self) -> Result<Vec<T>> {
        self.try_collect().await
    }
}

impl<T> Stream for RecordStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl<T> std::fmt::Debug for RecordStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
