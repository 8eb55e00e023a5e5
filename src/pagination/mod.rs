//! Pagination module
//!
//! Cursor-based list pagination over the API's list envelopes.
//!
//! # Overview
//!
//! - `PageFetcher` performs one request and decodes the envelope into a
//!   `Page` (records plus an optional next-page URL).
//! - `RecordStream` chains pages behind a lazy `Stream` of records that
//!   honors a total limit and a per-request page size (`PageLimit`).
//!
//! Cursors are opaque: a next-page URL is followed exactly as the server
//! sent it, never rebuilt by the client.

mod envelope;
mod fetcher;
mod stream;
mod types;

pub use envelope::{decode_page, decode_page_with_base};
pub use fetcher::PageFetcher;
pub use stream::{RecordStream, StreamStats};
pub use types::{with_query, Page, PageLimit, PageMeta, MAX_PAGE_SIZE, PAGE_SIZE_PARAM};
