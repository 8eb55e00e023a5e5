// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # comms-rest
//!
//! Core of a REST client for a communications API: the HTTP transport,
//! domain/version URL routing, and cursor-based list pagination.
//!
//! ## Features
//!
//! - **Lazy Pagination**: Stream records across pages, honoring a total
//!   limit and a per-request page size
//! - **Both List Envelopes**: `meta`-keyed and flat list responses
//! - **Region/Edge Routing**: Host rewriting for regional deployments
//! - **Optional Retry**: Backoff on 429/5xx in the transport, off by default
//! - **Rate Limiting**: Client-side token bucket
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use comms_rest::{Client, ClientConfig, PageLimit, Record, Result};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new(ClientConfig::from_env())?;
//!     let api = client.version("api", "2010-04-01");
//!     let uri = client.expand_account_sid("/Accounts/{AccountSid}/Messages.json")?;
//!
//!     let mut messages = api.stream::<Record>(&uri, &[], PageLimit::limit(100));
//!     while let Some(message) = messages.next().await {
//!         println!("{}", message?["sid"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Client ─ domain(name) ─ Version                         │
//! │  fetch / create / update / delete / page / stream / list │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────────┬──────────────────┐
//! │     Auth     │     HTTP (sender)      │    Pagination    │
//! ├──────────────┼────────────────────────┼──────────────────┤
//! │ Basic        │ Retry (opt-in)         │ Page / PageLimit │
//! │ Bearer       │ Rate Limit             │ Envelope decode  │
//! │ Headers      │ Backoff                │ RecordStream     │
//! └──────────────┴────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request credentials
pub mod auth;

/// HTTP transport with optional retry and rate limiting
pub mod http;

/// Pages and lazy record streams
pub mod pagination;

/// Domain and version routing
pub mod domain;

/// Client configuration
pub mod config;

/// Top-level client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::Credentials;
pub use client::Client;
pub use config::ClientConfig;
pub use domain::{Domain, Version};
pub use http::{HttpClient, HttpClientConfig, Request, RequestSender, Response};
pub use pagination::{Page, PageFetcher, PageLimit, RecordStream};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
