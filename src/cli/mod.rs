//! CLI module
//!
//! Command-line interface over the client.
//!
//! # Commands
//!
//! - `list` - Stream records of a list resource as JSON lines
//! - `page` - Fetch one page by URL and print it with its cursor
//! - `fetch` - Fetch a single resource instance

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
