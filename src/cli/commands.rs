//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the communications REST API
#[derive(Parser, Debug)]
#[command(name = "comms-rest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON); `TWILIO_*` variables fill gaps
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Send every request to this base URL instead of the regional host
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream records of a list resource
    List {
        /// Resource path (e.g. /Accounts/{AccountSid}/Messages.json) or absolute URL
        uri: String,

        /// Maximum records to print
        #[arg(short, long)]
        limit: Option<u64>,

        /// Records per request
        #[arg(short, long)]
        page_size: Option<u32>,

        /// API domain name
        #[arg(short, long, default_value = "api")]
        domain: String,

        /// API version segment
        #[arg(long = "api-version", default_value = "2010-04-01")]
        api_version: String,

        /// Extra query parameter for the first request (KEY=VALUE)
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Fetch one page by its absolute URL
    Page {
        /// Page URL, e.g. a next_page_url from an earlier response
        url: String,
    },

    /// Fetch a single resource instance
    Fetch {
        /// Resource path or absolute URL
        uri: String,

        /// API domain name
        #[arg(short, long, default_value = "api")]
        domain: String,

        /// API version segment
        #[arg(long = "api-version", default_value = "2010-04-01")]
        api_version: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `KEY=VALUE` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
