//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::domain::Version;
use crate::error::{Error, Result};
use crate::pagination::{Page, PageLimit};
use crate::types::Record;
use futures::StreamExt;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = Client::new(self.load_config()?)?;

        match &self.cli.command {
            Commands::List {
                uri,
                limit,
                page_size,
                domain,
                api_version,
                params,
            } => {
                let version = self.version(&client, domain, api_version);
                let uri = client.expand_account_sid(uri)?;
                let limit = PageLimit::new(*limit, *page_size);
                self.list(&version, &uri, params, limit).await
            }
            Commands::Page { url } => self.page(&client, url).await,
            Commands::Fetch {
                uri,
                domain,
                api_version,
            } => {
                let version = self.version(&client, domain, api_version);
                let uri = client.expand_account_sid(uri)?;
                let record = version.fetch(&uri).await?;
                self.output_message(&Value::Object(record));
                Ok(())
            }
        }
    }

    /// Load configuration; the file wins, the environment fills gaps
    fn load_config(&self) -> Result<ClientConfig> {
        let env = ClientConfig::from_env();
        match &self.cli.config {
            Some(path) => {
                debug!("Loading client config from {}", path.display());
                Ok(ClientConfig::from_file(path)?.or(env))
            }
            None => Ok(env),
        }
    }

    /// Version on the regional host, or on `--base-url` when given
    fn version(&self, client: &Client, domain: &str, api_version: &str) -> Version {
        match &self.cli.base_url {
            Some(base_url) => client.domain_at(base_url).version(api_version),
            None => client.version(domain, api_version),
        }
    }

    /// Stream records, one output line each
    async fn list(
        &self,
        version: &Version,
        uri: &str,
        params: &[(String, String)],
        limit: PageLimit,
    ) -> Result<()> {
        let start = Instant::now();
        info!("Listing {}", version.absolute_url(uri));

        let mut records = version.stream::<Record>(uri, params, limit);
        let stats = records.stats();

        while let Some(record) = records.next().await {
            self.output_message(&Value::Object(record?));
        }

        info!(
            "Listed {} records from {} pages in {:.2}s",
            stats.records_yielded(),
            stats.pages_fetched(),
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Fetch one page and print it with its cursor
    async fn page(&self, client: &Client, url: &str) -> Result<()> {
        if !crate::domain::is_absolute(url) {
            return Err(Error::config(format!(
                "Page URL must be absolute, got '{url}'"
            )));
        }

        let fetcher = match &self.cli.base_url {
            Some(base_url) => client.domain_at(base_url).page_fetcher(),
            None => client.page_fetcher(),
        };
        let page: Page<Record> = fetcher.fetch_page(url).await?;
        let next_page_url = page.next_page_url().map(ToString::to_string);
        let key = page.meta().key.clone();

        self.output_message(&json!({
            "key": key,
            "records": page.into_records(),
            "next_page_url": next_page_url,
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
