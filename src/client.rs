//! Top-level client
//!
//! `Client` ties a `ClientConfig` to one shared `RequestSender` and hands
//! out `Domain`s and `Version`s routed through it.

use crate::config::ClientConfig;
use crate::domain::{Domain, Version};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestSender};
use crate::pagination::PageFetcher;
use std::sync::Arc;
use tracing::debug;

/// Placeholder for the account SID in account-scoped paths
pub const ACCOUNT_SID_PLACEHOLDER: &str = "{AccountSid}";

/// Entry point for API access
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    sender: Arc<dyn RequestSender>,
}

impl Client {
    /// Build a client with an authenticated `HttpClient`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let http = HttpClient::with_credentials(config.http_client_config(), credentials)?;
        debug!(
            "Client ready (region: {}, edge: {})",
            config.region.as_deref().unwrap_or("-"),
            config.edge.as_deref().unwrap_or("-")
        );
        Ok(Self::with_sender(config, Arc::new(http)))
    }

    /// Build a client over any sender
    pub fn with_sender(config: ClientConfig, sender: Arc<dyn RequestSender>) -> Self {
        Self { config, sender }
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Account SID from the configuration
    pub fn account_sid(&self) -> Option<&str> {
        self.config.account_sid.as_deref()
    }

    /// A named API host, with region/edge rewriting applied
    pub fn domain(&self, name: &str) -> Domain {
        Domain::regional(
            name,
            self.config.base_domain(),
            self.config.region.as_deref(),
            self.config.edge.as_deref(),
            self.sender(),
        )
    }

    /// A host at an explicit base URL, bypassing region/edge rewriting
    pub fn domain_at(&self, base_url: &str) -> Domain {
        Domain::new(base_url, self.sender())
    }

    /// Shorthand for `domain(name).version(version)`
    pub fn version(&self, domain: &str, version: &str) -> Version {
        self.domain(domain).version(version)
    }

    /// Fetcher for following cursors directly
    pub fn page_fetcher(&self) -> PageFetcher {
        PageFetcher::new(self.sender())
    }

    /// The shared sender
    pub fn sender(&self) -> Arc<dyn RequestSender> {
        Arc::clone(&self.sender)
    }

    /// Substitute the configured account SID into a path
    pub fn expand_account_sid(&self, uri: &str) -> Result<String> {
        if !uri.contains(ACCOUNT_SID_PLACEHOLDER) {
            return Ok(uri.to_string());
        }
        let sid = self
            .account_sid()
            .ok_or_else(|| Error::missing_field("account_sid"))?;
        Ok(uri.replace(ACCOUNT_SID_PLACEHOLDER, sid))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("account_sid", &self.config.account_sid)
            .field("region", &self.config.region)
            .field("edge", &self.config.edge)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageLimit;
    use crate::types::Record;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_requires_credentials() {
        let result = Client::new(ClientConfig::default());
        assert!(matches!(result, Err(Error::MissingConfigField { .. })));
    }

    #[test]
    fn test_domains_follow_region_and_edge() {
        let client = Client::new(ClientConfig::new("AC1", "token")).unwrap();
        assert_eq!(client.domain("api").base_url(), "https://api.twilio.com");

        let config = ClientConfig::new("AC1", "token")
            .with_region("ie1")
            .with_edge("dublin");
        let client = Client::new(config).unwrap();
        assert_eq!(
            client.version("messaging", "v1").absolute_url("/Services"),
            "https://messaging.dublin.ie1.twilio.com/v1/Services"
        );
    }

    #[test]
    fn test_expand_account_sid() {
        let client = Client::new(ClientConfig::new("AC123", "token")).unwrap();
        assert_eq!(
            client
                .expand_account_sid("/Accounts/{AccountSid}/Messages.json")
                .unwrap(),
            "/Accounts/AC123/Messages.json"
        );

        let keyless = Client::new(ClientConfig::default().with_api_key("SK1", "s")).unwrap();
        assert_eq!(keyless.expand_account_sid("/v1/Services").unwrap(), "/v1/Services");
        assert!(keyless.expand_account_sid("/Accounts/{AccountSid}").is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = Client::new(ClientConfig::new("AC1", "super-secret")).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("AC1"));
        assert!(!debug.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_list_signs_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(header("Authorization", "Basic QUMxMjM6c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{"sid": "SM1"}],
                "next_page_uri": null
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Client::new(ClientConfig::new("AC123", "secret")).unwrap();
        let version = client.domain_at(&mock_server.uri()).version("2010-04-01");
        let uri = client
            .expand_account_sid("/Accounts/{AccountSid}/Messages.json")
            .unwrap();

        let records: Vec<Record> = version
            .list(&uri, &[], PageLimit::unbounded())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }
}
