//! DNS-over-HTTPS JSON resolver.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::TransportError;
use crate::http::HttpUtils;
use crate::traits::DnsResolver;
use crate::types::DnsAnswer;

/// Response structure of the DoH JSON API (dns.google, cloudflare-dns.com).
#[derive(Deserialize)]
struct DohResponse {
    #[serde(rename = "Status", default)]
    status: Option<u32>,
    #[serde(rename = "Answer", default)]
    answer: Vec<DnsAnswer>,
}

/// Resolves A records through a DNS-over-HTTPS JSON endpoint.
#[derive(Debug, Clone)]
pub struct DohResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl DohResolver {
    pub const ID: &'static str = "doh";

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl DnsResolver for DohResolver {
    fn id(&self) -> &'static str {
        Self::ID
    }

    async fn resolve(&self, domain: &str) -> Result<Vec<DnsAnswer>, TransportError> {
        let request = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .query(&[("name", domain), ("type", "A")]);

        let label = format!("{}?name={domain}", self.endpoint);
        let response = HttpUtils::execute_request(request, Self::ID, &label).await?;
        let parsed: DohResponse = HttpUtils::parse_json(&response, Self::ID)?;

        // Status 3 (NXDOMAIN) and friends simply come back without answers.
        if let Some(status) = parsed.status.filter(|s| *s != 0) {
            log::debug!("[{}] {domain}: DNS status {status}", Self::ID);
        }

        Ok(parsed.answer)
    }
}
