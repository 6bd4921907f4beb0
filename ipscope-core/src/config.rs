//! Endpoint and client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the pipeline sends its HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Base URL of the ipapi-compatible geolocation provider.
    pub geo_base_url: String,
    /// DNS-over-HTTPS JSON endpoint.
    pub dns_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl LocatorConfig {
    pub const DEFAULT_GEO_BASE_URL: &'static str = "https://ipapi.co";
    pub const DEFAULT_DNS_BASE_URL: &'static str = "https://dns.google/resolve";

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the shared HTTP client for both adapters.
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .user_agent(self.user_agent.clone())
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build configured HTTP client, using defaults: {e}");
                reqwest::Client::new()
            })
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            geo_base_url: Self::DEFAULT_GEO_BASE_URL.to_string(),
            dns_base_url: Self::DEFAULT_DNS_BASE_URL.to_string(),
            request_timeout_secs: 15,
            user_agent: concat!("ipscope/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocatorConfig::default();
        assert_eq!(config.geo_base_url, "https://ipapi.co");
        assert_eq!(config.dns_base_url, "https://dns.google/resolve");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert!(config.user_agent.starts_with("ipscope/"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LocatorConfig =
            serde_json::from_str(r#"{ "geo_base_url": "http://localhost:8080" }"#).unwrap();
        assert_eq!(config.geo_base_url, "http://localhost:8080");
        assert_eq!(config.dns_base_url, LocatorConfig::DEFAULT_DNS_BASE_URL);
        assert_eq!(config.request_timeout_secs, 15);
    }
}
