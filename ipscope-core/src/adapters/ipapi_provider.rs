//! ipapi.co geolocation provider.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::HttpUtils;
use crate::traits::GeoProvider;
use crate::types::RawGeoRecord;

/// Client for the ipapi.co JSON API (or any server speaking the same shape).
///
/// `GET {base}/{ip}/json/` looks up an address, `GET {base}/json/` the caller.
#[derive(Debug, Clone)]
pub struct IpApiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl IpApiProvider {
    pub const ID: &'static str = "ipapi";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, address: Option<&str>) -> String {
        match address {
            Some(ip) => format!("{}/{}/json/", self.base_url, urlencoding::encode(ip)),
            None => format!("{}/json/", self.base_url),
        }
    }
}

#[async_trait]
impl GeoProvider for IpApiProvider {
    fn id(&self) -> &'static str {
        Self::ID
    }

    async fn lookup(&self, address: Option<&str>) -> Result<RawGeoRecord, TransportError> {
        let url = self.url(address);
        let response = HttpUtils::execute_request(self.client.get(&url), Self::ID, &url).await?;
        let record: RawGeoRecord = HttpUtils::parse_json(&response, Self::ID)?;

        if record.error {
            log::debug!(
                "[{}] Lookup rejected: {}",
                Self::ID,
                record.reason.as_deref().unwrap_or("no reason given")
            );
        }
        Ok(record)
    }
}
