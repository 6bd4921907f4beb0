//! Service façade exposing the pipeline operations.

mod query;
mod self_location;

use std::sync::Arc;

use crate::adapters::{DohResolver, IpApiProvider};
use crate::config::LocatorConfig;
use crate::error::LocateResult;
use crate::normalize::normalize;
use crate::traits::{DeviceGeolocation, DnsResolver, GeoProvider};
use crate::types::{CanonicalRecord, RawGeoRecord};
use crate::watch::PositionWatch;

pub use self_location::GEOLOCATION_UNSUPPORTED;

/// Entry point for all lookups.
///
/// Holds no mutable state; every call is independent and the service can be
/// shared across tasks.
///
/// ```rust,no_run
/// use ipscope_core::{LocatorConfig, LocatorService};
/// # async fn demo() -> ipscope_core::LocateResult<()> {
/// let service = LocatorService::from_config(&LocatorConfig::default());
/// let record = service.lookup("8.8.8.8").await?;
/// println!("{} ({})", record.location, record.isp);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocatorService {
    geo: Arc<dyn GeoProvider>,
    dns: Arc<dyn DnsResolver>,
    device: Option<Arc<dyn DeviceGeolocation>>,
}

impl LocatorService {
    /// Create a service without a device geolocation capability.
    pub fn new(geo: Arc<dyn GeoProvider>, dns: Arc<dyn DnsResolver>) -> Self {
        Self {
            geo,
            dns,
            device: None,
        }
    }

    /// Build the HTTP adapters from `config`, sharing one client.
    pub fn from_config(config: &LocatorConfig) -> Self {
        let client = config.http_client();
        Self::new(
            Arc::new(IpApiProvider::with_client(
                client.clone(),
                config.geo_base_url.clone(),
            )),
            Arc::new(DohResolver::with_client(client, config.dns_base_url.clone())),
        )
    }

    /// Inject a device geolocation capability.
    #[must_use]
    pub fn with_device(mut self, device: Arc<dyn DeviceGeolocation>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Resolve an IP or domain query to the provider's record.
    pub async fn resolve_query(&self, raw_query: &str) -> LocateResult<RawGeoRecord> {
        query::resolve_query(self.geo.as_ref(), self.dns.as_ref(), raw_query).await
    }

    /// Locate the caller, preferring the device's own fix.
    pub async fn resolve_self(&self) -> LocateResult<RawGeoRecord> {
        self_location::resolve_self(self.geo.as_ref(), self.device.as_deref()).await
    }

    /// [`resolve_query`](Self::resolve_query) followed by normalization.
    pub async fn lookup(&self, raw_query: &str) -> LocateResult<CanonicalRecord> {
        self.resolve_query(raw_query).await.map(|raw| normalize(&raw))
    }

    /// [`resolve_self`](Self::resolve_self) followed by normalization.
    pub async fn locate_me(&self) -> LocateResult<CanonicalRecord> {
        self.resolve_self().await.map(|raw| normalize(&raw))
    }

    /// A watch owner over the device capability, or `None` without one.
    pub fn watch_position(&self) -> Option<PositionWatch> {
        self.device.clone().map(PositionWatch::new)
    }
}
