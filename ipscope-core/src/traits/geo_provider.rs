//! IP geolocation provider abstract Trait

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::RawGeoRecord;

/// IP geolocation provider Trait
///
/// Provider-side rejections (invalid address, reserved range, quota) come back
/// in-band as `Ok` with [`RawGeoRecord::error`] set; `Err` means the provider
/// could not be reached or answered garbage.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Provider identifier (for logging)
    fn id(&self) -> &'static str;

    /// Look up an address
    ///
    /// # Arguments
    /// * `address` - IP literal to look up, or `None` to let the provider
    ///   geolocate the caller's own public address
    async fn lookup(&self, address: Option<&str>) -> Result<RawGeoRecord, TransportError>;
}
