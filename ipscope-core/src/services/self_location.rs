//! Self-location: device fix first, IP inference as fallback.

use crate::error::{LocateError, LocateResult};
use crate::traits::{DeviceGeolocation, GeoProvider};
use crate::types::{DeviceError, DeviceErrorCode, PositionOptions, RawGeoRecord};

/// `locationError` when the host has no positioning capability.
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation not supported by this browser";

/// Locate the caller.
///
/// Device failures never fail the call: they are recorded in `locationError`
/// and the provider's IP-based answer is returned instead. The device attempt
/// always completes before any provider request starts.
pub(crate) async fn resolve_self(
    geo: &dyn GeoProvider,
    device: Option<&dyn DeviceGeolocation>,
) -> LocateResult<RawGeoRecord> {
    let Some(device) = device else {
        log::info!("No device geolocation available, using IP geolocation");
        return ip_fallback(geo, GEOLOCATION_UNSUPPORTED).await;
    };

    let options = PositionOptions::single_fix();
    let outcome = tokio::time::timeout(options.timeout, device.get_once(&options))
        .await
        .unwrap_or_else(|_| Err(DeviceError::new(DeviceErrorCode::Timeout)));

    match outcome {
        Ok(fix) => {
            let record = geo.lookup(None).await.map_err(|e| {
                log::warn!("[{}] Self lookup failed after device fix: {e}", geo.id());
                LocateError::LocationUnavailable
            })?;
            if record.error {
                return Err(LocateError::Provider);
            }
            Ok(record.with_device_fix(&fix))
        }
        Err(err) => {
            log::warn!("Device geolocation failed, falling back to IP: {err}");
            ip_fallback(geo, err.message()).await
        }
    }
}

async fn ip_fallback(geo: &dyn GeoProvider, location_error: &str) -> LocateResult<RawGeoRecord> {
    let record = geo.lookup(None).await.map_err(|e| {
        log::warn!("[{}] IP fallback lookup failed: {e}", geo.id());
        LocateError::LocationUnavailable
    })?;
    if record.error {
        return Err(LocateError::Provider);
    }
    Ok(record.with_fallback(location_error))
}
