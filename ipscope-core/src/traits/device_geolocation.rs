//! Device geolocation capability Trait

use async_trait::async_trait;

use crate::types::{DeviceError, DeviceFix, PositionOptions};
use crate::watch::WatchSubscription;

/// The host's own positioning capability (GPS, OS location service, ...).
///
/// Hosts without one inject nothing instead of an implementation that
/// always fails.
#[async_trait]
pub trait DeviceGeolocation: Send + Sync {
    /// Request a single fix.
    async fn get_once(&self, options: &PositionOptions) -> Result<DeviceFix, DeviceError>;

    /// Start a continuous subscription of fixes and failures.
    ///
    /// Updates stop when the returned subscription is stopped or dropped.
    fn watch(&self, options: &PositionOptions) -> WatchSubscription;
}
