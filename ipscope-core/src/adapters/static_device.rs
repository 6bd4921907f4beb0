//! Device capability backed by a fixed outcome.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::traits::DeviceGeolocation;
use crate::types::{DeviceError, DeviceFix, PositionOptions};
use crate::watch::WatchSubscription;

/// Stands in for a positioning capability on hosts without one.
///
/// Every request yields the same configured fix (re-stamped with the current
/// time) or the same failure.
#[derive(Debug, Clone)]
pub struct StaticDevice {
    outcome: Result<DeviceFix, DeviceError>,
    interval: Duration,
}

impl StaticDevice {
    const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn fix(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            outcome: Ok(DeviceFix::new(latitude, longitude, accuracy)),
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    pub fn failing(code: u16) -> Self {
        Self {
            outcome: Err(DeviceError::new(code)),
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    /// Delay between watch updates.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn current(&self) -> Result<DeviceFix, DeviceError> {
        self.outcome.clone().map(|fix| DeviceFix {
            timestamp: Utc::now(),
            ..fix
        })
    }
}

#[async_trait]
impl DeviceGeolocation for StaticDevice {
    async fn get_once(&self, _options: &PositionOptions) -> Result<DeviceFix, DeviceError> {
        self.current()
    }

    fn watch(&self, _options: &PositionOptions) -> WatchSubscription {
        let device = self.clone();
        WatchSubscription::spawn(move |tx| async move {
            loop {
                if tx.send(device.current()).await.is_err() {
                    break;
                }
                tokio::time::sleep(device.interval).await;
            }
        })
    }
}
