//! Continuous device position subscriptions.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::traits::DeviceGeolocation;
use crate::types::{DeviceError, DeviceFix, PositionOptions};

/// Buffered updates before a slow consumer applies backpressure.
const WATCH_CHANNEL_CAPACITY: usize = 16;

/// One update of a watch subscription.
pub type WatchUpdate = Result<DeviceFix, DeviceError>;

/// A running stream of device updates.
///
/// Dropping the subscription aborts its producer task.
pub struct WatchSubscription {
    updates: mpsc::Receiver<WatchUpdate>,
    producer: Option<JoinHandle<()>>,
}

impl WatchSubscription {
    /// Spawn `producer` on the current runtime, handing it the sending half.
    ///
    /// The producer should return once `send` fails (subscriber gone).
    pub fn spawn<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(mpsc::Sender<WatchUpdate>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let handle = tokio::spawn(producer(tx));
        Self {
            updates: rx,
            producer: Some(handle),
        }
    }

    /// Wrap a receiver fed by something the subscription does not own.
    pub fn from_receiver(updates: mpsc::Receiver<WatchUpdate>) -> Self {
        Self {
            updates,
            producer: None,
        }
    }

    /// Next update, or `None` once the subscription has ended.
    pub async fn next_update(&mut self) -> Option<WatchUpdate> {
        self.updates.recv().await
    }

    /// Stop receiving updates.
    pub fn stop(&mut self) {
        self.updates.close();
        if let Some(handle) = self.producer.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        !self.updates.is_closed()
            && self
                .producer
                .as_ref()
                .is_none_or(|handle| !handle.is_finished())
    }
}

impl Stream for WatchSubscription {
    type Item = WatchUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.updates.poll_recv(cx)
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for WatchSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Owner slot for at most one watch subscription.
///
/// Starting a new watch replaces the previous one; dropping the owner tears the
/// subscription down.
pub struct PositionWatch {
    device: Arc<dyn DeviceGeolocation>,
    options: PositionOptions,
    current: Option<WatchSubscription>,
}

impl PositionWatch {
    pub fn new(device: Arc<dyn DeviceGeolocation>) -> Self {
        Self::with_options(device, PositionOptions::watch())
    }

    pub fn with_options(device: Arc<dyn DeviceGeolocation>, options: PositionOptions) -> Self {
        Self {
            device,
            options,
            current: None,
        }
    }

    /// Start watching, replacing any running subscription.
    pub fn start(&mut self) -> &mut WatchSubscription {
        if let Some(mut previous) = self.current.take() {
            log::debug!("Replacing running position watch");
            previous.stop();
        }
        self.current.insert(self.device.watch(&self.options))
    }

    /// Tear down the running subscription, if any.
    pub fn stop(&mut self) {
        if let Some(mut subscription) = self.current.take() {
            subscription.stop();
        }
    }

    pub fn is_watching(&self) -> bool {
        self.current.as_ref().is_some_and(WatchSubscription::is_active)
    }

    /// The running subscription.
    pub fn subscription(&mut self) -> Option<&mut WatchSubscription> {
        self.current.as_mut()
    }
}
