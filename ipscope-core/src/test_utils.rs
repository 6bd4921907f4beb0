//! Test helpers
//!
//! Mock implementations of the capability traits that record how they were called.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::TransportError;
use crate::traits::{DeviceGeolocation, DnsResolver, GeoProvider};
use crate::types::{DeviceError, DeviceFix, DnsAnswer, PositionOptions, RawGeoRecord};
use crate::watch::WatchSubscription;

/// Ordered log of calls shared between mocks.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub fn transport_error() -> TransportError {
    TransportError::Network {
        service: "mock".to_string(),
        detail: "connection refused".to_string(),
    }
}

/// Provider response for `ip`.
pub fn geo_record(ip: &str) -> RawGeoRecord {
    serde_json::from_value(json!({
        "ip": ip,
        "city": "Mountain View",
        "region": "California",
        "country_name": "United States",
        "postal": "94043",
        "latitude": 37.42,
        "longitude": -122.08,
        "timezone": "America/Los_Angeles",
        "org": "ExampleISP"
    }))
    .unwrap()
}

/// Provider response reporting an in-band error.
pub fn geo_error_record(ip: &str) -> RawGeoRecord {
    RawGeoRecord {
        ip: Some(ip.to_string()),
        error: true,
        reason: Some("Invalid IP Address".to_string()),
        ..Default::default()
    }
}

// ===== MockGeoProvider =====

pub struct MockGeoProvider {
    /// Keyed by address; `None` is the self lookup.
    responses: Mutex<HashMap<Option<String>, Result<RawGeoRecord, TransportError>>>,
    calls: Mutex<Vec<Option<String>>>,
    log: CallLog,
}

impl MockGeoProvider {
    pub fn new() -> Self {
        Self::with_log(CallLog::default())
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            log,
        }
    }

    #[must_use]
    pub fn respond(self, address: Option<&str>, result: Result<RawGeoRecord, TransportError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(address.map(str::to_string), result);
        self
    }

    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeoProvider for MockGeoProvider {
    fn id(&self) -> &'static str {
        "mock-geo"
    }

    async fn lookup(&self, address: Option<&str>) -> Result<RawGeoRecord, TransportError> {
        let key = address.map(str::to_string);
        self.calls.lock().unwrap().push(key.clone());
        self.log
            .push(format!("geo:{}", address.unwrap_or("self")));
        self.responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(geo_error_record(address.unwrap_or_default())))
    }
}

// ===== MockDnsResolver =====

pub struct MockDnsResolver {
    answers: Mutex<HashMap<String, Result<Vec<DnsAnswer>, TransportError>>>,
    calls: Mutex<Vec<String>>,
    log: CallLog,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self::with_log(CallLog::default())
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            log,
        }
    }

    #[must_use]
    pub fn respond(self, domain: &str, result: Result<Vec<DnsAnswer>, TransportError>) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(domain.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn a_record(data: &str) -> DnsAnswer {
    DnsAnswer {
        name: None,
        record_type: Some(DnsAnswer::TYPE_A),
        ttl: Some(300),
        data: data.to_string(),
    }
}

pub fn cname_record(data: &str) -> DnsAnswer {
    DnsAnswer {
        name: None,
        record_type: Some(DnsAnswer::TYPE_CNAME),
        ttl: Some(300),
        data: data.to_string(),
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    fn id(&self) -> &'static str {
        "mock-dns"
    }

    async fn resolve(&self, domain: &str) -> Result<Vec<DnsAnswer>, TransportError> {
        self.calls.lock().unwrap().push(domain.to_string());
        self.log.push(format!("dns:{domain}"));
        self.answers
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ===== MockDevice =====

pub struct MockDevice {
    outcome: Result<DeviceFix, DeviceError>,
    delay: Option<Duration>,
    get_count: AtomicUsize,
    watch_count: AtomicUsize,
    last_options: Mutex<Option<PositionOptions>>,
    log: CallLog,
}

impl MockDevice {
    fn build(outcome: Result<DeviceFix, DeviceError>) -> Self {
        Self {
            outcome,
            delay: None,
            get_count: AtomicUsize::new(0),
            watch_count: AtomicUsize::new(0),
            last_options: Mutex::new(None),
            log: CallLog::default(),
        }
    }

    pub fn with_fix(fix: DeviceFix) -> Self {
        Self::build(Ok(fix))
    }

    pub fn failing(code: u16) -> Self {
        Self::build(Err(DeviceError::new(code)))
    }

    /// Answer only after `delay`.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn logging_to(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn watch_count(&self) -> usize {
        self.watch_count.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<PositionOptions> {
        *self.last_options.lock().unwrap()
    }
}

#[async_trait]
impl DeviceGeolocation for MockDevice {
    async fn get_once(&self, options: &PositionOptions) -> Result<DeviceFix, DeviceError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(*options);
        self.log.push("device");
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }

    fn watch(&self, options: &PositionOptions) -> WatchSubscription {
        self.watch_count.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(*options);
        let outcome = self.outcome.clone();
        WatchSubscription::spawn(move |tx| async move {
            loop {
                if tx.send(outcome.clone()).await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
    }
}
