//! Geolocation pipeline for ipscope
//!
//! Looks up where an IP address or domain lives: classifies the query, resolves
//! domains through DNS-over-HTTPS, asks an IP geolocation provider, and folds every
//! response shape into one [`CanonicalRecord`]. A self-location path prefers the
//! device's own position and falls back to IP inference when it is unavailable.
//!
//! External services are reached through the traits in [`traits`] so hosts can
//! inject their own adapters (or fakes in tests).

pub mod adapters;
mod classify;
mod config;
mod error;
mod geo;
mod http;
mod normalize;
pub mod services;
pub mod traits;
mod types;
mod watch;

#[cfg(test)]
mod test_utils;

pub use classify::{classify, is_valid_ip};
pub use config::LocatorConfig;
pub use error::{LocateError, LocateResult, TransportError};
pub use geo::{accuracy_info, distance_km, format_coordinates};
pub use normalize::normalize;
pub use services::LocatorService;
pub use types::{
    AccuracyInfo, AccuracyLevel, CanonicalRecord, DeviceError, DeviceErrorCode, DeviceFix,
    DnsAnswer, FormattedCoordinates, MapMarker, PositionOptions, QueryKind, RawGeoRecord,
    PLACEHOLDER,
};
pub use watch::{PositionWatch, WatchSubscription, WatchUpdate};
