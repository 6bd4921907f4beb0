//! Capability traits for the external collaborators

mod device_geolocation;
mod dns_resolver;
mod geo_provider;

pub use device_geolocation::DeviceGeolocation;
pub use dns_resolver::DnsResolver;
pub use geo_provider::GeoProvider;
