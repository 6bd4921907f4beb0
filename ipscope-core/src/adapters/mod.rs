//! Concrete implementations of the capability traits

mod doh_resolver;
mod ipapi_provider;
mod static_device;

pub use doh_resolver::DohResolver;
pub use ipapi_provider::IpApiProvider;
pub use static_device::StaticDevice;
