//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Pipeline error type
///
/// `Display` yields the message shown to the user; the detail of whatever
/// underlying failure caused it is only logged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum LocateError {
    /// Empty or blank query
    #[error("Please enter a valid IP or domain")]
    Validation,

    /// DNS answered with no address for the domain
    #[error("Domain could not be resolved")]
    DomainResolution,

    /// Provider rejected the address or has no data for it
    #[error("{0}")]
    LocationNotFound(String),

    /// Transport failure while resolving a query
    #[error("Connection error. Check your internet and try again.")]
    Connectivity,

    /// Provider reported an error during self-location
    #[error("Could not get IP information")]
    Provider,

    /// Self-location lookup could not be completed at all
    #[error("Error obtaining location information")]
    LocationUnavailable,
}

impl LocateError {
    /// Provider error for a domain query.
    pub fn domain_not_found() -> Self {
        Self::LocationNotFound("Location not found for this domain".to_string())
    }

    /// Provider error for an IP literal query.
    pub fn ip_not_found() -> Self {
        Self::LocationNotFound("IP not found or invalid".to_string())
    }
}

/// Pipeline Result type alias
pub type LocateResult<T> = std::result::Result<T, LocateError>;

/// Failure talking to one of the HTTP services.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code")]
pub enum TransportError {
    /// Connection refused, DNS failure of the service host, TLS failure, ...
    #[error("[{service}] Network error: {detail}")]
    Network { service: String, detail: String },

    /// Request timed out
    #[error("[{service}] Request timed out: {detail}")]
    Timeout { service: String, detail: String },

    /// HTTP 429 without a usable body
    #[error("[{service}] Rate limited (retry after {retry_after:?}s)")]
    RateLimited {
        service: String,
        retry_after: Option<u64>,
    },

    /// Unexpected HTTP status
    #[error("[{service}] Unexpected HTTP status {status}")]
    Status { service: String, status: u16 },

    /// Body could not be decoded
    #[error("[{service}] Failed to parse response: {detail}")]
    Parse { service: String, detail: String },
}
