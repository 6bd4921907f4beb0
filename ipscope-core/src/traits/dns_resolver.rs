//! Domain name resolution abstract Trait

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::DnsAnswer;

/// Address-record resolver Trait
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolver identifier (for logging)
    fn id(&self) -> &'static str;

    /// Resolve the address records of `domain`
    ///
    /// An unresolvable name is an empty answer list, not an error.
    async fn resolve(&self, domain: &str) -> Result<Vec<DnsAnswer>, TransportError>;
}
