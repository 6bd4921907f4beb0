//! Query resolution: IP literal or domain → provider record.

use crate::classify::classify;
use crate::error::{LocateError, LocateResult, TransportError};
use crate::traits::{DnsResolver, GeoProvider};
use crate::types::{DnsAnswer, QueryKind, RawGeoRecord};

/// Resolve a user query into a provider record.
///
/// At most one DNS request followed by one provider request; nothing is retried.
pub(crate) async fn resolve_query(
    geo: &dyn GeoProvider,
    dns: &dyn DnsResolver,
    raw_query: &str,
) -> LocateResult<RawGeoRecord> {
    let query = raw_query.trim();
    if query.is_empty() {
        return Err(LocateError::Validation);
    }

    match classify(query) {
        QueryKind::Domain => resolve_domain(geo, dns, query).await,
        QueryKind::IpLiteral => resolve_ip(geo, query).await,
    }
}

async fn resolve_domain(
    geo: &dyn GeoProvider,
    dns: &dyn DnsResolver,
    domain: &str,
) -> LocateResult<RawGeoRecord> {
    let answers = dns.resolve(domain).await.map_err(connectivity)?;

    let resolved_ip = answers
        .into_iter()
        .find(DnsAnswer::is_address)
        .map(|answer| answer.data)
        .ok_or(LocateError::DomainResolution)?;
    log::debug!("[{}] {domain} -> {resolved_ip}", dns.id());

    let record = geo
        .lookup(Some(&resolved_ip))
        .await
        .map_err(connectivity)?;
    if record.error {
        return Err(LocateError::domain_not_found());
    }

    Ok(record.with_domain(domain, resolved_ip))
}

async fn resolve_ip(geo: &dyn GeoProvider, ip: &str) -> LocateResult<RawGeoRecord> {
    let record = geo.lookup(Some(ip)).await.map_err(connectivity)?;
    if record.error {
        return Err(LocateError::ip_not_found());
    }
    Ok(record)
}

fn connectivity(err: TransportError) -> LocateError {
    log::warn!("Lookup failed at transport level: {err}");
    LocateError::Connectivity
}
