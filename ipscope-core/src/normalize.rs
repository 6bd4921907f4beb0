//! Raw record → canonical record.

use crate::types::{CanonicalRecord, RawGeoRecord, PLACEHOLDER};

/// Fold any provider or orchestrator record into a [`CanonicalRecord`].
///
/// Pure and total: absent, empty or malformed fields take their defaults.
pub fn normalize(raw: &RawGeoRecord) -> CanonicalRecord {
    let position = raw.latitude.zip(raw.longitude);

    CanonicalRecord {
        ip: text_or_placeholder(raw.ip.as_deref()),
        location: position.map_or_else(
            || PLACEHOLDER.to_string(),
            |(lat, lng)| format!("{lat:.6}, {lng:.6}"),
        ),
        isp: text_or_placeholder(present(raw.org.as_deref()).or(raw.isp.as_deref())),
        country: text_or_placeholder(raw.country_name.as_deref()),
        city: text_or_placeholder(raw.city.as_deref()),
        timezone: text_or_placeholder(raw.timezone.as_deref()),
        region: text_or_placeholder(raw.region.as_deref()),
        postal: text_or_placeholder(raw.postal.as_deref()),
        latitude: raw.latitude.unwrap_or(0.0),
        longitude: raw.longitude.unwrap_or(0.0),
        domain: present(raw.domain.as_deref()).map(str::to_string),
        resolved_ip: present(raw.resolved_ip.as_deref()).map(str::to_string),
        user_location: raw.user_location.unwrap_or(false),
        accuracy: raw.accuracy,
        location_error: present(raw.location_error.as_deref()).map(str::to_string),
    }
}

/// Empty strings count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn text_or_placeholder(value: Option<&str>) -> String {
    present(value).unwrap_or(PLACEHOLDER).to_string()
}
