//! Rendering canonical records for the terminal.

use std::fmt::Write as _;

use ipscope_core::{accuracy_info, CanonicalRecord, DeviceFix, MapMarker};

/// Multi-line human-readable view of a record.
pub fn render_record(record: &CanonicalRecord) -> String {
    let mut out = String::new();

    let source = if record.user_location {
        "device"
    } else {
        "IP address"
    };

    let mut line = |label: &str, value: &str| {
        let _ = writeln!(out, "{label:<12} {value}");
    };

    line("IP", &record.ip);
    if let Some(domain) = &record.domain {
        line("Domain", domain);
    }
    if let Some(resolved) = &record.resolved_ip {
        line("Resolved IP", resolved);
    }
    line("Location", &record.location);
    line("ISP", &record.isp);
    line("Country", &record.country);
    line("Region", &record.region);
    line("City", &record.city);
    line("Postal", &record.postal);
    line("Timezone", &record.timezone);
    line("Source", source);
    if let Some(info) = accuracy_info(record.accuracy) {
        line(
            "Accuracy",
            &format!("±{} ({})", info.formatted, info.level.description()),
        );
    }
    if let Some(error) = &record.location_error {
        line("Note", error);
    }

    let marker = MapMarker::from_record(record);
    line("Map", &format!("{} (zoom {})", marker.label.join(" / "), marker.zoom));

    out
}

/// One line per watch update.
pub fn render_fix(fix: &DeviceFix) -> String {
    let accuracy = accuracy_info(Some(fix.accuracy))
        .map_or_else(|| "-".to_string(), |info| format!("±{}", info.formatted));
    format!(
        "{} {:.6}, {:.6} {accuracy}",
        fix.timestamp.format("%H:%M:%S"),
        fix.latitude,
        fix.longitude
    )
}
