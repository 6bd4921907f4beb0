//! Coordinate helpers for presenting records.

use crate::types::{AccuracyInfo, AccuracyLevel, FormattedCoordinates};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers (haversine).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Render a coordinate pair with `precision` decimals.
pub fn format_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
    precision: usize,
) -> Option<FormattedCoordinates> {
    let (lat, lng) = latitude.zip(longitude)?;
    let latitude = format!("{lat:.precision$}");
    let longitude = format!("{lng:.precision$}");
    Some(FormattedCoordinates {
        formatted: format!("{latitude}, {longitude}"),
        latitude,
        longitude,
    })
}

/// Bucket a fix accuracy (meters) for display.
///
/// Returns `None` for absent, zero, negative or non-finite accuracies.
pub fn accuracy_info(accuracy: Option<f64>) -> Option<AccuracyInfo> {
    let meters = accuracy.filter(|m| m.is_finite() && *m > 0.0)?;

    let level = if meters < 10.0 {
        AccuracyLevel::Excellent
    } else if meters < 50.0 {
        AccuracyLevel::Good
    } else if meters < 100.0 {
        AccuracyLevel::Fair
    } else if meters < 1000.0 {
        AccuracyLevel::Poor
    } else {
        AccuracyLevel::VeryPoor
    };

    let formatted = if meters < 1000.0 {
        format!("{}m", meters.round())
    } else {
        format!("{:.1}km", meters / 1000.0)
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = meters.round() as u64;

    Some(AccuracyInfo {
        level,
        meters: rounded,
        formatted,
    })
}
