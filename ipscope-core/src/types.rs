//! Public types flowing through the geolocation pipeline.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display value used for every absent text field of a [`CanonicalRecord`].
pub const PLACEHOLDER: &str = "-";

/// How a trimmed query is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryKind {
    /// Forwarded to the provider as-is; the provider validates it.
    IpLiteral,
    /// Resolved through DNS before the provider lookup.
    Domain,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IpLiteral => write!(f, "IP_LITERAL"),
            Self::Domain => write!(f, "DOMAIN"),
        }
    }
}

/// Provider response, optionally annotated by the orchestrators.
///
/// Every field is optional; fields with the wrong JSON type are read as absent
/// instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGeoRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,
    /// Organisation owning the address block.
    #[serde(default, deserialize_with = "lenient::string")]
    pub org: Option<String>,
    /// ISP name, used when `org` is missing.
    #[serde(default, deserialize_with = "lenient::string")]
    pub isp: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub country_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub postal: Option<String>,

    /// In-band error indicator set by the provider.
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub error: bool,
    /// Provider's explanation when `error` is set.
    #[serde(default, deserialize_with = "lenient::string")]
    pub reason: Option<String>,

    /// Original domain query (domain path only).
    #[serde(default, deserialize_with = "lenient::string")]
    pub domain: Option<String>,
    /// Address the domain resolved to (domain path only).
    #[serde(
        default,
        rename = "resolvedIP",
        deserialize_with = "lenient::string"
    )]
    pub resolved_ip: Option<String>,
    /// `Some(true)` only when coordinates came from the device.
    #[serde(
        default,
        rename = "userLocation",
        deserialize_with = "lenient::boolean"
    )]
    pub user_location: Option<bool>,
    /// Device fix accuracy in meters.
    #[serde(default, deserialize_with = "lenient::number")]
    pub accuracy: Option<f64>,
    /// Why device geolocation was not used.
    #[serde(
        default,
        rename = "locationError",
        deserialize_with = "lenient::string"
    )]
    pub location_error: Option<String>,
}

impl RawGeoRecord {
    /// Annotate a provider response with the domain query that produced it.
    #[must_use]
    pub fn with_domain(
        mut self,
        domain: impl Into<String>,
        resolved_ip: impl Into<String>,
    ) -> Self {
        self.domain = Some(domain.into());
        self.resolved_ip = Some(resolved_ip.into());
        self
    }

    /// Overwrite provider coordinates with a device fix.
    #[must_use]
    pub fn with_device_fix(mut self, fix: &DeviceFix) -> Self {
        self.latitude = Some(fix.latitude);
        self.longitude = Some(fix.longitude);
        self.accuracy = Some(fix.accuracy);
        self.user_location = Some(true);
        self
    }

    /// Mark the record as IP-derived, recording why the device was not used.
    #[must_use]
    pub fn with_fallback(mut self, location_error: impl Into<String>) -> Self {
        self.user_location = Some(false);
        self.location_error = Some(location_error.into());
        self
    }
}

/// Lets a canonical record re-enter the normalizer unchanged.
impl From<&CanonicalRecord> for RawGeoRecord {
    fn from(record: &CanonicalRecord) -> Self {
        fn text(value: &str) -> Option<String> {
            (value != PLACEHOLDER).then(|| value.to_string())
        }

        // A lone coordinate leaves `location` as the placeholder but is still data.
        let has_position = record.location != PLACEHOLDER;
        let coordinate = |value: f64| (has_position || value != 0.0).then_some(value);
        Self {
            ip: text(&record.ip),
            latitude: coordinate(record.latitude),
            longitude: coordinate(record.longitude),
            org: text(&record.isp),
            isp: None,
            country_name: text(&record.country),
            city: text(&record.city),
            timezone: text(&record.timezone),
            region: text(&record.region),
            postal: text(&record.postal),
            error: false,
            reason: None,
            domain: record.domain.clone(),
            resolved_ip: record.resolved_ip.clone(),
            user_location: Some(record.user_location),
            accuracy: record.accuracy,
            location_error: record.location_error.clone(),
        }
    }
}

/// Fully-defaulted, display-ready record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub ip: String,
    /// `"lat, lng"` with six decimals, or `"-"`.
    pub location: String,
    pub isp: String,
    pub country: String,
    pub city: String,
    pub timezone: String,
    pub region: String,
    pub postal: String,
    pub latitude: f64,
    pub longitude: f64,
    pub domain: Option<String>,
    #[serde(rename = "resolvedIP")]
    pub resolved_ip: Option<String>,
    #[serde(rename = "userLocation")]
    pub user_location: bool,
    pub accuracy: Option<f64>,
    #[serde(rename = "locationError")]
    pub location_error: Option<String>,
}

impl Default for CanonicalRecord {
    fn default() -> Self {
        Self {
            ip: PLACEHOLDER.to_string(),
            location: PLACEHOLDER.to_string(),
            isp: PLACEHOLDER.to_string(),
            country: PLACEHOLDER.to_string(),
            city: PLACEHOLDER.to_string(),
            timezone: PLACEHOLDER.to_string(),
            region: PLACEHOLDER.to_string(),
            postal: PLACEHOLDER.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            domain: None,
            resolved_ip: None,
            user_location: false,
            accuracy: None,
            location_error: None,
        }
    }
}

/// One answer entry of a DNS-over-HTTPS JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsAnswer {
    #[serde(default)]
    pub name: Option<String>,
    /// Numeric RR type (1 = A, 5 = CNAME, 28 = AAAA).
    #[serde(default, rename = "type")]
    pub record_type: Option<u16>,
    #[serde(default, rename = "TTL")]
    pub ttl: Option<u32>,
    pub data: String,
}

impl DnsAnswer {
    pub const TYPE_A: u16 = 1;
    pub const TYPE_CNAME: u16 = 5;
    pub const TYPE_AAAA: u16 = 28;

    /// Whether `data` holds an address rather than a name.
    ///
    /// Entries without a type are taken at face value.
    pub fn is_address(&self) -> bool {
        matches!(
            self.record_type,
            None | Some(Self::TYPE_A | Self::TYPE_AAAA)
        )
    }
}

/// A position reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in meters.
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
}

impl DeviceFix {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp: Utc::now(),
            heading: None,
            speed: None,
        }
    }
}

/// Reason code of a device geolocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum DeviceErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown(u16),
}

impl DeviceErrorCode {
    /// Human-readable explanation, as stored in `locationError`.
    pub fn message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission denied by the user",
            Self::PositionUnavailable => "Location unavailable",
            Self::Timeout => "Timed out obtaining location",
            Self::Unknown(_) => "Unknown error obtaining location",
        }
    }
}

impl From<u16> for DeviceErrorCode {
    fn from(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            other => Self::Unknown(other),
        }
    }
}

impl From<DeviceErrorCode> for u16 {
    fn from(code: DeviceErrorCode) -> Self {
        match code {
            DeviceErrorCode::PermissionDenied => 1,
            DeviceErrorCode::PositionUnavailable => 2,
            DeviceErrorCode::Timeout => 3,
            DeviceErrorCode::Unknown(other) => other,
        }
    }
}

/// Failure reported by the device geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceError {
    pub code: DeviceErrorCode,
}

impl DeviceError {
    pub fn new(code: impl Into<DeviceErrorCode>) -> Self {
        Self { code: code.into() }
    }

    pub fn message(&self) -> &'static str {
        self.code.message()
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message(), u16::from(self.code))
    }
}

impl std::error::Error for DeviceError {}

/// Options passed to the device geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Longest wait for a fix.
    pub timeout: Duration,
    /// Oldest cached fix that may be returned.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// Options for a single self-location attempt.
    pub const fn single_fix() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(5 * 60),
        }
    }

    /// Options for a continuous watch.
    pub const fn watch() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::single_fix()
    }
}

/// Coordinates rendered as fixed-precision strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedCoordinates {
    pub latitude: String,
    pub longitude: String,
    pub formatted: String,
}

/// Qualitative bucket for a device fix accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccuracyLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl AccuracyLevel {
    pub fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very poor",
        }
    }
}

/// Accuracy summary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyInfo {
    pub level: AccuracyLevel,
    /// Accuracy rounded to whole meters.
    pub meters: u64,
    /// `"42m"` or `"1.5km"`.
    pub formatted: String,
}

/// Input contract of the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    /// Popup lines: ip, then city and country when known.
    pub label: Vec<String>,
    /// Radius of the precision circle in meters, drawn only for device fixes.
    pub accuracy_radius: Option<f64>,
    pub user_location: bool,
    pub zoom: u8,
}

impl MapMarker {
    pub fn from_record(record: &CanonicalRecord) -> Self {
        let mut label = vec![record.ip.clone()];
        for part in [&record.city, &record.country] {
            if !part.is_empty() && part != PLACEHOLDER {
                label.push(part.clone());
            }
        }

        let zoom = match record.accuracy {
            Some(acc) if acc < 100.0 => 15,
            Some(acc) if acc < 1000.0 => 13,
            Some(acc) if acc < 5000.0 => 11,
            Some(_) => 9,
            None if record.user_location => 13,
            None => 10,
        };

        Self {
            latitude: record.latitude,
            longitude: record.longitude,
            label,
            accuracy_radius: record.accuracy.filter(|_| record.user_location),
            user_location: record.user_location,
            zoom,
        }
    }
}

/// Field deserializers that read wrongly-typed values as absent.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(value.filter(|v| v.is_finite()))
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Bool(b)) => Some(b),
            _ => None,
        })
    }

    /// Provider error flags may arrive as booleans, strings or objects.
    pub fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_) | Value::Object(_)) => true,
        })
    }
}
