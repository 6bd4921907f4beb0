//! Configuration file loading and command-line overrides.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ipscope_core::adapters::StaticDevice;
use ipscope_core::traits::DeviceGeolocation;
use ipscope_core::LocatorConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Accuracy assumed for a configured position without one.
const DEFAULT_ACCURACY_METERS: f64 = 50.0;

/// Stand-in for the device geolocation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DeviceConfig {
    /// Always report this position.
    Fixed {
        latitude: f64,
        longitude: f64,
        #[serde(default = "default_accuracy")]
        accuracy: f64,
    },
    /// Always fail with this reason code.
    Failing { code: u16 },
}

fn default_accuracy() -> f64 {
    DEFAULT_ACCURACY_METERS
}

impl DeviceConfig {
    pub fn build(&self) -> Arc<dyn DeviceGeolocation> {
        match *self {
            Self::Fixed {
                latitude,
                longitude,
                accuracy,
            } => Arc::new(StaticDevice::fix(latitude, longitude, accuracy)),
            Self::Failing { code } => Arc::new(StaticDevice::failing(code)),
        }
    }
}

/// Parse `LAT,LON[,ACCURACY]`.
pub fn parse_position(value: &str) -> Result<DeviceConfig, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let number = |s: &str, what: &str| -> Result<f64, String> {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid {what}: {s}"))
    };

    let (latitude, longitude, accuracy) = match parts.as_slice() {
        [lat, lon] => (
            number(lat, "latitude")?,
            number(lon, "longitude")?,
            DEFAULT_ACCURACY_METERS,
        ),
        [lat, lon, acc] => (
            number(lat, "latitude")?,
            number(lon, "longitude")?,
            number(acc, "accuracy")?,
        ),
        _ => return Err("expected LAT,LON or LAT,LON,ACCURACY".to_string()),
    };

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude out of range: {latitude}"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude out of range: {longitude}"));
    }

    Ok(DeviceConfig::Fixed {
        latitude,
        longitude,
        accuracy,
    })
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub locator: LocatorConfig,
    pub device: Option<DeviceConfig>,
}

/// Default configuration file path.
fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ipscope")
        .join("config.json")
}

impl AppConfig {
    /// Load from `path`, or from the default location when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_file(), false),
        };

        if !path.exists() {
            if required {
                bail!("Config file not found: {}", path.display());
            }
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Command-line flags and environment variables win over the file.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.geo_url {
            self.locator.geo_base_url.clone_from(url);
        }
        if let Some(url) = &cli.dns_url {
            self.locator.dns_base_url.clone_from(url);
        }
        if let Some(secs) = cli.timeout {
            self.locator.request_timeout_secs = secs;
        }
        if let Some(position) = &cli.position {
            self.device = Some(position.clone());
        }
        if let Some(code) = cli.device_error {
            self.device = Some(DeviceConfig::Failing { code });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_parse_position() {
        assert_eq!(
            parse_position("-23.55, -46.63").unwrap(),
            DeviceConfig::Fixed {
                latitude: -23.55,
                longitude: -46.63,
                accuracy: DEFAULT_ACCURACY_METERS
            }
        );
        assert_eq!(
            parse_position("1,2,3").unwrap(),
            DeviceConfig::Fixed {
                latitude: 1.0,
                longitude: 2.0,
                accuracy: 3.0
            }
        );
        assert!(parse_position("1").is_err());
        assert!(parse_position("north,2").is_err());
        assert!(parse_position("91,0").is_err());
        assert!(parse_position("0,181").is_err());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "geo_base_url": "http://geo.local",
                "request_timeout_secs": 3,
                "device": {{ "mode": "fixed", "latitude": 10.5, "longitude": 20.5 }}
            }}"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.locator.geo_base_url, "http://geo.local");
        assert_eq!(
            config.locator.dns_base_url,
            LocatorConfig::DEFAULT_DNS_BASE_URL
        );
        assert_eq!(config.locator.request_timeout_secs, 3);
        assert_eq!(
            config.device,
            Some(DeviceConfig::Fixed {
                latitude: 10.5,
                longitude: 20.5,
                accuracy: DEFAULT_ACCURACY_METERS
            })
        );
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "ipscope",
            "--geo-url",
            "http://override.local",
            "--device-error",
            "1",
            "me",
        ]);
        let mut config = AppConfig {
            device: Some(DeviceConfig::Fixed {
                latitude: 0.0,
                longitude: 0.0,
                accuracy: 1.0,
            }),
            ..AppConfig::default()
        };
        config.apply_overrides(&cli);
        assert_eq!(config.locator.geo_base_url, "http://override.local");
        assert_eq!(config.device, Some(DeviceConfig::Failing { code: 1 }));
    }
}
