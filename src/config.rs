//! Runtime configuration, read from `~/.cuaca/config.toml`.
//!
//! Every field has a default, so an empty or missing file is a valid
//! configuration. CLI flags are applied on top by the binary.

use crate::location::providers::{
    BIGDATACLOUD_URL, IPAPI_CO_URL, IPWHO_IS_URL, IP_API_COM_URL, NOMINATIM_URL,
};
use crate::location::resolver::FALLBACK_COORDINATES;
use crate::location::{Coordinates, PlaceDefaults};
use crate::weather::forecast::DEFAULT_FORECAST_BASE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Base URLs of every external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderUrls {
    pub forecast: String,
    pub bigdatacloud: String,
    pub nominatim: String,
    pub ipapi_co: String,
    pub ip_api_com: String,
    pub ipwho_is: String,
}

impl Default for ProviderUrls {
    fn default() -> Self {
        Self {
            forecast: DEFAULT_FORECAST_BASE.into(),
            bigdatacloud: BIGDATACLOUD_URL.into(),
            nominatim: NOMINATIM_URL.into(),
            ipapi_co: IPAPI_CO_URL.into(),
            ip_api_com: IP_API_COM_URL.into(),
            ipwho_is: IPWHO_IS_URL.into(),
        }
    }
}

/// A fixed device fix, standing in for positioning hardware.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProviderUrls,
    /// Language hint for reverse geocoding.
    pub language: String,
    pub fallback_city: String,
    pub fallback_country: String,
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
    pub refresh_secs: u64,
    pub changed_secs: u64,
    pub device_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub device_position: Option<DeviceFix>,
    /// `false` removes the positioning capability entirely.
    pub geolocation: bool,
}

impl Default for Config {
    fn default() -> Self {
        let place = PlaceDefaults::default();
        Self {
            providers: ProviderUrls::default(),
            language: place.language,
            fallback_city: place.city,
            fallback_country: place.country,
            fallback_latitude: FALLBACK_COORDINATES.latitude,
            fallback_longitude: FALLBACK_COORDINATES.longitude,
            refresh_secs: 300,
            changed_secs: 4,
            device_timeout_secs: 15,
            http_timeout_secs: 10,
            user_agent: concat!("cuaca-live/", env!("CARGO_PKG_VERSION")).into(),
            device_position: None,
            geolocation: true,
        }
    }
}

impl Config {
    /// Default config path: `~/.cuaca/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cuaca")
            .join("config.toml")
    }

    /// Load from an explicit path, or from the default path if it exists.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::default_path();
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn place_defaults(&self) -> PlaceDefaults {
        PlaceDefaults {
            city: self.fallback_city.clone(),
            country: self.fallback_country.clone(),
            language: self.language.clone(),
        }
    }

    pub fn fallback_coordinates(&self) -> Coordinates {
        Coordinates::new(self.fallback_latitude, self.fallback_longitude)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn changed_duration(&self) -> Duration {
        Duration::from_secs(self.changed_secs)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device_timeout_secs)
    }

    /// Shared HTTP agent for every provider.
    pub fn http_agent(&self) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(self.http_timeout_secs))
            .user_agent(&self.user_agent)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.refresh_interval(), Duration::from_secs(300));
        assert_eq!(c.changed_duration(), Duration::from_secs(4));
        assert_eq!(c.device_timeout(), Duration::from_secs(15));
        assert_eq!(c.fallback_coordinates(), Coordinates::new(-7.7956, 110.3695));
        assert_eq!(c.place_defaults(), PlaceDefaults::default());
        assert!(c.geolocation);
        assert!(c.device_position.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
refresh_secs = 60
fallback_city = "Lokasi Anda"

[providers]
forecast = "http://localhost:9000/v1/forecast"

[device_position]
latitude = -6.2
longitude = 106.8
"#
        )
        .unwrap();

        let c = Config::load(Some(file.path())).unwrap();
        assert_eq!(c.refresh_secs, 60);
        assert_eq!(c.fallback_city, "Lokasi Anda");
        assert_eq!(c.fallback_country, "Indonesia");
        assert_eq!(c.providers.forecast, "http://localhost:9000/v1/forecast");
        assert_eq!(c.providers.nominatim, NOMINATIM_URL);
        let fix = c.device_position.unwrap();
        assert_eq!(fix.latitude, -6.2);
        assert!(fix.accuracy_m.is_none());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh_secs = \"often\"").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_zero_refresh_is_clamped() {
        let c = Config { refresh_secs: 0, ..Config::default() };
        assert_eq!(c.refresh_interval(), Duration::from_secs(1));
    }
}
