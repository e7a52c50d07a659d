//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both components rounded to 4 decimal places (~11 m).
    pub fn rounded(self) -> Self {
        let r = |v: f64| (v * 10_000.0).round() / 10_000.0;
        Self::new(r(self.latitude), r(self.longitude))
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// How the dashboard's coordinates were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpsStatus {
    Detecting,
    Accurate,
    Ip,
    Unavailable,
}

impl GpsStatus {
    /// Wire name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detecting => "detecting",
            Self::Accurate => "accurate",
            Self::Ip => "ip",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for GpsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detecting => write!(f, "Detecting"),
            Self::Accurate => write!(f, "GPS"),
            Self::Ip => write!(f, "IP"),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// A place name as a reverse geocoder reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub city: String,
    /// "Parent, Country" or just "Country".
    pub region: String,
}

/// The resolved place shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
    /// Original coordinates, rounded to 4 decimals.
    pub coordinates: Coordinates,
}

impl Location {
    pub fn from_place(place: Place, coords: Coordinates) -> Self {
        Self {
            city: place.city,
            region: place.region,
            coordinates: coords.rounded(),
        }
    }
}

/// Generic names used when geocoders have nothing better.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceDefaults {
    pub city: String,
    pub country: String,
    /// Language hint passed to the geocoders.
    pub language: String,
}

impl Default for PlaceDefaults {
    fn default() -> Self {
        Self {
            city: "Your location".into(),
            country: "Indonesia".into(),
            language: "id".into(),
        }
    }
}

/// A device-reported position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePosition {
    pub coordinates: Coordinates,
    /// Reported accuracy radius in metres, if the device gave one.
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
}

/// A single provider attempt failing. Never escapes a fallback chain.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error("Provider reported no usable result: {0}")]
    Unsuccessful(String),
}

impl From<ureq::Error> for LocationError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => Self::Network(format!("HTTP {}", code)),
            ureq::Error::Transport(t) => Self::Network(t.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_four_decimals() {
        let c = Coordinates::new(-7.795_649_9, 110.369_512_3).rounded();
        assert_eq!(c, Coordinates::new(-7.7956, 110.3695));
    }

    #[test]
    fn test_display_four_decimals() {
        assert_eq!(Coordinates::new(1.5, -2.0).to_string(), "1.5000, -2.0000");
    }

    #[test]
    fn test_validity() {
        assert!(Coordinates::new(-7.7956, 110.3695).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
    }

    #[test]
    fn test_gps_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GpsStatus::Ip).unwrap(), "\"ip\"");
        assert_eq!(serde_json::to_string(&GpsStatus::Accurate).unwrap(), "\"accurate\"");
        for status in [GpsStatus::Detecting, GpsStatus::Accurate, GpsStatus::Ip, GpsStatus::Unavailable] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
    }

    #[test]
    fn test_location_rounds_coordinates() {
        let loc = Location::from_place(
            Place { city: "Gondokusuman".into(), region: "Yogyakarta, Indonesia".into() },
            Coordinates::new(-7.782_345, 110.381_234),
        );
        assert_eq!(loc.coordinates, Coordinates::new(-7.7823, 110.3812));
    }
}
