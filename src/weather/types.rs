//! Internal weather shapes the dashboard renders from.

use serde::{Deserialize, Serialize};

/// Number of hourly samples kept for the 24-hour charts.
pub const HOURS: usize = 24;

/// Current conditions plus today's precipitation aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature, °C.
    pub temperature: f64,
    /// Apparent ("feels like") temperature, °C.
    pub apparent_temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// Sea-level pressure, hPa.
    pub pressure: f64,
    /// Wind speed, m/s (provider reports km/h).
    pub wind_speed: f64,
    /// Precipitation in the current interval, mm.
    pub precipitation: f64,
    pub weather_code: i32,
    pub description: String,
    /// Today's precipitation sum, mm.
    pub daily_precipitation_sum: f64,
    /// Today's maximum precipitation probability, %.
    pub daily_precipitation_probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlySample {
    pub hour: u8,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub rain_probability: f64,
}

/// Which hourly value a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourlyMetric {
    Temperature,
    Humidity,
    Rainfall,
    RainProbability,
}

impl HourlyMetric {
    fn pick(self, s: &HourlySample) -> f64 {
        match self {
            Self::Temperature => s.temperature,
            Self::Humidity => s.humidity,
            Self::Rainfall => s.rainfall,
            Self::RainProbability => s.rain_probability,
        }
    }
}

/// Exactly [`HOURS`] samples, hour 0 first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    samples: Vec<HourlySample>,
}

impl HourlySeries {
    /// All-zero series, used before the first successful fetch.
    pub fn zeroed() -> Self {
        Self::from_fn(|hour| HourlySample {
            hour,
            ..HourlySample::default()
        })
    }

    /// Build the series by asking for each hour in turn.
    pub fn from_fn(mut sample: impl FnMut(u8) -> HourlySample) -> Self {
        let samples = (0..HOURS as u8).map(|h| HourlySample { hour: h, ..sample(h) }).collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[HourlySample] {
        &self.samples
    }

    pub fn values(&self, metric: HourlyMetric) -> Vec<f64> {
        self.samples.iter().map(|s| metric.pick(s)).collect()
    }
}

impl Default for HourlySeries {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Everything one forecast fetch produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub snapshot: WeatherSnapshot,
    pub hourly: HourlySeries,
    /// IANA zone the provider resolved for the coordinates.
    pub timezone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Forecast provider returned HTTP {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ureq::Error> for WeatherError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(t) => Self::Network(t.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_success_status_is_a_status_error() {
        let resp = ureq::Response::new(503, "Service Unavailable", "").unwrap();
        let err = WeatherError::from(ureq::Error::Status(503, resp));
        assert!(matches!(err, WeatherError::Status(503)));
    }

    #[test]
    fn test_transport_failure_is_a_network_error() {
        let err = ureq::get("http://127.0.0.1:1/").call().unwrap_err();
        assert!(matches!(WeatherError::from(err), WeatherError::Network(_)));
    }

    #[test]
    fn test_zeroed_series_has_24_hours() {
        let s = HourlySeries::zeroed();
        assert_eq!(s.samples().len(), HOURS);
        for (i, sample) in s.samples().iter().enumerate() {
            assert_eq!(sample.hour as usize, i);
            assert_eq!(sample.temperature, 0.0);
            assert_eq!(sample.rain_probability, 0.0);
        }
    }

    #[test]
    fn test_from_fn_forces_hour_index() {
        let s = HourlySeries::from_fn(|_| HourlySample {
            hour: 99,
            temperature: 20.0,
            ..HourlySample::default()
        });
        assert_eq!(s.samples()[5].hour, 5);
        assert_eq!(s.values(HourlyMetric::Temperature), vec![20.0; HOURS]);
    }
}
