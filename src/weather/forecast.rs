//! Open-Meteo forecast client.
//!
//! One request per cycle: current conditions, 24 hourly points and one day
//! of daily aggregates, with the timezone resolved by the provider.

use super::codes::describe;
use super::types::{ForecastReport, HourlySample, HourlySeries, WeatherError, WeatherSnapshot};
use crate::location::Coordinates;
use serde::Deserialize;

pub const DEFAULT_FORECAST_BASE: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,pressure_msl,precipitation";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation,precipitation_probability";
const DAILY_FIELDS: &str = "precipitation_sum,precipitation_probability_max";

const KMH_PER_MS: f64 = 3.6;

/// Anything that can produce a forecast for a coordinate.
///
/// Calls block; the dashboard runs them on the blocking pool.
pub trait ForecastSource: Send + Sync {
    fn fetch(&self, coords: Coordinates) -> Result<ForecastReport, WeatherError>;
}

/// Build the single forecast request URL.
pub fn forecast_url(base: &str, coords: Coordinates) -> String {
    format!(
        "{}?latitude={}&longitude={}&current={}&hourly={}&daily={}&forecast_days=1&timezone=auto",
        base, coords.latitude, coords.longitude, CURRENT_FIELDS, HOURLY_FIELDS, DAILY_FIELDS,
    )
}

// ─── Provider payload ───────────────────────────────────────────

#[derive(Deserialize)]
struct OmResponse {
    current: OmCurrent,
    #[serde(default)]
    hourly: Option<OmHourly>,
    #[serde(default)]
    daily: Option<OmDaily>,
    #[serde(default)]
    timezone: Option<String>,
}

#[derive(Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: Option<f64>,
    weather_code: i32,
    wind_speed_10m: f64,
    pressure_msl: f64,
    precipitation: Option<f64>,
}

type Column = Option<Vec<Option<f64>>>;

#[derive(Deserialize, Default)]
struct OmHourly {
    #[serde(default)]
    temperature_2m: Column,
    #[serde(default)]
    relative_humidity_2m: Column,
    #[serde(default)]
    precipitation: Column,
    #[serde(default)]
    precipitation_probability: Column,
}

#[derive(Deserialize, Default)]
struct OmDaily {
    #[serde(default)]
    precipitation_sum: Column,
    #[serde(default)]
    precipitation_probability_max: Column,
}

/// Value at `i`, or 0 when the column, the index or the value is absent.
fn at(column: &Column, i: usize) -> f64 {
    column
        .as_ref()
        .and_then(|v| v.get(i).copied().flatten())
        .unwrap_or(0.0)
}

/// Parse a forecast payload into the dashboard's shapes.
pub fn parse_forecast(body: &str) -> Result<ForecastReport, WeatherError> {
    let raw: OmResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    Ok(build_report(raw))
}

fn build_report(raw: OmResponse) -> ForecastReport {
    let c = raw.current;
    let daily = raw.daily.unwrap_or_default();
    let hourly = raw.hourly.unwrap_or_default();

    let snapshot = WeatherSnapshot {
        temperature: c.temperature_2m,
        apparent_temperature: c.apparent_temperature.unwrap_or(c.temperature_2m),
        humidity: c.relative_humidity_2m,
        pressure: c.pressure_msl,
        wind_speed: c.wind_speed_10m / KMH_PER_MS,
        precipitation: c.precipitation.unwrap_or(0.0),
        weather_code: c.weather_code,
        description: describe(c.weather_code).label.to_string(),
        daily_precipitation_sum: at(&daily.precipitation_sum, 0),
        daily_precipitation_probability: at(&daily.precipitation_probability_max, 0),
    };

    let hourly = HourlySeries::from_fn(|h| {
        let i = h as usize;
        HourlySample {
            hour: h,
            temperature: at(&hourly.temperature_2m, i),
            humidity: at(&hourly.relative_humidity_2m, i),
            rainfall: at(&hourly.precipitation, i),
            rain_probability: at(&hourly.precipitation_probability, i),
        }
    });

    ForecastReport {
        snapshot,
        hourly,
        timezone: raw.timezone.filter(|tz| !tz.is_empty()),
    }
}

// ─── HTTP client ────────────────────────────────────────────────

/// Open-Meteo over HTTP.
pub struct OpenMeteo {
    agent: ureq::Agent,
    base_url: String,
}

impl OpenMeteo {
    pub fn new(agent: ureq::Agent, base_url: impl Into<String>) -> Self {
        Self {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl ForecastSource for OpenMeteo {
    fn fetch(&self, coords: Coordinates) -> Result<ForecastReport, WeatherError> {
        let url = forecast_url(&self.base_url, coords);
        tracing::debug!(%url, "requesting forecast");

        let body = self
            .agent
            .get(&url)
            .call()?
            .into_string()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        parse_forecast(&body)
    }
}
