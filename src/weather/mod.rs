//! Weather data: WMO code descriptions and the Open-Meteo forecast client.

pub mod codes;
pub mod forecast;
pub mod types;

pub use codes::{describe, is_known, WeatherDescription};
pub use forecast::{forecast_url, parse_forecast, ForecastSource, OpenMeteo};
pub use types::{
    ForecastReport, HourlyMetric, HourlySample, HourlySeries, WeatherError, WeatherSnapshot, HOURS,
};
