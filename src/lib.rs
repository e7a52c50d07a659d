//! Cuaca.Live, a single-screen weather dashboard.
//!
//! Resolves where the user is (device fix, then IP geolocation, then a
//! fixed fallback), fetches current/hourly/daily weather from Open-Meteo,
//! names the place through reverse geocoding, and keeps the result fresh
//! with a silent background refresh. Rendering is server-side HTML plus a
//! terminal summary.

pub mod config;
pub mod dashboard;
pub mod location;
pub mod render;
pub mod server;
pub mod weather;

pub use config::Config;
pub use dashboard::{DashboardState, Phase, RefreshController};
pub use location::{Coordinates, GpsStatus, Location};
pub use weather::{HourlySeries, WeatherSnapshot};
