//! The single piece of shared dashboard state.
//!
//! Written only by the refresh controller and its tickers; renderers and
//! the HTTP layer read clones.

use crate::location::{Coordinates, GpsStatus, Location};
use crate::weather::{ForecastReport, HourlySeries, WeatherSnapshot};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Where the first load stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
    /// First load could not fetch a forecast. Terminal.
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: Phase,
    pub gps_status: GpsStatus,
    pub location: Option<Location>,
    /// Captured once by the first load; every refresh reuses it.
    pub coordinates: Option<Coordinates>,
    pub snapshot: Option<WeatherSnapshot>,
    pub hourly: HourlySeries,
    /// IANA zone reported by the forecast provider.
    pub timezone: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub last_code: Option<i32>,
    /// The "weather updated" toast shows until this instant.
    pub changed_until: Option<Instant>,
    pub loading_dots: &'static str,
    /// Clock value, advanced by the 1 s ticker.
    pub now: DateTime<Utc>,
    /// Bumped on every change that alters the rendered page.
    pub revision: u64,
}

impl DashboardState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Loading,
            gps_status: GpsStatus::Detecting,
            location: None,
            coordinates: None,
            snapshot: None,
            hourly: HourlySeries::zeroed(),
            timezone: None,
            last_update: None,
            last_code: None,
            changed_until: None,
            loading_dots: "",
            now,
            revision: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn weather_changed(&self, at: Instant) -> bool {
        self.changed_until.is_some_and(|until| at < until)
    }

    pub fn set_gps_status(&mut self, status: GpsStatus) {
        if self.gps_status != status {
            self.gps_status = status;
            self.revision += 1;
        }
    }

    /// Commit the first successful load and enter `Ready`.
    pub fn commit_first_load(&mut self, location: Location, report: ForecastReport, at: DateTime<Utc>) {
        self.location = Some(location);
        self.store_report(report, at);
        self.phase = Phase::Ready;
        self.loading_dots = "";
        self.revision += 1;
    }

    /// First load failed; weather fields stay untouched.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.phase = Phase::Failed { reason: reason.into() };
        self.loading_dots = "";
        self.revision += 1;
    }

    /// Apply a silent refresh. Returns whether the weather code changed.
    pub fn apply_refresh(
        &mut self,
        report: ForecastReport,
        at: DateTime<Utc>,
        now: Instant,
        changed_for: Duration,
    ) -> bool {
        let changed = self
            .last_code
            .is_some_and(|prev| prev != report.snapshot.weather_code);
        if changed {
            self.changed_until = Some(now + changed_for);
        }
        self.store_report(report, at);
        self.revision += 1;
        changed
    }

    fn store_report(&mut self, report: ForecastReport, at: DateTime<Utc>) {
        self.last_code = Some(report.snapshot.weather_code);
        self.snapshot = Some(report.snapshot);
        self.hourly = report.hourly;
        if report.timezone.is_some() {
            self.timezone = report.timezone;
        }
        self.last_update = Some(at);
    }

    /// The forecast's zone, if it is a known IANA name.
    pub fn local_tz(&self) -> Option<Tz> {
        self.timezone.as_deref().and_then(|name| name.parse().ok())
    }

    /// Format `t` in the forecast's zone, or UTC when unknown.
    pub fn format_local(&self, t: DateTime<Utc>, fmt: &str) -> String {
        match self.local_tz() {
            Some(tz) => t.with_timezone(&tz).format(fmt).to_string(),
            None => t.format(fmt).to_string(),
        }
    }

    pub fn clock_label(&self) -> String {
        self.format_local(self.now, "%H:%M:%S")
    }

    pub fn date_label(&self) -> String {
        self.format_local(self.now, "%A, %-d %B %Y")
    }

    pub fn last_update_label(&self) -> Option<String> {
        self.last_update.map(|t| self.format_local(t, "%H:%M"))
    }

    pub fn view(&self, at: Instant) -> StateView {
        StateView {
            phase: self.phase.clone(),
            gps_status: self.gps_status,
            location: self.location.clone(),
            coordinates: self.coordinates,
            snapshot: self.snapshot.clone(),
            hourly: self.hourly.clone(),
            timezone: self.timezone.clone(),
            last_update: self.last_update_label(),
            weather_changed: self.weather_changed(at),
            loading_dots: self.loading_dots,
            clock: self.clock_label(),
            date: self.date_label(),
            revision: self.revision,
        }
    }
}

/// JSON view served at `/api/state` and printed by `cuaca once`.
#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    pub phase: Phase,
    pub gps_status: GpsStatus,
    pub location: Option<Location>,
    pub coordinates: Option<Coordinates>,
    pub snapshot: Option<WeatherSnapshot>,
    pub hourly: HourlySeries,
    pub timezone: Option<String>,
    pub last_update: Option<String>,
    pub weather_changed: bool,
    pub loading_dots: &'static str,
    pub clock: String,
    pub date: String,
    pub revision: u64,
}
