//! Refresh controller: first load, then silent background refreshes.
//!
//! First load:      geolocation → forecast → place name → commit → Ready
//! Silent refresh:  forecast only, on the stored coordinates
//!
//! Blocking provider calls run on the blocking pool. Timers hold only a
//! weak reference to the controller, so dropping it tears them down.

use super::state::{DashboardState, Phase, StateView};
use super::ticker::{next_dots, Ticker, CLOCK_PERIOD, LOADING_PERIOD};
use crate::config::Config;
use crate::location::{Coordinates, GeolocationResolver, Location, PlaceResolver};
use crate::weather::{ForecastReport, ForecastSource, OpenMeteo, WeatherError};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    pub refresh_interval: Duration,
    /// How long the "weather updated" toast stays up.
    pub changed_duration: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            changed_duration: Duration::from_secs(4),
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            changed_duration: config.changed_duration(),
        }
    }
}

/// What a silent refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated { changed: bool },
    /// Forecast failed; state untouched.
    Failed,
    /// Another refresh was already in flight.
    Skipped,
    /// First load has not succeeded.
    NotReady,
}

#[derive(Default)]
struct Timers {
    first_load: Option<JoinHandle<()>>,
    refresh: Option<Ticker>,
    clock: Option<Ticker>,
    loading: Option<Ticker>,
}

struct Inner {
    state: RwLock<DashboardState>,
    forecast: Arc<dyn ForecastSource>,
    places: Arc<PlaceResolver>,
    geolocation: Arc<GeolocationResolver>,
    settings: ControllerSettings,
    refreshing: AtomicBool,
    timers: Mutex<Timers>,
}

pub struct RefreshController {
    inner: Arc<Inner>,
}

/// Holds the in-flight flag; released on drop, including when the
/// refresh future is cancelled mid-fetch.
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        (!flag.swap(true, Ordering::AcqRel)).then_some(Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshController {
    pub fn new(
        forecast: Arc<dyn ForecastSource>,
        places: PlaceResolver,
        geolocation: GeolocationResolver,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(DashboardState::new(Utc::now())),
                forecast,
                places: Arc::new(places),
                geolocation: Arc::new(geolocation),
                settings,
                refreshing: AtomicBool::new(false),
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let forecast = OpenMeteo::new(config.http_agent(), &config.providers.forecast);
        Self::new(
            Arc::new(forecast),
            PlaceResolver::from_config(config),
            GeolocationResolver::from_config(config),
            ControllerSettings::from(config),
        )
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.read().clone()
    }

    pub fn view(&self) -> StateView {
        self.inner.state.read().view(Instant::now())
    }

    /// Install the clock and loading tickers and spawn the first load.
    /// Must be called inside a Tokio runtime.
    pub fn start(&self) {
        let mut timers = self.inner.timers.lock();
        timers.clock = Some(clock_ticker(Arc::downgrade(&self.inner)));
        timers.loading = Some(loading_ticker(Arc::downgrade(&self.inner)));

        let weak = Arc::downgrade(&self.inner);
        timers.first_load = Some(tokio::spawn(async move {
            let Some(inner) = weak.upgrade() else { return };
            let phase = inner.first_load().await;
            let mut timers = inner.timers.lock();
            timers.loading = None;
            if phase == Phase::Ready {
                timers.refresh = Some(refresh_ticker(&inner));
            }
        }));
    }

    /// Run the first-load pipeline to completion without timers.
    pub async fn first_load(&self) -> Phase {
        self.inner.first_load().await
    }

    pub async fn silent_refresh(&self) -> RefreshOutcome {
        self.inner.silent_refresh().await
    }

    /// Abort every owned timer and the pending first load.
    pub fn stop(&self) {
        let mut timers = self.inner.timers.lock();
        if let Some(task) = timers.first_load.take() {
            task.abort();
        }
        for ticker in [timers.refresh.take(), timers.clock.take(), timers.loading.take()]
            .into_iter()
            .flatten()
        {
            tracing::debug!(ticker = ticker.name(), "stopping ticker");
        }
    }

    #[cfg(test)]
    fn has_refresh_timer(&self) -> bool {
        self.inner.timers.lock().refresh.is_some()
    }

    #[cfg(test)]
    fn has_loading_timer(&self) -> bool {
        self.inner.timers.lock().loading.is_some()
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Inner {
    async fn first_load(&self) -> Phase {
        let position = self
            .geolocation
            .resolve(|status| self.state.write().set_gps_status(status))
            .await;
        self.state.write().coordinates = Some(position.coordinates);

        let report = match self.fetch(position.coordinates).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, coords = %position.coordinates, "first load failed");
                self.state.write().fail(e.to_string());
                return self.state.read().phase.clone();
            }
        };

        let location = self.name_place(position.coordinates).await;
        tracing::info!(
            city = %location.city,
            code = report.snapshot.weather_code,
            status = %position.status,
            "dashboard ready"
        );

        let mut state = self.state.write();
        state.commit_first_load(location, report, Utc::now());
        state.phase.clone()
    }

    async fn silent_refresh(&self) -> RefreshOutcome {
        let coords = {
            let state = self.state.read();
            match (&state.phase, state.coordinates) {
                (Phase::Ready, Some(coords)) => coords,
                _ => return RefreshOutcome::NotReady,
            }
        };

        let Some(guard) = RefreshGuard::acquire(&self.refreshing) else {
            tracing::debug!("refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };
        let result = self.fetch(coords).await;
        drop(guard);

        match result {
            Ok(report) => {
                let changed = self.state.write().apply_refresh(
                    report,
                    Utc::now(),
                    Instant::now(),
                    self.settings.changed_duration,
                );
                tracing::info!(changed, "silent refresh applied");
                RefreshOutcome::Updated { changed }
            }
            Err(e) => {
                tracing::warn!(error = %e, "silent refresh failed, keeping previous data");
                RefreshOutcome::Failed
            }
        }
    }

    async fn fetch(&self, coords: Coordinates) -> Result<ForecastReport, WeatherError> {
        let source = self.forecast.clone();
        tokio::task::spawn_blocking(move || source.fetch(coords))
            .await
            .unwrap_or_else(|e| Err(WeatherError::Network(format!("forecast task failed: {}", e))))
    }

    async fn name_place(&self, coords: Coordinates) -> Location {
        let places = self.places.clone();
        match tokio::task::spawn_blocking(move || places.resolve(coords)).await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!(error = %e, "reverse geocoding task failed");
                self.places.fallback(coords)
            }
        }
    }
}

fn clock_ticker(weak: Weak<Inner>) -> Ticker {
    Ticker::spawn("clock", CLOCK_PERIOD, move || {
        let inner = weak.upgrade();
        async move {
            match inner {
                Some(inner) => {
                    inner.state.write().now = Utc::now();
                    ControlFlow::Continue(())
                }
                None => ControlFlow::Break(()),
            }
        }
    })
}

fn loading_ticker(weak: Weak<Inner>) -> Ticker {
    Ticker::spawn("loading", LOADING_PERIOD, move || {
        let inner = weak.upgrade();
        async move {
            let Some(inner) = inner else {
                return ControlFlow::Break(());
            };
            let mut state = inner.state.write();
            if !state.is_loading() {
                return ControlFlow::Break(());
            }
            state.loading_dots = next_dots(state.loading_dots);
            ControlFlow::Continue(())
        }
    })
}

fn refresh_ticker(inner: &Arc<Inner>) -> Ticker {
    let weak = Arc::downgrade(inner);
    tracing::info!(every = ?inner.settings.refresh_interval, "refresh timer installed");
    Ticker::spawn("refresh", inner.settings.refresh_interval, move || {
        let inner = weak.upgrade();
        async move {
            let Some(inner) = inner else {
                return ControlFlow::Break(());
            };
            inner.silent_refresh().await;
            ControlFlow::Continue(())
        }
    })
}
