//! Location resolvers: the place-name and position fallback chains.
//!
//! Place flow:     BigDataCloud → Nominatim → generic placeholder
//! Position flow:  device fix → ipapi.co → ip-api.com → ipwho.is → fixed coordinate

use super::chain::{first_success, Provider};
use super::device::{DeviceLocator, FixedDevice, GeoCapability, NoFixDevice, PositionOptions};
use super::providers::{BigDataCloud, IpLocator, IpService, Nominatim};
use super::types::{Coordinates, DevicePosition, GpsStatus, Location, Place, PlaceDefaults, PositionError};
use crate::config::Config;
use std::sync::Arc;

/// Coordinate used when nothing else resolves (Yogyakarta).
pub const FALLBACK_COORDINATES: Coordinates = Coordinates::new(-7.7956, 110.3695);

/// Reverse geocoding with a guaranteed answer.
pub struct PlaceResolver {
    providers: Vec<Box<dyn Provider<Coordinates, Place>>>,
    defaults: PlaceDefaults,
}

impl PlaceResolver {
    pub fn new(providers: Vec<Box<dyn Provider<Coordinates, Place>>>, defaults: PlaceDefaults) -> Self {
        Self { providers, defaults }
    }

    pub fn from_config(config: &Config) -> Self {
        let agent = config.http_agent();
        let defaults = config.place_defaults();
        Self::new(
            vec![
                Box::new(BigDataCloud::new(agent.clone(), &config.providers.bigdatacloud, defaults.clone())),
                Box::new(Nominatim::new(agent, &config.providers.nominatim, defaults.clone())),
            ],
            defaults,
        )
    }

    /// Name the place at `coords`. Never fails.
    pub fn resolve(&self, coords: Coordinates) -> Location {
        match first_success(&self.providers, &coords) {
            Some(found) => {
                tracing::info!(provider = found.provider, city = %found.value.city, "place resolved");
                Location::from_place(found.value, coords)
            }
            None => {
                tracing::info!(%coords, "no geocoder answered, using placeholder place");
                self.fallback(coords)
            }
        }
    }

    /// The generic placeholder for `coords`.
    pub fn fallback(&self, coords: Coordinates) -> Location {
        Location::from_place(
            Place {
                city: self.defaults.city.clone(),
                region: self.defaults.country.clone(),
            },
            coords,
        )
    }
}

/// Result of the one-off position resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    pub coordinates: Coordinates,
    pub status: GpsStatus,
}

/// Device → IP → fixed coordinate.
pub struct GeolocationResolver {
    capability: GeoCapability,
    options: PositionOptions,
    ip_providers: Vec<Box<dyn Provider<(), Coordinates>>>,
    fallback: Coordinates,
}

impl GeolocationResolver {
    pub fn new(
        capability: GeoCapability,
        options: PositionOptions,
        ip_providers: Vec<Box<dyn Provider<(), Coordinates>>>,
        fallback: Coordinates,
    ) -> Self {
        Self { capability, options, ip_providers, fallback }
    }

    pub fn from_config(config: &Config) -> Self {
        let capability = if !config.geolocation {
            GeoCapability::Absent
        } else if let Some(fix) = &config.device_position {
            GeoCapability::present(FixedDevice::new(
                Coordinates::new(fix.latitude, fix.longitude),
                fix.accuracy_m,
            ))
        } else {
            GeoCapability::present(NoFixDevice)
        };

        let agent = config.http_agent();
        let urls = &config.providers;
        let ip_providers: Vec<Box<dyn Provider<(), Coordinates>>> = vec![
            Box::new(IpLocator::new(agent.clone(), IpService::IpApiCo, &urls.ipapi_co)),
            Box::new(IpLocator::new(agent.clone(), IpService::IpApiCom, &urls.ip_api_com)),
            Box::new(IpLocator::new(agent, IpService::IpWhoIs, &urls.ipwho_is)),
        ];

        let options = PositionOptions {
            timeout: config.device_timeout(),
            ..PositionOptions::default()
        };

        Self::new(capability, options, ip_providers, config.fallback_coordinates())
    }

    /// Resolve the dashboard position, reporting each status change.
    pub async fn resolve(self: &Arc<Self>, on_status: impl Fn(GpsStatus)) -> ResolvedPosition {
        let locator = match &self.capability {
            GeoCapability::Absent => {
                on_status(GpsStatus::Unavailable);
                tracing::info!(coords = %self.fallback, "no positioning capability, using fallback coordinate");
                return ResolvedPosition { coordinates: self.fallback, status: GpsStatus::Unavailable };
            }
            GeoCapability::Present(locator) => locator.clone(),
        };

        on_status(GpsStatus::Detecting);
        match self.locate_device(locator).await {
            Ok(fix) => {
                on_status(GpsStatus::Accurate);
                tracing::info!(coords = %fix.coordinates, accuracy_m = ?fix.accuracy_m, "device fix obtained");
                return ResolvedPosition { coordinates: fix.coordinates, status: GpsStatus::Accurate };
            }
            Err(e) => tracing::info!(error = %e, "device fix failed, trying IP geolocation"),
        }

        on_status(GpsStatus::Ip);
        let this = self.clone();
        let found = tokio::task::spawn_blocking(move || first_success(&this.ip_providers, &()))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "IP geolocation task failed");
                None
            });

        let coordinates = match found {
            Some(found) => {
                tracing::info!(provider = found.provider, coords = %found.value, "IP geolocation succeeded");
                found.value
            }
            None => {
                tracing::warn!(coords = %self.fallback, "all IP providers failed, using fallback coordinate");
                self.fallback
            }
        };
        ResolvedPosition { coordinates, status: GpsStatus::Ip }
    }

    async fn locate_device(
        &self,
        locator: Arc<dyn DeviceLocator>,
    ) -> Result<DevicePosition, PositionError> {
        let opts = self.options;
        let task = tokio::task::spawn_blocking(move || locator.locate(&opts));
        match tokio::time::timeout(opts.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(_join)) => Err(PositionError::PositionUnavailable),
            Err(_elapsed) => Err(PositionError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::chain::tests::Scripted;
    use parking_lot::Mutex;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn place(city: &str) -> Place {
        Place { city: city.into(), region: "Indonesia".into() }
    }

    #[test]
    fn test_place_provider_a_wins_and_b_is_skipped() {
        let (a, a_calls) = Scripted::ok("a", place("Gondokusuman"));
        let (b, b_calls) = Scripted::ok("b", place("Kotabaru"));
        let resolver = PlaceResolver::new(vec![Box::new(a), Box::new(b)], PlaceDefaults::default());

        let loc = resolver.resolve(Coordinates::new(-7.78, 110.38));
        assert_eq!(loc.city, "Gondokusuman");
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_place_falls_through_to_provider_b() {
        let (a, _) = Scripted::<Place>::failing("a");
        let (b, b_calls) = Scripted::ok("b", place("Kotabaru"));
        let resolver = PlaceResolver::new(vec![Box::new(a), Box::new(b)], PlaceDefaults::default());

        let loc = resolver.resolve(Coordinates::new(-7.78, 110.38));
        assert_eq!(loc.city, "Kotabaru");
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_place_provider_result_keeps_rounded_coordinates() {
        let (a, _) = Scripted::ok("a", place("Gondokusuman"));
        let resolver = PlaceResolver::new(vec![Box::new(a)], PlaceDefaults::default());

        let loc = resolver.resolve(Coordinates::new(-7.782_345_6, 110.381_234_9));
        assert_eq!(loc.coordinates, Coordinates::new(-7.7823, 110.3812));
    }

    #[test]
    fn test_place_total_failure_is_static_fallback() {
        let (a, _) = Scripted::<Place>::failing("a");
        let (b, _) = Scripted::<Place>::failing("b");
        let resolver = PlaceResolver::new(vec![Box::new(a), Box::new(b)], PlaceDefaults::default());

        let loc = resolver.resolve(Coordinates::new(-7.795_612_3, 110.369_487_6));
        assert_eq!(loc.city, "Your location");
        assert_eq!(loc.region, "Indonesia");
        assert_eq!(loc.coordinates, Coordinates::new(-7.7956, 110.3695));
    }

    struct SlowDevice(Duration);

    impl DeviceLocator for SlowDevice {
        fn locate(&self, _opts: &PositionOptions) -> Result<DevicePosition, PositionError> {
            std::thread::sleep(self.0);
            Ok(DevicePosition { coordinates: Coordinates::new(1.0, 1.0), accuracy_m: None })
        }
    }

    struct DeniedDevice;

    impl DeviceLocator for DeniedDevice {
        fn locate(&self, _opts: &PositionOptions) -> Result<DevicePosition, PositionError> {
            Err(PositionError::PermissionDenied)
        }
    }

    fn statuses() -> (Arc<Mutex<Vec<GpsStatus>>>, impl Fn(GpsStatus)) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |s| sink.lock().push(s))
    }

    #[tokio::test]
    async fn test_absent_capability_uses_fallback() {
        let (ip, ip_calls) = Scripted::ok("ip", Coordinates::new(5.0, 5.0));
        let resolver = Arc::new(GeolocationResolver::new(
            GeoCapability::Absent,
            PositionOptions::default(),
            vec![Box::new(ip)],
            FALLBACK_COORDINATES,
        ));
        let (seen, on_status) = statuses();

        let pos = resolver.resolve(on_status).await;
        assert_eq!(pos, ResolvedPosition { coordinates: FALLBACK_COORDINATES, status: GpsStatus::Unavailable });
        assert_eq!(*seen.lock(), vec![GpsStatus::Unavailable]);
        assert_eq!(ip_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_device_fix_is_accurate_regardless_of_radius() {
        let (ip, ip_calls) = Scripted::ok("ip", Coordinates::new(5.0, 5.0));
        let resolver = Arc::new(GeolocationResolver::new(
            GeoCapability::present(FixedDevice::new(Coordinates::new(59.33, 18.07), Some(5_000.0))),
            PositionOptions::default(),
            vec![Box::new(ip)],
            FALLBACK_COORDINATES,
        ));
        let (seen, on_status) = statuses();

        let pos = resolver.resolve(on_status).await;
        assert_eq!(pos.status, GpsStatus::Accurate);
        assert_eq!(pos.coordinates, Coordinates::new(59.33, 18.07));
        assert_eq!(*seen.lock(), vec![GpsStatus::Detecting, GpsStatus::Accurate]);
        assert_eq!(ip_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_denied_device_tries_ip_in_order() {
        let (first, first_calls) = Scripted::<Coordinates>::failing("ipapi.co");
        let (second, second_calls) = Scripted::ok("ip-api.com", Coordinates::new(-6.2, 106.8));
        let (third, third_calls) = Scripted::ok("ipwho.is", Coordinates::new(9.0, 9.0));
        let resolver = Arc::new(GeolocationResolver::new(
            GeoCapability::present(DeniedDevice),
            PositionOptions::default(),
            vec![Box::new(first), Box::new(second), Box::new(third)],
            FALLBACK_COORDINATES,
        ));
        let (seen, on_status) = statuses();

        let pos = resolver.resolve(on_status).await;
        assert_eq!(pos, ResolvedPosition { coordinates: Coordinates::new(-6.2, 106.8), status: GpsStatus::Ip });
        assert_eq!(*seen.lock(), vec![GpsStatus::Detecting, GpsStatus::Ip]);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_ip_providers_fail_uses_fallback() {
        let providers: Vec<Box<dyn Provider<(), Coordinates>>> = (0..3)
            .map(|_| Box::new(Scripted::<Coordinates>::failing("ip").0) as Box<dyn Provider<(), Coordinates>>)
            .collect();
        let resolver = Arc::new(GeolocationResolver::new(
            GeoCapability::present(NoFixDevice),
            PositionOptions::default(),
            providers,
            FALLBACK_COORDINATES,
        ));

        let pos = resolver.resolve(|_| {}).await;
        assert_eq!(pos, ResolvedPosition { coordinates: FALLBACK_COORDINATES, status: GpsStatus::Ip });
    }

    #[tokio::test]
    async fn test_slow_device_times_out() {
        let (ip, ip_calls) = Scripted::ok("ip", Coordinates::new(5.0, 5.0));
        let resolver = Arc::new(GeolocationResolver::new(
            GeoCapability::present(SlowDevice(Duration::from_millis(500))),
            PositionOptions { timeout: Duration::from_millis(50), ..PositionOptions::default() },
            vec![Box::new(ip)],
            FALLBACK_COORDINATES,
        ));

        let pos = resolver.resolve(|_| {}).await;
        assert_eq!(pos.status, GpsStatus::Ip);
        assert_eq!(pos.coordinates, Coordinates::new(5.0, 5.0));
        assert_eq!(ip_calls.load(Ordering::SeqCst), 1);
    }
}
