//! Location subsystem for Cuaca.Live.
//!
//! Works out where the dashboard is (device fix → IP geolocation → fixed
//! fallback) and what the place is called (reverse geocoding with two
//! providers and a generic fallback). Both chains share one
//! first-success combinator.

pub mod chain;
pub mod device;
pub mod providers;
pub mod resolver;
pub mod types;

pub use chain::{first_success, Found, Provider};
pub use device::{DeviceLocator, FixedDevice, GeoCapability, NoFixDevice, PositionOptions};
pub use resolver::{GeolocationResolver, PlaceResolver, ResolvedPosition, FALLBACK_COORDINATES};
pub use types::{
    Coordinates, DevicePosition, GpsStatus, Location, LocationError, Place, PlaceDefaults,
    PositionError,
};
