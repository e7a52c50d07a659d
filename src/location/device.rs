//! Device positioning capability.
//!
//! The dashboard asks the device once for a fresh high-accuracy fix. A
//! process with no positioning hardware configured still has the
//! capability; it just never gets a fix, which sends resolution down the
//! IP path. Turning geolocation off removes the capability entirely.

use super::types::{Coordinates, DevicePosition, PositionError};
use std::sync::Arc;
use std::time::Duration;

/// How the device is asked for a fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix accepted. Zero means always take a fresh one.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::ZERO,
        }
    }
}

/// A source of device positions. Blocking.
pub trait DeviceLocator: Send + Sync {
    fn locate(&self, opts: &PositionOptions) -> Result<DevicePosition, PositionError>;
}

/// A device with a known, configured fix (e.g. `--lat/--lon`).
#[derive(Debug, Clone, Copy)]
pub struct FixedDevice {
    position: DevicePosition,
}

impl FixedDevice {
    pub fn new(coordinates: Coordinates, accuracy_m: Option<f64>) -> Self {
        Self {
            position: DevicePosition { coordinates, accuracy_m },
        }
    }
}

impl DeviceLocator for FixedDevice {
    fn locate(&self, _opts: &PositionOptions) -> Result<DevicePosition, PositionError> {
        Ok(self.position)
    }
}

/// Positioning is supported but no fix can be obtained.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFixDevice;

impl DeviceLocator for NoFixDevice {
    fn locate(&self, _opts: &PositionOptions) -> Result<DevicePosition, PositionError> {
        Err(PositionError::PositionUnavailable)
    }
}

/// Whether the platform offers positioning at all.
#[derive(Clone)]
pub enum GeoCapability {
    Absent,
    Present(Arc<dyn DeviceLocator>),
}

impl GeoCapability {
    pub fn present(locator: impl DeviceLocator + 'static) -> Self {
        Self::Present(Arc::new(locator))
    }
}

impl std::fmt::Debug for GeoCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Present(_) => write!(f, "Present"),
        }
    }
}
