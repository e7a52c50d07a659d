//! Ordered "first success wins" over interchangeable providers.
//!
//! Reverse geocoding and IP geolocation are both a list of independent
//! services tried in priority order. A failing provider is logged and
//! skipped; once one succeeds the rest are never called.

use super::types::LocationError;

/// One capability provider with a uniform attempt contract.
pub trait Provider<I: ?Sized, T>: Send + Sync {
    fn name(&self) -> &'static str;
    fn attempt(&self, input: &I) -> Result<T, LocationError>;
}

/// The winning value and who produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Found<T> {
    pub provider: &'static str,
    pub value: T,
}

/// Try each provider in order; return the first success.
pub fn first_success<I: ?Sized, T>(
    providers: &[Box<dyn Provider<I, T>>],
    input: &I,
) -> Option<Found<T>> {
    for provider in providers {
        match provider.attempt(input) {
            Ok(value) => {
                tracing::debug!(provider = provider.name(), "provider succeeded");
                return Some(Found {
                    provider: provider.name(),
                    value,
                });
            }
            Err(e) => {
                tracing::debug!(provider = provider.name(), error = %e, "provider failed, trying next");
            }
        }
    }
    None
}
