//! Track provider contract and scheme-based resolution
//!
//! Providers abstract where tracks come from (local filesystem, a streaming
//! service, test fixtures). The controller never talks to a concrete
//! provider type; it resolves one through [`ProviderResolver`] by the
//! location's URI scheme.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AriaError, Result};
use crate::types::{TrackInfo, TrackLocation};

/// A source of tracks and their metadata
///
/// Implementations must be cheap to construct: the resolver hands out a
/// fresh instance per request, and the decoder takes one onto its own
/// thread.
pub trait TrackProvider: Send {
    /// Enumerate the track locations reachable under `uri`
    fn list(&self, uri: &str) -> Result<Vec<TrackLocation>>;

    /// Describe a single track
    fn track_info(&self, location: &TrackLocation) -> Result<TrackInfo>;
}

/// Factory producing a provider instance on demand
pub type ProviderFactory = Box<dyn Fn() -> Box<dyn TrackProvider> + Send + Sync>;

/// Registry mapping URI schemes to provider factories
///
/// Factories are validated at registration time; resolution failures come
/// back as [`AriaError::ProviderUnavailable`] so callers can skip the
/// track instead of crashing. Schemeless locations fall back to the
/// default factory, if one was installed.
#[derive(Default)]
pub struct ProviderResolver {
    factories: Mutex<HashMap<String, ProviderFactory>>,
    default_factory: Mutex<Option<ProviderFactory>>,
}

impl ProviderResolver {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a scheme
    ///
    /// Accepts either the bare scheme (`"file"`) or the prefix form
    /// (`"file://"`). Fails with `InvalidArgument` for empty or malformed
    /// schemes.
    pub fn register(
        &self,
        scheme: &str,
        factory: impl Fn() -> Box<dyn TrackProvider> + Send + Sync + 'static,
    ) -> Result<()> {
        let scheme = scheme.strip_suffix("://").unwrap_or(scheme);
        if scheme.is_empty() || scheme.contains("://") {
            return Err(AriaError::invalid_argument(format!(
                "malformed provider scheme '{scheme}'"
            )));
        }
        let mut factories = self.factories.lock().unwrap();
        factories.insert(scheme.to_string(), Box::new(factory));
        Ok(())
    }

    /// Install the fallback factory used for schemeless locations
    pub fn register_default(
        &self,
        factory: impl Fn() -> Box<dyn TrackProvider> + Send + Sync + 'static,
    ) {
        *self.default_factory.lock().unwrap() = Some(Box::new(factory));
    }

    /// Resolve a provider for a location
    ///
    /// Unknown schemes and schemeless locations without a default both
    /// fail with `ProviderUnavailable`.
    pub fn resolve(&self, location: &TrackLocation) -> Result<Box<dyn TrackProvider>> {
        match location.scheme() {
            Some(scheme) => {
                let factories = self.factories.lock().unwrap();
                factories
                    .get(scheme)
                    .map(|factory| factory())
                    .ok_or_else(|| AriaError::provider_unavailable(scheme))
            }
            None => {
                let default_factory = self.default_factory.lock().unwrap();
                default_factory
                    .as_ref()
                    .map(|factory| factory())
                    .ok_or_else(|| AriaError::provider_unavailable(location.as_str()))
            }
        }
    }
}
