//! Provider registry.
//!
//! Maps a configuration string to a provider implementation: a lookup table
//! of named constructors over the [`AvailabilityProvider`] interface.
//! Selecting an unconfigured name fails with an unknown-provider error. The
//! registry performs no caching of provider instances beyond trivial
//! construction.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ProviderError, ProviderResult};
use crate::google::{GoogleAvailabilityProvider, GoogleConfig};
use crate::provider::AvailabilityProvider;
use crate::secrets::SecretSource;

/// Environment variable naming the provider to use.
pub const PROVIDER_ENV_VAR: &str = "CALENDAR_PROVIDER";

/// Provider used when [`PROVIDER_ENV_VAR`] is not set.
pub const DEFAULT_PROVIDER: &str = "google";

/// Constructor for a named provider.
type ProviderFactory =
    Box<dyn Fn(Arc<dyn SecretSource>) -> ProviderResult<Box<dyn AvailabilityProvider>> + Send + Sync>;

/// Registry of named availability-provider constructors.
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in providers registered.
    ///
    /// Currently registers `"google"`, configured from the environment at
    /// construction time of the provider (not of the registry).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("google", |source| {
            let config = GoogleConfig::from_env()?;
            Ok(Box::new(GoogleAvailabilityProvider::new(config, source)?)
                as Box<dyn AvailabilityProvider>)
        });
        registry
    }

    /// Registers a named provider constructor, replacing any previous entry
    /// with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Arc<dyn SecretSource>) -> ProviderResult<Box<dyn AvailabilityProvider>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Returns the registered provider names.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Constructs the provider registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns an unknown-provider error for unconfigured names; provider
    /// construction itself may fail with a configuration error.
    pub fn create(
        &self,
        name: &str,
        source: Arc<dyn SecretSource>,
    ) -> ProviderResult<Box<dyn AvailabilityProvider>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ProviderError::unknown_provider(name))?;
        factory(source)
    }

    /// Constructs the provider named by the `CALENDAR_PROVIDER` environment
    /// variable, defaulting to `"google"`. The name is lowercased before
    /// lookup.
    pub fn create_from_env(
        &self,
        source: Arc<dyn SecretSource>,
    ) -> ProviderResult<Box<dyn AvailabilityProvider>> {
        let name = std::env::var(PROVIDER_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_PROVIDER.to_string())
            .to_lowercase();
        self.create(&name, source)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::provider::BoxFuture;
    use freeslot_core::{FreeSlot, TimeWindow};

    struct NullSource;

    impl SecretSource for NullSource {
        fn fetch_secret(&self, name: &str) -> ProviderResult<String> {
            Err(ProviderError::credential(format!("missing secret: {name}")))
        }
    }

    struct NoopProvider;

    impl AvailabilityProvider for NoopProvider {
        fn name(&self) -> &str {
            "noop"
        }

        fn get_free_slots<'a>(
            &'a self,
            _email: &'a str,
            _window: TimeWindow,
            _slot_minutes: i64,
        ) -> BoxFuture<'a, ProviderResult<Vec<FreeSlot>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[test]
    fn defaults_include_google() {
        let registry = ProviderRegistry::with_defaults();
        assert!(registry.names().contains(&"google"));
    }

    #[test]
    fn unknown_provider_name_fails() {
        let registry = ProviderRegistry::with_defaults();
        let err = registry
            .create("outlook", Arc::new(NullSource))
            .err()
            .unwrap();
        assert_eq!(err.code(), ProviderErrorCode::UnknownProvider);
        assert!(err.message().contains("outlook"));
    }

    #[test]
    fn custom_provider_registration() {
        let mut registry = ProviderRegistry::new();
        registry.register("noop", |_source| {
            Ok(Box::new(NoopProvider) as Box<dyn AvailabilityProvider>)
        });

        let provider = registry.create("noop", Arc::new(NullSource)).unwrap();
        assert_eq!(provider.name(), "noop");
    }

    #[test]
    fn registry_constructs_fresh_instances() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let constructed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&constructed);

        let mut registry = ProviderRegistry::new();
        registry.register("noop", move |_source| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NoopProvider) as Box<dyn AvailabilityProvider>)
        });

        registry.create("noop", Arc::new(NullSource)).unwrap();
        registry.create("noop", Arc::new(NullSource)).unwrap();
        assert_eq!(constructed.load(Ordering::SeqCst), 2);
    }
}
