//! Loading configuration payloads into a [`ConfigurationStore`], with a [`Cache`] behind it.
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    cache::{Cache, CacheEntry},
    configuration_store::ConfigurationStore,
    features::FeaturesConfig,
    Configuration, Result,
};

/// Configuration for [`ConfigurationLoader`].
pub struct ConfigurationLoaderConfig {
    /// Where raw payloads are persisted.
    pub cache: Arc<dyn Cache>,
    /// Where the active configuration is published.
    pub store: Arc<ConfigurationStore>,
    /// How long a cached payload stays fresh.
    ///
    /// Defaults to [`ConfigurationLoaderConfig::default_cache_ttl()`].
    pub cache_ttl: Duration,
}

impl ConfigurationLoaderConfig {
    /// Create a config with the default cache TTL.
    pub fn new(cache: Arc<dyn Cache>, store: Arc<ConfigurationStore>) -> Self {
        ConfigurationLoaderConfig {
            cache,
            store,
            cache_ttl: ConfigurationLoaderConfig::default_cache_ttl(),
        }
    }

    /// Default time for which a cached payload is considered fresh.
    pub fn default_cache_ttl() -> Duration {
        Duration::seconds(60)
    }

    /// Update cache TTL with `ttl`.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> ConfigurationLoaderConfig {
        self.cache_ttl = ttl;
        self
    }
}

/// Parses payloads received by the caller's fetcher, publishes them to the store and keeps a copy
/// in the cache.
pub struct ConfigurationLoader {
    config: ConfigurationLoaderConfig,
}

impl ConfigurationLoader {
    /// Create a loader. Initializes the cache backend.
    pub fn new(config: ConfigurationLoaderConfig) -> Result<ConfigurationLoader> {
        config.cache.initialize()?;
        Ok(ConfigurationLoader { config })
    }

    /// Parse `json`, make it the active configuration and cache it under `key`.
    ///
    /// If the payload is invalid, the active configuration is left untouched.
    pub fn load(&self, key: &str, json: Vec<u8>) -> Result<Arc<Configuration>> {
        let features = FeaturesConfig::from_json(json)?;
        let configuration = Arc::new(Configuration::from_server_response(features));

        let stale_at = Utc::now() + self.config.cache_ttl;
        self.config.cache.set(
            key,
            CacheEntry::new(configuration.features.to_json(), stale_at),
        )?;

        self.config.store.set_configuration(configuration.clone());
        log::debug!(target: "flag_targeting", key; "loaded new configuration");

        Ok(configuration)
    }

    /// Make the cached payload under `key` the active configuration.
    ///
    /// Returns `Ok(None)` if there is no fresh cached payload.
    pub fn restore(&self, key: &str) -> Result<Option<Arc<Configuration>>> {
        let Some(entry) = self.config.cache.get(key) else {
            log::debug!(target: "flag_targeting", key; "no cached configuration to restore");
            return Ok(None);
        };

        let features = FeaturesConfig::from_json(entry.data.to_vec())?;
        let configuration = Arc::new(Configuration::from_server_response(features));
        self.config.store.set_configuration(configuration.clone());
        log::debug!(target: "flag_targeting", key; "restored configuration from cache");

        Ok(Some(configuration))
    }

    /// Clear both the cache and the active configuration.
    pub fn invalidate(&self) -> Result<()> {
        self.config.cache.clear()?;
        self.config.store.clear();
        Ok(())
    }
}
