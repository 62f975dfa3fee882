//! A thread-safe in-memory holder of the currently active [`Configuration`]. Evaluation reads
//! snapshots from it while a loader replaces the configuration from time to time.
use std::sync::{Arc, RwLock};

use crate::Configuration;

/// `ConfigurationStore` provides a thread-safe (`Sync`) storage for the configuration that allows
/// concurrent access for readers and writers.
///
/// `Configuration` itself is immutable and can only be replaced completely, so a reader keeps a
/// consistent snapshot for as long as it holds the `Arc`.
#[derive(Default)]
pub struct ConfigurationStore {
    configuration: RwLock<Option<Arc<Configuration>>>,
}

impl ConfigurationStore {
    /// Create a new empty configuration store.
    pub fn new() -> Self {
        ConfigurationStore::default()
    }

    /// Get currently-active configuration. Returns `None` if configuration hasn't been loaded
    /// yet.
    pub fn get_configuration(&self) -> Option<Arc<Configuration>> {
        // Err() is possible only if the lock is poisoned (writer panicked while holding the
        // lock), which should never happen.
        let configuration = self
            .configuration
            .read()
            .expect("thread holding configuration lock should not panic");

        configuration.clone()
    }

    /// Set new configuration, returning the previous one.
    pub fn set_configuration(&self, config: Arc<Configuration>) -> Option<Arc<Configuration>> {
        let mut configuration_slot = self
            .configuration
            .write()
            .expect("thread holding configuration lock should not panic");

        configuration_slot.replace(config)
    }

    /// Drop the active configuration. Subsequent evaluations behave as if nothing was loaded.
    pub fn clear(&self) -> Option<Arc<Configuration>> {
        self.configuration
            .write()
            .expect("thread holding configuration lock should not panic")
            .take()
    }
}
