//! Cache for fetched configuration payloads.
//!
//! Evaluation never touches the cache. It is used by
//! [`ConfigurationLoader`](crate::configuration_loader::ConfigurationLoader) to persist raw
//! payloads and restore them later (e.g., on startup, before the first fetch completes).
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};

use crate::Result;

/// A cached payload along with the moment it becomes stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raw payload.
    pub data: Arc<[u8]>,
    /// Entry is treated as absent from this moment on.
    pub stale_at: DateTime<Utc>,
}

impl CacheEntry {
    #[allow(missing_docs)]
    pub fn new(data: impl Into<Arc<[u8]>>, stale_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            data: data.into(),
            stale_at,
        }
    }

    /// Return `true` if the entry is stale at the given moment.
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        self.stale_at <= now
    }
}

/// Pluggable storage for configuration payloads.
///
/// Implementations must never return stale entries: a stale entry found by [`Cache::get`] should
/// be deleted and reported as absent.
pub trait Cache: Send + Sync {
    /// Prepare the backend for use.
    fn initialize(&self) -> Result<()>;

    /// Remove all entries.
    fn clear(&self) -> Result<()>;

    /// Get a fresh entry for the key.
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Insert or replace the entry for the key.
    fn set(&self, key: &str, entry: CacheEntry) -> Result<()>;
}

/// [`Cache`] that keeps entries in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    #[allow(missing_docs)]
    pub fn new() -> InMemoryCache {
        InMemoryCache::default()
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        {
            let entries = self
                .entries
                .read()
                .expect("thread holding cache lock should not panic");
            let entry = entries.get(key)?;
            if !entry.is_stale_at(now) {
                return Some(entry.clone());
            }
        }

        let mut entries = self
            .entries
            .write()
            .expect("thread holding cache lock should not panic");
        // Another writer may have refreshed the entry between the locks.
        match entries.get(key) {
            Some(entry) if !entry.is_stale_at(now) => Some(entry.clone()),
            Some(_) => {
                entries.remove(key);
                log::debug!(target: "flag_targeting", key; "evicted stale cache entry");
                None
            }
            None => None,
        }
    }
}

impl Cache for InMemoryCache {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries
            .write()
            .expect("thread holding cache lock should not panic")
            .clear();
        Ok(())
    }

    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.get_at(key, Utc::now())
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<()> {
        self.entries
            .write()
            .expect("thread holding cache lock should not panic")
            .insert(key.to_owned(), entry);
        Ok(())
    }
}
