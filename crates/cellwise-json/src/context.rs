//! Access contexts and their lookup caches
//!
//! A context is one unit of work (a test run, a worker) reading a shared
//! [`DocumentStore`]. With caching enabled it memoizes every `(section, key)`
//! lookup, including misses, so repeated reads inside the context never walk
//! the tree twice. Contexts never share cache state.

use std::collections::hash_map::Entry;
use std::sync::{Mutex, PoisonError};

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::JsonResult;
use crate::lookup::Lookup;
use crate::store::DocumentStore;

type CacheKey = (String, String);

/// A scoped reader over a [`DocumentStore`]
///
/// The cache is created on first use and released by [`AccessContext::close`]
/// or when the context is dropped.
#[derive(Debug)]
pub struct AccessContext<'s> {
    store: &'s DocumentStore,
    cache: OnceCell<Mutex<AHashMap<CacheKey, Option<&'s Value>>>>,
}

impl<'s> AccessContext<'s> {
    pub(crate) fn new(store: &'s DocumentStore) -> Self {
        Self {
            store,
            cache: OnceCell::new(),
        }
    }

    /// Number of memoized lookups
    pub fn cached_entries(&self) -> usize {
        self.cache
            .get()
            .map_or(0, |cache| cache.lock().unwrap_or_else(PoisonError::into_inner).len())
    }

    /// Release the cache; calling it again is a no-op
    pub fn close(&self) {
        let Some(cache) = self.cache.get() else {
            return;
        };
        let mut entries = cache.lock().unwrap_or_else(PoisonError::into_inner);
        if !entries.is_empty() {
            tracing::info!("Released access context cache ({} entries)", entries.len());
            entries.clear();
            entries.shrink_to_fit();
        }
    }

    fn cached_node(&self, section: &str, key: &str) -> JsonResult<Option<&'s Value>> {
        let store: &'s DocumentStore = self.store;
        let cache = self.cache.get_or_init(|| Mutex::new(AHashMap::new()));
        let mut entries = cache.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.entry((section.to_string(), key.to_string())) {
            Entry::Occupied(hit) => {
                tracing::debug!("Cache hit for '{}'/'{}'", section, key);
                Ok(*hit.get())
            }
            Entry::Vacant(slot) => {
                tracing::debug!("Cache miss for '{}'/'{}'", section, key);
                let node = store.tree().lookup(section, key)?;
                slot.insert(node);
                Ok(node)
            }
        }
    }
}

impl Lookup for AccessContext<'_> {
    fn store(&self) -> &DocumentStore {
        self.store
    }

    fn node(&self, section: &str, key: &str) -> JsonResult<Option<&Value>> {
        if self.store.cache_enabled() {
            self.cached_node(section, key)
        } else {
            Ok(self.store.tree().lookup(section, key)?)
        }
    }
}

impl Drop for AccessContext<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
