//! Scoped data sessions
//!
//! A session owns everything one test suite reads: the loaded document and
//! the sheet cache. It is created explicitly, passed to whatever needs it,
//! and hands out access contexts whose caches are released when they end.

use std::path::PathBuf;
use std::sync::Arc;

use cellwise_json::{AccessContext, DocumentConfig, DocumentStore};

use crate::cache::SheetCache;
use crate::error::Result;
use crate::provider::SheetProvider;

/// Loaded data for one suite of tests
#[derive(Debug)]
pub struct DataSession {
    store: DocumentStore,
    sheets: Arc<SheetCache>,
}

impl DataSession {
    /// Load and validate the configured document
    pub fn open(config: &DocumentConfig) -> Result<Self> {
        Ok(Self::from_store(DocumentStore::load(config)?))
    }

    /// Session over an already loaded store
    pub fn from_store(store: DocumentStore) -> Self {
        Self {
            store,
            sheets: Arc::new(SheetCache::new()),
        }
    }

    /// Use `cache` for sheet providers
    pub fn with_sheet_cache(mut self, cache: Arc<SheetCache>) -> Self {
        self.sheets = cache;
        self
    }

    /// The loaded document
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Start an access context
    pub fn scope(&self) -> AccessContext<'_> {
        self.store.context()
    }

    /// Run `f` inside a fresh access context, released afterwards
    pub fn with_scope<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&AccessContext<'_>) -> R,
    {
        let context = self.scope();
        let result = f(&context);
        context.close();
        result
    }

    /// Sheet cases from `source`, sharing this session's sheet cache
    pub fn sheets<P: Into<PathBuf>>(&self, source: P) -> SheetProvider {
        SheetProvider::with_cache(source, Arc::clone(&self.sheets))
    }

    /// Release cached sheets
    pub fn close(&self) {
        if !self.sheets.is_empty() {
            tracing::info!("Releasing {} cached sheet(s)", self.sheets.len());
        }
        self.sheets.clear();
    }
}
