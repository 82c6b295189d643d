//! Cached invoice collection view.
//!
//! The collection is read through a `moka` cache keyed by resource path. Successful
//! mutations invalidate the entry through the [`Revalidator`] implementation below, and the
//! next read repopulates it from the store.
//!
//! Each path carries a generation number that is part of the cache key. Invalidation bumps
//! the generation before dropping the entry, so a load that started before the mutation can
//! only populate the old generation's key, which no later read asks for.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::db::errors::DbError;
use crate::db::models::invoices::Invoice;
use crate::db::store::InvoiceStore;
use crate::invoices::outcome::Revalidator;

type ViewKey = (String, u64);

#[derive(Clone)]
pub struct InvoiceViewCache {
    cache: Cache<ViewKey, Arc<Vec<Invoice>>>,
    generations: Arc<Mutex<HashMap<String, u64>>>,
    store: Arc<dyn InvoiceStore>,
}

impl InvoiceViewCache {
    pub fn new(store: Arc<dyn InvoiceStore>, capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).time_to_live(ttl).build(),
            generations: Arc::new(Mutex::new(HashMap::new())),
            store,
        }
    }

    fn current_key(&self, path: &str) -> ViewKey {
        let generation = self.generations.lock().get(path).copied().unwrap_or(0);
        (path.to_string(), generation)
    }

    /// The invoice collection as seen at `path`, loading it on a miss. Concurrent misses for
    /// the same path and generation share one load.
    #[instrument(skip(self), err)]
    pub async fn collection(&self, path: &str) -> Result<Arc<Vec<Invoice>>, Arc<DbError>> {
        let key = self.current_key(path);
        let store = self.store.clone();
        self.cache
            .try_get_with(key, async move {
                debug!("Cache miss for invoice collection, loading from store");
                store.list().await.map(Arc::new)
            })
            .await
    }

    #[cfg(test)]
    pub async fn is_cached(&self, path: &str) -> bool {
        self.cache.get(&self.current_key(path)).await.is_some()
    }
}

#[async_trait]
impl Revalidator for InvoiceViewCache {
    async fn revalidate_path(&self, path: &str) {
        let stale = {
            let mut generations = self.generations.lock();
            let generation = generations.entry(path.to_string()).or_insert(0);
            let stale = *generation;
            *generation += 1;
            stale
        };
        self.cache.invalidate(&(path.to_string(), stale)).await;
    }
}
