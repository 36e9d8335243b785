// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Hash-map-backed cache store.

use std::collections::HashMap;
use std::hash::Hash;

use cachet_store::{CacheEntry, CacheStore, Result};
use parking_lot::RwLock;

/// An in-memory cache store.
///
/// Entries live in a `HashMap` behind a read-write lock; operations resolve
/// immediately and never fail. The store applies no policy of its own — it
/// keeps whatever the engine writes, expired entries included, until the
/// engine removes them.
///
/// # Examples
///
/// ```
/// use cachet_memory::InMemoryStore;
/// use cachet_store::{CacheEntry, CacheStore, Timestamp};
///
/// # futures::executor::block_on(async {
/// let store = InMemoryStore::<String, i32>::new();
///
/// let entry = CacheEntry::new(42, Timestamp::EPOCH, Timestamp::FAR_FUTURE);
/// store.put_entry(&"key".to_string(), entry).await?;
/// assert_eq!(store.len().await?, 1);
/// # Ok::<(), cachet_store::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryStore<K, V> {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store pre-allocated for roughly `capacity` entries.
    ///
    /// This is a pre-allocation hint only; the store grows beyond it and
    /// never rejects writes.
    #[must_use]
    pub fn with_initial_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }
}

impl<K, V> CacheStore<K, V> for InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn len(&self) -> Result<u64> {
        Ok(self.inner.read().len() as u64)
    }

    async fn contains_key(&self, key: &K) -> Result<bool> {
        Ok(self.inner.read().contains_key(key))
    }

    async fn get_entry(&self, key: &K) -> Result<Option<CacheEntry<V>>> {
        Ok(self.inner.read().get(key).cloned())
    }

    async fn put_entry(&self, key: &K, entry: CacheEntry<V>) -> Result<()> {
        self.inner.write().insert(key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, key: &K) -> Result<()> {
        self.inner.write().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.inner.write().clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<K>> {
        Ok(self.inner.read().keys().cloned().collect())
    }

    async fn entries(&self) -> Result<Vec<(K, CacheEntry<V>)>> {
        Ok(self
            .inner
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect())
    }
}
