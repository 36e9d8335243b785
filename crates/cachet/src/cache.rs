// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cache engine: policy orchestration over a storage backend.

use std::{hash::Hash, marker::PhantomData};

use tracing::{debug, trace};

use cachet_store::{CacheEntry, CacheStore, Clock, Error, Result, Timestamp};

use crate::{
    builder::CacheBuilder,
    eviction::EvictionPolicy,
    expiry::ExpiryPolicy,
    loader::{CacheLoader, NoLoader},
    sampler::Sampler,
    stats::{CacheStats, StatsSnapshot},
};

/// Type alias for cache names used in diagnostics.
pub type CacheName = &'static str;

/// A policy-composable cache over a pluggable storage backend.
///
/// The engine owns orchestration only: each operation resolves the target
/// entry's liveness (removing it if it has expired), applies the configured
/// expiry policy to the entry's metadata, and, when a bounded cache would
/// overflow, consults the sampler and eviction policy to make room. The
/// storage backend `S` owns the entries; an optional loader `L` manufactures
/// values for missing keys.
///
/// Every operation is asynchronous and may suspend at any backend or loader
/// call. The engine holds no locks of its own; drive it from one logical
/// execution context or serialize access externally.
///
/// # Examples
///
/// ## Basic In-Memory Cache
///
/// ```
/// use cachet::Cache;
/// use cachet_store::Clock;
/// # futures::executor::block_on(async {
///
/// let clock = Clock::new_frozen();
/// let cache = Cache::builder::<String, i32>(clock)
///     .memory()
///     .build();
///
/// cache.put(&"key".to_string(), 42).await?;
/// let value = cache.get(&"key".to_string()).await?;
/// assert_eq!(value, Some(42));
/// # Ok::<(), cachet::Error>(())
/// # });
/// ```
///
/// ## Bounded Cache with Policies
///
/// ```
/// use std::time::Duration;
/// use cachet::{Cache, eviction::Lfu, expiry::AccessedExpiry, sampler::RandomSampler};
/// use cachet_store::Clock;
///
/// let clock = Clock::new_frozen();
/// let cache = Cache::builder::<String, String>(clock)
///     .memory()
///     .expiry(AccessedExpiry::new(Duration::from_secs(300)))
///     .eviction(Lfu)
///     .sampler(RandomSampler::new(64))
///     .max_entries(10_000)
///     .build();
/// ```
#[derive(Debug)]
pub struct Cache<K, V, S, L = NoLoader> {
    pub(crate) name: CacheName,
    pub(crate) storage: S,
    pub(crate) clock: Clock,
    pub(crate) expiry: Box<dyn ExpiryPolicy>,
    pub(crate) eviction: Box<dyn EvictionPolicy>,
    pub(crate) sampler: Box<dyn Sampler>,
    pub(crate) max_entries: Option<u64>,
    pub(crate) loader: L,
    pub(crate) stats: CacheStats,
    pub(crate) _phantom: PhantomData<(K, V)>,
}

impl Cache<(), (), ()> {
    /// Creates a new cache builder.
    ///
    /// The builder configures storage, policies, capacity, and the optional
    /// loader before constructing the cache. Unset options take their
    /// defaults: eternal expiry, LRU eviction, full sampling, unbounded
    /// capacity, no loader.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachet::Cache;
    /// use cachet_store::Clock;
    ///
    /// let clock = Clock::new_frozen();
    /// let cache = Cache::builder::<String, i32>(clock)
    ///     .memory()
    ///     .max_entries(1_000)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder<K, V>(clock: Clock) -> CacheBuilder<K, V> {
        CacheBuilder::new(clock)
    }
}

/// Accessor methods.
impl<K, V, S, L> Cache<K, V, S, L> {
    /// Returns the name of this cache, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> CacheName {
        self.name
    }

    /// Returns a reference to the cache's clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns a point-in-time copy of the cache's operation counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns a reference to the storage backend.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.storage
    }

    /// Consumes the cache and returns the storage backend.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.storage
    }
}

/// Public cache operations.
impl<K, V, S, L> Cache<K, V, S, L>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
    S: CacheStore<K, V>,
    L: CacheLoader<K, V>,
{
    /// Stores a value for the key.
    ///
    /// A live entry is modified in place: the value is replaced, the update
    /// time refreshed, and the expiry policy's *modified* event applied,
    /// while creation time, access time, and hit count are preserved.
    /// Otherwise a fresh entry is created with the *created* event's
    /// time-to-live, evicting first if the cache is full.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn put(&self, key: &K, value: V) -> Result<()> {
        let now = self.clock.now();
        if let Some(mut entry) = self.live_entry(key, now).await? {
            entry.replace_value(value, now);
            if let Some(ttl) = self.expiry.on_modified() {
                entry.set_expires_at(now.saturating_add(ttl));
            }
            return self.storage.put_entry(key, entry).await;
        }
        self.create_entry(key, value, now).await.map(|_| ())
    }

    /// Stores a value only if no live entry exists for the key.
    ///
    /// Returns `true` if the value was stored. An existing live entry is
    /// left completely untouched (not even its access metadata changes)
    /// and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn put_if_absent(&self, key: &K, value: V) -> Result<bool> {
        let now = self.clock.now();
        if self.live_entry(key, now).await?.is_some() {
            return Ok(false);
        }
        self.create_entry(key, value, now).await
    }

    /// Retrieves the value for the key.
    ///
    /// A successful read counts as a hit: the entry's hit count and access
    /// time are updated and the expiry policy's *accessed* event applied.
    /// When no live entry exists the loader is consulted; a loaded value is
    /// inserted as a fresh entry (subject to eviction) and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation or the loader fails. Loader
    /// failures are never cached.
    pub async fn get(&self, key: &K) -> Result<Option<V>> {
        let now = self.clock.now();
        if let Some(mut entry) = self.live_entry(key, now).await? {
            entry.record_hit(now);
            if let Some(ttl) = self.expiry.on_accessed() {
                entry.set_expires_at(now.saturating_add(ttl));
            }
            let value = entry.value().clone();
            self.storage.put_entry(key, entry).await?;
            self.stats.record_hit();
            return Ok(Some(value));
        }

        self.stats.record_miss();
        match self.loader.load(key).await.map_err(Error::loader)? {
            Some(value) => {
                self.stats.record_load();
                trace!(cache = self.name, "loader materialized value for missing key");
                self.create_entry(key, value.clone(), now).await?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Stores a value and returns the previous one.
    ///
    /// The write follows [`put`](Self::put) semantics exactly; the returned
    /// value is what a read would have seen beforehand (`None` if no live
    /// entry existed). Returning the previous value does not count as an
    /// access.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn get_and_put(&self, key: &K, value: V) -> Result<Option<V>> {
        let now = self.clock.now();
        if let Some(mut entry) = self.live_entry(key, now).await? {
            let previous = entry.value().clone();
            entry.replace_value(value, now);
            if let Some(ttl) = self.expiry.on_modified() {
                entry.set_expires_at(now.saturating_add(ttl));
            }
            self.storage.put_entry(key, entry).await?;
            return Ok(Some(previous));
        }
        self.create_entry(key, value, now).await?;
        Ok(None)
    }

    /// Removes the entry for the key and returns its value.
    ///
    /// Returns `None` for an absent or expired key. No metadata is updated
    /// before the removal.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn get_and_remove(&self, key: &K) -> Result<Option<V>> {
        let now = self.clock.now();
        match self.live_entry(key, now).await? {
            Some(entry) => {
                self.storage.remove(key).await?;
                Ok(Some(entry.into_value()))
            }
            None => Ok(None),
        }
    }

    /// Removes the entry for the key, live or not.
    ///
    /// A no-op if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn remove(&self, key: &K) -> Result<()> {
        self.storage.remove(key).await
    }

    /// Returns true if a live entry exists for the key.
    ///
    /// An expired entry is removed on encounter. This is not an access: the
    /// entry's access time and hit count are never touched.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn contains_key(&self, key: &K) -> Result<bool> {
        let now = self.clock.now();
        Ok(self.live_entry(key, now).await?.is_some())
    }

    /// Returns the number of stored entries, as counted by the backend.
    ///
    /// Expired entries that no operation has observed yet are included;
    /// use [`purge_expired`](Self::purge_expired) first for a live count.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn len(&self) -> Result<u64> {
        self.storage.len().await
    }

    /// Returns true if the backend stores no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Returns the currently stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn keys(&self) -> Result<Vec<K>> {
        self.storage.keys().await
    }

    /// Removes all entries from the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn clear(&self) -> Result<()> {
        self.storage.clear().await
    }

    /// Eagerly removes every expired entry, returning how many were removed.
    ///
    /// Expiration is otherwise lazy: expired entries linger until an
    /// operation observes them. Call this to reclaim backend space ahead of
    /// time; the observable effect is the same removal lazy expiration
    /// would eventually perform.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn purge_expired(&self) -> Result<u64> {
        let now = self.clock.now();
        let mut removed = 0;
        for (key, entry) in self.storage.entries().await? {
            if entry.is_expired(now) {
                self.storage.remove(&key).await?;
                self.stats.record_expiration();
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(cache = self.name, removed, "purged expired entries");
        }
        Ok(removed)
    }

    /// Fetches the entry for the key, lazily expiring it if needed.
    ///
    /// Returns the entry only if it is live at `now`; an expired entry is
    /// removed and reported as absent.
    async fn live_entry(&self, key: &K, now: Timestamp) -> Result<Option<CacheEntry<V>>> {
        match self.storage.get_entry(key).await? {
            Some(entry) if entry.is_live(now) => Ok(Some(entry)),
            Some(_) => {
                self.storage.remove(key).await?;
                self.stats.record_expiration();
                trace!(cache = self.name, "lazily expired entry");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Creates a fresh entry, making room first on a bounded cache.
    ///
    /// Returns whether the entry was actually stored; `false` means the
    /// insertion was rejected because capacity could not be made (only
    /// possible with a zero capacity bound).
    async fn create_entry(&self, key: &K, value: V, now: Timestamp) -> Result<bool> {
        if !self.make_room(now).await? {
            debug!(cache = self.name, "insertion rejected: cannot make room");
            return Ok(false);
        }
        let expires_at = now.saturating_add(self.expiry.on_created());
        let entry = CacheEntry::new(value, now, expires_at);
        self.storage.put_entry(key, entry).await?;
        Ok(true)
    }

    /// Ensures one more entry fits, evicting at most one victim.
    ///
    /// Returns whether the insertion may proceed.
    async fn make_room(&self, now: Timestamp) -> Result<bool> {
        let Some(max) = self.max_entries else {
            return Ok(true);
        };
        if self.storage.len().await? < max {
            return Ok(true);
        }
        self.evict_one(now).await?;
        Ok(self.storage.len().await? < max)
    }

    /// Runs one round of the eviction protocol: sample, rank, remove.
    ///
    /// Expired entries encountered among the candidates are removed as lazy
    /// expirations; a victim is only evicted if those removals did not
    /// already bring the cache under its bound.
    async fn evict_one(&self, now: Timestamp) -> Result<()> {
        let keys = self.storage.keys().await?;
        let picks = self.sampler.sample(keys.len());

        let mut candidate_keys = Vec::with_capacity(picks.len());
        let mut candidates = Vec::with_capacity(picks.len());
        let mut expired_any = false;
        for pick in picks {
            let Some(key) = keys.get(pick) else { continue };
            let Some(entry) = self.storage.get_entry(key).await? else {
                continue;
            };
            if entry.is_expired(now) {
                self.storage.remove(key).await?;
                self.stats.record_expiration();
                expired_any = true;
            } else {
                candidate_keys.push(key);
                candidates.push(entry.metadata());
            }
        }

        if expired_any {
            if let Some(max) = self.max_entries {
                if self.storage.len().await? < max {
                    return Ok(());
                }
            }
        }

        if let Some(victim) = self.eviction.select_victim(&candidates) {
            self.storage.remove(candidate_keys[victim]).await?;
            self.stats.record_eviction();
            debug!(cache = self.name, "evicted entry to stay within capacity");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    #[test]
    fn rejected_insert_reports_not_created() {
        block_on(async {
            let clock = Clock::new_frozen();
            let cache = Cache::builder::<String, i32>(clock)
                .memory()
                .max_entries(0)
                .build();

            // With a zero bound nothing can ever be created.
            assert!(!cache.put_if_absent(&"key".to_string(), 1).await.unwrap());
            cache.put(&"key".to_string(), 2).await.unwrap();
            assert_eq!(cache.len().await.unwrap(), 0);
        });
    }

    #[test]
    fn live_entry_removes_expired_records() {
        block_on(async {
            let clock = Clock::new_frozen();
            let cache = Cache::builder::<String, i32>(clock)
                .memory()
                .expiry(crate::expiry::CreatedExpiry::new(std::time::Duration::ZERO))
                .build();

            cache.put(&"key".to_string(), 1).await.unwrap();
            assert_eq!(cache.len().await.unwrap(), 1);

            // The expired entry is removed the moment it is observed.
            assert!(!cache.contains_key(&"key".to_string()).await.unwrap());
            assert_eq!(cache.len().await.unwrap(), 0);
            assert_eq!(cache.stats().expirations, 1);
        });
    }
}
