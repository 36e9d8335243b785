// Copyright (c) Microsoft Corporation.

//! Cache builder for configuring storage, policies, capacity, and loading.
//!
//! This module provides the builder pattern infrastructure for creating
//! caches. Storage and loader selection are typestate transitions that swap
//! a type parameter, while policies, capacity, and naming are plain setters.

use std::{hash::Hash, marker::PhantomData};

use cachet_store::{CacheStore, Clock};

#[cfg(feature = "memory")]
use cachet_memory::InMemoryStore;

use crate::{
    Cache,
    eviction::{EvictionPolicy, Lru},
    expiry::{EternalExpiry, ExpiryPolicy},
    loader::{CacheLoader, NoLoader},
    sampler::{FullSampler, Sampler},
    stats::CacheStats,
};

/// Builder for constructing a [`Cache`].
///
/// Created by calling [`Cache::builder`]. Every option has a default:
/// eternal expiry, LRU eviction, full sampling, unbounded capacity, no
/// loader, and a name derived from the storage type.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cachet::{Cache, eviction::Fifo, expiry::CreatedExpiry};
/// use cachet_store::Clock;
///
/// let clock = Clock::new_frozen();
/// let cache = Cache::builder::<String, i32>(clock)
///     .memory()
///     .expiry(CreatedExpiry::new(Duration::from_secs(60)))
///     .eviction(Fifo)
///     .max_entries(100)
///     .build();
/// ```
#[derive(Debug)]
pub struct CacheBuilder<K, V, S = (), L = NoLoader> {
    name: Option<&'static str>,
    storage: S,
    clock: Clock,
    expiry: Box<dyn ExpiryPolicy>,
    eviction: Box<dyn EvictionPolicy>,
    sampler: Box<dyn Sampler>,
    max_entries: Option<u64>,
    loader: L,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> CacheBuilder<K, V> {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            name: None,
            storage: (),
            clock,
            expiry: Box::new(EternalExpiry),
            eviction: Box::new(Lru),
            sampler: Box::new(FullSampler),
            max_entries: None,
            loader: NoLoader,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, L> CacheBuilder<K, V, (), L> {
    /// Sets the storage backend for the cache.
    ///
    /// Use this to provide your own [`CacheStore`] implementation instead of
    /// the built-in options like [`memory`](Self::memory).
    pub fn storage<S>(self, storage: S) -> CacheBuilder<K, V, S, L>
    where
        S: CacheStore<K, V>,
    {
        CacheBuilder {
            name: self.name,
            storage,
            clock: self.clock,
            expiry: self.expiry,
            eviction: self.eviction,
            sampler: self.sampler,
            max_entries: self.max_entries,
            loader: self.loader,
            _phantom: PhantomData,
        }
    }

    /// Configures the cache to use in-memory storage.
    ///
    /// The most common backend: a hash map that resolves every operation
    /// immediately, leaving all policy to the engine.
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
    ///     .build();
    /// ```
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn memory(self) -> CacheBuilder<K, V, InMemoryStore<K, V>, L>
    where
        K: Clone + Eq + Hash + Send + Sync,
        V: Clone + Send + Sync,
    {
        self.storage(InMemoryStore::new())
    }
}

impl<K, V, S, L> CacheBuilder<K, V, S, L> {
    /// Sets the name used to identify this cache in diagnostics.
    ///
    /// Defaults to the storage type's short name.
    #[must_use]
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the expiry policy deciding when entries stop being live.
    ///
    /// Defaults to [`EternalExpiry`]: entries never expire.
    #[must_use]
    pub fn expiry(mut self, policy: impl ExpiryPolicy + 'static) -> Self {
        self.expiry = Box::new(policy);
        self
    }

    /// Sets the eviction policy ranking candidates when the cache is full.
    ///
    /// Defaults to [`Lru`](crate::eviction::Lru).
    #[must_use]
    pub fn eviction(mut self, policy: impl EvictionPolicy + 'static) -> Self {
        self.eviction = Box::new(policy);
        self
    }

    /// Sets the sampler selecting eviction candidates from the keyset.
    ///
    /// Defaults to [`FullSampler`]: every stored entry is a candidate.
    #[must_use]
    pub fn sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    /// Bounds the cache to at most `max` entries.
    ///
    /// Overflowing insertions evict one entry first. A bound of zero rejects
    /// every insertion. Unset means unbounded.
    #[must_use]
    pub fn max_entries(mut self, max: u64) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Sets the loader consulted when a read finds no live entry.
    ///
    /// Defaults to [`NoLoader`]: reads of absent keys simply miss.
    pub fn loader<L2>(self, loader: L2) -> CacheBuilder<K, V, S, L2>
    where
        L2: CacheLoader<K, V>,
    {
        CacheBuilder {
            name: self.name,
            storage: self.storage,
            clock: self.clock,
            expiry: self.expiry,
            eviction: self.eviction,
            sampler: self.sampler,
            max_entries: self.max_entries,
            loader,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the builder's clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl<K, V, S, L> CacheBuilder<K, V, S, L>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
    S: CacheStore<K, V>,
    L: CacheLoader<K, V>,
{
    /// Builds the cache with the configured storage and settings.
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
    ///     .build();
    /// ```
    pub fn build(self) -> Cache<K, V, S, L> {
        Cache {
            name: short_type_name::<S>(self.name),
            storage: self.storage,
            clock: self.clock,
            expiry: self.expiry,
            eviction: self.eviction,
            sampler: self.sampler,
            max_entries: self.max_entries,
            loader: self.loader,
            stats: CacheStats::default(),
            _phantom: PhantomData,
        }
    }
}

fn short_type_name<S>(user_name: Option<&'static str>) -> &'static str {
    if let Some(name) = user_name {
        name
    } else {
        let full = std::any::type_name::<S>();
        full.rsplit("::").next().unwrap_or(full)
    }
}
