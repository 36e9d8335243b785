// Copyright (c) Microsoft Corporation.

//! Operation counters for observing cache behavior.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters the engine bumps as it serves operations.
///
/// Counters only ever increase. Read them through
/// [`snapshot`](Self::snapshot), which returns a coherent-enough copy for
/// diagnostics (each counter is read independently).
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
    loads: AtomicU64,
}

impl CacheStats {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of a cache's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Reads that returned a live entry's value.
    pub hits: u64,
    /// Reads that found no live entry.
    pub misses: u64,
    /// Entries removed because they were observed expired.
    pub expirations: u64,
    /// Entries removed to stay within capacity.
    pub evictions: u64,
    /// Values manufactured by the loader.
    pub loads: u64,
}

impl StatsSnapshot {
    /// Fraction of reads served from the cache, `0.0` when nothing was read.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
