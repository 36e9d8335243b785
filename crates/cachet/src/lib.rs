// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! Policy-composable caching over pluggable storage backends.
//!
//! This crate provides a cache engine that composes three orthogonal policy
//! dimensions over any [`CacheStore`] backend:
//!
//! - **Expiry**: when entries stop being live (eternal, or a time-to-live
//!   anchored to creation, access, modification, or both)
//! - **Eviction**: which entry makes room when a bounded cache is full
//!   (FIFO, FILO, LRU, MRU, LFU, MFU)
//! - **Sampling**: how eviction candidates are drawn from the keyset
//!   (full scan, or uniform random-k)
//!
//! plus optional on-miss loading and an injectable clock for deterministic
//! time in tests. Expiration is lazy: an expired entry is removed when an
//! operation observes it, never by a background sweep.
//!
//! # Examples
//!
//! ## Basic In-Memory Cache
//!
//! ```
//! use cachet::Cache;
//! use cachet_store::Clock;
//! # futures::executor::block_on(async {
//!
//! let clock = Clock::new_frozen();
//! let cache = Cache::builder::<String, i32>(clock)
//!     .memory()
//!     .build();
//!
//! cache.put(&"key".to_string(), 42).await?;
//! assert_eq!(cache.get(&"key".to_string()).await?, Some(42));
//! # Ok::<(), cachet::Error>(())
//! # });
//! ```
//!
//! ## Bounded Cache with a Loader
//!
//! ```
//! use cachet::{Cache, eviction::Lru, loader::CacheLoader};
//! use cachet_store::{BoxError, Clock};
//!
//! #[derive(Debug)]
//! struct Fetcher;
//!
//! impl CacheLoader<String, String> for Fetcher {
//!     async fn load(&self, key: &String) -> Result<Option<String>, BoxError> {
//!         Ok(Some(format!("fetched:{key}")))
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let clock = Clock::new_frozen();
//! let cache = Cache::builder::<String, String>(clock)
//!     .memory()
//!     .eviction(Lru)
//!     .max_entries(1_000)
//!     .loader(Fetcher)
//!     .build();
//!
//! // Miss: the loader manufactures the value, which is then cached.
//! let value = cache.get(&"a".to_string()).await?;
//! assert_eq!(value.as_deref(), Some("fetched:a"));
//! # Ok::<(), cachet::Error>(())
//! # });
//! ```

pub mod builder;
pub mod cache;
pub mod eviction;
pub mod expiry;
pub mod loader;
pub mod sampler;
mod stats;

#[doc(inline)]
pub use cache::Cache;
#[cfg(feature = "memory")]
#[doc(inline)]
pub use cachet_memory::InMemoryStore;
#[doc(inline)]
pub use cachet_store::{
    BoxError, CacheEntry, CacheStore, Clock, ClockControl, EntryMetadata, Error, Result, Timestamp,
};
#[doc(inline)]
pub use stats::{CacheStats, StatsSnapshot};
