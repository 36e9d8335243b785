// Copyright (c) Microsoft Corporation.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! Core storage abstractions for building cache backends.
//!
//! This crate defines the [`CacheStore`] trait that all cache backends must
//! satisfy, along with [`CacheEntry`] for storing values with bookkeeping
//! metadata, the injectable [`Clock`], and [`Error`] types for fallible
//! operations.
//!
//! # Overview
//!
//! The store abstraction separates storage concerns from caching policy.
//! Implement [`CacheStore`] for your storage substrate, then use `cachet` to
//! layer expiry, eviction, capacity, and on-miss loading on top. Stores hold
//! entries opaquely: they enforce neither expiry nor capacity, and report raw
//! counts and presence.
//!
//! # Implementing a Cache Store
//!
//! Implement all methods of [`CacheStore`]:
//!
//! ```
//! use cachet_store::{CacheEntry, CacheStore, Result};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleStore<K, V>(RwLock<HashMap<K, CacheEntry<V>>>);
//!
//! impl<K, V> CacheStore<K, V> for SimpleStore<K, V>
//! where
//!     K: Clone + Eq + std::hash::Hash + Send + Sync,
//!     V: Clone + Send + Sync,
//! {
//!     async fn len(&self) -> Result<u64> {
//!         Ok(self.0.read().unwrap().len() as u64)
//!     }
//!
//!     async fn contains_key(&self, key: &K) -> Result<bool> {
//!         Ok(self.0.read().unwrap().contains_key(key))
//!     }
//!
//!     async fn get_entry(&self, key: &K) -> Result<Option<CacheEntry<V>>> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn put_entry(&self, key: &K, entry: CacheEntry<V>) -> Result<()> {
//!         self.0.write().unwrap().insert(key.clone(), entry);
//!         Ok(())
//!     }
//!
//!     async fn remove(&self, key: &K) -> Result<()> {
//!         self.0.write().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn clear(&self) -> Result<()> {
//!         self.0.write().unwrap().clear();
//!         Ok(())
//!     }
//!
//!     async fn keys(&self) -> Result<Vec<K>> {
//!         Ok(self.0.read().unwrap().keys().cloned().collect())
//!     }
//!
//!     async fn entries(&self) -> Result<Vec<(K, CacheEntry<V>)>> {
//!         Ok(self
//!             .0
//!             .read()
//!             .unwrap()
//!             .iter()
//!             .map(|(k, e)| (k.clone(), e.clone()))
//!             .collect())
//!     }
//! }
//! ```

mod clock;
mod entry;
pub mod error;
pub(crate) mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use clock::{Clock, ClockControl, Timestamp};
#[doc(inline)]
pub use entry::{CacheEntry, EntryMetadata};
#[doc(inline)]
pub use error::{BoxError, Error, Result};
#[doc(inline)]
pub use store::CacheStore;
