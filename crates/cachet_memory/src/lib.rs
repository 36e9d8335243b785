// Copyright (c) Microsoft Corporation.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory storage backend for the cachet cache engine.
//!
//! This crate provides [`InMemoryStore`], a hash-map-backed implementation of
//! the [`CacheStore`](cachet_store::CacheStore) trait. It stores entries
//! exactly as given and resolves every operation immediately; expiry,
//! eviction, and capacity are left to the engine, which is what makes this
//! store usable as the reference backend for policy behavior.
//!
//! # Quick Start
//!
//! ```
//! use cachet_memory::InMemoryStore;
//! use cachet_store::{CacheEntry, CacheStore, Timestamp};
//!
//! # futures::executor::block_on(async {
//! let store = InMemoryStore::<String, i32>::new();
//!
//! let entry = CacheEntry::new(42, Timestamp::EPOCH, Timestamp::FAR_FUTURE);
//! store.put_entry(&"key".to_string(), entry).await?;
//! let value = store.get_entry(&"key".to_string()).await?;
//! assert_eq!(*value.unwrap().value(), 42);
//! # Ok::<(), cachet_store::Error>(())
//! # });
//! ```

mod store;

#[doc(inline)]
pub use store::InMemoryStore;
