// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, a configurable in-memory store that
//! records all operations and supports failure injection for testing error
//! paths.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use crate::{CacheEntry, CacheStore, Error, Result};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp<K, V> {
    /// The entry count was queried.
    Len,
    /// Raw presence was checked for the given key.
    ContainsKey(K),
    /// An entry lookup was performed for the given key.
    GetEntry(K),
    /// An entry was inserted or replaced.
    PutEntry {
        /// The key that was written.
        key: K,
        /// The entry that was written.
        entry: CacheEntry<V>,
    },
    /// An entry was removed.
    Remove(K),
    /// All entries were removed.
    Clear,
    /// The key set was enumerated.
    Keys,
    /// The entry set was enumerated.
    Entries,
}

type FailPredicate<K, V> = Box<dyn Fn(&StoreOp<K, V>) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// This store keeps entries in memory and can be configured to fail
/// operations on demand, making it useful for testing error handling paths.
/// All operations are recorded for later verification.
///
/// # Examples
///
/// ```
/// use cachet_store::{CacheEntry, CacheStore, Timestamp};
/// use cachet_store::testing::{MockStore, StoreOp};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::<String, i32>::new();
/// let now = Timestamp::EPOCH;
///
/// let entry = CacheEntry::new(42, now, Timestamp::FAR_FUTURE);
/// store.put_entry(&"key".to_string(), entry.clone()).await?;
/// let read = store.get_entry(&"key".to_string()).await?;
/// assert_eq!(*read.unwrap().value(), 42);
///
/// assert_eq!(store.operations(), vec![
///     StoreOp::PutEntry { key: "key".to_string(), entry },
///     StoreOp::GetEntry("key".to_string()),
/// ]);
/// # Ok::<(), cachet_store::Error>(())
/// # });
/// ```
///
/// # Failure Injection
///
/// ```
/// use cachet_store::CacheStore;
/// use cachet_store::testing::{MockStore, StoreOp};
///
/// # futures::executor::block_on(async {
/// let store: MockStore<String, i32> = MockStore::new();
///
/// // Fail all entry lookups
/// store.fail_when(|op| matches!(op, StoreOp::GetEntry(_)));
/// assert!(store.get_entry(&"key".to_string()).await.is_err());
///
/// // Fail only specific keys
/// store.fail_when(|op| matches!(op, StoreOp::GetEntry(k) if k == "forbidden"));
/// assert!(store.get_entry(&"forbidden".to_string()).await.is_err());
/// assert!(store.get_entry(&"allowed".to_string()).await.is_ok());
/// # });
/// ```
pub struct MockStore<K, V> {
    data: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    operations: Arc<Mutex<Vec<StoreOp<K, V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<K, V>>>>,
}

impl<K, V> std::fmt::Debug for MockStore<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<K, V> Clone for MockStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> Default for MockStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockStore<K, V> {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K, V> MockStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<K, CacheEntry<V>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of stored entries without recording an operation.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns the stored entry for a key without recording an operation.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<CacheEntry<V>>
    where
        V: Clone,
    {
        self.data.lock().get(key).cloned()
    }
}

impl<K, V> MockStore<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should
    /// fail. Failed operations are still recorded, and leave the stored data
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachet_store::testing::{MockStore, StoreOp};
    ///
    /// let store: MockStore<String, i32> = MockStore::new();
    ///
    /// // Fail all operations
    /// store.fail_when(|_| true);
    ///
    /// // Fail only writes
    /// store.fail_when(|op| matches!(op, StoreOp::PutEntry { .. }));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp<K, V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp<K, V>> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: StoreOp<K, V>) -> Result<()> {
        let failed = self
            .fail_when
            .lock()
            .as_ref()
            .is_some_and(|predicate| predicate(&op));
        let kind = match &op {
            StoreOp::Len => "len",
            StoreOp::ContainsKey(_) => "contains_key",
            StoreOp::GetEntry(_) => "get_entry",
            StoreOp::PutEntry { .. } => "put_entry",
            StoreOp::Remove(_) => "remove",
            StoreOp::Clear => "clear",
            StoreOp::Keys => "keys",
            StoreOp::Entries => "entries",
        };
        self.operations.lock().push(op);
        if failed {
            return Err(Error::backend(format!("mock: {kind} failed")));
        }
        Ok(())
    }
}

impl<K, V> CacheStore<K, V> for MockStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn len(&self) -> Result<u64> {
        self.record(StoreOp::Len)?;
        Ok(self.data.lock().len() as u64)
    }

    async fn contains_key(&self, key: &K) -> Result<bool> {
        self.record(StoreOp::ContainsKey(key.clone()))?;
        Ok(self.data.lock().contains_key(key))
    }

    async fn get_entry(&self, key: &K) -> Result<Option<CacheEntry<V>>> {
        self.record(StoreOp::GetEntry(key.clone()))?;
        Ok(self.data.lock().get(key).cloned())
    }

    async fn put_entry(&self, key: &K, entry: CacheEntry<V>) -> Result<()> {
        self.record(StoreOp::PutEntry {
            key: key.clone(),
            entry: entry.clone(),
        })?;
        self.data.lock().insert(key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, key: &K) -> Result<()> {
        self.record(StoreOp::Remove(key.clone()))?;
        self.data.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.record(StoreOp::Clear)?;
        self.data.lock().clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<K>> {
        self.record(StoreOp::Keys)?;
        Ok(self.data.lock().keys().cloned().collect())
    }

    async fn entries(&self) -> Result<Vec<(K, CacheEntry<V>)>> {
        self.record(StoreOp::Entries)?;
        Ok(self
            .data
            .lock()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect())
    }
}
