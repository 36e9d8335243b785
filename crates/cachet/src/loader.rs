// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! On-miss value loading.
//!
//! A cache may be configured with a loader that manufactures values for
//! missing keys. When a read finds no live entry, the engine invokes the
//! loader; a produced value is inserted as a fresh entry, through the same
//! capacity accounting as an explicit write, and returned to the caller.
//! Loader failures propagate and are never cached, so a later read retries.

use cachet_store::BoxError;

/// Manufactures values for keys the cache cannot serve.
///
/// `load` returning `Ok(None)` means the loader has no value for the key;
/// the read then reports a miss. Errors surface to the caller as
/// [`Error::Loader`](cachet_store::Error::Loader).
///
/// # Examples
///
/// ```
/// use cachet::loader::CacheLoader;
/// use cachet_store::BoxError;
///
/// #[derive(Debug)]
/// struct Doubler;
///
/// impl CacheLoader<u32, u64> for Doubler {
///     async fn load(&self, key: &u32) -> Result<Option<u64>, BoxError> {
///         Ok(Some(u64::from(*key) * 2))
///     }
/// }
/// ```
pub trait CacheLoader<K, V>: Send + Sync {
    /// Produces a value for the key, or `None` if the loader has nothing.
    fn load(&self, key: &K) -> impl Future<Output = Result<Option<V>, BoxError>> + Send
    where
        K: Sync;
}

/// The default loader: never produces a value.
///
/// A cache built without an explicit loader uses this, so a read of an
/// absent key is simply a miss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoLoader;

impl<K, V> CacheLoader<K, V> for NoLoader {
    async fn load(&self, _key: &K) -> Result<Option<V>, BoxError>
    where
        K: Sync,
    {
        Ok(None)
    }
}
