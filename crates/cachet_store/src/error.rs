// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache operations.

use std::error::Error as StdError;

/// A boxed error suitable for carrying any storage or loader failure.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// An error from a cache operation.
///
/// The cache performs no recovery of its own: storage failures surface
/// verbatim to the caller, and loader failures propagate without the failed
/// result being cached. The original typed error remains extractable.
///
/// # For `CacheStore` Implementers
///
/// Wrap your storage-specific errors using [`backend`](Self::backend):
///
/// ```ignore
/// impl CacheStore<K, V> for RedisStore {
///     async fn get_entry(&self, key: &K) -> Result<Option<CacheEntry<V>>> {
///         self.client.get(key).await.map_err(Error::backend)
///     }
/// }
/// ```
///
/// # For Consumers
///
/// Extract the underlying error using [`source_as`](Self::source_as):
///
/// ```
/// use cachet_store::Error;
///
/// let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
/// let error = Error::backend(io_err);
///
/// assert!(error.source_as::<std::io::Error>().is_some());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A failure reported by the storage backend. Propagated without retry.
    #[error("storage backend failure: {0}")]
    Backend(#[source] BoxError),

    /// A failure reported by the cache loader. The failed result is never
    /// cached, so a later read retries the loader.
    #[error("cache loader failure: {0}")]
    Loader(#[source] BoxError),
}

impl Error {
    /// Creates a backend error wrapping a cause.
    pub fn backend(cause: impl Into<BoxError>) -> Self {
        Self::Backend(cause.into())
    }

    /// Creates a loader error wrapping a cause.
    pub fn loader(cause: impl Into<BoxError>) -> Self {
        Self::Loader(cause.into())
    }

    /// Returns true if this error came from the storage backend.
    #[must_use]
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Returns true if this error came from the cache loader.
    #[must_use]
    pub fn is_loader(&self) -> bool {
        matches!(self, Self::Loader(_))
    }

    /// Returns `true` if the wrapped cause is of type `T`.
    #[must_use]
    pub fn is_source<T: StdError + 'static>(&self) -> bool {
        self.source_as::<T>().is_some()
    }

    /// Returns the wrapped cause as type `T` if it matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachet_store::Error;
    ///
    /// let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
    /// let error = Error::backend(io_err);
    ///
    /// if let Some(io_err) = error.source_as::<std::io::Error>() {
    ///     assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
    /// }
    /// ```
    #[must_use]
    pub fn source_as<T: StdError + 'static>(&self) -> Option<&T> {
        let (Self::Backend(cause) | Self::Loader(cause)) = self;
        cause.downcast_ref::<T>()
    }
}

/// A specialized [`Result`] type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;
