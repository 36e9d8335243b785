// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Expiry policies: when entries stop being live.
//!
//! A policy yields a time-to-live for each entry lifecycle event. The engine
//! turns the duration into an absolute expiry instant
//! (`now + duration`, saturating) and persists it on the entry; a duration
//! of zero produces an entry that is already expired. Events where a policy
//! returns `None` leave the stored expiry instant untouched.

use std::fmt::Debug;
use std::time::Duration;

/// Decides the time-to-live of an entry at each lifecycle event.
///
/// Policies are pure: they inspect nothing and cannot fail. Creation always
/// yields a duration; access and modification may decline (`None`) to leave
/// the current expiry instant unchanged.
pub trait ExpiryPolicy: Debug + Send + Sync {
    /// Time-to-live granted when an entry is created.
    fn on_created(&self) -> Duration;

    /// Time-to-live granted on a successful read, or `None` to leave the
    /// expiry instant unchanged.
    fn on_accessed(&self) -> Option<Duration>;

    /// Time-to-live granted when the value is replaced, or `None` to leave
    /// the expiry instant unchanged.
    fn on_modified(&self) -> Option<Duration>;
}

/// Entries never expire.
///
/// Creation grants `Duration::MAX`, which saturates to the far-future
/// sentinel instant; reads and writes leave it there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EternalExpiry;

impl ExpiryPolicy for EternalExpiry {
    fn on_created(&self) -> Duration {
        Duration::MAX
    }

    fn on_accessed(&self) -> Option<Duration> {
        None
    }

    fn on_modified(&self) -> Option<Duration> {
        None
    }
}

/// Entries expire a fixed duration after creation.
///
/// Neither reads nor writes extend the lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatedExpiry {
    ttl: Duration,
}

impl CreatedExpiry {
    /// Creates a policy granting `ttl` from the moment of creation.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl ExpiryPolicy for CreatedExpiry {
    fn on_created(&self) -> Duration {
        self.ttl
    }

    fn on_accessed(&self) -> Option<Duration> {
        None
    }

    fn on_modified(&self) -> Option<Duration> {
        None
    }
}

/// Entries expire a fixed duration after the most recent read.
///
/// Every successful read pushes the expiry instant to `access + ttl`;
/// replacing the value does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessedExpiry {
    ttl: Duration,
}

impl AccessedExpiry {
    /// Creates a policy granting `ttl` from creation and from each read.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl ExpiryPolicy for AccessedExpiry {
    fn on_created(&self) -> Duration {
        self.ttl
    }

    fn on_accessed(&self) -> Option<Duration> {
        Some(self.ttl)
    }

    fn on_modified(&self) -> Option<Duration> {
        None
    }
}

/// Entries expire a fixed duration after the most recent write.
///
/// Replacing the value pushes the expiry instant to `update + ttl`; reads
/// do not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModifiedExpiry {
    ttl: Duration,
}

impl ModifiedExpiry {
    /// Creates a policy granting `ttl` from creation and from each write.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl ExpiryPolicy for ModifiedExpiry {
    fn on_created(&self) -> Duration {
        self.ttl
    }

    fn on_accessed(&self) -> Option<Duration> {
        None
    }

    fn on_modified(&self) -> Option<Duration> {
        Some(self.ttl)
    }
}

/// Entries expire a fixed duration after the most recent read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchedExpiry {
    ttl: Duration,
}

impl TouchedExpiry {
    /// Creates a policy granting `ttl` from creation and from every touch.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl ExpiryPolicy for TouchedExpiry {
    fn on_created(&self) -> Duration {
        self.ttl
    }

    fn on_accessed(&self) -> Option<Duration> {
        Some(self.ttl)
    }

    fn on_modified(&self) -> Option<Duration> {
        Some(self.ttl)
    }
}
