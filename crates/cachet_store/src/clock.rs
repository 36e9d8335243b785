// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Injectable time source for cache bookkeeping.
//!
//! Expiry decisions are notoriously difficult to test against the real
//! clock. Every timestamp a cache writes therefore comes from a [`Clock`]
//! handle: in production a thin wrapper over the system clock, in tests a
//! frozen clock whose flow of time is driven explicitly through
//! [`ClockControl`].

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// An absolute point in time with microsecond resolution.
///
/// Stored as microseconds since the Unix epoch. All arithmetic saturates:
/// adding a huge duration clamps to [`Timestamp::FAR_FUTURE`] instead of
/// overflowing, which is how "never expires" is represented.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cachet_store::Timestamp;
///
/// let t0 = Timestamp::from_unix_micros(1_000);
/// let t1 = t0.saturating_add(Duration::from_micros(500));
/// assert_eq!(t1.as_unix_micros(), 1_500);
///
/// let never = t0.saturating_add(Duration::MAX);
/// assert_eq!(never, Timestamp::FAR_FUTURE);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch, the initial time of a frozen clock.
    pub const EPOCH: Self = Self(0);

    /// The latest representable instant, used as the "never expires" sentinel.
    pub const FAR_FUTURE: Self = Self(u64::MAX);

    /// Creates a timestamp from microseconds since the Unix epoch.
    #[must_use]
    pub const fn from_unix_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Returns this timestamp as microseconds since the Unix epoch.
    #[must_use]
    pub const fn as_unix_micros(self) -> u64 {
        self.0
    }

    /// Adds a duration, clamping to [`Timestamp::FAR_FUTURE`] on overflow.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let micros = u128::from(self.0).saturating_add(duration.as_micros());
        Self(u64::try_from(micros).unwrap_or(u64::MAX))
    }

    /// Returns the duration elapsed since `earlier`, or `None` if `earlier`
    /// is in the future of this timestamp.
    #[must_use]
    pub fn checked_duration_since(self, earlier: Self) -> Option<Duration> {
        self.0.checked_sub(earlier.0).map(Duration::from_micros)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let micros = time
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_micros());
        Self(u64::try_from(micros).unwrap_or(u64::MAX))
    }
}

/// Provides an abstraction for time-related operations.
///
/// Clocks are cheap to clone; cloned frozen clocks share the same flow of
/// time, allowing coordinated time control across all instances. The system
/// flavor reads the real wall clock and carries no shared state.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cachet_store::Clock;
///
/// let clock = Clock::new_frozen();
/// let deadline = clock.from_now(Duration::from_secs(60));
/// assert!(deadline > clock.now());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Clock {
    state: ClockState,
}

#[derive(Clone, Debug, Default)]
enum ClockState {
    #[default]
    System,
    Frozen(Arc<Mutex<Timestamp>>),
}

impl Clock {
    /// Creates a clock backed by the real system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ClockState::System,
        }
    }

    /// Creates a frozen clock pinned at the Unix epoch.
    ///
    /// The returned clock never advances on its own; use [`ClockControl`]
    /// when a test needs to move time forward.
    #[must_use]
    pub fn new_frozen() -> Self {
        Self::new_frozen_at(Timestamp::EPOCH)
    }

    /// Creates a frozen clock pinned at the given instant.
    #[must_use]
    pub fn new_frozen_at(now: Timestamp) -> Self {
        Self {
            state: ClockState::Frozen(Arc::new(Mutex::new(now))),
        }
    }

    /// Returns the current instant according to this clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        match &self.state {
            ClockState::System => SystemTime::now().into(),
            ClockState::Frozen(now) => *now.lock(),
        }
    }

    /// Returns the instant `duration` from now, saturating on overflow.
    #[must_use]
    pub fn from_now(&self, duration: Duration) -> Timestamp {
        self.now().saturating_add(duration)
    }
}

/// Controls the flow of time of a frozen [`Clock`].
///
/// Useful for testing time-sensitive code without having to wait for real
/// time to pass. All clocks produced by [`to_clock`](Self::to_clock), and
/// their clones, observe every [`advance`](Self::advance) and
/// [`set`](Self::set).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cachet_store::ClockControl;
///
/// let control = ClockControl::new();
/// let clock = control.to_clock();
///
/// let before = clock.now();
/// control.advance(Duration::from_secs(1));
///
/// assert_eq!(
///     clock.now().checked_duration_since(before),
///     Some(Duration::from_secs(1)),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ClockControl {
    now: Arc<Mutex<Timestamp>>,
}

impl Default for ClockControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockControl {
    /// Creates a control whose initial time is the Unix epoch.
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(Timestamp::EPOCH)
    }

    /// Creates a control whose initial time is the given instant.
    #[must_use]
    pub fn new_at(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Creates a frozen clock driven by this control.
    #[must_use]
    pub fn to_clock(&self) -> Clock {
        Clock {
            state: ClockState::Frozen(Arc::clone(&self.now)),
        }
    }

    /// Returns the control's current time.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        *self.now.lock()
    }

    /// Moves time forward by the given duration.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(duration);
    }

    /// Jumps time to the given instant, forward or backward.
    pub fn set(&self, now: Timestamp) {
        *self.now.lock() = now;
    }
}
