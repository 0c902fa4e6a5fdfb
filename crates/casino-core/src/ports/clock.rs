//! Time port for testable time operations.

use chrono::{DateTime, Utc};

/// Port for time operations.
///
/// Allows injecting fake time in tests while using real time in production.
pub trait Clock: Send + Sync {
    /// Get current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Get current Unix timestamp (seconds since epoch).
    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Production clock that returns real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time.
///
/// Uses an atomic so it can be shared across tasks without a lock.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct FakeClock {
    time: std::sync::atomic::AtomicI64,
}

#[cfg(any(test, feature = "test-utils"))]
impl FakeClock {
    #[must_use]
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: std::sync::atomic::AtomicI64::new(time.timestamp()),
        }
    }

    #[must_use]
    pub fn epoch() -> Self {
        Self {
            time: std::sync::atomic::AtomicI64::new(0),
        }
    }

    pub fn advance(&self, duration: chrono::Duration) {
        self.time
            .fetch_add(duration.num_seconds(), std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: DateTime<Utc>) {
        self.time
            .store(time.timestamp(), std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.time.load(std::sync::atomic::Ordering::SeqCst), 0)
            .unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for FakeClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}
