//! Session expiry
//!
//! Expiry is evaluated lazily at lookup time against an injectable clock.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = *now + by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Session lifetime rule
///
/// A duration of zero or less means sessions never expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpiryPolicy {
    duration_seconds: i64,
}

impl ExpiryPolicy {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn seconds(duration_seconds: i64) -> Self {
        Self { duration_seconds }
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }

    pub fn expires(&self) -> bool {
        self.duration_seconds > 0
    }

    /// Whether a session created at `created_at` is past its window at `now`
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if !self.expires() {
            return false;
        }
        created_at + Duration::seconds(self.duration_seconds) < now
    }
}
