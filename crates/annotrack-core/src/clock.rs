//! Clock sources that stamp version boundaries.
//!
//! Every timestamp handed out is truncated to microseconds, the precision the
//! store persists, so a boundary written as `valid_to` and the same instant
//! read back as `valid_from` compare equal.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::models::Timestamp;

/// Source of "now" for the record store.
///
/// Implementations must be monotonically non-decreasing within a process.
pub trait ClockSource: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Tell the clock about a timestamp already persisted, so later calls to
    /// `now()` never return anything earlier.
    fn observe(&self, _seen: Timestamp) {}
}

/// Drop sub-microsecond precision.
pub fn truncate_to_micros(t: Timestamp) -> Timestamp {
    from_micros(t.timestamp_micros())
}

fn from_micros(micros: i64) -> Timestamp {
    DateTime::from_timestamp_micros(micros).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Wall clock, strictly increasing at microsecond resolution.
///
/// A call that would not advance past the previous value returns the previous
/// value plus one microsecond, so two calls never share an instant.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_micros: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> Timestamp {
        let wall = Utc::now().timestamp_micros();
        let issued = match self
            .last_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last + 1))
            }) {
            Ok(prev) | Err(prev) => wall.max(prev + 1),
        };
        from_micros(issued)
    }

    fn observe(&self, seen: Timestamp) {
        self.last_micros
            .fetch_max(seen.timestamp_micros(), Ordering::SeqCst);
    }
}

/// Hand-driven clock for tests. Returns the same instant until moved.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(truncate_to_micros(start)),
        }
    }

    /// Starts at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock to `t`. Moving it backwards is the caller's business;
    /// the store rejects mutations stamped before the current version.
    pub fn set(&self, t: Timestamp) {
        *self.lock() = truncate_to_micros(t);
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        let mut guard = self.lock();
        *guard = truncate_to_micros(*guard + by);
        *guard
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Timestamp> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Timestamp {
        *self.lock()
    }

    fn observe(&self, seen: Timestamp) {
        let mut guard = self.lock();
        if seen > *guard {
            *guard = truncate_to_micros(seen);
        }
    }
}
