//! Clock implementations.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Production clock reading `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(Timestamp::from_datetime(start)),
        }
    }

    /// Moves time forward by `secs`.
    pub fn advance_secs(&self, secs: u64) {
        let mut now = self.now.lock();
        *now = now.plus_secs(secs);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}
