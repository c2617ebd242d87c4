//! Clock port - abstraction over wall-clock time so expiry is testable.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}
