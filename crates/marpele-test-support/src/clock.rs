//! Frozen time for tests.

use chrono::{DateTime, Utc};
use marpele_core::clock::Clock;

/// Reports the same instant on every call, so event timestamps and idle
/// cutoffs are exact in assertions.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
