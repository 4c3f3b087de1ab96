//! Time source.

use chrono::{DateTime, Utc};

/// Supplies the instant stamped onto events. Idle expiry compares against
/// the same source, so tests can freeze both.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
