//! Source of "now" for version epochs and entry timestamps.

use chrono::{DateTime, Utc};

/// Supplies the current time to the refresh workflow
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, for deterministic runs
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Create a clock fixed at `seconds` since the Unix epoch.
    ///
    /// Out-of-range values fall back to the epoch itself.
    pub fn from_timestamp(seconds: i64) -> Self {
        FixedClock(DateTime::from_timestamp(seconds, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
