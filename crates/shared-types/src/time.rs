//! # Time Source
//!
//! Abstract clock so lifecycle rules ("is this unit expired?") and reports
//! ("trailing 30 days") can be tested against a fixed instant.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

/// Point in time used throughout the service (UTC).
pub type Timestamp = DateTime<Utc>;

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Default time source using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: RwLock<Timestamp>,
}

impl FixedTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_time_source_advances() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedTimeSource::new(start);
        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), start + Duration::days(2));
    }
}
