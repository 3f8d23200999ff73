use chrono::{DateTime, Duration, Utc};
use mockview_store::Clock;
use parking_lot::Mutex;

/// Clock returning a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2024-05-01T12:00:00Z
        Self::new(DateTime::from_timestamp(1_714_564_800, 0).unwrap_or_default())
    }
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
