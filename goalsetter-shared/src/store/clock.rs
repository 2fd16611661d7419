/// Timestamp source for record `created_at` / `updated_at` fields

use chrono::{DateTime, Duration, Utc};

/// Supplies the current time to the store
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via `chrono::Utc::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Picks the timestamp for a modification of a record last touched at `previous`
///
/// Returns `now` when the clock has moved past `previous`, otherwise one
/// microsecond after `previous`. Successive updates therefore always carry
/// strictly increasing `updated_at` values, even with a coarse or frozen clock.
pub fn advance(now: DateTime<Utc>, previous: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
