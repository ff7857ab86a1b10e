//! Live clock using the system clock.

use chrono::{DateTime, SubsecRound, Utc};

use crate::ports::clock::Clock;

/// Live clock that returns the real current time.
///
/// Truncated to milliseconds, the precision timestamps are stored with, so a
/// value handed back by a store equals the value read back from disk.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_wall_clock_at_millisecond_precision() {
        let before = Utc::now().trunc_subsecs(3);
        let now = LiveClock.now();
        assert!(now >= before);
        assert!(now <= Utc::now());
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
