//! Wall-clock abstraction used for cooldown math.

use chrono::Utc;

/// Source of the current time in whole unix seconds.
pub trait Clock: Send + Sync {
    /// Current time, floored to the second.
    fn now_secs(&self) -> i64;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        Utc::now().timestamp()
    }
}
