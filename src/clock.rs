//! Clock

use std::cell::Cell;

use jiff::Timestamp;

/// Source of the current time in Unix milliseconds.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Timestamp::now().as_millisecond()
    }
}

/// Clock that returns a fixed instant, optionally stepping after every read.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    millis: Cell<i64>,
    step: i64,
}

impl FixedClock {
    /// A clock that always reads `millis`.
    pub fn new(millis: i64) -> Self {
        Self::stepping(millis, 0)
    }

    /// A clock that reads `millis` first and advances by `step` after each read.
    pub fn stepping(millis: i64, step: i64) -> Self {
        Self {
            millis: Cell::new(millis),
            step,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        let now = self.millis.get();

        self.millis.set(now.saturating_add(self.step));

        now
    }
}
