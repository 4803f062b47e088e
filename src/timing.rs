//! Time source and tick scheduling collaborators.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source. Values only ever increase.
pub trait Clock {
    /// Returns time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic runs. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Identifies one armed repeating timer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TimerId(u64);

/// Repeating-callback scheduler. The owner polls [`Scheduler::due`] and runs
/// whatever fired; cancelled timers never fire again.
pub trait Scheduler {
    /// Arms a timer that first fires `interval` after `now` and then repeats.
    fn arm(&mut self, now: Duration, interval: Duration) -> TimerId;

    fn cancel(&mut self, id: TimerId);

    /// Returns the timers due at `now` and schedules their next firing.
    fn due(&mut self, now: Duration) -> Vec<TimerId>;
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    id: TimerId,
    interval: Duration,
    next_due: Duration,
}

/// Fixed-interval scheduler. A late poll fires a timer once and re-arms it
/// from the poll time; missed periods are not replayed.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    timers: Vec<ArmedTimer>,
    next_id: u64,
}

impl IntervalScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of armed timers.
    #[must_use]
    pub fn armed(&self) -> usize {
        self.timers.len()
    }
}

impl Scheduler for IntervalScheduler {
    fn arm(&mut self, now: Duration, interval: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(ArmedTimer {
            id,
            interval,
            next_due: now + interval,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|timer| timer.id != id);
    }

    fn due(&mut self, now: Duration) -> Vec<TimerId> {
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            if timer.next_due <= now {
                timer.next_due = now + timer.interval;
                fired.push(timer.id);
            }
        }
        fired
    }
}
