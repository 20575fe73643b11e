//! One-shot timers and the debouncer built on top of them.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimerHandle(pub u64);

/// Schedule-once-after-delay primitive.
pub trait Timer {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle;

    /// Cancelling an already fired or unknown handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Cancel-and-reschedule debouncing over a [`Timer`].
///
/// At most one timer is armed at any time: arming clears the previous one
/// first.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn arm<T: Timer + ?Sized>(&mut self, timer: &mut T) -> TimerHandle {
        if let Some(previous) = self.pending.take() {
            timer.cancel(previous);
            trace!(handle = previous.0, "Cancelled pending debounce timer");
        }
        let handle = timer.schedule_once(self.delay);
        self.pending = Some(handle);
        handle
    }

    /// Returns true when `handle` is the currently armed timer, disarming it.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Default)]
struct ManualTimerState {
    now: Duration,
    next_id: u64,
    scheduled: BTreeMap<TimerHandle, Duration>,
}

/// Virtual-clock timer. Clones share one clock, so a host can keep a copy to
/// advance time while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualTimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().scheduled.len()
    }

    /// Earliest deadline among the armed timers.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.borrow().scheduled.values().min().copied()
    }

    /// Move the clock to `target` and return every timer due by then, ordered
    /// by deadline. The clock never moves backwards.
    pub fn advance_to(&self, target: Duration) -> Vec<TimerHandle> {
        let mut state = self.state.borrow_mut();
        if target > state.now {
            state.now = target;
        }
        let now = state.now;
        let mut due: Vec<(Duration, TimerHandle)> = state
            .scheduled
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(handle, deadline)| (*deadline, *handle))
            .collect();
        due.sort();
        for (_, handle) in &due {
            state.scheduled.remove(handle);
        }
        due.into_iter().map(|(_, handle)| handle).collect()
    }

    pub fn advance_by(&self, delta: Duration) -> Vec<TimerHandle> {
        let target = self.now() + delta;
        self.advance_to(target)
    }
}

impl Timer for ManualTimer {
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = TimerHandle(state.next_id);
        let deadline = state.now + delay;
        state.scheduled.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.state.borrow_mut().scheduled.remove(&handle);
    }
}
