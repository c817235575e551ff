use std::cell::RefCell;

use web_time::{Duration, Instant};

pub type TimerId = u64;

/// Deferred single-shot callbacks.
///
/// Injected wherever something must happen "later" so tests can substitute
/// [`ManualTimers`] and drive deadlines by hand. A scheduled callback fires
/// at most once; cancelling an unknown or already-fired id is a no-op.
pub trait Timers {
    fn schedule(&self, delay: Duration, f: Box<dyn FnOnce()>) -> TimerId;
    fn cancel(&self, id: TimerId);
}

struct Entry {
    id: TimerId,
    due: Duration,
    f: Box<dyn FnOnce()>,
}

/// Frame-driven timer facility.
///
/// [`FrameTimers::advance`] moves a monotonic cursor and fires every
/// callback whose deadline has passed, in deadline order.
/// [`FrameTimers::tick`] advances by real elapsed time, which is what a
/// platform frame loop calls once per frame.
pub struct FrameTimers {
    inner: RefCell<FrameState>,
}

struct FrameState {
    now: Duration,
    last_tick: Instant,
    next_id: TimerId,
    pending: Vec<Entry>,
}

impl Default for FrameTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimers {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(FrameState {
                now: Duration::ZERO,
                last_tick: Instant::now(),
                next_id: 1,
                pending: Vec::new(),
            }),
        }
    }

    /// Advances the clock by `dt` and fires due callbacks in deadline
    /// order. Callbacks scheduled while firing wait for the next advance.
    pub fn advance(&self, dt: Duration) {
        let due = {
            let mut state = self.inner.borrow_mut();
            state.now += dt;
            let now = state.now;
            let mut due: Vec<Entry> = Vec::new();
            let mut i = 0;
            while i < state.pending.len() {
                if state.pending[i].due <= now {
                    due.push(state.pending.remove(i));
                } else {
                    i += 1;
                }
            }
            due.sort_by_key(|e| (e.due, e.id));
            due
        };
        for entry in due {
            (entry.f)();
        }
    }

    /// Advances by the wall-clock time elapsed since the previous tick.
    pub fn tick(&self) {
        let dt = {
            let mut state = self.inner.borrow_mut();
            let now = Instant::now();
            let dt = now.saturating_duration_since(state.last_tick);
            state.last_tick = now;
            dt
        };
        self.advance(dt);
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }
}

impl Timers for FrameTimers {
    fn schedule(&self, delay: Duration, f: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.inner.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + delay;
        state.pending.push(Entry { id, due, f });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.inner.borrow_mut().pending.retain(|e| e.id != id);
    }
}

struct ManualEntry {
    id: TimerId,
    delay: Duration,
    f: Box<dyn FnOnce()>,
}

/// Test double: records scheduled callbacks and lets tests inspect and
/// fire them by delay value, the way the suite pokes a mocked scheduler.
#[derive(Default)]
pub struct ManualTimers {
    inner: RefCell<ManualState>,
}

#[derive(Default)]
struct ManualState {
    next_id: TimerId,
    scheduled_total: usize,
    pending: Vec<ManualEntry>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many callbacks have ever been scheduled.
    pub fn scheduled_total(&self) -> usize {
        self.inner.borrow().scheduled_total
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn pending_delays(&self) -> Vec<Duration> {
        self.inner.borrow().pending.iter().map(|e| e.delay).collect()
    }

    /// Fires the pending callback with the given id. Returns false if no
    /// such callback is pending.
    pub fn fire(&self, id: TimerId) -> bool {
        let entry = {
            let mut state = self.inner.borrow_mut();
            let idx = state.pending.iter().position(|e| e.id == id);
            idx.map(|i| state.pending.remove(i))
        };
        match entry {
            Some(entry) => {
                (entry.f)();
                true
            }
            None => false,
        }
    }

    /// Fires the first pending callback scheduled with exactly `delay`.
    pub fn fire_first_with_delay(&self, delay: Duration) -> bool {
        let id = {
            let state = self.inner.borrow();
            state
                .pending
                .iter()
                .find(|e| e.delay == delay)
                .map(|e| e.id)
        };
        match id {
            Some(id) => self.fire(id),
            None => false,
        }
    }
}

impl Timers for ManualTimers {
    fn schedule(&self, delay: Duration, f: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.inner.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.scheduled_total += 1;
        state.pending.push(ManualEntry { id, delay, f });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.inner.borrow_mut().pending.retain(|e| e.id != id);
    }
}
