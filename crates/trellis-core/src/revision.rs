use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Monotonic change counter for a group's mounted structure.
///
/// Every structural change (a render, a transition completing, a deferred
/// unmount) advances the counter and notifies observers, so an embedding
/// renderer knows a repaint is due without polling the host. Clones share
/// the counter.
#[derive(Clone, Default)]
pub struct Revision {
    inner: Rc<RevisionInner>,
}

#[derive(Default)]
struct RevisionInner {
    counter: Cell<u64>,
    observers: RefCell<Vec<Box<dyn Fn(u64)>>>,
}

impl Revision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.inner.counter.get()
    }

    /// Advances the counter and hands the new value to every observer.
    pub fn bump(&self) {
        let next = self.inner.counter.get().wrapping_add(1);
        self.inner.counter.set(next);
        for observer in self.inner.observers.borrow().iter() {
            observer(next);
        }
    }

    /// Observers live as long as the counter; drop every clone to drop
    /// them.
    pub fn observe(&self, f: impl Fn(u64) + 'static) {
        self.inner.observers.borrow_mut().push(Box::new(f));
    }
}
