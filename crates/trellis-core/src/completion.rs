use std::cell::RefCell;
use std::rc::Rc;

/// Side of the child lifecycle a completion signal belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    Enter,
    Leave,
}

/// One-shot completion signal handed to `will_enter` / `will_leave` hooks.
///
/// The wrapper constructs it around the continuation that advances the
/// child's state; the child calls [`Completion::finish`] once its
/// transition is done. [`Completion::phase`] tells a hook shared between
/// both sides of the lifecycle which one it is finishing. Finishing twice
/// is harmless, the continuation runs at most once.
#[derive(Clone)]
pub struct Completion {
    phase: TransitionPhase,
    continuation: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl Completion {
    pub fn new(phase: TransitionPhase, f: impl FnOnce() + 'static) -> Self {
        Self {
            phase,
            continuation: Rc::new(RefCell::new(Some(Box::new(f)))),
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn finish(&self) {
        if let Some(f) = self.continuation.borrow_mut().take() {
            f()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.continuation.borrow().is_none()
    }
}
