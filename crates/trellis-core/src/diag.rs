use std::cell::RefCell;

/// Sink for non-fatal diagnostics.
///
/// A missed transition completion is worth telling someone about, but it is
/// never an error. The sink is injected next to [`crate::Timers`] so tests
/// can count what was reported.
pub trait Diagnostics {
    fn warn(&self, message: &str);
}

/// Default sink: forwards to the `log` facade.
///
/// ```rust
/// use trellis_core::{Diagnostics, LogDiagnostics};
///
/// LogDiagnostics.warn("transition never completed");
/// ```
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Test sink that retains every message.
#[derive(Default)]
pub struct CountingDiagnostics {
    messages: RefCell<Vec<String>>,
}

impl CountingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Diagnostics for CountingDiagnostics {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
