//! # Keyed enter/leave transitions
//!
//! [`TransitionGroup`] wraps a container in a [`trellis_core::Host`] and
//! diffs each render's keyed children against the previous render:
//!
//! - children present in both renders stay mounted, in the new order;
//! - new children mount and run an enter lifecycle;
//! - removed children run a leave lifecycle and stay mounted until a
//!   completion signal arrives (or a deadline passes, which warns and
//!   leaves them in place).
//!
//! Children may carry [`trellis_core::LifecycleHooks`]; hooked transitions
//! are driven by the child through a [`trellis_core::Completion`]. Named
//! transitions mark the mounted node with `{name}-enter` / `{name}-leave`
//! classes and wait for [`TransitionGroup::transition_end`] from the
//! visual layer.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use trellis_core::{Host, LogDiagnostics, ManualTimers, View};
//! use trellis_motion::{ChildSet, TransitionConfig, TransitionGroup};
//!
//! let host = Rc::new(RefCell::new(Host::new()));
//! let container = host.borrow_mut().create_root();
//! let group = TransitionGroup::new(
//!     host.clone(),
//!     container,
//!     Rc::new(ManualTimers::new()),
//!     Rc::new(LogDiagnostics),
//! );
//!
//! let config = TransitionConfig::named("fade");
//! group
//!     .render(&config, ChildSet::from(vec![View::item("one").key("one")]))
//!     .unwrap();
//! assert_eq!(host.borrow().child_count(container), 1);
//! ```

pub mod group;
pub mod reconcile;

pub use group::*;
pub use reconcile::*;
