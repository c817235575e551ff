//! # Trellis core
//!
//! The retained pieces underneath a transition-managed view tree:
//!
//! - [`View`] — tree description handed to the host.
//! - [`Host`] — retained mount tree with structure queries.
//! - [`Timers`] — deferred single-shot callbacks ([`FrameTimers`] for frame
//!   loops, [`ManualTimers`] for tests).
//! - [`Diagnostics`] — warning sink ([`LogDiagnostics`] forwards to the
//!   `log` facade).
//! - [`Revision`] — monotonic change counter embedders observe to know
//!   when to repaint.
//! - [`Completion`] — one-shot, phase-tagged signal a child fires when a
//!   transition is done.
//!
//! Everything here is single-threaded and callback-driven. Collaborators
//! (host, timers, diagnostics) are passed in explicitly rather than read
//! from globals, so tests can substitute deterministic doubles:
//!
//! ```rust
//! use trellis_core::*;
//!
//! let mut host = Host::new();
//! let root = host.create_root();
//! let child = host.mount(root, 0, &View::item("one").key("one")).unwrap();
//! assert_eq!(host.child_count(root), 1);
//! assert_eq!(host.ident(child), Some("one"));
//! ```

pub mod completion;
pub mod diag;
pub mod error;
pub mod host;
pub mod revision;
pub mod tests;
pub mod timer;
pub mod view;

pub use completion::*;
pub use diag::*;
pub use error::*;
pub use host::*;
pub use revision::*;
pub use timer::*;
pub use view::*;
