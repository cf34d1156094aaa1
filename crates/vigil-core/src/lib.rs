//! # Conditional effect trees
//!
//! Vigil runs effects on the *edges* of a boolean condition over reactive
//! state, not on its level. There are three pieces:
//!
//! - [`whenever`] — the combinator: effect on every rising edge, cleanup on
//!   every falling edge, child nodes alive only in between.
//! - [`Dispose`] — single-use teardown handle returned by every node.
//! - [`Watch`] — the engine interface: anything that can arm a single-shot
//!   conditional watch over its own observable state.
//!
//! ## Edges
//!
//! A node starts armed for its predicate turning true. When that happens the
//! effect runs once and the node re-arms for the predicate turning false;
//! when *that* happens the cleanup runs once and the node re-arms for true
//! again, forever, until disposed:
//!
//! ```rust
//! use vigil_core::whenever;
//! use vigil_store::Store;
//!
//! let store = Store::new();
//! let visible = store.observable(false);
//! let fetches = store.observable(0);
//!
//! let dispose = whenever(
//!     &store,
//!     { let visible = visible.clone(); move || visible.get() },
//!     { let fetches = fetches.clone(); move || fetches.update(|n| *n += 1) },
//!     vec![],
//!     None,
//! );
//!
//! visible.set(true);
//! visible.set(false);
//! visible.set(true);
//! assert_eq!(fetches.get(), 2);
//! dispose.run();
//! ```
//!
//! Writes batched in one `store.transaction` settle as a single edge, no
//! matter how many tracked values changed.
//!
//! ## Child nodes
//!
//! The fourth argument is a list of factories. Each rising edge runs the
//! effect first, then hands its result to every factory in order; each
//! factory builds one child node and returns its disposer. The children live
//! until the parent's falling edge (or disposal), and are always torn down
//! before the parent's own cleanup runs:
//!
//! ```rust
//! use vigil_core::whenever;
//! use vigil_store::Store;
//!
//! let store = Store::new();
//! let submitting = store.observable(false);
//! let result = store.observable(None::<Vec<String>>);
//! let issues = store.observable(Vec::<String>::new());
//!
//! let dispose = whenever(
//!     &store,
//!     { let submitting = submitting.clone(); move || submitting.get() },
//!     || (),
//!     vec![Box::new({
//!         let store = store.clone();
//!         let result = result.clone();
//!         let issues = issues.clone();
//!         let submitting = submitting.clone();
//!         move |_: &()| {
//!             let result = result.clone();
//!             let issues = issues.clone();
//!             let submitting = submitting.clone();
//!             whenever(
//!                 &store,
//!                 { let result = result.clone(); move || result.get().is_some() },
//!                 move || {
//!                     if let Some(list) = result.get() {
//!                         issues.set(list);
//!                     }
//!                     submitting.set(false);
//!                 },
//!                 vec![],
//!                 None,
//!             )
//!         }
//!     })],
//!     None,
//! );
//!
//! store.transaction(|| {
//!     submitting.set(true);
//!     result.set(Some(vec!["first".into(), "second".into()]));
//! });
//! assert_eq!(issues.get().len(), 2);
//! assert!(!submitting.get());
//! dispose.run();
//! ```
//!
//! The factories themselves are only invoked on rising edges; a child that
//! wants to react to further state changes does so through its own
//! predicate, which may close over the value the parent handed it.
//!
//! ## Engines
//!
//! `whenever` never talks to observable state directly. It is generic over
//! [`Watch`], so it runs against `vigil-store` in production and against a
//! hand-stepped fake in tests. See the trait docs for the exact contract an
//! engine must honor.

pub mod dispose;
pub mod prelude;
pub mod watch;
pub mod whenever;

pub use dispose::*;
pub use watch::*;
pub use whenever::*;
