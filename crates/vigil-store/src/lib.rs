//! # Observable state with single-shot watches
//!
//! `vigil-store` is the reference engine behind `vigil_core::whenever`: a
//! single-threaded store of observable cells whose reads are tracked while a
//! watch condition is being evaluated, so the store knows exactly which
//! writes can change which conditions.
//!
//! - [`Store`] — owns the dependency graph, the armed watches, and the
//!   transaction state. Cheap to clone; clones share everything.
//! - [`Observable`] — a value cell bound to its store, with `get`/`set`/
//!   `update` in the usual shape.
//! - `Store` implements [`vigil_core::Watch`], the single-shot conditional
//!   watch primitive.
//!
//! ```rust
//! use vigil_core::Watch;
//! use vigil_store::Store;
//!
//! let store = Store::new();
//! let ready = store.observable(false);
//! let fired = store.observable(0);
//!
//! let cancel = store.watch_once(
//!     Box::new({ let ready = ready.clone(); move || ready.get() }),
//!     Box::new({ let fired = fired.clone(); move || fired.update(|n| *n += 1) }),
//! );
//! ready.set(true);
//! ready.set(false);
//! ready.set(true);
//! assert_eq!(fired.get(), 1);
//! drop(cancel);
//! ```
//!
//! Writes settle immediately unless a [`Store::transaction`] is open, in
//! which case every armed watch is evaluated at most once after the
//! outermost transaction ends, however many tracked values changed inside
//! it.

pub mod observable;
pub mod store;

pub use observable::*;
pub use store::*;
