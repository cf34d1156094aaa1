use crate::dispose::Dispose;

/// Reactive engine interface: single-shot conditional watches over
/// observable state.
///
/// [`whenever`](crate::whenever) is written against this trait alone, so any
/// engine honoring the contract below can drive it — `vigil_store::Store` in
/// practice, a hand-stepped fake in tests.
pub trait Watch {
    /// Arms `callback` to run exactly once when `condition` becomes true.
    ///
    /// The engine evaluates `condition` reactively. If it already holds,
    /// `callback` runs synchronously *during* registration and the returned
    /// handle is spent. Otherwise the engine re-evaluates `condition` at most
    /// once per settled mutation batch and runs `callback` the first time it
    /// holds, after which the registration is inert and never re-fires.
    ///
    /// Running the returned [`Dispose`] cancels a pending registration; once
    /// the watch has fired it is a no-op.
    fn watch_once(
        &self,
        condition: Box<dyn Fn() -> bool>,
        callback: Box<dyn FnOnce()>,
    ) -> Dispose;
}
