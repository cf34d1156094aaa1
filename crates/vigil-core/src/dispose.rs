use std::cell::RefCell;
use std::rc::Rc;

/// Single-use teardown handle.
///
/// Cloning shares the underlying closure; across all clones it runs at most
/// once. Calling [`run`](Dispose::run) again is a no-op, as is running the
/// handle of a watch that has already fired.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// A handle that was spent on arrival, for registrations consumed during
    /// their own construction.
    pub fn noop() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        if let Some(f) = self.0.borrow_mut().take() {
            f()
        }
    }

    /// True once the closure has run, or if there never was one.
    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }
}
