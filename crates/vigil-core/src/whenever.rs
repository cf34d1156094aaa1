use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

use crate::dispose::Dispose;
use crate::watch::Watch;

/// Builds one child node from the parent's captured effect result and
/// returns the child's disposer.
pub type ChildFactory<R> = Box<dyn Fn(&R) -> Dispose>;

/// Cleanup invoked on each falling edge whose activation ran the effect.
pub type Unsubscribe = Box<dyn Fn()>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Edge {
    Rising,
    Falling,
}

impl Edge {
    fn flip(self) -> Edge {
        match self {
            Edge::Rising => Edge::Falling,
            Edge::Falling => Edge::Rising,
        }
    }
}

struct Node<R, W> {
    engine: W,
    predicate: Box<dyn Fn() -> bool>,
    effect: Box<dyn Fn() -> R>,
    children: Vec<ChildFactory<R>>,
    unsubscribe: Option<Unsubscribe>,
    /// Which transition the live registration waits for. Alternates on every
    /// firing.
    armed: Cell<Edge>,
    /// True exactly between an effect run and the matching cleanup/teardown.
    cleanup_pending: Cell<bool>,
    child_disposers: RefCell<SmallVec<[Dispose; 2]>>,
    /// Cancel handle of the pending registration, if any.
    watch: RefCell<Option<Dispose>>,
    disposed: Cell<bool>,
}

impl<R: 'static, W: Watch + 'static> Node<R, W> {
    fn arm(node: &Rc<Self>) {
        if node.disposed.get() {
            return;
        }
        let want = node.armed.get() == Edge::Rising;
        let condition = {
            let node = node.clone();
            Box::new(move || (node.predicate)() == want)
        };
        let fired = Rc::new(Cell::new(false));
        let callback = {
            let node = node.clone();
            let fired = fired.clone();
            Box::new(move || {
                fired.set(true);
                Node::fire(&node);
            })
        };
        let guard = node.engine.watch_once(condition, callback);
        if fired.get() || node.disposed.get() {
            // The registration fired synchronously (its handler already
            // armed the successor deeper in this call) or the node was torn
            // down mid-fire; either way `guard` must not displace the handle
            // that is actually live.
            guard.run();
            return;
        }
        *node.watch.borrow_mut() = Some(guard);
    }

    fn fire(node: &Rc<Self>) {
        if node.disposed.get() {
            return;
        }
        match node.armed.get() {
            Edge::Rising => {
                let result = (node.effect)();
                if node.disposed.get() {
                    return;
                }
                let spawned: SmallVec<[Dispose; 2]> =
                    node.children.iter().map(|child| child(&result)).collect();
                log::trace!("whenever: rising edge ({} children)", spawned.len());
                *node.child_disposers.borrow_mut() = spawned;
                node.cleanup_pending.set(true);
            }
            Edge::Falling => {
                log::trace!("whenever: falling edge");
                node.drop_children();
                if node.cleanup_pending.replace(false)
                    && let Some(unsubscribe) = &node.unsubscribe
                {
                    unsubscribe();
                }
            }
        }
        if node.disposed.get() {
            return;
        }
        node.armed.set(node.armed.get().flip());
        Self::arm(node);
    }

    fn drop_children(&self) {
        let live = std::mem::take(&mut *self.child_disposers.borrow_mut());
        for child in live {
            child.run();
        }
    }

    fn teardown(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.drop_children();
        if self.cleanup_pending.replace(false)
            && let Some(unsubscribe) = &self.unsubscribe
        {
            unsubscribe();
        }
        if let Some(watch) = self.watch.borrow_mut().take() {
            watch.run();
        }
    }
}

/// Runs `effect` on every rising edge of `predicate` and `unsubscribe` on
/// every falling edge, managing a tree of child nodes that only exist while
/// the effect is active.
///
/// Each rising edge runs the effect first, then passes its result by
/// reference to every entry of `children` in order; each factory constructs
/// one child node and hands back its disposer. On the following falling edge
/// the children are disposed in the same order, before `unsubscribe` runs,
/// and the node re-arms for the next cycle indefinitely.
///
/// If `predicate` already holds, the engine fires during registration and
/// the effect runs before `whenever` returns.
///
/// The returned [`Dispose`] tears the whole subtree down: live children
/// first, then the node's own cleanup (only if the effect has run since the
/// last falling edge), then the armed watch. Running it twice is a no-op.
/// Dropping it without running it leaves the node armed indefinitely.
///
/// Failures are not managed: a panic in `predicate`, `effect`, a factory, or
/// `unsubscribe` propagates to whoever triggered the firing and leaves the
/// node wherever the unwind found it. Best-effort, caller-supervised.
pub fn whenever<R, W>(
    engine: &W,
    predicate: impl Fn() -> bool + 'static,
    effect: impl Fn() -> R + 'static,
    children: Vec<ChildFactory<R>>,
    unsubscribe: Option<Unsubscribe>,
) -> Dispose
where
    R: 'static,
    W: Watch + Clone + 'static,
{
    let node = Rc::new(Node {
        engine: engine.clone(),
        predicate: Box::new(predicate),
        effect: Box::new(effect),
        children,
        unsubscribe,
        armed: Cell::new(Edge::Rising),
        cleanup_pending: Cell::new(false),
        child_disposers: RefCell::new(SmallVec::new()),
        watch: RefCell::new(None),
        disposed: Cell::new(false),
    });
    Node::arm(&node);
    Dispose::new(move || node.teardown())
}
