use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use vigil_core::{Dispose, Watch};

use crate::observable::Observable;

new_key_type! {
    struct WatchKey;
}

pub(crate) type ObsId = u64;

struct WatchEntry {
    condition: Rc<dyn Fn() -> bool>,
    callback: Option<Box<dyn FnOnce()>>,
}

// Dependency edges between observables and the watches that read them
// during their last condition evaluation.
#[derive(Default)]
struct Graph {
    readers: HashMap<ObsId, HashSet<WatchKey>>,
    reads: HashMap<WatchKey, HashSet<ObsId>>,
}

impl Graph {
    fn record(&mut self, watch: WatchKey, obs: ObsId) {
        self.readers.entry(obs).or_default().insert(watch);
        self.reads.entry(watch).or_default().insert(obs);
    }

    fn clear_reads(&mut self, watch: WatchKey) {
        if let Some(reads) = self.reads.remove(&watch) {
            for obs in reads {
                if let Some(readers) = self.readers.get_mut(&obs) {
                    readers.remove(&watch);
                }
            }
        }
    }
}

const MAX_SETTLE_ROUNDS: usize = 100;

#[derive(Default)]
pub(crate) struct StoreInner {
    watches: RefCell<SlotMap<WatchKey, WatchEntry>>,
    graph: RefCell<Graph>,
    evaluating: Cell<Option<WatchKey>>,
    txn_depth: Cell<usize>,
    settling: Cell<bool>,
    dirty: RefCell<HashSet<ObsId>>,
    next_obs: Cell<ObsId>,
}

impl StoreInner {
    pub(crate) fn next_obs_id(&self) -> ObsId {
        let id = self.next_obs.get();
        self.next_obs.set(id + 1);
        id
    }

    pub(crate) fn track_read(&self, obs: ObsId) {
        if let Some(watch) = self.evaluating.get() {
            self.graph.borrow_mut().record(watch, obs);
        }
    }

    pub(crate) fn mark_changed(&self, obs: ObsId) {
        self.dirty.borrow_mut().insert(obs);
        if self.txn_depth.get() == 0 {
            self.settle();
        }
    }

    /// Re-evaluates `watch` under fresh dependency tracking; fires and
    /// retires it if its condition holds. Returns true if it fired.
    fn poll(&self, watch: WatchKey) -> bool {
        let Some(condition) = self.watches.borrow().get(watch).map(|e| e.condition.clone())
        else {
            return false;
        };
        self.graph.borrow_mut().clear_reads(watch);
        let prev = self.evaluating.replace(Some(watch));
        let holds = condition();
        self.evaluating.set(prev);
        if !holds {
            return false;
        }
        // Single-shot: retire the registration before the callback runs, so
        // re-entrant cancels and writes already see it as inert.
        let callback = self.watches.borrow_mut().remove(watch).and_then(|e| e.callback);
        self.graph.borrow_mut().clear_reads(watch);
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    pub(crate) fn settle(&self) {
        if self.settling.replace(true) {
            return;
        }
        struct Unsettle<'a>(&'a Cell<bool>);
        impl Drop for Unsettle<'_> {
            fn drop(&mut self) {
                self.0.set(false);
            }
        }
        let _reset = Unsettle(&self.settling);

        let mut rounds = 0;
        loop {
            let dirty = std::mem::take(&mut *self.dirty.borrow_mut());
            if dirty.is_empty() {
                break;
            }
            rounds += 1;
            if rounds > MAX_SETTLE_ROUNDS {
                log::warn!(
                    "store: watches still firing after {MAX_SETTLE_ROUNDS} settle rounds; \
                     dropping pending updates (feedback loop between effects?)"
                );
                break;
            }
            let affected: Vec<WatchKey> = {
                let watches = self.watches.borrow();
                let graph = self.graph.borrow();
                let mut hit: HashSet<WatchKey> = HashSet::new();
                for obs in &dirty {
                    if let Some(readers) = graph.readers.get(obs) {
                        hit.extend(readers);
                    }
                }
                // slot order keeps firing deterministic within a round
                watches.keys().filter(|key| hit.contains(key)).collect()
            };
            for watch in affected {
                self.poll(watch);
            }
        }
    }

    fn cancel(&self, watch: WatchKey) {
        if self.watches.borrow_mut().remove(watch).is_some() {
            self.graph.borrow_mut().clear_reads(watch);
        }
    }
}

/// Owner of observable state, dependency tracking, and armed watches.
///
/// Cheap to clone; all clones share one store. Single-threaded by
/// construction.
#[derive(Clone, Default)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an observable cell owned by this store.
    pub fn observable<T: 'static>(&self, value: T) -> Observable<T> {
        Observable::new(self.inner.clone(), value)
    }

    /// Runs `f` with writes batched: armed watches are evaluated at most
    /// once, after the outermost transaction ends. Nested transactions
    /// coalesce into the outermost one.
    pub fn transaction<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Exit<'a>(&'a Cell<usize>);
        impl Drop for Exit<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() - 1);
            }
        }
        let depth = &self.inner.txn_depth;
        depth.set(depth.get() + 1);
        let out = {
            let _exit = Exit(depth);
            f()
        };
        if depth.get() == 0 {
            self.inner.settle();
        }
        out
    }
}

impl Watch for Store {
    fn watch_once(
        &self,
        condition: Box<dyn Fn() -> bool>,
        callback: Box<dyn FnOnce()>,
    ) -> Dispose {
        let key = self.inner.watches.borrow_mut().insert(WatchEntry {
            condition: condition.into(),
            callback: Some(callback),
        });
        if self.inner.poll(key) {
            return Dispose::noop();
        }
        let inner = self.inner.clone();
        Dispose::new(move || inner.cancel(key))
    }
}
