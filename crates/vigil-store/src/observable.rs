use std::cell::RefCell;
use std::rc::Rc;

use crate::store::{ObsId, StoreInner};

/// Observable value cell bound to a [`Store`](crate::Store).
///
/// Reads performed while a watch condition is being evaluated register a
/// dependency, so later writes re-evaluate that condition. Writes settle
/// immediately unless a transaction is open.
pub struct Observable<T> {
    store: Rc<StoreInner>,
    id: ObsId,
    value: Rc<RefCell<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            id: self.id,
            value: self.value.clone(),
        }
    }
}

impl<T: 'static> Observable<T> {
    pub(crate) fn new(store: Rc<StoreInner>, value: T) -> Self {
        let id = store.next_obs_id();
        Self {
            store,
            id,
            value: Rc::new(RefCell::new(value)),
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.store.track_read(self.id);
        self.value.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.store.mark_changed(self.id);
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.value.borrow_mut());
        self.store.mark_changed(self.id);
    }
}
