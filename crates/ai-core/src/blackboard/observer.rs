use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use crate::{Blackboard, KeyId};

/// What an observer wants after handling a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverAction {
    Keep,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

/// Change handler. Receives the blackboard (read-only) and the key that changed.
pub type ObserverFn = dyn FnMut(&Blackboard, KeyId) -> ObserverAction;

pub(crate) type SharedObserver = Rc<RefCell<Box<ObserverFn>>>;

/// Key id -> handlers, in registration order.
#[derive(Default)]
pub(crate) struct ObserverTable {
    next_id: u64,
    by_key: HashMap<KeyId, BTreeMap<ObserverId, SharedObserver>>,
    keys: HashMap<ObserverId, KeyId>,
}

impl ObserverTable {
    pub(crate) fn insert(&mut self, key: KeyId, handler: Box<ObserverFn>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.by_key
            .entry(key)
            .or_default()
            .insert(id, Rc::new(RefCell::new(handler)));
        self.keys.insert(id, key);
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let Some(key) = self.keys.remove(&id) else {
            return false;
        };
        if let Some(handlers) = self.by_key.get_mut(&key) {
            handlers.remove(&id);
            if handlers.is_empty() {
                self.by_key.remove(&key);
            }
        }
        true
    }

    pub(crate) fn contains(&self, id: ObserverId) -> bool {
        self.keys.contains_key(&id)
    }

    pub(crate) fn count(&self, key: KeyId) -> usize {
        self.by_key.get(&key).map_or(0, BTreeMap::len)
    }

    pub(crate) fn total(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn snapshot(&self, key: KeyId) -> Vec<(ObserverId, SharedObserver)> {
        self.by_key
            .get(&key)
            .map(|handlers| {
                handlers
                    .iter()
                    .map(|(id, handler)| (*id, Rc::clone(handler)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Registration of one observer on one key.
///
/// Dropping the subscription (or calling [`Subscription::unsubscribe`]) removes the observer.
/// Removing an observer that is already gone is a no-op.
#[derive(Debug)]
#[must_use = "dropping a Subscription unregisters its observer"]
pub struct Subscription {
    id: ObserverId,
    key: KeyId,
    table: Weak<RefCell<ObserverTable>>,
}

impl Subscription {
    pub(crate) fn new(id: ObserverId, key: KeyId, table: Weak<RefCell<ObserverTable>>) -> Self {
        Self { id, key, table }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn key(&self) -> KeyId {
        self.key
    }

    /// `false` once the observer was removed, either explicitly, by returning
    /// [`ObserverAction::Remove`], or because the blackboard was dropped.
    pub fn is_active(&self) -> bool {
        self.table
            .upgrade()
            .is_some_and(|table| table.borrow().contains(self.id))
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        match table.try_borrow_mut() {
            Ok(mut table) => {
                table.remove(self.id);
            }
            Err(_) => tracing::error!(
                key = %self.key,
                observer = self.id.0,
                "observer table busy, subscription leaked"
            ),
        };
    }
}
