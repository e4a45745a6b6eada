use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::observer::{ObserverTable, Subscription};
use crate::{
    BbKey, BbType, BbValue, BlackboardError, BlackboardSchema, KeyComparison, KeyId,
    ObserverAction,
};

/// Typed key/value memory of one agent.
///
/// Every key of the schema owns one slot, initialized to the type default. Writes that change a
/// slot synchronously run the observers registered for that key before returning. Observers only
/// receive `&Blackboard`, so a write from inside a notification does not compile.
pub struct Blackboard {
    schema: Arc<BlackboardSchema>,
    values: Vec<BbValue>,
    observers: Rc<RefCell<ObserverTable>>,
}

impl Blackboard {
    pub fn new(schema: Arc<BlackboardSchema>) -> Self {
        let values = schema
            .entries()
            .iter()
            .map(|e| e.key_type.default_value())
            .collect();
        Self {
            schema,
            values,
            observers: Rc::default(),
        }
    }

    pub fn schema(&self) -> &BlackboardSchema {
        &self.schema
    }

    pub fn value(&self, key: KeyId) -> Option<&BbValue> {
        self.values.get(key.index())
    }

    pub fn try_get<T: BbType>(&self, key: BbKey<T>) -> Option<T> {
        self.value(key.id()).and_then(T::from_value)
    }

    /// Typed read; falls back to `T::sentinel()` for unknown or mismatched keys.
    pub fn get<T: BbType>(&self, key: BbKey<T>) -> T {
        self.try_get(key).unwrap_or_else(T::sentinel)
    }

    pub fn set<T: BbType>(&mut self, key: BbKey<T>, value: T) -> Result<bool, BlackboardError> {
        self.set_value(key.id(), value.into_value())
    }

    /// Store `value` in `key`'s slot.
    ///
    /// Returns `Ok(true)` when the stored value changed (observers ran), `Ok(false)` when it was
    /// already identical. A value of the wrong type leaves the slot untouched.
    pub fn set_value(&mut self, key: KeyId, value: BbValue) -> Result<bool, BlackboardError> {
        let declared = self
            .schema
            .key_type(key)
            .ok_or(BlackboardError::UnknownKey(key))?;

        let actual = value.key_type();
        if actual != declared {
            tracing::warn!(
                key = %key,
                name = %self.key_label(key),
                ?declared,
                ?actual,
                "rejected blackboard write with mismatched type"
            );
            return Err(BlackboardError::TypeMismatch {
                key,
                declared,
                actual,
            });
        }

        let slot = self
            .values
            .get_mut(key.index())
            .ok_or(BlackboardError::UnknownKey(key))?;
        if slot.same_bits(&value) {
            return Ok(false);
        }
        *slot = value;

        self.notify(key);
        Ok(true)
    }

    /// Reset `key` to its type default.
    pub fn clear_value(&mut self, key: KeyId) -> Result<bool, BlackboardError> {
        let declared = self
            .schema
            .key_type(key)
            .ok_or(BlackboardError::UnknownKey(key))?;
        self.set_value(key, declared.default_value())
    }

    /// Compare the current values of two keys.
    ///
    /// Unknown keys and keys of different types compare as `NotEqual`.
    pub fn compare(&self, a: KeyId, b: KeyId) -> KeyComparison {
        match (self.value(a), self.value(b)) {
            (Some(va), Some(vb)) => va.compare(vb),
            _ => KeyComparison::NotEqual,
        }
    }

    /// Register `handler` for changes of `key`.
    ///
    /// Handlers of a key run in registration order. A handler registered while a notification is
    /// in flight is first called on the next change.
    pub fn observe<F>(&self, key: KeyId, handler: F) -> Result<Subscription, BlackboardError>
    where
        F: FnMut(&Blackboard, KeyId) -> ObserverAction + 'static,
    {
        if !self.schema.contains(key) {
            return Err(BlackboardError::UnknownKey(key));
        }
        let id = self.observers.borrow_mut().insert(key, Box::new(handler));
        tracing::trace!(key = %key, "blackboard observer registered");
        Ok(Subscription::new(id, key, Rc::downgrade(&self.observers)))
    }

    pub fn observer_count(&self, key: KeyId) -> usize {
        self.observers.borrow().count(key)
    }

    pub fn total_observer_count(&self) -> usize {
        self.observers.borrow().total()
    }

    fn notify(&self, key: KeyId) {
        let handlers = self.observers.borrow().snapshot(key);
        if handlers.is_empty() {
            return;
        }
        tracing::trace!(key = %key, observers = handlers.len(), "notifying blackboard observers");

        for (id, handler) in handlers {
            // Removed by an earlier handler of this round.
            if !self.observers.borrow().contains(id) {
                continue;
            }
            let action = {
                let mut handler = handler.borrow_mut();
                (&mut **handler)(self, key)
            };
            if action == ObserverAction::Remove {
                self.observers.borrow_mut().remove(id);
            }
        }
    }

    fn key_label(&self, key: KeyId) -> String {
        self.schema
            .key_name(key)
            .map(|n| n.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (entry, value) in self.schema.entries().iter().zip(&self.values) {
            map.entry(&entry.name.as_str(), value);
        }
        map.finish()
    }
}
