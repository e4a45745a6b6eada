use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BbKey, BbType, BlackboardError, KeyId, KeyType, Name};

/// One declared key of a blackboard asset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlackboardEntry {
    pub name: Name,
    pub key_type: KeyType,
}

impl BlackboardEntry {
    pub fn new(name: impl Into<Name>, key_type: KeyType) -> Self {
        Self {
            name: name.into(),
            key_type,
        }
    }
}

/// Resolved key table of a blackboard asset.
///
/// Key IDs are entry indices and never change once the schema is built. Keys inherited from a
/// parent schema come first, so a child schema resolves every parent key to the same ID.
#[derive(Debug, Clone, Default)]
pub struct BlackboardSchema {
    entries: Vec<BlackboardEntry>,
    index: HashMap<Name, KeyId>,
    inherited: usize,
}

impl BlackboardSchema {
    /// Largest number of keys a schema can hold (`KeyId::INVALID` is reserved).
    pub const MAX_KEYS: usize = u16::MAX as usize;

    pub fn builder() -> BlackboardSchemaBuilder {
        BlackboardSchemaBuilder::default()
    }

    pub fn builder_with_parent(parent: &BlackboardSchema) -> BlackboardSchemaBuilder {
        BlackboardSchemaBuilder {
            entries: parent.entries.clone(),
            inherited: parent.entries.len(),
        }
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = BlackboardEntry>,
    ) -> Result<Self, BlackboardError> {
        let mut builder = Self::builder();
        builder.entries.extend(entries);
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys that came from the parent schema.
    pub fn inherited_len(&self) -> usize {
        self.inherited
    }

    pub fn entries(&self) -> &[BlackboardEntry] {
        &self.entries
    }

    pub fn key_ids(&self) -> impl Iterator<Item = KeyId> + '_ {
        (0..self.entries.len()).map(|i| KeyId::new(i as u16))
    }

    pub fn contains(&self, key: KeyId) -> bool {
        key.index() < self.entries.len()
    }

    pub fn entry(&self, key: KeyId) -> Option<&BlackboardEntry> {
        self.entries.get(key.index())
    }

    pub fn resolve(&self, name: &str) -> Option<KeyId> {
        self.index.get(&Name::new(name)).copied()
    }

    pub fn key_type(&self, key: KeyId) -> Option<KeyType> {
        self.entry(key).map(|e| e.key_type)
    }

    pub fn key_name(&self, key: KeyId) -> Option<&Name> {
        self.entry(key).map(|e| &e.name)
    }

    /// Resolve `name` into a typed handle, checking `T` against the declared key type.
    pub fn typed_key<T: BbType>(&self, name: &str) -> Result<BbKey<T>, BlackboardError> {
        let id = self
            .resolve(name)
            .ok_or_else(|| BlackboardError::UnknownKeyName(name.to_string()))?;
        let declared = self.key_type(id).ok_or(BlackboardError::UnknownKey(id))?;
        if declared != T::KEY_TYPE {
            return Err(BlackboardError::TypeMismatch {
                key: id,
                declared,
                actual: T::KEY_TYPE,
            });
        }
        Ok(BbKey::new(id))
    }
}

#[derive(Debug, Default)]
pub struct BlackboardSchemaBuilder {
    entries: Vec<BlackboardEntry>,
    inherited: usize,
}

impl BlackboardSchemaBuilder {
    pub fn key(mut self, name: impl Into<Name>, key_type: KeyType) -> Self {
        self.entries.push(BlackboardEntry::new(name, key_type));
        self
    }

    pub fn build(self) -> Result<BlackboardSchema, BlackboardError> {
        if self.entries.len() > BlackboardSchema::MAX_KEYS {
            return Err(BlackboardError::TooManyKeys(BlackboardSchema::MAX_KEYS));
        }

        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if index.insert(entry.name.clone(), KeyId::new(i as u16)).is_some() {
                return Err(BlackboardError::DuplicateKey(entry.name.to_string()));
            }
        }

        Ok(BlackboardSchema {
            entries: self.entries,
            index,
            inherited: self.inherited,
        })
    }
}
