use ai_core::{BlackboardSchema, KeyId, KeyType, Name};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DecoratorError;

/// Names a blackboard key at edit time and holds its resolved id at runtime.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeySelector {
    pub name: Name,
    /// Accepted key types. Empty accepts any type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_types: Vec<KeyType>,
    #[cfg_attr(feature = "serde", serde(skip))]
    resolved: Option<(KeyId, KeyType)>,
}

impl KeySelector {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            allowed_types: Vec::new(),
            resolved: None,
        }
    }

    pub fn allow(mut self, key_type: KeyType) -> Self {
        if !self.allowed_types.contains(&key_type) {
            self.allowed_types.push(key_type);
        }
        self
    }

    pub fn resolve(&mut self, schema: &BlackboardSchema) -> Result<KeyId, DecoratorError> {
        self.resolved = None;

        let id = schema
            .resolve(self.name.as_str())
            .ok_or_else(|| DecoratorError::UnresolvedKey(self.name.to_string()))?;
        let key_type = schema
            .key_type(id)
            .ok_or_else(|| DecoratorError::UnresolvedKey(self.name.to_string()))?;

        if !self.allowed_types.is_empty() && !self.allowed_types.contains(&key_type) {
            return Err(DecoratorError::DisallowedKeyType {
                key: self.name.to_string(),
                key_type,
            });
        }

        self.resolved = Some((id, key_type));
        Ok(id)
    }

    pub fn selected_key(&self) -> Option<KeyId> {
        self.resolved.map(|(id, _)| id)
    }

    pub fn selected_type(&self) -> Option<KeyType> {
        self.resolved.map(|(_, t)| t)
    }
}
