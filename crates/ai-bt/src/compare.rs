use ai_core::{Blackboard, BlackboardSchema, KeyComparison, KeyId, Name};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Decorator, DecoratorError, KeySelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompareOp {
    #[default]
    Equal,
    NotEqual,
}

/// Compares the values of two blackboard keys of the same type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompareBlackboardEntries {
    pub key_a: KeySelector,
    pub key_b: KeySelector,
    #[cfg_attr(feature = "serde", serde(default))]
    pub operator: CompareOp,
}

impl CompareBlackboardEntries {
    pub fn new(key_a: impl Into<Name>, key_b: impl Into<Name>, operator: CompareOp) -> Self {
        Self {
            key_a: KeySelector::new(key_a),
            key_b: KeySelector::new(key_b),
            operator,
        }
    }
}

impl Decorator for CompareBlackboardEntries {
    fn initialize_from_asset(&mut self, schema: &BlackboardSchema) -> Result<(), DecoratorError> {
        self.key_a.resolve(schema)?;
        self.key_b.resolve(schema)?;

        let (Some(a_type), Some(b_type)) = (self.key_a.selected_type(), self.key_b.selected_type())
        else {
            return Err(DecoratorError::UnresolvedKey(self.key_a.name.to_string()));
        };
        if a_type != b_type {
            return Err(DecoratorError::KeyTypeMismatch {
                a: self.key_a.name.to_string(),
                a_type,
                b: self.key_b.name.to_string(),
                b_type,
            });
        }
        Ok(())
    }

    fn observed_keys(&self) -> Vec<KeyId> {
        self.key_a
            .selected_key()
            .into_iter()
            .chain(self.key_b.selected_key())
            .collect()
    }

    fn calculate_raw_condition_value(&self, blackboard: &Blackboard) -> bool {
        let (Some(a), Some(b)) = (self.key_a.selected_key(), self.key_b.selected_key()) else {
            return false;
        };
        let equal = blackboard.compare(a, b) == KeyComparison::Equal;
        match self.operator {
            CompareOp::Equal => equal,
            CompareOp::NotEqual => !equal,
        }
    }

    fn static_description(&self) -> String {
        let op = match self.operator {
            CompareOp::Equal => "is equal to",
            CompareOp::NotEqual => "is not equal to",
        };
        format!("Compare: {} {} {}", self.key_a.name, op, self.key_b.name)
    }
}
