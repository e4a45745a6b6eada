use core::cmp::Ordering;
use core::fmt;

use ai_core::{BbValue, Blackboard, BlackboardSchema, KeyId, Name};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Decorator, DecoratorError, KeySelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArithmeticOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ArithmeticOp {
    fn test(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (ArithmeticOp::NotEqual, None) => true,
            (_, None) => false,
            (ArithmeticOp::Equal, Some(o)) => o == Ordering::Equal,
            (ArithmeticOp::NotEqual, Some(o)) => o != Ordering::Equal,
            (ArithmeticOp::Less, Some(o)) => o == Ordering::Less,
            (ArithmeticOp::LessOrEqual, Some(o)) => o != Ordering::Greater,
            (ArithmeticOp::Greater, Some(o)) => o == Ordering::Greater,
            (ArithmeticOp::GreaterOrEqual, Some(o)) => o != Ordering::Less,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Equal => "==",
            ArithmeticOp::NotEqual => "!=",
            ArithmeticOp::Less => "<",
            ArithmeticOp::LessOrEqual => "<=",
            ArithmeticOp::Greater => ">",
            ArithmeticOp::GreaterOrEqual => ">=",
        }
    }
}

/// Text comparisons are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextOp {
    Equal,
    NotEqual,
    Contains,
    NotContains,
}

impl TextOp {
    fn test(self, value: &str, literal: &str) -> bool {
        let value = value.to_lowercase();
        let literal = literal.to_lowercase();
        match self {
            TextOp::Equal => value == literal,
            TextOp::NotEqual => value != literal,
            TextOp::Contains => value.contains(&literal),
            TextOp::NotContains => !value.contains(&literal),
        }
    }
}

/// What a single-key decorator checks against the key's stored value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "query", rename_all = "snake_case"))]
pub enum KeyQuery {
    /// Any key type; see [`BbValue::is_set`].
    IsSet,
    IsNotSet,
    /// Int, Float and Enum keys. Int and Enum values are widened to `f64` and compared with the
    /// literal as is; Float values are compared with the literal narrowed to `f32`.
    Arithmetic { op: ArithmeticOp, value: f64 },
    /// Name and String keys.
    Text { op: TextOp, value: String },
}

impl KeyQuery {
    pub fn evaluate(&self, value: &BbValue) -> bool {
        match self {
            KeyQuery::IsSet => value.is_set(),
            KeyQuery::IsNotSet => !value.is_set(),
            KeyQuery::Arithmetic { op, value: literal } => {
                let ordering = match value {
                    BbValue::Int(v) => (*v as f64).partial_cmp(literal),
                    BbValue::Enum(v) => (*v as f64).partial_cmp(literal),
                    BbValue::Float(v) => v.partial_cmp(&(*literal as f32)),
                    _ => return false,
                };
                op.test(ordering)
            }
            KeyQuery::Text { op, value: literal } => match value.as_text() {
                Some(text) => op.test(text, literal),
                None => false,
            },
        }
    }

    fn supports(&self, key_type: ai_core::KeyType) -> bool {
        match self {
            KeyQuery::IsSet | KeyQuery::IsNotSet => true,
            KeyQuery::Arithmetic { .. } => key_type.is_numeric(),
            KeyQuery::Text { .. } => key_type.is_text(),
        }
    }
}

impl fmt::Display for KeyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyQuery::IsSet => f.write_str("is set"),
            KeyQuery::IsNotSet => f.write_str("is not set"),
            KeyQuery::Arithmetic { op, value } => write!(f, "{} {}", op.symbol(), value),
            KeyQuery::Text { op, value } => match op {
                TextOp::Equal => write!(f, "equals \"{value}\""),
                TextOp::NotEqual => write!(f, "differs from \"{value}\""),
                TextOp::Contains => write!(f, "contains \"{value}\""),
                TextOp::NotContains => write!(f, "does not contain \"{value}\""),
            },
        }
    }
}

/// Checks one blackboard key against a [`KeyQuery`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlackboardDecorator {
    pub key: KeySelector,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub query: KeyQuery,
}

impl BlackboardDecorator {
    pub fn new(key: impl Into<Name>, query: KeyQuery) -> Self {
        Self {
            key: KeySelector::new(key),
            query,
        }
    }

    pub fn is_set(key: impl Into<Name>) -> Self {
        Self::new(key, KeyQuery::IsSet)
    }

    pub fn is_not_set(key: impl Into<Name>) -> Self {
        Self::new(key, KeyQuery::IsNotSet)
    }

    pub fn arithmetic(key: impl Into<Name>, op: ArithmeticOp, value: f64) -> Self {
        Self::new(key, KeyQuery::Arithmetic { op, value })
    }

    pub fn text(key: impl Into<Name>, op: TextOp, value: impl Into<String>) -> Self {
        Self::new(
            key,
            KeyQuery::Text {
                op,
                value: value.into(),
            },
        )
    }
}

impl Decorator for BlackboardDecorator {
    fn initialize_from_asset(&mut self, schema: &BlackboardSchema) -> Result<(), DecoratorError> {
        self.key.resolve(schema)?;
        let Some(key_type) = self.key.selected_type() else {
            return Err(DecoratorError::UnresolvedKey(self.key.name.to_string()));
        };
        if !self.query.supports(key_type) {
            return Err(DecoratorError::UnsupportedQuery {
                key: self.key.name.to_string(),
                key_type,
                query: self.query.to_string(),
            });
        }
        Ok(())
    }

    fn observed_keys(&self) -> Vec<KeyId> {
        self.key.selected_key().into_iter().collect()
    }

    fn calculate_raw_condition_value(&self, blackboard: &Blackboard) -> bool {
        self.key
            .selected_key()
            .and_then(|key| blackboard.value(key))
            .is_some_and(|value| self.query.evaluate(value))
    }

    fn static_description(&self) -> String {
        format!("Blackboard: {} {}", self.key.name, self.query)
    }
}
