use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{KeyType, ObjectRef, Rotator, Vec3};

/// Case-insensitive identifier, used for key names and name-typed values.
#[derive(Debug, Clone, Default, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("None")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Result of comparing two blackboard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyComparison {
    Equal,
    NotEqual,
    Less,
    Greater,
}

/// A single blackboard value, tagged with its key type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BbValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Enum(u8),
    Name(Name),
    String(String),
    Object(Option<ObjectRef>),
    Vector(Vec3),
    Rotator(Rotator),
}

impl BbValue {
    pub fn key_type(&self) -> KeyType {
        match self {
            BbValue::Bool(_) => KeyType::Bool,
            BbValue::Int(_) => KeyType::Int,
            BbValue::Float(_) => KeyType::Float,
            BbValue::Enum(_) => KeyType::Enum,
            BbValue::Name(_) => KeyType::Name,
            BbValue::String(_) => KeyType::String,
            BbValue::Object(_) => KeyType::Object,
            BbValue::Vector(_) => KeyType::Vector,
            BbValue::Rotator(_) => KeyType::Rotator,
        }
    }

    /// Whether the value differs from "nothing" for its type: `true`, non-zero, non-empty, a
    /// bound object, or a valid location/rotation.
    pub fn is_set(&self) -> bool {
        match self {
            BbValue::Bool(v) => *v,
            BbValue::Int(v) => *v != 0,
            BbValue::Float(v) => *v != 0.0,
            BbValue::Enum(v) => *v != 0,
            BbValue::Name(v) => !v.is_none(),
            BbValue::String(v) => !v.is_empty(),
            BbValue::Object(v) => v.is_some(),
            BbValue::Vector(v) => v.is_valid(),
            BbValue::Rotator(v) => v.is_valid(),
        }
    }

    /// Numeric view of ordinal values.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            BbValue::Int(v) => Some(*v as f64),
            BbValue::Float(v) => Some(*v as f64),
            BbValue::Enum(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            BbValue::Name(v) => Some(v.as_str()),
            BbValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Equality of the stored representation. Floats compare by bit pattern.
    pub fn same_bits(&self, other: &BbValue) -> bool {
        match (self, other) {
            (BbValue::Float(a), BbValue::Float(b)) => a.to_bits() == b.to_bits(),
            (BbValue::Vector(a), BbValue::Vector(b)) => a.bit_eq(*b),
            (BbValue::Rotator(a), BbValue::Rotator(b)) => a.bit_eq(*b),
            (BbValue::Name(a), BbValue::Name(b)) => a.as_str() == b.as_str(),
            _ => self == other,
        }
    }

    /// Ordinal comparison for numeric types, equality for everything else.
    ///
    /// Values of different types are never equal. A `NaN` operand yields `NotEqual`.
    pub fn compare(&self, other: &BbValue) -> KeyComparison {
        let ordering = match (self, other) {
            (BbValue::Int(a), BbValue::Int(b)) => Some(a.cmp(b)),
            (BbValue::Enum(a), BbValue::Enum(b)) => Some(a.cmp(b)),
            (BbValue::Float(a), BbValue::Float(b)) => match a.partial_cmp(b) {
                Some(o) => Some(o),
                None => return KeyComparison::NotEqual,
            },
            _ => None,
        };

        match ordering {
            Some(Ordering::Less) => KeyComparison::Less,
            Some(Ordering::Greater) => KeyComparison::Greater,
            Some(Ordering::Equal) => KeyComparison::Equal,
            None if self == other => KeyComparison::Equal,
            None => KeyComparison::NotEqual,
        }
    }
}

impl fmt::Display for BbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BbValue::Bool(v) => write!(f, "{v}"),
            BbValue::Int(v) => write!(f, "{v}"),
            BbValue::Float(v) => write!(f, "{v}"),
            BbValue::Enum(v) => write!(f, "enum({v})"),
            BbValue::Name(v) => write!(f, "{v}"),
            BbValue::String(v) => write!(f, "\"{v}\""),
            BbValue::Object(Some(o)) => write!(f, "object({})", o.0),
            BbValue::Object(None) => f.write_str("object(none)"),
            BbValue::Vector(v) if v.is_valid() => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            BbValue::Vector(_) => f.write_str("(invalid)"),
            BbValue::Rotator(r) if r.is_valid() => {
                write!(f, "(p={}, y={}, r={})", r.pitch, r.yaw, r.roll)
            }
            BbValue::Rotator(_) => f.write_str("(invalid)"),
        }
    }
}
