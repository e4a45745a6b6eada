use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BbValue, Name, ObjectRef, Rotator, Vec3};

/// Stable numeric key identifier: the index of the key in its [`crate::BlackboardSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct KeyId(u16);

impl KeyId {
    pub const INVALID: KeyId = KeyId(u16::MAX);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}

/// Declared type of a blackboard key. Fixed when the key is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KeyType {
    Bool,
    Int,
    Float,
    Enum,
    Name,
    String,
    Object,
    Vector,
    Rotator,
}

impl KeyType {
    /// Value of a key that was never written.
    pub fn default_value(self) -> BbValue {
        match self {
            KeyType::Bool => BbValue::Bool(false),
            KeyType::Int => BbValue::Int(0),
            KeyType::Float => BbValue::Float(0.0),
            KeyType::Enum => BbValue::Enum(0),
            KeyType::Name => BbValue::Name(Name::none()),
            KeyType::String => BbValue::String(String::new()),
            KeyType::Object => BbValue::Object(None),
            KeyType::Vector => BbValue::Vector(Vec3::INVALID),
            KeyType::Rotator => BbValue::Rotator(Rotator::INVALID),
        }
    }

    /// Types with an ordinal comparison (`Less` / `Greater`).
    pub fn is_numeric(self) -> bool {
        matches!(self, KeyType::Int | KeyType::Float | KeyType::Enum)
    }

    pub fn is_text(self) -> bool {
        matches!(self, KeyType::Name | KeyType::String)
    }
}

/// Rust types that map onto a [`KeyType`].
pub trait BbType: Sized + 'static {
    const KEY_TYPE: KeyType;

    fn into_value(self) -> BbValue;

    fn from_value(value: &BbValue) -> Option<Self>;

    /// Returned by typed reads that cannot be served (unknown key, mismatched type).
    fn sentinel() -> Self;
}

macro_rules! impl_bb_type {
    ($ty:ty, $variant:ident, $sentinel:expr) => {
        impl BbType for $ty {
            const KEY_TYPE: KeyType = KeyType::$variant;

            fn into_value(self) -> BbValue {
                BbValue::$variant(self)
            }

            fn from_value(value: &BbValue) -> Option<Self> {
                match value {
                    BbValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn sentinel() -> Self {
                $sentinel
            }
        }
    };
}

impl_bb_type!(bool, Bool, false);
impl_bb_type!(i32, Int, 0);
impl_bb_type!(f32, Float, 0.0);
impl_bb_type!(u8, Enum, 0);
impl_bb_type!(Name, Name, Name::none());
impl_bb_type!(String, String, String::new());
impl_bb_type!(Option<ObjectRef>, Object, None);
impl_bb_type!(Vec3, Vector, Vec3::INVALID);
impl_bb_type!(Rotator, Rotator, Rotator::INVALID);

/// Typed handle to a blackboard key.
///
/// Prefer [`crate::BlackboardSchema::typed_key`], which checks `T` against the declared key type.
/// Writes through a handle whose `T` does not match are rejected at runtime.
pub struct BbKey<T: 'static> {
    id: KeyId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> BbKey<T> {
    pub const fn new(id: KeyId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(self) -> KeyId {
        self.id
    }
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> PartialEq for BbKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: 'static> Eq for BbKey<T> {}

impl<T: 'static> Hash for BbKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: 'static> fmt::Debug for BbKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BbKey")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}
