use ai_core::{BlackboardError, KeyType};
use thiserror::Error;

use crate::DecoratorId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoratorError {
    #[error("blackboard key `{0}` is not defined by the asset")]
    UnresolvedKey(String),

    #[error("blackboard key `{key}` has type {key_type:?}, which this selector does not accept")]
    DisallowedKeyType { key: String, key_type: KeyType },

    #[error("cannot compare `{a}` ({a_type:?}) with `{b}` ({b_type:?})")]
    KeyTypeMismatch {
        a: String,
        a_type: KeyType,
        b: String,
        b_type: KeyType,
    },

    #[error("query `{query}` is not supported for key `{key}` of type {key_type:?}")]
    UnsupportedQuery {
        key: String,
        key_type: KeyType,
        query: String,
    },

    #[error("decorator {0:?} is already relevant")]
    AlreadyRelevant(DecoratorId),

    #[error(transparent)]
    Blackboard(#[from] BlackboardError),
}
