use thiserror::Error;

use crate::{KeyId, KeyType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackboardError {
    #[error("unknown blackboard key {0}")]
    UnknownKey(KeyId),

    #[error("blackboard has no key named `{0}`")]
    UnknownKeyName(String),

    #[error("type mismatch on blackboard key {key}: declared {declared:?}, got {actual:?}")]
    TypeMismatch {
        key: KeyId,
        declared: KeyType,
        actual: KeyType,
    },

    #[error("duplicate blackboard key `{0}`")]
    DuplicateKey(String),

    #[error("blackboard schema cannot hold more than {0} keys")]
    TooManyKeys(usize),
}
