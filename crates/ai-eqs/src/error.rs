use thiserror::Error;

use crate::QueryStatus;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("query `{query}` cannot {operation} while {status:?}")]
    InvalidState {
        query: String,
        operation: &'static str,
        status: QueryStatus,
    },

    #[error("test `{test}` has an empty filter range [{min}, {max}]")]
    InvalidFilterRange { test: String, min: f32, max: f32 },

    #[error("query `{0}` was aborted")]
    Aborted(String),
}
