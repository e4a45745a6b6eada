//! Typed blackboard: schema (asset key table), values and change observers.

mod error;
mod key;
mod observer;
mod schema;
mod store;
mod value;

pub use error::BlackboardError;
pub use key::{BbKey, BbType, KeyId, KeyType};
pub use observer::{ObserverAction, ObserverFn, ObserverId, Subscription};
pub use schema::{BlackboardEntry, BlackboardSchema, BlackboardSchemaBuilder};
pub use store::Blackboard;
pub use value::{BbValue, KeyComparison, Name};
