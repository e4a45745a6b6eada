//! Deterministic, engine-agnostic AI kernel primitives.
//!
//! The centerpiece is the [`Blackboard`]: a typed key/value store built from a
//! [`BlackboardSchema`] that notifies observers synchronously whenever a value changes.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod math;
pub mod rng;
pub mod world;

pub use agent::{AgentId, ObjectRef};
pub use blackboard::{
    BbKey, BbType, BbValue, Blackboard, BlackboardEntry, BlackboardError, BlackboardSchema,
    BlackboardSchemaBuilder, KeyComparison, KeyId, KeyType, Name, ObserverAction, ObserverId,
    Subscription,
};
pub use math::{Rotator, Vec3};
pub use rng::{DeterministicRng, SplitMix64};
pub use world::WorldView;
