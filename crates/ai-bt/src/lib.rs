//! Behavior tree decorators built on the `ai-core` blackboard.
//!
//! A decorator is a boolean gate over one or more blackboard keys. While it is relevant (its
//! branch is active) it observes those keys and reports condition changes to the tree scheduler
//! through a [`SignalQueue`]. The scheduler itself lives outside this crate.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod compare;
pub mod decorator;
pub mod error;
pub mod instance;
pub mod selector;
pub mod signal;

pub use blackboard::{ArithmeticOp, BlackboardDecorator, KeyQuery, TextOp};
pub use compare::{CompareBlackboardEntries, CompareOp};
pub use decorator::{Decorator, DecoratorConfig, DecoratorId, FlowAbortMode, NotifyObserver};
pub use error::DecoratorError;
pub use instance::{DecoratorInstance, DecoratorState};
pub use selector::KeySelector;
pub use signal::{DecoratorSignal, SignalQueue};
