use ai_core::{Blackboard, BlackboardSchema, KeyId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DecoratorError;

/// Stable identifier of a decorator node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DecoratorId(pub u32);

/// Which branches the scheduler should abort when the condition changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FlowAbortMode {
    #[default]
    None,
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    Self_,
    LowerPriority,
    Both,
}

/// When an observed key change is reported to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NotifyObserver {
    /// Only when the evaluated condition flips.
    #[default]
    OnResultChange,
    /// On every change of an observed key, even if the condition stays the same.
    OnValueChange,
}

/// Settings shared by every decorator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoratorConfig {
    pub inverse_condition: bool,
    pub flow_abort_mode: FlowAbortMode,
    pub notify_observer: NotifyObserver,
}

/// Capability interface of a blackboard-driven condition.
pub trait Decorator: 'static {
    /// Bind key selectors against the asset's key table.
    fn initialize_from_asset(&mut self, schema: &BlackboardSchema)
        -> Result<(), DecoratorError>;

    /// Keys whose changes may flip the condition. Valid after initialization.
    fn observed_keys(&self) -> Vec<KeyId>;

    /// The condition before `inverse_condition` is applied.
    fn calculate_raw_condition_value(&self, blackboard: &Blackboard) -> bool;

    /// Human readable summary, e.g. for tree debuggers.
    fn static_description(&self) -> String;
}
