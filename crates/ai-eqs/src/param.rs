use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named float parameters supplied with a query request.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct QueryParams(BTreeMap<String, f32>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f32) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.0.get(name).copied()
    }
}

/// A float setting that is either fixed in the template or bound to a query parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FloatParam {
    Value(f32),
    Named {
        param: String,
        #[cfg_attr(feature = "serde", serde(default))]
        default: f32,
    },
}

impl FloatParam {
    pub fn named(param: impl Into<String>, default: f32) -> Self {
        FloatParam::Named {
            param: param.into(),
            default,
        }
    }

    pub fn resolve(&self, params: &QueryParams) -> f32 {
        match self {
            FloatParam::Value(v) => *v,
            FloatParam::Named { param, default } => params.get(param).unwrap_or_else(|| {
                tracing::trace!(param = %param, default, "query parameter not supplied");
                *default
            }),
        }
    }
}

impl Default for FloatParam {
    fn default() -> Self {
        FloatParam::Value(0.0)
    }
}

impl From<f32> for FloatParam {
    fn from(value: f32) -> Self {
        FloatParam::Value(value)
    }
}
