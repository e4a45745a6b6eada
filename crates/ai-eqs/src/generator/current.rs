#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EnvQueryContext, EnvQueryItem, Generator, QueryEnv};

/// One item per entry of a context. Entries that carry an actor become actor items.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentLocation {
    #[cfg_attr(feature = "serde", serde(default))]
    pub context: EnvQueryContext,
}

impl CurrentLocation {
    pub fn new(context: EnvQueryContext) -> Self {
        Self { context }
    }
}

impl Generator for CurrentLocation {
    fn generate_items(&self, env: &QueryEnv<'_>, items: &mut Vec<EnvQueryItem>) {
        items.extend(env.entries(&self.context).into_iter().map(|entry| match entry.actor {
            Some(actor) => EnvQueryItem::actor(actor, entry.location),
            None => EnvQueryItem::point(entry.location),
        }));
    }

    fn describe(&self) -> String {
        format!("CurrentLocation of {}", self.context)
    }
}
