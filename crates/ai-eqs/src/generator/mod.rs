//! Item generators.

mod circle;
mod current;
mod grid;

pub use circle::{CirclePoints, OnCircle};
pub use current::CurrentLocation;
pub use grid::SimpleGrid;

use ai_core::Vec3;

use crate::{ContextEntry, ContextResolver, EnvQueryContext, EnvQueryItem, QueryParams};

/// Everything a generator or test may read while running: context resolution and the request's
/// parameters.
pub struct QueryEnv<'a> {
    pub contexts: &'a dyn ContextResolver,
    pub params: &'a QueryParams,
}

impl<'a> QueryEnv<'a> {
    pub fn new(contexts: &'a dyn ContextResolver, params: &'a QueryParams) -> Self {
        Self { contexts, params }
    }

    pub fn entries(&self, context: &EnvQueryContext) -> Vec<ContextEntry> {
        self.contexts.resolve(context)
    }

    pub fn locations(&self, context: &EnvQueryContext) -> Vec<Vec3> {
        self.entries(context).into_iter().map(|e| e.location).collect()
    }
}

/// Produces candidate items. Implementations append to `items` in a deterministic order.
pub trait Generator: Send + Sync {
    fn generate_items(&self, env: &QueryEnv<'_>, items: &mut Vec<EnvQueryItem>);

    fn describe(&self) -> String;
}
