use ai_core::{ObjectRef, Vec3, WorldView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names a set of world locations that generators and tests work relative to.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnvQueryContext {
    /// The agent running the query.
    #[default]
    Querier,
    /// Resolved by the host world, e.g. "Target" or "CoverPoints".
    Named(String),
    /// Fixed locations baked into the template.
    Locations(Vec<Vec3>),
}

impl EnvQueryContext {
    pub fn named(name: impl Into<String>) -> Self {
        EnvQueryContext::Named(name.into())
    }
}

impl std::fmt::Display for EnvQueryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvQueryContext::Querier => f.write_str("Querier"),
            EnvQueryContext::Named(name) => f.write_str(name),
            EnvQueryContext::Locations(points) => write!(f, "{} fixed locations", points.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextEntry {
    pub location: Vec3,
    pub actor: Option<ObjectRef>,
}

impl ContextEntry {
    pub fn location(location: Vec3) -> Self {
        Self {
            location,
            actor: None,
        }
    }

    pub fn actor(actor: ObjectRef, location: Vec3) -> Self {
        Self {
            location,
            actor: Some(actor),
        }
    }
}

/// Turns a context into concrete entries, in a stable order.
///
/// An empty result means the context could not be resolved; callers treat it as contributing
/// nothing.
pub trait ContextResolver {
    fn resolve(&self, context: &EnvQueryContext) -> Vec<ContextEntry>;
}

impl<F> ContextResolver for F
where
    F: Fn(&EnvQueryContext) -> Vec<ContextEntry>,
{
    fn resolve(&self, context: &EnvQueryContext) -> Vec<ContextEntry> {
        self(context)
    }
}

/// World access needed to resolve query contexts.
pub trait QueryWorld: WorldView {
    fn agent_location(&self, agent: Self::Agent) -> Option<Vec3>;

    fn agent_object(&self, _agent: Self::Agent) -> Option<ObjectRef> {
        None
    }

    fn named_context(&self, _querier: Self::Agent, _name: &str) -> Vec<ContextEntry> {
        Vec::new()
    }
}

/// [`ContextResolver`] over a [`QueryWorld`] for one querier.
pub struct WorldContexts<'w, W: QueryWorld> {
    world: &'w W,
    querier: W::Agent,
}

impl<'w, W: QueryWorld> WorldContexts<'w, W> {
    pub fn new(world: &'w W, querier: W::Agent) -> Self {
        Self { world, querier }
    }
}

impl<W: QueryWorld> ContextResolver for WorldContexts<'_, W> {
    fn resolve(&self, context: &EnvQueryContext) -> Vec<ContextEntry> {
        match context {
            EnvQueryContext::Querier => self
                .world
                .agent_location(self.querier)
                .map(|location| ContextEntry {
                    location,
                    actor: self.world.agent_object(self.querier),
                })
                .into_iter()
                .collect(),
            EnvQueryContext::Named(name) => self.world.named_context(self.querier, name),
            EnvQueryContext::Locations(points) => {
                points.iter().copied().map(ContextEntry::location).collect()
            }
        }
    }
}
