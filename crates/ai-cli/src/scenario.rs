//! YAML scenario files and the in-memory world they describe.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use ai_bt::{BlackboardDecorator, CompareBlackboardEntries, DecoratorConfig};
use ai_core::{BbValue, BlackboardEntry, ObjectRef, Vec3, WorldView};
use ai_eqs::{ContextEntry, QueryParams, QueryTemplateConfig, QueryWorld};

/// Context name that resolves to every agent except the querier.
pub const OTHER_AGENTS: &str = "OtherAgents";

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse scenario from {}", path.display()))
}

/// Environment query scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct EqsScenario {
    /// Base seed for the random run modes.
    #[serde(default)]
    pub seed: u64,
    pub querier: u64,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
    /// Named point sets, e.g. cover spots.
    #[serde(default)]
    pub contexts: BTreeMap<String, Vec<Vec3>>,
    #[serde(default)]
    pub params: QueryParams,
    pub queries: Vec<QueryTemplateConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSpec {
    pub id: u64,
    pub location: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioWorld {
    agents: BTreeMap<u64, Vec3>,
    contexts: BTreeMap<String, Vec<Vec3>>,
}

impl ScenarioWorld {
    pub fn from_scenario(scenario: &EqsScenario) -> Self {
        Self {
            agents: scenario.agents.iter().map(|a| (a.id, a.location)).collect(),
            contexts: scenario.contexts.clone(),
        }
    }
}

impl WorldView for ScenarioWorld {
    type Agent = u64;
}

impl QueryWorld for ScenarioWorld {
    fn agent_location(&self, agent: u64) -> Option<Vec3> {
        self.agents.get(&agent).copied()
    }

    fn agent_object(&self, agent: u64) -> Option<ObjectRef> {
        self.agents.contains_key(&agent).then_some(ObjectRef(agent))
    }

    fn named_context(&self, querier: u64, name: &str) -> Vec<ContextEntry> {
        if name == OTHER_AGENTS {
            return self
                .agents
                .iter()
                .filter(|(id, _)| **id != querier)
                .map(|(id, location)| ContextEntry::actor(ObjectRef(*id), *location))
                .collect();
        }

        match self.contexts.get(name) {
            Some(points) => points.iter().copied().map(ContextEntry::location).collect(),
            None => {
                tracing::warn!(context = %name, "scenario has no such context");
                Vec::new()
            }
        }
    }
}

/// Blackboard decorator scenario: a schema, decorators and a script of writes.
#[derive(Debug, Clone, Deserialize)]
pub struct BlackboardScenario {
    pub keys: Vec<BlackboardEntry>,
    #[serde(default)]
    pub decorators: Vec<DecoratorSpec>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecoratorSpec {
    pub id: u32,
    #[serde(default)]
    pub config: DecoratorConfig,
    pub decorator: DecoratorKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecoratorKind {
    Blackboard(BlackboardDecorator),
    Compare(CompareBlackboardEntries),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Set { key: String, value: BbValue },
    Clear(String),
    /// Decorator id that becomes relevant.
    Activate(u32),
    /// Decorator id that ceases to be relevant.
    Deactivate(u32),
}
