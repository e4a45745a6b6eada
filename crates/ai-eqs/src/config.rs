//! Data-driven query templates.
//!
//! ```yaml
//! name: find_cover
//! run_mode: single_best
//! generator:
//!   type: simple_grid
//!   radius: { param: SearchRadius, default: 500.0 }
//!   density: 100.0
//! tests:
//!   - type: distance
//!     mode: distance_2d
//!     distance_to: { named: Enemy }
//!     purpose: filter_and_score
//!     filter_type: minimum
//!     filter_min: 200.0
//!     scoring_equation: inverse_linear
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    CurrentLocation, DistanceTest, Generator, OnCircle, QueryTemplate, RunMode, SimpleGrid, Test,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    SimpleGrid(SimpleGrid),
    OnCircle(OnCircle),
    CurrentLocation(CurrentLocation),
}

impl GeneratorConfig {
    pub fn build(self) -> Box<dyn Generator> {
        match self {
            GeneratorConfig::SimpleGrid(g) => Box::new(g),
            GeneratorConfig::OnCircle(g) => Box::new(g),
            GeneratorConfig::CurrentLocation(g) => Box::new(g),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestSpec {
    Distance(DistanceTest),
}

impl TestSpec {
    pub fn build(self) -> Box<dyn Test> {
        match self {
            TestSpec::Distance(t) => Box::new(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTemplateConfig {
    pub name: String,
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub tests: Vec<TestSpec>,
    #[serde(default)]
    pub run_mode: RunMode,
}

impl QueryTemplateConfig {
    pub fn build(self) -> QueryTemplate {
        QueryTemplate::from_parts(
            self.name,
            self.generator.build(),
            self.tests.into_iter().map(TestSpec::build).collect(),
            self.run_mode,
        )
    }
}
