use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Generator, Test};

/// Which of the sorted surviving items a finished query reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunMode {
    SingleBest,
    #[default]
    AllMatching,
    /// One item picked at random among those scoring within the top 5% of the score range.
    #[cfg_attr(feature = "serde", serde(rename = "random_best_5_pct"))]
    RandomBest5Pct,
    /// Same as [`RunMode::RandomBest5Pct`] with a 25% band.
    #[cfg_attr(feature = "serde", serde(rename = "random_best_25_pct"))]
    RandomBest25Pct,
}

impl RunMode {
    pub(crate) fn random_band(self) -> Option<f32> {
        match self {
            RunMode::RandomBest5Pct => Some(0.05),
            RunMode::RandomBest25Pct => Some(0.25),
            RunMode::SingleBest | RunMode::AllMatching => None,
        }
    }
}

/// Immutable query definition: one generator, tests applied in order.
///
/// Templates are shared between instances through `Arc`.
pub struct QueryTemplate {
    name: String,
    generator: Box<dyn Generator>,
    tests: Vec<Box<dyn Test>>,
    run_mode: RunMode,
}

impl QueryTemplate {
    pub fn new(name: impl Into<String>, generator: impl Generator + 'static) -> Self {
        Self {
            name: name.into(),
            generator: Box::new(generator),
            tests: Vec::new(),
            run_mode: RunMode::default(),
        }
    }

    pub fn from_parts(
        name: impl Into<String>,
        generator: Box<dyn Generator>,
        tests: Vec<Box<dyn Test>>,
        run_mode: RunMode,
    ) -> Self {
        Self {
            name: name.into(),
            generator,
            tests,
            run_mode,
        }
    }

    pub fn with_test(mut self, test: impl Test + 'static) -> Self {
        self.tests.push(Box::new(test));
        self
    }

    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn tests(&self) -> &[Box<dyn Test>] {
        &self.tests
    }

    pub fn test(&self, index: usize) -> Option<&dyn Test> {
        self.tests.get(index).map(|t| t.as_ref())
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }
}

impl fmt::Debug for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryTemplate")
            .field("name", &self.name)
            .field("generator", &self.generator.describe())
            .field(
                "tests",
                &self.tests.iter().map(|t| t.describe()).collect::<Vec<_>>(),
            )
            .field("run_mode", &self.run_mode)
            .finish()
    }
}
