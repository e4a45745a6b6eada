//! One execution of a [`QueryTemplate`].
//!
//! An instance advances through `NotStarted -> Testing(0) -> .. -> Testing(n - 1) -> Finished`,
//! one step per call, so a scheduler can spread a query across frames. `Failed` and `Aborted`
//! are terminal as well.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ai_core::{DeterministicRng, SplitMix64, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    run_test, ContextResolver, EnvQueryItem, QueryEnv, QueryError, QueryParams, QueryTemplate,
    RunMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueryStatus {
    #[default]
    NotStarted,
    Generating,
    /// The test at this index runs on the next step.
    Testing(usize),
    Finished,
    Failed,
    Aborted,
}

impl QueryStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QueryStatus::Finished | QueryStatus::Failed | QueryStatus::Aborted
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueryStep {
    Generate,
    Test(usize),
}

/// Bookkeeping for one executed step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepStats {
    pub step: QueryStep,
    /// Items still in play before the step.
    pub items_before: usize,
    pub items_after: usize,
    pub elapsed: Duration,
}

/// Items reported by a finished query, best first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QueryResult {
    pub query: String,
    pub run_mode: RunMode,
    pub items: Vec<EnvQueryItem>,
}

impl QueryResult {
    pub fn best(&self) -> Option<&EnvQueryItem> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn locations(&self) -> Vec<Vec3> {
        self.items.iter().map(|item| item.location()).collect()
    }
}

#[derive(Debug)]
pub struct QueryInstance {
    template: Arc<QueryTemplate>,
    params: QueryParams,
    seed: u64,
    status: QueryStatus,
    items: Vec<EnvQueryItem>,
    stats: Vec<StepStats>,
    error: Option<QueryError>,
}

impl QueryInstance {
    pub fn new(template: Arc<QueryTemplate>, params: QueryParams) -> Self {
        Self {
            template,
            params,
            seed: 0,
            status: QueryStatus::NotStarted,
            items: Vec::new(),
            stats: Vec::new(),
            error: None,
        }
    }

    /// Seed for the random run modes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn template(&self) -> &QueryTemplate {
        &self.template
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// All generated items, including discarded ones, in generation order.
    pub fn items(&self) -> &[EnvQueryItem] {
        &self.items
    }

    pub fn valid_item_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_valid()).count()
    }

    pub fn stats(&self) -> &[StepStats] {
        &self.stats
    }

    /// The error that moved the instance to `Failed`.
    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    /// Run the generator. Only valid before anything else has happened.
    pub fn generate_items(
        &mut self,
        contexts: &dyn ContextResolver,
    ) -> Result<QueryStatus, QueryError> {
        if self.status != QueryStatus::NotStarted {
            return Err(self.invalid_state("generate items"));
        }

        self.status = QueryStatus::Generating;
        let started = Instant::now();
        let env = QueryEnv::new(contexts, &self.params);
        self.template.generator().generate_items(&env, &mut self.items);
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_generation_index(index);
        }

        let generated = self.items.len();
        self.stats.push(StepStats {
            step: QueryStep::Generate,
            items_before: 0,
            items_after: generated,
            elapsed: started.elapsed(),
        });
        tracing::debug!(
            query = %self.template.name(),
            generator = %self.template.generator().describe(),
            items = generated,
            "generated items"
        );

        if generated == 0 || self.template.tests().is_empty() {
            self.finish();
        } else {
            self.status = QueryStatus::Testing(0);
        }
        Ok(self.status)
    }

    /// Run the next pending test.
    pub fn run_test(&mut self, contexts: &dyn ContextResolver) -> Result<QueryStatus, QueryError> {
        let QueryStatus::Testing(index) = self.status else {
            return Err(self.invalid_state("run a test"));
        };
        let template = Arc::clone(&self.template);
        let Some(test) = template.test(index) else {
            self.finish();
            return Ok(self.status);
        };

        let before = self.valid_item_count();
        let started = Instant::now();
        let env = QueryEnv::new(contexts, &self.params);
        if let Err(err) = run_test(test, &env, &mut self.items) {
            tracing::warn!(
                query = %template.name(),
                test = index,
                error = %err,
                "query test failed"
            );
            self.status = QueryStatus::Failed;
            self.error = Some(err.clone());
            return Err(err);
        }

        let after = self.valid_item_count();
        self.stats.push(StepStats {
            step: QueryStep::Test(index),
            items_before: before,
            items_after: after,
            elapsed: started.elapsed(),
        });
        tracing::debug!(
            query = %template.name(),
            test = %test.describe(),
            before,
            after,
            "ran query test"
        );

        if after == 0 || index + 1 >= template.tests().len() {
            self.finish();
        } else {
            self.status = QueryStatus::Testing(index + 1);
        }
        Ok(self.status)
    }

    /// Advance by one step: generation first, then one test per call.
    pub fn step(&mut self, contexts: &dyn ContextResolver) -> Result<QueryStatus, QueryError> {
        match self.status {
            QueryStatus::NotStarted => self.generate_items(contexts),
            QueryStatus::Testing(_) => self.run_test(contexts),
            _ => Err(self.invalid_state("step")),
        }
    }

    /// Step until the instance reaches a terminal state.
    pub fn execute(&mut self, contexts: &dyn ContextResolver) -> Result<QueryResult, QueryError> {
        while !self.status.is_terminal() {
            self.step(contexts)?;
        }

        match self.status {
            QueryStatus::Finished => Ok(self.collect_result()),
            QueryStatus::Aborted => Err(QueryError::Aborted(self.template.name().to_string())),
            _ => Err(self
                .error
                .clone()
                .unwrap_or_else(|| self.invalid_state("execute"))),
        }
    }

    /// Stop a running query. Returns `false` if it had already reached a terminal state.
    pub fn abort(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        tracing::debug!(query = %self.template.name(), status = ?self.status, "query aborted");
        self.status = QueryStatus::Aborted;
        true
    }

    /// The result of a finished query.
    pub fn result(&self) -> Option<QueryResult> {
        (self.status == QueryStatus::Finished).then(|| self.collect_result())
    }

    fn finish(&mut self) {
        self.status = QueryStatus::Finished;
        tracing::debug!(
            query = %self.template.name(),
            survivors = self.valid_item_count(),
            "query finished"
        );
    }

    fn collect_result(&self) -> QueryResult {
        let mut ranked: Vec<EnvQueryItem> =
            self.items.iter().filter(|item| item.is_valid()).cloned().collect();
        // Stable, so equal scores keep generation order.
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));

        let run_mode = self.template.run_mode();
        let items = match run_mode {
            RunMode::AllMatching => ranked,
            RunMode::SingleBest => ranked.into_iter().take(1).collect(),
            RunMode::RandomBest5Pct | RunMode::RandomBest25Pct => {
                let band = run_mode.random_band().unwrap_or(0.0);
                pick_from_best(ranked, band, self.seed).into_iter().collect()
            }
        };

        QueryResult {
            query: self.template.name().to_string(),
            run_mode,
            items,
        }
    }

    fn invalid_state(&self, operation: &'static str) -> QueryError {
        QueryError::InvalidState {
            query: self.template.name().to_string(),
            operation,
            status: self.status,
        }
    }
}

/// Pick uniformly among the items scoring at least `best - (best - worst) * band`.
fn pick_from_best(ranked: Vec<EnvQueryItem>, band: f32, seed: u64) -> Option<EnvQueryItem> {
    let best = ranked.first()?.score();
    let worst = ranked.last()?.score();
    let threshold = best - (best - worst) * band;
    let candidates = ranked.iter().take_while(|item| item.score() >= threshold).count().max(1);

    let mut rng = SplitMix64::new(seed);
    let pick = rng.next_index(candidates);
    ranked.into_iter().nth(pick)
}
