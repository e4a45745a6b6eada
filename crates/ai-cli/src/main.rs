//! `ai-query` - drive the AI kernel from YAML scenarios.
//!
//! - `ai-query eqs <scenario>` - run environment queries for one querier
//! - `ai-query blackboard <scenario>` - script blackboard writes and watch decorator signals

mod scenario;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ai_bt::{DecoratorId, DecoratorInstance, SignalQueue};
use ai_core::rng::derive_seed;
use ai_core::{Blackboard, BlackboardSchema};
use ai_eqs::{QueryInstance, QueryResult, WorldContexts};

use scenario::{BlackboardScenario, DecoratorKind, EqsScenario, ScenarioWorld, Step};

#[derive(Parser)]
#[command(name = "ai-query")]
#[command(about = "Run environment queries and blackboard scenarios", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every query of an environment query scenario
    Eqs {
        scenario: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Override the scenario's querier
        #[arg(long)]
        querier: Option<u64>,
    },

    /// Replay a blackboard scenario and print decorator signals
    Blackboard { scenario: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Eqs {
            scenario,
            json,
            querier,
        } => run_queries(&scenario, json, querier),
        Commands::Blackboard { scenario } => run_blackboard(&scenario),
    }
}

fn run_queries(path: &Path, json: bool, querier: Option<u64>) -> Result<()> {
    let scenario: EqsScenario = scenario::load(path)?;
    let world = ScenarioWorld::from_scenario(&scenario);
    let querier = querier.unwrap_or(scenario.querier);
    let contexts = WorldContexts::new(&world, querier);

    tracing::info!(
        scenario = %path.display(),
        querier,
        queries = scenario.queries.len(),
        "Running environment queries"
    );

    let mut results = Vec::with_capacity(scenario.queries.len());
    for (index, config) in scenario.queries.into_iter().enumerate() {
        let name = config.name.clone();
        let template = Arc::new(config.build());
        let mut query = QueryInstance::new(template, scenario.params.clone())
            .with_seed(derive_seed(scenario.seed, querier, index as u64));

        let result = query
            .execute(&contexts)
            .with_context(|| format!("Query `{name}` did not finish"))?;

        for stats in query.stats() {
            tracing::debug!(
                query = %name,
                step = ?stats.step,
                before = stats.items_before,
                after = stats.items_after,
                elapsed_us = stats.elapsed.as_micros() as u64,
                "Query step"
            );
        }
        results.push(result);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_result(result);
        }
    }
    Ok(())
}

fn print_result(result: &QueryResult) {
    println!(
        "{} ({:?}): {} item(s)",
        result.query,
        result.run_mode,
        result.len()
    );
    for item in &result.items {
        let loc = item.location();
        let actor = item
            .actor_ref()
            .map(|a| format!(" actor {}", a.0))
            .unwrap_or_default();
        println!(
            "  #{:<4} ({:.1}, {:.1}, {:.1}) score {:.3}{}",
            item.generation_index(),
            loc.x,
            loc.y,
            loc.z,
            item.score(),
            actor
        );
    }
}

fn run_blackboard(path: &Path) -> Result<()> {
    let scenario: BlackboardScenario = scenario::load(path)?;
    let schema = Arc::new(
        BlackboardSchema::from_entries(scenario.keys).context("Invalid blackboard keys")?,
    );
    let mut blackboard = Blackboard::new(Arc::clone(&schema));
    let signals = SignalQueue::new();

    let mut decorators = BTreeMap::new();
    for spec in scenario.decorators {
        let id = DecoratorId(spec.id);
        let instance = match spec.decorator {
            DecoratorKind::Blackboard(d) => DecoratorInstance::new(id, d, spec.config, &schema),
            DecoratorKind::Compare(d) => DecoratorInstance::new(id, d, spec.config, &schema),
        }
        .with_context(|| format!("Decorator {} failed to initialize", spec.id))?;
        println!("decorator {}: {}", spec.id, instance.description());
        decorators.insert(spec.id, instance);
    }

    for (index, step) in scenario.steps.into_iter().enumerate() {
        match step {
            Step::Set { key, value } => {
                let id = schema
                    .resolve(&key)
                    .ok_or_else(|| anyhow!("Step {index}: unknown key `{key}`"))?;
                let changed = blackboard
                    .set_value(id, value.clone())
                    .with_context(|| format!("Step {index}: cannot set `{key}`"))?;
                println!(
                    "[{index}] set {key} = {value}{}",
                    if changed { "" } else { " (unchanged)" }
                );
            }
            Step::Clear(key) => {
                let id = schema
                    .resolve(&key)
                    .ok_or_else(|| anyhow!("Step {index}: unknown key `{key}`"))?;
                let changed = blackboard.clear_value(id)?;
                println!("[{index}] clear {key}{}", if changed { "" } else { " (unchanged)" });
            }
            Step::Activate(id) => {
                let decorator = decorators
                    .get_mut(&id)
                    .ok_or_else(|| anyhow!("Step {index}: unknown decorator {id}"))?;
                let initial = decorator.on_become_relevant(&blackboard, &signals)?;
                println!("[{index}] activate {id}: condition {initial}");
            }
            Step::Deactivate(id) => {
                let decorator = decorators
                    .get_mut(&id)
                    .ok_or_else(|| anyhow!("Step {index}: unknown decorator {id}"))?;
                decorator.on_cease_relevant();
                println!("[{index}] deactivate {id}");
            }
        }

        for signal in signals.drain() {
            let key = schema
                .key_name(signal.key)
                .map(|n| n.to_string())
                .unwrap_or_else(|| signal.key.to_string());
            println!(
                "    signal: decorator {} -> {} (key {key}, abort {:?})",
                signal.decorator.0, signal.result, signal.flow_abort_mode
            );
        }
    }

    tracing::debug!(blackboard = ?blackboard, "Final blackboard");
    Ok(())
}
