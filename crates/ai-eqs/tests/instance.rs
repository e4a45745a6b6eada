use std::collections::BTreeMap;
use std::sync::Arc;

use ai_core::{ObjectRef, Vec3, WorldView};
use ai_eqs::{
    ContextEntry, CurrentLocation, DistanceMode, DistanceTest, EnvQueryContext, FloatParam,
    MultipleContextFilterOp, MultipleContextScoreOp, QueryError, QueryInstance, QueryParams,
    QueryStatus, QueryStep, QueryTemplate, QueryWorld, RunMode, ScoringEquation, SimpleGrid,
    TestConfig, WorldContexts,
};

fn origin(ctx: &EnvQueryContext) -> Vec<ContextEntry> {
    match ctx {
        EnvQueryContext::Querier => vec![ContextEntry::location(Vec3::ZERO)],
        EnvQueryContext::Locations(points) => {
            points.iter().copied().map(ContextEntry::location).collect()
        }
        EnvQueryContext::Named(_) => Vec::new(),
    }
}

fn points(xs: &[f32]) -> CurrentLocation {
    CurrentLocation::new(EnvQueryContext::Locations(
        xs.iter().map(|&x| Vec3::new(x, 0.0, 0.0)).collect(),
    ))
}

fn distance(config: TestConfig) -> DistanceTest {
    DistanceTest::new(DistanceMode::Distance2D, EnvQueryContext::Querier, config)
}

fn xs(locations: Vec<Vec3>) -> Vec<f32> {
    locations.into_iter().map(|l| l.x).collect()
}

#[test]
fn range_filter_keeps_items_in_generation_order() {
    let template = Arc::new(
        QueryTemplate::new("filter", points(&[5.0, 15.0, 8.0]))
            .with_test(distance(TestConfig::filter_range(0.0, 10.0))),
    );
    let mut query = QueryInstance::new(template, QueryParams::new());
    let result = query.execute(&origin).unwrap();

    assert_eq!(query.status(), QueryStatus::Finished);
    assert_eq!(xs(result.locations()), vec![5.0, 8.0]);
    assert_eq!(result.items[0].generation_index(), 0);
    assert_eq!(result.items[1].generation_index(), 2);
    assert!(!query.items()[1].is_valid());
}

#[test]
fn scores_sort_descending() {
    let template = Arc::new(
        QueryTemplate::new("far", points(&[5.0, 15.0, 8.0]))
            .with_test(distance(TestConfig::score(ScoringEquation::Linear, 1.0))),
    );
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&origin)
        .unwrap();

    assert_eq!(xs(result.locations()), vec![15.0, 8.0, 5.0]);
    assert_eq!(result.items[0].score(), 1.0);
    assert_eq!(result.items[2].score(), 0.0);
}

#[test]
fn negative_factor_prefers_close_items() {
    let template = Arc::new(
        QueryTemplate::new("near", points(&[5.0, 15.0, 8.0]))
            .with_test(distance(TestConfig::score(ScoringEquation::Linear, -1.0))),
    );
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&origin)
        .unwrap();

    assert_eq!(xs(result.locations()), vec![5.0, 8.0, 15.0]);
}

#[test]
fn equal_scores_keep_generation_order() {
    let generator = CurrentLocation::new(EnvQueryContext::Locations(vec![
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(0.0, 5.0, 0.0),
        Vec3::new(10.0, 0.0, 0.0),
    ]));
    let template = Arc::new(
        QueryTemplate::new("ties", generator)
            .with_test(distance(TestConfig::score(ScoringEquation::Linear, 1.0))),
    );
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&origin)
        .unwrap();

    assert_eq!(
        result.locations(),
        vec![
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
        ]
    );
}

#[test]
fn degenerate_score_range_normalizes_to_one() {
    let template = Arc::new(
        QueryTemplate::new("flat", points(&[4.0, -4.0]))
            .with_test(distance(TestConfig::score(ScoringEquation::Linear, 2.0))),
    );
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&origin)
        .unwrap();

    assert!(result.items.iter().all(|i| i.score() == 2.0));
}

#[test]
fn filter_and_score_only_scores_survivors() {
    let config = TestConfig::filter_max(10.0).and_score(ScoringEquation::InverseLinear, 1.0);
    let template = Arc::new(
        QueryTemplate::new("close", points(&[2.0, 50.0, 6.0])).with_test(distance(config)),
    );
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&origin)
        .unwrap();

    assert_eq!(xs(result.locations()), vec![2.0, 6.0]);
    assert_eq!(result.items[0].score(), 1.0);
    assert_eq!(result.items[1].score(), 0.0);
}

#[test]
fn filter_bounds_read_query_params() {
    let config = TestConfig::filter_max(FloatParam::named("MaxRange", 100.0));
    let template = Arc::new(
        QueryTemplate::new("param", points(&[5.0, 15.0, 8.0])).with_test(distance(config)),
    );

    let all = QueryInstance::new(Arc::clone(&template), QueryParams::new())
        .execute(&origin)
        .unwrap();
    assert_eq!(all.len(), 3);

    let params = QueryParams::new().with("MaxRange", 6.0);
    let near = QueryInstance::new(template, params).execute(&origin).unwrap();
    assert_eq!(xs(near.locations()), vec![5.0]);
}

#[test]
fn multiple_context_filter_ops() {
    let contexts = EnvQueryContext::Locations(vec![Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)]);
    let run = |op: MultipleContextFilterOp| {
        let config = TestConfig::filter_max(10.0)
            .with_context_ops(op, MultipleContextScoreOp::Average);
        let test = DistanceTest::new(DistanceMode::Distance3D, contexts.clone(), config);
        let template = Arc::new(QueryTemplate::new("multi", points(&[5.0, 50.0])).with_test(test));
        QueryInstance::new(template, QueryParams::new())
            .execute(&origin)
            .unwrap()
    };

    assert!(run(MultipleContextFilterOp::AllPass).is_empty());
    assert_eq!(xs(run(MultipleContextFilterOp::AnyPass).locations()), vec![5.0]);
}

#[test]
fn test_without_context_locations_changes_nothing() {
    let test = DistanceTest::new(
        DistanceMode::Distance3D,
        EnvQueryContext::named("Missing"),
        TestConfig::filter_range(0.0, 1.0),
    );
    let template = Arc::new(QueryTemplate::new("noop", points(&[5.0, 15.0])).with_test(test));
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&origin)
        .unwrap();

    assert_eq!(result.len(), 2);
}

#[test]
fn zero_generated_items_finish_immediately() {
    let template = Arc::new(
        QueryTemplate::new("empty", CurrentLocation::new(EnvQueryContext::named("Missing")))
            .with_test(distance(TestConfig::filter_range(0.0, 10.0))),
    );
    let mut query = QueryInstance::new(template, QueryParams::new());

    assert_eq!(query.step(&origin).unwrap(), QueryStatus::Finished);
    assert!(query.result().unwrap().is_empty());
    assert_eq!(query.stats().len(), 1);
}

#[test]
fn filtering_everything_out_skips_remaining_tests() {
    let template = Arc::new(
        QueryTemplate::new("gone", points(&[5.0, 15.0]))
            .with_test(distance(TestConfig::filter_range(100.0, 200.0)))
            .with_test(distance(TestConfig::score(ScoringEquation::Linear, 1.0))),
    );
    let mut query = QueryInstance::new(template, QueryParams::new());
    let result = query.execute(&origin).unwrap();

    assert!(result.is_empty());
    let steps: Vec<QueryStep> = query.stats().iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![QueryStep::Generate, QueryStep::Test(0)]);
    assert_eq!(query.stats()[1].items_before, 2);
    assert_eq!(query.stats()[1].items_after, 0);
}

#[test]
fn inverted_filter_range_fails_the_query() {
    let template = Arc::new(
        QueryTemplate::new("broken", points(&[5.0]))
            .with_test(distance(TestConfig::filter_range(10.0, 0.0))),
    );
    let mut query = QueryInstance::new(template, QueryParams::new());
    let err = query.execute(&origin).unwrap_err();

    assert!(matches!(
        err,
        QueryError::InvalidFilterRange { min, max, .. } if min == 10.0 && max == 0.0
    ));
    assert_eq!(query.status(), QueryStatus::Failed);
    assert_eq!(query.error(), Some(&err));
    assert!(query.result().is_none());
    assert_eq!(query.execute(&origin).unwrap_err(), err);
}

#[test]
fn steps_advance_one_test_at_a_time() {
    let template = Arc::new(
        QueryTemplate::new("steps", points(&[5.0, 15.0, 8.0]))
            .with_test(distance(TestConfig::filter_max(20.0)))
            .with_test(distance(TestConfig::score(ScoringEquation::Square, 1.0))),
    );
    let mut query = QueryInstance::new(template, QueryParams::new());

    assert_eq!(query.status(), QueryStatus::NotStarted);
    assert!(matches!(
        query.run_test(&origin),
        Err(QueryError::InvalidState { status: QueryStatus::NotStarted, .. })
    ));
    assert_eq!(query.step(&origin).unwrap(), QueryStatus::Testing(0));
    assert!(query.generate_items(&origin).is_err());
    assert_eq!(query.step(&origin).unwrap(), QueryStatus::Testing(1));
    assert!(query.result().is_none());
    assert_eq!(query.step(&origin).unwrap(), QueryStatus::Finished);
    assert!(query.step(&origin).is_err());

    assert_eq!(query.stats().len(), 3);
    assert_eq!(xs(query.result().unwrap().locations()), vec![15.0, 8.0, 5.0]);
}

#[test]
fn abort_is_terminal() {
    let template = Arc::new(
        QueryTemplate::new("abort", SimpleGrid::new(100.0, 50.0, EnvQueryContext::Querier))
            .with_test(distance(TestConfig::filter_max(60.0))),
    );
    let mut query = QueryInstance::new(template, QueryParams::new());

    query.step(&origin).unwrap();
    assert!(query.abort());
    assert_eq!(query.status(), QueryStatus::Aborted);
    assert!(!query.abort());
    assert!(query.step(&origin).is_err());
    assert_eq!(
        query.execute(&origin).unwrap_err(),
        QueryError::Aborted("abort".to_string())
    );
    assert!(query.result().is_none());
}

#[test]
fn single_best_reports_one_item() {
    let template = Arc::new(
        QueryTemplate::new("best", points(&[5.0, 15.0, 8.0]))
            .with_test(distance(TestConfig::score(ScoringEquation::Linear, 1.0)))
            .with_run_mode(RunMode::SingleBest),
    );
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&origin)
        .unwrap();

    assert_eq!(result.run_mode, RunMode::SingleBest);
    assert_eq!(xs(result.locations()), vec![15.0]);
    assert_eq!(result.best().map(|i| i.location().x), Some(15.0));
}

#[test]
fn random_best_is_seeded_and_stays_in_band() {
    let template = Arc::new(
        QueryTemplate::new("random", points(&[0.0, 100.0, 99.0, 98.0, 50.0]))
            .with_test(distance(TestConfig::score(ScoringEquation::Linear, 1.0)))
            .with_run_mode(RunMode::RandomBest5Pct),
    );

    for seed in 0..32 {
        let run = || {
            QueryInstance::new(Arc::clone(&template), QueryParams::new())
                .with_seed(seed)
                .execute(&origin)
                .unwrap()
        };
        let first = run();
        assert_eq!(first, run());
        assert_eq!(first.len(), 1);
        assert!(first.items[0].location().x >= 98.0);
    }
}

struct Arena {
    agents: BTreeMap<u64, Vec3>,
}

impl WorldView for Arena {
    type Agent = u64;
}

impl QueryWorld for Arena {
    fn agent_location(&self, agent: u64) -> Option<Vec3> {
        self.agents.get(&agent).copied()
    }

    fn agent_object(&self, agent: u64) -> Option<ObjectRef> {
        self.agents.contains_key(&agent).then_some(ObjectRef(agent))
    }

    fn named_context(&self, querier: u64, name: &str) -> Vec<ContextEntry> {
        match name {
            "Others" => self
                .agents
                .iter()
                .filter(|(id, _)| **id != querier)
                .map(|(id, loc)| ContextEntry::actor(ObjectRef(*id), *loc))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[test]
fn world_contexts_resolve_querier_and_named_sets() {
    let arena = Arena {
        agents: BTreeMap::from([
            (1, Vec3::new(0.0, 0.0, 0.0)),
            (2, Vec3::new(30.0, 0.0, 0.0)),
            (3, Vec3::new(300.0, 0.0, 0.0)),
        ]),
    };
    let template = Arc::new(
        QueryTemplate::new("nearby", CurrentLocation::new(EnvQueryContext::named("Others")))
            .with_test(DistanceTest::new(
                DistanceMode::Distance3D,
                EnvQueryContext::Querier,
                TestConfig::filter_max(100.0),
            )),
    );

    let contexts = WorldContexts::new(&arena, 1);
    let result = QueryInstance::new(Arc::clone(&template), QueryParams::new())
        .execute(&contexts)
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.items[0].actor_ref(), Some(ObjectRef(2)));

    // Unknown querier: the filter context is empty, so nothing is filtered.
    let contexts = WorldContexts::new(&arena, 9);
    let result = QueryInstance::new(template, QueryParams::new())
        .execute(&contexts)
        .unwrap();
    assert_eq!(result.len(), 3);
}
