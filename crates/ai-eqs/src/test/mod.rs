//! Item tests: shared filter/score plumbing plus concrete metrics.


pub use distance::{DistanceMode, DistanceTest};

use ai_core::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{EnvQueryContext, EnvQueryItem, FloatParam, QueryEnv, QueryError, QueryParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TestPurpose {
    Filter,
    #[default]
    Score,
    FilterAndScore,
}

impl TestPurpose {
    pub fn filters(self) -> bool {
        matches!(self, TestPurpose::Filter | TestPurpose::FilterAndScore)
    }

    pub fn scores(self) -> bool {
        matches!(self, TestPurpose::Score | TestPurpose::FilterAndScore)
    }
}

/// Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterType {
    Minimum,
    Maximum,
    #[default]
    Range,
}

/// Shapes the normalized test value (in `[0, 1]`) before it is weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScoringEquation {
    #[default]
    Linear,
    InverseLinear,
    Square,
    SquareRoot,
    Constant,
}

impl ScoringEquation {
    pub fn apply(self, normalized: f32) -> f32 {
        match self {
            ScoringEquation::Linear => normalized,
            ScoringEquation::InverseLinear => 1.0 - normalized,
            ScoringEquation::Square => normalized * normalized,
            ScoringEquation::SquareRoot => normalized.sqrt(),
            ScoringEquation::Constant => 1.0,
        }
    }
}

/// How per-context values decide a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MultipleContextFilterOp {
    #[default]
    AllPass,
    AnyPass,
}

/// How per-context values collapse into one score input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MultipleContextScoreOp {
    #[default]
    Average,
    Min,
    Max,
    Sum,
}

impl MultipleContextScoreOp {
    fn combine(self, values: &[f32]) -> f32 {
        match self {
            MultipleContextScoreOp::Average => values.iter().sum::<f32>() / values.len() as f32,
            MultipleContextScoreOp::Min => values.iter().copied().fold(f32::INFINITY, f32::min),
            MultipleContextScoreOp::Max => values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            MultipleContextScoreOp::Sum => values.iter().sum(),
        }
    }
}

/// Filter/score settings shared by all tests.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TestConfig {
    pub purpose: TestPurpose,
    pub filter_type: FilterType,
    pub filter_min: FloatParam,
    pub filter_max: FloatParam,
    pub scoring_equation: ScoringEquation,
    /// Weight of this test's contribution. Negative values favour low raw values.
    pub scoring_factor: FloatParam,
    pub multiple_context_filter: MultipleContextFilterOp,
    pub multiple_context_score: MultipleContextScoreOp,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            purpose: TestPurpose::default(),
            filter_type: FilterType::default(),
            filter_min: FloatParam::default(),
            filter_max: FloatParam::default(),
            scoring_equation: ScoringEquation::default(),
            scoring_factor: FloatParam::Value(1.0),
            multiple_context_filter: MultipleContextFilterOp::default(),
            multiple_context_score: MultipleContextScoreOp::default(),
        }
    }
}

impl TestConfig {
    pub fn score(equation: ScoringEquation, factor: impl Into<FloatParam>) -> Self {
        Self {
            purpose: TestPurpose::Score,
            scoring_equation: equation,
            scoring_factor: factor.into(),
            ..Self::default()
        }
    }

    pub fn filter_range(min: impl Into<FloatParam>, max: impl Into<FloatParam>) -> Self {
        Self {
            purpose: TestPurpose::Filter,
            filter_type: FilterType::Range,
            filter_min: min.into(),
            filter_max: max.into(),
            ..Self::default()
        }
    }

    pub fn filter_min(min: impl Into<FloatParam>) -> Self {
        Self {
            purpose: TestPurpose::Filter,
            filter_type: FilterType::Minimum,
            filter_min: min.into(),
            ..Self::default()
        }
    }

    pub fn filter_max(max: impl Into<FloatParam>) -> Self {
        Self {
            purpose: TestPurpose::Filter,
            filter_type: FilterType::Maximum,
            filter_max: max.into(),
            ..Self::default()
        }
    }

    /// Keep the filter and also score surviving items.
    pub fn and_score(mut self, equation: ScoringEquation, factor: impl Into<FloatParam>) -> Self {
        self.purpose = TestPurpose::FilterAndScore;
        self.scoring_equation = equation;
        self.scoring_factor = factor.into();
        self
    }

    pub fn with_context_ops(
        mut self,
        filter: MultipleContextFilterOp,
        score: MultipleContextScoreOp,
    ) -> Self {
        self.multiple_context_filter = filter;
        self.multiple_context_score = score;
        self
    }

    fn filter_bounds(&self, params: &QueryParams) -> (f32, f32) {
        match self.filter_type {
            FilterType::Minimum => (self.filter_min.resolve(params), f32::INFINITY),
            FilterType::Maximum => (f32::NEG_INFINITY, self.filter_max.resolve(params)),
            FilterType::Range => (self.filter_min.resolve(params), self.filter_max.resolve(params)),
        }
    }
}

/// A metric evaluated between an item and each location of the test's context.
pub trait Test: Send + Sync {
    fn config(&self) -> &TestConfig;

    fn context(&self) -> &EnvQueryContext;

    fn item_value(&self, item: &EnvQueryItem, context_location: Vec3) -> f32;

    fn describe(&self) -> String;
}

/// Apply `test` to every item that is still valid.
///
/// Filtering discards items whose values fall outside the configured bounds. Scoring normalizes
/// the combined values of the surviving items to `[0, 1]`, shapes them with the scoring equation
/// and adds `factor * shaped` to each item. A context without locations leaves all items as they
/// are.
pub fn run_test(
    test: &dyn Test,
    env: &QueryEnv<'_>,
    items: &mut [EnvQueryItem],
) -> Result<(), QueryError> {
    let config = test.config();
    let contexts = env.locations(test.context());
    if contexts.is_empty() {
        tracing::debug!(test = %test.describe(), "test context resolved no locations, skipping");
        return Ok(());
    }

    let bounds = if config.purpose.filters() {
        let (min, max) = config.filter_bounds(env.params);
        if min > max || min.is_nan() || max.is_nan() {
            return Err(QueryError::InvalidFilterRange {
                test: test.describe(),
                min,
                max,
            });
        }
        Some((min, max))
    } else {
        None
    };

    let mut raw_scores = Vec::new();
    let mut values = Vec::with_capacity(contexts.len());
    for (index, item) in items.iter_mut().enumerate() {
        if !item.is_valid() {
            continue;
        }

        values.clear();
        values.extend(contexts.iter().map(|&c| test.item_value(item, c)));

        if let Some((min, max)) = bounds {
            let passes = |v: &f32| *v >= min && *v <= max;
            let passed = match config.multiple_context_filter {
                MultipleContextFilterOp::AllPass => values.iter().all(passes),
                MultipleContextFilterOp::AnyPass => values.iter().any(passes),
            };
            if !passed {
                item.discard();
                continue;
            }
        }

        if config.purpose.scores() {
            raw_scores.push((index, config.multiple_context_score.combine(&values)));
        }
    }

    if config.purpose.scores() {
        apply_scores(config, env.params, &raw_scores, items);
    }
    Ok(())
}

fn apply_scores(
    config: &TestConfig,
    params: &QueryParams,
    raw_scores: &[(usize, f32)],
    items: &mut [EnvQueryItem],
) {
    let factor = config.scoring_factor.resolve(params);

    let (min, max) = raw_scores
        .iter()
        .map(|&(_, v)| v)
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    for &(index, value) in raw_scores {
        if !value.is_finite() {
            continue;
        }
        let normalized = if max > min {
            (value - min) / (max - min)
        } else {
            1.0
        };
        items[index].add_score(factor * config.scoring_equation.apply(normalized));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_equations() {
        assert_eq!(ScoringEquation::Linear.apply(0.25), 0.25);
        assert_eq!(ScoringEquation::InverseLinear.apply(0.25), 0.75);
        assert_eq!(ScoringEquation::Square.apply(0.5), 0.25);
        assert_eq!(ScoringEquation::SquareRoot.apply(0.25), 0.5);
        assert_eq!(ScoringEquation::Constant.apply(0.0), 1.0);
    }

    #[test]
    fn test_combine_ops() {
        let values = [1.0, 3.0, 8.0];
        assert_eq!(MultipleContextScoreOp::Average.combine(&values), 4.0);
        assert_eq!(MultipleContextScoreOp::Min.combine(&values), 1.0);
        assert_eq!(MultipleContextScoreOp::Max.combine(&values), 8.0);
        assert_eq!(MultipleContextScoreOp::Sum.combine(&values), 12.0);
    }

    #[test]
    fn test_filter_bounds_by_type() {
        let params = QueryParams::new().with("MaxRange", 30.0);
        let cfg = TestConfig::filter_max(FloatParam::named("MaxRange", 10.0));
        assert_eq!(cfg.filter_bounds(&params), (f32::NEG_INFINITY, 30.0));

        let cfg = TestConfig::filter_min(5.0);
        assert_eq!(cfg.filter_bounds(&params), (5.0, f32::INFINITY));
    }
}
