//! Environment queries.
//!
//! A [`QueryTemplate`] pairs one [`Generator`] with an ordered list of [`Test`]s. A
//! [`QueryInstance`] executes a template for one querier: the generator produces candidate items
//! around resolved contexts, then each test filters and/or scores the items still in play.
//! Surviving items are returned by descending score, ties kept in generation order.
//!
//! Contexts are resolved by the host through [`ContextResolver`] (or the [`QueryWorld`] adapter);
//! nothing in this crate reaches for global state.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod instance;
pub mod item;
pub mod param;
pub mod template;
pub mod test;

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use config::{GeneratorConfig, QueryTemplateConfig, TestSpec};
pub use context::{ContextEntry, ContextResolver, EnvQueryContext, QueryWorld, WorldContexts};
pub use error::QueryError;
pub use generator::{CirclePoints, CurrentLocation, Generator, OnCircle, QueryEnv, SimpleGrid};
pub use instance::{QueryInstance, QueryResult, QueryStatus, QueryStep, StepStats};
pub use item::{EnvQueryItem, ItemKind};
pub use param::{FloatParam, QueryParams};
pub use template::{QueryTemplate, RunMode};
pub use test::{
    run_test, DistanceMode, DistanceTest, FilterType, MultipleContextFilterOp,
    MultipleContextScoreOp, ScoringEquation, Test, TestConfig, TestPurpose,
};
