//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! - [`core`]: typed blackboard with synchronous change observers
//! - [`bt`]: blackboard-driven behavior tree decorators
//! - [`eqs`]: environment queries (generate, filter and score candidate locations)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use ai_bt as bt;

#[cfg(feature = "eqs")]
#[cfg_attr(docsrs, doc(cfg(feature = "eqs")))]
pub use ai_eqs as eqs;
