// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! # Promptbeam - Beam-Search Prompt Optimization
//!
//! Optimizes a natural-language instruction for a generative model by
//! iteratively generating candidate rewordings, scoring them against a fixed
//! labeled evaluation set, and converging on a high-fitness candidate.
//!
//! ## Architecture
//!
//! - [`VariationGenerator`]: asks a generator LM for N rewordings of a seed
//!   prompt; degrades to suffixed variants instead of failing.
//! - [`BatchEvaluator`]: submits the prompt × example cross product as one
//!   bulk job and polls it to completion.
//! - [`FitnessScorer`]: averages the metric over answered examples,
//!   tolerant of missing items.
//! - [`PromptOptimizer`]: drives the round loop — evaluate, rank, select
//!   `max(1, breadth / 3)` survivors, expand back to `breadth`.
//! - [`ResultStore`]: append-only record of parameters, per-candidate
//!   results, and the final summary.
//!
//! ## Quick Start
//!
//! ```
//! use promptbeam::{EvalSet, FnMetric, MemoryStore, OptimizerConfig, PromptOptimizer};
//! use promptbeam_client::{MockBatchClient, MockLm};
//! use std::sync::Arc;
//!
//! # async fn demo() -> promptbeam::Result<()> {
//! let generator = Arc::new(MockLm::new("mock-gen", |_| {
//!     Ok("Variation one\nVariation two\nVariation three".to_string())
//! }));
//! let batch = Arc::new(MockBatchClient::new(|_system, user| user.to_uppercase()));
//!
//! let mut optimizer = PromptOptimizer::builder("You are a helpful assistant.", generator)
//!     .batch_evaluator(batch, "gpt-3.5-turbo")
//!     .metric(Arc::new(FnMetric::new("exact", |expected, produced| {
//!         if expected == produced { 1.0 } else { 0.0 }
//!     })))
//!     .config(OptimizerConfig::new().with_breadth(3).with_max_rounds(2))
//!     .store(Box::new(MemoryStore::new()))
//!     .build()?;
//!
//! let eval_set = EvalSet::new().example("hello", "HELLO");
//! let result = optimizer.optimize(&eval_set, None).await?;
//! println!("best: {} ({:.4})", result.best_prompt, result.best_fitness);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod candidate;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod example;
pub mod generator;
pub mod metric;
pub mod orchestrator;
pub mod scorer;
pub mod store;

pub use candidate::{Candidate, CandidateRecord, OptimizeResult};
pub use config::{EvalStrategy, OptimizerConfig};
pub use context::RunContext;
pub use controller::{PromptOptimizer, PromptOptimizerBuilder};
pub use error::{Error, Result};
pub use example::{EvalExample, EvalSet};
pub use generator::VariationGenerator;
pub use metric::{FnMetric, Metric};
pub use orchestrator::{BatchEvaluator, RequestId};
pub use scorer::FitnessScorer;
pub use store::{JsonlStore, MemoryStore, ResultStore, RunParameters};
