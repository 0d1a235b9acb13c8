// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Beam search over prompt variations.
//!
//! Each round evaluates the whole population, keeps the top
//! `max(1, breadth / 3)` candidates, and expands the survivors back to
//! `breadth` variations for the next round. The loop runs for exactly
//! `max_rounds` rounds; there is no convergence-based exit.

use crate::candidate::{Candidate, CandidateRecord, OptimizeResult};
use crate::config::{EvalStrategy, OptimizerConfig};
use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::example::EvalSet;
use crate::generator::VariationGenerator;
use crate::metric::Metric;
use crate::orchestrator::BatchEvaluator;
use crate::scorer::FitnessScorer;
use crate::store::{JsonlStore, ResultStore, RunParameters};
use promptbeam_client::{BatchClient, Lm};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::info;

/// Builder for [`PromptOptimizer`].
pub struct PromptOptimizerBuilder {
    base_prompt: String,
    generator_lm: Arc<dyn Lm>,
    batch_client: Option<Arc<dyn BatchClient>>,
    evaluator_model: Option<String>,
    sequential_lm: Option<Arc<dyn Lm>>,
    metric: Option<Arc<dyn Metric>>,
    config: OptimizerConfig,
    store: Option<Box<dyn ResultStore>>,
    context: Option<RunContext>,
}

impl PromptOptimizerBuilder {
    /// Evaluate rounds through a bulk batch job against the given model
    pub fn batch_evaluator(
        mut self,
        client: Arc<dyn BatchClient>,
        model: impl Into<String>,
    ) -> Self {
        self.batch_client = Some(client);
        self.evaluator_model = Some(model.into());
        self
    }

    /// Evaluate rounds one example at a time through a chat LM.
    ///
    /// Selects the sequential strategy, which applies per-example early
    /// stopping against the incumbent best.
    pub fn sequential_evaluator(mut self, lm: Arc<dyn Lm>) -> Self {
        self.evaluator_model = Some(lm.model().to_string());
        self.sequential_lm = Some(lm);
        self.config = self.config.with_eval_strategy(EvalStrategy::Sequential);
        self
    }

    /// Set the quality metric. Required.
    pub fn metric(mut self, metric: Arc<dyn Metric>) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Set the optimizer configuration
    pub fn config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the result store; defaults to a [`JsonlStore`] under the context
    pub fn store(mut self, store: Box<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the run context; defaults to a wall-clock id under `results/`
    pub fn context(mut self, context: RunContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Build the optimizer.
    ///
    /// Fails before any external call is made: a missing metric or a
    /// missing evaluation backend for the selected strategy is a fatal
    /// configuration error.
    pub fn build(self) -> Result<PromptOptimizer> {
        let metric = self.metric.ok_or(Error::MissingMetric)?;

        let evaluator = match self.config.eval_strategy {
            EvalStrategy::Batch => {
                let client = self.batch_client.ok_or(Error::MissingEvaluator)?;
                let model = self
                    .evaluator_model
                    .clone()
                    .unwrap_or_else(|| "gpt-3.5-turbo".to_string());
                RoundEvaluator::Batch(
                    BatchEvaluator::new(client, model)
                        .with_poll_interval(self.config.poll_interval)
                        .with_max_polls(self.config.max_polls),
                )
            }
            EvalStrategy::Sequential => {
                RoundEvaluator::Sequential(self.sequential_lm.ok_or(Error::MissingEvaluator)?)
            }
        };

        let context = self.context.unwrap_or_else(|| RunContext::new("results"));
        let store = match self.store {
            Some(store) => store,
            None => Box::new(JsonlStore::new(context.clone())?),
        };

        Ok(PromptOptimizer {
            base_prompt: self.base_prompt,
            generator: VariationGenerator::new(self.generator_lm, self.config.temperature),
            evaluator,
            evaluator_model: self.evaluator_model.unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            scorer: FitnessScorer::new(metric),
            config: self.config,
            store,
            context,
        })
    }
}

enum RoundEvaluator {
    Batch(BatchEvaluator),
    Sequential(Arc<dyn Lm>),
}

/// Beam-search controller over prompt variations.
pub struct PromptOptimizer {
    base_prompt: String,
    generator: VariationGenerator,
    evaluator: RoundEvaluator,
    evaluator_model: String,
    scorer: FitnessScorer,
    config: OptimizerConfig,
    store: Box<dyn ResultStore>,
    context: RunContext,
}

impl std::fmt::Debug for PromptOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptOptimizer")
            .field("base_prompt", &self.base_prompt)
            .field("evaluator_model", &self.evaluator_model)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PromptOptimizer {
    /// Start building an optimizer for a base prompt
    pub fn builder(base_prompt: impl Into<String>, generator_lm: Arc<dyn Lm>) -> PromptOptimizerBuilder {
        PromptOptimizerBuilder {
            base_prompt: base_prompt.into(),
            generator_lm,
            batch_client: None,
            evaluator_model: None,
            sequential_lm: None,
            metric: None,
            config: OptimizerConfig::default(),
            store: None,
            context: None,
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The run context in use
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Run the optimization loop and return the best prompt found.
    ///
    /// Round 0 starts from `initial_variations` (truncated or padded to
    /// `breadth`) when supplied, otherwise from fresh variations of the
    /// base prompt. The incumbent best is replaced only on strictly
    /// greater fitness, so the earliest candidate wins ties.
    pub async fn optimize(
        &mut self,
        evaluation_set: &EvalSet,
        initial_variations: Option<Vec<String>>,
    ) -> Result<OptimizeResult> {
        let breadth = self.config.breadth;

        let mut population = match initial_variations {
            Some(mut variations) => {
                variations.truncate(breadth);
                if variations.len() < breadth {
                    let missing = breadth - variations.len();
                    variations.extend(self.generator.generate(&self.base_prompt, missing).await);
                }
                variations
            }
            None => self.generator.generate(&self.base_prompt, breadth).await,
        };

        let mut best_prompt = self.base_prompt.clone();
        let mut best_fitness = 0.0f64;
        let mut all_results: Vec<CandidateRecord> = Vec::new();

        self.store.write_parameters(&RunParameters {
            base_prompt: self.base_prompt.clone(),
            generator_model: self.generator.model().to_string(),
            evaluator_model: self.evaluator_model.clone(),
            breadth,
            max_rounds: self.config.max_rounds,
            pruning_threshold: self.config.pruning_threshold,
            temperature: self.config.temperature,
            run_start: self.context.run_id().to_string(),
        });

        for round in 0..self.config.max_rounds {
            info!(
                round = round + 1,
                total = self.config.max_rounds,
                "optimization round"
            );

            let scores = self
                .evaluate_round(&population, evaluation_set, round, best_fitness)
                .await?;

            for (i, (prompt, fitness)) in population.iter().zip(scores.iter()).enumerate() {
                let candidate = Candidate::new(prompt.clone(), round, i as u32).scored(*fitness);
                self.store.record_candidate(&candidate);
                all_results.push(candidate.record());

                if *fitness > best_fitness {
                    best_fitness = *fitness;
                    best_prompt = prompt.clone();
                    info!(
                        fitness = %format!("{:.4}", best_fitness),
                        variation = i + 1,
                        "new best fitness"
                    );
                }
            }

            // Stable descending sort: ties keep generation order.
            let mut ranked: Vec<usize> = (0..population.len()).collect();
            ranked.sort_by(|&a, &b| {
                scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal)
            });

            let survivors: SmallVec<[usize; 8]> =
                ranked.iter().take(self.config.top_k()).copied().collect();

            // The final round performs no expansion.
            if round + 1 < self.config.max_rounds {
                let per_survivor = if survivors.is_empty() {
                    0
                } else {
                    breadth / survivors.len()
                };

                let mut next = Vec::with_capacity(breadth);
                for &idx in &survivors {
                    next.extend(self.generator.generate(&population[idx], per_survivor).await);
                }

                // Fill remaining slots with variations of the incumbent best.
                while next.len() < breadth {
                    next.extend(self.generator.generate(&best_prompt, 1).await);
                }
                next.truncate(breadth);
                population = next;
            }
        }

        let total_evaluations = all_results.len();
        let result = OptimizeResult {
            best_prompt,
            best_fitness,
            all_results,
            rounds: self.config.max_rounds,
            total_evaluations,
        };
        self.store.write_final_summary(&result);

        Ok(result)
    }

    async fn evaluate_round(
        &self,
        population: &[String],
        evaluation_set: &EvalSet,
        round: u32,
        best_fitness: f64,
    ) -> Result<Vec<f64>> {
        match &self.evaluator {
            RoundEvaluator::Batch(evaluator) => {
                let results = evaluator
                    .evaluate(population, evaluation_set.as_slice(), round)
                    .await?;
                Ok(self.scorer.score_round(
                    population,
                    evaluation_set.as_slice(),
                    &results,
                    round,
                ))
            }
            RoundEvaluator::Sequential(lm) => {
                let mut scores = Vec::with_capacity(population.len());
                for prompt in population {
                    scores.push(
                        self.scorer
                            .score_examples(
                                lm,
                                prompt,
                                evaluation_set.as_slice(),
                                best_fitness,
                                self.config.pruning_threshold,
                            )
                            .await,
                    );
                }
                Ok(scores)
            }
        }
    }
}
