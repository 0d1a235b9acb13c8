// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Fitness scoring.
//!
//! Fitness is the metric score averaged over *answered* examples: items
//! missing from a batch result set are skipped, not penalized. A prompt
//! with no answered examples scores 0.0.

use crate::example::EvalExample;
use crate::metric::Metric;
use crate::orchestrator::RequestId;
use promptbeam_client::{ChatRequest, Lm, Message};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

const EVAL_TEMPERATURE: f32 = 0.3;
const EVAL_MAX_TOKENS: u32 = 1000;

/// Number of examples that must be scored before early stopping can trigger
const EARLY_STOP_MIN_EXAMPLES: usize = 5;

/// Applies the run's metric to raw evaluation outputs
pub struct FitnessScorer {
    metric: Arc<dyn Metric>,
}

impl FitnessScorer {
    /// Create a scorer over a metric
    pub fn new(metric: Arc<dyn Metric>) -> Self {
        Self { metric }
    }

    /// The metric in use
    pub fn metric(&self) -> &Arc<dyn Metric> {
        &self.metric
    }

    /// Score a round's population from batch results.
    ///
    /// Returns one fitness per prompt, in population order.
    pub fn score_round(
        &self,
        prompts: &[String],
        examples: &[EvalExample],
        results: &HashMap<RequestId, String>,
        round: u32,
    ) -> Vec<f64> {
        let mut fitness_scores = Vec::with_capacity(prompts.len());

        for prompt_idx in 0..prompts.len() {
            let mut total = 0.0;
            let mut count = 0usize;

            for (example_idx, example) in examples.iter().enumerate() {
                let id = RequestId::new(round, prompt_idx as u32, example_idx as u32);
                if let Some(produced) = results.get(&id) {
                    total += self.metric.score(&example.expected, produced);
                    count += 1;
                }
            }

            let fitness = if count > 0 { total / count as f64 } else { 0.0 };
            fitness_scores.push(fitness);
        }

        fitness_scores
    }

    /// Score one prompt example by example through a chat LM.
    ///
    /// The sequential path evaluates eagerly and prunes aggressively: once
    /// more than five examples are scored, a running
    /// average below `best_fitness - pruning_threshold` abandons the
    /// remaining examples and records the fitness as exactly 0.0. Failed
    /// per-example calls are logged and skipped.
    pub async fn score_examples(
        &self,
        lm: &Arc<dyn Lm>,
        prompt: &str,
        examples: &[EvalExample],
        best_fitness: f64,
        pruning_threshold: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;

        for (i, example) in examples.iter().enumerate() {
            let request = ChatRequest::new()
                .message(Message::system(prompt))
                .message(Message::user(example.input.as_str()))
                .with_temperature(EVAL_TEMPERATURE)
                .with_max_tokens(EVAL_MAX_TOKENS);

            match lm.generate(request).await {
                Ok(response) => {
                    total += self.metric.score(&example.expected, &response.text);
                    count += 1;

                    let running = total / count as f64;
                    if count > EARLY_STOP_MIN_EXAMPLES
                        && running < best_fitness - pruning_threshold
                    {
                        info!(
                            running_avg = %format!("{:.3}", running),
                            cutoff = %format!("{:.3}", best_fitness - pruning_threshold),
                            "early stopping candidate"
                        );
                        return 0.0;
                    }
                }
                Err(e) => {
                    warn!(example = i, error = %e, "error evaluating example");
                    continue;
                }
            }
        }

        if count > 0 {
            total / count as f64
        } else {
            0.0
        }
    }
}
