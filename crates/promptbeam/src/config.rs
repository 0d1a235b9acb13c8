// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Optimizer configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a round's population is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalStrategy {
    /// One bulk batch job covering the whole prompt × example cross product
    Batch,
    /// One chat call per (prompt, example), with per-example early stopping
    Sequential,
}

/// Beam search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Population size per round
    pub breadth: usize,
    /// Number of optimization rounds
    pub max_rounds: u32,
    /// Fitness gap below the incumbent best that triggers per-example
    /// early stopping in sequential mode
    pub pruning_threshold: f64,
    /// Temperature for variation generation
    pub temperature: f32,
    /// Interval between batch status polls
    pub poll_interval: Duration,
    /// Optional bound on the number of status polls; `None` waits
    /// indefinitely for a terminal status
    pub max_polls: Option<u32>,
    /// Evaluation path for each round
    pub eval_strategy: EvalStrategy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            breadth: 100,
            max_rounds: 5,
            pruning_threshold: 0.03,
            temperature: 0.7,
            poll_interval: Duration::from_secs(10),
            max_polls: None,
            eval_strategy: EvalStrategy::Batch,
        }
    }
}

impl OptimizerConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set population size per round
    pub fn with_breadth(mut self, breadth: usize) -> Self {
        self.breadth = breadth;
        self
    }

    /// Set number of rounds
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set the early-stopping threshold
    pub fn with_pruning_threshold(mut self, threshold: f64) -> Self {
        self.pruning_threshold = threshold;
        self
    }

    /// Set generation temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the batch poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bound the number of batch status polls
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    /// Set the evaluation strategy
    pub fn with_eval_strategy(mut self, strategy: EvalStrategy) -> Self {
        self.eval_strategy = strategy;
        self
    }

    /// Number of survivors per round: `max(1, breadth / 3)`
    pub fn top_k(&self) -> usize {
        (self.breadth / 3).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.breadth, 100);
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.pruning_threshold, 0.03);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.max_polls, None);
        assert_eq!(config.eval_strategy, EvalStrategy::Batch);
    }

    #[test]
    fn test_top_k() {
        assert_eq!(OptimizerConfig::new().with_breadth(3).top_k(), 1);
        assert_eq!(OptimizerConfig::new().with_breadth(10).top_k(), 3);
        assert_eq!(OptimizerConfig::new().with_breadth(1).top_k(), 1);
        assert_eq!(OptimizerConfig::new().with_breadth(100).top_k(), 33);
    }

    #[test]
    fn test_builder() {
        let config = OptimizerConfig::new()
            .with_breadth(8)
            .with_max_rounds(4)
            .with_pruning_threshold(0.05)
            .with_max_polls(30)
            .with_eval_strategy(EvalStrategy::Sequential);

        assert_eq!(config.breadth, 8);
        assert_eq!(config.max_rounds, 4);
        assert_eq!(config.pruning_threshold, 0.05);
        assert_eq!(config.max_polls, Some(30));
        assert_eq!(config.eval_strategy, EvalStrategy::Sequential);
    }
}
