// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Candidate prompts and run records

use serde::{Deserialize, Serialize};

/// One prompt instance within one round.
///
/// Fitness is absent until the candidate is scored and is never recomputed
/// afterwards. Lineage is implicit: the round in which a prompt's text first
/// appears identifies its generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The prompt text
    pub prompt: String,
    /// Round the candidate was generated in
    pub round: u32,
    /// Position within the round's population
    pub index: u32,
    /// Fitness, absent until scored
    pub fitness: Option<f64>,
}

impl Candidate {
    /// Create an unscored candidate
    pub fn new(prompt: impl Into<String>, round: u32, index: u32) -> Self {
        Self {
            prompt: prompt.into(),
            round,
            index,
            fitness: None,
        }
    }

    /// Consume the candidate, attaching its fitness
    pub fn scored(mut self, fitness: f64) -> Self {
        self.fitness = Some(fitness);
        self
    }

    /// Durable record for this candidate; unscored candidates record 0.0
    pub fn record(&self) -> CandidateRecord {
        CandidateRecord {
            round: self.round,
            prompt: self.prompt.clone(),
            fitness: self.fitness.unwrap_or(0.0),
        }
    }
}

/// Line-delimited record of one scored candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Round the candidate was scored in
    pub round: u32,
    /// The prompt text
    pub prompt: String,
    /// Average fitness over answered examples
    pub fitness: f64,
}

/// Final outcome of an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Highest-scoring prompt seen across the run
    pub best_prompt: String,
    /// Its fitness
    pub best_fitness: f64,
    /// Every scored candidate, in round order
    pub all_results: Vec<CandidateRecord>,
    /// Number of rounds run
    pub rounds: u32,
    /// Total candidates evaluated
    pub total_evaluations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_scoring() {
        let candidate = Candidate::new("You are helpful.", 2, 7);
        assert!(candidate.fitness.is_none());

        let scored = candidate.scored(0.85);
        assert_eq!(scored.fitness, Some(0.85));

        let record = scored.record();
        assert_eq!(record.round, 2);
        assert_eq!(record.fitness, 0.85);
    }

    #[test]
    fn test_unscored_record_is_zero() {
        let record = Candidate::new("p", 0, 0).record();
        assert_eq!(record.fitness, 0.0);
    }

    #[test]
    fn test_record_serialization() {
        let record = CandidateRecord {
            round: 1,
            prompt: "p".to_string(),
            fitness: 0.5,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"round":1,"prompt":"p","fitness":0.5}"#);
    }
}
