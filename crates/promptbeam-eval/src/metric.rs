// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Metric implementations

use promptbeam::Metric;
use std::collections::HashSet;

/// Exact match after trimming surrounding whitespace
pub struct ExactMatch;

impl Metric for ExactMatch {
    fn score(&self, expected: &str, produced: &str) -> f64 {
        if expected.trim() == produced.trim() {
            1.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "exact_match"
    }
}

fn tokenize(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

/// Token-level F1 score
pub struct F1Score;

impl F1Score {
    fn calculate_f1(produced_tokens: &[&str], gold_tokens: &[&str]) -> f64 {
        if produced_tokens.is_empty() || gold_tokens.is_empty() {
            return 0.0;
        }

        let produced_set: HashSet<_> = produced_tokens.iter().collect();
        let gold_set: HashSet<_> = gold_tokens.iter().collect();

        let intersection = produced_set.intersection(&gold_set).count();

        let precision = intersection as f64 / produced_set.len() as f64;
        let recall = intersection as f64 / gold_set.len() as f64;

        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * (precision * recall) / (precision + recall)
        }
    }
}

impl Metric for F1Score {
    fn score(&self, expected: &str, produced: &str) -> f64 {
        Self::calculate_f1(&tokenize(produced), &tokenize(expected))
    }

    fn name(&self) -> &str {
        "f1_score"
    }
}

/// Jaccard overlap between token sets
pub struct TokenOverlap;

impl Metric for TokenOverlap {
    fn score(&self, expected: &str, produced: &str) -> f64 {
        let expected_set: HashSet<&str> = tokenize(expected).into_iter().collect();
        let produced_set: HashSet<&str> = tokenize(produced).into_iter().collect();

        if expected_set.is_empty() && produced_set.is_empty() {
            return 1.0;
        }

        let intersection = expected_set.intersection(&produced_set).count();
        let union = expected_set.union(&produced_set).count();
        intersection as f64 / union as f64
    }

    fn name(&self) -> &str {
        "token_overlap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(ExactMatch.score("Paris", "Paris"), 1.0);
        assert_eq!(ExactMatch.score("Paris", "  Paris \n"), 1.0);
        assert_eq!(ExactMatch.score("Paris", "paris"), 0.0);
        assert_eq!(ExactMatch.name(), "exact_match");
    }

    #[test]
    fn test_f1_identical() {
        assert_eq!(F1Score.score("the quick fox", "the quick fox"), 1.0);
    }

    #[test]
    fn test_f1_partial() {
        // produced shares 2 of 3 tokens with gold: p = 2/3, r = 2/3
        let score = F1Score.score("a b c", "a b d");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_f1_empty() {
        assert_eq!(F1Score.score("", "anything"), 0.0);
        assert_eq!(F1Score.score("anything", ""), 0.0);
    }

    #[test]
    fn test_f1_no_overlap() {
        assert_eq!(F1Score.score("a b", "c d"), 0.0);
    }

    #[test]
    fn test_token_overlap() {
        assert_eq!(TokenOverlap.score("a b", "a b"), 1.0);
        assert_eq!(TokenOverlap.score("a b", "b c"), 1.0 / 3.0);
        assert_eq!(TokenOverlap.score("", ""), 1.0);
        assert_eq!(TokenOverlap.score("a", ""), 0.0);
    }
}
