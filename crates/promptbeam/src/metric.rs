// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Metric trait for scoring produced text against an expected reference

/// Scores a produced text against the expected reference.
///
/// Scores are assumed to lie in [0, 1] but this is not enforced.
pub trait Metric: Send + Sync {
    /// Score one (expected, produced) pair
    fn score(&self, expected: &str, produced: &str) -> f64;

    /// Metric name for logging
    fn name(&self) -> &str {
        "metric"
    }
}

/// Adapter wrapping a plain function as a named metric
pub struct FnMetric<F>
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    name: String,
    f: F,
}

impl<F> FnMetric<F>
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    /// Wrap a scoring function
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Metric for FnMetric<F>
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn score(&self, expected: &str, produced: &str) -> f64 {
        (self.f)(expected, produced)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_metric() {
        let metric = FnMetric::new("contains", |expected, produced| {
            if produced.contains(expected) {
                1.0
            } else {
                0.0
            }
        });

        assert_eq!(metric.name(), "contains");
        assert_eq!(metric.score("Paris", "The capital is Paris."), 1.0);
        assert_eq!(metric.score("Paris", "London"), 0.0);
    }
}
