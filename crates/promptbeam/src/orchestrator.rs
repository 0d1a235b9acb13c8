// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Bulk evaluation orchestration.
//!
//! One batch job per round covers the whole prompt × example cross product.
//! Each request carries a composite id `r{round}_p{prompt}_e{example}` which
//! is the only correlation between submitted work and returned output.

use crate::error::{Error, Result};
use crate::example::EvalExample;
use promptbeam_client::{BatchClient, BatchRequestItem, BatchStatus};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};

const EVAL_TEMPERATURE: f32 = 0.3;
const EVAL_MAX_TOKENS: u32 = 1000;

/// Composite correlation key for one batch request.
///
/// Unique within a round and stable across submission and retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId {
    /// Optimization round
    pub round: u32,
    /// Candidate position within the round
    pub prompt: u32,
    /// Example position within the evaluation set
    pub example: u32,
}

impl RequestId {
    /// Create a request id
    pub fn new(round: u32, prompt: u32, example: u32) -> Self {
        Self {
            round,
            prompt,
            example,
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}_p{}_e{}", self.round, self.prompt, self.example)
    }
}

/// Error parsing a request id
#[derive(Debug, ThisError)]
#[error("invalid request id: {0}")]
pub struct InvalidRequestId(String);

impl FromStr for RequestId {
    type Err = InvalidRequestId;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || InvalidRequestId(s.to_string());

        let rest = s.strip_prefix('r').ok_or_else(invalid)?;
        let (round, rest) = rest.split_once("_p").ok_or_else(invalid)?;
        let (prompt, example) = rest.split_once("_e").ok_or_else(invalid)?;

        Ok(Self {
            round: round.parse().map_err(|_| invalid())?,
            prompt: prompt.parse().map_err(|_| invalid())?,
            example: example.parse().map_err(|_| invalid())?,
        })
    }
}

/// Submits one bulk job per round and polls it to a terminal status
pub struct BatchEvaluator {
    client: Arc<dyn BatchClient>,
    model: String,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl BatchEvaluator {
    /// Create an evaluator over a batch client
    pub fn new(client: Arc<dyn BatchClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            poll_interval: Duration::from_secs(10),
            max_polls: None,
        }
    }

    /// Set the interval between status polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bound the number of status polls; unbounded by default
    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Evaluator model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Evaluate every prompt against every example in one batch job.
    ///
    /// Returns the produced text keyed by request id. A terminal status
    /// other than `completed` fails the whole run; there is no partial
    /// salvage and no resubmission.
    pub async fn evaluate(
        &self,
        prompts: &[String],
        examples: &[EvalExample],
        round: u32,
    ) -> Result<HashMap<RequestId, String>> {
        let mut items = Vec::with_capacity(prompts.len() * examples.len());
        for (prompt_idx, prompt) in prompts.iter().enumerate() {
            for (example_idx, example) in examples.iter().enumerate() {
                items.push(BatchRequestItem {
                    custom_id: RequestId::new(round, prompt_idx as u32, example_idx as u32)
                        .to_string(),
                    model: self.model.clone(),
                    system: prompt.clone(),
                    user: example.input.clone(),
                    temperature: EVAL_TEMPERATURE,
                    max_tokens: EVAL_MAX_TOKENS,
                });
            }
        }

        info!(
            prompts = prompts.len(),
            examples = examples.len(),
            requests = items.len(),
            round,
            "submitting evaluation batch"
        );
        let job_id = self.client.submit(&items).await?;

        let status = self.poll(&job_id).await?;
        if status != BatchStatus::Completed {
            return Err(Error::BatchFailed { job_id, status });
        }

        let outputs = self.client.results(&job_id).await?;
        let mut results = HashMap::with_capacity(outputs.len());
        for output in outputs {
            match output.custom_id.parse::<RequestId>() {
                Ok(id) => {
                    results.insert(id, output.text);
                }
                Err(_) => {
                    warn!(custom_id = %output.custom_id, "skipping result with unrecognized id");
                }
            }
        }
        Ok(results)
    }

    async fn poll(&self, job_id: &str) -> Result<BatchStatus> {
        let mut attempts = 0u32;
        loop {
            let status = self.client.status(job_id).await?;
            if status.is_terminal() {
                return Ok(status);
            }

            attempts += 1;
            if let Some(max) = self.max_polls {
                if attempts >= max {
                    return Err(Error::PollDeadline {
                        job_id: job_id.to_string(),
                        status,
                        attempts,
                    });
                }
            }

            debug!(job_id, %status, attempts, "batch job still running");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptbeam_client::MockBatchClient;

    fn examples() -> Vec<EvalExample> {
        vec![
            EvalExample::new("input a", "expected a"),
            EvalExample::new("input b", "expected b"),
        ]
    }

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId::new(2, 14, 3).to_string(), "r2_p14_e3");
    }

    #[test]
    fn test_request_id_round_trip() {
        let id = RequestId::new(1, 0, 42);
        assert_eq!(id.to_string().parse::<RequestId>().unwrap(), id);
    }

    #[test]
    fn test_request_id_rejects_malformed() {
        assert!("".parse::<RequestId>().is_err());
        assert!("r1_p2".parse::<RequestId>().is_err());
        assert!("x1_p2_e3".parse::<RequestId>().is_err());
        assert!("r1_px_e3".parse::<RequestId>().is_err());
        assert!("r1_p2_e".parse::<RequestId>().is_err());
    }

    #[tokio::test]
    async fn test_evaluate_cross_product() {
        let client = Arc::new(MockBatchClient::new(|system, user| {
            format!("{} -> {}", system, user)
        }));
        let evaluator = BatchEvaluator::new(client, "gpt-3.5-turbo")
            .with_poll_interval(Duration::from_millis(1));

        let prompts = vec!["P0".to_string(), "P1".to_string()];
        let results = evaluator.evaluate(&prompts, &examples(), 0).await.unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(
            results[&RequestId::new(0, 1, 0)],
            "P1 -> input a".to_string()
        );
    }

    #[tokio::test]
    async fn test_failed_job_is_fatal() {
        let client = Arc::new(
            MockBatchClient::new(|_, _| String::new())
                .with_statuses(vec![BatchStatus::Failed]),
        );
        let evaluator =
            BatchEvaluator::new(client, "gpt-3.5-turbo").with_poll_interval(Duration::from_millis(1));

        let err = evaluator
            .evaluate(&["P".to_string()], &examples(), 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::BatchFailed {
                status: BatchStatus::Failed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_poll_waits_through_non_terminal_statuses() {
        let client = Arc::new(MockBatchClient::new(|_, _| "out".to_string()).with_statuses(vec![
            BatchStatus::Validating,
            BatchStatus::InProgress,
            BatchStatus::Finalizing,
            BatchStatus::Completed,
        ]));
        let evaluator = BatchEvaluator::new(client, "gpt-3.5-turbo")
            .with_poll_interval(Duration::from_millis(1));

        let results = evaluator
            .evaluate(&["P".to_string()], &examples(), 0)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_poll_deadline() {
        let client = Arc::new(
            MockBatchClient::new(|_, _| String::new())
                .with_statuses(vec![BatchStatus::InProgress]),
        );
        let evaluator = BatchEvaluator::new(client, "gpt-3.5-turbo")
            .with_poll_interval(Duration::from_millis(1))
            .with_max_polls(Some(3));

        let err = evaluator
            .evaluate(&["P".to_string()], &examples(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PollDeadline { attempts: 3, .. }));
    }
}
