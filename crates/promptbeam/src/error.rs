// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Error types for Promptbeam
//!
//! Fatal conditions (configuration errors, failed batch jobs) surface here.
//! Recoverable conditions never do: generation failures fall back to suffixed
//! variants, and missing per-example results are absorbed into the fitness
//! average by the scorer.

use promptbeam_client::BatchStatus;
use thiserror::Error;

/// Result type alias for Promptbeam operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Promptbeam
#[derive(Error, Debug)]
pub enum Error {
    /// No metric was supplied when the optimizer was built
    #[error("metric function must be provided")]
    MissingMetric,

    /// No evaluation backend was supplied when the optimizer was built
    #[error("an evaluation backend (batch or sequential) must be provided")]
    MissingEvaluator,

    /// A batch job reached a terminal status other than completed.
    ///
    /// Batch jobs are billed as units; the run aborts rather than retrying.
    #[error("batch job {job_id} ended with status {status}")]
    BatchFailed {
        /// Id of the failed job
        job_id: String,
        /// The terminal status it reached
        status: BatchStatus,
    },

    /// The configured poll bound elapsed before the job reached a terminal
    /// status. Only raised when a bound is configured.
    #[error("batch job {job_id} still {status} after {attempts} polls")]
    PollDeadline {
        /// Id of the outstanding job
        job_id: String,
        /// Last observed status
        status: BatchStatus,
        /// Number of polls performed
        attempts: u32,
    },

    /// I/O errors from result-store construction
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from an LM or batch client
    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_failed_display() {
        let err = Error::BatchFailed {
            job_id: "batch_abc".to_string(),
            status: BatchStatus::Expired,
        };
        assert_eq!(
            err.to_string(),
            "batch job batch_abc ended with status expired"
        );
    }

    #[test]
    fn test_missing_metric_display() {
        assert_eq!(
            Error::MissingMetric.to_string(),
            "metric function must be provided"
        );
    }
}
